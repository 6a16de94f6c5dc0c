//! Off-thread reconciliation with most-recent-wins delivery.
//!
//! The worker owns a single pending-job slot. Submitting while a job is still
//! queued replaces it, so the worker only ever starts on the newest snapshot.
//! Every submission gets a generation number; a finished diff is applied on
//! the interactive thread only if its generation is still the latest. A diff
//! that was overtaken is dropped, never applied after a newer one.

use crate::differ::ListDiffer;
use crate::reconcile::reconcile;
use crate::script::{EditScript, ListUpdateCallback};
use parking_lot::{Condvar, Mutex};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use vitrine_core::{Error, Identified, Result, Snapshot, DEFAULT_BACKGROUND_THRESHOLD};

struct Job<T> {
    generation: u64,
    old: Snapshot<T>,
    new: Snapshot<T>,
}

struct Finished<T> {
    generation: u64,
    list: Snapshot<T>,
    script: EditScript,
}

struct SlotState<T> {
    job: Option<Job<T>>,
    closed: bool,
}

struct JobSlot<T> {
    state: Mutex<SlotState<T>>,
    ready: Condvar,
}

/// What happened to a submitted snapshot.
#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
    /// Reconciled and dispatched before `submit` returned.
    Applied(EditScript),
    /// Handed to the worker; apply it with `dispatch_pending` or `wait`.
    Queued { generation: u64 },
}

/// A `ListDiffer` that reconciles large lists on a worker thread.
///
/// All methods are called from the interactive thread that owns the
/// consumer. Lists smaller than the threshold, and the very first list, are
/// handled inline.
pub struct BackgroundDiffer<T> {
    differ: ListDiffer<T>,
    threshold: usize,
    /// Generation of the newest submission.
    latest: u64,
    /// Generation of the list currently shown.
    shown: u64,
    slot: Arc<JobSlot<T>>,
    results: Receiver<Finished<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T> BackgroundDiffer<T>
where
    T: Identified + Send + Sync + 'static,
{
    /// Starts a differ with the default background threshold.
    pub fn new() -> Result<Self> {
        Self::with_threshold(DEFAULT_BACKGROUND_THRESHOLD)
    }

    /// Starts a differ that offloads lists with at least `threshold` rows.
    pub fn with_threshold(threshold: usize) -> Result<Self> {
        let slot = Arc::new(JobSlot {
            state: Mutex::new(SlotState {
                job: None,
                closed: false,
            }),
            ready: Condvar::new(),
        });
        let (sender, results) = mpsc::channel();

        let worker_slot = slot.clone();
        let worker = std::thread::Builder::new()
            .name("vitrine-differ".into())
            .spawn(move || run_worker(worker_slot, sender))
            .map_err(|e| Error::io("vitrine-differ", e))?;

        Ok(Self {
            differ: ListDiffer::new(),
            threshold,
            latest: 0,
            shown: 0,
            slot,
            results,
            worker: Some(worker),
        })
    }

    /// The list currently shown.
    #[inline]
    pub fn differ(&self) -> &ListDiffer<T> {
        &self.differ
    }

    /// Returns true while a submitted list has not been shown yet.
    #[inline]
    pub fn has_pending(&self) -> bool {
        self.shown != self.latest
    }

    /// Submits a new snapshot for display.
    pub fn submit<C>(&mut self, list: Snapshot<T>, consumer: &mut C) -> Result<Submission>
    where
        C: ListUpdateCallback + ?Sized,
    {
        self.latest += 1;
        let generation = self.latest;

        let offload = self
            .differ
            .current()
            .filter(|old| old.len().max(list.len()) >= self.threshold)
            .cloned();
        let Some(old) = offload else {
            let script = self.differ.submit(list, consumer);
            self.shown = generation;
            return Ok(Submission::Applied(script));
        };

        if self.worker.as_ref().map_or(true, |w| w.is_finished()) {
            return Err(Error::WorkerStopped);
        }

        {
            let mut state = self.slot.state.lock();
            if let Some(replaced) = state.job.replace(Job {
                generation,
                old,
                new: list,
            }) {
                tracing::debug!(
                    replaced = replaced.generation,
                    generation,
                    "queued diff superseded before it started"
                );
            }
        }
        self.slot.ready.notify_one();
        Ok(Submission::Queued { generation })
    }

    /// Applies the latest finished diff, if it has arrived. Never blocks.
    ///
    /// Returns the applied script, or `None` if nothing current was ready.
    pub fn dispatch_pending<C>(&mut self, consumer: &mut C) -> Result<Option<EditScript>>
    where
        C: ListUpdateCallback + ?Sized,
    {
        loop {
            match self.results.try_recv() {
                Ok(finished) => {
                    if let Some(script) = self.accept(finished, consumer) {
                        return Ok(Some(script));
                    }
                }
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => {
                    return if self.has_pending() {
                        Err(Error::WorkerStopped)
                    } else {
                        Ok(None)
                    };
                }
            }
        }
    }

    /// Blocks until the latest submission is shown or `timeout` elapses.
    pub fn wait<C>(&mut self, consumer: &mut C, timeout: Duration) -> Result<Option<EditScript>>
    where
        C: ListUpdateCallback + ?Sized,
    {
        while self.has_pending() {
            match self.results.recv_timeout(timeout) {
                Ok(finished) => {
                    if let Some(script) = self.accept(finished, consumer) {
                        return Ok(Some(script));
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(Error::WorkerStopped),
            }
        }
        Ok(None)
    }

    fn accept<C>(&mut self, finished: Finished<T>, consumer: &mut C) -> Option<EditScript>
    where
        C: ListUpdateCallback + ?Sized,
    {
        if finished.generation != self.latest {
            tracing::debug!(
                generation = finished.generation,
                latest = self.latest,
                "discarding stale diff"
            );
            return None;
        }
        self.differ.install(finished.list, &finished.script, consumer);
        self.shown = finished.generation;
        Some(finished.script)
    }
}

impl<T> Drop for BackgroundDiffer<T> {
    fn drop(&mut self) {
        self.slot.state.lock().closed = true;
        self.slot.ready.notify_all();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("differ worker panicked");
            }
        }
    }
}

fn run_worker<T: Identified>(slot: Arc<JobSlot<T>>, results: Sender<Finished<T>>) {
    loop {
        let job = {
            let mut state = slot.state.lock();
            loop {
                if let Some(job) = state.job.take() {
                    break job;
                }
                if state.closed {
                    return;
                }
                slot.ready.wait(&mut state);
            }
        };

        let script = reconcile(&job.old, &job.new);
        let finished = Finished {
            generation: job.generation,
            list: job.new,
            script,
        };
        if results.send(finished).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::EditOp;
    use vitrine_core::Product;

    const WAIT: Duration = Duration::from_secs(10);

    #[derive(Default)]
    struct Rows(Vec<Option<u64>>);

    impl ListUpdateCallback for Rows {
        fn on_inserted(&mut self, position: usize, count: usize) {
            for i in 0..count {
                self.0.insert(position + i, None);
            }
        }
        fn on_removed(&mut self, position: usize, count: usize) {
            self.0.drain(position..position + count);
        }
        fn on_moved(&mut self, from: usize, to: usize) {
            let row = self.0.remove(from);
            self.0.insert(to, row);
        }
        fn on_changed(&mut self, _position: usize, _count: usize) {}
    }

    impl Rows {
        /// Fills inserted placeholders from the list being shown.
        fn bind(&mut self, list: &[Product]) {
            for (row, product) in self.0.iter_mut().zip(list) {
                row.get_or_insert(product.id);
            }
        }

        fn ids(&self) -> Vec<u64> {
            self.0.iter().flatten().copied().collect()
        }
    }

    fn snapshot(ids: impl IntoIterator<Item = u64>) -> Snapshot<Product> {
        ids.into_iter()
            .map(|id| Product::new(id, format!("P{id}"), "", 1))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_first_list_is_applied_inline() {
        let mut differ = BackgroundDiffer::with_threshold(1).unwrap();
        let mut rows = Rows::default();

        let submission = differ.submit(snapshot(0..5), &mut rows).unwrap();
        assert_eq!(
            submission,
            Submission::Applied(EditScript::bulk_insert(5))
        );
        assert!(!differ.has_pending());
    }

    #[test]
    fn test_small_lists_stay_inline() {
        let mut differ = BackgroundDiffer::with_threshold(100).unwrap();
        let mut rows = Rows::default();

        differ.submit(snapshot(0..5), &mut rows).unwrap();
        let submission = differ.submit(snapshot(1..5), &mut rows).unwrap();
        assert_eq!(
            submission,
            Submission::Applied({
                let mut script = EditScript::new();
                script.push(EditOp::Remove { position: 0, count: 1 });
                script
            })
        );
    }

    #[test]
    fn test_large_list_goes_to_worker() {
        let mut differ = BackgroundDiffer::with_threshold(10).unwrap();
        let mut rows = Rows::default();

        let first = snapshot(0..50);
        differ.submit(first.clone(), &mut rows).unwrap();
        rows.bind(&first);

        let second = snapshot((0..50).rev());
        let submission = differ.submit(second.clone(), &mut rows).unwrap();
        assert_eq!(submission, Submission::Queued { generation: 2 });
        assert!(differ.has_pending());

        let script = differ.wait(&mut rows, WAIT).unwrap().expect("diff result");
        assert_eq!(script.stats().moved, 49);
        assert!(!differ.has_pending());
        rows.bind(&second);
        assert_eq!(rows.ids(), (0..50).rev().collect::<Vec<_>>());
        assert_eq!(differ.differ().item_id(0), Some(49));
    }

    #[test]
    fn test_only_latest_submission_is_applied() {
        let mut differ = BackgroundDiffer::with_threshold(10).unwrap();
        let mut rows = Rows::default();

        let first = snapshot(0..100);
        differ.submit(first.clone(), &mut rows).unwrap();
        rows.bind(&first);

        differ.submit(snapshot(0..60), &mut rows).unwrap();
        differ.submit(snapshot(20..100), &mut rows).unwrap();
        let last = snapshot((0..100).filter(|id| id % 2 == 0));
        differ.submit(last.clone(), &mut rows).unwrap();

        let script = differ.wait(&mut rows, WAIT).unwrap().expect("diff result");
        assert_eq!(script.stats().removed, 50);
        rows.bind(&last);
        assert_eq!(rows.ids(), last.iter().map(|p| p.id).collect::<Vec<_>>());

        // Anything still in flight is stale and must not be applied
        assert_eq!(differ.wait(&mut rows, Duration::from_millis(50)).unwrap(), None);
        assert_eq!(differ.dispatch_pending(&mut rows).unwrap(), None);
        assert_eq!(differ.differ().len(), 50);
    }

    #[test]
    fn test_inline_submission_overtakes_queued_diff() {
        let mut differ = BackgroundDiffer::with_threshold(10).unwrap();
        let mut rows = Rows::default();

        let first = snapshot(0..5);
        differ.submit(first.clone(), &mut rows).unwrap();
        rows.bind(&first);

        // Large target, goes to the worker
        let queued = differ.submit(snapshot(0..50), &mut rows).unwrap();
        assert_eq!(queued, Submission::Queued { generation: 2 });

        // Small again, applied inline against the 5-row list
        let small = snapshot([4, 2]);
        let inline = differ.submit(small.clone(), &mut rows).unwrap();
        assert!(matches!(inline, Submission::Applied(_)));
        assert!(!differ.has_pending());
        rows.bind(&small);

        // The queued result arrives later and is dropped
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(differ.dispatch_pending(&mut rows).unwrap(), None);
        assert_eq!(rows.ids(), vec![4, 2]);
        assert_eq!(differ.differ().len(), 2);
    }

    #[test]
    fn test_dispatch_pending_eventually_applies() {
        let mut differ = BackgroundDiffer::with_threshold(1).unwrap();
        let mut rows = Rows::default();

        differ.submit(snapshot(0..3), &mut rows).unwrap();
        differ.submit(snapshot(0..4), &mut rows).unwrap();

        let deadline = std::time::Instant::now() + WAIT;
        let mut applied = None;
        while applied.is_none() && std::time::Instant::now() < deadline {
            applied = differ.dispatch_pending(&mut rows).unwrap();
            std::thread::yield_now();
        }
        assert_eq!(
            applied.map(|script| script.stats().inserted),
            Some(1)
        );
    }
}
