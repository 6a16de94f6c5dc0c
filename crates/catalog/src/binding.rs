//! Binding a snapshot stream to a display consumer.
//!
//! `ListBinding` subscribes to an observable list and feeds every snapshot
//! through a `BackgroundDiffer` into a `ListUpdateCallback`. Large diffs
//! finish on the worker and are applied by `poll` or `wait` on the thread
//! that owns the binding.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use vitrine_core::{Identified, Result, Snapshot};
use vitrine_diff::{BackgroundDiffer, ListUpdateCallback, Submission};
use vitrine_reactive::{Observable, Subscription};

struct View<T, C> {
    differ: BackgroundDiffer<T>,
    consumer: C,
}

struct Shared<T, C> {
    view: RefCell<View<T, C>>,
    /// Newest snapshot not yet handed to the differ. Filled when a snapshot
    /// arrives while the consumer is still applying the previous one.
    backlog: RefCell<Option<Snapshot<T>>>,
}

impl<T, C> Shared<T, C>
where
    T: Identified + Send + Sync + 'static,
    C: ListUpdateCallback,
{
    fn drain(&self) {
        loop {
            let Ok(mut view) = self.view.try_borrow_mut() else {
                return;
            };
            let Some(list) = self.backlog.borrow_mut().take() else {
                return;
            };
            let View { differ, consumer } = &mut *view;
            match differ.submit(list, consumer) {
                Ok(Submission::Applied(script)) => {
                    tracing::trace!(ops = script.len(), "applied list inline");
                }
                Ok(Submission::Queued { generation }) => {
                    tracing::trace!(generation, "list queued for background diff");
                }
                Err(e) => tracing::warn!(error = %e, "dropping list update"),
            }
        }
    }
}

/// Keeps a display consumer in sync with an observable list.
///
/// Dropping the binding unsubscribes and stops the diff worker.
pub struct ListBinding<T, C> {
    shared: Rc<Shared<T, C>>,
    _subscription: Subscription,
}

impl<T, C> ListBinding<T, C>
where
    T: Identified + Send + Sync + 'static,
    C: ListUpdateCallback + 'static,
{
    /// Subscribes `consumer` to `list`. A list that is already set is
    /// applied before this returns.
    pub fn new(list: &Observable<Snapshot<T>>, differ: BackgroundDiffer<T>, consumer: C) -> Self {
        let shared = Rc::new(Shared {
            view: RefCell::new(View { differ, consumer }),
            backlog: RefCell::new(None),
        });
        let weak = Rc::downgrade(&shared);
        let subscription = list.subscribe(move |snapshot: &Snapshot<T>| {
            if let Some(shared) = weak.upgrade() {
                *shared.backlog.borrow_mut() = Some(snapshot.clone());
                shared.drain();
            }
        });
        Self {
            shared,
            _subscription: subscription,
        }
    }

    /// True until the first list has been shown.
    pub fn is_loading(&self) -> bool {
        self.shared.view.borrow().differ.differ().current().is_none()
    }

    /// Returns true while a background diff has not been applied.
    pub fn has_pending(&self) -> bool {
        self.shared.view.borrow().differ.has_pending()
    }

    /// Applies a finished background diff, if any. Returns true if the
    /// consumer was updated.
    pub fn poll(&self) -> Result<bool> {
        let applied = {
            let mut view = self.shared.view.borrow_mut();
            let View { differ, consumer } = &mut *view;
            differ.dispatch_pending(consumer)?
        };
        self.shared.drain();
        Ok(applied.is_some())
    }

    /// Blocks up to `timeout` for the pending background diff and applies it.
    pub fn wait(&self, timeout: Duration) -> Result<bool> {
        let applied = {
            let mut view = self.shared.view.borrow_mut();
            let View { differ, consumer } = &mut *view;
            differ.wait(consumer, timeout)?
        };
        self.shared.drain();
        Ok(applied.is_some())
    }

    /// Number of rows shown.
    pub fn len(&self) -> usize {
        self.shared.view.borrow().differ.differ().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stable id of the row shown at `position`.
    pub fn item_id(&self, position: usize) -> Option<T::Id> {
        self.shared.view.borrow().differ.differ().item_id(position)
    }

    /// Runs `f` with the consumer.
    pub fn with_consumer<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.shared.view.borrow().consumer)
    }

    /// Runs `f` with mutable access to the consumer, e.g. to bind rows
    /// inserted by the last update.
    ///
    /// Must not be called from inside the consumer's own callbacks.
    pub fn with_consumer_mut<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.shared.view.borrow_mut().consumer)
    }
}
