//! Switch-to-latest derivation.
//!
//! `switch_map` derives an observable from a key observable. Each time the
//! key changes, the subscription to the previously selected source is dropped
//! and a new source is selected and subscribed. At most one source is
//! subscribed at a time, and a value from a superseded source is never
//! forwarded once a newer key has been seen.

use crate::observable::Observable;
use crate::subscription::Subscription;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

struct SwitchState<V> {
    /// Bumped on every key. A forwarder only delivers while its generation
    /// is still current.
    generation: Cell<u64>,
    inner: RefCell<Option<ActiveSource<V>>>,
}

impl<V> Default for SwitchState<V> {
    fn default() -> Self {
        Self {
            generation: Cell::new(0),
            inner: RefCell::new(None),
        }
    }
}

/// The followed source. Holding the observable keeps sources that nobody
/// else references (live queries) alive while they are followed.
struct ActiveSource<V> {
    _subscription: Subscription,
    _source: Observable<V>,
}

/// An observable derived by switching between sources.
///
/// The derivation lives as long as this value; dropping it unsubscribes from
/// both the key observable and the active source. The output keeps its last
/// value across a switch until the new source delivers.
pub struct SwitchMap<V> {
    output: Observable<V>,
    state: Rc<SwitchState<V>>,
    _key: Subscription,
}

impl<V: Clone + 'static> SwitchMap<V> {
    /// Returns the derived observable.
    #[inline]
    pub fn output(&self) -> &Observable<V> {
        &self.output
    }

    /// Returns how many keys have been switched to so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.state.generation.get()
    }

    /// Returns true while a source subscription is held.
    pub fn has_source(&self) -> bool {
        self.state.inner.borrow().is_some()
    }
}

/// Derives an observable that follows the source selected for the latest key.
///
/// `select` is called once per key value (including the replayed current
/// value at construction) and returns the source to follow.
pub fn switch_map<K, V, F>(keys: &Observable<K>, select: F) -> SwitchMap<V>
where
    K: Clone + 'static,
    V: Clone + 'static,
    F: Fn(&K) -> Observable<V> + 'static,
{
    let output = Observable::new();
    let state: Rc<SwitchState<V>> = Rc::new(SwitchState::default());

    let out = output.clone();
    let weak_state: Weak<SwitchState<V>> = Rc::downgrade(&state);
    let key_subscription = keys.subscribe(move |key: &K| {
        let Some(state) = weak_state.upgrade() else {
            return;
        };
        let generation = state.generation.get() + 1;
        state.generation.set(generation);

        let previous = state.inner.borrow_mut().take();
        drop(previous);
        tracing::trace!(generation, "switching to new source");

        let source = select(key);
        let forward_to = out.clone();
        let guard = Rc::downgrade(&state);
        let subscription = source.subscribe(move |value: &V| {
            if let Some(state) = guard.upgrade() {
                if state.generation.get() == generation {
                    forward_to.set(value.clone());
                }
            }
        });

        // The replay above may have re-entered with a newer key; in that
        // case this subscription is already stale and is dropped here.
        if state.generation.get() == generation {
            *state.inner.borrow_mut() = Some(ActiveSource {
                _subscription: subscription,
                _source: source,
            });
        }
    });

    SwitchMap {
        output,
        state,
        _key: key_subscription,
    }
}
