//! Observable value cells.
//!
//! `Observable<T>` holds an optional current value and a list of subscribers.
//! A cell starts unset ("not loaded yet"); once set it always holds a value.
//! Subscribing replays the current value synchronously, then every `set`
//! notifies subscribers in registration order.
//!
//! Callbacks run with no internal borrow held, so a callback may set other
//! observables, subscribe, or drop subscriptions (including its own). If a
//! callback sets the same observable again, the outer notification stops and
//! remaining subscribers only see the newer value.

use crate::subscription::{Callback, Subscription, SubscriptionManager};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct Shared<T> {
    value: Option<T>,
    /// Incremented on every `set`.
    version: u64,
    subscriptions: SubscriptionManager<T>,
}

/// A shared, observable value.
///
/// Clones are handles to the same cell.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use vitrine_reactive::Observable;
///
/// let price = Observable::with_value(10);
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let seen_clone = seen.clone();
///
/// let sub = price.subscribe(move |p: &i32| seen_clone.borrow_mut().push(*p));
/// price.set(12);
/// drop(sub);
/// price.set(14);
///
/// assert_eq!(*seen.borrow(), vec![10, 12]);
/// ```
pub struct Observable<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Creates an unset observable.
    pub fn new() -> Self {
        Self::from_state(None)
    }

    /// Creates an observable holding `value`.
    pub fn with_value(value: T) -> Self {
        Self::from_state(Some(value))
    }

    fn from_state(value: Option<T>) -> Self {
        let version = if value.is_some() { 1 } else { 0 };
        Self {
            shared: Rc::new(RefCell::new(Shared {
                value,
                version,
                subscriptions: SubscriptionManager::new(),
            })),
        }
    }

    /// Returns a clone of the current value, or `None` if unset.
    pub fn get(&self) -> Option<T> {
        self.shared.borrow().value.clone()
    }

    /// Returns true once a value has been set.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.shared.borrow().value.is_some()
    }

    /// Returns the number of values set so far.
    #[inline]
    pub fn version(&self) -> u64 {
        self.shared.borrow().version
    }

    /// Returns the number of live subscriptions.
    #[inline]
    pub fn subscription_count(&self) -> usize {
        self.shared.borrow().subscriptions.len()
    }

    /// Returns true if both handles point to the same cell.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Returns a handle that does not keep the cell alive.
    pub fn downgrade(&self) -> WeakObservable<T> {
        WeakObservable {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Stores `value` and notifies every subscriber.
    pub fn set(&self, value: T) {
        let (version, ids) = {
            let mut shared = self.shared.borrow_mut();
            shared.value = Some(value.clone());
            shared.version += 1;
            (shared.version, shared.subscriptions.ids())
        };

        for id in ids {
            // Looked up per call: earlier callbacks may have unsubscribed it,
            // or set a newer value that was already delivered to everyone.
            let callback = {
                let shared = self.shared.borrow();
                if shared.version != version {
                    return;
                }
                shared.subscriptions.get(id)
            };
            if let Some(callback) = callback {
                callback(&value);
            }
        }
    }

    /// Subscribes to value changes.
    ///
    /// If a value is set, `callback` is invoked with it before this returns.
    /// The callback stays registered until the returned handle is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let callback: Callback<T> = Rc::new(callback);
        let (id, current) = {
            let mut shared = self.shared.borrow_mut();
            let id = shared.subscriptions.subscribe(callback.clone());
            (id, shared.value.clone())
        };

        let weak: Weak<RefCell<Shared<T>>> = Rc::downgrade(&self.shared);
        let subscription = Subscription::new(id, move |id| {
            if let Some(shared) = weak.upgrade() {
                shared.borrow_mut().subscriptions.unsubscribe(id);
            }
        });

        if let Some(value) = current {
            callback(&value);
        }
        subscription
    }
}

/// A non-owning handle to an [`Observable`].
pub struct WeakObservable<T> {
    shared: Weak<RefCell<Shared<T>>>,
}

impl<T> Clone for WeakObservable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> WeakObservable<T> {
    /// Returns the observable if any strong handle is still alive.
    pub fn upgrade(&self) -> Option<Observable<T>> {
        self.shared.upgrade().map(|shared| Observable { shared })
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.shared.try_borrow() {
            Ok(shared) => f
                .debug_struct("Observable")
                .field("value", &shared.value)
                .field("version", &shared.version)
                .field("subscriptions", &shared.subscriptions.len())
                .finish(),
            Err(_) => f.write_str("Observable { <borrowed> }"),
        }
    }
}
