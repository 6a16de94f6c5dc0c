//! Subscription management for observables.
//!
//! This module provides subscription IDs, the per-observable subscriber list,
//! and `Subscription`, the handle that keeps a callback registered for as long
//! as it is alive.

use std::rc::Rc;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback type for value notifications.
pub type Callback<T> = Rc<dyn Fn(&T)>;

/// A live registration on an observable.
///
/// Dropping the handle unsubscribes. Bind it to the scope that owns the
/// consumer; when that scope ends the callback stops firing.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriptionId,
    release: Option<Box<dyn FnOnce(SubscriptionId)>>,
}

impl Subscription {
    pub(crate) fn new<F>(id: SubscriptionId, release: F) -> Self
    where
        F: FnOnce(SubscriptionId) + 'static,
    {
        Self {
            id,
            release: Some(Box::new(release)),
        }
    }

    /// Returns the subscription ID.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribes now. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}

    /// Keeps the callback registered for the observable's whole lifetime.
    pub fn detach(mut self) {
        self.release = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.id);
        }
    }
}

impl core::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.release.is_some())
            .finish()
    }
}

/// Subscribers of a single observable, in registration order.
pub(crate) struct SubscriptionManager<T> {
    subscriptions: Vec<(SubscriptionId, Callback<T>)>,
    next_id: SubscriptionId,
}

impl<T> Default for SubscriptionManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SubscriptionManager<T> {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 1,
        }
    }

    /// Registers a callback and returns its ID.
    pub fn subscribe(&mut self, callback: Callback<T>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions.push((id, callback));
        id
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.subscriptions.len();
        self.subscriptions.retain(|(sub_id, _)| *sub_id != id);
        self.subscriptions.len() < len_before
    }

    pub fn get(&self, id: SubscriptionId) -> Option<Callback<T>> {
        self.subscriptions
            .iter()
            .find(|(sub_id, _)| *sub_id == id)
            .map(|(_, callback)| callback.clone())
    }

    pub fn ids(&self) -> Vec<SubscriptionId> {
        self.subscriptions.iter().map(|(id, _)| *id).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }
}
