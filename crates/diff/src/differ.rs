//! The list currently shown by a display consumer.

use crate::reconcile::reconcile;
use crate::script::{EditScript, ListUpdateCallback};
use std::sync::Arc;
use vitrine_core::{Identified, Snapshot};

/// Tracks the displayed list and feeds each new snapshot to a consumer as
/// an edit script.
///
/// The first snapshot is announced as one bulk insert. Rows are addressed by
/// stable id through [`ListDiffer::item_id`], so consumers can recycle row
/// state by identity.
pub struct ListDiffer<T> {
    current: Option<Snapshot<T>>,
}

impl<T> Default for ListDiffer<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T: Identified> ListDiffer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The displayed list, or `None` before the first submission.
    #[inline]
    pub fn current(&self) -> Option<&Snapshot<T>> {
        self.current.as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.current.as_ref().map_or(0, |list| list.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn item(&self, position: usize) -> Option<&T> {
        self.current.as_ref().and_then(|list| list.get(position))
    }

    /// Stable id of the row at `position`.
    pub fn item_id(&self, position: usize) -> Option<T::Id> {
        self.item(position).map(Identified::id)
    }

    /// Shows `list`, dispatching the edit script from the previous list.
    pub fn submit<C>(&mut self, list: Snapshot<T>, consumer: &mut C) -> EditScript
    where
        C: ListUpdateCallback + ?Sized,
    {
        let script = match &self.current {
            None => EditScript::bulk_insert(list.len()),
            Some(old) if Arc::ptr_eq(old, &list) => EditScript::new(),
            Some(old) => reconcile(old, &list),
        };
        self.install(list, &script, consumer);
        script
    }

    /// Shows `list` using a script computed elsewhere against the current
    /// list.
    pub(crate) fn install<C>(&mut self, list: Snapshot<T>, script: &EditScript, consumer: &mut C)
    where
        C: ListUpdateCallback + ?Sized,
    {
        self.current = Some(list);
        script.dispatch(consumer);
    }
}
