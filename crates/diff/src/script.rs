//! Edit scripts and the display-consumer interface.
//!
//! An `EditScript` is an ordered list of row operations. Each position is
//! relative to the list as it stands after all previous operations have been
//! applied, so a consumer can apply them one by one.

/// A single row operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOp {
    /// `count` rows inserted starting at `position`.
    Insert { position: usize, count: usize },
    /// `count` rows removed starting at `position`.
    Remove { position: usize, count: usize },
    /// The row at `from` is taken out and reinserted at `to`.
    Move { from: usize, to: usize },
    /// `count` rows starting at `position` kept their identity but changed
    /// content.
    Change { position: usize, count: usize },
}

/// Receives edit operations, typically a rendered list.
///
/// Implementations should key their rows by identity, not position, so a
/// moved row keeps its visual state.
pub trait ListUpdateCallback {
    fn on_inserted(&mut self, position: usize, count: usize);
    fn on_removed(&mut self, position: usize, count: usize);
    fn on_moved(&mut self, from: usize, to: usize);
    fn on_changed(&mut self, position: usize, count: usize);
}

/// Row counts per kind of operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditStats {
    pub inserted: usize,
    pub removed: usize,
    pub moved: usize,
    pub changed: usize,
}

/// An ordered list of edit operations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    /// Creates an empty script.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single insert covering a whole list. Empty for `count == 0`.
    pub fn bulk_insert(count: usize) -> Self {
        let mut script = Self::new();
        script.push(EditOp::Insert { position: 0, count });
        script
    }

    /// A single remove covering a whole list. Empty for `count == 0`.
    pub fn bulk_remove(count: usize) -> Self {
        let mut script = Self::new();
        script.push(EditOp::Remove { position: 0, count });
        script
    }

    /// Returns the operations in application order.
    #[inline]
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Returns true if applying the script changes nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns the number of operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Appends an operation, merging it into the previous one when both
    /// cover adjacent rows of the same kind. Zero-count ranges are dropped.
    pub fn push(&mut self, op: EditOp) {
        match op {
            EditOp::Insert { count: 0, .. }
            | EditOp::Remove { count: 0, .. }
            | EditOp::Change { count: 0, .. } => return,
            _ => {}
        }

        if let Some(last) = self.ops.last_mut() {
            match (last, op) {
                (
                    EditOp::Insert { position, count },
                    EditOp::Insert { position: next, count: more },
                ) if next == *position + *count => {
                    *count += more;
                    return;
                }
                (
                    EditOp::Change { position, count },
                    EditOp::Change { position: next, count: more },
                ) if next == *position + *count => {
                    *count += more;
                    return;
                }
                // Removes are produced back to front
                (
                    EditOp::Remove { position, count },
                    EditOp::Remove { position: next, count: more },
                ) if next + more == *position => {
                    *position = next;
                    *count += more;
                    return;
                }
                _ => {}
            }
        }
        self.ops.push(op);
    }

    /// Counts affected rows per kind.
    pub fn stats(&self) -> EditStats {
        let mut stats = EditStats::default();
        for op in &self.ops {
            match *op {
                EditOp::Insert { count, .. } => stats.inserted += count,
                EditOp::Remove { count, .. } => stats.removed += count,
                EditOp::Move { .. } => stats.moved += 1,
                EditOp::Change { count, .. } => stats.changed += count,
            }
        }
        stats
    }

    /// Applies the script to a consumer, in order.
    pub fn dispatch<C>(&self, consumer: &mut C)
    where
        C: ListUpdateCallback + ?Sized,
    {
        for op in &self.ops {
            match *op {
                EditOp::Insert { position, count } => consumer.on_inserted(position, count),
                EditOp::Remove { position, count } => consumer.on_removed(position, count),
                EditOp::Move { from, to } => consumer.on_moved(from, to),
                EditOp::Change { position, count } => consumer.on_changed(position, count),
            }
        }
    }
}

impl IntoIterator for EditScript {
    type Item = EditOp;
    type IntoIter = std::vec::IntoIter<EditOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}
