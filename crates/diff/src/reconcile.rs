//! Identity-based list reconciliation.
//!
//! `reconcile` aligns two snapshots by identity with Myers' algorithm (a
//! longest common subsequence over the id sequences, via `similar`). Rows on
//! the common subsequence stay put. Rows present in both lists but off the
//! subsequence become moves. Everything else is a remove or an insert.
//! Content changes are reported at the row's final position.
//!
//! Operations are emitted in four phases so every position is valid at the
//! time it is applied:
//!
//! 1. removes, back to front
//! 2. moves, in target order, each placed right after its predecessor
//! 3. inserts, front to back, at their final index
//! 4. changes, front to back, at their final index
//!
//! Identities are expected to be unique within each list. A list that
//! repeats an identity cannot be aligned, and is replaced wholesale with a
//! remove of every old row followed by an insert of every new one.

use crate::script::{EditOp, EditScript};
use hashbrown::{HashMap, HashSet};
use similar::algorithms::{myers, DiffHook};
use std::convert::Infallible;
use vitrine_core::Identified;

/// Computes the edit script that turns `old` into `new`.
///
/// An empty `old` yields a single bulk insert without diffing, and an empty
/// `new` a single bulk remove. If either list repeats an identity the
/// result is a bulk remove followed by a bulk insert.
pub fn reconcile<T: Identified>(old: &[T], new: &[T]) -> EditScript {
    if old.is_empty() {
        return EditScript::bulk_insert(new.len());
    }
    if new.is_empty() {
        return EditScript::bulk_remove(old.len());
    }

    let old_ids: Vec<T::Id> = old.iter().map(Identified::id).collect();
    let new_ids: Vec<T::Id> = new.iter().map(Identified::id).collect();

    let new_index_of: HashMap<T::Id, usize> =
        new_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let old_unique = old_ids.iter().collect::<HashSet<_>>().len() == old_ids.len();
    if !old_unique || new_index_of.len() != new_ids.len() {
        tracing::warn!(
            old = old.len(),
            new = new.len(),
            "duplicate ids, replacing the whole list"
        );
        let mut script = EditScript::bulk_remove(old.len());
        script.push(EditOp::Insert { position: 0, count: new.len() });
        return script;
    }

    let alignment = Alignment::compute(&old_ids, &new_ids);

    // For every new row, the old row carrying the same identity (if any)
    let mut source: Vec<Option<usize>> = vec![None; new.len()];
    let mut anchored = vec![false; new.len()];
    for &(o, n) in &alignment.matched {
        source[n] = Some(o);
        anchored[n] = true;
    }
    for &o in &alignment.deleted {
        if let Some(&n) = new_index_of.get(&old_ids[o]) {
            source[n] = Some(o);
        }
    }

    let mut survives = vec![false; old.len()];
    for o in source.iter().flatten() {
        survives[*o] = true;
    }

    let mut script = EditScript::new();

    // 1. Removes
    for o in (0..old.len()).rev() {
        if !survives[o] {
            script.push(EditOp::Remove { position: o, count: 1 });
        }
    }

    // 2. Moves
    let mut working: Vec<T::Id> = old_ids
        .iter()
        .zip(&survives)
        .filter(|(_, keep)| **keep)
        .map(|(id, _)| *id)
        .collect();
    let mut predecessor: Option<T::Id> = None;
    for (n, id) in new_ids.iter().enumerate() {
        if source[n].is_none() {
            continue;
        }
        if !anchored[n] {
            let from = position_of(&working, id);
            let to = match predecessor {
                None => 0,
                Some(pred) => {
                    let at = position_of(&working, &pred);
                    if at < from {
                        at + 1
                    } else {
                        at
                    }
                }
            };
            if from != to {
                working.remove(from);
                working.insert(to, *id);
                script.push(EditOp::Move { from, to });
            }
        }
        predecessor = Some(*id);
    }

    // 3. Inserts
    for (n, src) in source.iter().enumerate() {
        if src.is_none() {
            script.push(EditOp::Insert { position: n, count: 1 });
        }
    }

    // 4. Changes
    for (n, src) in source.iter().enumerate() {
        if let Some(o) = *src {
            if !old[o].same_content(&new[n]) {
                script.push(EditOp::Change { position: n, count: 1 });
            }
        }
    }

    tracing::trace!(
        old = old.len(),
        new = new.len(),
        ops = script.len(),
        "reconciled lists"
    );
    script
}

fn position_of<I: PartialEq>(working: &[I], id: &I) -> usize {
    // Ids are unique and every id looked up here survives both lists
    working.iter().position(|w| w == id).unwrap_or(working.len())
}

/// Index pairs produced by the Myers pass.
#[derive(Default)]
struct Alignment {
    /// (old index, new index) on the common subsequence
    matched: Vec<(usize, usize)>,
    /// Old indices off the common subsequence
    deleted: Vec<usize>,
}

impl Alignment {
    fn compute<I: PartialEq>(old: &[I], new: &[I]) -> Self {
        let mut alignment = Alignment::default();
        match myers::diff(&mut alignment, old, 0..old.len(), new, 0..new.len()) {
            Ok(()) => alignment,
            Err(never) => match never {},
        }
    }
}

impl DiffHook for Alignment {
    type Error = Infallible;

    fn equal(&mut self, old_index: usize, new_index: usize, len: usize) -> Result<(), Infallible> {
        self.matched
            .extend((0..len).map(|i| (old_index + i, new_index + i)));
        Ok(())
    }

    fn delete(&mut self, old_index: usize, old_len: usize, _new_index: usize) -> Result<(), Infallible> {
        self.deleted.extend(old_index..old_index + old_len);
        Ok(())
    }

    fn insert(&mut self, _old_index: usize, _new_index: usize, _new_len: usize) -> Result<(), Infallible> {
        Ok(())
    }
}
