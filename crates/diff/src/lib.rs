//! Vitrine Diff - Identity-based list reconciliation.
//!
//! This crate turns successive snapshots of a list into edit scripts a
//! display consumer can apply row by row, keeping row identity stable across
//! updates.
//!
//! - `reconcile`: the edit script between two lists
//! - `EditScript` / `EditOp`: ordered insert, remove, move and change ranges
//! - `ListUpdateCallback`: what a display consumer implements
//! - `ListDiffer`: the displayed list, reconciled inline
//! - `BackgroundDiffer`: reconciliation on a worker thread, newest wins
//!
//! # Example
//!
//! ```
//! use vitrine_core::Product;
//! use vitrine_diff::{reconcile, EditOp};
//!
//! let old = vec![Product::new(1, "A", "", 10)];
//! let new = vec![Product::new(1, "A", "", 12)];
//!
//! let script = reconcile(&old, &new);
//! assert_eq!(script.ops(), &[EditOp::Change { position: 0, count: 1 }]);
//! ```

mod background;
mod differ;
mod reconcile;
mod script;

pub use background::{BackgroundDiffer, Submission};
pub use differ::ListDiffer;
pub use reconcile::reconcile;
pub use script::{EditOp, EditScript, EditStats, ListUpdateCallback};
