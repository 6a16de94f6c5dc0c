//! Vitrine Core - Core types for the Vitrine reactive catalog.
//!
//! This crate provides the foundational types shared by every other crate:
//!
//! - `Product`, `Comment`: catalog entities with stable identities
//! - `Identified`: identity and content comparison used by list reconciliation
//! - `Snapshot`: an immutable, ordered result set
//! - `pattern_match`: the `*` wildcard search dialect
//! - `Config`: catalog configuration loaded from TOML
//! - `Error`: error types for catalog operations
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::{Identified, Product, SearchPattern};
//!
//! let lamp = Product::new(1, "Desk lamp", "Adjustable arm", 25);
//! let pattern = SearchPattern::contains("lamp", false);
//!
//! assert_eq!(lamp.id(), 1);
//! assert!(pattern.matches(&lamp.name));
//! ```

mod config;
mod error;
mod model;
pub mod pattern_match;

pub use config::{Config, DiffConfig, SearchConfig, DEFAULT_BACKGROUND_THRESHOLD};
pub use error::{Error, Result};
pub use model::{Comment, CommentId, Identified, Product, ProductId, Snapshot};
pub use pattern_match::SearchPattern;
