//! Vitrine Store - Data access for the Vitrine catalog.
//!
//! This crate provides the data side of the catalog pipeline:
//!
//! - `CatalogSource`: the contract the pipeline queries through
//! - `CatalogStore`: in-memory product and comment tables with live queries
//! - `Repository`: the shared entry point wired at the composition root
//! - `SavedState`: restartable key-value state, optionally backed by a JSON
//!   file
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use vitrine_core::Product;
//! use vitrine_store::{CatalogSource, CatalogStore, Repository};
//!
//! let store = Rc::new(CatalogStore::new());
//! let repository = Repository::new(store.clone());
//! let products = repository.all_products();
//! assert!(!products.is_set());
//!
//! store.populate(vec![Product::new(1, "Desk lamp", "Warm light", 25)], Vec::new());
//! assert_eq!(products.get().map(|list| list.len()), Some(1));
//! ```

mod catalog_store;
mod live;
mod repository;
mod saved_state;
mod source;
pub mod tables;

pub use catalog_store::CatalogStore;
pub use repository::Repository;
pub use saved_state::SavedState;
pub use source::CatalogSource;
pub use tables::{TableId, Tables};
