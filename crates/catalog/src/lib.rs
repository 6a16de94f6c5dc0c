//! Vitrine Catalog - Reactive product list and detail models.
//!
//! This crate ties the pipeline together. A search query held in saved
//! state selects which live query feeds the product list; each new list is
//! reconciled against the one on screen and delivered to a display
//! consumer as an edit script.
//!
//! - `ProductListModel`: query plus the derived product list
//! - `ProductDetailModel`: one product and its comments
//! - `ListBinding`: drives a `ListUpdateCallback` from an observable list
//! - `Catalog`: the composition root built from a `Config`
//!
//! # Example
//!
//! ```rust
//! use vitrine_catalog::Catalog;
//! use vitrine_core::Product;
//!
//! let catalog = Catalog::in_memory();
//! let list = catalog.product_list();
//!
//! catalog.store().populate(
//!     vec![
//!         Product::new(1, "Desk lamp", "Warm light", 25),
//!         Product::new(2, "Oak chair", "Solid oak", 80),
//!     ],
//!     Vec::new(),
//! );
//! assert_eq!(list.products().get().map(|l| l.len()), Some(2));
//!
//! list.set_query("lamp").unwrap();
//! assert_eq!(list.products().get().map(|l| l.len()), Some(1));
//! ```

mod app;
mod binding;
mod detail_model;
mod list_model;

pub use app::Catalog;
pub use binding::ListBinding;
pub use detail_model::ProductDetailModel;
pub use list_model::{ProductListModel, QUERY_KEY};
