//! The repository fronting the catalog store.

use crate::catalog_store::CatalogStore;
use crate::source::CatalogSource;
use std::rc::Rc;
use vitrine_core::{Comment, Product, ProductId, Snapshot};
use vitrine_reactive::{switch_map, Observable, SwitchMap};

/// Single entry point to catalog data.
///
/// The all-products stream is shared and gated on the store's populated
/// flag: it stays unset until the first `populate`, whatever the store
/// holds before that.
pub struct Repository {
    store: Rc<CatalogStore>,
    products: SwitchMap<Snapshot<Product>>,
}

impl Repository {
    pub fn new(store: Rc<CatalogStore>) -> Self {
        let source = store.clone();
        let products = switch_map(&store.populated(), move |ready: &bool| {
            if *ready {
                source.all_products()
            } else {
                Observable::new()
            }
        });
        Self { store, products }
    }

    /// The underlying store, for loading and mutating data.
    #[inline]
    pub fn store(&self) -> &Rc<CatalogStore> {
        &self.store
    }

    /// Observable flag that turns true once the catalog has loaded.
    pub fn is_loaded(&self) -> Observable<bool> {
        self.store.populated()
    }
}

impl CatalogSource for Repository {
    fn all_products(&self) -> Observable<Snapshot<Product>> {
        self.products.output().clone()
    }

    fn product_by_id(&self, id: ProductId) -> Observable<Option<Product>> {
        self.store.product_by_id(id)
    }

    fn search_products(&self, pattern: &str) -> Observable<Snapshot<Product>> {
        self.store.search_products(pattern)
    }

    fn comments_for(&self, product_id: ProductId) -> Observable<Snapshot<Comment>> {
        self.store.comments_for(product_id)
    }
}
