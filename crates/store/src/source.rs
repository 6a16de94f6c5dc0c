//! The data-access contract the catalog pipeline consumes.

use std::rc::Rc;
use vitrine_core::{Comment, Product, ProductId, Snapshot};
use vitrine_reactive::Observable;

/// Produces live catalog query results.
///
/// Every returned observable is unset until the data has loaded, then holds
/// the current result and follows later changes. A query with no matches
/// yields an empty snapshot, never an error.
pub trait CatalogSource {
    /// Every product.
    fn all_products(&self) -> Observable<Snapshot<Product>>;

    /// One product; `None` once loaded if the id does not exist.
    fn product_by_id(&self, id: ProductId) -> Observable<Option<Product>>;

    /// Products whose name or description matches a `*` wildcard pattern.
    fn search_products(&self, pattern: &str) -> Observable<Snapshot<Product>>;

    /// Comments on one product, oldest first.
    fn comments_for(&self, product_id: ProductId) -> Observable<Snapshot<Comment>>;
}

impl<S: CatalogSource + ?Sized> CatalogSource for Rc<S> {
    fn all_products(&self) -> Observable<Snapshot<Product>> {
        (**self).all_products()
    }

    fn product_by_id(&self, id: ProductId) -> Observable<Option<Product>> {
        (**self).product_by_id(id)
    }

    fn search_products(&self, pattern: &str) -> Observable<Snapshot<Product>> {
        (**self).search_products(pattern)
    }

    fn comments_for(&self, product_id: ProductId) -> Observable<Snapshot<Comment>> {
        (**self).comments_for(product_id)
    }
}
