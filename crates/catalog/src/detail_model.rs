//! The product detail model.

use vitrine_core::{Comment, Product, ProductId, Snapshot};
use vitrine_reactive::Observable;
use vitrine_store::CatalogSource;

/// One product and its comments.
pub struct ProductDetailModel {
    product_id: ProductId,
    product: Observable<Option<Product>>,
    comments: Observable<Snapshot<Comment>>,
}

impl ProductDetailModel {
    pub fn new<S: CatalogSource + ?Sized>(source: &S, product_id: ProductId) -> Self {
        tracing::debug!(product_id, "opening product detail");
        Self {
            product_id,
            product: source.product_by_id(product_id),
            comments: source.comments_for(product_id),
        }
    }

    #[inline]
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Unset while loading, `None` if the product does not exist.
    pub fn product(&self) -> Observable<Option<Product>> {
        self.product.clone()
    }

    /// Comments, oldest first.
    pub fn comments(&self) -> Observable<Snapshot<Comment>> {
        self.comments.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_store::CatalogStore;

    #[test]
    fn test_detail_follows_store() {
        let store = CatalogStore::new();
        let model = ProductDetailModel::new(&store, 1);
        assert_eq!(model.product_id(), 1);
        assert!(!model.product().is_set());
        assert!(!model.comments().is_set());

        store.populate(
            vec![Product::new(1, "Lamp", "Warm", 20)],
            vec![Comment::new(2, 1, "later", 50), Comment::new(1, 1, "first", 10)],
        );
        assert_eq!(model.product().get().flatten().map(|p| p.price), Some(20));
        let texts: Vec<String> = model
            .comments()
            .get()
            .map(|c| c.iter().map(|c| c.text.clone()).collect())
            .unwrap_or_default();
        assert_eq!(texts, vec!["first", "later"]);

        store.upsert_product(Product::new(1, "Lamp", "Warm", 18));
        assert_eq!(model.product().get().flatten().map(|p| p.price), Some(18));

        store.remove_product(1);
        assert_eq!(model.product().get(), Some(None));
        assert_eq!(model.comments().get().map(|c| c.len()), Some(0));
    }

    #[test]
    fn test_missing_product_is_none_once_loaded() {
        let store = CatalogStore::new();
        store.populate(Vec::new(), Vec::new());

        let model = ProductDetailModel::new(&store, 404);
        assert_eq!(model.product().get(), Some(None));
        assert_eq!(model.comments().get().map(|c| c.len()), Some(0));
    }
}
