//! Catalog tables.
//!
//! `Tables` holds the product and comment rows behind a `CatalogStore`.
//! Products are kept ordered by id so every full scan returns them in a
//! stable order.

use hashbrown::HashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use vitrine_core::{Comment, CommentId, Product, ProductId, SearchPattern, Snapshot};

/// Identifies a table for change routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableId {
    Products,
    Comments,
}

/// Product and comment rows.
#[derive(Default)]
pub struct Tables {
    products: BTreeMap<ProductId, Product>,
    comments: HashMap<CommentId, Comment>,
}

impl Tables {
    /// Creates empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of products.
    #[inline]
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Returns the number of comments.
    #[inline]
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.get(&id)
    }

    /// Replaces every row. Later duplicates of an id win.
    pub(crate) fn replace(&mut self, products: Vec<Product>, comments: Vec<Comment>) {
        self.products = products.into_iter().map(|p| (p.id, p)).collect();
        self.comments = comments.into_iter().map(|c| (c.id, c)).collect();
    }

    /// Inserts or replaces a product, returning the previous row.
    pub(crate) fn upsert_product(&mut self, product: Product) -> Option<Product> {
        self.products.insert(product.id, product)
    }

    /// Removes a product and its comments.
    ///
    /// Returns the removed product and how many comments went with it.
    pub(crate) fn remove_product(&mut self, id: ProductId) -> Option<(Product, usize)> {
        let product = self.products.remove(&id)?;
        let before = self.comments.len();
        self.comments.retain(|_, c| c.product_id != id);
        Some((product, before - self.comments.len()))
    }

    /// Inserts or replaces a comment. Returns false if its product does not
    /// exist.
    pub(crate) fn insert_comment(&mut self, comment: Comment) -> bool {
        if !self.products.contains_key(&comment.product_id) {
            return false;
        }
        self.comments.insert(comment.id, comment);
        true
    }

    // Queries

    /// Every product, ordered by id.
    pub fn all_products(&self) -> Snapshot<Product> {
        self.products.values().cloned().collect::<Vec<_>>().into()
    }

    /// Products whose name or description matches `pattern`, ordered by id.
    pub fn search_products(&self, pattern: &SearchPattern) -> Snapshot<Product> {
        self.products
            .values()
            .filter(|p| pattern.matches(&p.name) || pattern.matches(&p.description))
            .cloned()
            .collect::<Vec<_>>()
            .into()
    }

    /// Comments on one product, oldest first, ties broken by id.
    pub fn comments_for(&self, product_id: ProductId) -> Snapshot<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .values()
            .filter(|c| c.product_id == product_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.posted_at.cmp(&b.posted_at).then(a.id.cmp(&b.id)));
        Arc::from(comments)
    }
}
