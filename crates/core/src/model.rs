//! Catalog entities.
//!
//! Entities carry a stable identity plus display fields. Identity never
//! changes for the lifetime of an entity; display fields may differ between
//! two snapshots of the same entity.

use std::sync::Arc;
use std::hash::Hash;
use serde::{Deserialize, Serialize};

/// Unique identifier for a product.
pub type ProductId = u64;

/// Unique identifier for a comment.
pub type CommentId = u64;

/// An immutable, ordered, point-in-time result set.
pub type Snapshot<T> = Arc<[T]>;

/// An entity with a stable identity and comparable display content.
///
/// Two values are the same entity iff their ids are equal. Two values of the
/// same entity are unchanged iff `same_content` holds.
pub trait Identified {
    /// The identity type. Comparison must be O(1).
    type Id: Copy + Eq + Hash + std::fmt::Debug;

    /// Returns the stable identity.
    fn id(&self) -> Self::Id;

    /// Returns true if every displayed field equals `other`'s.
    fn same_content(&self, other: &Self) -> bool;
}

/// A catalog product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: u32,
}

impl Product {
    /// Creates a new product.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
        }
    }
}

impl Identified for Product {
    type Id = ProductId;

    #[inline]
    fn id(&self) -> ProductId {
        self.id
    }

    fn same_content(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.description == other.description
            && self.price == other.price
    }
}

/// A comment left on a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub product_id: ProductId,
    pub text: String,
    /// Unix timestamp in milliseconds.
    pub posted_at: i64,
}

impl Comment {
    /// Creates a new comment.
    pub fn new(id: CommentId, product_id: ProductId, text: impl Into<String>, posted_at: i64) -> Self {
        Self {
            id,
            product_id,
            text: text.into(),
            posted_at,
        }
    }
}

impl Identified for Comment {
    type Id = CommentId;

    #[inline]
    fn id(&self) -> CommentId {
        self.id
    }

    fn same_content(&self, other: &Self) -> bool {
        self == other
    }
}
