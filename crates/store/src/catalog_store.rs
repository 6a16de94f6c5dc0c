//! In-memory catalog with live queries.
//!
//! `CatalogStore` owns the product and comment tables and hands out live
//! query observables. Every mutation re-executes the queries that read the
//! touched table. Until `populate` has been called, live observables stay
//! unset so consumers can tell "still loading" from "no rows".

use crate::live::{LiveQuery, QueryRegistry, ReQuery};
use crate::source::CatalogSource;
use crate::tables::{TableId, Tables};
use std::cell::RefCell;
use std::rc::Rc;
use vitrine_core::{Comment, Product, ProductId, SearchConfig, SearchPattern, Snapshot};
use vitrine_reactive::Observable;

/// A live, in-memory product catalog.
///
/// Mutations take `&self`, so the store can be shared as `Rc<CatalogStore>`
/// between the repository and whatever loads data into it.
///
/// # Example
///
/// ```
/// use vitrine_core::Product;
/// use vitrine_store::{CatalogSource, CatalogStore};
///
/// let store = CatalogStore::new();
/// let lamps = store.search_products("*lamp*");
/// assert!(!lamps.is_set());
///
/// store.populate(vec![Product::new(1, "Desk lamp", "", 25)], Vec::new());
/// assert_eq!(lamps.get().map(|l| l.len()), Some(1));
///
/// store.upsert_product(Product::new(2, "Floor lamp", "", 40));
/// assert_eq!(lamps.get().map(|l| l.len()), Some(2));
/// ```
pub struct CatalogStore {
    tables: RefCell<Tables>,
    registry: RefCell<QueryRegistry>,
    populated: Observable<bool>,
    search: SearchConfig,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::with_search_config(SearchConfig::default())
    }
}

impl CatalogStore {
    /// Creates an empty, unpopulated store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store using the given search settings.
    pub fn with_search_config(search: SearchConfig) -> Self {
        Self {
            tables: RefCell::new(Tables::new()),
            registry: RefCell::new(QueryRegistry::new()),
            populated: Observable::with_value(false),
            search,
        }
    }

    /// Observable flag that turns true once the store has been populated.
    pub fn populated(&self) -> Observable<bool> {
        self.populated.clone()
    }

    #[inline]
    pub fn is_populated(&self) -> bool {
        self.populated.get().unwrap_or(false)
    }

    /// Runs `f` with read access to the tables.
    pub fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        f(&self.tables.borrow())
    }

    /// Returns the number of live queries reading `table`.
    pub fn live_query_count(&self, table: TableId) -> usize {
        self.registry.borrow().count(table)
    }

    // Mutations

    /// Replaces the whole catalog and marks the store populated.
    pub fn populate(&self, products: Vec<Product>, comments: Vec<Comment>) {
        tracing::debug!(
            products = products.len(),
            comments = comments.len(),
            "populating catalog"
        );
        self.tables.borrow_mut().replace(products, comments);
        if !self.is_populated() {
            self.populated.set(true);
        }
        self.notify(&[TableId::Products, TableId::Comments]);
    }

    /// Inserts or replaces a product. Returns the previous version.
    pub fn upsert_product(&self, product: Product) -> Option<Product> {
        let id = product.id;
        let previous = self.tables.borrow_mut().upsert_product(product);
        tracing::trace!(id, replaced = previous.is_some(), "upserted product");
        self.notify(&[TableId::Products]);
        previous
    }

    /// Removes a product together with its comments.
    pub fn remove_product(&self, id: ProductId) -> Option<Product> {
        let removed = self.tables.borrow_mut().remove_product(id);
        let (product, comments) = removed?;
        tracing::trace!(id, comments, "removed product");
        if comments > 0 {
            self.notify(&[TableId::Products, TableId::Comments]);
        } else {
            self.notify(&[TableId::Products]);
        }
        Some(product)
    }

    /// Adds or replaces a comment. Comments on unknown products are
    /// rejected and `false` is returned.
    pub fn add_comment(&self, comment: Comment) -> bool {
        let (id, product_id) = (comment.id, comment.product_id);
        let accepted = self.tables.borrow_mut().insert_comment(comment);
        if !accepted {
            tracing::warn!(id, product_id, "comment rejected: unknown product");
            return false;
        }
        self.notify(&[TableId::Comments]);
        true
    }

    // Live queries

    fn live<R, F>(&self, reads: &[TableId], query: F) -> Observable<R>
    where
        R: Clone + PartialEq + 'static,
        F: Fn(&Tables) -> R + 'static,
    {
        let output = Observable::new();
        let live = Rc::new(ReQuery::new(&output, query));
        if self.is_populated() {
            live.refresh(&self.tables);
        }
        self.registry.borrow_mut().register(live, reads);
        output
    }

    fn notify(&self, tables: &[TableId]) {
        if !self.is_populated() {
            return;
        }
        for table in tables {
            let dependents = self.registry.borrow_mut().dependents(*table);
            tracing::trace!(?table, queries = dependents.len(), "re-executing live queries");
            for query in dependents {
                query.refresh(&self.tables);
            }
        }
    }
}

impl CatalogSource for CatalogStore {
    fn all_products(&self) -> Observable<Snapshot<Product>> {
        self.live(&[TableId::Products], Tables::all_products)
    }

    fn product_by_id(&self, id: ProductId) -> Observable<Option<Product>> {
        self.live(&[TableId::Products], move |tables| tables.product(id).cloned())
    }

    fn search_products(&self, pattern: &str) -> Observable<Snapshot<Product>> {
        let pattern = SearchPattern::new(pattern, self.search.case_sensitive);
        tracing::debug!(pattern = pattern.as_str(), "live product search");
        self.live(&[TableId::Products], move |tables| tables.search_products(&pattern))
    }

    fn comments_for(&self, product_id: ProductId) -> Observable<Snapshot<Comment>> {
        self.live(&[TableId::Comments], move |tables| tables.comments_for(product_id))
    }
}
