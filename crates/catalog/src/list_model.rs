//! The product list model.
//!
//! Holds the search query and derives the displayed product list from it.
//! The query lives in `SavedState` under [`QUERY_KEY`], so it survives a
//! restart when the state is file-backed. Each query change drops the
//! previous source subscription and follows a new one: an absent or empty
//! query follows every product, anything else follows a `*query*` search.

use std::rc::Rc;
use vitrine_core::pattern_match::contains_pattern;
use vitrine_core::{Product, Result, Snapshot};
use vitrine_reactive::{switch_map, Observable, SwitchMap};
use vitrine_store::{CatalogSource, SavedState};

/// Saved-state key of the search query.
pub const QUERY_KEY: &str = "QUERY";

/// Search query plus the product list derived from it.
pub struct ProductListModel {
    state: Rc<SavedState>,
    products: SwitchMap<Snapshot<Product>>,
}

impl ProductListModel {
    /// Creates the model, restoring the last saved query.
    pub fn new<S>(source: Rc<S>, state: Rc<SavedState>) -> Self
    where
        S: CatalogSource + ?Sized + 'static,
    {
        let query = state.live(QUERY_KEY);
        let products = switch_map(&query, move |query: &Option<String>| match query.as_deref() {
            None | Some("") => {
                tracing::debug!("following all products");
                source.all_products()
            }
            Some(text) => {
                let pattern = contains_pattern(text);
                tracing::debug!(pattern = %pattern, "following product search");
                source.search_products(&pattern)
            }
        });
        Self { state, products }
    }

    /// Stores and persists a new query, switching the product list to it.
    ///
    /// Fails only if the query cannot be persisted; the displayed list is
    /// left untouched in that case.
    pub fn set_query(&self, text: impl Into<String>) -> Result<()> {
        self.state.set(QUERY_KEY, Some(text.into()))
    }

    /// Removes the query, returning to the full list.
    pub fn clear_query(&self) -> Result<()> {
        self.state.set(QUERY_KEY, None)
    }

    /// The current query, if any.
    pub fn query(&self) -> Option<String> {
        self.state.get(QUERY_KEY)
    }

    /// The product list for the latest query.
    ///
    /// Unset until the first source delivers; afterwards the last list stays
    /// visible across a query change until the new source delivers.
    pub fn products(&self) -> Observable<Snapshot<Product>> {
        self.products.output().clone()
    }

    /// Number of query switches so far, including the initial one.
    pub fn switches(&self) -> u64 {
        self.products.generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use vitrine_core::{Comment, ProductId};

    /// A source handing out unresolved observables and recording requests.
    #[derive(Default)]
    struct ScriptedSource {
        requests: RefCell<Vec<String>>,
        issued: RefCell<Vec<Observable<Snapshot<Product>>>>,
    }

    impl ScriptedSource {
        fn issue(&self, request: String) -> Observable<Snapshot<Product>> {
            self.requests.borrow_mut().push(request);
            let source = Observable::new();
            self.issued.borrow_mut().push(source.clone());
            source
        }

        fn resolve(&self, index: usize, names: &[&str]) {
            let list: Vec<Product> = names
                .iter()
                .enumerate()
                .map(|(i, n)| Product::new(i as u64, *n, "", 1))
                .collect();
            let source = self.issued.borrow()[index].clone();
            source.set(list.into());
        }
    }

    impl CatalogSource for ScriptedSource {
        fn all_products(&self) -> Observable<Snapshot<Product>> {
            self.issue("all".into())
        }
        fn product_by_id(&self, _id: ProductId) -> Observable<Option<Product>> {
            Observable::new()
        }
        fn search_products(&self, pattern: &str) -> Observable<Snapshot<Product>> {
            self.issue(pattern.into())
        }
        fn comments_for(&self, _id: ProductId) -> Observable<Snapshot<Comment>> {
            Observable::new()
        }
    }

    fn names(model: &ProductListModel) -> Option<Vec<String>> {
        model
            .products()
            .get()
            .map(|list| list.iter().map(|p| p.name.clone()).collect())
    }

    #[test]
    fn test_unset_query_follows_all_products() {
        let source = Rc::new(ScriptedSource::default());
        let model = ProductListModel::new(source.clone(), Rc::new(SavedState::in_memory()));

        assert_eq!(*source.requests.borrow(), vec!["all"]);
        assert_eq!(model.query(), None);
        assert!(!model.products().is_set());

        source.resolve(0, &["Lamp", "Desk"]);
        assert_eq!(names(&model), Some(vec!["Lamp".into(), "Desk".into()]));
    }

    #[test]
    fn test_query_issues_contains_pattern() {
        let source = Rc::new(ScriptedSource::default());
        let model = ProductListModel::new(source.clone(), Rc::new(SavedState::in_memory()));

        model.set_query("foo").unwrap();
        assert_eq!(model.query(), Some("foo".into()));
        model.set_query("").unwrap();

        assert_eq!(*source.requests.borrow(), vec!["all", "*foo*", "all"]);
        assert_eq!(model.switches(), 3);
    }

    #[test]
    fn test_last_query_wins() {
        let source = Rc::new(ScriptedSource::default());
        let model = ProductListModel::new(source.clone(), Rc::new(SavedState::in_memory()));

        model.set_query("lamp").unwrap();
        model.set_query("desk").unwrap();

        // The superseded search resolves after the newer one
        source.resolve(2, &["Desk"]);
        source.resolve(1, &["Lamp"]);
        source.resolve(0, &["Everything"]);
        assert_eq!(names(&model), Some(vec!["Desk".into()]));

        for (i, issued) in source.issued.borrow().iter().enumerate() {
            let expected = usize::from(i == 2);
            assert_eq!(issued.subscription_count(), expected, "source {i}");
        }
    }

    #[test]
    fn test_previous_list_kept_until_new_source_delivers() {
        let source = Rc::new(ScriptedSource::default());
        let model = ProductListModel::new(source.clone(), Rc::new(SavedState::in_memory()));
        source.resolve(0, &["Lamp", "Desk"]);

        model.set_query("desk").unwrap();
        assert_eq!(names(&model), Some(vec!["Lamp".into(), "Desk".into()]));

        source.resolve(1, &["Desk"]);
        assert_eq!(names(&model), Some(vec!["Desk".into()]));
    }

    #[test]
    fn test_no_matches_is_empty_not_unset() {
        let source = Rc::new(ScriptedSource::default());
        let model = ProductListModel::new(source.clone(), Rc::new(SavedState::in_memory()));

        model.set_query("sofa").unwrap();
        source.resolve(1, &[]);
        assert_eq!(names(&model), Some(Vec::new()));
    }

    #[test]
    fn test_restores_saved_query() {
        let state = Rc::new(SavedState::in_memory());
        state.set(QUERY_KEY, Some("oak".into())).unwrap();

        let source = Rc::new(ScriptedSource::default());
        let model = ProductListModel::new(source.clone(), state);
        assert_eq!(model.query(), Some("oak".into()));
        assert_eq!(*source.requests.borrow(), vec!["*oak*"]);

        model.clear_query().unwrap();
        assert_eq!(model.query(), None);
        assert_eq!(*source.requests.borrow(), vec!["*oak*", "all"]);
    }

    #[test]
    fn test_repeated_query_does_not_switch() {
        let source = Rc::new(ScriptedSource::default());
        let model = ProductListModel::new(source.clone(), Rc::new(SavedState::in_memory()));

        model.set_query("lamp").unwrap();
        model.set_query("lamp").unwrap();
        assert_eq!(source.requests.borrow().len(), 2);
    }
}
