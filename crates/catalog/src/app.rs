//! Composition root.
//!
//! `Catalog` wires one store, one repository and one saved state from a
//! `Config`, and hands out models and bindings built on them.

use crate::binding::ListBinding;
use crate::detail_model::ProductDetailModel;
use crate::list_model::ProductListModel;
use std::path::Path;
use std::rc::Rc;
use vitrine_core::{Config, Identified, ProductId, Result, Snapshot};
use vitrine_diff::{BackgroundDiffer, ListUpdateCallback};
use vitrine_reactive::Observable;
use vitrine_store::{CatalogStore, Repository, SavedState};

/// The shared catalog services of one process.
pub struct Catalog {
    config: Config,
    store: Rc<CatalogStore>,
    repository: Rc<Repository>,
    state: Rc<SavedState>,
}

impl Catalog {
    /// Builds the catalog described by `config`, reopening its saved state.
    pub fn open(config: Config) -> Result<Self> {
        let state = match &config.state_file {
            Some(path) => SavedState::open(path)?,
            None => SavedState::in_memory(),
        };
        let store = Rc::new(CatalogStore::with_search_config(config.search.clone()));
        let repository = Rc::new(Repository::new(store.clone()));
        tracing::debug!(
            state_file = ?config.state_file,
            case_sensitive = config.search.case_sensitive,
            "catalog opened"
        );
        Ok(Self {
            config,
            store,
            repository,
            state: Rc::new(state),
        })
    }

    /// Loads a TOML configuration file and opens the catalog it describes.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(Config::load(path)?)
    }

    /// A catalog with default settings and in-memory state.
    pub fn in_memory() -> Self {
        let store = Rc::new(CatalogStore::new());
        Self {
            config: Config::default(),
            repository: Rc::new(Repository::new(store.clone())),
            store,
            state: Rc::new(SavedState::in_memory()),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &Rc<CatalogStore> {
        &self.store
    }

    #[inline]
    pub fn repository(&self) -> &Rc<Repository> {
        &self.repository
    }

    #[inline]
    pub fn state(&self) -> &Rc<SavedState> {
        &self.state
    }

    /// A product list model over the shared repository and state.
    pub fn product_list(&self) -> ProductListModel {
        ProductListModel::new(self.repository.clone(), self.state.clone())
    }

    pub fn product_detail(&self, product_id: ProductId) -> ProductDetailModel {
        ProductDetailModel::new(self.repository.as_ref(), product_id)
    }

    /// A background differ using the configured threshold.
    pub fn list_differ<T>(&self) -> Result<BackgroundDiffer<T>>
    where
        T: Identified + Send + Sync + 'static,
    {
        BackgroundDiffer::with_threshold(self.config.diff.background_threshold)
    }

    /// Binds `consumer` to `list` through a configured background differ.
    pub fn bind<T, C>(&self, list: &Observable<Snapshot<T>>, consumer: C) -> Result<ListBinding<T, C>>
    where
        T: Identified + Send + Sync + 'static,
        C: ListUpdateCallback + 'static,
    {
        Ok(ListBinding::new(list, self.list_differ()?, consumer))
    }
}
