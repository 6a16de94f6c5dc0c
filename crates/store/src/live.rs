//! Live queries.
//!
//! A live query re-executes against the tables whenever a table it depends
//! on changes, and only notifies its observable when the result actually
//! differs from the one it holds. The registry keeps a non-owning handle to
//! each query's observable; queries whose observables were dropped are
//! pruned on the next change to their table or the next registration.

use crate::tables::{TableId, Tables};
use hashbrown::HashMap;
use std::cell::RefCell;
use std::rc::Rc;
use vitrine_reactive::{Observable, WeakObservable};

/// A re-executable query bound to an output observable.
pub(crate) trait LiveQuery {
    /// Re-executes the query. Returns false once the output is gone.
    fn refresh(&self, tables: &RefCell<Tables>) -> bool;

    /// Returns true while the output is alive.
    fn is_alive(&self) -> bool;
}

/// A query whose result is compared by value before notifying.
pub(crate) struct ReQuery<R> {
    output: WeakObservable<R>,
    query: Box<dyn Fn(&Tables) -> R>,
}

impl<R: Clone + PartialEq + 'static> ReQuery<R> {
    pub(crate) fn new<F>(output: &Observable<R>, query: F) -> Self
    where
        F: Fn(&Tables) -> R + 'static,
    {
        Self {
            output: output.downgrade(),
            query: Box::new(query),
        }
    }
}

impl<R: Clone + PartialEq + 'static> LiveQuery for ReQuery<R> {
    fn refresh(&self, tables: &RefCell<Tables>) -> bool {
        let Some(output) = self.output.upgrade() else {
            return false;
        };
        // The borrow ends before subscribers run, so they may query or
        // mutate the store.
        let result = (self.query)(&tables.borrow());
        if output.get().as_ref() != Some(&result) {
            output.set(result);
        }
        true
    }

    fn is_alive(&self) -> bool {
        self.output.upgrade().is_some()
    }
}

/// Routes table changes to the live queries depending on them.
#[derive(Default)]
pub(crate) struct QueryRegistry {
    queries: HashMap<TableId, Vec<Rc<dyn LiveQuery>>>,
}

impl QueryRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a query with every table it reads, dropping dead queries
    /// on those tables first.
    pub(crate) fn register(&mut self, query: Rc<dyn LiveQuery>, tables: &[TableId]) {
        for table in tables {
            let queries = self.queries.entry(*table).or_default();
            queries.retain(|q| q.is_alive());
            queries.push(query.clone());
        }
    }

    /// Returns the queries depending on `table`, dropping dead ones first.
    pub(crate) fn dependents(&mut self, table: TableId) -> Vec<Rc<dyn LiveQuery>> {
        match self.queries.get_mut(&table) {
            Some(queries) => {
                queries.retain(|q| q.is_alive());
                queries.clone()
            }
            None => Vec::new(),
        }
    }

    /// Returns the number of live queries registered with `table`.
    pub(crate) fn count(&self, table: TableId) -> usize {
        self.queries
            .get(&table)
            .map_or(0, |queries| queries.iter().filter(|q| q.is_alive()).count())
    }

    /// Number of entries held for `table`, dead ones included.
    #[cfg(test)]
    pub(crate) fn retained(&self, table: TableId) -> usize {
        self.queries.get(&table).map_or(0, Vec::len)
    }
}
