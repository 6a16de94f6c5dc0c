//! End-to-end tests: saved query, live store, reconciliation, consumer.

use std::time::Duration;
use vitrine_catalog::{Catalog, QUERY_KEY};
use vitrine_core::{Config, Product};
use vitrine_diff::ListUpdateCallback;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Rows as a display would keep them. Inserted rows arrive unbound and are
/// filled in by `bind`, the way an adapter binds new rows by position.
#[derive(Default)]
struct Screen {
    rows: Vec<Option<u64>>,
    changes: usize,
}

impl ListUpdateCallback for Screen {
    fn on_inserted(&mut self, position: usize, count: usize) {
        for i in 0..count {
            self.rows.insert(position + i, None);
        }
    }
    fn on_removed(&mut self, position: usize, count: usize) {
        self.rows.drain(position..position + count);
    }
    fn on_moved(&mut self, from: usize, to: usize) {
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
    }
    fn on_changed(&mut self, _position: usize, count: usize) {
        self.changes += count;
    }
}

impl Screen {
    fn bind(&mut self, list: &[Product]) {
        for (row, product) in self.rows.iter_mut().zip(list) {
            row.get_or_insert(product.id);
        }
    }
}

fn products() -> Vec<Product> {
    vec![
        Product::new(1, "Desk lamp", "Warm light", 25),
        Product::new(2, "Oak chair", "Solid oak", 80),
        Product::new(3, "Lamp shade", "Linen", 12),
        Product::new(4, "Oak table", "Seats six", 300),
    ]
}

#[test]
fn test_query_survives_restart() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        state_file: Some(dir.path().join("state.json")),
        ..Config::default()
    };

    {
        let catalog = Catalog::open(config.clone()).unwrap();
        catalog.store().populate(products(), Vec::new());
        let list = catalog.product_list();
        list.set_query("oak").unwrap();
        assert_eq!(list.products().get().map(|l| l.len()), Some(2));
    }

    let catalog = Catalog::open(config).unwrap();
    assert_eq!(catalog.state().get(QUERY_KEY), Some("oak".into()));

    let list = catalog.product_list();
    assert!(!list.products().is_set());
    catalog.store().populate(products(), Vec::new());
    let ids: Vec<u64> = list
        .products()
        .get()
        .map(|l| l.iter().map(|p| p.id).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![2, 4]);
}

#[test]
fn test_screen_follows_query_and_store() {
    init_tracing();
    let catalog = Catalog::in_memory();
    let list = catalog.product_list();
    let binding = catalog.bind(&list.products(), Screen::default()).unwrap();
    assert!(binding.is_loading());

    catalog.store().populate(products(), Vec::new());
    assert!(!binding.is_loading());
    assert_eq!(binding.len(), 4);
    let shown: Vec<Product> = list.products().get().map(|l| l.to_vec()).unwrap_or_default();
    binding.with_consumer_mut(|screen| screen.bind(&shown));
    binding.with_consumer(|screen| {
        assert_eq!(screen.rows, vec![Some(1), Some(2), Some(3), Some(4)])
    });

    list.set_query("lamp").unwrap();
    assert_eq!(binding.len(), 2);
    assert_eq!(binding.item_id(0), Some(1));
    assert_eq!(binding.item_id(1), Some(3));
    binding.with_consumer(|screen| assert_eq!(screen.rows, vec![Some(1), Some(3)]));

    // A price change on a visible row is a single change
    catalog
        .store()
        .upsert_product(Product::new(3, "Lamp shade", "Linen", 14));
    binding.with_consumer(|screen| {
        assert_eq!(screen.changes, 1);
        assert_eq!(screen.rows.len(), 2);
    });

    list.set_query("").unwrap();
    assert_eq!(binding.len(), 4);
    binding.with_consumer(|screen| {
        assert_eq!(screen.rows, vec![Some(1), None, Some(3), None]);
    });
    let shown: Vec<Product> = list.products().get().map(|l| l.to_vec()).unwrap_or_default();
    binding.with_consumer_mut(|screen| screen.bind(&shown));
    binding.with_consumer(|screen| {
        assert_eq!(screen.rows, vec![Some(1), Some(2), Some(3), Some(4)]);
    });
}

#[test]
fn test_large_lists_diff_in_background() {
    init_tracing();
    let config = Config::from_toml_str("[diff]\nbackground_threshold = 8").unwrap();
    let catalog = Catalog::open(config).unwrap();
    let catalog_products: Vec<Product> = (0..20)
        .map(|id| Product::new(id, format!("Item {id}"), if id % 2 == 0 { "even" } else { "odd" }, 1))
        .collect();

    let list = catalog.product_list();
    let binding = catalog.bind(&list.products(), Screen::default()).unwrap();
    catalog.store().populate(catalog_products, Vec::new());
    // First population is applied inline
    assert_eq!(binding.len(), 20);

    list.set_query("odd").unwrap();
    list.set_query("even").unwrap();
    assert!(binding.has_pending());

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while binding.has_pending() && std::time::Instant::now() < deadline {
        binding.wait(Duration::from_millis(100)).unwrap();
    }
    assert!(!binding.has_pending());
    assert_eq!(binding.len(), 10);
    assert_eq!(binding.item_id(0), Some(0));
    binding.with_consumer(|screen| assert_eq!(screen.rows.len(), 10));
}
