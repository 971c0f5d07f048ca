use std::fs;

use inventory_backend::domain::commands::inventory::{AddProductCommand, UpdateProductCommand};
use inventory_backend::{
    Backend, InventoryConfig, InventoryStore, ProductChanges, ProductField, ProductRecord,
    ProductStorage, StoreError,
};
use tempfile::TempDir;

fn product(id: &str, name: &str, quantity: i64, price: f64) -> ProductRecord {
    ProductRecord::new(id, name, quantity, price).unwrap()
}

fn snapshot(store: &InventoryStore) -> Vec<(String, String, u64, f64)> {
    store
        .list_products()
        .into_iter()
        .map(|p| (p.id().to_string(), p.name().to_string(), p.quantity(), p.unit_price()))
        .collect()
}

#[test]
fn reopening_after_changes_reproduces_the_inventory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventario.txt");

    let mut store = InventoryStore::open(&path);
    for record in [
        product("P003", "Goma, blanca", 40, 0.3),
        product("P001", "Lápiz \"HB\"", 120, 0.25),
        product("P002", "Cuaderno", 50, 1.8),
        product("P004", "Regla", 10, 2.0),
    ] {
        assert!(store.add_product(record).unwrap().is_synced());
    }

    let outcome = store
        .update_product(
            "P002",
            ProductChanges {
                quantity: Some(45),
                unit_price: Some(1.956),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(outcome.sync.is_synced());
    assert!(store.remove_product("P004").unwrap().sync.is_synced());

    let before = snapshot(&store);
    let reopened = InventoryStore::open(&path);

    assert!(reopened.diagnostics().is_empty());
    assert_eq!(snapshot(&reopened), before);
    assert_eq!(reopened.get_product("P001").unwrap().name(), "Lápiz \"HB\"");
    assert_eq!(reopened.get_product("P002").unwrap().unit_price(), 1.96);
}

#[test]
fn duplicate_add_keeps_the_existing_record() {
    let dir = TempDir::new().unwrap();
    let mut store = InventoryStore::open(dir.path().join("inventario.txt"));
    let original = product("A1", "Original", 3, 1.0);
    assert!(store.add_product(original.clone()).unwrap().is_synced());

    let err = store.add_product(product("A1", "Otro", 99, 9.99)).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { ref id } if id == "A1"));
    assert_eq!(store.get_product("A1"), Some(&original));
}

#[test]
fn negative_quantity_update_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut store = InventoryStore::open(dir.path().join("inventario.txt"));
    assert!(store.add_product(product("A1", "Item", 3, 1.0)).unwrap().is_synced());

    let err = store
        .update_product(
            "A1",
            ProductChanges {
                quantity: Some(-1),
                ..Default::default()
            },
        )
        .unwrap_err();

    match err {
        StoreError::InvalidValue(rejected) => {
            assert_eq!(rejected.len(), 1);
            assert_eq!(rejected[0].field, ProductField::Quantity);
        }
        other => panic!("expected InvalidValue, got {:?}", other),
    }
    assert_eq!(store.get_product("A1").unwrap().quantity(), 3);
}

#[test]
fn corrupt_file_loads_the_valid_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventario.txt");
    fs::write(
        &path,
        "id,nombre,cantidad,precio\nX01,ItemBien,5,1.50\nX02,ItemMal,abc,3.0\n,,10,\n",
    )
    .unwrap();

    let store = InventoryStore::open(&path);

    assert_eq!(store.len(), 1);
    let kept = store.get_product("X01").unwrap();
    assert_eq!(kept.quantity(), 5);
    assert_eq!(kept.unit_price(), 1.5);
    assert_eq!(store.diagnostics().len(), 2);
    assert!(store.get_product("X02").is_none());
    assert!(store.get_product("").is_none());
    assert!(!store.is_read_only());
}

#[test]
fn fresh_path_starts_empty_and_writable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nuevo").join("inventario.txt");

    let store = InventoryStore::open(&path);

    assert!(store.is_empty());
    assert!(store.diagnostics().is_empty());
    assert!(!store.is_read_only());
    assert_eq!(fs::read_to_string(&path).unwrap(), "id,nombre,cantidad,precio\n");
}

#[test]
fn failed_save_still_updates_memory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventario.txt");
    let mut store = InventoryStore::open(&path);

    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    let sync = store.add_product(product("A1", "Item", 1, 0.5)).unwrap();
    assert!(!sync.is_synced());
    assert!(sync.warning().is_some());
    assert_eq!(store.get_product("A1").unwrap().name(), "Item");
}

#[test]
fn backend_wires_services_to_the_configured_file() {
    let dir = TempDir::new().unwrap();
    let config = InventoryConfig {
        data_file: dir.path().join("inventario.txt"),
        log_level: "warn".to_string(),
    };

    let mut backend = Backend::new(&config);
    let added = backend
        .inventory_service
        .add_product(AddProductCommand {
            id: "B1".to_string(),
            name: "Borrador".to_string(),
            quantity: 7,
            unit_price: 0.75,
        })
        .unwrap();
    assert!(added.sync.is_synced());

    let updated = backend
        .inventory_service
        .update_product(UpdateProductCommand {
            id: "B1".to_string(),
            quantity: Some(-2),
            unit_price: Some(0.8),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(updated.rejected.len(), 1);
    assert_eq!(updated.record.quantity(), 7);
    assert_eq!(updated.record.unit_price(), 0.8);

    let export_path = dir.path().join("copia.json");
    let exported = backend
        .export_service
        .export_json(backend.inventory_service.storage(), &export_path)
        .unwrap();
    assert_eq!(exported, 1);

    let reopened = Backend::new(&config);
    assert!(reopened.diagnostics().is_empty());
    assert_eq!(reopened.inventory_service.status().record_count, 1);
}

#[cfg(unix)]
#[test]
fn saving_keeps_the_file_mode_of_a_fresh_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventario.txt");
    let mut store = InventoryStore::open(&path);
    let before = fs::metadata(&path).unwrap().permissions().mode() & 0o777;

    assert!(store.add_product(product("A1", "Item", 1, 0.5)).unwrap().is_synced());

    let after = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(after, before);
}
