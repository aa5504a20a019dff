//! Integration tests for the durable cart.
//!
//! The cart lives in a `FileStore`, so it must survive a restart, shrug off
//! corrupt data and stay put when the customer signs out.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use cloud_kitchen_client::cart::CartStore;
use cloud_kitchen_client::models::Dish;
use cloud_kitchen_client::storage::{FileStore, KeyValueStore, keys};
use cloud_kitchen_core::{DishId, Price};

fn dish(id: &str, name: &str, price: u32) -> Dish {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "name": name,
        "price": price,
        "category": "Main Course",
        "type": "Veg"
    }))
    .unwrap()
}

fn open(path: &std::path::Path) -> CartStore {
    CartStore::load(Arc::new(FileStore::open(path).unwrap()))
}

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let mut cart = open(&path);
        cart.add_to_cart(&dish("d1", "Dal Makhani", 180));
        cart.add_to_cart(&dish("d2", "Butter Naan", 45));
        cart.add_to_cart(&dish("d1", "Dal Makhani", 180));
        cart.update_quantity(&DishId::new("d2"), 2);
    }

    let cart = open(&path);
    let lines: Vec<(&str, u32)> = cart
        .items()
        .iter()
        .map(|item| (item.id.as_str(), item.quantity))
        .collect();
    assert_eq!(lines, [("d1", 2), ("d2", 3)]);
    assert_eq!(cart.cart_count(), 5);

    let summary = cart.summary();
    assert_eq!(summary.subtotal, Price::from_rupees(495));
    assert_eq!(summary.total, Price::from_rupees(535));
}

#[test]
fn test_cleared_cart_stays_empty_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut cart = open(&path);
    cart.add_to_cart(&dish("d1", "Dal Makhani", 180));
    cart.clear_cart();

    assert!(open(&path).is_empty());
}

#[test]
fn test_stored_format_is_a_plain_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut cart = open(&path);
    cart.add_to_cart(&dish("d1", "Dal Makhani", 180));

    let store = FileStore::open(&path).unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&store.get(keys::CART).unwrap().unwrap()).unwrap();
    assert_eq!(raw[0]["id"], "d1");
    assert_eq!(raw[0]["name"], "Dal Makhani");
    assert_eq!(raw[0]["quantity"], 1);
}

#[test]
fn test_corrupt_cart_value_loads_empty_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let store = Arc::new(FileStore::open(&path).unwrap());
    store
        .set(
            keys::CART,
            r#"[{"id":"d1","name":"Dal","price":180,"quantity":0}]"#,
        )
        .unwrap();

    let mut cart = CartStore::load(store);
    assert!(cart.is_empty());

    cart.add_to_cart(&dish("d2", "Jeera Rice", 120));
    let cart = open(&path);
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].id.as_str(), "d2");
}

#[test]
fn test_unreadable_storage_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut cart = open(&path);
    assert!(cart.is_empty());

    cart.add_to_cart(&dish("d1", "Dal Makhani", 180));
    assert_eq!(open(&path).cart_count(), 1);
}
