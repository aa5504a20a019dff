//! Cart state manager.
//!
//! The cart is an ordered list of [`CartItem`]s mirrored to durable storage
//! under [`keys::CART`]. Memory is the source of truth: every mutation
//! rewrites the full snapshot, and a failed write is logged but never rolls
//! back the in-memory change.
//!
//! Count and total are computed on every call and never stored.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cloud_kitchen_core::{DishId, Price};

use crate::models::{Dish, NewOrderLine};
use crate::storage::{KeyValueStore, keys};

/// Flat delivery charge added to any non-empty cart.
pub const DELIVERY_FEE_RUPEES: u32 = 40;

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: DishId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// A fresh line for `dish` with quantity 1.
    #[must_use]
    pub fn from_dish(dish: &Dish) -> Self {
        Self {
            id: dish.id.clone(),
            name: dish.name.clone(),
            image: dish.image.clone(),
            description: dish.description.clone(),
            price: dish.price,
            quantity: 1,
        }
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl From<&CartItem> for NewOrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            dish_id: item.id.clone(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Why a stored cart snapshot was discarded.
#[derive(Debug, Error)]
pub enum CartDecodeError {
    #[error("cart is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cart item {0} has quantity 0")]
    ZeroQuantity(DishId),

    #[error("cart contains item {0} more than once")]
    DuplicateItem(DishId),
}

/// Decode a stored cart snapshot, checking the item invariants.
///
/// Negative prices are rejected while deserialising [`Price`].
///
/// # Errors
///
/// Returns `CartDecodeError` if the payload is malformed or violates an
/// invariant.
pub fn decode_cart(raw: &str) -> Result<Vec<CartItem>, CartDecodeError> {
    let items: Vec<CartItem> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if item.quantity == 0 {
            return Err(CartDecodeError::ZeroQuantity(item.id.clone()));
        }
        if !seen.insert(&item.id) {
            return Err(CartDecodeError::DuplicateItem(item.id.clone()));
        }
    }
    Ok(items)
}

/// Totals shown on the cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

/// The cart state manager.
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    items: Vec<CartItem>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart from durable storage.
    ///
    /// Absent, unreadable or corrupt data yields an empty cart; the problem
    /// is logged and the stored value is left for the next write to replace.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let items = match storage.get(keys::CART) {
            Ok(Some(raw)) => decode_cart(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding corrupt cart from storage");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart from storage");
                Vec::new()
            }
        };
        tracing::debug!(lines = items.len(), "Cart loaded");
        Self { storage, items }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `dish`: bump the existing line or append a new one.
    pub fn add_to_cart(&mut self, dish: &Dish) {
        self.add_item(CartItem::from_dish(dish));
    }

    /// Add one unit of an already-built line; its `quantity` is ignored.
    pub fn add_item(&mut self, item: CartItem) {
        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem { quantity: 1, ..item });
        }
        self.persist();
    }

    /// Remove the line for `id`. Unknown ids are a no-op.
    pub fn remove_from_cart(&mut self, id: &DishId) {
        self.items.retain(|line| &line.id != id);
        self.persist();
    }

    /// Change a line's quantity by `delta`, never going below 1.
    ///
    /// Unknown ids are a no-op.
    pub fn update_quantity(&mut self, id: &DishId, delta: i64) {
        if let Some(line) = self.items.iter_mut().find(|line| &line.id == id) {
            line.quantity = apply_delta(line.quantity, delta);
        }
        self.persist();
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity` across all lines.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        let subtotal = self.cart_total();
        let delivery_fee = if self.items.is_empty() {
            Price::ZERO
        } else {
            Price::from_rupees(DELIVERY_FEE_RUPEES)
        };
        CartSummary {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }

    fn persist(&self) {
        let snapshot = match serde_json::to_string(&self.items) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode cart");
                return;
            }
        };
        if let Err(e) = self.storage.set(keys::CART, &snapshot) {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }
}

fn apply_delta(quantity: u32, delta: i64) -> u32 {
    let next = i64::from(quantity).saturating_add(delta).max(1);
    u32::try_from(next).unwrap_or(u32::MAX)
}
