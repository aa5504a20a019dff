//! Order and admin dashboard types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use cloud_kitchen_core::{DishId, OrderId, OrderStatus, PaymentMethod, Price};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    pub total_amount: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Last six characters of the id, the way order numbers are shown.
    #[must_use]
    pub fn short_id(&self) -> &str {
        let id = self.id.as_str();
        let start = id
            .char_indices()
            .rev()
            .nth(5)
            .map_or(0, |(index, _)| index);
        id.get(start..).unwrap_or(id)
    }
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub dish: DishRef,
    pub quantity: u32,
    pub price: Price,
}

/// The dish an order line points at.
///
/// Depending on the endpoint the backend returns either the bare id or the
/// dish document populated inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DishRef {
    Populated {
        #[serde(rename = "_id")]
        id: DishId,
        name: String,
    },
    Id(DishId),
}

impl DishRef {
    /// The referenced dish id.
    #[must_use]
    pub const fn id(&self) -> &DishId {
        match self {
            Self::Populated { id, .. } | Self::Id(id) => id,
        }
    }

    /// Display label: the dish name when populated, otherwise the id.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Populated { name, .. } => name,
            Self::Id(id) => id.as_str(),
        }
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<NewOrderLine>,
    pub payment_method: PaymentMethod,
}

/// One line of a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLine {
    pub dish_id: DishId,
    pub quantity: u32,
    pub price: Price,
}

/// Admin order list filter.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Only orders in this status; `None` means all.
    pub status: Option<OrderStatus>,
    /// Case-insensitive substring of the order id.
    pub search: Option<String>,
}

impl OrderFilter {
    /// Returns `true` if `order` passes the filter.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        if self.status.is_some_and(|status| status != order.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => order
                .id
                .as_str()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }

    /// Orders that pass the filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|order| self.matches(order)).collect()
    }
}

/// Headline numbers on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub completed_orders: u64,
    pub total_dishes: u64,
}

/// Order count for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOrders {
    #[serde(rename = "_id")]
    pub date: NaiveDate,
    pub count: u64,
}

/// Response of `GET /admin/dashboard`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_orders: Vec<Order>,
    pub orders_by_day: Vec<DailyOrders>,
}

/// Body of `POST /admin/orders/{id}/status`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}
