//! Status enums for orders and dishes.
//!
//! The wire spellings match the backend exactly (`"Out for Delivery"`,
//! `"Non-Veg"`, `"COD"`), so these enums can be used directly in request and
//! response bodies.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Preparing,
        Self::OutForDelivery,
        Self::Completed,
        Self::Cancelled,
    ];

    /// The backend's spelling of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Preparing => "Preparing",
            Self::OutForDelivery => "Out for Delivery",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether the order can still change status.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Statuses the admin order screen offers as next steps.
    #[must_use]
    pub const fn admin_actions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Preparing, Self::Cancelled],
            Self::Preparing => &[Self::Completed, Self::Cancelled],
            Self::OutForDelivery => &[Self::Completed],
            Self::Completed | Self::Cancelled => &[],
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    /// Accepts the backend spelling case-insensitively, plus the
    /// kebab/snake forms that are easier to type on a command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().to_lowercase() == normalized)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// How an order is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Cash on delivery, the only method the client offers.
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CashOnDelivery => f.write_str("Cash on Delivery"),
        }
    }
}

/// Dietary classification of a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DishType {
    Veg,
    #[serde(rename = "Non-Veg")]
    NonVeg,
}

impl DishType {
    /// The backend's spelling of this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Veg => "Veg",
            Self::NonVeg => "Non-Veg",
        }
    }
}

impl fmt::Display for DishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DishType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "veg" => Ok(Self::Veg),
            "non-veg" | "nonveg" => Ok(Self::NonVeg),
            _ => Err(format!("invalid dish type: {s}")),
        }
    }
}
