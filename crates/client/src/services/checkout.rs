//! Checkout: place the cart as a cash-on-delivery order.

use thiserror::Error;
use tracing::instrument;

use cloud_kitchen_core::PaymentMethod;

use crate::api::{ApiError, OrderBackend};
use crate::cart::CartStore;
use crate::error::add_breadcrumb;
use crate::models::{NewOrder, NewOrderLine, Order};

/// Errors from checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("failed to place order: {0}")]
    Api(#[from] ApiError),
}

impl CheckoutError {
    /// A message that is safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::Api(ApiError::Status { message, .. } | ApiError::Rejected(message))
                if !message.is_empty() =>
            {
                message.clone()
            }
            Self::Api(_) => "Failed to place order. Please try again.".to_string(),
        }
    }
}

/// The order body for the current cart contents.
#[must_use]
pub fn order_for(cart: &CartStore) -> NewOrder {
    NewOrder {
        items: cart.items().iter().map(NewOrderLine::from).collect(),
        payment_method: PaymentMethod::CashOnDelivery,
    }
}

/// Submit the cart as an order.
///
/// On success the cart is cleared and the created order is returned when
/// the backend echoes it. On failure the cart is left exactly as it was.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` without contacting the backend when
/// there is nothing to order, and `CheckoutError::Api` when the backend
/// call fails.
#[instrument(skip_all, fields(lines = cart.items().len()))]
pub async fn checkout(
    cart: &mut CartStore,
    backend: &dyn OrderBackend,
) -> Result<Option<Order>, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let order = order_for(cart);
    let created = backend.create_order(&order).await?;

    cart.clear_cart();
    match &created {
        Some(order) => add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_id", order.id.as_str())]),
        ),
        None => add_breadcrumb("checkout", "Order placed", None),
    }
    tracing::info!(
        order_id = created.as_ref().map(|o| o.id.as_str()),
        "Order placed"
    );
    Ok(created)
}
