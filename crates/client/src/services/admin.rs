//! Admin workflows: dashboard, dish creation, order management.
//!
//! Every call checks for an admin [`Identity`] first. When the backend
//! answers 401 the stored admin session is dropped through
//! [`SessionStore::expire_admin`] and [`AdminError::SessionExpired`] is
//! returned, so the caller can send the user back to the login prompt.

use thiserror::Error;
use tracing::instrument;

use cloud_kitchen_core::{OrderId, OrderStatus};

use crate::api::{AdminBackend, ApiError, NewDish};
use crate::models::{Dashboard, Order, OrderFilter};
use crate::session::{Identity, SessionStore};

/// Errors from admin workflows.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("admin login required")]
    NotAdmin,

    #[error("admin session expired")]
    SessionExpired,

    #[error("invalid dish: {0}")]
    InvalidDish(String),

    #[error(transparent)]
    Api(ApiError),
}

impl AdminError {
    /// A message that is safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAdmin => "Please log in as admin".to_string(),
            Self::SessionExpired => {
                "Your admin session has expired. Please log in again.".to_string()
            }
            Self::InvalidDish(reason) => reason.clone(),
            Self::Api(e) => e.user_message(),
        }
    }
}

fn require_admin(session: &SessionStore) -> Result<(), AdminError> {
    match session.identity() {
        Identity::Admin(_) => Ok(()),
        _ => Err(AdminError::NotAdmin),
    }
}

/// Map a backend result, expiring the admin session on 401.
fn settle<T>(session: &mut SessionStore, result: Result<T, ApiError>) -> Result<T, AdminError> {
    result.map_err(|e| {
        if e.is_unauthorized() {
            session.expire_admin();
            AdminError::SessionExpired
        } else {
            AdminError::Api(e)
        }
    })
}

/// Load the dashboard.
///
/// # Errors
///
/// Returns `AdminError` if no admin is signed in or the backend call fails.
#[instrument(skip_all)]
pub async fn dashboard(
    session: &mut SessionStore,
    backend: &dyn AdminBackend,
) -> Result<Dashboard, AdminError> {
    require_admin(session)?;
    let result = backend.dashboard().await;
    settle(session, result)
}

/// Orders passing `filter`, newest first as the backend returns them.
///
/// # Errors
///
/// Returns `AdminError` if no admin is signed in or the backend call fails.
#[instrument(skip_all)]
pub async fn orders(
    session: &mut SessionStore,
    backend: &dyn AdminBackend,
    filter: &OrderFilter,
) -> Result<Vec<Order>, AdminError> {
    require_admin(session)?;
    let result = backend.admin_orders().await;
    let orders = settle(session, result)?;
    Ok(filter.apply(&orders).into_iter().cloned().collect())
}

/// Create a dish.
///
/// # Errors
///
/// Returns `AdminError::InvalidDish` before any network call if a required
/// field is blank, otherwise as [`dashboard`].
#[instrument(skip_all, fields(name = %dish.name))]
pub async fn add_dish(
    session: &mut SessionStore,
    backend: &dyn AdminBackend,
    dish: NewDish,
) -> Result<(), AdminError> {
    require_admin(session)?;
    if dish.name.trim().is_empty() {
        return Err(AdminError::InvalidDish("Dish name is required".to_string()));
    }
    if dish.category.trim().is_empty() {
        return Err(AdminError::InvalidDish("Category is required".to_string()));
    }
    if dish.price.is_zero() {
        return Err(AdminError::InvalidDish("Price must be greater than zero".to_string()));
    }

    let result = backend.add_dish(dish).await;
    settle(session, result)?;
    tracing::info!("Dish added");
    Ok(())
}

/// Move an order to `status`.
///
/// # Errors
///
/// Returns `AdminError` if no admin is signed in or the backend call fails.
#[instrument(skip_all, fields(order_id = %id, %status))]
pub async fn update_status(
    session: &mut SessionStore,
    backend: &dyn AdminBackend,
    id: &OrderId,
    status: OrderStatus,
) -> Result<(), AdminError> {
    require_admin(session)?;
    let result = backend.update_order_status(id, status).await;
    settle(session, result)?;
    tracing::info!("Order status updated");
    Ok(())
}
