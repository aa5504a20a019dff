//! Unified error handling with Sentry integration.
//!
//! Each module has its own error enum; [`AppError`] gathers them for the
//! binary, which reports unexpected failures to Sentry and shows the user
//! [`AppError::user_message`].

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::{AdminError, CheckoutError};
use crate::session::SessionError;
use crate::storage::StorageError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Signing in or out failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Placing an order failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// An admin workflow failed.
    #[error("Admin error: {0}")]
    Admin(#[from] AdminError),

    /// Reading from or writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// A message that is safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.to_string(),
            Self::Storage(_) => "Could not access local storage".to_string(),
            Self::Api(e) => e.user_message(),
            Self::Session(e) => e.user_message(),
            Self::Checkout(e) => e.user_message(),
            Self::Admin(e) => e.user_message(),
            Self::Io(_) => "Could not read input".to_string(),
            Self::BadRequest(reason) => reason.clone(),
        }
    }

    /// Whether this is a fault worth reporting rather than an expected
    /// outcome such as bad credentials or an empty cart.
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        match self {
            Self::Config(_) | Self::Storage(_) | Self::Io(_) => true,
            Self::Api(e) => api_error_is_unexpected(e),
            Self::Session(SessionError::Api(e)) => api_error_is_unexpected(e),
            Self::Session(SessionError::Storage(_) | SessionError::Encode(_)) => true,
            Self::Checkout(CheckoutError::Api(e)) | Self::Admin(AdminError::Api(e)) => {
                api_error_is_unexpected(e)
            }
            _ => false,
        }
    }

    /// Send unexpected errors to Sentry and log them.
    pub fn report(&self) {
        if self.is_unexpected() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::debug!(error = %self, "Command failed");
        }
    }
}

/// Transport failures and server errors are unexpected; 4xx answers and
/// rejections are the backend doing its job.
const fn api_error_is_unexpected(error: &ApiError) -> bool {
    match error {
        ApiError::Status { status, .. } => *status >= 500,
        ApiError::Http(_) | ApiError::MissingData | ApiError::Url(_) => true,
        ApiError::Rejected(_) | ApiError::File { .. } => false,
    }
}

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a user action.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added dish", Some(&[("dish_id", "66f1aa00")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
