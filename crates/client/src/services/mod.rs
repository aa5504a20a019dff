//! Workflows that span the state managers and the backend.
//!
//! - [`checkout`] turns the cart into an order
//! - [`admin`] wraps the admin endpoints with session checks

pub mod admin;
pub mod checkout;

pub use admin::AdminError;
pub use checkout::{CheckoutError, checkout};
