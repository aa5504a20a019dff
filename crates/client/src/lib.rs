//! Cloud Kitchen client library.
//!
//! Holds the two client-side state managers and everything they talk to:
//!
//! - [`cart`] - the cart, mirrored to durable storage
//! - [`session`] - the signed-in identity, mirrored to ephemeral storage
//! - [`api`] - the REST client for the Cloud Kitchen backend
//! - [`services`] - checkout and admin workflows
//! - [`state`] - the [`state::AppState`] container that owns all of the above

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
pub mod telemetry;
