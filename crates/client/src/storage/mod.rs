//! Key-value storage backends.
//!
//! The state managers persist through the [`KeyValueStore`] trait, which
//! mirrors the two kinds of browser storage the web client relied on:
//!
//! - [`FileStore`] - durable storage that survives restarts (local storage)
//! - [`MemoryStore`] - ephemeral storage that lives as long as the process
//!   (session storage, one process per "tab")
//!
//! Values are opaque strings; callers own their serialisation format.

mod file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory map could not be serialised for writing.
    #[error("failed to encode storage file {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A previous panic left the store's lock poisoned.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string-keyed, string-valued store.
///
/// Implementations use interior mutability so a store can be shared behind
/// an `Arc` by the cart manager, the session manager and the REST client.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Storage keys.
///
/// The names match the web client's so an exported browser profile maps
/// one-to-one onto these stores.
pub mod keys {
    /// Durable: the serialised cart snapshot.
    pub const CART: &str = "sakshi_kitchen_cart";

    /// Ephemeral: customer bearer token.
    pub const USER_TOKEN: &str = "userToken";

    /// Ephemeral: serialised customer profile.
    pub const USER_DATA: &str = "userData";

    /// Ephemeral: admin session marker, holds [`ADMIN_AUTH_SENTINEL`].
    pub const ADMIN_AUTH: &str = "adminAuth";

    /// Ephemeral: optional admin bearer token.
    pub const ADMIN_TOKEN: &str = "adminToken";

    /// Ephemeral: serialised admin profile.
    pub const ADMIN_DATA: &str = "adminData";

    /// Value stored under [`ADMIN_AUTH`] for an active admin session.
    pub const ADMIN_AUTH_SENTINEL: &str = "true";

    /// Customer session keys.
    pub const CUSTOMER_KEYS: [&str; 2] = [USER_TOKEN, USER_DATA];

    /// Admin session keys.
    pub const ADMIN_KEYS: [&str; 3] = [ADMIN_AUTH, ADMIN_TOKEN, ADMIN_DATA];
}
