//! Application state shared across commands.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{ApiClient, ApiError};
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::models::Order;
use crate::services::{self, CheckoutError};
use crate::session::SessionStore;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc` and owns the REST client and
/// both state managers. Callers lock a manager and go through its
/// operations; nothing else writes to storage.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClientConfig,
    api: ApiClient,
    cart: Mutex<CartStore>,
    session: Mutex<SessionStore>,
}

impl AppState {
    /// Create application state over the given stores.
    ///
    /// The cart is loaded from `durable` and the session restored from
    /// `ephemeral`; the REST client reads bearer tokens from `ephemeral`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        durable: Arc<dyn KeyValueStore>,
        ephemeral: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config, Arc::clone(&ephemeral))?;
        let cart = CartStore::load(durable);
        let mut session = SessionStore::new(ephemeral, Arc::new(api.clone()));
        session.initialize();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                cart: Mutex::new(cart),
                session: Mutex::new(session),
            }),
        })
    }

    /// Create application state with a file-backed durable store under
    /// `config.data_dir` and a fresh in-memory session.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable store cannot be opened or the HTTP
    /// client cannot be built.
    pub fn open(config: ClientConfig) -> Result<Self, AppError> {
        let durable = FileStore::open(config.durable_store_path())?;
        tracing::debug!(path = %durable.path().display(), "Durable store opened");
        Ok(Self::new(
            config,
            Arc::new(durable),
            Arc::new(MemoryStore::new()),
        )?)
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the REST client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// The cart state manager.
    #[must_use]
    pub fn cart(&self) -> &Mutex<CartStore> {
        &self.inner.cart
    }

    /// The session state manager.
    #[must_use]
    pub fn session(&self) -> &Mutex<SessionStore> {
        &self.inner.session
    }

    /// Place the current cart as an order.
    ///
    /// # Errors
    ///
    /// See [`services::checkout`].
    pub async fn checkout(&self) -> Result<Option<Order>, CheckoutError> {
        let mut cart = self.inner.cart.lock().await;
        services::checkout(&mut cart, &self.inner.api).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use super::*;
    use crate::storage::keys;

    fn config(dir: &std::path::Path) -> ClientConfig {
        ClientConfig {
            api_base_url: Url::parse("http://localhost:5000").unwrap(),
            data_dir: dir.to_path_buf(),
            request_timeout: Duration::from_secs(5),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[tokio::test]
    async fn test_new_restores_both_managers() {
        let durable = Arc::new(MemoryStore::new());
        durable
            .set(
                keys::CART,
                r#"[{"id":"d1","name":"Dal Makhani","price":180,"quantity":2}]"#,
            )
            .unwrap();
        let ephemeral = Arc::new(MemoryStore::new());
        ephemeral.set(keys::USER_TOKEN, "jwt-1").unwrap();
        ephemeral
            .set(keys::USER_DATA, r#"{"email":"asha@example.com","uid":"u1"}"#)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config(dir.path()), durable, ephemeral).unwrap();

        assert_eq!(state.cart().lock().await.cart_count(), 2);
        let session = state.session().lock().await;
        assert!(!session.is_loading());
        assert_eq!(session.identity().customer().unwrap().uid.as_str(), "u1");
    }

    #[tokio::test]
    async fn test_open_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(config(dir.path())).unwrap();
        assert!(state.cart().lock().await.is_empty());
        assert!(state.session().lock().await.identity().is_anonymous());
    }

    #[tokio::test]
    async fn test_checkout_of_empty_cart_is_local() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(config(dir.path())).unwrap();
        assert!(matches!(
            state.checkout().await,
            Err(CheckoutError::EmptyCart)
        ));
    }
}
