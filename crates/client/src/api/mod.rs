//! REST client for the Cloud Kitchen backend.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per process, built from [`ClientConfig`]
//! - JSON over `reqwest`, with a cookie store for the admin session cookie
//! - The bearer token is read from session storage on every request, so a
//!   login or logout takes effect on the very next call
//! - No retries: every failure is returned to the caller as-is
//!
//! The state managers and services never see `ApiClient` directly. They
//! depend on the [`AuthBackend`], [`OrderBackend`] and [`AdminBackend`]
//! traits so tests can swap in fakes.
//!
//! # Example
//!
//! ```rust,ignore
//! use cloud_kitchen_client::api::ApiClient;
//!
//! let api = ApiClient::new(&config, session_storage)?;
//! let dishes = api.list_dishes(&DishParams::default()).await?;
//! ```

mod admin;
mod auth;
mod catalog;
mod orders;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;

use cloud_kitchen_core::{OrderId, OrderStatus};

use crate::config::ClientConfig;
use crate::models::{Dashboard, NewOrder, Order};
use crate::storage::{KeyValueStore, keys};

pub use admin::{DishImage, NewDish};
pub use auth::{
    AdminLoginRequest, AdminLoginResponse, AuthResponse, BackendUser, GoogleAuthRequest,
    LoginRequest, RegisterRequest,
};
pub use catalog::DishParams;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS, bad body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The backend answered 2xx but flagged the request as failed.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// A successful response carried no payload where one was required.
    #[error("response is missing its data")]
    MissingData,

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A local file needed for the request could not be read.
    #[error("failed to read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Returns `true` for a 401 response.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// A message that is safe to show to the user.
    ///
    /// Prefers the backend's own message, which is written for end users.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Rejected(message) if !message.is_empty() => {
                message.clone()
            }
            Self::Http(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            Self::Http(e) if e.is_connect() => "Failed to connect to server".to_string(),
            Self::File { path, .. } => format!("Could not read {path}"),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

/// An opaque bearer credential.
///
/// Wraps a [`SecretString`] so tokens never show up in `Debug` output or
/// logs.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Reveal the raw token for storage or an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

impl PartialEq for BearerToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for BearerToken {}

impl<'de> Deserialize<'de> for BearerToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// The `{ success, data, message }` wrapper most endpoints reply with.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

const fn default_success() -> bool {
    true
}

impl<T> Envelope<T> {
    /// The payload, or `None` when the backend sent none.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when `success` is false.
    pub(crate) fn into_data(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }

    /// The payload, which must be present.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when `success` is false and
    /// `ApiError::MissingData` when no payload was sent.
    pub(crate) fn into_required(self) -> Result<T, ApiError> {
        self.into_data()?.ok_or(ApiError::MissingData)
    }
}

/// Body shape used only to pull `message` out of error responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Authentication operations the session manager depends on.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// `POST /api/auth/register`.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    /// `POST /api/auth/login`.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    /// `POST /api/auth/google`.
    async fn google(&self, request: &GoogleAuthRequest) -> Result<AuthResponse, ApiError>;

    /// `POST /admin/login`.
    async fn admin_login(
        &self,
        request: &AdminLoginRequest,
    ) -> Result<AdminLoginResponse, ApiError>;
}

/// Order placement, the one remote call checkout depends on.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// `POST /api/orders`. Returns the created order when the backend echoes it.
    async fn create_order(&self, order: &NewOrder) -> Result<Option<Order>, ApiError>;
}

/// Admin-only operations, authenticated by the admin session.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// `GET /admin/dashboard`.
    async fn dashboard(&self) -> Result<Dashboard, ApiError>;

    /// `POST /admin/add-dish`.
    async fn add_dish(&self, dish: NewDish) -> Result<(), ApiError>;

    /// `GET /admin/orders`.
    async fn admin_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// `POST /admin/orders/{id}/status`.
    async fn update_order_status(&self, id: &OrderId, status: OrderStatus)
    -> Result<(), ApiError>;
}

/// HTTP client for the Cloud Kitchen REST API.
///
/// Cheap to clone; clones share the connection pool and cookie store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    /// Create a client for `config.api_base_url`.
    ///
    /// `session` is the ephemeral store the session manager writes tokens
    /// into.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .user_agent(concat!("cloud-kitchen-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: directory_url(&config.api_base_url),
                session,
            }),
        })
    }

    /// The base URL every path is resolved against. Always ends in `/`, so
    /// a path prefix such as `/backend` is kept.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Token to send: the admin token wins over the customer token.
    fn bearer_token(&self) -> Option<String> {
        for key in [keys::ADMIN_TOKEN, keys::USER_TOKEN] {
            match self.inner.session.get(key) {
                Ok(Some(token)) if !token.is_empty() => return Some(token),
                Ok(_) => {}
                Err(e) => tracing::warn!(key, error = %e, "Failed to read token from session storage"),
            }
        }
        None
    }

    /// Start a request to `path`, with the bearer token attached if any.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        self.request_with_query(method, path, &[])
    }

    /// Like [`Self::request`], appending `query` as URL-encoded pairs.
    fn request_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder, ApiError> {
        let mut url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        let builder = self.inner.client.request(method, url);
        Ok(match self.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a request and decode a JSON body.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// `base` with a trailing `/`, so joined endpoint paths append to it.
fn directory_url(base: &Url) -> Url {
    let mut url = base.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Turn a non-2xx response into `ApiError::Status`.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| default_status_message(status));

    tracing::debug!(status = status.as_u16(), %message, "API request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

fn default_status_message(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "Invalid credentials".to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::storage::MemoryStore;

    fn client(session: Arc<MemoryStore>) -> ApiClient {
        client_at("http://localhost:5000", session)
    }

    fn client_at(base: &str, session: Arc<MemoryStore>) -> ApiClient {
        let config = ClientConfig {
            api_base_url: Url::parse(base).unwrap(),
            data_dir: std::env::temp_dir(),
            request_timeout: Duration::from_secs(5),
            sentry_dsn: None,
            sentry_environment: None,
        };
        ApiClient::new(&config, session).unwrap()
    }

    #[test]
    fn test_no_token_when_session_empty() {
        let api = client(Arc::new(MemoryStore::new()));
        assert_eq!(api.bearer_token(), None);
    }

    #[test]
    fn test_admin_token_takes_precedence() {
        let session = Arc::new(MemoryStore::new());
        session.set(keys::USER_TOKEN, "customer").unwrap();
        let api = client(Arc::clone(&session));
        assert_eq!(api.bearer_token().as_deref(), Some("customer"));

        session.set(keys::ADMIN_TOKEN, "admin").unwrap();
        assert_eq!(api.bearer_token().as_deref(), Some("admin"));
    }

    #[test]
    fn test_request_resolves_against_base_url() {
        let api = client(Arc::new(MemoryStore::new()));
        let request = api
            .request(Method::GET, "/api/dishes")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:5000/api/dishes");
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_base_url_path_prefix_is_kept() {
        for base in ["https://host.example/backend", "https://host.example/backend/"] {
            let api = client_at(base, Arc::new(MemoryStore::new()));
            let request = api
                .request_with_query(Method::GET, "/api/dishes", &[("category", "breads")])
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(
                request.url().as_str(),
                "https://host.example/backend/api/dishes?category=breads"
            );
        }
    }

    #[test]
    fn test_request_encodes_query() {
        let api = client(Arc::new(MemoryStore::new()));
        let request = api
            .request_with_query(Method::GET, "/api/dishes", &[("search", "dal makhani")])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:5000/api/dishes?search=dal+makhani"
        );
    }

    #[test]
    fn test_request_carries_bearer_header() {
        let session = Arc::new(MemoryStore::new());
        session.set(keys::USER_TOKEN, "tok-123").unwrap();
        let api = client(session);
        let request = api
            .request(Method::GET, "/api/orders/my-orders")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer tok-123"
        );
    }

    #[test]
    fn test_envelope_rejected() {
        let envelope: Envelope<u32> =
            serde_json::from_str(r#"{"success": false, "message": "Dish unavailable"}"#).unwrap();
        let err = envelope.into_required().unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref m) if m == "Dish unavailable"));
        assert_eq!(err.user_message(), "Dish unavailable");
    }

    #[test]
    fn test_envelope_missing_data() {
        let envelope: Envelope<u32> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(envelope.into_required(), Err(ApiError::MissingData)));
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::Status {
            status: 401,
            message: String::new(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn test_bearer_token_debug_is_redacted() {
        let token = BearerToken::new("very-secret");
        assert!(!format!("{token:?}").contains("very-secret"));
        assert_eq!(token.expose(), "very-secret");
    }
}
