//! Customer and admin authentication endpoints.

use async_trait::async_trait;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use tracing::instrument;

use cloud_kitchen_core::{Email, UserId};

use super::{ApiClient, ApiError, AuthBackend, BearerToken, check_status};

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Body of `POST /api/auth/google`: the identity the provider vouched for.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAuthRequest {
    pub email: String,
    pub display_name: String,
    pub uid: String,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(
        serialize_with = "expose_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id_token: Option<SecretString>,
}

fn expose_optional<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => expose(secret, serializer),
        None => serializer.serialize_none(),
    }
}

/// Body of `POST /admin/login`.
#[derive(Debug, Serialize)]
pub struct AdminLoginRequest {
    pub email: Email,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// User record returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Successful customer authentication: an application token plus the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: BearerToken,
    pub user: BackendUser,
}

/// Body of an admin login reply. Every field is optional: the backend may
/// rely on its session cookie alone and send nothing useful back.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminLoginResponse {
    pub success: Option<bool>,
    pub token: Option<BearerToken>,
    pub message: Option<String>,
}

/// Auth replies carry `success`/`message` beside `token`/`user` rather than
/// nesting them under `data`.
#[derive(Deserialize)]
struct AuthReply {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    token: Option<BearerToken>,
    user: Option<BackendUser>,
}

impl AuthReply {
    fn into_response(self) -> Result<AuthResponse, ApiError> {
        if self.success == Some(false) {
            return Err(ApiError::Rejected(
                self.message
                    .unwrap_or_else(|| "authentication failed".to_string()),
            ));
        }
        match (self.token, self.user) {
            (Some(token), Some(user)) => Ok(AuthResponse { token, user }),
            _ => Err(ApiError::MissingData),
        }
    }
}

impl ApiClient {
    async fn authenticate<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AuthResponse, ApiError> {
        let builder = self.request(Method::POST, path)?.json(body);
        let reply: AuthReply = self.send(builder).await?;
        reply.into_response()
    }

    /// `GET /api/auth/me`: the user the current token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the token is rejected.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<BackendUser, ApiError> {
        #[derive(Deserialize)]
        struct MeReply {
            user: Option<BackendUser>,
            data: Option<BackendUser>,
        }

        let reply: MeReply = self.send(self.request(Method::GET, "/api/auth/me")?).await?;
        reply.user.or(reply.data).ok_or(ApiError::MissingData)
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.authenticate("/api/auth/register", request).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.authenticate("/api/auth/login", request).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn google(&self, request: &GoogleAuthRequest) -> Result<AuthResponse, ApiError> {
        self.authenticate("/api/auth/google", request).await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn admin_login(
        &self,
        request: &AdminLoginRequest,
    ) -> Result<AdminLoginResponse, ApiError> {
        let builder = self.request(Method::POST, "/admin/login")?.json(request);
        let response = check_status(builder.send().await?).await?;

        let body = response.text().await?;
        let reply: AdminLoginResponse = serde_json::from_str(&body).unwrap_or_default();
        if reply.success == Some(false) {
            return Err(ApiError::Rejected(
                reply
                    .message
                    .unwrap_or_else(|| "Invalid credentials".to_string()),
            ));
        }
        Ok(reply)
    }
}
