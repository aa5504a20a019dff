//! Session state manager.
//!
//! Tracks who is signed in and mirrors that to ephemeral storage so a
//! reload within the same process picks the session back up.
//!
//! # Identity
//!
//! There is exactly one [`Identity`] at a time: anonymous, a customer with
//! a bearer token, or an admin. Signing in as one kind of user drops any
//! stored keys belonging to the other.
//!
//! # Ordering
//!
//! Every login calls the backend first. Only on success is the result
//! written to storage, and only once storage has it is memory updated. A
//! failed call leaves both untouched.

mod google;

use std::sync::Arc;

use secrecy::SecretString;
use thiserror::Error;
use tracing::instrument;

use cloud_kitchen_core::{Email, EmailError};

use crate::api::{
    AdminLoginRequest, ApiError, AuthBackend, AuthResponse, BackendUser, BearerToken,
    GoogleAuthRequest, LoginRequest, RegisterRequest,
};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{AdminProfile, Profile};
use crate::storage::{KeyValueStore, StorageError, keys};

pub use google::{
    IdentityProvider, IdentityProviderError, PresetIdentityProvider, ProviderIdentity,
};

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend refused or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The identity provider flow failed or was dismissed.
    #[error(transparent)]
    IdentityProvider(#[from] IdentityProviderError),

    /// The session could not be written to storage.
    #[error("failed to store session: {0}")]
    Storage(#[from] StorageError),

    /// The session could not be serialised for storage.
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    /// An address typed into the admin login form is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

impl SessionError {
    /// A message that is safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::IdentityProvider(IdentityProviderError::Dismissed) => {
                "Sign-in was cancelled".to_string()
            }
            Self::IdentityProvider(_) => "Sign-in failed. Please try again.".to_string(),
            Self::InvalidEmail(e) => e.to_string(),
            Self::Storage(_) | Self::Encode(_) => "Could not save your session".to_string(),
        }
    }
}

/// A signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSession {
    pub profile: Profile,
    pub token: BearerToken,
}

/// A signed-in admin.
///
/// The backend tracks admin sessions with a cookie; a token is kept only
/// when the login reply carried one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub email: Email,
    pub token: Option<BearerToken>,
}

/// Who is using the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Customer(CustomerSession),
    Admin(AdminSession),
}

impl Identity {
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    /// The customer profile, if a customer is signed in.
    #[must_use]
    pub const fn customer(&self) -> Option<&Profile> {
        match self {
            Self::Customer(session) => Some(&session.profile),
            _ => None,
        }
    }

    /// The admin session, if an admin is signed in.
    #[must_use]
    pub const fn admin(&self) -> Option<&AdminSession> {
        match self {
            Self::Admin(session) => Some(session),
            _ => None,
        }
    }
}

/// Whether stored state has been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Initializing,
    Ready,
}

/// The session state manager.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    backend: Arc<dyn AuthBackend>,
    identity: Identity,
    status: SessionStatus,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("identity", &self.identity)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a manager in the [`SessionStatus::Initializing`] state.
    ///
    /// Call [`Self::initialize`] before relying on [`Self::identity`].
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            storage,
            backend,
            identity: Identity::Anonymous,
            status: SessionStatus::Initializing,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// `true` until [`Self::initialize`] has run.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Initializing
    }

    /// Restore the session from storage. No network call is made.
    ///
    /// The admin marker is checked first. Keys that cannot be decoded are
    /// removed and the identity stays anonymous. Running this again once
    /// ready is a no-op.
    pub fn initialize(&mut self) {
        if self.status == SessionStatus::Ready {
            return;
        }

        self.identity = self
            .restore_admin()
            .or_else(|| self.restore_customer())
            .unwrap_or_default();

        match &self.identity {
            Identity::Customer(session) => {
                set_sentry_user(&session.profile.uid, Some(session.profile.email.as_str()));
            }
            Identity::Admin(session) => set_sentry_user(&session.email, Some(session.email.as_str())),
            Identity::Anonymous => {}
        }

        self.status = SessionStatus::Ready;
        tracing::debug!(
            anonymous = self.identity.is_anonymous(),
            admin = self.identity.is_admin(),
            "Session initialized"
        );
    }

    fn restore_admin(&self) -> Option<Identity> {
        if self.read(keys::ADMIN_AUTH)?.as_str() != keys::ADMIN_AUTH_SENTINEL {
            return None;
        }

        let Some(raw) = self.read(keys::ADMIN_DATA) else {
            tracing::warn!("Admin marker without admin data, clearing admin session");
            self.remove_keys(&keys::ADMIN_KEYS);
            return None;
        };
        match serde_json::from_str::<AdminProfile>(&raw) {
            Ok(profile) => Some(Identity::Admin(AdminSession {
                email: profile.email,
                token: self.read(keys::ADMIN_TOKEN).map(BearerToken::new),
            })),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupt admin session");
                self.remove_keys(&keys::ADMIN_KEYS);
                None
            }
        }
    }

    fn restore_customer(&self) -> Option<Identity> {
        let token = self.read(keys::USER_TOKEN)?;
        let raw = self.read(keys::USER_DATA)?;
        match serde_json::from_str::<Profile>(&raw) {
            Ok(profile) => Some(Identity::Customer(CustomerSession {
                profile,
                token: BearerToken::new(token),
            })),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupt customer session");
                self.remove_keys(&keys::CUSTOMER_KEYS);
                None
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` if the backend rejects the credentials
    /// and `SessionError::Storage` if the session cannot be saved. In both
    /// cases the current identity is unchanged.
    #[instrument(skip(self, password))]
    pub async fn login_with_backend(
        &mut self,
        email: &str,
        password: SecretString,
    ) -> Result<BackendUser, SessionError> {
        let request = LoginRequest {
            email: email.to_string(),
            password,
        };
        let AuthResponse { token, user } = self.backend.login(&request).await?;

        let profile = Profile {
            email: user.email.clone(),
            display_name: user.display_name.clone().unwrap_or_default(),
            phone_number: user.phone_number.clone(),
            uid: user.id.clone(),
            photo_url: None,
        };
        self.establish_customer(profile, token)?;
        tracing::info!(user_id = %user.id, "Customer signed in");
        Ok(user)
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::login_with_backend`].
    #[instrument(skip(self, password, phone_number))]
    pub async fn signup_with_backend(
        &mut self,
        email: &str,
        password: SecretString,
        display_name: &str,
        phone_number: Option<String>,
    ) -> Result<BackendUser, SessionError> {
        let request = RegisterRequest {
            email: email.to_string(),
            password,
            display_name: display_name.to_string(),
            phone_number: phone_number.clone(),
        };
        let AuthResponse { token, user } = self.backend.register(&request).await?;

        let profile = Profile {
            email: user.email.clone(),
            display_name: display_name.to_string(),
            phone_number,
            uid: user.id.clone(),
            photo_url: None,
        };
        self.establish_customer(profile, token)?;
        tracing::info!(user_id = %user.id, "Customer signed up");
        Ok(user)
    }

    /// Sign in through a third-party identity provider, then exchange the
    /// identity for a backend token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IdentityProvider` if the flow is dismissed or
    /// fails, otherwise the same as [`Self::login_with_backend`].
    #[instrument(skip(self, provider))]
    pub async fn login_with_google(
        &mut self,
        provider: &dyn IdentityProvider,
    ) -> Result<BackendUser, SessionError> {
        let identity = provider.sign_in().await?;

        let request = GoogleAuthRequest {
            email: identity.email.to_string(),
            display_name: identity.display_name.clone(),
            uid: identity.uid.clone(),
            photo_url: identity.photo_url.clone(),
            id_token: identity.id_token.clone(),
        };
        let AuthResponse { token, user } = self.backend.google(&request).await?;

        let profile = Profile {
            email: identity.email,
            display_name: identity.display_name,
            phone_number: None,
            uid: user.id.clone(),
            photo_url: identity.photo_url,
        };
        self.establish_customer(profile, token)?;
        tracing::info!(user_id = %user.id, "Customer signed in with Google");
        Ok(user)
    }

    /// Sign in to the admin area.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidEmail` before any network call if
    /// `email` is malformed, otherwise the same as
    /// [`Self::login_with_backend`].
    #[instrument(skip(self, password))]
    pub async fn login_as_admin(
        &mut self,
        email: &str,
        password: SecretString,
    ) -> Result<(), SessionError> {
        let email = Email::parse(email)?;
        let request = AdminLoginRequest {
            email: email.clone(),
            password,
        };
        let reply = self.backend.admin_login(&request).await?;

        let data = serde_json::to_string(&AdminProfile {
            email: email.clone(),
        })?;
        self.write_all(&keys::ADMIN_KEYS, || {
            self.storage.set(keys::ADMIN_AUTH, keys::ADMIN_AUTH_SENTINEL)?;
            self.storage.set(keys::ADMIN_DATA, &data)?;
            match &reply.token {
                Some(token) => self.storage.set(keys::ADMIN_TOKEN, token.expose()),
                None => self.storage.remove(keys::ADMIN_TOKEN),
            }
        })?;
        self.remove_keys(&keys::CUSTOMER_KEYS);

        set_sentry_user(&email, Some(email.as_str()));
        tracing::info!(%email, "Admin signed in");
        self.identity = Identity::Admin(AdminSession {
            email,
            token: reply.token,
        });
        Ok(())
    }

    /// Sign out locally. The backend is not told.
    pub fn logout(&mut self) {
        self.remove_keys(&keys::CUSTOMER_KEYS);
        self.remove_keys(&keys::ADMIN_KEYS);
        self.identity = Identity::Anonymous;
        clear_sentry_user();
        tracing::info!("Signed out");
    }

    /// Drop an admin session the backend no longer accepts.
    ///
    /// Called after an admin endpoint answers 401. Customer sessions are
    /// left alone.
    pub fn expire_admin(&mut self) {
        self.remove_keys(&keys::ADMIN_KEYS);
        if self.identity.is_admin() {
            tracing::warn!("Admin session expired");
            self.identity = Identity::Anonymous;
            clear_sentry_user();
        }
    }

    fn establish_customer(
        &mut self,
        profile: Profile,
        token: BearerToken,
    ) -> Result<(), SessionError> {
        let data = serde_json::to_string(&profile)?;
        self.write_all(&keys::CUSTOMER_KEYS, || {
            self.storage.set(keys::USER_TOKEN, token.expose())?;
            self.storage.set(keys::USER_DATA, &data)
        })?;
        self.remove_keys(&keys::ADMIN_KEYS);

        set_sentry_user(&profile.uid, Some(profile.email.as_str()));
        self.identity = Identity::Customer(CustomerSession { profile, token });
        Ok(())
    }

    /// Run `write`; if it fails, put `written_keys` back to what they held
    /// before, so a failed sign-in leaves the previous session intact.
    fn write_all(
        &self,
        written_keys: &[&str],
        write: impl FnOnce() -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let prior: Vec<(&str, Option<String>)> = written_keys
            .iter()
            .map(|key| (*key, self.storage.get(key).ok().flatten()))
            .collect();

        write().inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to store session, rolling back");
            for (key, value) in &prior {
                let restored = match value {
                    Some(value) => self.storage.set(key, value),
                    None => self.storage.remove(key),
                };
                if let Err(e) = restored {
                    tracing::warn!(key, error = %e, "Failed to restore session key");
                }
            }
        })
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read session storage");
                None
            }
        }
    }

    fn remove_keys(&self, keys: &[&str]) {
        for key in keys {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to remove session key");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::api::AdminLoginResponse;
    use crate::storage::MemoryStore;
    use cloud_kitchen_core::UserId;

    #[derive(Default)]
    struct FakeBackend {
        reject: bool,
        admin_token: Option<&'static str>,
        calls: AtomicUsize,
        last_google: Mutex<Option<String>>,
    }

    impl FakeBackend {
        fn rejecting() -> Self {
            Self {
                reject: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn reply(&self, email: &str) -> Result<AuthResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(ApiError::Status {
                    status: 401,
                    message: "Invalid credentials".to_string(),
                });
            }
            Ok(AuthResponse {
                token: BearerToken::new("jwt-1"),
                user: BackendUser {
                    id: UserId::new("u-42"),
                    email: Email::parse(email).unwrap(),
                    display_name: Some("Asha".to_string()),
                    phone_number: Some("98765".to_string()),
                },
            })
        }
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
            self.reply(&request.email)
        }

        async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
            self.reply(&request.email)
        }

        async fn google(&self, request: &GoogleAuthRequest) -> Result<AuthResponse, ApiError> {
            *self.last_google.lock().unwrap() = Some(request.uid.clone());
            self.reply(&request.email)
        }

        async fn admin_login(
            &self,
            _request: &AdminLoginRequest,
        ) -> Result<AdminLoginResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(ApiError::Rejected("Invalid credentials".to_string()));
            }
            Ok(AdminLoginResponse {
                success: Some(true),
                token: self.admin_token.map(BearerToken::new),
                message: None,
            })
        }
    }

    /// A memory store whose writes to one key fail once armed.
    #[derive(Default)]
    struct FailingStore {
        inner: MemoryStore,
        fail_key: Mutex<Option<&'static str>>,
    }

    impl FailingStore {
        fn fail_on(&self, key: &'static str) {
            *self.fail_key.lock().unwrap() = Some(key);
        }
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_key.lock().unwrap().is_some_and(|k| k == key) {
                return Err(StorageError::Poisoned);
            }
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn setup(backend: FakeBackend) -> (Arc<MemoryStore>, Arc<FakeBackend>, SessionStore) {
        let storage = Arc::new(MemoryStore::new());
        let backend = Arc::new(backend);
        let mut session = SessionStore::new(storage.clone(), backend.clone());
        session.initialize();
        (storage, backend, session)
    }

    fn password() -> SecretString {
        SecretString::from("hunter22")
    }

    #[test]
    fn test_loading_until_initialized() {
        let storage = Arc::new(MemoryStore::new());
        let mut session = SessionStore::new(storage, Arc::new(FakeBackend::default()));
        assert!(session.is_loading());
        session.initialize();
        assert!(!session.is_loading());
        assert!(session.identity().is_anonymous());
    }

    #[tokio::test]
    async fn test_login_persists_and_rehydrates_without_network() {
        let (storage, backend, mut session) = setup(FakeBackend::default());
        session
            .login_with_backend("asha@example.com", password())
            .await
            .unwrap();

        let profile = session.identity().customer().unwrap();
        assert_eq!(profile.uid.as_str(), "u-42");
        assert_eq!(profile.display_name, "Asha");
        assert_eq!(storage.get(keys::USER_TOKEN).unwrap().as_deref(), Some("jwt-1"));
        assert_eq!(backend.calls(), 1);

        let mut reloaded = SessionStore::new(storage, backend.clone());
        reloaded.initialize();
        assert_eq!(reloaded.identity(), session.identity());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_login_leaves_state_untouched() {
        let (storage, _, mut session) = setup(FakeBackend::rejecting());
        let err = session
            .login_with_backend("asha@example.com", password())
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Api(ref e) if e.is_unauthorized()));
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(session.identity().is_anonymous());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_session() {
        let storage = Arc::new(FailingStore::default());
        let backend = Arc::new(FakeBackend::default());
        let mut session = SessionStore::new(storage.clone(), backend.clone());
        session.initialize();
        session
            .login_with_backend("asha@example.com", password())
            .await
            .unwrap();
        let before = session.identity().clone();

        storage.fail_on(keys::USER_DATA);
        let err = session
            .login_with_backend("ravi@example.com", password())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));

        assert_eq!(session.identity(), &before);
        assert_eq!(storage.get(keys::USER_TOKEN).unwrap().as_deref(), Some("jwt-1"));
        let data = storage.get(keys::USER_DATA).unwrap().unwrap();
        assert!(data.contains("asha@example.com"));

        let mut reloaded = SessionStore::new(storage, backend);
        reloaded.initialize();
        assert_eq!(reloaded.identity(), &before);
    }

    #[tokio::test]
    async fn test_signup_keeps_submitted_name_and_phone() {
        let (_, _, mut session) = setup(FakeBackend::default());
        session
            .signup_with_backend("ravi@example.com", password(), "Ravi", None)
            .await
            .unwrap();
        let profile = session.identity().customer().unwrap();
        assert_eq!(profile.display_name, "Ravi");
        assert_eq!(profile.phone_number, None);
        assert_eq!(profile.email.as_str(), "ravi@example.com");
    }

    #[tokio::test]
    async fn test_google_stores_backend_uid() {
        let (_, backend, mut session) = setup(FakeBackend::default());
        let provider = PresetIdentityProvider::signed_in(ProviderIdentity {
            email: Email::parse("asha@gmail.com").unwrap(),
            display_name: "Asha G".to_string(),
            uid: "google-123".to_string(),
            photo_url: Some("https://img.example/asha.png".to_string()),
            id_token: None,
        });
        session.login_with_google(&provider).await.unwrap();

        let profile = session.identity().customer().unwrap();
        assert_eq!(profile.uid.as_str(), "u-42");
        assert_eq!(profile.display_name, "Asha G");
        assert!(profile.photo_url.is_some());
        assert_eq!(backend.last_google.lock().unwrap().as_deref(), Some("google-123"));
    }

    #[tokio::test]
    async fn test_dismissed_google_makes_no_backend_call() {
        let (storage, backend, mut session) = setup(FakeBackend::default());
        let err = session
            .login_with_google(&PresetIdentityProvider::dismissed())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::IdentityProvider(IdentityProviderError::Dismissed)
        ));
        assert_eq!(backend.calls(), 0);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (storage, _, mut session) = setup(FakeBackend::default());
        session
            .login_with_backend("asha@example.com", password())
            .await
            .unwrap();
        session.logout();
        assert!(session.identity().is_anonymous());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_admin_login_replaces_customer_session() {
        let (storage, _, mut session) = setup(FakeBackend {
            admin_token: Some("admin-jwt"),
            ..FakeBackend::default()
        });
        session
            .login_with_backend("asha@example.com", password())
            .await
            .unwrap();
        session
            .login_as_admin("chef@kitchen.in", password())
            .await
            .unwrap();

        assert!(session.identity().is_admin());
        assert_eq!(storage.get(keys::ADMIN_AUTH).unwrap().as_deref(), Some("true"));
        assert_eq!(storage.get(keys::ADMIN_TOKEN).unwrap().as_deref(), Some("admin-jwt"));
        assert_eq!(storage.get(keys::USER_TOKEN).unwrap(), None);

        let mut reloaded = SessionStore::new(storage, Arc::new(FakeBackend::default()));
        reloaded.initialize();
        assert_eq!(
            reloaded.identity().admin().unwrap().email.as_str(),
            "chef@kitchen.in"
        );
    }

    #[tokio::test]
    async fn test_admin_login_rejects_malformed_email_locally() {
        let (_, backend, mut session) = setup(FakeBackend::default());
        let err = session.login_as_admin("chef", password()).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidEmail(_)));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_expire_admin() {
        let (storage, _, mut session) = setup(FakeBackend::default());
        session
            .login_as_admin("chef@kitchen.in", password())
            .await
            .unwrap();
        session.expire_admin();
        assert!(session.identity().is_anonymous());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_corrupt_customer_data_is_cleared() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(keys::USER_TOKEN, "jwt-1").unwrap();
        storage.set(keys::USER_DATA, "{broken").unwrap();

        let mut session = SessionStore::new(storage.clone(), Arc::new(FakeBackend::default()));
        session.initialize();
        assert!(session.identity().is_anonymous());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_admin_marker_wins_over_customer_keys() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(keys::USER_TOKEN, "jwt-1").unwrap();
        storage
            .set(keys::USER_DATA, r#"{"email":"asha@example.com","uid":"u1"}"#)
            .unwrap();
        storage.set(keys::ADMIN_AUTH, "true").unwrap();
        storage
            .set(keys::ADMIN_DATA, r#"{"email":"chef@kitchen.in"}"#)
            .unwrap();

        let mut session = SessionStore::new(storage, Arc::new(FakeBackend::default()));
        session.initialize();
        assert!(session.identity().is_admin());
        assert!(session.identity().admin().unwrap().token.is_none());
    }

    #[test]
    fn test_token_without_data_is_anonymous() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(keys::USER_TOKEN, "jwt-1").unwrap();
        let mut session = SessionStore::new(storage, Arc::new(FakeBackend::default()));
        session.initialize();
        assert!(session.identity().is_anonymous());
    }
}
