//! Third-party identity providers (the Google sign-in popup).

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use cloud_kitchen_core::Email;

/// Errors from an identity provider's sign-in flow.
#[derive(Debug, Error)]
pub enum IdentityProviderError {
    /// The user closed the sign-in prompt without choosing an account.
    #[error("sign-in was dismissed")]
    Dismissed,

    /// The provider failed for any other reason.
    #[error("identity provider failed: {0}")]
    Failed(String),
}

/// The identity a provider vouched for.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub email: Email,
    pub display_name: String,
    /// The provider's own user id. Not the backend user id.
    pub uid: String,
    pub photo_url: Option<String>,
    /// Provider-issued token, forwarded to the backend when present.
    pub id_token: Option<SecretString>,
}

/// An interactive sign-in flow.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the flow and return the chosen identity.
    async fn sign_in(&self) -> Result<ProviderIdentity, IdentityProviderError>;
}

/// A provider whose outcome is decided up front.
///
/// The CLI builds one from the details typed at the prompt; tests use it to
/// simulate both a completed and a dismissed popup.
#[derive(Debug, Clone, Default)]
pub struct PresetIdentityProvider {
    identity: Option<ProviderIdentity>,
}

impl PresetIdentityProvider {
    #[must_use]
    pub const fn signed_in(identity: ProviderIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    #[must_use]
    pub const fn dismissed() -> Self {
        Self { identity: None }
    }
}

#[async_trait]
impl IdentityProvider for PresetIdentityProvider {
    async fn sign_in(&self) -> Result<ProviderIdentity, IdentityProviderError> {
        self.identity
            .clone()
            .ok_or(IdentityProviderError::Dismissed)
    }
}
