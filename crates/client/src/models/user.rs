//! Identity records kept in session storage.

use serde::{Deserialize, Serialize};

use cloud_kitchen_core::{Email, UserId};

/// Customer profile stored under `userData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub email: Email,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Backend user id.
    pub uid: UserId,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Profile {
    /// Name to greet the user with: display name, else the email's local part.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            self.email.as_str().split('@').next().unwrap_or_default()
        } else {
            &self.display_name
        }
    }
}

/// Admin profile stored under `adminData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub email: Email,
}
