//! The signed-in user and the persisted session shape.

use serde::{Deserialize, Serialize};

/// Profile fields returned by the gateway at sign-in and sign-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_business: bool,
}

/// A signed-in identity: the profile plus the bearer token.  The two are
/// always persisted together, never separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user: UserProfile,
    pub token: String,
}

/// Partial profile update.  Fields left `None` are not sent to the gateway
/// and are retained from the current profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_business: Option<bool>,
}

impl UserProfile {
    /// Shallow-merge `update` into this profile.  Unset fields keep their
    /// current values.
    pub fn merged(&self, update: &ProfileUpdate) -> UserProfile {
        UserProfile {
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            email: update.email.clone().unwrap_or_else(|| self.email.clone()),
            phone: update.phone.clone().unwrap_or_else(|| self.phone.clone()),
            is_business: update.is_business.unwrap_or(self.is_business),
        }
    }
}
