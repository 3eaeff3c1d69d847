//! Staff account records as exchanged with the remote data API.
//!
//! Authorization-relevant fields are decoded leniently: malformed values
//! degrade to "no role" or "no overrides" instead of failing the whole
//! record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::permission_set::{PermissionSet, sanitize_overrides};

/// Staff account subset relevant to access control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Stable account identifier.
    #[serde(deserialize_with = "deserialize_identifier")]
    pub id: String,
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Display name shown in the interface.
    #[serde(default)]
    pub display_name: String,
    /// Assigned role name.
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: String,
    /// User-specific grants on top of the role bundle.
    #[serde(default, deserialize_with = "deserialize_overrides")]
    pub permission_overrides: Vec<String>,
    /// Derived effective permissions. Never authoritative; replaced on every
    /// login and session restore.
    #[serde(default, deserialize_with = "deserialize_overrides")]
    pub permissions: Vec<String>,
    /// Program location the account is attached to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl UserAccount {
    /// Creates an account with no overrides.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        display_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            display_name: display_name.into(),
            role: role.into(),
            permission_overrides: Vec::new(),
            permissions: Vec::new(),
            location: None,
        }
    }

    /// Returns a copy carrying the given overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Vec<String>) -> Self {
        self.permission_overrides = overrides;
        self
    }

    /// Returns a copy attached to a program location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Returns a copy whose derived permissions are replaced by `permissions`.
    #[must_use]
    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = permissions.into();
        self
    }
}

fn deserialize_identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "user id must be a string or number, got {other}"
        ))),
    }
}

fn deserialize_role<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        _ => String::new(),
    })
}

fn deserialize_overrides<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(sanitize_overrides(&Value::deserialize(deserializer)?))
}
