use caseline_domain::UserAccount;
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// API representation of a session account with recomputed permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/session-user-response.ts"
)]
pub struct SessionUserResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub location: Option<String>,
    pub permission_overrides: Vec<String>,
    /// Effective permissions; a UI affordance hint, not an authorization proof.
    pub permissions: Vec<String>,
}

impl From<UserAccount> for SessionUserResponse {
    fn from(value: UserAccount) -> Self {
        Self {
            id: value.id,
            username: value.username,
            display_name: value.display_name,
            role: value.role,
            location: value.location,
            permission_overrides: value.permission_overrides,
            permissions: value.permissions,
        }
    }
}
