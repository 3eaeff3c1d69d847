use caseline_application::EffectivePermissions;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Resolved permission preview for one account.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/effective-permissions-response.ts"
)]
pub struct EffectivePermissionsResponse {
    pub user_id: String,
    pub role: String,
    pub role_known: bool,
    pub role_permissions: Vec<String>,
    pub permission_overrides: Vec<String>,
    pub permissions: Vec<String>,
}

impl From<EffectivePermissions> for EffectivePermissionsResponse {
    fn from(value: EffectivePermissions) -> Self {
        Self {
            user_id: value.user_id,
            role: value.role,
            role_known: value.role_known,
            role_permissions: value
                .role_permissions
                .into_iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            permission_overrides: value.overrides,
            permissions: value.permissions.to_vec(),
        }
    }
}

/// Incoming payload replacing a user's permission overrides.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-permission-overrides-request.ts"
)]
pub struct SetPermissionOverridesRequest {
    pub permissions: Vec<String>,
}

/// How a template is written into a user's overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-template-mode.ts"
)]
pub enum PermissionTemplateMode {
    /// Replace existing overrides.
    Apply,
    /// Merge into existing overrides.
    Add,
}

/// Incoming payload for writing a permission template.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-template-request.ts"
)]
pub struct PermissionTemplateRequest {
    pub template_name: String,
    pub mode: PermissionTemplateMode,
}

/// Incoming payload for a role change.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/change-role-request.ts"
)]
pub struct ChangeRoleRequest {
    pub role: String,
}
