mod access;
mod auth;
mod common;
mod security;
mod users;

pub use access::{AccessGateResponse, AccessResponse};
pub use auth::AuthLoginRequest;
pub use common::{HealthResponse, SessionUserResponse};
pub use security::{
    AuditLogEntryResponse, PermissionDomainResponse, PermissionTemplateResponse, RoleResponse,
};
pub use users::{
    ChangeRoleRequest, EffectivePermissionsResponse, PermissionTemplateMode,
    PermissionTemplateRequest, SetPermissionOverridesRequest,
};
