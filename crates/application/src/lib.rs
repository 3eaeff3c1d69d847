//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod authorization_service;
mod permission_admin_service;
mod session_service;
mod user_ports;

pub use audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
pub use authorization_service::AuthorizationService;
pub use permission_admin_service::{EffectivePermissions, PermissionAdminService};
pub use session_service::SessionService;
pub use user_ports::{PasswordHasher, UserDirectory};
