//! Access-control domain: permission catalog, role and template registries,
//! effective permission resolution and guard predicates.

#![forbid(unsafe_code)]

mod access;
mod permission_set;
mod role;
mod security;
mod template;
mod user;

pub use access::{
    AUDIT_LOG, AccessContext, AccessGate, HIV_MODULE, MENTAL_HEALTH_SCORES, USER_ADMINISTRATION,
    resolve_effective_permissions, resolve_effective_permissions_from_value,
};
pub use permission_set::{
    PermissionSet, dedup_tokens, has_all_permissions, has_any_permission, has_permission,
    sanitize_overrides,
};
pub use role::{
    ROLE_ADMIN, ROLE_CASE_MANAGER, ROLE_CLINICIAN, ROLE_DATA_ENTRY, ROLE_OUTREACH_WORKER,
    ROLE_PROGRAM_MANAGER, ROLE_SYSTEM_ADMIN, ROLE_VIEWER, RoleDefinition, RoleRegistry,
};
pub use security::{AuditAction, Permission, PermissionDomain};
pub use template::{
    PermissionTemplate, TEMPLATE_CLINICAL_ACCESS, TEMPLATE_FULL_ACCESS, TEMPLATE_READ_ONLY,
    TEMPLATE_REPORTING, TEMPLATE_SUPERVISOR, TemplateRegistry,
};
pub use user::UserAccount;
