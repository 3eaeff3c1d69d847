use caseline_application::AuditLogEntry;
use caseline_domain::{Permission, PermissionDomain, PermissionTemplate, RoleDefinition};
use serde::Serialize;
use ts_rs::TS;

/// Catalog permissions grouped under one functional domain.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-domain-response.ts"
)]
pub struct PermissionDomainResponse {
    pub domain: String,
    pub permissions: Vec<String>,
}

impl From<(PermissionDomain, Vec<Permission>)> for PermissionDomainResponse {
    fn from((domain, permissions): (PermissionDomain, Vec<Permission>)) -> Self {
        Self {
            domain: domain.as_str().to_owned(),
            permissions: permissions
                .into_iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
        }
    }
}

/// API representation of a registry role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub name: String,
    pub permissions: Vec<String>,
    /// Documentation-only notes; never enforced.
    pub restrictions: Vec<String>,
}

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            name: value.name().to_owned(),
            permissions: value
                .permissions()
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            restrictions: value.restrictions().to_vec(),
        }
    }
}

/// API representation of a permission template.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-template-response.ts"
)]
pub struct PermissionTemplateResponse {
    pub name: String,
    pub permissions: Vec<String>,
}

impl From<PermissionTemplate> for PermissionTemplateResponse {
    fn from(value: PermissionTemplate) -> Self {
        Self {
            name: value.name().to_owned(),
            permissions: value
                .permissions()
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
        }
    }
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub event_id: String,
    pub subject: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            event_id: value.event_id,
            subject: value.subject,
            action: value.action,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            detail: value.detail,
            created_at: value.created_at,
        }
    }
}
