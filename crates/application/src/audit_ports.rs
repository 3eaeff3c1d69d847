use async_trait::async_trait;
use caseline_core::AppResult;
use caseline_domain::AuditAction;

/// Record of one administrative access change, written after the change
/// has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Account id of the administrator who made the change.
    pub subject: String,
    /// Kind of change.
    pub action: AuditAction,
    /// What was changed, such as `user_role`.
    pub resource_type: String,
    /// Account id of the user whose access changed.
    pub resource_id: String,
    /// Human-readable summary shown in the audit viewer.
    pub detail: Option<String>,
}

/// Stored audit event as listed in the audit viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Generated entry id.
    pub event_id: String,
    /// Acting administrator.
    pub subject: String,
    /// Action token, see [`AuditAction::as_str`].
    pub action: String,
    /// Changed resource kind.
    pub resource_type: String,
    /// Affected account id.
    pub resource_id: String,
    /// Change summary.
    pub detail: Option<String>,
    /// UTC write time, RFC 3339.
    pub created_at: String,
}

/// Filters and paging for the audit viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Page size. Adapters clamp it to a sane range.
    pub limit: usize,
    /// Entries to skip from the newest one.
    pub offset: usize,
    /// Only entries with this action token.
    pub action: Option<String>,
    /// Only entries written by this administrator.
    pub subject: Option<String>,
}

impl Default for AuditLogQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
            action: None,
            subject: None,
        }
    }
}

/// Append-only sink for access-change events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Stores one event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// Read side of the audit log.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Returns matching entries, newest first.
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>>;
}
