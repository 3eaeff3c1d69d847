use std::collections::VecDeque;

use async_trait::async_trait;
use caseline_application::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
use caseline_core::AppResult;
use chrono::{SecondsFormat, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

const MAX_LIST_LIMIT: usize = 200;
const MAX_LIST_OFFSET: usize = 5_000;

// Everything a listing can still reach.
const DEFAULT_AUDIT_RETENTION: usize = MAX_LIST_OFFSET + MAX_LIST_LIMIT;

/// Process-local audit log that keeps the newest `retention` entries.
#[derive(Debug)]
pub struct InMemoryAuditRepository {
    entries: RwLock<VecDeque<AuditLogEntry>>,
    retention: usize,
}

impl InMemoryAuditRepository {
    /// Creates an empty audit log with the default retention.
    #[must_use]
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_AUDIT_RETENTION)
    }

    /// Creates an empty audit log that drops the oldest entries beyond
    /// `retention`. A retention of zero is treated as one.
    #[must_use]
    pub fn with_retention(retention: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            retention: retention.max(1),
        }
    }
}

impl Default for InMemoryAuditRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let entry = AuditLogEntry {
            event_id: Uuid::new_v4().to_string(),
            subject: event.subject,
            action: event.action.as_str().to_owned(),
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            detail: event.detail,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        let mut entries = self.entries.write().await;
        if entries.len() >= self.retention {
            entries.pop_front();
        }
        entries.push_back(entry);
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditRepository {
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let capped_limit = query.limit.clamp(1, MAX_LIST_LIMIT);
        let capped_offset = query.offset.min(MAX_LIST_OFFSET);

        Ok(self
            .entries
            .read()
            .await
            .iter()
            .rev()
            .filter(|entry| {
                query
                    .action
                    .as_deref()
                    .is_none_or(|action| entry.action == action)
            })
            .filter(|entry| {
                query
                    .subject
                    .as_deref()
                    .is_none_or(|subject| entry.subject == subject)
            })
            .skip(capped_offset)
            .take(capped_limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use caseline_application::{AuditEvent, AuditLogQuery, AuditLogRepository, AuditRepository};
    use caseline_core::AppResult;
    use caseline_domain::AuditAction;

    use super::InMemoryAuditRepository;

    fn event(subject: &str, action: AuditAction, resource_id: &str) -> AuditEvent {
        AuditEvent {
            subject: subject.to_owned(),
            action,
            resource_type: "user_permission_overrides".to_owned(),
            resource_id: resource_id.to_owned(),
            detail: None,
        }
    }

    #[tokio::test]
    async fn lists_newest_first_with_filters() -> AppResult<()> {
        let repository = InMemoryAuditRepository::new();
        repository
            .append_event(event("admin-1", AuditAction::PermissionTemplateApplied, "u-1"))
            .await?;
        repository
            .append_event(event("admin-2", AuditAction::UserRoleChanged, "u-2"))
            .await?;
        repository
            .append_event(event("admin-1", AuditAction::PermissionOverridesUpdated, "u-3"))
            .await?;

        let all = repository
            .list_recent_entries(AuditLogQuery::default())
            .await?;
        assert_eq!(
            all.iter()
                .map(|entry| entry.resource_id.as_str())
                .collect::<Vec<_>>(),
            vec!["u-3", "u-2", "u-1"]
        );

        let by_subject = repository
            .list_recent_entries(AuditLogQuery {
                subject: Some("admin-1".to_owned()),
                ..AuditLogQuery::default()
            })
            .await?;
        assert_eq!(by_subject.len(), 2);

        let by_action = repository
            .list_recent_entries(AuditLogQuery {
                action: Some("security.user_role.changed".to_owned()),
                ..AuditLogQuery::default()
            })
            .await?;
        assert_eq!(by_action.len(), 1);

        let paged = repository
            .list_recent_entries(AuditLogQuery {
                limit: 1,
                offset: 1,
                ..AuditLogQuery::default()
            })
            .await?;
        assert_eq!(
            paged.first().map(|entry| entry.resource_id.as_str()),
            Some("u-2")
        );
        Ok(())
    }

    #[tokio::test]
    async fn drops_oldest_entries_beyond_retention() -> AppResult<()> {
        let repository = InMemoryAuditRepository::with_retention(2);
        for resource_id in ["u-1", "u-2", "u-3"] {
            repository
                .append_event(event("admin-1", AuditAction::UserRoleChanged, resource_id))
                .await?;
        }

        let kept = repository
            .list_recent_entries(AuditLogQuery::default())
            .await?;
        assert_eq!(
            kept.iter()
                .map(|entry| entry.resource_id.as_str())
                .collect::<Vec<_>>(),
            vec!["u-3", "u-2"]
        );
        Ok(())
    }
}
