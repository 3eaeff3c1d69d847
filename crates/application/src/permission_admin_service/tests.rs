use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use caseline_core::{AppError, AppResult};
use caseline_domain::{
    AuditAction, Permission, ROLE_ADMIN, ROLE_CASE_MANAGER, ROLE_CLINICIAN, ROLE_DATA_ENTRY,
    ROLE_PROGRAM_MANAGER, ROLE_VIEWER, TEMPLATE_CLINICAL_ACCESS, TEMPLATE_REPORTING, UserAccount,
};
use tokio::sync::Mutex;

use crate::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    AuthorizationService, UserDirectory,
};

use super::PermissionAdminService;

#[derive(Default)]
struct FakeUserDirectory {
    accounts: Mutex<HashMap<String, UserAccount>>,
}

#[async_trait]
impl UserDirectory for FakeUserDirectory {
    async fn authenticate(
        &self,
        _username: &str,
        _password: &str,
    ) -> AppResult<Option<UserAccount>> {
        Ok(None)
    }

    async fn find_user(&self, user_id: &str) -> AppResult<Option<UserAccount>> {
        Ok(self.accounts.lock().await.get(user_id).cloned())
    }

    async fn save_permission_overrides(
        &self,
        user_id: &str,
        overrides: &[String],
    ) -> AppResult<()> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(user_id.to_owned()))?;
        account.permission_overrides = overrides.to_vec();
        Ok(())
    }

    async fn save_role(&self, user_id: &str, role: &str) -> AppResult<()> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(user_id.to_owned()))?;
        account.role = role.to_owned();
        Ok(())
    }
}

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for FakeAuditRepository {
    async fn list_recent_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .rev()
            .enumerate()
            .map(|(index, event)| AuditLogEntry {
                event_id: index.to_string(),
                subject: event.subject.clone(),
                action: event.action.as_str().to_owned(),
                resource_type: event.resource_type.clone(),
                resource_id: event.resource_id.clone(),
                detail: event.detail.clone(),
                created_at: "2026-01-01T00:00:00Z".to_owned(),
            })
            .take(query.limit)
            .collect())
    }
}

struct Fixture {
    service: PermissionAdminService,
    directory: Arc<FakeUserDirectory>,
    audit: Arc<FakeAuditRepository>,
}

async fn fixture(accounts: Vec<UserAccount>) -> Fixture {
    let directory = Arc::new(FakeUserDirectory::default());
    {
        let mut stored = directory.accounts.lock().await;
        for account in accounts {
            stored.insert(account.id.clone(), account);
        }
    }
    let audit = Arc::new(FakeAuditRepository::default());
    let service = PermissionAdminService::new(
        AuthorizationService::with_builtin_registries(),
        directory.clone(),
        audit.clone(),
        audit.clone(),
    );

    Fixture {
        service,
        directory,
        audit,
    }
}

fn admin() -> UserAccount {
    UserAccount::new("admin-1", "root", "Root", ROLE_ADMIN)
}

async fn stored_overrides(directory: &FakeUserDirectory, user_id: &str) -> Vec<String> {
    directory
        .accounts
        .lock()
        .await
        .get(user_id)
        .map(|account| account.permission_overrides.clone())
        .unwrap_or_default()
}

#[tokio::test]
async fn apply_template_replaces_existing_overrides() {
    let target = UserAccount::new("u-1", "sam", "Sam", ROLE_CASE_MANAGER)
        .with_overrides(vec!["z".to_owned()]);
    let fixture = fixture(vec![target]).await;

    let result = fixture
        .service
        .apply_template(&admin(), "u-1", TEMPLATE_REPORTING)
        .await;
    let Ok(updated) = result else {
        panic!("template should apply");
    };

    let overrides = stored_overrides(&fixture.directory, "u-1").await;
    assert_eq!(overrides.len(), 4);
    assert!(!overrides.contains(&"z".to_owned()));
    assert_eq!(updated.permission_overrides, overrides);
    assert!(updated.permissions.contains(&"analytics.view".to_owned()));

    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(
        events.first().map(|event| event.action),
        Some(AuditAction::PermissionTemplateApplied)
    );
}

#[tokio::test]
async fn add_template_merges_into_existing_overrides() {
    let target = UserAccount::new("u-1", "sam", "Sam", ROLE_CASE_MANAGER)
        .with_overrides(vec!["z".to_owned(), "report.view".to_owned()]);
    let fixture = fixture(vec![target]).await;

    let result = fixture
        .service
        .add_template(&admin(), "u-1", TEMPLATE_REPORTING)
        .await;
    assert!(result.is_ok());

    let overrides = stored_overrides(&fixture.directory, "u-1").await;
    assert_eq!(overrides.first().map(String::as_str), Some("z"));
    assert_eq!(overrides.len(), 5);
}

#[tokio::test]
async fn unknown_template_is_rejected_without_touching_overrides() {
    let target = UserAccount::new("u-1", "sam", "Sam", ROLE_CASE_MANAGER)
        .with_overrides(vec!["report.view".to_owned()]);
    let fixture = fixture(vec![target]).await;

    let result = fixture
        .service
        .apply_template(&admin(), "u-1", "Night Shift")
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(
        stored_overrides(&fixture.directory, "u-1").await,
        vec!["report.view".to_owned()]
    );
    assert!(fixture.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn set_overrides_validates_and_deduplicates_tokens() {
    let fixture = fixture(vec![UserAccount::new("u-1", "sam", "Sam", ROLE_VIEWER)]).await;

    let invalid = fixture
        .service
        .set_overrides(
            &admin(),
            "u-1",
            &["client.view".to_owned(), "client.teleport".to_owned()],
        )
        .await;
    assert!(matches!(invalid, Err(AppError::Validation(_))));
    assert!(stored_overrides(&fixture.directory, "u-1").await.is_empty());

    let valid = fixture
        .service
        .set_overrides(
            &admin(),
            "u-1",
            &[
                "system.audit".to_owned(),
                "report.export".to_owned(),
                "system.audit".to_owned(),
            ],
        )
        .await;
    assert!(valid.is_ok());
    assert_eq!(
        stored_overrides(&fixture.directory, "u-1").await,
        vec!["system.audit".to_owned(), "report.export".to_owned()]
    );
}

#[tokio::test]
async fn grant_and_revoke_edit_single_tokens() {
    let target = UserAccount::new("u-1", "sam", "Sam", ROLE_DATA_ENTRY)
        .with_overrides(vec!["legacy.flag".to_owned()]);
    let fixture = fixture(vec![target]).await;

    let granted = fixture
        .service
        .grant_override(&admin(), "u-1", Permission::SystemAudit)
        .await;
    let Ok(granted) = granted else {
        panic!("grant should succeed");
    };
    assert_eq!(granted.permissions.len(), 15);

    let revoked = fixture
        .service
        .revoke_override(&admin(), "u-1", "legacy.flag")
        .await;
    let Ok(revoked) = revoked else {
        panic!("revoke should succeed");
    };
    assert_eq!(revoked.permission_overrides, vec!["system.audit".to_owned()]);
    assert_eq!(revoked.permissions.len(), 14);

    let role_grant = fixture
        .service
        .revoke_override(&admin(), "u-1", "client.view")
        .await;
    let Ok(role_grant) = role_grant else {
        panic!("revoke should succeed");
    };
    assert!(role_grant.permissions.contains(&"client.view".to_owned()));
    assert_eq!(fixture.audit.events.lock().await.len(), 3);
}

#[tokio::test]
async fn change_role_keeps_overrides() {
    let target = UserAccount::new("u-1", "sam", "Sam", ROLE_DATA_ENTRY)
        .with_overrides(vec!["system.audit".to_owned()]);
    let fixture = fixture(vec![target]).await;

    let result = fixture
        .service
        .change_role(&admin(), "u-1", ROLE_VIEWER)
        .await;
    let Ok(updated) = result else {
        panic!("role change should succeed");
    };
    assert_eq!(updated.role, ROLE_VIEWER);
    assert_eq!(updated.permissions.len(), 10);
    assert!(updated.permissions.contains(&"system.audit".to_owned()));
    assert_eq!(
        stored_overrides(&fixture.directory, "u-1").await,
        vec!["system.audit".to_owned()]
    );

    let events = fixture.audit.events.lock().await;
    assert_eq!(
        events.first().map(|event| event.action),
        Some(AuditAction::UserRoleChanged)
    );
}

#[tokio::test]
async fn change_role_rejects_unknown_roles() {
    let fixture = fixture(vec![UserAccount::new("u-1", "sam", "Sam", ROLE_VIEWER)]).await;

    let result = fixture
        .service
        .change_role(&admin(), "u-1", "Volunteer")
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let fixture = fixture(Vec::new()).await;

    let result = fixture
        .service
        .grant_override(&admin(), "ghost", Permission::ClientView)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let preview = fixture.service.effective_permissions(&admin(), "ghost").await;
    assert!(matches!(preview, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn non_administrators_are_forbidden() {
    let program_manager = UserAccount::new("pm-1", "pm", "PM", ROLE_PROGRAM_MANAGER);
    let fixture = fixture(vec![UserAccount::new("u-1", "sam", "Sam", ROLE_VIEWER)]).await;

    let result = fixture
        .service
        .apply_template(&program_manager, "u-1", TEMPLATE_CLINICAL_ACCESS)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(matches!(
        fixture.service.list_roles(&program_manager),
        Err(AppError::Forbidden(_))
    ));
    assert!(fixture.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn user_permissions_override_opens_administration() {
    let delegate = UserAccount::new("d-1", "del", "Delegate", ROLE_CASE_MANAGER)
        .with_overrides(vec!["user.permissions".to_owned()]);
    let fixture = fixture(vec![UserAccount::new("u-1", "sam", "Sam", ROLE_VIEWER)]).await;

    let result = fixture
        .service
        .grant_override(&delegate, "u-1", Permission::ReportExport)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn effective_permissions_previews_role_and_overrides() {
    let target = UserAccount::new("u-1", "kim", "Kim", ROLE_CLINICIAN)
        .with_overrides(vec!["clinical.hiv".to_owned()]);
    let fixture = fixture(vec![target]).await;

    let preview = fixture.service.effective_permissions(&admin(), "u-1").await;
    let Ok(preview) = preview else {
        panic!("preview should succeed");
    };
    assert!(preview.role_known);
    assert_eq!(preview.role_permissions.len(), 20);
    assert_eq!(preview.permissions.len(), 21);
    assert!(preview.permissions.contains(Permission::ClinicalHiv));
}

#[tokio::test]
async fn read_helpers_expose_registries_and_catalog() {
    let fixture = fixture(Vec::new()).await;

    let roles = fixture.service.list_roles(&admin()).unwrap_or_default();
    assert_eq!(roles.len(), 8);
    let templates = fixture.service.list_templates(&admin()).unwrap_or_default();
    assert_eq!(templates.len(), 5);
    let catalog = fixture.service.catalog(&admin()).unwrap_or_default();
    assert_eq!(
        catalog
            .iter()
            .map(|(_, permissions)| permissions.len())
            .sum::<usize>(),
        Permission::all().len()
    );
}

#[tokio::test]
async fn audit_log_requires_audit_gate() {
    let fixture = fixture(vec![UserAccount::new("u-1", "sam", "Sam", ROLE_VIEWER)]).await;
    let granted = fixture
        .service
        .grant_override(&admin(), "u-1", Permission::ReportView)
        .await;
    assert!(granted.is_ok());

    let entries = fixture
        .service
        .list_audit_log(&admin(), AuditLogQuery::default())
        .await
        .unwrap_or_default();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries.first().map(|entry| entry.action.as_str()),
        Some("security.permission_overrides.updated")
    );

    let viewer = UserAccount::new("v-1", "vi", "Vi", ROLE_VIEWER);
    let denied = fixture
        .service
        .list_audit_log(&viewer, AuditLogQuery::default())
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
}
