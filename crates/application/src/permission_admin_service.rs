use std::sync::Arc;

use caseline_core::{AppError, AppResult};
use caseline_domain::{
    AUDIT_LOG, AuditAction, Permission, PermissionDomain, PermissionSet, PermissionTemplate,
    RoleDefinition, USER_ADMINISTRATION, UserAccount,
};
use tracing::info;

use crate::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    AuthorizationService, UserDirectory,
};

mod overrides;
mod roles;
mod templates;

/// Resolved permission preview for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePermissions {
    /// Account identifier.
    pub user_id: String,
    /// Assigned role name.
    pub role: String,
    /// Whether the role is present in the registry.
    pub role_known: bool,
    /// Permissions granted by the role alone.
    pub role_permissions: Vec<Permission>,
    /// Stored user overrides.
    pub overrides: Vec<String>,
    /// Role permissions united with overrides.
    pub permissions: PermissionSet,
}

/// Application service for administering roles and permission overrides of
/// staff accounts.
#[derive(Clone)]
pub struct PermissionAdminService {
    authorization_service: AuthorizationService,
    user_directory: Arc<dyn UserDirectory>,
    audit_repository: Arc<dyn AuditRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
}

impl PermissionAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        user_directory: Arc<dyn UserDirectory>,
        audit_repository: Arc<dyn AuditRepository>,
        audit_log_repository: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            authorization_service,
            user_directory,
            audit_repository,
            audit_log_repository,
        }
    }

    /// Returns the registered roles in registry order.
    pub fn list_roles(&self, actor: &UserAccount) -> AppResult<Vec<RoleDefinition>> {
        self.require_user_administration(actor)?;
        Ok(self
            .authorization_service
            .role_registry()
            .definitions()
            .cloned()
            .collect())
    }

    /// Returns the registered permission templates in registry order.
    pub fn list_templates(&self, actor: &UserAccount) -> AppResult<Vec<PermissionTemplate>> {
        self.require_user_administration(actor)?;
        Ok(self
            .authorization_service
            .template_registry()
            .templates()
            .cloned()
            .collect())
    }

    /// Returns the permission catalog grouped by functional domain.
    pub fn catalog(
        &self,
        actor: &UserAccount,
    ) -> AppResult<Vec<(PermissionDomain, Vec<Permission>)>> {
        self.require_user_administration(actor)?;
        Ok(PermissionDomain::all()
            .iter()
            .map(|domain| (*domain, domain.permissions()))
            .collect())
    }

    /// Previews the effective permissions of an account.
    pub async fn effective_permissions(
        &self,
        actor: &UserAccount,
        user_id: &str,
    ) -> AppResult<EffectivePermissions> {
        self.require_user_administration(actor)?;
        let account = self.load_user(user_id).await?;
        Ok(self.preview(&account))
    }

    /// Returns recent audit entries.
    pub async fn list_audit_log(
        &self,
        actor: &UserAccount,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.authorization_service.require_gate(actor, &AUDIT_LOG)?;
        self.audit_log_repository.list_recent_entries(query).await
    }

    fn require_user_administration(&self, actor: &UserAccount) -> AppResult<()> {
        self.authorization_service
            .require_gate(actor, &USER_ADMINISTRATION)
            .map(|_| ())
    }

    async fn load_user(&self, user_id: &str) -> AppResult<UserAccount> {
        self.user_directory
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    fn preview(&self, account: &UserAccount) -> EffectivePermissions {
        let registry = self.authorization_service.role_registry();
        EffectivePermissions {
            user_id: account.id.clone(),
            role: account.role.clone(),
            role_known: registry.contains(account.role.as_str()),
            role_permissions: registry
                .role_permissions(account.role.as_str())
                .into_iter()
                .collect(),
            overrides: account.permission_overrides.clone(),
            permissions: self
                .authorization_service
                .resolve(account.role.as_str(), &account.permission_overrides),
        }
    }

    /// Persists a new override list and returns the recomputed account.
    async fn write_overrides(
        &self,
        actor: &UserAccount,
        mut account: UserAccount,
        overrides: Vec<String>,
        action: AuditAction,
        detail: String,
    ) -> AppResult<UserAccount> {
        self.user_directory
            .save_permission_overrides(account.id.as_str(), &overrides)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.id.clone(),
                action,
                resource_type: "user_permission_overrides".to_owned(),
                resource_id: account.id.clone(),
                detail: Some(detail),
            })
            .await?;

        info!(
            actor = %actor.id,
            subject = %account.id,
            action = action.as_str(),
            overrides = overrides.len(),
            "permission overrides updated"
        );

        account.permission_overrides = overrides;
        Ok(self.recompute(account))
    }

    fn recompute(&self, account: UserAccount) -> UserAccount {
        let permissions = self
            .authorization_service
            .resolve(account.role.as_str(), &account.permission_overrides);
        account.with_permissions(permissions)
    }
}

#[cfg(test)]
mod tests;
