use std::sync::Arc;

use caseline_core::{AppError, AppResult};
use caseline_domain::{
    AccessContext, AccessGate, Permission, PermissionSet, RoleRegistry, TemplateRegistry,
    UserAccount, resolve_effective_permissions,
};
use tracing::warn;

/// Application service that owns the process-wide role and template
/// registries and answers authorization questions against them.
///
/// Registries are loaded once at startup and never mutated. Every decision
/// resolves the subject's permissions from the live role registry; a
/// `permissions` list carried on a [`UserAccount`] is never consulted.
#[derive(Clone)]
pub struct AuthorizationService {
    roles: Arc<RoleRegistry>,
    templates: Arc<TemplateRegistry>,
}

impl AuthorizationService {
    /// Creates a new authorization service from loaded registries.
    #[must_use]
    pub fn new(roles: Arc<RoleRegistry>, templates: Arc<TemplateRegistry>) -> Self {
        Self { roles, templates }
    }

    /// Creates a service over the built-in registries.
    #[must_use]
    pub fn with_builtin_registries() -> Self {
        Self::new(
            Arc::new(RoleRegistry::builtin()),
            Arc::new(TemplateRegistry::builtin()),
        )
    }

    /// Returns the role registry.
    #[must_use]
    pub fn role_registry(&self) -> &RoleRegistry {
        &self.roles
    }

    /// Returns the template registry.
    #[must_use]
    pub fn template_registry(&self) -> &TemplateRegistry {
        &self.templates
    }

    /// Resolves `role permissions ∪ overrides`.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, role: &str, overrides: &[S]) -> PermissionSet {
        resolve_effective_permissions(&self.roles, role, overrides)
    }

    /// Builds the authorization context of an account from its role and
    /// stored overrides.
    #[must_use]
    pub fn access_context(&self, account: &UserAccount) -> AccessContext {
        AccessContext::resolve(
            &self.roles,
            account.role.as_str(),
            &account.permission_overrides,
        )
    }

    /// Ensures an account holds a permission and returns its context.
    pub fn require_permission(
        &self,
        account: &UserAccount,
        permission: Permission,
    ) -> AppResult<AccessContext> {
        let context = self.access_context(account);
        if context.has_permission(permission) {
            return Ok(context);
        }

        warn!(
            subject = %account.id,
            role = %account.role,
            permission = permission.as_str(),
            "permission check denied"
        );
        Err(AppError::Forbidden(format!(
            "subject '{}' is missing permission '{}'",
            account.id,
            permission.as_str()
        )))
    }

    /// Ensures an account passes a composite gate and returns its context.
    pub fn require_gate(
        &self,
        account: &UserAccount,
        gate: &AccessGate,
    ) -> AppResult<AccessContext> {
        let context = self.access_context(account);
        if context.passes(gate) {
            return Ok(context);
        }

        warn!(
            subject = %account.id,
            role = %account.role,
            gate = gate.name(),
            "access gate denied"
        );
        Err(AppError::Forbidden(format!(
            "subject '{}' may not access '{}'",
            account.id,
            gate.name()
        )))
    }
}
