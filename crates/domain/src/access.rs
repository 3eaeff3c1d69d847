//! Effective permission resolution and composite access gates.

use serde::Serialize;
use serde_json::Value;

use crate::permission_set::{PermissionSet, sanitize_overrides};
use crate::{Permission, ROLE_ADMIN, ROLE_CLINICIAN, ROLE_SYSTEM_ADMIN, RoleRegistry};

/// Computes `role permissions ∪ overrides`.
///
/// The role's bundle is read from `registry` on every call. Overrides only
/// ever add tokens; nothing in an override list can remove a role grant.
#[must_use]
pub fn resolve_effective_permissions<S: AsRef<str>>(
    registry: &RoleRegistry,
    role: &str,
    overrides: &[S],
) -> PermissionSet {
    let mut permissions: PermissionSet = registry.role_permissions(role).into_iter().collect();
    for token in overrides {
        permissions.insert(token.as_ref());
    }

    permissions
}

/// Same as [`resolve_effective_permissions`] for an untyped override value.
#[must_use]
pub fn resolve_effective_permissions_from_value(
    registry: &RoleRegistry,
    role: &str,
    overrides: &Value,
) -> PermissionSet {
    resolve_effective_permissions(registry, role, &sanitize_overrides(overrides))
}

/// Composite guard: a role whitelist OR a single permission token.
///
/// Both paths are evaluated. Whitelisted roles pass even when the token is
/// absent from their resolved set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessGate {
    name: &'static str,
    roles: &'static [&'static str],
    permission: Permission,
}

/// HIV status and the HIV service module.
pub const HIV_MODULE: AccessGate = AccessGate {
    name: "hiv_module",
    roles: &[ROLE_SYSTEM_ADMIN, ROLE_ADMIN, ROLE_CLINICIAN],
    permission: Permission::ClinicalHiv,
};

/// Mental-health assessments and scores.
pub const MENTAL_HEALTH_SCORES: AccessGate = AccessGate {
    name: "mental_health_scores",
    roles: &[ROLE_SYSTEM_ADMIN, ROLE_ADMIN, ROLE_CLINICIAN],
    permission: Permission::ClinicalMentalHealth,
};

/// Staff account and override administration.
pub const USER_ADMINISTRATION: AccessGate = AccessGate {
    name: "user_administration",
    roles: &[ROLE_SYSTEM_ADMIN, ROLE_ADMIN],
    permission: Permission::UserPermissions,
};

/// Audit log viewer.
pub const AUDIT_LOG: AccessGate = AccessGate {
    name: "audit_log",
    roles: &[ROLE_SYSTEM_ADMIN, ROLE_ADMIN],
    permission: Permission::SystemAudit,
};

impl AccessGate {
    /// Returns every built-in gate.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AccessGate] = &[
            HIV_MODULE,
            MENTAL_HEALTH_SCORES,
            USER_ADMINISTRATION,
            AUDIT_LOG,
        ];

        ALL
    }

    /// Returns the stable gate name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the whitelisted role names.
    #[must_use]
    pub fn roles(&self) -> &'static [&'static str] {
        self.roles
    }

    /// Returns the permission that opens the gate.
    #[must_use]
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Evaluates the gate for a role and its resolved permissions.
    #[must_use]
    pub fn allows(&self, role: &str, permissions: &PermissionSet) -> bool {
        self.roles.iter().any(|allowed| *allowed == role) || permissions.contains(self.permission)
    }
}

/// Authorization context for one signed-in user.
///
/// Built only from resolver output; callers thread it through instead of
/// reading a stored permission list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    role: String,
    permissions: PermissionSet,
}

impl AccessContext {
    /// Resolves a context from the live registry.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(registry: &RoleRegistry, role: &str, overrides: &[S]) -> Self {
        Self {
            role: role.to_owned(),
            permissions: resolve_effective_permissions(registry, role, overrides),
        }
    }

    /// Context holding no role and no permissions.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            role: String::new(),
            permissions: PermissionSet::new(),
        }
    }

    /// Returns the role name.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    /// Returns the resolved permissions.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns whether the token is held.
    #[must_use]
    pub fn has_permission(&self, token: impl AsRef<str>) -> bool {
        self.permissions.contains(token)
    }

    /// Returns whether any of the tokens is held.
    #[must_use]
    pub fn has_any_permission<I>(&self, tokens: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.permissions.contains_any(tokens)
    }

    /// Returns whether all of the tokens are held.
    #[must_use]
    pub fn has_all_permissions<I>(&self, tokens: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.permissions.contains_all(tokens)
    }

    /// Evaluates a composite gate.
    #[must_use]
    pub fn passes(&self, gate: &AccessGate) -> bool {
        gate.allows(self.role.as_str(), &self.permissions)
    }
}
