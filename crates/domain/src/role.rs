//! Static role registry.
//!
//! A role is a name bound to a fixed set of catalog permissions plus
//! free-text restriction notes. Notes are shown to administrators and are
//! never enforced. The registry is immutable; editing a role means building a
//! new registry, which every holder of the role observes on their next
//! recompute.

use std::collections::{BTreeMap, BTreeSet};

use caseline_core::NonEmptyString;
use serde::Serialize;

use crate::Permission;

/// Role granted every catalog permission.
pub const ROLE_SYSTEM_ADMIN: &str = "System Admin";
/// Alias of [`ROLE_SYSTEM_ADMIN`] with the same grants.
pub const ROLE_ADMIN: &str = "Admin";
/// Program lead for one or more locations.
pub const ROLE_PROGRAM_MANAGER: &str = "Program Manager";
/// Clinical staff.
pub const ROLE_CLINICIAN: &str = "Clinician";
/// Case management staff.
pub const ROLE_CASE_MANAGER: &str = "Case Manager";
/// Street outreach and needle-syringe program staff.
pub const ROLE_OUTREACH_WORKER: &str = "Outreach Worker";
/// Data clerks.
pub const ROLE_DATA_ENTRY: &str = "Data Entry";
/// Read-only observers.
pub const ROLE_VIEWER: &str = "Viewer";

/// One role entry in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    name: String,
    permissions: BTreeSet<Permission>,
    restrictions: Vec<String>,
}

impl RoleDefinition {
    /// Creates a role definition.
    #[must_use]
    pub fn new(
        name: NonEmptyString,
        permissions: impl IntoIterator<Item = Permission>,
        restrictions: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            permissions: permissions.into_iter().collect(),
            restrictions,
        }
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the granted permissions.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    /// Returns the documentation-only restriction notes.
    #[must_use]
    pub fn restrictions(&self) -> &[String] {
        &self.restrictions
    }

    /// Returns a copy of this role with additional permissions.
    #[must_use]
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }
}

/// Immutable mapping from role names to permission bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    roles: BTreeMap<String, RoleDefinition>,
    order: Vec<String>,
}

impl RoleRegistry {
    /// Builds a registry from definitions. A later definition with the same
    /// name replaces an earlier one.
    #[must_use]
    pub fn from_definitions(definitions: impl IntoIterator<Item = RoleDefinition>) -> Self {
        let mut registry = Self {
            roles: BTreeMap::new(),
            order: Vec::new(),
        };
        for definition in definitions {
            registry.insert(definition);
        }

        registry
    }

    /// Returns the registry shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_definitions(builtin_roles())
    }

    /// Returns a new registry with `definition` added or replaced.
    #[must_use]
    pub fn with_role(&self, definition: RoleDefinition) -> Self {
        let mut registry = self.clone();
        registry.insert(definition);
        registry
    }

    /// Returns the permissions granted by `role_name`.
    ///
    /// Unknown names yield an empty set.
    #[must_use]
    pub fn role_permissions(&self, role_name: &str) -> BTreeSet<Permission> {
        self.roles
            .get(role_name)
            .map(|definition| definition.permissions.clone())
            .unwrap_or_default()
    }

    /// Returns the definition registered under `role_name`.
    #[must_use]
    pub fn definition(&self, role_name: &str) -> Option<&RoleDefinition> {
        self.roles.get(role_name)
    }

    /// Returns whether `role_name` is registered.
    #[must_use]
    pub fn contains(&self, role_name: &str) -> bool {
        self.roles.contains_key(role_name)
    }

    /// Returns role names in registration order.
    #[must_use]
    pub fn role_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Returns definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &RoleDefinition> {
        self.order.iter().filter_map(|name| self.roles.get(name))
    }

    fn insert(&mut self, definition: RoleDefinition) {
        let name = definition.name.clone();
        if !self.roles.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.roles.insert(name, definition);
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_role(name: &str, permissions: &[Permission], restrictions: &[&str]) -> RoleDefinition {
    RoleDefinition {
        name: name.to_owned(),
        permissions: permissions.iter().copied().collect(),
        restrictions: restrictions.iter().map(|note| (*note).to_owned()).collect(),
    }
}

fn builtin_roles() -> Vec<RoleDefinition> {
    use Permission::*;

    vec![
        builtin_role(ROLE_SYSTEM_ADMIN, Permission::all(), &[]),
        builtin_role(ROLE_ADMIN, Permission::all(), &[]),
        builtin_role(
            ROLE_PROGRAM_MANAGER,
            &[
                ClientView,
                ClientCreate,
                ClientEdit,
                ClientExport,
                VisitView,
                VisitCreate,
                VisitEdit,
                ClinicalView,
                ProgramView,
                ProgramManage,
                ReportView,
                ReportCreate,
                ReportExport,
                AnalyticsView,
                FormView,
                FormSubmit,
                FormManage,
                FollowupView,
                FollowupCreate,
                FollowupEdit,
                InterventionView,
                InterventionCreate,
                InterventionEdit,
                OutreachView,
                OutreachCreate,
                OutreachEdit,
                UserView,
            ],
            &["Cannot manage user accounts"],
        ),
        builtin_role(
            ROLE_CLINICIAN,
            &[
                ClientView,
                ClientEdit,
                VisitView,
                VisitCreate,
                VisitEdit,
                ClinicalView,
                ClinicalCreate,
                ClinicalEdit,
                ClinicalApprove,
                ClinicalMentalHealth,
                ProgramView,
                ReportView,
                FormView,
                FormSubmit,
                FollowupView,
                FollowupCreate,
                FollowupEdit,
                InterventionView,
                InterventionCreate,
                InterventionEdit,
            ],
            &["HIV module access is granted by role"],
        ),
        builtin_role(
            ROLE_CASE_MANAGER,
            &[
                ClientView,
                ClientCreate,
                ClientEdit,
                VisitView,
                VisitCreate,
                VisitEdit,
                ProgramView,
                ReportView,
                FormView,
                FormSubmit,
                FollowupView,
                FollowupCreate,
                FollowupEdit,
                InterventionView,
                InterventionCreate,
                InterventionEdit,
                OutreachView,
            ],
            &["No access to clinical records"],
        ),
        builtin_role(
            ROLE_OUTREACH_WORKER,
            &[
                ClientView,
                ClientCreate,
                VisitView,
                VisitCreate,
                FormView,
                FormSubmit,
                FollowupView,
                OutreachView,
                OutreachCreate,
                OutreachEdit,
            ],
            &["Limited to outreach and NSP logging"],
        ),
        builtin_role(
            ROLE_DATA_ENTRY,
            &[
                ClientView,
                ClientCreate,
                ClientEdit,
                VisitView,
                VisitCreate,
                VisitEdit,
                ProgramView,
                FormView,
                FormSubmit,
                FollowupView,
                FollowupCreate,
                InterventionView,
                OutreachView,
            ],
            &["Cannot delete records", "No access to clinical records"],
        ),
        builtin_role(
            ROLE_VIEWER,
            &[
                ClientView,
                VisitView,
                ProgramView,
                ReportView,
                AnalyticsView,
                FormView,
                FollowupView,
                InterventionView,
                OutreachView,
            ],
            &["Read-only access"],
        ),
    ]
}
