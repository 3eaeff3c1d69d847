//! Permission templates used to bulk-write user overrides.

use std::collections::BTreeMap;

use caseline_core::NonEmptyString;
use serde::Serialize;

use crate::Permission;
use crate::permission_set::dedup_tokens;

/// Template granting every catalog permission.
pub const TEMPLATE_FULL_ACCESS: &str = "Full Access";
/// Template for shift supervisors.
pub const TEMPLATE_SUPERVISOR: &str = "Supervisor";
/// Template unlocking sensitive clinical modules.
pub const TEMPLATE_CLINICAL_ACCESS: &str = "Clinical Access";
/// Template for reporting staff.
pub const TEMPLATE_REPORTING: &str = "Reporting";
/// Template mirroring the viewer role.
pub const TEMPLATE_READ_ONLY: &str = "Read Only";

/// Named permission bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionTemplate {
    name: String,
    permissions: Vec<Permission>,
}

impl PermissionTemplate {
    /// Creates a template. Duplicate permissions are dropped.
    #[must_use]
    pub fn new(name: NonEmptyString, permissions: impl IntoIterator<Item = Permission>) -> Self {
        let mut unique = Vec::new();
        for permission in permissions {
            if !unique.contains(&permission) {
                unique.push(permission);
            }
        }

        Self {
            name: name.into(),
            permissions: unique,
        }
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the bundled permissions.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

/// Immutable registry of permission templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, PermissionTemplate>,
    order: Vec<String>,
}

impl TemplateRegistry {
    /// Builds a registry from templates. A later template with the same name
    /// replaces an earlier one.
    #[must_use]
    pub fn from_templates(templates: impl IntoIterator<Item = PermissionTemplate>) -> Self {
        let mut registry = Self {
            templates: BTreeMap::new(),
            order: Vec::new(),
        };
        for template in templates {
            let name = template.name.clone();
            if !registry.templates.contains_key(&name) {
                registry.order.push(name.clone());
            }
            registry.templates.insert(name, template);
        }

        registry
    }

    /// Returns the templates shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_templates(builtin_templates())
    }

    /// Returns the permissions bundled under `name`; unknown names yield an
    /// empty list.
    #[must_use]
    pub fn template_permissions(&self, name: &str) -> Vec<Permission> {
        self.templates
            .get(name)
            .map(|template| template.permissions.clone())
            .unwrap_or_default()
    }

    /// Returns template names in registration order.
    #[must_use]
    pub fn template_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Returns the template registered under `name`.
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&PermissionTemplate> {
        self.templates.get(name)
    }

    /// Returns templates in registration order.
    pub fn templates(&self) -> impl Iterator<Item = &PermissionTemplate> {
        self.order.iter().filter_map(|name| self.templates.get(name))
    }

    /// Override list produced by applying `name`: the template's tokens and
    /// nothing else. Prior overrides are discarded.
    #[must_use]
    pub fn apply(&self, name: &str) -> Vec<String> {
        self.template_permissions(name)
            .iter()
            .map(|permission| permission.as_str().to_owned())
            .collect()
    }

    /// Override list produced by adding `name` on top of `existing`.
    #[must_use]
    pub fn add(&self, name: &str, existing: &[String]) -> Vec<String> {
        let bundled = self.template_permissions(name);
        dedup_tokens(
            existing
                .iter()
                .map(String::as_str)
                .chain(bundled.iter().map(|permission| permission.as_str())),
        )
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_template(name: &str, permissions: &[Permission]) -> PermissionTemplate {
    PermissionTemplate {
        name: name.to_owned(),
        permissions: permissions.to_vec(),
    }
}

fn builtin_templates() -> Vec<PermissionTemplate> {
    use Permission::*;

    vec![
        builtin_template(TEMPLATE_FULL_ACCESS, Permission::all()),
        builtin_template(
            TEMPLATE_SUPERVISOR,
            &[
                ClientView,
                ClientEdit,
                VisitView,
                VisitEdit,
                ClinicalView,
                ClinicalApprove,
                ReportView,
                ReportCreate,
                ReportExport,
                AnalyticsView,
                FollowupView,
                FollowupEdit,
                UserView,
            ],
        ),
        builtin_template(
            TEMPLATE_CLINICAL_ACCESS,
            &[
                ClinicalView,
                ClinicalCreate,
                ClinicalEdit,
                ClinicalHiv,
                ClinicalMentalHealth,
            ],
        ),
        builtin_template(
            TEMPLATE_REPORTING,
            &[ReportView, ReportCreate, ReportExport, AnalyticsView],
        ),
        builtin_template(
            TEMPLATE_READ_ONLY,
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
        ),
    ]
}
