//! JSON file replacing the built-in role and template registries.
//!
//! ```json
//! {
//!   "roles": [
//!     { "name": "Peer Navigator", "permissions": ["client.view"], "restrictions": [] }
//!   ],
//!   "templates": [
//!     { "name": "Night Shift", "permissions": ["visit.create"] }
//!   ]
//! }
//! ```
//!
//! A missing section keeps the built-in registry for that section. Every
//! permission token must belong to the catalog.

use std::collections::BTreeSet;
use std::path::Path;

use caseline_core::{AppError, AppResult, NonEmptyString};
use caseline_domain::{
    Permission, PermissionTemplate, RoleDefinition, RoleRegistry, TemplateRegistry,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AccessRegistryDocument {
    roles: Option<Vec<RoleEntry>>,
    templates: Option<Vec<TemplateEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoleEntry {
    name: String,
    permissions: Vec<String>,
    #[serde(default)]
    restrictions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateEntry {
    name: String,
    permissions: Vec<String>,
}

/// Role and template registries loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRegistries {
    /// Role registry.
    pub roles: RoleRegistry,
    /// Permission template registry.
    pub templates: TemplateRegistry,
}

impl AccessRegistries {
    /// Returns the registries shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            roles: RoleRegistry::builtin(),
            templates: TemplateRegistry::builtin(),
        }
    }

    /// Parses registries from a JSON document.
    pub fn from_json(document: &str) -> AppResult<Self> {
        let document: AccessRegistryDocument = serde_json::from_str(document).map_err(|error| {
            AppError::Validation(format!("invalid access registry document: {error}"))
        })?;

        let roles = match document.roles {
            Some(entries) => RoleRegistry::from_definitions(parse_roles(entries)?),
            None => RoleRegistry::builtin(),
        };
        let templates = match document.templates {
            Some(entries) => TemplateRegistry::from_templates(parse_templates(entries)?),
            None => TemplateRegistry::builtin(),
        };

        Ok(Self { roles, templates })
    }

    /// Reads and parses a registry file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let document = std::fs::read_to_string(path).map_err(|error| {
            AppError::Internal(format!(
                "failed to read access registry '{}': {error}",
                path.display()
            ))
        })?;

        let registries = Self::from_json(document.as_str())?;
        info!(
            path = %path.display(),
            roles = registries.roles.role_names().len(),
            templates = registries.templates.template_names().len(),
            "loaded access registry"
        );
        Ok(registries)
    }
}

fn parse_roles(entries: Vec<RoleEntry>) -> AppResult<Vec<RoleDefinition>> {
    let mut seen = BTreeSet::new();
    entries
        .into_iter()
        .map(|entry| {
            let name = NonEmptyString::new(entry.name)?;
            if !seen.insert(name.as_str().to_owned()) {
                return Err(AppError::Validation(format!(
                    "role '{}' is defined more than once",
                    name.as_str()
                )));
            }

            let permissions = parse_permissions(name.as_str(), &entry.permissions)?;
            Ok(RoleDefinition::new(name, permissions, entry.restrictions))
        })
        .collect()
}

fn parse_templates(entries: Vec<TemplateEntry>) -> AppResult<Vec<PermissionTemplate>> {
    let mut seen = BTreeSet::new();
    entries
        .into_iter()
        .map(|entry| {
            let name = NonEmptyString::new(entry.name)?;
            if !seen.insert(name.as_str().to_owned()) {
                return Err(AppError::Validation(format!(
                    "template '{}' is defined more than once",
                    name.as_str()
                )));
            }

            let permissions = parse_permissions(name.as_str(), &entry.permissions)?;
            Ok(PermissionTemplate::new(name, permissions))
        })
        .collect()
}

fn parse_permissions(owner: &str, tokens: &[String]) -> AppResult<Vec<Permission>> {
    tokens
        .iter()
        .map(|token| {
            Permission::from_transport(token.as_str()).map_err(|_| {
                AppError::Validation(format!("'{owner}' references unknown permission '{token}'"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use caseline_core::AppError;
    use caseline_domain::{Permission, TEMPLATE_REPORTING};

    use super::AccessRegistries;

    #[test]
    fn replaces_roles_and_keeps_builtin_templates() {
        let registries = AccessRegistries::from_json(
            r#"{
                "roles": [
                    {
                        "name": "Peer Navigator",
                        "permissions": ["client.view", "outreach.view", "client.view"],
                        "restrictions": ["Outreach only"]
                    }
                ]
            }"#,
        );
        let Ok(registries) = registries else {
            panic!("document should parse");
        };

        assert_eq!(registries.roles.role_names(), vec!["Peer Navigator"]);
        assert_eq!(registries.roles.role_permissions("Peer Navigator").len(), 2);
        assert!(registries.roles.role_permissions("Viewer").is_empty());
        assert!(registries.templates.template(TEMPLATE_REPORTING).is_some());
    }

    #[test]
    fn parses_templates() {
        let registries = AccessRegistries::from_json(
            r#"{"templates": [{"name": "Night Shift", "permissions": ["visit.create"]}]}"#,
        );
        let Ok(registries) = registries else {
            panic!("document should parse");
        };

        assert_eq!(
            registries.templates.template_permissions("Night Shift"),
            vec![Permission::VisitCreate]
        );
        assert!(registries.roles.contains("Clinician"));
    }

    #[test]
    fn rejects_unknown_tokens_and_blank_names() {
        let unknown = AccessRegistries::from_json(
            r#"{"roles": [{"name": "X", "permissions": ["client.teleport"]}]}"#,
        );
        assert!(matches!(unknown, Err(AppError::Validation(_))));

        let blank =
            AccessRegistries::from_json(r#"{"templates": [{"name": "  ", "permissions": []}]}"#);
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_duplicate_names_and_unknown_fields() {
        let duplicate = AccessRegistries::from_json(
            r#"{"roles": [
                {"name": "X", "permissions": []},
                {"name": "X", "permissions": ["client.view"]}
            ]}"#,
        );
        assert!(matches!(duplicate, Err(AppError::Validation(_))));

        let unknown_field = AccessRegistries::from_json(r#"{"groups": []}"#);
        assert!(matches!(unknown_field, Err(AppError::Validation(_))));
    }
}
