use caseline_core::AppResult;
use caseline_domain::{
    Permission, ROLE_ADMIN, ROLE_CASE_MANAGER, ROLE_CLINICIAN, ROLE_DATA_ENTRY,
    ROLE_OUTREACH_WORKER, ROLE_PROGRAM_MANAGER, ROLE_SYSTEM_ADMIN, ROLE_VIEWER, UserAccount,
};
use caseline_infrastructure::InMemoryUserDirectory;
use tracing::info;

const DEV_SEED_PASSWORD: &str = "caseline";
const DEV_SEED_LOCATION: &str = "Main Street Drop-In";

const DEV_SEED_ACCOUNTS: &[(&str, &str, &str, &str)] = &[
    ("1", "sysadmin", "System Administrator", ROLE_SYSTEM_ADMIN),
    ("2", "admin", "Program Admin", ROLE_ADMIN),
    ("3", "manager", "Program Manager", ROLE_PROGRAM_MANAGER),
    ("4", "clinician", "Staff Clinician", ROLE_CLINICIAN),
    ("5", "casemanager", "Case Manager", ROLE_CASE_MANAGER),
    ("6", "outreach", "Outreach Worker", ROLE_OUTREACH_WORKER),
    ("7", "dataentry", "Data Entry Clerk", ROLE_DATA_ENTRY),
    ("8", "viewer", "Read-Only Viewer", ROLE_VIEWER),
];

/// Fills an in-memory directory with one account per builtin role plus an
/// auditor carrying a `system.audit` override.
pub async fn seed_directory(directory: &InMemoryUserDirectory) -> AppResult<()> {
    for (id, username, display_name, role) in DEV_SEED_ACCOUNTS {
        let account = UserAccount::new(*id, *username, *display_name, *role)
            .with_location(DEV_SEED_LOCATION);
        directory.insert_account(account, DEV_SEED_PASSWORD).await?;
    }

    let auditor = UserAccount::new("9", "auditor", "Data Entry Auditor", ROLE_DATA_ENTRY)
        .with_overrides(vec![Permission::SystemAudit.as_str().to_owned()])
        .with_location(DEV_SEED_LOCATION);
    directory.insert_account(auditor, DEV_SEED_PASSWORD).await?;

    info!(accounts = directory.len().await, "seeded in-memory user directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use caseline_application::UserDirectory;
    use caseline_core::AppResult;
    use caseline_domain::ROLE_DATA_ENTRY;
    use caseline_infrastructure::InMemoryUserDirectory;

    use super::{DEV_SEED_ACCOUNTS, DEV_SEED_PASSWORD, seed_directory};
    use crate::test_support::PlainPasswordHasher;

    #[tokio::test]
    async fn seeds_every_builtin_role_and_the_auditor() -> AppResult<()> {
        let directory = InMemoryUserDirectory::new(Arc::new(PlainPasswordHasher));
        seed_directory(&directory).await?;

        assert_eq!(directory.len().await, DEV_SEED_ACCOUNTS.len() + 1);

        let auditor = directory.authenticate("auditor", DEV_SEED_PASSWORD).await?;
        let Some(auditor) = auditor else {
            panic!("auditor should authenticate with the seed password");
        };
        assert_eq!(auditor.role, ROLE_DATA_ENTRY);
        assert_eq!(auditor.permission_overrides, vec!["system.audit".to_owned()]);
        Ok(())
    }

    #[tokio::test]
    async fn seeding_twice_conflicts() -> AppResult<()> {
        let directory = InMemoryUserDirectory::new(Arc::new(PlainPasswordHasher));
        seed_directory(&directory).await?;

        assert!(seed_directory(&directory).await.is_err());
        Ok(())
    }
}
