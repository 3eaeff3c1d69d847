use caseline_application::SessionService;
use caseline_core::AppError;
use caseline_domain::UserAccount;
use tower_sessions::Session;

mod session;

pub use session::{login_handler, logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "session_user";

/// Reads the persisted session account, if any.
pub async fn stored_session_user(session: &Session) -> Result<Option<UserAccount>, AppError> {
    session
        .get::<UserAccount>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session user: {error}")))
}

/// Persists the session account.
pub async fn store_session_user(session: &Session, account: &UserAccount) -> Result<(), AppError> {
    session
        .insert(SESSION_USER_KEY, account)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session user: {error}")))
}

/// Clears the session data and removes it from the store.
pub async fn end_session(session: &Session) -> Result<(), AppError> {
    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to end session: {error}")))
}

/// Reloads the signed-in account from the user directory and recomputes its
/// permissions.
///
/// Role and override edits take effect on the next request. A session whose
/// account has disappeared is ended.
pub async fn refresh_session_user(
    session_service: &SessionService,
    session: &Session,
) -> Result<UserAccount, AppError> {
    let stored = stored_session_user(session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let Some(account) = session_service.refresh(&stored).await? else {
        end_session(session).await?;
        return Err(AppError::Unauthorized("session account no longer exists".to_owned()));
    };

    if account != stored {
        store_session_user(session, &account).await?;
    }

    Ok(account)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use caseline_application::UserDirectory;
    use caseline_core::{AppError, AppResult};
    use caseline_domain::{
        AUDIT_LOG, ROLE_ADMIN, ROLE_DATA_ENTRY, ROLE_VIEWER, USER_ADMINISTRATION, UserAccount,
    };
    use tower_sessions::{MemoryStore, Session};

    use super::{refresh_session_user, store_session_user, stored_session_user};
    use crate::test_support::{plain_directory, session_service};

    fn empty_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn demoted_admin_loses_admin_gates_on_next_request() -> AppResult<()> {
        let directory = plain_directory();
        let admin = UserAccount::new("2", "admin", "Program Admin", ROLE_ADMIN);
        directory.insert_account(admin, "secret").await?;
        let service = session_service(directory.clone());

        let session = empty_session();
        let signed_in = service.login("admin", "secret").await?;
        store_session_user(&session, &signed_in).await?;

        let before = refresh_session_user(&service, &session).await?;
        assert!(service.access_context(&before).passes(&USER_ADMINISTRATION));

        directory.save_role("2", ROLE_VIEWER).await?;

        let after = refresh_session_user(&service, &session).await?;
        let context = service.access_context(&after);
        assert_eq!(after.role, ROLE_VIEWER);
        assert!(!context.passes(&USER_ADMINISTRATION));
        assert!(!context.passes(&AUDIT_LOG));

        let stored = stored_session_user(&session).await?;
        assert_eq!(stored.map(|account| account.role), Some(ROLE_VIEWER.to_owned()));
        Ok(())
    }

    #[tokio::test]
    async fn revoked_override_is_dropped_on_next_request() -> AppResult<()> {
        let directory = plain_directory();
        let delegate = UserAccount::new("7", "dataentry", "Data Entry Clerk", ROLE_DATA_ENTRY)
            .with_overrides(vec!["user.permissions".to_owned()]);
        directory.insert_account(delegate, "secret").await?;
        let service = session_service(directory.clone());

        let session = empty_session();
        let signed_in = service.login("dataentry", "secret").await?;
        store_session_user(&session, &signed_in).await?;
        assert!(service.access_context(&signed_in).passes(&USER_ADMINISTRATION));

        directory.save_permission_overrides("7", &[]).await?;

        let refreshed = refresh_session_user(&service, &session).await?;
        assert!(refreshed.permission_overrides.is_empty());
        assert!(!service.access_context(&refreshed).passes(&USER_ADMINISTRATION));
        Ok(())
    }

    #[tokio::test]
    async fn vanished_account_ends_the_session() -> AppResult<()> {
        let service = session_service(plain_directory());
        let session = empty_session();
        let ghost = UserAccount::new("99", "ghost", "Ghost", ROLE_ADMIN);
        store_session_user(&session, &ghost).await?;

        let result = refresh_session_user(&service, &session).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert!(stored_session_user(&session).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn missing_session_user_is_unauthorized() {
        let service = session_service(plain_directory());
        let result = refresh_session_user(&service, &empty_session()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
