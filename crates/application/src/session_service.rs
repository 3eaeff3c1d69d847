//! Session recompute hook.
//!
//! Derives an account's effective permissions at the two points where a
//! session user enters the application: login and session restore. The
//! derivation always runs, even when the incoming record already carries a
//! `permissions` array, so role registry edits reach every existing account
//! without a data migration.

use std::sync::Arc;

use caseline_core::{AppError, AppResult};
use caseline_domain::{AccessContext, UserAccount};
use tracing::{debug, info, warn};

use crate::{AuthorizationService, UserDirectory};

/// Application service for establishing and restoring user sessions.
#[derive(Clone)]
pub struct SessionService {
    authorization_service: AuthorizationService,
    user_directory: Arc<dyn UserDirectory>,
}

impl SessionService {
    /// Creates a new session service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        user_directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            authorization_service,
            user_directory,
        }
    }

    /// Replaces the account's derived permissions with
    /// `resolve(role, permission_overrides)`.
    #[must_use]
    pub fn recompute(&self, account: UserAccount) -> UserAccount {
        let permissions = self
            .authorization_service
            .resolve(account.role.as_str(), &account.permission_overrides);

        debug!(
            subject = %account.id,
            role = %account.role,
            overrides = account.permission_overrides.len(),
            permissions = permissions.len(),
            "recomputed effective permissions"
        );

        account.with_permissions(permissions)
    }

    /// Authenticates against the user directory and returns the recomputed
    /// session account.
    ///
    /// Rejected credentials produce one generic error regardless of cause.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<UserAccount> {
        let Some(account) = self
            .user_directory
            .authenticate(username, password)
            .await?
        else {
            warn!(username = %username, "login rejected");
            return Err(AppError::Unauthorized(
                "invalid username or password".to_owned(),
            ));
        };

        let account = self.recompute(account);
        info!(subject = %account.id, role = %account.role, "user logged in");
        Ok(account)
    }

    /// Restores a persisted session account. Stored permissions are
    /// discarded and derived again.
    #[must_use]
    pub fn restore(&self, stored: UserAccount) -> UserAccount {
        self.recompute(stored)
    }

    /// Reloads the account from the user directory so that role and override
    /// edits made since login are observed.
    ///
    /// Returns `Ok(None)` when the account no longer exists.
    pub async fn refresh(&self, stored: &UserAccount) -> AppResult<Option<UserAccount>> {
        let account = self.user_directory.find_user(stored.id.as_str()).await?;
        if account.is_none() {
            warn!(subject = %stored.id, "session account no longer exists");
        }

        Ok(account.map(|account| self.recompute(account)))
    }

    /// Returns the authorization context of a session account.
    #[must_use]
    pub fn access_context(&self, account: &UserAccount) -> AccessContext {
        self.authorization_service.access_context(account)
    }
}
