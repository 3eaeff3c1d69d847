use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use caseline_application::{PasswordHasher, UserDirectory};
use caseline_core::{AppError, AppResult};
use caseline_domain::UserAccount;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredAccount {
    password_hash: String,
    account: UserAccount,
}

/// In-memory user directory used when no remote data API is configured.
pub struct InMemoryUserDirectory {
    password_hasher: Arc<dyn PasswordHasher>,
    accounts: RwLock<HashMap<String, StoredAccount>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new(password_hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            password_hasher,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Stores an account together with a hash of its password.
    ///
    /// Identifiers and usernames must be unique.
    pub async fn insert_account(&self, account: UserAccount, password: &str) -> AppResult<()> {
        let password_hash = self.password_hasher.hash_password(password)?;
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&account.id) {
            return Err(AppError::Conflict(format!(
                "user '{}' already exists",
                account.id
            )));
        }
        if accounts
            .values()
            .any(|stored| stored.account.username == account.username)
        {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                account.username
            )));
        }

        accounts.insert(
            account.id.clone(),
            StoredAccount {
                password_hash,
                account,
            },
        );
        Ok(())
    }

    /// Returns the number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Returns whether the directory holds no accounts.
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<UserAccount>> {
        let candidate = self
            .accounts
            .read()
            .await
            .values()
            .find(|stored| stored.account.username == username)
            .cloned();

        let Some(candidate) = candidate else {
            return Ok(None);
        };

        if self
            .password_hasher
            .verify_password(password, candidate.password_hash.as_str())?
        {
            Ok(Some(candidate.account))
        } else {
            Ok(None)
        }
    }

    async fn find_user(&self, user_id: &str) -> AppResult<Option<UserAccount>> {
        Ok(self
            .accounts
            .read()
            .await
            .get(user_id)
            .map(|stored| stored.account.clone()))
    }

    async fn save_permission_overrides(
        &self,
        user_id: &str,
        overrides: &[String],
    ) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
        stored.account.permission_overrides = overrides.to_vec();
        Ok(())
    }

    async fn save_role(&self, user_id: &str, role: &str) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
        stored.account.role = role.to_owned();
        Ok(())
    }
}
