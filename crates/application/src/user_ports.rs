//! Ports to the identity collaborator that owns staff accounts.

use async_trait::async_trait;
use caseline_core::AppResult;
use caseline_domain::UserAccount;

/// Repository port for staff accounts held by the remote data API.
///
/// Implementations return raw records. Any `permissions` array on a returned
/// record is treated as stale by callers.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Verifies credentials and returns the matching account.
    ///
    /// Returns `Ok(None)` when the credentials are not accepted.
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<UserAccount>>;

    /// Finds an account by identifier.
    async fn find_user(&self, user_id: &str) -> AppResult<Option<UserAccount>>;

    /// Replaces the persisted override list of an account.
    async fn save_permission_overrides(
        &self,
        user_id: &str,
        overrides: &[String],
    ) -> AppResult<()>;

    /// Changes the persisted role of an account. Overrides are left untouched.
    async fn save_role(&self, user_id: &str, role: &str) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps application code free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
