use std::sync::Arc;

use caseline_application::{AuthorizationService, PasswordHasher, SessionService};
use caseline_core::AppResult;
use caseline_infrastructure::InMemoryUserDirectory;

/// Reversible hasher so tests do not pay for Argon2.
pub struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

pub fn plain_directory() -> Arc<InMemoryUserDirectory> {
    Arc::new(InMemoryUserDirectory::new(Arc::new(PlainPasswordHasher)))
}

pub fn session_service(directory: Arc<InMemoryUserDirectory>) -> SessionService {
    SessionService::new(AuthorizationService::with_builtin_registries(), directory)
}
