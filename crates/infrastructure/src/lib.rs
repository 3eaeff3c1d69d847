//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod access_registry_file;
mod argon2_password_hasher;
mod http_user_directory;
mod in_memory_audit_repository;
mod in_memory_user_directory;

pub use access_registry_file::AccessRegistries;
pub use argon2_password_hasher::Argon2PasswordHasher;
pub use http_user_directory::HttpUserDirectory;
pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_user_directory::InMemoryUserDirectory;
