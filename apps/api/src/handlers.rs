pub mod access;
pub mod health;
pub mod security;
pub mod users;
