use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Builds the cookie session layer.
///
/// Sessions live in process memory and end after `inactivity_minutes`
/// without a request.
pub fn build_session_layer(
    cookie_secure: bool,
    inactivity_minutes: i64,
) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(inactivity_minutes)))
}
