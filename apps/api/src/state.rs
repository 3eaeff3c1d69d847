use caseline_application::{PermissionAdminService, SessionService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub session_service: SessionService,
    pub permission_admin_service: PermissionAdminService,
    pub frontend_url: String,
}
