use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use caseline_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<MemoryStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/api/access", get(handlers::access::access_handler))
        .route(
            "/api/security/catalog",
            get(handlers::security::catalog_handler),
        )
        .route(
            "/api/security/roles",
            get(handlers::security::list_roles_handler),
        )
        .route(
            "/api/security/templates",
            get(handlers::security::list_templates_handler),
        )
        .route(
            "/api/security/audit-log",
            get(handlers::security::list_audit_log_handler),
        )
        .route(
            "/api/users/{user_id}/permissions",
            get(handlers::users::effective_permissions_handler),
        )
        .route(
            "/api/users/{user_id}/permission-overrides",
            put(handlers::users::set_permission_overrides_handler),
        )
        .route(
            "/api/users/{user_id}/permission-overrides/{permission}",
            post(handlers::users::grant_permission_override_handler)
                .delete(handlers::users::revoke_permission_override_handler),
        )
        .route(
            "/api/users/{user_id}/permission-template",
            post(handlers::users::write_permission_template_handler),
        )
        .route(
            "/api/users/{user_id}/role",
            put(handlers::users::change_role_handler),
        )
        .route_layer(from_fn_with_state(app_state.clone(), middleware::require_auth));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
