use axum::Json;
use axum::extract::{Extension, Path, State};
use caseline_domain::{Permission, UserAccount};
use tower_sessions::Session;

use crate::auth::store_session_user;
use crate::dto::{
    ChangeRoleRequest, EffectivePermissionsResponse, PermissionTemplateMode,
    PermissionTemplateRequest, SessionUserResponse, SetPermissionOverridesRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn effective_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<EffectivePermissionsResponse>> {
    let preview = state
        .permission_admin_service
        .effective_permissions(&user, user_id.as_str())
        .await?;

    Ok(Json(EffectivePermissionsResponse::from(preview)))
}

pub async fn set_permission_overrides_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    session: Session,
    Path(user_id): Path<String>,
    Json(payload): Json<SetPermissionOverridesRequest>,
) -> ApiResult<Json<SessionUserResponse>> {
    let updated = state
        .permission_admin_service
        .set_overrides(&user, user_id.as_str(), &payload.permissions)
        .await?;

    respond_with_updated(&session, &user, updated).await
}

pub async fn write_permission_template_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    session: Session,
    Path(user_id): Path<String>,
    Json(payload): Json<PermissionTemplateRequest>,
) -> ApiResult<Json<SessionUserResponse>> {
    let service = &state.permission_admin_service;
    let template_name = payload.template_name.as_str();
    let updated = match payload.mode {
        PermissionTemplateMode::Apply => {
            service
                .apply_template(&user, user_id.as_str(), template_name)
                .await?
        }
        PermissionTemplateMode::Add => {
            service
                .add_template(&user, user_id.as_str(), template_name)
                .await?
        }
    };

    respond_with_updated(&session, &user, updated).await
}

pub async fn grant_permission_override_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    session: Session,
    Path((user_id, permission)): Path<(String, String)>,
) -> ApiResult<Json<SessionUserResponse>> {
    let permission = Permission::from_transport(permission.as_str())?;
    let updated = state
        .permission_admin_service
        .grant_override(&user, user_id.as_str(), permission)
        .await?;

    respond_with_updated(&session, &user, updated).await
}

pub async fn revoke_permission_override_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    session: Session,
    Path((user_id, permission)): Path<(String, String)>,
) -> ApiResult<Json<SessionUserResponse>> {
    let updated = state
        .permission_admin_service
        .revoke_override(&user, user_id.as_str(), permission.as_str())
        .await?;

    respond_with_updated(&session, &user, updated).await
}

pub async fn change_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    session: Session,
    Path(user_id): Path<String>,
    Json(payload): Json<ChangeRoleRequest>,
) -> ApiResult<Json<SessionUserResponse>> {
    let updated = state
        .permission_admin_service
        .change_role(&user, user_id.as_str(), payload.role.as_str())
        .await?;

    respond_with_updated(&session, &user, updated).await
}

/// Writes the recomputed account back to the session when administrators
/// edit their own access.
async fn respond_with_updated(
    session: &Session,
    actor: &UserAccount,
    updated: UserAccount,
) -> ApiResult<Json<SessionUserResponse>> {
    if updated.id == actor.id {
        store_session_user(session, &updated).await?;
    }

    Ok(Json(SessionUserResponse::from(updated)))
}
