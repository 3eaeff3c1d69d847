use axum::Json;
use axum::extract::{Extension, Query, State};
use caseline_domain::UserAccount;

use crate::dto::{
    AuditLogEntryResponse, PermissionDomainResponse, PermissionTemplateResponse, RoleResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct AuditLogQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub action: Option<String>,
    pub subject: Option<String>,
}

pub async fn catalog_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
) -> ApiResult<Json<Vec<PermissionDomainResponse>>> {
    let domains = state
        .permission_admin_service
        .catalog(&user)?
        .into_iter()
        .map(PermissionDomainResponse::from)
        .collect();

    Ok(Json(domains))
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .permission_admin_service
        .list_roles(&user)?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn list_templates_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
) -> ApiResult<Json<Vec<PermissionTemplateResponse>>> {
    let templates = state
        .permission_admin_service
        .list_templates(&user)?
        .into_iter()
        .map(PermissionTemplateResponse::from)
        .collect();

    Ok(Json(templates))
}

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserAccount>,
    Query(query): Query<AuditLogQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .permission_admin_service
        .list_audit_log(
            &user,
            caseline_application::AuditLogQuery {
                limit: query.limit.unwrap_or(50),
                offset: query.offset.unwrap_or(0),
                action: query.action,
                subject: query.subject,
            },
        )
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
