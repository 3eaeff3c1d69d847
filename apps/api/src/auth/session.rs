use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use caseline_core::AppError;
use tower_sessions::Session;
use tracing::info;

use crate::dto::{AuthLoginRequest, SessionUserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{end_session, refresh_session_user, store_session_user, stored_session_user};

/// POST /auth/login - Authenticate and start a session.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<SessionUserResponse>> {
    let account = state
        .session_service
        .login(payload.username.as_str(), payload.password.as_str())
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;
    store_session_user(&session, &account).await?;

    Ok(Json(SessionUserResponse::from(account)))
}

/// POST /auth/logout - End the current session.
pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let subject = stored_session_user(&session)
        .await?
        .map(|account| account.id);

    end_session(&session).await?;

    if let Some(subject) = subject {
        info!(subject = %subject, "user logged out");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Restore the session account from the user directory.
pub async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<SessionUserResponse>> {
    let account = refresh_session_user(&state.session_service, &session).await?;
    Ok(Json(SessionUserResponse::from(account)))
}
