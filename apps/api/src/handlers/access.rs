use axum::Json;
use axum::extract::Extension;
use caseline_domain::{AccessContext, UserAccount};

use crate::dto::AccessResponse;

/// GET /api/access - Current user's recomputed permissions and gate outcomes.
pub async fn access_handler(
    Extension(user): Extension<UserAccount>,
    Extension(context): Extension<AccessContext>,
) -> Json<AccessResponse> {
    Json(AccessResponse::evaluate(user, &context))
}
