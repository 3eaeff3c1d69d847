use serde::Deserialize;
use ts_rs::TS;

/// Incoming payload for username and password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub username: String,
    pub password: String,
}
