use caseline_domain::{AccessContext, AccessGate, UserAccount};
use serde::Serialize;
use ts_rs::TS;

use super::SessionUserResponse;

/// Outcome of one composite access gate for the current user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-gate-response.ts"
)]
pub struct AccessGateResponse {
    pub name: String,
    pub roles: Vec<String>,
    pub permission: String,
    pub allowed: bool,
}

/// Current user's permissions together with gate outcomes.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-response.ts"
)]
pub struct AccessResponse {
    pub user: SessionUserResponse,
    pub gates: Vec<AccessGateResponse>,
}

impl AccessResponse {
    /// Evaluates every known gate against the session context.
    #[must_use]
    pub fn evaluate(user: UserAccount, context: &AccessContext) -> Self {
        Self {
            user: SessionUserResponse::from(user),
            gates: AccessGate::all()
                .iter()
                .map(|gate| AccessGateResponse {
                    name: gate.name().to_owned(),
                    roles: gate.roles().iter().map(|role| (*role).to_owned()).collect(),
                    permission: gate.permission().as_str().to_owned(),
                    allowed: context.passes(gate),
                })
                .collect(),
        }
    }
}
