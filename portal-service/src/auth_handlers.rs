use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::errors::{PortalError, PortalResult};
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session-scoped record handed back to the UI. The portal keeps no
/// server-side session state; this flag is the whole session.
#[derive(Debug, Serialize)]
pub struct Session {
    pub logged_in: bool,
    pub user: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> PortalResult<Json<Session>> {
    let secrets = state.secrets.load().map_err(|err| {
        warn!(error = %err, "login rejected: secrets unavailable");
        err
    })?;

    let accepted = match (&secrets.admin_user, &secrets.admin_password) {
        (Some(user), Some(password)) => {
            digest_eq(&login.email, user) && digest_eq(&login.password, password)
        }
        _ => false,
    };

    if !accepted {
        state.metrics.login_attempt("failure");
        warn!(email = %login.email, "rejected portal login");
        return Err(PortalError::InvalidCredentials);
    }

    state.metrics.login_attempt("success");
    Ok(Json(Session {
        logged_in: true,
        user: login.email,
    }))
}

/// Digest comparison keeps the check constant-time in the credential
/// contents; the stored values themselves are still plaintext.
fn digest_eq(left: &str, right: &str) -> bool {
    Sha256::digest(left.as_bytes()) == Sha256::digest(right.as_bytes())
}
