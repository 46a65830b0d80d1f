use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common_tableau::TokenError;
use serde::Serialize;
use thiserror::Error;

pub type PortalResult<T> = Result<T, PortalError>;

/// Portal-level failures, surfaced at the boundary where they occur.
/// Nothing is retried; the client re-invokes the action instead.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unknown dashboard '{0}'")]
    DashboardNotFound(String),
    #[error("{0}")]
    Config(String),
    #[error(transparent)]
    Token(#[from] TokenError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            PortalError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            PortalError::DashboardNotFound(_) => (StatusCode::NOT_FOUND, "DASHBOARD_NOT_FOUND"),
            PortalError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            PortalError::Token(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TOKEN_ERROR"),
        };

        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
