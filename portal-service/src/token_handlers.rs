use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Serialize)]
struct TokenBody {
    token: String,
}

#[derive(Serialize)]
struct TokenErrorBody {
    error: String,
}

/// Pull-based refresh endpoint for the embedding widget.
///
/// Every call is independent: secrets are re-read and a fresh token minted,
/// so the widget can poll whenever its held token nears expiry. The body
/// carries either `token` or `error`, never both, and both arms disable
/// intermediate caching so a stale token is never served.
pub async fn new_jwt(State(state): State<AppState>) -> Response {
    let response = match state.issue_embed_token(None) {
        Ok(issued) => {
            state.metrics.token_issued("refresh");
            (StatusCode::OK, Json(TokenBody {
                token: issued.token,
            }))
                .into_response()
        }
        Err(err) => {
            state.metrics.token_failure();
            warn!(error = %err, "embed token refresh failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TokenErrorBody {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    };
    no_store(response)
}

fn no_store(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
