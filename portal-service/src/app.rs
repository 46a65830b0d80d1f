use std::sync::Arc;

use axum::extract::FromRef;
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::routing::{get, post};
use axum::Router;
use common_tableau::{IssuedToken, DEFAULT_TTL_SECONDS};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::dashboards::DashboardSource;
use crate::errors::PortalResult;
use crate::metrics::{metrics_endpoint, PortalMetrics};
use crate::secrets::SecretsProvider;
use crate::{auth_handlers, dashboard_handlers, token_handlers};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub secrets: Arc<dyn SecretsProvider>,
    pub dashboards: Arc<dyn DashboardSource>,
    pub metrics: Arc<PortalMetrics>,
}

impl FromRef<AppState> for Arc<dyn SecretsProvider> {
    fn from_ref(state: &AppState) -> Self {
        state.secrets.clone()
    }
}

impl FromRef<AppState> for Arc<dyn DashboardSource> {
    fn from_ref(state: &AppState) -> Self {
        state.dashboards.clone()
    }
}

impl FromRef<AppState> for Arc<PortalMetrics> {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

impl AppState {
    /// Load the current secrets and mint a fresh embed token.
    ///
    /// `user` overrides the impersonated subject; otherwise the configured
    /// `tableau_user` is used, then the admin account as a last resort.
    pub fn issue_embed_token(&self, user: Option<&str>) -> PortalResult<IssuedToken> {
        let secrets = self.secrets.load()?;
        let subject = user
            .map(str::to_string)
            .or_else(|| secrets.tableau_user.clone())
            .or_else(|| secrets.admin_user.clone())
            .unwrap_or_default();
        let issued = common_tableau::issue(&secrets.credentials, &subject, DEFAULT_TTL_SECONDS)?;
        Ok(issued)
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Assemble the portal router.
///
/// The token refresh route gets its own any-origin CORS layer: the embedding
/// widget polls it from the vendor's origin. The remaining routes only allow
/// the origins listed in configuration, when any are.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let token_routes = Router::new()
        .route("/new_jwt", get(token_handlers::new_jwt))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        );

    let mut portal_routes = Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/login", post(auth_handlers::login))
        .route("/dashboards", get(dashboard_handlers::list_dashboards))
        .route(
            "/dashboards/:name/embed",
            get(dashboard_handlers::embed_dashboard),
        )
        .route("/view", get(dashboard_handlers::view_page));

    if !allowed_origins.is_empty() {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        portal_routes = portal_routes.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([ACCEPT, CONTENT_TYPE]),
        );
    }

    portal_routes.merge(token_routes).with_state(state)
}
