use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use common_tableau::{build_view_url, embedding_module_url};
use serde::{Deserialize, Serialize};

use crate::dashboards::Dashboard;
use crate::errors::{PortalError, PortalResult};
use crate::AppState;

/// Navigation source for the sidebar: every registry entry, in file order.
pub async fn list_dashboards(State(state): State<AppState>) -> PortalResult<Json<Vec<Dashboard>>> {
    let registry = state.dashboards.load()?;
    Ok(Json(registry.entries().to_vec()))
}

#[derive(Deserialize)]
pub struct EmbedParams {
    /// Overrides the impersonated subject for this one token.
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmbedUrl {
    pub name: String,
    pub url: String,
}

/// Inline delivery: resolve the view URL, mint a token, splice it in.
///
/// The caller renders the result straight into an iframe; the token rides
/// along in the URL for its short lifetime.
pub async fn embed_dashboard(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<EmbedParams>,
) -> PortalResult<Json<EmbedUrl>> {
    let registry = state.dashboards.load()?;
    let dashboard = registry
        .resolve(&name)
        .ok_or_else(|| PortalError::DashboardNotFound(name.clone()))?;

    let issued = state.issue_embed_token(params.user.as_deref())?;
    state.metrics.token_issued("embed");

    Ok(Json(EmbedUrl {
        name: dashboard.name.clone(),
        url: build_view_url(&dashboard.url, &issued.token),
    }))
}

#[derive(Deserialize)]
pub struct ViewParams {
    pub name: String,
}

/// Long-lived viewer page.
///
/// Mounts the vendor's `<tableau-viz>` element with a token callback that
/// polls `/new_jwt`, so the embedded view survives past any single token's
/// lifetime without a page reload. The widget decides when to call back;
/// this server holds no per-client state.
pub async fn view_page(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> PortalResult<Html<String>> {
    let registry = state.dashboards.load()?;
    let dashboard = registry
        .resolve(&params.name)
        .ok_or_else(|| PortalError::DashboardNotFound(params.name.clone()))?;

    let secrets = state.secrets.load()?;
    let host = secrets.credentials.host.clone().unwrap_or_default();

    Ok(Html(render_viewer(
        &dashboard.url,
        &embedding_module_url(&host),
    )))
}

const VIEWER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <script type="module" src="__MODULE_URL__"></script>
</head>
<body style="margin:0; padding:0; overflow:hidden;">

<div id="viz_container" style="width:100vw; height:100vh;"></div>

<script type="module">
async function loadViz() {
    const container = document.getElementById("viz_container");
    container.innerHTML = "";

    const viz = document.createElement("tableau-viz");
    viz.src = "__VIEW_URL__";
    viz.toolbar = "bottom";
    viz.style.width = "100%";
    viz.style.height = "100vh";

    viz.token = async () => {
        const r = await fetch("/new_jwt", { cache: "no-store" });
        const j = await r.json();
        if (j.error) throw new Error(j.error);
        return j.token;
    };

    container.appendChild(viz);
}

loadViz();
</script>

</body>
</html>
"#;

fn render_viewer(view_url: &str, module_url: &str) -> String {
    VIEWER_TEMPLATE
        .replace("__MODULE_URL__", &escape_attr(module_url))
        .replace("__VIEW_URL__", &escape_attr(view_url))
}

/// Minimal HTML attribute escape for operator-supplied URLs.
fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_page_wires_view_module_and_token_callback() {
        let page = render_viewer(
            "https://x/views/sales",
            "https://x/javascripts/api/tableau.embedding.3.latest.min.js",
        );
        assert!(page.contains("tableau-viz"));
        assert!(page.contains(r#"viz.src = "https://x/views/sales""#));
        assert!(page.contains("tableau.embedding.3.latest.min.js"));
        assert!(page.contains(r#"fetch("/new_jwt", { cache: "no-store" })"#));
    }

    #[test]
    fn escapes_attribute_breakers() {
        assert_eq!(
            escape_attr(r#"https://x/?a=1&b="2""#),
            "https://x/?a=1&amp;b=&quot;2&quot;"
        );
    }
}
