use std::sync::Arc;

use tokio::net::TcpListener;

use portal_service::config::PortalConfig;
use portal_service::dashboards::FileDashboardSource;
use portal_service::metrics::PortalMetrics;
use portal_service::secrets::FileSecretsProvider;
use portal_service::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = PortalConfig::from_env();

    let state = AppState {
        secrets: Arc::new(FileSecretsProvider::new(&config.secrets_path)),
        dashboards: Arc::new(FileDashboardSource::new(&config.dashboards_path)),
        metrics: Arc::new(PortalMetrics::new()?),
    };

    let app = router(state, &config.allowed_origins);

    let addr = config.socket_addr()?;
    println!("starting portal-service on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
