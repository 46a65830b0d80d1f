use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Process-level runtime configuration, read once at startup. The secrets
/// and dashboards files named here are re-read per request by the providers.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub host: String,
    pub port: u16,
    pub secrets_path: PathBuf,
    pub dashboards_path: PathBuf,
    /// Origins allowed on the browser-facing routes. The token refresh
    /// route is always any-origin regardless of this list.
    pub allowed_origins: Vec<String>,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8502);
        let secrets_path = env::var("PORTAL_SECRETS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("secrets.json"));
        let dashboards_path = env::var("PORTAL_DASHBOARDS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("dashboards.json"));
        let allowed_origins = env::var("PORTAL_ALLOWED_ORIGINS")
            .ok()
            .map(|value| parse_origins(&value))
            .unwrap_or_default();

        Self {
            host,
            port,
            secrets_path,
            dashboards_path,
            allowed_origins,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: std::net::IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid HOST '{}'", self.host))?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(|c| c == ',' || c == ';' || c == ' ')
        .filter_map(|item| {
            let origin = item.trim();
            if origin.is_empty() {
                None
            } else {
                Some(origin.to_string())
            }
        })
        .collect()
}
