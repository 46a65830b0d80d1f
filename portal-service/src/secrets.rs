use std::fs;
use std::path::PathBuf;

use common_tableau::SigningCredentials;
use serde::Deserialize;

use crate::errors::{PortalError, PortalResult};

/// Everything the portal reads from secrets.json: the signing credentials
/// plus the local admin login and the default impersonation subject.
#[derive(Clone)]
pub struct PortalSecrets {
    pub credentials: SigningCredentials,
    pub admin_user: Option<String>,
    pub admin_password: Option<String>,
    pub tableau_user: Option<String>,
}

impl std::fmt::Debug for PortalSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalSecrets")
            .field("credentials", &self.credentials)
            .field("admin_user", &self.admin_user)
            .field("admin_password", &"***redacted***")
            .field("tableau_user", &self.tableau_user)
            .finish()
    }
}

/// Capability to produce the current secrets.
///
/// File-backed implementations re-read the file on every call, so an edit
/// takes effect on the next token without a restart. That is a deliberate
/// simplicity/staleness trade-off, not a caching layer.
pub trait SecretsProvider: Send + Sync {
    fn load(&self) -> PortalResult<PortalSecrets>;
}

/// Reads secrets.json fresh on every call.
pub struct FileSecretsProvider {
    path: PathBuf,
}

impl FileSecretsProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SecretsProvider for FileSecretsProvider {
    fn load(&self) -> PortalResult<PortalSecrets> {
        let raw = fs::read_to_string(&self.path).map_err(|err| {
            PortalError::Config(format!("failed to read {}: {err}", self.path.display()))
        })?;
        parse_secrets(&raw)
    }
}

/// Fixed secrets for tests; substitutes for the filesystem entirely.
pub struct StaticSecretsProvider {
    secrets: PortalSecrets,
}

impl StaticSecretsProvider {
    pub fn new(secrets: PortalSecrets) -> Self {
        Self { secrets }
    }
}

impl SecretsProvider for StaticSecretsProvider {
    fn load(&self) -> PortalResult<PortalSecrets> {
        Ok(self.secrets.clone())
    }
}

/// Raw document shape. Every field is optional here; the issuer reports
/// which required field is missing at signing time.
#[derive(Debug, Default, Deserialize)]
struct SecretsDoc {
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    secret_id: Option<String>,
    #[serde(default)]
    secret_value: Option<String>,
    #[serde(default)]
    site_id: Option<String>,
    #[serde(default)]
    site_guid: Option<String>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    tableau_host: Option<String>,
    #[serde(default)]
    admin_user: Option<String>,
    #[serde(default)]
    admin_password: Option<String>,
    #[serde(default)]
    tableau_user: Option<String>,
}

/// Parse a secrets.json document. The object may be flat or nested under a
/// top-level `"tableau"` key; `site_guid` wins over `site_id` and `host`
/// over `tableau_host`.
pub fn parse_secrets(raw: &str) -> PortalResult<PortalSecrets> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|err| PortalError::Config(format!("secrets file is not valid JSON: {err}")))?;
    let doc = value.get("tableau").unwrap_or(&value);
    let doc: SecretsDoc = serde_json::from_value(doc.clone())
        .map_err(|err| PortalError::Config(format!("unexpected secrets file shape: {err}")))?;

    Ok(PortalSecrets {
        credentials: SigningCredentials {
            client_id: doc.client_id.unwrap_or_default(),
            secret_id: doc.secret_id,
            secret_value: doc.secret_value.unwrap_or_default(),
            site_id: doc.site_guid.or(doc.site_id).unwrap_or_default(),
            host: doc.host.or(doc.tableau_host),
        },
        admin_user: doc.admin_user,
        admin_password: doc.admin_password,
        tableau_user: doc.tableau_user,
    })
}
