use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{PortalError, PortalResult};

/// One registry entry: a display name and the view URL it resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub name: String,
    pub url: String,
}

/// dashboards.json accepts either a list of records or a name -> URL map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RegistryRepr {
    List(Vec<Dashboard>),
    Map(BTreeMap<String, String>),
}

/// The navigation registry, read-only once parsed.
#[derive(Debug, Clone)]
pub struct DashboardRegistry {
    entries: Vec<Dashboard>,
}

impl DashboardRegistry {
    pub fn new(entries: Vec<Dashboard>) -> Self {
        Self { entries }
    }

    pub fn parse(raw: &str) -> PortalResult<Self> {
        let repr: RegistryRepr = serde_json::from_str(raw).map_err(|err| {
            PortalError::Config(format!("unexpected dashboards file shape: {err}"))
        })?;

        let entries = match repr {
            RegistryRepr::List(entries) => entries,
            RegistryRepr::Map(map) => map
                .into_iter()
                .map(|(name, url)| Dashboard { name, url })
                .collect(),
        };
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Dashboard] {
        &self.entries
    }

    pub fn resolve(&self, name: &str) -> Option<&Dashboard> {
        self.entries.iter().find(|dashboard| dashboard.name == name)
    }
}

/// Capability to produce the current registry; file-backed implementations
/// re-read per call, like the secrets provider.
pub trait DashboardSource: Send + Sync {
    fn load(&self) -> PortalResult<DashboardRegistry>;
}

pub struct FileDashboardSource {
    path: PathBuf,
}

impl FileDashboardSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DashboardSource for FileDashboardSource {
    fn load(&self) -> PortalResult<DashboardRegistry> {
        let raw = fs::read_to_string(&self.path).map_err(|err| {
            PortalError::Config(format!("failed to read {}: {err}", self.path.display()))
        })?;
        DashboardRegistry::parse(&raw)
    }
}

pub struct StaticDashboardSource {
    registry: DashboardRegistry,
}

impl StaticDashboardSource {
    pub fn new(entries: Vec<Dashboard>) -> Self {
        Self {
            registry: DashboardRegistry::new(entries),
        }
    }
}

impl DashboardSource for StaticDashboardSource {
    fn load(&self) -> PortalResult<DashboardRegistry> {
        Ok(self.registry.clone())
    }
}
