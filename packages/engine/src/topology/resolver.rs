use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use crate::topology::{load_topology, Topology};

pub const CONFIG_PATH_ENV: &str = "CHLOG_CLICKHOUSE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "liquibaseClickhouse.json";

/// Resolves the topology once per process and hands out the cached value.
///
/// Construct one per migration run and pass it to the generators.
#[derive(Debug)]
pub struct TopologyResolver {
    source: Option<PathBuf>,
    cached: RwLock<Option<Topology>>,
}

impl TopologyResolver {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            cached: RwLock::new(None),
        }
    }

    /// Settings path from `CHLOG_CLICKHOUSE_CONFIG`, or the default file name.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::new(path)
    }

    /// Resolver that never reads configuration. Intended for tests.
    pub fn fixed(topology: Topology) -> Self {
        Self {
            source: None,
            cached: RwLock::new(Some(topology)),
        }
    }

    pub fn resolve(&self) -> Topology {
        if let Some(topology) = self
            .cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return topology.clone();
        }

        let mut cached = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        cached
            .get_or_insert_with(|| match &self.source {
                Some(path) => load_topology(path),
                None => Topology::Standalone,
            })
            .clone()
    }

    /// Replaces the cached topology. Test-harness setup only: a synthesis
    /// running on another thread may observe either the old or the new value,
    /// so call it before any statements are generated.
    pub fn override_topology(&self, topology: Topology) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(topology);
    }
}
