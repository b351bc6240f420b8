mod config;
mod dispatch;
mod resolver;

pub use config::{
    load_topology, topology_from_json, validate_cluster_properties, CLUSTER_NAME_KEY,
    PATH_PREFIX_KEY,
};
pub use dispatch::Dispatch;
pub use resolver::{TopologyResolver, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};

/// Deployment mode of the target engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// Single node; bookkeeping tables use background-merging engines.
    Standalone,
    /// Replicated cluster; bookkeeping tables live in the coordination service.
    Cluster(ClusterTopology),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTopology {
    cluster_name: String,
    coordination_path_prefix: String,
}

impl ClusterTopology {
    pub fn new(cluster_name: impl Into<String>, coordination_path_prefix: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            coordination_path_prefix: coordination_path_prefix.into(),
        }
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn coordination_path_prefix(&self) -> &str {
        &self.coordination_path_prefix
    }

    /// Coordination-service path under which `table_name` is registered.
    pub fn table_path(&self, table_name: &str) -> String {
        format!(
            "{}/{table_name}",
            self.coordination_path_prefix.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyKind {
    Standalone,
    Cluster,
}

impl Topology {
    pub fn cluster(cluster_name: impl Into<String>, coordination_path_prefix: impl Into<String>) -> Self {
        Self::Cluster(ClusterTopology::new(cluster_name, coordination_path_prefix))
    }

    pub fn kind(&self) -> TopologyKind {
        match self {
            Self::Standalone => TopologyKind::Standalone,
            Self::Cluster(_) => TopologyKind::Cluster,
        }
    }

    pub fn is_standalone(&self) -> bool {
        matches!(self, Self::Standalone)
    }

    /// Cluster name for `ON CLUSTER` clauses.
    pub fn on_cluster(&self) -> Option<String> {
        Dispatch::new(self)
            .standalone(|| None)
            .cluster(|cluster| Some(cluster.cluster_name().to_string()))
            .run()
    }
}
