use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::errors;
use crate::topology::{ClusterTopology, Topology};
use crate::ChlogError;

pub const CLUSTER_NAME_KEY: &str = "clusterName";
pub const PATH_PREFIX_KEY: &str = "tableZooKeeperPathPrefix";

const VALID_KEYS: [&str; 2] = [CLUSTER_NAME_KEY, PATH_PREFIX_KEY];

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    cluster: Option<JsonMap<String, JsonValue>>,
}

/// Reads the settings file at `path`. A missing file, a missing `cluster`
/// group or an invalid one all resolve to [`Topology::Standalone`].
pub fn load_topology(path: &Path) -> Topology {
    let source_name = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(contents) => topology_from_json(&source_name, &contents),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(
                source = %source_name,
                "cluster settings file not found, working in standalone mode"
            );
            Topology::Standalone
        }
        Err(error) => {
            tracing::error!(
                source = %source_name,
                %error,
                "cannot read cluster settings, falling back to standalone mode"
            );
            Topology::Standalone
        }
    }
}

pub fn topology_from_json(source_name: &str, json: &str) -> Topology {
    let settings: SettingsFile = match serde_json::from_str(json) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!(
                source = %source_name,
                %error,
                "malformed cluster settings, falling back to standalone mode"
            );
            return Topology::Standalone;
        }
    };

    let Some(group) = settings.cluster else {
        tracing::info!(
            source = %source_name,
            expected = %VALID_KEYS.join(", "),
            "cluster settings are not defined, working in standalone mode"
        );
        return Topology::Standalone;
    };

    let properties = group
        .into_iter()
        .map(|(key, value)| (key, scalar_to_string(value)))
        .collect::<BTreeMap<_, _>>();

    match validate_cluster_properties(&properties) {
        Ok(cluster) => {
            tracing::info!(
                source = %source_name,
                cluster = %cluster.cluster_name(),
                "cluster settings found, working in replicated cluster mode"
            );
            Topology::Cluster(cluster)
        }
        Err(error) => {
            tracing::error!(
                source = %source_name,
                code = %error.code,
                problems = %error.description,
                "invalid cluster settings, falling back to standalone mode"
            );
            Topology::Standalone
        }
    }
}

/// Checks that `properties` holds exactly the two cluster keys. Keys are
/// matched ignoring case, `_` and `-`, so `cluster_name` means `clusterName`.
pub fn validate_cluster_properties(
    properties: &BTreeMap<String, String>,
) -> Result<ClusterTopology, ChlogError> {
    let mut resolved: BTreeMap<&'static str, &str> = BTreeMap::new();
    let mut unknown = Vec::new();

    for (key, value) in properties {
        match canonical_key(key) {
            Some(canonical) if !resolved.contains_key(canonical) => {
                resolved.insert(canonical, value.as_str());
            }
            _ => unknown.push(key.clone()),
        }
    }

    let missing = VALID_KEYS
        .iter()
        .filter(|key| !resolved.contains_key(*key))
        .map(|key| key.to_string())
        .collect::<Vec<_>>();

    if !unknown.is_empty() || !missing.is_empty() {
        return Err(errors::invalid_cluster_config_error(&unknown, &missing));
    }

    Ok(ClusterTopology::new(
        resolved[CLUSTER_NAME_KEY],
        resolved[PATH_PREFIX_KEY],
    ))
}

fn canonical_key(key: &str) -> Option<&'static str> {
    let normalized = normalize_key(key);
    VALID_KEYS
        .into_iter()
        .find(|valid| normalize_key(valid) == normalized)
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|ch| *ch != '_' && *ch != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn scalar_to_string(value: JsonValue) -> String {
    match value {
        JsonValue::String(text) => text,
        other => other.to_string(),
    }
}
