//! Engine configuration, loadable from JSON.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes:
//!
//! ```json
//! { "scheduler": { "capacity": 100 }, "network": { "frontier": "linear_scan" } }
//! ```

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::directory::DirectoryConfig;
use crate::error::ConfigError;
use crate::maintenance::SchedulerConfig;
use crate::road_network::{FrontierKind, NetworkConfig};
use crate::sorted_index::{DuplicatePolicy, IndexConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub directory: DirectoryConfig,
    pub scheduler: SchedulerConfig,
    pub index: IndexConfig,
    pub network: NetworkConfig,
}

impl FleetConfig {
    /// Fixed limits of 100 vehicles per table, linear-scan Dijkstra and
    /// duplicate-tolerant sorted index.
    pub fn bounded_parity() -> Self {
        Self::default()
            .with_directory(DirectoryConfig::default().with_capacity(100))
            .with_scheduler_capacity(100)
            .with_duplicate_policy(DuplicatePolicy::AcceptWithWarning)
            .with_frontier(FrontierKind::LinearScan)
    }

    pub fn with_directory(mut self, directory: DirectoryConfig) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_scheduler_capacity(mut self, capacity: usize) -> Self {
        self.scheduler = SchedulerConfig::bounded(capacity);
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.index.duplicate_policy = policy;
        self
    }

    pub fn with_frontier(mut self, frontier: FrontierKind) -> Self {
        self.network.frontier = frontier;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directory.initial_buckets == 0 {
            return Err(ConfigError::Invalid(
                "directory.initial_buckets must be at least 1".into(),
            ));
        }
        if !self.directory.max_load_factor.is_finite() || self.directory.max_load_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "directory.max_load_factor must be positive, got {}",
                self.directory.max_load_factor
            )));
        }
        if self.directory.capacity == Some(0) {
            return Err(ConfigError::Invalid("directory.capacity must be at least 1".into()));
        }
        if self.scheduler.capacity == Some(0) {
            return Err(ConfigError::Invalid("scheduler.capacity must be at least 1".into()));
        }
        Ok(())
    }
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}
