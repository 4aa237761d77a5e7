//! Console configuration: engine settings plus the accounts seeded at
//! startup.

use std::path::Path;

use fleet_core::config::{read_json, FleetConfig};
use fleet_core::error::ConfigError;
use serde::{Deserialize, Serialize};

use crate::accounts::SeedAccount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engines: FleetConfig,
    pub accounts: Vec<SeedAccount>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engines: FleetConfig::default(),
            accounts: vec![SeedAccount::default_admin()],
        }
    }
}

impl AppConfig {
    pub fn with_engines(mut self, engines: FleetConfig) -> Self {
        self.engines = engines;
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<SeedAccount>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => read_json::<Self>(path)?,
            None => Self::default(),
        };
        config.engines.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use fleet_core::road_network::FrontierKind;

    use super::*;
    use crate::accounts::Role;

    #[test]
    fn defaults_seed_one_admin() {
        let config = AppConfig::load(None).expect("defaults");
        assert_eq!(config.accounts.len(), 1);
        assert_eq!(config.accounts[0].role, Role::Admin);
    }

    #[test]
    fn file_overrides_engines_and_accounts() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "engines": {{ "network": {{ "frontier": "linear_scan" }} }},
                "accounts": [
                    {{ "email": "ops@fleet.com", "password": "pw", "name": "Ops", "role": "ADMIN", "status": "ACTIVE" }}
                ]
            }}"#
        )
        .expect("write");

        let config = AppConfig::load(Some(file.path())).expect("load");
        assert_eq!(config.engines.network.frontier, FrontierKind::LinearScan);
        assert_eq!(config.accounts[0].email, "ops@fleet.com");
    }

    #[test]
    fn invalid_engine_settings_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "engines": {{ "scheduler": {{ "capacity": 0 }} }} }}"#).expect("write");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(ConfigError::Invalid(_))
        ));
    }
}
