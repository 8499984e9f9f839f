// Application configuration - TOML file with database, inspector and refresh sections

use crate::Result;
use crate::certificates::inspector::InspectorSettings;
use crate::db::DatabaseConfig;
use crate::monitor::config::RefreshSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub inspector: InspectorSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
}

const EXAMPLE_CONFIG: &str = r#"[database]
# Database type: "sqlite" or "postgres"
type = "sqlite"
path = "./certwatch.db"

# PostgreSQL configuration (uncomment to use)
# type = "postgres"
# host = "localhost"
# port = 5432
# database = "certwatch"
# username = "certwatch"
# password = "secure_password"
# max_connections = 10

[inspector]
port = 443
dns_timeout_secs = 5
connect_timeout_secs = 10
handshake_timeout_secs = 10

[refresh]
# Target seconds between two refreshes of the same domain
interval_seconds = 3600
max_concurrent_refreshes = 10
# Random variation (±%) applied to the interval
jitter_percent = 10
# How often the daemon checks for due domains
tick_seconds = 10
"#;

impl AppConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.refresh.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), toml_str)?;
        Ok(())
    }

    /// Write a commented example configuration
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
        fs::write(path.as_ref(), EXAMPLE_CONFIG)?;
        Ok(())
    }
}
