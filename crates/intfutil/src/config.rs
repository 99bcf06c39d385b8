//! Configuration file support for intfutil.
//!
//! Loads intfutil configuration from a TOML file.
//! Default location: /etc/sonic/intfutil.toml
//!
//! The file stands in for the platform services a multi-ASIC device would
//! otherwise be asked: which namespaces exist and where their Redis lives,
//! and which ports are copper.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sonic_db_common::{DbId, RedisConfig};
use tracing::debug;

use crate::display::DisplayMode;
use crate::error::{IntfUtilError, IntfUtilResult};
use crate::namespace::Namespace;
use crate::port_type::PortCapabilities;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sonic/intfutil.toml";

/// Database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Redis host
    #[serde(default = "default_redis_host")]
    pub redis_host: String,

    /// Redis port
    #[serde(default = "default_redis_port")]
    pub redis_port: u16,

    /// Redis database number for CONFIG_DB
    #[serde(default = "default_config_db_number")]
    pub config_db_number: u32,

    /// Redis database number for APPL_DB
    #[serde(default = "default_appl_db_number")]
    pub appl_db_number: u32,

    /// Redis database number for STATE_DB
    #[serde(default = "default_state_db_number")]
    pub state_db_number: u32,

    /// Redis database number for COUNTERS_DB
    #[serde(default = "default_counters_db_number")]
    pub counters_db_number: u32,
}

/// One hardware namespace and, optionally, where its Redis instance listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    /// Namespace name (e.g. "asic0").
    pub name: String,

    /// Redis host override
    #[serde(default)]
    pub redis_host: Option<String>,

    /// Redis port override
    #[serde(default)]
    pub redis_port: Option<u16>,
}

/// Platform capabilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Ports with a fixed copper (RJ45) connector
    #[serde(default)]
    pub rj45_ports: Vec<String>,
}

/// Complete intfutil configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntfUtilConfig {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Namespaces; empty means a single-ASIC device
    #[serde(default)]
    pub namespaces: Vec<NamespaceConfig>,

    /// Platform capabilities
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Default display mode
    #[serde(default)]
    pub display: Option<DisplayMode>,
}

// Default functions
fn default_redis_host() -> String {
    "127.0.0.1".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_config_db_number() -> u32 {
    DbId::ConfigDb.id()
}

fn default_appl_db_number() -> u32 {
    DbId::ApplDb.id()
}

fn default_state_db_number() -> u32 {
    DbId::StateDb.id()
}

fn default_counters_db_number() -> u32 {
    DbId::CountersDb.id()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            redis_host: default_redis_host(),
            redis_port: default_redis_port(),
            config_db_number: default_config_db_number(),
            appl_db_number: default_appl_db_number(),
            state_db_number: default_state_db_number(),
            counters_db_number: default_counters_db_number(),
        }
    }
}

impl DatabaseConfig {
    /// Returns the configured database number for `db`.
    pub fn db_number(&self, db: DbId) -> u32 {
        match db {
            DbId::ConfigDb => self.config_db_number,
            DbId::ApplDb => self.appl_db_number,
            DbId::StateDb => self.state_db_number,
            DbId::CountersDb => self.counters_db_number,
        }
    }
}

impl IntfUtilConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> IntfUtilResult<Self> {
        toml::from_str(content)
            .map_err(|e| IntfUtilError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> IntfUtilResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                IntfUtilError::Config(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(IntfUtilError::Config(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> IntfUtilResult<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Load from `path` when given, otherwise from the default location
    pub fn load_from(path: Option<&Path>) -> IntfUtilResult<Self> {
        match path {
            Some(path) => Self::load_or_default(path),
            None => Self::load(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> IntfUtilResult<()> {
        if self.database.redis_port == 0 {
            return Err(IntfUtilError::Config("redis_port must be > 0".to_string()));
        }

        let mut seen = HashSet::new();
        for ns in &self.namespaces {
            if ns.redis_port == Some(0) {
                return Err(IntfUtilError::Config(format!(
                    "redis_port of namespace '{}' must be > 0",
                    ns.name
                )));
            }
            if !seen.insert(ns.name.as_str()) {
                return Err(IntfUtilError::Config(format!(
                    "duplicate namespace '{}'",
                    ns.name
                )));
            }
        }

        Ok(())
    }

    /// Returns true on a multi-ASIC device.
    pub fn is_multi_asic(&self) -> bool {
        !self.namespaces.is_empty()
    }

    /// Returns the namespaces in configuration order.
    pub fn namespace_list(&self) -> Vec<Namespace> {
        if self.namespaces.is_empty() {
            vec![Namespace::default()]
        } else {
            self.namespaces
                .iter()
                .map(|ns| Namespace::new(ns.name.clone()))
                .collect()
        }
    }

    /// Returns the display mode, defaulting to front-panel only on
    /// multi-ASIC devices.
    pub fn display_mode(&self) -> DisplayMode {
        self.display.unwrap_or(if self.is_multi_asic() {
            DisplayMode::Frontend
        } else {
            DisplayMode::All
        })
    }

    /// Returns the Redis connection settings for `db` in `namespace`.
    pub fn redis_config(&self, namespace: &Namespace, db: DbId) -> RedisConfig {
        let ns = self
            .namespaces
            .iter()
            .find(|ns| ns.name == namespace.name());

        let host = ns
            .and_then(|ns| ns.redis_host.clone())
            .unwrap_or_else(|| self.database.redis_host.clone());
        let port = ns
            .and_then(|ns| ns.redis_port)
            .unwrap_or(self.database.redis_port);

        RedisConfig::new(host, port, db).with_db_number(self.database.db_number(db))
    }

    /// Returns the static port capabilities declared by the platform.
    pub fn port_capabilities(&self) -> PortCapabilities {
        PortCapabilities::new(self.platform.rj45_ports.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = IntfUtilConfig::default();
        assert_eq!(config.database.redis_host, "127.0.0.1");
        assert_eq!(config.database.redis_port, 6379);
        assert_eq!(config.database.config_db_number, 4);
        assert_eq!(config.database.appl_db_number, 0);
        assert_eq!(config.database.state_db_number, 6);
        assert!(!config.is_multi_asic());
        assert_eq!(config.namespace_list(), vec![Namespace::default()]);
        assert_eq!(config.display_mode(), DisplayMode::All);
    }

    #[test]
    fn test_parse_multi_asic() {
        let config = IntfUtilConfig::from_toml(
            r#"
            [database]
            redis_host = "10.0.0.1"

            [[namespaces]]
            name = "asic0"
            redis_port = 6380

            [[namespaces]]
            name = "asic1"
            redis_host = "10.0.0.2"
            redis_port = 6381

            [platform]
            rj45_ports = ["Ethernet0", "Ethernet1"]
            "#,
        )
        .unwrap();

        config.validate().unwrap();
        assert!(config.is_multi_asic());
        assert_eq!(
            config.namespace_list(),
            vec![Namespace::new("asic0"), Namespace::new("asic1")]
        );
        assert_eq!(config.display_mode(), DisplayMode::Frontend);

        let asic0 = config.redis_config(&Namespace::new("asic0"), DbId::ConfigDb);
        assert_eq!(asic0.uri(), "redis://10.0.0.1:6380/4");

        let asic1 = config.redis_config(&Namespace::new("asic1"), DbId::StateDb);
        assert_eq!(asic1.uri(), "redis://10.0.0.2:6381/6");

        assert!(config.port_capabilities().is_rj45_port("Ethernet1"));
        assert!(!config.port_capabilities().is_rj45_port("Ethernet2"));
    }

    #[test]
    fn test_display_override() {
        let config = IntfUtilConfig::from_toml(
            r#"
            display = "all"

            [[namespaces]]
            name = "asic0"
            "#,
        )
        .unwrap();
        assert_eq!(config.display_mode(), DisplayMode::All);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let config = IntfUtilConfig::from_toml(
            r#"
            [[namespaces]]
            name = "asic0"

            [[namespaces]]
            name = "asic0"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_port_zero() {
        let mut config = IntfUtilConfig::default();
        config.database.redis_port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            IntfUtilConfig::from_toml("database = 5"),
            Err(IntfUtilError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = IntfUtilConfig::load_or_default("/nonexistent/intfutil.toml").unwrap();
        assert_eq!(config, IntfUtilConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intfutil.toml");
        fs::write(&path, "[platform]\nrj45_ports = [\"Ethernet0\"]\n").unwrap();

        let config = IntfUtilConfig::load_or_default(&path).unwrap();
        assert_eq!(config.platform.rj45_ports, vec!["Ethernet0".to_string()]);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intfutil.toml");
        fs::write(&path, "[database]\nredis_port = 6380\n").unwrap();

        let config = IntfUtilConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.database.redis_port, 6380);

        let missing = dir.path().join("missing.toml");
        let config = IntfUtilConfig::load_from(Some(&missing)).unwrap();
        assert_eq!(config, IntfUtilConfig::default());
    }

    #[test]
    fn test_load_from_default_location() {
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return;
        }
        assert_eq!(IntfUtilConfig::load_from(None).unwrap(), IntfUtilConfig::default());
    }
}
