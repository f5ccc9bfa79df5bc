//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! [storage]
//! initial_capacity = 4096
//!
//! [plan]
//! analyze_getters = true
//!
//! [sql]
//! root_table = "root"
//! ```
//!
//! Every section and key is optional and falls back to [`EngineConfig::default`].
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::utils::error::{SdError, SdResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub storage: StorageConfig,
    pub plan: PlanConfig,
    pub sql: SqlConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bytes preallocated by [`MemoryStorage::from_config`](crate::storage::MemoryStorage::from_config).
    pub initial_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Run the getter analysis hook while compiling a plan.
    pub analyze_getters: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            analyze_getters: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlConfig {
    /// Name of the table holding the root array.
    pub root_table: String,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            root_table: "root".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(toml_str: &str) -> SdResult<Self> {
        toml::from_str(toml_str).map_err(|e| SdError::ConfigParseError {
            source: e,
            file: "<inline>".to_string(),
        })
    }

    /// Load a configuration from a TOML file.
    pub fn load_from_toml(path: &Path) -> SdResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;

        let config = toml::from_str(&toml_str).map_err(|e| SdError::ConfigParseError {
            source: e,
            file: path.display().to_string(),
        })?;
        info!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Save the configuration to a TOML file, creating parent directories as needed.
    pub fn save_to_toml(&self, path: &Path) -> SdResult<()> {
        let toml_str = toml::to_string(self).map_err(|e| {
            SdError::IoError(std::io::Error::other(format!(
                "Failed during serialization of TOML to path `{}`: {}",
                path.display(),
                e
            )))
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.plan.analyze_getters);
        assert_eq!(config.sql.root_table, "root");
        assert_eq!(config.storage.initial_capacity, 0);
    }

    #[test]
    fn partial_sections() {
        let config = EngineConfig::from_toml_str(
            r#"
            [plan]
            analyze_getters = false

            [sql]
            root_table = "events"
            "#,
        )
        .unwrap();
        assert!(!config.plan.analyze_getters);
        assert_eq!(config.sql.root_table, "events");
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn malformed_document_is_reported() {
        let error = EngineConfig::from_toml_str("[storage]\ninitial_capacity = \"lots\"").unwrap_err();
        assert!(error.is_config_parse_error());
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("sdcore-config-{}", std::process::id()));
        let path = dir.join("nested").join("engine.toml");
        let mut config = EngineConfig::default();
        config.storage.initial_capacity = 512;
        config.sql.root_table = "samples".to_string();

        config.save_to_toml(&path).unwrap();
        assert_eq!(EngineConfig::load_from_toml(&path).unwrap(), config);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("sdcore-config-does-not-exist.toml");
        assert!(EngineConfig::load_from_toml(&path).unwrap_err().is_io_error());
    }
}
