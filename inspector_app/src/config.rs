//! Inspector configuration
//!
//! An optional TOML file controls what the inspector loads and prints.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this configuration
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Options for a single inspection run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectorConfig {
    /// Eagerly decode texture images referenced by material libraries
    pub load_textures: bool,
    /// Print the per-group face table for OBJ scenes
    pub show_groups: bool,
    /// Print the material table for OBJ scenes
    pub show_materials: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            load_textures: false,
            show_groups: true,
            show_materials: true,
        }
    }
}

impl InspectorConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
