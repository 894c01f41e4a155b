// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration.
//!
//! Settings are stored as RON. Every field has a default, so a config file
//! only needs the values it changes.

use flowwire_graph::NodeLayout;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "flowwire.ron";

/// Config errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for this config
    #[error("Config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Config could not be written as RON
    #[error("Config serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer version
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Format version
    pub version: u32,
    /// Layout constants for new nodes
    pub layout: NodeLayout,
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Pointer distance within which a connection curve counts as hovered
    pub link_tolerance: f32,
    /// Run a full dependency-ordered evaluation after loading the scene
    pub evaluate_on_start: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            layout: NodeLayout::default(),
            log_filter: "flowwire_editor=debug,flowwire_graph=debug".to_string(),
            link_tolerance: 6.0,
            evaluate_on_start: false,
        }
    }
}

impl EditorConfig {
    /// Parse from a RON string
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.version, CONFIG_FORMAT_VERSION);
        assert_eq!(config.layout, NodeLayout::default());
        assert!(!config.evaluate_on_start);
    }

    #[test]
    fn test_serialization() {
        let mut config = EditorConfig::default();
        config.layout.width = 240.0;
        config.evaluate_on_start = true;
        let ron_str = config.to_ron().unwrap();
        let loaded = EditorConfig::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config() {
        let loaded = EditorConfig::from_ron("(layout: (socket_radius: 14.0))").unwrap();
        assert_eq!(loaded.layout.socket_radius, 14.0);
        assert_eq!(loaded.layout.width, 200.0);
        assert_eq!(loaded.link_tolerance, 6.0);
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = EditorConfig::from_ron("(version: 99)");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_invalid_ron() {
        assert!(matches!(
            EditorConfig::from_ron("(layout: oops"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = EditorConfig::load(Path::new("/nonexistent/flowwire.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
