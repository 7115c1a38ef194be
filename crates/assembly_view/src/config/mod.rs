//! Configuration system
//!
//! Configuration files are TOML or RON, chosen by file extension.

use crate::assembly::InstanceNameFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match Format::of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings shared by every document view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Default log filter, `RUST_LOG` overrides it
    pub log_level: String,

    /// Labelling of reference nodes
    pub instance_name_format: InstanceNameFormat,

    /// Initial exploding factor, clamped to `[0, 1]`
    pub exploding_factor: f32,

    /// Initial display mode per driver: driver name → mode name
    pub display_modes: BTreeMap<String, String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            instance_name_format: InstanceNameFormat::default(),
            exploding_factor: 0.0,
            display_modes: BTreeMap::new(),
        }
    }
}

impl Config for ViewConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("assembly_view_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ViewConfig::default();
        config.instance_name_format = InstanceNameFormat::Both;
        config.display_modes.insert("shape".into(), "wireframe".into());
        config.exploding_factor = 0.25;

        let path = temp_path("config.toml");
        config.save_to_file(&path).unwrap();
        let loaded = ViewConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let path = temp_path("partial.ron");
        std::fs::write(&path, "(log_level: \"debug\")").unwrap();
        let loaded = ViewConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.log_level, "debug");
        assert_eq!(loaded.instance_name_format, InstanceNameFormat::Product);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ViewConfig::default().save_to_file(temp_path("config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
        assert!(matches!(
            ViewConfig::load_from_file(temp_path("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
