//! Configuration system
//!
//! Configuration types are plain serde structs loaded from TOML or RON
//! by file extension. Each subsystem owns its config block; `EngineConfig`
//! aggregates them for applications that want a single file.

pub use serde::{Deserialize, Serialize};

/// Configuration trait with file load/save by extension
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
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

/// Scene subsystem configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Cross-check cached world matrices against a fresh recomputation on
    /// every cached read (debug builds only). Catches callers that mutate
    /// a transform without clearing the affected subtree's caches.
    pub validate_world_cache: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            validate_world_cache: false,
        }
    }
}

impl Config for SceneConfig {}

/// Top-level engine configuration aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scene-graph configuration
    pub scene: SceneConfig,
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let path = std::env::temp_dir().join("scene_engine_config_test.toml");
        let path = path.to_str().unwrap().to_string();

        let mut config = EngineConfig::default();
        config.scene.validate_world_cache = true;
        config.save_to_file(&path).unwrap();

        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert!(loaded.scene.validate_world_cache);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_format() {
        assert!(matches!(
            EngineConfig::load_from_file("config.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
