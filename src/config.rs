//! Generator configuration
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-model.toml)
//! - Environment variables (SCHEMA_MODEL__*)
//!
//! ## Example config file (schema-model.toml):
//! ```toml
//! [policy]
//! preset = "java"
//! enum_suffix = "Enum"
//! extra_reserved_words = ["record"]
//!
//! [policy.type_overrides]
//! "string+email" = "Email"
//! "number" = "Double"
//!
//! [assembly]
//! container_defaults = true
//! parallel = true
//!
//! [output]
//! format = "pretty"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::codegen::{PolicyPreset, TypePolicy};
use crate::model::AssemblySettings;

/// Main configuration for a generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Naming/type policy selection
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Model assembly settings
    #[serde(default)]
    pub assembly: AssemblySettings,

    /// IR dump settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Policy configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Base preset
    #[serde(default)]
    pub preset: PolicyPreset,

    /// Replaces the preset's enum name suffix
    #[serde(default)]
    pub enum_suffix: Option<String>,

    /// `type` or `type+format` -> type name, applied over the preset table
    #[serde(default)]
    pub type_overrides: BTreeMap<String, String>,

    /// Identifiers escaped in addition to the preset's keywords
    #[serde(default)]
    pub extra_reserved_words: Vec<String>,
}

impl PolicyConfig {
    /// Build the policy: preset, then overrides
    pub fn to_policy(&self) -> TypePolicy {
        let mut policy = self.preset.build();
        if let Some(suffix) = &self.enum_suffix {
            policy.enum_suffix = suffix.clone();
        }
        for (key, type_name) in &self.type_overrides {
            policy = policy.with_type(key.clone(), type_name.clone());
        }
        policy.with_reserved_words(self.extra_reserved_words.iter().cloned())
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-model.toml",
            ".schema-model.toml",
            "config/schema-model.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "schema-model", "schema-model") {
            let xdg_config = config_dir.config_dir().join("schema-model.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMA_MODEL__POLICY__PRESET=rust
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_MODEL")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let loaded: Self = config.try_deserialize()?;
        tracing::debug!(preset = ?loaded.policy.preset, "configuration loaded");
        Ok(loaded)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
