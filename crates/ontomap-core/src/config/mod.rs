//! Configuration management for Ontomap.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `ontomap.toml` file
//! 3. User config `~/.config/ontomap/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hybrid mapping configuration.
    pub mapping: MappingConfig,

    /// Relation graph namespaces.
    pub graph: GraphConfig,

    /// Bulk folder builder configuration.
    pub builder: BuilderConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./ontomap.toml` (project local)
    /// 2. `~/.config/ontomap/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new("ontomap.toml").exists() {
            return Self::from_file("ontomap.toml");
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("ontomap").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(model) = std::env::var("ONTOMAP_MODEL") {
            self.mapping.model_name = model;
        }
        if let Ok(dir) = std::env::var("ONTOMAP_MODEL_CACHE") {
            self.mapping.cache_dir = Some(PathBuf::from(dir));
        }

        if let Ok(dir) = std::env::var("ONTOMAP_INPUT_DIR") {
            self.builder.input_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("ONTOMAP_OUTPUT_DIR") {
            self.builder.output_dir = PathBuf::from(dir);
        }

        if let Ok(host) = std::env::var("ONTOMAP_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("ONTOMAP_PORT") {
            if let Ok(n) = port.parse() {
                self.server.port = n;
            }
        }
        if let Ok(size) = std::env::var("ONTOMAP_MAX_UPLOAD_SIZE") {
            if let Ok(n) = size.parse() {
                self.server.max_upload_size = n;
            }
        }
    }

    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let high = self.mapping.high_confidence;
        let medium = self.mapping.medium_confidence;

        if !(0.0..=1.0).contains(&high) || !(0.0..=1.0).contains(&medium) {
            return Err(ConfigError::Invalid(format!(
                "confidence thresholds must lie in [0, 1] (high={high}, medium={medium})"
            )));
        }
        if medium > high {
            return Err(ConfigError::Invalid(format!(
                "medium_confidence ({medium}) must not exceed high_confidence ({high})"
            )));
        }
        if self.mapping.rules.iter().any(|r| r.class.trim().is_empty()) {
            return Err(ConfigError::Invalid("keyword rule with empty class".to_string()));
        }

        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// A keyword rule: every keyword found in a normalized name counts toward `class`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Target ontology class.
    pub class: String,
    /// Keywords, synonyms and non-English terms for the class.
    pub keywords: Vec<String>,
}

/// Hybrid mapping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Rule matches at or above this confidence are accepted.
    pub high_confidence: f64,

    /// Semantic matches at or above this confidence are accepted.
    pub medium_confidence: f64,

    /// Embedding model name.
    pub model_name: String,

    /// Model cache directory (default: `~/.ontomap/cache`).
    pub cache_dir: Option<PathBuf>,

    /// Default relation predicate for uploads.
    pub relation_type: String,

    /// Keyword dictionary, in tie-break order.
    pub rules: Vec<KeywordRule>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            high_confidence: DEFAULT_HIGH_CONFIDENCE,
            medium_confidence: DEFAULT_MEDIUM_CONFIDENCE,
            model_name: DEFAULT_MODEL.to_string(),
            cache_dir: None,
            relation_type: DEFAULT_RELATION_TYPE.to_string(),
            rules: default_keyword_rules(),
        }
    }
}

impl MappingConfig {
    /// Get the model cache directory, falling back to `~/.ontomap/cache`.
    pub fn cache_dir_or_default(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_DATA_DIR)
                .join(DEFAULT_CACHE_DIR)
        })
    }
}

/// The built-in keyword dictionary as owned rules.
pub fn default_keyword_rules() -> Vec<KeywordRule> {
    DEFAULT_KEYWORD_RULES
        .iter()
        .map(|(class, keywords)| KeywordRule {
            class: class.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}

/// Relation graph namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// URI bound to the `meta` prefix.
    pub meta_uri: String,

    /// URI bound to the `fact` prefix.
    pub fact_uri: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            meta_uri: DEFAULT_META_URI.to_string(),
            fact_uri: DEFAULT_FACT_URI.to_string(),
        }
    }
}

/// Bulk folder builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Folder scanned for CSV files.
    pub input_dir: PathBuf,

    /// Folder receiving the Turtle export.
    pub output_dir: PathBuf,

    /// Export file name.
    pub output_file: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

impl BuilderConfig {
    /// Full path of the Turtle export.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Maximum accepted upload size in bytes.
    pub max_upload_size: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}
