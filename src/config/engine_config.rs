//! Engine Configuration - operator-tunable TOML values
//!
//! Each struct implements `Default` with the values the engine ships with,
//! ensuring identical behavior when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "RELIEF_CONFIG";

/// Config file searched in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "relief_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an engine deployment.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$RELIEF_CONFIG` env var
/// 2. `./relief_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Demand forecaster training parameters
    #[serde(default)]
    pub forecaster: ForecasterConfig,

    /// Volunteer clustering parameters
    #[serde(default)]
    pub matcher: MatcherConfig,
}

impl EngineConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded engine config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./relief_config.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded engine config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are reported as warnings only; out-of-range values fail.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = super::validation::validate_ranges(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Config loading / validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {1}", .0.display())]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {1}", .0.display())]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `RELIEF_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,

    /// Origins allowed to call the API cross-origin. Empty means same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum accepted request body size.
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

fn default_server_addr() -> String {
    "0.0.0.0:5001".to_string()
}

fn default_body_limit_bytes() -> usize {
    2 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            cors_origins: Vec::new(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

// ============================================================================
// Forecaster
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecasterConfig {
    /// Rows of a type required before a model is fitted for it.
    #[serde(default = "default_min_training_rows")]
    pub min_training_rows: usize,

    /// Trees in the regression forest.
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,

    /// Seed for bootstrap sampling; fixed so training is reproducible.
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,

    /// Maximum tree depth. `None` grows trees until leaves are pure.
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Minimum samples a node needs before it may be split.
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,

    /// JSON dataset of historical records to train on at startup.
    #[serde(default)]
    pub history_path: Option<PathBuf>,
}

fn default_min_training_rows() -> usize { 10 }
fn default_n_estimators() -> usize { 100 }
fn default_random_seed() -> u64 { 42 }
fn default_min_samples_split() -> usize { 2 }

impl Default for ForecasterConfig {
    fn default() -> Self {
        Self {
            min_training_rows: default_min_training_rows(),
            n_estimators: default_n_estimators(),
            random_seed: default_random_seed(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            history_path: None,
        }
    }
}

// ============================================================================
// Matcher
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherConfig {
    /// Upper bound on the number of volunteer clusters.
    #[serde(default = "default_max_clusters")]
    pub max_clusters: usize,

    /// Lloyd iterations per k-means run.
    #[serde(default = "default_kmeans_max_iter")]
    pub kmeans_max_iter: usize,

    /// Independent k-means restarts; the lowest-inertia run wins.
    #[serde(default = "default_kmeans_n_init")]
    pub kmeans_n_init: usize,

    /// Convergence threshold on total centroid movement (squared).
    #[serde(default = "default_kmeans_tolerance")]
    pub kmeans_tolerance: f64,

    /// Seed for centroid initialisation.
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
}

fn default_max_clusters() -> usize { 3 }
fn default_kmeans_max_iter() -> usize { 300 }
fn default_kmeans_n_init() -> usize { 10 }
fn default_kmeans_tolerance() -> f64 { 1e-4 }

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_clusters: default_max_clusters(),
            kmeans_max_iter: default_kmeans_max_iter(),
            kmeans_n_init: default_kmeans_n_init(),
            kmeans_tolerance: default_kmeans_tolerance(),
            random_seed: default_random_seed(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.addr, "0.0.0.0:5001");
        assert_eq!(config.forecaster.min_training_rows, 10);
        assert_eq!(config.forecaster.n_estimators, 100);
        assert_eq!(config.forecaster.random_seed, 42);
        assert_eq!(config.matcher.max_clusters, 3);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
[forecaster]
n_estimators = 25
max_depth = 8
"#,
        )
        .unwrap();
        assert_eq!(config.forecaster.n_estimators, 25);
        assert_eq!(config.forecaster.max_depth, Some(8));
        assert_eq!(config.forecaster.random_seed, 42);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        let err = EngineConfig::from_toml_str("[forecaster]\nn_estimators = 0\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.contains("n_estimators")));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_toml_roundtrip_preserves_values() {
        let mut config = EngineConfig::default();
        config.server.cors_origins = vec!["http://localhost:3000".to_string()];
        config.matcher.kmeans_n_init = 4;
        let text = config.to_toml().unwrap();
        let back = EngineConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
