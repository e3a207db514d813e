//! # Flodvakt Configuration System
//!
//! Hierarchical configuration for the flow anomaly-detection pipeline.
//!
//! ## Features
//! - **Unified Configuration**: Single source of truth across all components
//! - **Validation**: Invalid static configuration fails fast at load time
//! - **Environment Awareness**: YAML files layered under `FLODVAKT_*`
//!   environment overrides

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod alerts;
mod detection;
mod enrichment;
mod error;
mod validation;

pub use alerts::AlertConfig;
pub use detection::BruteForceConfig;
pub use detection::DetectionConfig;
pub use detection::FloodConfig;
pub use detection::PortScanConfig;
pub use enrichment::EnrichmentConfig;
pub use error::ConfigError;

/// Top-level configuration container for all Flodvakt components.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct FlodvaktConfig {
    /// Detector windows, thresholds, and weights.
    #[validate(nested)]
    pub detection: DetectionConfig,

    /// Optional third-party enrichment settings.
    #[validate(nested)]
    pub enrichment: EnrichmentConfig,

    /// Alert destinations.
    #[validate(nested)]
    pub alerts: AlertConfig,
}

impl FlodvaktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/flodvakt.yaml` - base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - environment-specific overrides.
    /// 4. `FLODVAKT_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(FlodvaktConfig::default()));

        if Path::new("config/flodvakt.yaml").exists() {
            figment = figment.merge(Yaml::file("config/flodvakt.yaml"));
        }

        let env = std::env::var("FLODVAKT_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        figment
            .merge(Env::prefixed("FLODVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path for testing/validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        Figment::from(Serialized::defaults(FlodvaktConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("FLODVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_validation() {
        let config = FlodvaktConfig::default();
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn missing_path_is_reported() {
        let err = FlodvaktConfig::load_from_path("config/does-not-exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn environment_override() {
        // Jail scopes the env mutation and serializes against other tests.
        figment::Jail::expect_with(|jail| {
            jail.set_env("FLODVAKT_DETECTION__PORT_SCAN__UNIQUE_PORTS", "20");
            let config = FlodvaktConfig::load().expect("env override should load");
            assert_eq!(config.detection.port_scan.unique_ports, 20);
            Ok(())
        });
    }

    #[test]
    fn yaml_file_layering() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/flodvakt.yaml",
                r#"
detection:
  brute_force:
    connection_count: 5
"#,
            )?;
            let config = FlodvaktConfig::load().expect("yaml layer should load");
            assert_eq!(config.detection.brute_force.connection_count, 5);
            // Untouched fields keep their defaults.
            assert_eq!(config.detection.port_scan.unique_ports, 15);
            Ok(())
        });
    }
}
