// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Introspection configuration.
//!
//! Loaded from a TOML file and/or the environment:
//!
//! - `HDDS_TYPEDEF_PATH`: colon-separated package directories
//!   (falls back to `ROS_PACKAGE_PATH`)
//! - `HDDS_TYPEDEF_LOG_LEVEL`: log level (default: "warn")

use crate::descriptor::{ConstantOrder, DescriptorOptions, MalformedFieldPolicy};
use crate::error::TypedefError;
use crate::registry::DefinitionRegistry;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Package search path variable.
pub const ENV_PACKAGE_PATH: &str = "HDDS_TYPEDEF_PATH";
/// ROS package path (fallback).
pub const ENV_ROS_PACKAGE_PATH: &str = "ROS_PACKAGE_PATH";
/// Log level variable.
pub const ENV_LOG_LEVEL: &str = "HDDS_TYPEDEF_LOG_LEVEL";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Introspection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedefConfig {
    /// Directories searched for `<package>/msg/*.msg` and `<package>/srv/*.srv`.
    #[serde(default)]
    pub package_paths: Vec<PathBuf>,

    /// Order of constants within a descriptor.
    #[serde(default)]
    pub constant_order: ConstantOrder,

    /// Handling of malformed array suffixes.
    #[serde(default)]
    pub malformed_field_type: MalformedFieldPolicy,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for TypedefConfig {
    fn default() -> Self {
        Self {
            package_paths: Vec::new(),
            constant_order: ConstantOrder::default(),
            malformed_field_type: MalformedFieldPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl TypedefConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables onto this configuration.
    ///
    /// Package paths from the environment are appended after those
    /// already configured.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| env::var(name).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        let package_path = var(ENV_PACKAGE_PATH).or_else(|| var(ENV_ROS_PACKAGE_PATH));
        if let Some(paths) = package_path {
            self.package_paths.extend(
                env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()),
            );
        }
        if let Some(level) = var(ENV_LOG_LEVEL) {
            self.log_level = level.to_lowercase();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Unknown log level '{}' (expected one of {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        for path in &self.package_paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("Empty package path".into()));
            }
        }
        Ok(())
    }

    /// Builder options derived from this configuration.
    pub fn descriptor_options(&self) -> DescriptorOptions {
        DescriptorOptions {
            constant_order: self.constant_order,
            malformed_field_type: self.malformed_field_type,
        }
    }

    /// Load a registry from the configured package paths.
    pub fn load_registry(&self) -> Result<DefinitionRegistry, TypedefError> {
        let mut registry = DefinitionRegistry::new();
        let loaded = registry.load_package_paths(&self.package_paths)?;
        tracing::info!(
            "loaded {} types from {} package path(s)",
            loaded,
            self.package_paths.len()
        );
        Ok(registry)
    }

    /// Add a package path.
    pub fn add_package_path(&mut self, path: impl Into<PathBuf>) {
        self.package_paths.push(path.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = TypedefConfig::default();
        assert!(config.package_paths.is_empty());
        assert_eq!(config.constant_order, ConstantOrder::Lexicographic);
        assert_eq!(config.malformed_field_type, MalformedFieldPolicy::Reject);
        assert_eq!(config.log_level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = TypedefConfig::from_toml(
            r#"
package_paths = ["/opt/ros/noetic/share", "/home/me/ws/src"]
constant_order = "declaration"
malformed_field_type = "scalar"
log_level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.package_paths.len(), 2);
        assert_eq!(config.constant_order, ConstantOrder::Declaration);
        assert_eq!(config.malformed_field_type, MalformedFieldPolicy::Scalar);

        let options = config.descriptor_options();
        assert_eq!(options.constant_order, ConstantOrder::Declaration);
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        assert!(matches!(
            TypedefConfig::from_toml("log_level = \"loud\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TypedefConfig::from_toml("constant_order = \"random\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_env_overlay() {
        let vars: HashMap<&str, &str> = [
            (ENV_ROS_PACKAGE_PATH, "/a:/b"),
            (ENV_LOG_LEVEL, "DEBUG"),
        ]
        .into_iter()
        .collect();

        let mut config = TypedefConfig::default();
        config.add_package_path("/first");
        config.apply_vars(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(
            config.package_paths,
            vec![PathBuf::from("/first"), PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_from_env_matches_overlay() {
        let mut expected = TypedefConfig::default();
        expected.apply_env();
        assert_eq!(TypedefConfig::from_env(), expected);
    }

    #[test]
    fn test_env_prefers_own_path() {
        let vars: HashMap<&str, &str> =
            [(ENV_PACKAGE_PATH, "/mine"), (ENV_ROS_PACKAGE_PATH, "/ros")]
                .into_iter()
                .collect();
        let mut config = TypedefConfig::default();
        config.apply_vars(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.package_paths, vec![PathBuf::from("/mine")]);
    }

    #[test]
    fn test_toml_roundtrip_for_gen_config() {
        let mut config = TypedefConfig::default();
        config.add_package_path("/opt/ros/noetic/share");
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(TypedefConfig::from_toml(&text).unwrap(), config);
    }
}
