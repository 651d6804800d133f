#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for oprelay
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/oprelay/config.toml)
//! - Environment variables
//!
//! Configuration is read once when a forwarding engine is constructed.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use oprelay_errors::{ConfigError, Error};
use oprelay_types::{BuildEventSubscriptions, DetailsKind, OperationType};
use serde::{Deserialize, Serialize};
use tokio::fs;

pub const SUBSCRIPTIONS_ENV: &str = "OPRELAY_SUBSCRIPTIONS";
pub const FILTERED_KINDS_ENV: &str = "OPRELAY_FILTERED_KINDS";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub subscriptions: SubscriptionConfig,

    #[serde(default)]
    pub forwarding: ForwardingConfig,
}

/// Which event categories the subscribing client asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    #[serde(default = "default_operation_types")]
    pub operation_types: Vec<OperationType>,
}

/// How the forwarding engine classifies operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardingConfig {
    /// Details kinds treated as the filtered (configuration step) category
    #[serde(default = "default_filtered_kinds")]
    pub filtered_kinds: Vec<DetailsKind>,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            operation_types: default_operation_types(),
        }
    }
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            filtered_kinds: default_filtered_kinds(),
        }
    }
}

fn default_operation_types() -> Vec<OperationType> {
    OperationType::ALL.to_vec()
}

fn default_filtered_kinds() -> Vec<DetailsKind> {
    vec![DetailsKind::ApplyPlugin, DetailsKind::ApplyScriptPlugin]
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("oprelay").join("config.toml"))
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or names an unknown
    /// operation type or details kind.
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded forwarding configuration");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable names an unknown operation
    /// type or details kind.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // OPRELAY_SUBSCRIPTIONS
        if let Ok(value) = std::env::var(SUBSCRIPTIONS_ENV) {
            self.subscriptions.operation_types =
                parse_list(SUBSCRIPTIONS_ENV, &value, OperationType::from_name)?;
        }

        // OPRELAY_FILTERED_KINDS
        if let Ok(value) = std::env::var(FILTERED_KINDS_ENV) {
            self.forwarding.filtered_kinds =
                parse_list(FILTERED_KINDS_ENV, &value, DetailsKind::from_name)?;
        }

        Ok(())
    }

    /// Subscriptions of the client this configuration belongs to
    #[must_use]
    pub fn subscriptions(&self) -> BuildEventSubscriptions {
        BuildEventSubscriptions::new(self.subscriptions.operation_types.iter().copied())
    }

    /// Details kinds routed through the filtering path
    #[must_use]
    pub fn filtered_kinds(&self) -> BTreeSet<DetailsKind> {
        self.forwarding.filtered_kinds.iter().copied().collect()
    }
}

fn parse_list<T>(field: &str, value: &str, parse: fn(&str) -> Option<T>) -> Result<Vec<T>, Error> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            parse(item).ok_or_else(|| {
                Error::from(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: item.to_string(),
                })
            })
        })
        .collect()
}
