use std::fs;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AdKitError;
use crate::normalizer::ShapeMismatchPolicy;

/// Prefix for environment overrides, e.g. `ADKIT__WEBHOOK__URL`.
pub const ENVIRONMENT_PREFIX: &str = "ADKIT";

const EMBEDDED_SETTINGS: &str = include_str!("../../../adkit.toml");

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Webhook {
    /// Generation endpoint the campaign request is posted to.
    #[validate(url)]
    pub url: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Webhook {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct Normalizer {
    /// What to do with a response that matches no known shape.
    #[serde(default)]
    pub on_unrecognized: ShapeMismatchPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub webhook: Webhook,
    #[serde(default)]
    #[validate(nested)]
    pub normalizer: Normalizer,
}

impl Settings {
    /// Load the settings embedded at build time, merged with environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`AdKitError::Configuration`] if the merged settings cannot be
    /// deserialized.
    pub fn new() -> Result<Self, Report<AdKitError>> {
        Self::from_toml(EMBEDDED_SETTINGS)
    }

    /// Parse TOML and merge it with `ADKIT__` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`AdKitError::Configuration`] on invalid TOML or missing
    /// required fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<AdKitError>> {
        let environment = Environment::default()
            .prefix(ENVIRONMENT_PREFIX)
            .separator("__");

        let toml = File::from_str(toml_str, FileFormat::Toml);
        let config = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()
            .change_context(AdKitError::Configuration {
                message: "Failed to build configuration".to_string(),
            })?;

        config
            .try_deserialize()
            .change_context(AdKitError::Configuration {
                message: "Failed to deserialize settings".to_string(),
            })
    }

    /// Read a TOML file and merge it with environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`AdKitError::Configuration`] if the file cannot be read or
    /// parsed.
    pub fn from_file(path: &Path) -> Result<Self, Report<AdKitError>> {
        let content = fs::read_to_string(path)
            .change_context(AdKitError::Configuration {
                message: "Failed to read settings file".to_string(),
            })
            .attach(format!("path: {}", path.display()))?;

        Self::from_toml(&content).attach(format!("path: {}", path.display()))
    }

    /// Load settings from `path`, or the embedded defaults when no path is
    /// given, and validate them.
    ///
    /// # Errors
    ///
    /// Returns [`AdKitError::Configuration`] if loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, Report<AdKitError>> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::new()?,
        };

        settings.validate().change_context(AdKitError::Configuration {
            message: "Settings validation failed".to_string(),
        })?;

        log::debug!(
            "Loaded settings: webhook {} (timeout {}s), unrecognized shapes -> {}",
            settings.webhook.url,
            settings.webhook.timeout_secs,
            settings.normalizer.on_unrecognized
        );

        Ok(settings)
    }

    /// Serialize the effective settings back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`AdKitError::Configuration`] if serialization fails.
    pub fn to_canonical_toml(&self) -> Result<String, Report<AdKitError>> {
        toml::to_string_pretty(self).change_context(AdKitError::Configuration {
            message: "Failed to serialize settings".to_string(),
        })
    }
}
