//! Configuration commands.
//!
//! Settings are loaded from a TOML file (or the defaults built into the
//! binary) and merged with environment variables prefixed with `ADKIT__`.
//! For example, `ADKIT__WEBHOOK__URL` overrides `webhook.url`.

use std::path::Path;

use adkit_common::settings::{Settings, ENVIRONMENT_PREFIX};

use crate::error::CliError;

/// Load, merge and validate settings.
pub(crate) fn load_settings(file: Option<&Path>) -> Result<Settings, CliError> {
    match file {
        Some(path) => log::info!("Loading config from: {}", path.display()),
        None => log::info!("Loading built-in default config"),
    }
    log::info!("Environment variables with {ENVIRONMENT_PREFIX}__ prefix will be merged");

    Ok(Settings::load(file)?)
}

/// Validate configuration and summarize the effective values.
pub fn validate(file: Option<&Path>) -> Result<String, CliError> {
    let settings = load_settings(file)?;

    let source = file.map_or_else(|| "(built-in)".to_string(), |p| p.display().to_string());
    Ok(format!(
        "Configuration is valid\n  File: {}\n  Webhook: {}\n  Timeout: {}s\n  Unrecognized shapes: {}",
        source,
        settings.webhook.url,
        settings.webhook.timeout_secs,
        settings.normalizer.on_unrecognized
    ))
}

/// Print the effective configuration after environment overrides.
pub fn show(file: Option<&Path>) -> Result<String, CliError> {
    let settings = load_settings(file)?;
    Ok(settings.to_canonical_toml()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_config(dir: &TempDir) -> PathBuf {
        let config_path = dir.path().join("adkit.toml");
        fs::write(
            &config_path,
            r#"
[webhook]
url = "https://hooks.test.com/webhook/ad-kit"
timeout_secs = 15

[normalizer]
on_unrecognized = "reject"
"#,
        )
        .unwrap();
        config_path
    }

    #[test]
    fn test_validate_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = create_test_config(&dir);

        let output = validate(Some(config_path.as_path())).unwrap();
        assert!(output.starts_with("Configuration is valid"));
        assert!(output.contains("Unrecognized shapes: reject"));
    }

    #[test]
    fn test_validate_builtin_config() {
        let output = validate(None).unwrap();
        assert!(output.contains("File: (built-in)"));
    }

    #[test]
    fn test_validate_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("invalid.toml");
        fs::write(&config_path, "invalid { toml").unwrap();

        let result = validate(Some(config_path.as_path()));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_bad_url() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad-url.toml");
        fs::write(&config_path, "[webhook]\nurl = \"nope\"\n").unwrap();

        let result = validate(Some(config_path.as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let result = validate(Some(config_path.as_path()));
        assert!(result.is_err());
    }

    #[test]
    fn test_show_prints_canonical_toml() {
        let dir = TempDir::new().unwrap();
        let config_path = create_test_config(&dir);

        let output = show(Some(config_path.as_path())).unwrap();
        assert!(output.contains("[webhook]"));
        assert!(output.contains("timeout_secs = 15"));
    }
}
