//! CLI error types.

use std::fmt;

use adkit_common::error::AdKitError;
use error_stack::Report;

#[derive(Debug)]
pub enum CliError {
    /// Settings file error
    Config(String),
    /// Form input rejected before any request was sent
    Input(String),
    /// Webhook request or response error
    Request(String),
    /// IO error
    Io(std::io::Error),
    /// JSON parsing or serialization error
    Json(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Input(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Request(msg) => write!(f, "Generation failed: {}", msg),
            CliError::Io(err) => write!(f, "IO error: {}", err),
            CliError::Json(msg) => write!(f, "JSON error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err.to_string())
    }
}

impl From<Report<AdKitError>> for CliError {
    fn from(report: Report<AdKitError>) -> Self {
        log::debug!("{report:?}");

        let context = report.current_context();
        let message = match context {
            AdKitError::Validation { message }
            | AdKitError::Transport { message }
            | AdKitError::InvalidResponse { message }
            | AdKitError::ShapeMismatch { message }
            | AdKitError::Configuration { message } => message.clone(),
            AdKitError::Busy | AdKitError::Status { .. } => context.to_string(),
        };

        match context {
            AdKitError::Configuration { .. } => CliError::Config(message),
            err if err.is_user_input() => CliError::Input(message),
            AdKitError::ShapeMismatch { .. } => {
                CliError::Request(format!("unexpected response shape ({message})"))
            }
            _ => CliError::Request(message),
        }
    }
}
