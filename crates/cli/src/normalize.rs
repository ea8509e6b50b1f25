//! `adkit normalize`: run the normalizer on a saved webhook payload.
//!
//! Handy for checking what shape a workflow answers with without calling it.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use adkit_common::normalizer::{normalize, ShapeMismatchPolicy};
use serde_json::Value as Json;

use crate::error::CliError;
use crate::render::{render, OutputFormat};

/// Read a payload from `file`, or stdin when no file is given.
pub fn read_payload(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

/// Normalize a payload and render the outcome.
pub fn normalize_payload(
    payload: &str,
    policy: ShapeMismatchPolicy,
    format: OutputFormat,
) -> Result<String, CliError> {
    let body: Json = serde_json::from_str(payload)?;
    let normalized = normalize(&body, policy)?;
    render(&normalized, format)
}
