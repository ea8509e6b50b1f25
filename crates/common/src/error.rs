//! Error types for form submission, webhook transport and normalization.
//!
//! Functions return `Result<T, Report<AdKitError>>`; the [`AdKitError`] is the
//! current context of the report and tells the caller what kind of failure
//! happened, while attachments carry the details (URL, body preview, ...).

use derive_more::{Display, Error};

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum AdKitError {
    /// A required form field is missing or holds an unknown value.
    #[display("Validation error: {message}")]
    Validation { message: String },

    /// A submission is already in flight.
    #[display("A submission is already in progress")]
    Busy,

    /// Connection, timeout or read failure while talking to the webhook.
    #[display("Transport error: {message}")]
    Transport { message: String },

    /// The webhook answered with a non-2xx status.
    #[display("Webhook returned HTTP {status}")]
    Status { status: u16 },

    /// The webhook body could not be decoded as JSON.
    #[display("Invalid webhook response: {message}")]
    InvalidResponse { message: String },

    /// The webhook body matched none of the known shapes.
    #[display("Unexpected response shape: {message}")]
    ShapeMismatch { message: String },

    /// Settings failed to load or validate.
    #[display("Configuration error: {message}")]
    Configuration { message: String },
}

impl AdKitError {
    /// Whether the failure was caused by the caller's input rather than the
    /// webhook or the environment.
    #[must_use]
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Busy)
    }
}
