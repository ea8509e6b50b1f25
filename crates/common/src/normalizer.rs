//! Response normalization.
//!
//! The generation workflow answers in one of a few shapes depending on how it
//! was wired up. [`WebhookPayload::classify`] sorts a decoded body into a
//! closed set of shapes, checked in a fixed priority order:
//!
//! 1. an acknowledgment that the workflow was only queued
//!    (`{"message": "Workflow was started"}`),
//! 2. a single variant with flat `text`, `headline` and `description` strings,
//! 3. the three-column shape (`primaryText`, `headline`, `description` lists,
//!    optionally with `*Images` lists),
//! 4. anything else.
//!
//! [`normalize`] turns the classified payload into a [`Normalized`] outcome.

use derive_more::Display;
use error_stack::Report;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::ad_result::AdResult;
use crate::constants::{
    NOTICE_GENERATED, NOTICE_PLACEHOLDER, NOTICE_QUEUED, SHAPE_KEYS_LIMIT,
    WORKFLOW_STARTED_MESSAGE,
};
use crate::error::AdKitError;

/// How to treat a body that matches no known shape.
#[derive(Debug, Display, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMismatchPolicy {
    /// Substitute [`AdResult::placeholder`] and warn.
    #[default]
    #[display("placeholder")]
    Placeholder,
    /// Fail with [`AdKitError::ShapeMismatch`].
    #[display("reject")]
    Reject,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SingleVariant {
    pub text: String,
    pub headline: String,
    pub description: String,
}

impl SingleVariant {
    fn is_complete(&self) -> bool {
        !self.text.is_empty() && !self.headline.is_empty() && !self.description.is_empty()
    }
}

impl From<SingleVariant> for AdResult {
    fn from(variant: SingleVariant) -> Self {
        AdResult::single(variant.text, variant.headline, variant.description)
    }
}

/// Shapes a webhook body can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookPayload {
    AsyncAck,
    SingleVariant(SingleVariant),
    MultiVariant(AdResult),
    Unrecognized,
}

impl WebhookPayload {
    #[must_use]
    pub fn classify(body: &Json) -> Self {
        let Some(object) = body.as_object() else {
            return Self::Unrecognized;
        };

        if object.get("message").and_then(Json::as_str) == Some(WORKFLOW_STARTED_MESSAGE) {
            return Self::AsyncAck;
        }

        if let Ok(variant) = SingleVariant::deserialize(body) {
            if variant.is_complete() {
                return Self::SingleVariant(variant);
            }
        }

        let has_columns = ["primaryText", "headline", "description"]
            .iter()
            .all(|key| object.get(*key).is_some_and(Json::is_array));
        if has_columns {
            if let Ok(result) = AdResult::deserialize(body) {
                return Self::MultiVariant(result);
            }
        }

        Self::Unrecognized
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AsyncAck => "async-ack",
            Self::SingleVariant(_) => "single-variant",
            Self::MultiVariant(_) => "multi-variant",
            Self::Unrecognized => "unrecognized",
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    #[display("info")]
    Info,
    #[display("success")]
    Success,
    #[display("warning")]
    Warning,
}

/// User-facing message accompanying a normalization outcome.
#[derive(Debug, Display, Clone, PartialEq, Eq, Serialize)]
#[display("{message}")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: &str) -> Self {
        Self {
            level,
            message: message.to_string(),
        }
    }
}

/// Outcome of normalizing one webhook body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The workflow only acknowledged the request; there is no copy yet.
    Queued,
    Generated(AdResult),
    /// The body was unreadable and sample copy was substituted.
    Placeholder(AdResult),
}

impl Normalized {
    #[must_use]
    pub fn result(&self) -> Option<&AdResult> {
        match self {
            Self::Queued => None,
            Self::Generated(result) | Self::Placeholder(result) => Some(result),
        }
    }

    #[must_use]
    pub fn into_result(self) -> Option<AdResult> {
        match self {
            Self::Queued => None,
            Self::Generated(result) | Self::Placeholder(result) => Some(result),
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Generated(_) => "generated",
            Self::Placeholder(_) => "placeholder",
        }
    }

    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Queued => Notice::new(NoticeLevel::Info, NOTICE_QUEUED),
            Self::Generated(_) => Notice::new(NoticeLevel::Success, NOTICE_GENERATED),
            Self::Placeholder(_) => Notice::new(NoticeLevel::Warning, NOTICE_PLACEHOLDER),
        }
    }
}

/// Normalize a decoded webhook body.
///
/// Pure: the same body and policy always give the same outcome.
///
/// # Errors
///
/// Returns [`AdKitError::ShapeMismatch`] when the body matches no known shape
/// and `policy` is [`ShapeMismatchPolicy::Reject`].
pub fn normalize(
    body: &Json,
    policy: ShapeMismatchPolicy,
) -> Result<Normalized, Report<AdKitError>> {
    let payload = WebhookPayload::classify(body);
    log::debug!("Webhook body classified as {}", payload.kind());

    match payload {
        WebhookPayload::AsyncAck => Ok(Normalized::Queued),
        WebhookPayload::SingleVariant(variant) => Ok(Normalized::Generated(variant.into())),
        WebhookPayload::MultiVariant(result) => Ok(Normalized::Generated(result)),
        WebhookPayload::Unrecognized => {
            let shape = describe_shape(body);
            match policy {
                ShapeMismatchPolicy::Placeholder => {
                    log::warn!("Unrecognized webhook response ({shape}), showing sample data");
                    Ok(Normalized::Placeholder(AdResult::placeholder()))
                }
                ShapeMismatchPolicy::Reject => {
                    log::warn!("Unrecognized webhook response ({shape}), rejecting");
                    Err(Report::new(AdKitError::ShapeMismatch { message: shape }))
                }
            }
        }
    }
}

/// Short description of a body for logs and errors: its first top-level
/// keys, or its JSON type when it is not an object.
fn describe_shape(body: &Json) -> String {
    match body {
        Json::Object(object) if object.is_empty() => "empty object".to_string(),
        Json::Object(object) => {
            let keys: Vec<&str> = object
                .keys()
                .take(SHAPE_KEYS_LIMIT)
                .map(String::as_str)
                .collect();
            let hidden = object.len().saturating_sub(SHAPE_KEYS_LIMIT);
            if hidden == 0 {
                format!("keys: {}", keys.join(", "))
            } else {
                format!("keys: {}, ... ({hidden} more)", keys.join(", "))
            }
        }
        Json::Array(_) => "array".to_string(),
        Json::String(_) => "string".to_string(),
        Json::Number(_) => "number".to_string(),
        Json::Bool(_) => "boolean".to_string(),
        Json::Null => "null".to_string(),
    }
}
