//! HTTP transport to the generation webhook.
//!
//! [`WebhookTransport`] is the seam the form controller talks through. The
//! production implementation is [`UreqTransport`]; tests use
//! [`crate::test_support::tests::MockTransport`].

use std::time::Duration;

use error_stack::{Report, ResultExt};
use serde_json::Value as Json;
use ureq::Agent;

use crate::campaign::CampaignRequest;
use crate::constants::{BODY_PREVIEW_LIMIT, CONTENT_TYPE_JSON};
use crate::error::AdKitError;
use crate::settings::Webhook;

/// Raw answer from the webhook, before any status or shape handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AdKitError::InvalidResponse`] if the body is not valid JSON.
    pub fn json(&self) -> Result<Json, Report<AdKitError>> {
        serde_json::from_str(&self.body)
            .change_context(AdKitError::InvalidResponse {
                message: "Response body is not JSON".to_string(),
            })
            .attach(format!("body: {}", self.body_preview()))
    }

    /// Start of the body, cut at a character boundary.
    #[must_use]
    pub fn body_preview(&self) -> &str {
        if self.body.len() <= BODY_PREVIEW_LIMIT {
            return &self.body;
        }
        let mut end = BODY_PREVIEW_LIMIT;
        while !self.body.is_char_boundary(end) {
            end -= 1;
        }
        &self.body[..end]
    }
}

/// Sends a campaign request to the generation webhook.
pub trait WebhookTransport {
    /// POST the request as JSON and return the raw response, whatever its
    /// status.
    ///
    /// # Errors
    ///
    /// Returns [`AdKitError::Transport`] when no response could be obtained.
    fn post_json(&self, request: &CampaignRequest) -> Result<WebhookResponse, Report<AdKitError>>;

    /// Endpoint the transport posts to, for logging.
    fn endpoint(&self) -> &str;
}

/// Blocking webhook client built on a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    url: String,
}

impl UreqTransport {
    /// Create a client with a whole-request timeout. Non-2xx statuses are
    /// returned as responses, not errors.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        Self {
            agent: Agent::new_with_config(config),
            url: url.into(),
        }
    }

    #[must_use]
    pub fn from_settings(webhook: &Webhook) -> Self {
        Self::new(webhook.url.clone(), webhook.timeout())
    }

    fn transport_error(message: impl Into<String>) -> AdKitError {
        AdKitError::Transport {
            message: message.into(),
        }
    }
}

impl WebhookTransport for UreqTransport {
    fn post_json(&self, request: &CampaignRequest) -> Result<WebhookResponse, Report<AdKitError>> {
        let payload = serde_json::to_vec(request).change_context(Self::transport_error(
            "Failed to serialize campaign request",
        ))?;

        log::debug!("POST {} ({} bytes)", self.url, payload.len());

        let mut response = self
            .agent
            .post(&self.url)
            .header("Content-Type", CONTENT_TYPE_JSON)
            .header("Accept", CONTENT_TYPE_JSON)
            .send(&payload[..])
            .map_err(|e| {
                let message = if matches!(e, ureq::Error::Timeout(_)) {
                    "Webhook request timed out"
                } else {
                    "Failed to send request"
                };
                Report::new(e).change_context(Self::transport_error(message))
            })
            .attach(format!("url: {}", self.url))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .change_context(Self::transport_error("Failed to read response"))
            .attach(format!("url: {}", self.url))?;

        log::debug!("Webhook answered HTTP {} ({} bytes)", status, body.len());

        Ok(WebhookResponse { status, body })
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
