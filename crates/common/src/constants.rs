/// Value of the `message` field a workflow webhook sends when it only queued
/// the run instead of answering with its output.
pub const WORKFLOW_STARTED_MESSAGE: &str = "Workflow was started";

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Longest slice of a response body copied into error reports.
pub const BODY_PREVIEW_LIMIT: usize = 256;

/// Top-level keys listed when describing an unrecognized response body.
pub const SHAPE_KEYS_LIMIT: usize = 8;

pub const NOTICE_GENERATED: &str = "Ads generated successfully!";
pub const NOTICE_QUEUED: &str = "Workflow started. The webhook may process the request \
     asynchronously; no ad copy was returned yet.";
pub const NOTICE_PLACEHOLDER: &str = "API returned unexpected format. Showing sample data.";
