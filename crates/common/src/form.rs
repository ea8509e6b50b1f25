//! Ad generator form controller.
//!
//! [`AdForm`] holds the three raw inputs, a busy flag and the last normalized
//! result. [`AdForm::submit`] validates the inputs, sends exactly one request
//! through its [`WebhookTransport`], and normalizes the answer.
//!
//! Submissions do not overlap: while one is in flight, another `submit` on
//! the same form fails with [`AdKitError::Busy`] without touching the network.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use error_stack::Report;

use crate::ad_result::AdResult;
use crate::campaign::{CampaignGoal, CampaignRequest, CreativeStyle};
use crate::error::AdKitError;
use crate::normalizer::{normalize, Normalized, ShapeMismatchPolicy};
use crate::settings::Settings;
use crate::transport::WebhookTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ItemDescription,
    CampaignGoal,
    CreativeStyle,
}

impl FormField {
    pub const ALL: [Self; 3] = [Self::ItemDescription, Self::CampaignGoal, Self::CreativeStyle];

    /// Human-readable label, as shown next to the input.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ItemDescription => "item description",
            Self::CampaignGoal => "campaign goal",
            Self::CreativeStyle => "creative style",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FormField {
    type Err = AdKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "item-description" | "itemDescription" => Ok(Self::ItemDescription),
            "campaign-goal" | "campaignGoal" => Ok(Self::CampaignGoal),
            "creative-style" | "creativeStyle" => Ok(Self::CreativeStyle),
            other => Err(AdKitError::Validation {
                message: format!("unknown form field '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct FormFields {
    item_description: String,
    campaign_goal: String,
    creative_style: String,
}

impl FormFields {
    fn get(&self, field: FormField) -> &String {
        match field {
            FormField::ItemDescription => &self.item_description,
            FormField::CampaignGoal => &self.campaign_goal,
            FormField::CreativeStyle => &self.creative_style,
        }
    }

    fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::ItemDescription => &mut self.item_description,
            FormField::CampaignGoal => &mut self.campaign_goal,
            FormField::CreativeStyle => &mut self.creative_style,
        }
    }

    /// Presence check, then typed parsing of the two select values.
    fn to_request(&self) -> Result<CampaignRequest, Report<AdKitError>> {
        let missing: Vec<&str> = FormField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .map(FormField::label)
            .collect();

        if !missing.is_empty() {
            return Err(Report::new(AdKitError::Validation {
                message: format!("Please fill in all fields (missing: {})", missing.join(", ")),
            }));
        }

        let campaign_goal = CampaignGoal::from_str(&self.campaign_goal).map_err(Report::new)?;
        let creative_style = CreativeStyle::from_str(&self.creative_style).map_err(Report::new)?;

        Ok(CampaignRequest::new(
            self.item_description.clone(),
            campaign_goal,
            creative_style,
        ))
    }
}

/// Shared, read-only view of a form's busy state.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag if it is clear. The returned guard clears it on drop.
    fn engage(&self) -> Option<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(self.0.as_ref()))
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormOptions {
    pub on_unrecognized: ShapeMismatchPolicy,
}

impl From<&Settings> for FormOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            on_unrecognized: settings.normalizer.on_unrecognized,
        }
    }
}

pub struct AdForm<T> {
    transport: T,
    options: FormOptions,
    fields: Mutex<FormFields>,
    busy: BusyFlag,
    result: Mutex<Option<AdResult>>,
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: WebhookTransport> AdForm<T> {
    pub fn new(transport: T, options: FormOptions) -> Self {
        Self {
            transport,
            options,
            fields: Mutex::new(FormFields::default()),
            busy: BusyFlag::default(),
            result: Mutex::new(None),
        }
    }

    /// Set one input value. Nothing else happens until [`Self::submit`].
    pub fn update_field(&self, field: FormField, value: impl Into<String>) {
        *lock(&self.fields).get_mut(field) = value.into();
    }

    #[must_use]
    pub fn field(&self, field: FormField) -> String {
        lock(&self.fields).get(field).clone()
    }

    /// Reset all three inputs. The stored result is kept.
    pub fn clear(&self) {
        *lock(&self.fields) = FormFields::default();
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    #[must_use]
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// Last stored result, if any.
    #[must_use]
    pub fn result(&self) -> Option<AdResult> {
        lock(&self.result).clone()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate the inputs, send them to the webhook and normalize the
    /// answer.
    ///
    /// The stored result is replaced by the normalized one (absent for a
    /// queued acknowledgment) and cleared when the shape is rejected. It is
    /// left untouched on every other failure.
    ///
    /// # Errors
    ///
    /// - [`AdKitError::Validation`] if a field is empty or holds an unknown
    ///   value; no request is sent.
    /// - [`AdKitError::Busy`] if another submission is in flight; no request
    ///   is sent.
    /// - [`AdKitError::Transport`], [`AdKitError::Status`] or
    ///   [`AdKitError::InvalidResponse`] if no usable JSON came back.
    /// - [`AdKitError::ShapeMismatch`] if the body matches no known shape and
    ///   the form rejects unknown shapes.
    pub fn submit(&self) -> Result<Normalized, Report<AdKitError>> {
        let request = lock(&self.fields).to_request()?;

        let Some(_busy) = self.busy.engage() else {
            log::warn!("Ignoring submit while another submission is in flight");
            return Err(Report::new(AdKitError::Busy));
        };

        log::info!(
            "Generating ads for a {} campaign in {} style via {}",
            request.campaign_goal,
            request.creative_style,
            self.transport.endpoint()
        );

        let response = self.transport.post_json(&request).inspect_err(|e| {
            log::error!("Webhook request failed: {e:?}");
        })?;

        if !response.is_success() {
            log::error!("Webhook returned HTTP {}", response.status);
            return Err(Report::new(AdKitError::Status {
                status: response.status,
            })
            .attach(format!("body: {}", response.body_preview())));
        }

        let body = response.json()?;

        match normalize(&body, self.options.on_unrecognized) {
            Ok(normalized) => {
                *lock(&self.result) = normalized.result().cloned();
                log::info!("Submission finished: {}", normalized.status());
                Ok(normalized)
            }
            Err(e) => {
                *lock(&self.result) = None;
                Err(e)
            }
        }
    }
}

impl<T> fmt::Debug for AdForm<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdForm")
            .field("options", &self.options)
            .field("fields", &*lock(&self.fields))
            .field("busy", &self.busy.is_set())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tests::MockTransport;
    use crate::transport::WebhookResponse;
    use serde_json::json;
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::mpsc;
    use std::thread;

    fn filled_form(transport: MockTransport, options: FormOptions) -> AdForm<MockTransport> {
        let form = AdForm::new(transport, options);
        form.update_field(FormField::ItemDescription, "Recycled wool sneakers");
        form.update_field(FormField::CampaignGoal, "conversions");
        form.update_field(FormField::CreativeStyle, "ugc");
        form
    }

    fn ok(body: serde_json::Value) -> WebhookResponse {
        WebhookResponse::new(200, body.to_string())
    }

    #[test]
    fn test_update_field_only_stores_value() {
        let form = AdForm::new(MockTransport::new(), FormOptions::default());

        form.update_field(FormField::CampaignGoal, "traffic");

        assert_eq!(form.field(FormField::CampaignGoal), "traffic");
        assert_eq!(form.field(FormField::ItemDescription), "");
        assert_eq!(form.transport().call_count(), 0);
        assert!(!form.is_busy());
    }

    #[test]
    fn test_missing_fields_send_nothing() {
        for missing in FormField::ALL {
            let form = filled_form(MockTransport::new(), FormOptions::default());
            form.update_field(missing, "");

            let err = form.submit().unwrap_err();

            match err.current_context() {
                AdKitError::Validation { message } => {
                    assert!(message.contains(missing.label()), "{message}");
                }
                other => panic!("Expected Validation, got {other:?}"),
            }
            assert_eq!(form.transport().call_count(), 0);
            assert!(!form.is_busy());
        }
    }

    #[test]
    fn test_unknown_goal_is_validation_error() {
        let form = filled_form(MockTransport::new(), FormOptions::default());
        form.update_field(FormField::CampaignGoal, "awareness");

        let err = form.submit().unwrap_err();

        assert!(matches!(
            err.current_context(),
            AdKitError::Validation { .. }
        ));
        assert_eq!(form.transport().call_count(), 0);
    }

    #[test]
    fn test_submit_sends_one_request_and_stores_result() {
        let transport = MockTransport::new()
            .with_response(ok(json!({ "text": "A", "headline": "B", "description": "C" })));
        let form = filled_form(transport, FormOptions::default());

        let normalized = form.submit().unwrap();

        assert_eq!(normalized, Normalized::Generated(AdResult::single("A", "B", "C")));
        assert_eq!(form.result(), Some(AdResult::single("A", "B", "C")));

        let requests = form.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0],
            CampaignRequest::new(
                "Recycled wool sneakers",
                CampaignGoal::Conversions,
                CreativeStyle::Ugc
            )
        );
    }

    #[test]
    fn test_new_result_replaces_previous() {
        let transport = MockTransport::new()
            .with_response(ok(json!({ "text": "A", "headline": "B", "description": "C" })))
            .with_response(ok(json!({
                "primaryText": ["X", "Y"],
                "headline": ["Z"],
                "description": []
            })));
        let form = filled_form(transport, FormOptions::default());

        form.submit().unwrap();
        form.submit().unwrap();

        let result = form.result().unwrap();
        assert_eq!(result.primary_text, vec!["X", "Y"]);
        assert!(result.description.is_empty());
        assert_eq!(form.transport().call_count(), 2);
    }

    #[test]
    fn test_queued_ack_clears_result() {
        let transport = MockTransport::new()
            .with_response(ok(json!({ "text": "A", "headline": "B", "description": "C" })))
            .with_response(ok(json!({ "message": "Workflow was started" })));
        let form = filled_form(transport, FormOptions::default());

        form.submit().unwrap();
        let normalized = form.submit().unwrap();

        assert_eq!(normalized, Normalized::Queued);
        assert_eq!(form.result(), None);
    }

    #[test]
    fn test_unrecognized_shape_uses_placeholder_by_default() {
        let transport = MockTransport::new().with_response(ok(json!({ "foo": "bar" })));
        let form = filled_form(transport, FormOptions::default());

        let normalized = form.submit().unwrap();

        assert!(normalized.is_placeholder());
        assert_eq!(form.result(), Some(AdResult::placeholder()));
    }

    #[test]
    fn test_rejected_shape_clears_result() {
        let transport = MockTransport::new()
            .with_response(ok(json!({ "text": "A", "headline": "B", "description": "C" })))
            .with_response(ok(json!({ "foo": "bar" })));
        let options = FormOptions {
            on_unrecognized: ShapeMismatchPolicy::Reject,
        };
        let form = filled_form(transport, options);

        form.submit().unwrap();
        let err = form.submit().unwrap_err();

        assert!(matches!(
            err.current_context(),
            AdKitError::ShapeMismatch { .. }
        ));
        assert_eq!(form.result(), None);
        assert!(!form.is_busy());
    }

    #[test]
    fn test_http_error_keeps_previous_result() {
        let transport = MockTransport::new()
            .with_response(ok(json!({ "text": "A", "headline": "B", "description": "C" })))
            .with_response(WebhookResponse::new(502, "Bad Gateway"));
        let form = filled_form(transport, FormOptions::default());

        form.submit().unwrap();
        let err = form.submit().unwrap_err();

        assert_eq!(err.current_context(), &AdKitError::Status { status: 502 });
        assert_eq!(form.result(), Some(AdResult::single("A", "B", "C")));
    }

    #[test]
    fn test_non_json_body_keeps_previous_result() {
        let transport = MockTransport::new()
            .with_response(ok(json!({ "text": "A", "headline": "B", "description": "C" })))
            .with_response(WebhookResponse::new(200, "<html>oops</html>"));
        let form = filled_form(transport, FormOptions::default());

        form.submit().unwrap();
        let err = form.submit().unwrap_err();

        assert!(matches!(
            err.current_context(),
            AdKitError::InvalidResponse { .. }
        ));
        assert_eq!(form.result(), Some(AdResult::single("A", "B", "C")));
    }

    #[test]
    fn test_transport_error_keeps_previous_result() {
        let transport = MockTransport::new()
            .with_response(ok(json!({ "text": "A", "headline": "B", "description": "C" })))
            .with_failure("connection refused");
        let form = filled_form(transport, FormOptions::default());

        form.submit().unwrap();
        let err = form.submit().unwrap_err();

        assert!(matches!(
            err.current_context(),
            AdKitError::Transport { .. }
        ));
        assert_eq!(form.result(), Some(AdResult::single("A", "B", "C")));
    }

    #[test]
    fn test_busy_flag_set_only_during_request() {
        let transport = MockTransport::new()
            .with_response(ok(json!({ "text": "A", "headline": "B", "description": "C" })))
            .with_response(WebhookResponse::new(500, ""))
            .with_failure("timed out");
        let form = filled_form(transport, FormOptions::default());
        form.transport().watch_busy(form.busy_flag());

        assert!(!form.is_busy());
        assert!(form.submit().is_ok());
        assert!(!form.is_busy());
        assert!(form.submit().is_err());
        assert!(!form.is_busy());
        assert!(form.submit().is_err());
        assert!(!form.is_busy());

        assert_eq!(form.transport().observed_busy(), vec![true, true, true]);
    }

    #[test]
    fn test_busy_flag_cleared_after_panic() {
        let transport = MockTransport::new().with_panic();
        let form = filled_form(transport, FormOptions::default());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| form.submit()));

        assert!(outcome.is_err());
        assert!(!form.is_busy());
    }

    #[test]
    fn test_concurrent_submit_is_rejected() {
        let (release_tx, release_rx) = mpsc::channel();
        let transport = MockTransport::new()
            .with_response(ok(json!({ "text": "A", "headline": "B", "description": "C" })))
            .with_gate(release_rx);
        let form = filled_form(transport, FormOptions::default());

        thread::scope(|scope| {
            let first = scope.spawn(|| form.submit());

            while !form.is_busy() {
                thread::yield_now();
            }

            let err = form.submit().unwrap_err();
            assert_eq!(err.current_context(), &AdKitError::Busy);

            release_tx.send(()).unwrap();
            assert!(first.join().unwrap().is_ok());
        });

        assert_eq!(form.transport().call_count(), 1);
        assert!(!form.is_busy());
    }

    #[test]
    fn test_form_field_from_str() {
        assert_eq!(
            "item-description".parse::<FormField>(),
            Ok(FormField::ItemDescription)
        );
        assert_eq!("creativeStyle".parse::<FormField>(), Ok(FormField::CreativeStyle));
        assert!("budget".parse::<FormField>().is_err());
    }

    #[test]
    fn test_options_from_settings() {
        let settings = crate::test_support::tests::create_test_settings();

        let options = FormOptions::from(&settings);
        assert_eq!(options.on_unrecognized, ShapeMismatchPolicy::Reject);
    }

    #[test]
    fn test_clear_resets_fields() {
        let form = filled_form(MockTransport::new(), FormOptions::default());

        form.clear();

        assert!(FormField::ALL
            .into_iter()
            .all(|field| form.field(field).is_empty()));
    }
}
