//! `adkit generate`: fill the form, submit it and render the outcome.

use adkit_common::form::{AdForm, FormField, FormOptions};
use adkit_common::settings::Settings;
use adkit_common::transport::{UreqTransport, WebhookTransport};

use crate::error::CliError;
use crate::render::{render, OutputFormat};

/// Raw form inputs as given on the command line. Missing values are
/// submitted as empty so the form reports them itself.
#[derive(Debug, Clone, Default)]
pub struct FormInputs {
    pub item: Option<String>,
    pub goal: Option<String>,
    pub style: Option<String>,
}

impl FormInputs {
    fn fill<T: WebhookTransport>(&self, form: &AdForm<T>) {
        let values = [
            (FormField::ItemDescription, &self.item),
            (FormField::CampaignGoal, &self.goal),
            (FormField::CreativeStyle, &self.style),
        ];
        for (field, value) in values {
            form.update_field(field, value.clone().unwrap_or_default());
        }
    }
}

/// Submit the inputs to the configured webhook and return the rendered
/// outcome.
pub fn generate(
    settings: &Settings,
    inputs: &FormInputs,
    format: OutputFormat,
) -> Result<String, CliError> {
    let transport = UreqTransport::from_settings(&settings.webhook);
    log::info!(
        "Posting to {} (timeout {}s)",
        settings.webhook.url,
        settings.webhook.timeout_secs
    );

    let form = AdForm::new(transport, FormOptions::from(settings));
    submit_form(&form, inputs, format)
}

pub(crate) fn submit_form<T: WebhookTransport>(
    form: &AdForm<T>,
    inputs: &FormInputs,
    format: OutputFormat,
) -> Result<String, CliError> {
    inputs.fill(form);
    let normalized = form.submit()?;
    render(&normalized, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adkit_common::campaign::CampaignRequest;
    use adkit_common::error::AdKitError;
    use adkit_common::normalizer::ShapeMismatchPolicy;
    use adkit_common::transport::WebhookResponse;
    use error_stack::Report;
    use std::sync::Mutex;

    struct StubTransport {
        response: WebhookResponse,
        sent: Mutex<Vec<CampaignRequest>>,
    }

    impl StubTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: WebhookResponse::new(status, body),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl WebhookTransport for StubTransport {
        fn post_json(
            &self,
            request: &CampaignRequest,
        ) -> Result<WebhookResponse, Report<AdKitError>> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }

        fn endpoint(&self) -> &str {
            "stub://webhook"
        }
    }

    fn inputs() -> FormInputs {
        FormInputs {
            item: Some("Solar garden lights".into()),
            goal: Some("traffic".into()),
            style: Some("meme".into()),
        }
    }

    #[test]
    fn test_submit_form_renders_result() {
        let form = AdForm::new(
            StubTransport::new(
                200,
                r#"{"primaryText":["Glow up"],"headline":["Light it"],"description":["Free shipping"],"headlineImages":["https://cdn.test.com/h.png"]}"#,
            ),
            FormOptions::default(),
        );

        let output = submit_form(&form, &inputs(), OutputFormat::Text).unwrap();

        assert!(output.contains(" 1. Glow up\n"));
        assert!(output.contains("    image: https://cdn.test.com/h.png\n"));

        let sent = form.transport().sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].item_description, "Solar garden lights");
    }

    #[test]
    fn test_submit_form_missing_input() {
        let form = AdForm::new(StubTransport::new(200, "{}"), FormOptions::default());
        let inputs = FormInputs {
            style: None,
            ..inputs()
        };

        let err = submit_form(&form, &inputs, OutputFormat::Text).unwrap_err();

        assert!(matches!(err, CliError::Input(ref msg) if msg.contains("creative style")));
        assert!(form.transport().sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_submit_form_rejected_shape() {
        let form = AdForm::new(
            StubTransport::new(200, r#"{"foo":"bar"}"#),
            FormOptions {
                on_unrecognized: ShapeMismatchPolicy::Reject,
            },
        );

        let err = submit_form(&form, &inputs(), OutputFormat::Json).unwrap_err();

        assert!(matches!(err, CliError::Request(ref msg) if msg.contains("foo")));
    }

    #[test]
    fn test_submit_form_http_error() {
        let form = AdForm::new(StubTransport::new(404, "not found"), FormOptions::default());

        let err = submit_form(&form, &inputs(), OutputFormat::Text).unwrap_err();

        assert_eq!(err.to_string(), "Generation failed: Webhook returned HTTP 404");
    }
}
