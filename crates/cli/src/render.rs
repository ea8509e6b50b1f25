//! Rendering of normalized results for the terminal.

use adkit_common::ad_result::ColumnView;
use adkit_common::normalizer::Normalized;
use clap::ValueEnum;

use crate::error::CliError;

#[derive(Clone, Copy, ValueEnum, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render an outcome in the requested format.
pub fn render(normalized: &Normalized, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(render_text(normalized)),
        OutputFormat::Json => render_json(normalized),
    }
}

/// Notice line followed by the three columns. A queued outcome has no
/// columns.
pub fn render_text(normalized: &Normalized) -> String {
    let notice = normalized.notice();
    let mut out = format!("[{}] {}\n", notice.level, notice.message);

    if let Some(result) = normalized.result() {
        for view in result.columns() {
            out.push('\n');
            render_column(&mut out, &view);
        }
    }

    out
}

fn render_column(out: &mut String, view: &ColumnView<'_>) {
    let title = view.column.to_string();
    out.push_str(&format!("{title}\n{}\n", "-".repeat(title.len())));

    if view.is_empty() {
        out.push_str(&format!("No {} generated yet.\n", title.to_lowercase()));
        return;
    }

    for (index, (text, image)) in view.entries().enumerate() {
        out.push_str(&format!("{:>2}. {}\n", index + 1, text));
        if let Some(url) = image {
            out.push_str(&format!("    image: {url}\n"));
        }
    }
}

pub fn render_json(normalized: &Normalized) -> Result<String, CliError> {
    let output = serde_json::json!({
        "status": normalized.status(),
        "notice": normalized.notice(),
        "result": normalized.result(),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}
