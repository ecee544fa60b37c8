//! Diff record rendering - human-readable lines and JSON

use crate::types::{DiffKind, DiffRecord};
use console::style;
use serde_json::json;

/// Render a record for the selected output mode.
pub fn render(record: &DiffRecord, json: bool) -> String {
    if json {
        render_json(record)
    } else {
        render_plain(record)
    }
}

fn render_plain(record: &DiffRecord) -> String {
    match record {
        DiffRecord::Difference {
            first_url,
            second_url,
            kind,
        } => {
            let pair = style(format!("'{}' and '{}'", first_url, second_url)).cyan();
            let suffix = match kind {
                DiffKind::OnlyInFirst => style("- only in first.").yellow(),
                DiffKind::TypeMismatch => style("- differ in type.").magenta(),
                DiffKind::SizeMismatch => style("- differ in size.").magenta(),
            };
            format!("{} {}", pair, suffix)
        }
        DiffRecord::Failure { urls, error } => {
            format!(
                "{} {} ({})",
                style("error:").red().bold(),
                error,
                urls.join(", ")
            )
        }
    }
}

fn render_json(record: &DiffRecord) -> String {
    let value = match record {
        DiffRecord::Difference {
            first_url,
            second_url,
            kind,
        } => json!({
            "first": first_url,
            "second": second_url,
            "diff": kind.to_string(),
        }),
        DiffRecord::Failure { urls, error } => json!({
            "urls": urls,
            "error": error.to_string(),
        }),
    };
    value.to_string()
}
