//! Properties-file parsing (`name: value` or `name = value`).
//!
//! Used for `sol info`, whose labels are kept exactly as printed.

use std::path::Path;

use super::{Record, Value};
use crate::error::ParseError;

/// Parse properties text into a record.
///
/// - Blank lines and lines starting with `#` or `;` are skipped.
/// - The key ends at the first `=` or `:`; case and inner spaces are kept.
/// - A line starting with whitespace continues the previous value,
///   joined with a newline.
/// - Matching leading/trailing quotes are stripped from values.
pub fn parse_properties(text: &str) -> Record {
    let mut record = Record::new();
    let mut last_key: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            if let Some(Value::Text(value)) = last_key.as_ref().and_then(|k| record.get_mut(k)) {
                value.push('\n');
                value.push_str(trimmed);
                continue;
            }
        }

        let (key, value) = match trimmed.find(['=', ':']) {
            Some(pos) => (trimmed[..pos].trim(), trimmed[pos + 1..].trim()),
            None => (trimmed, ""),
        };

        record.insert(key.to_string(), Value::from(strip_quotes(value)));
        last_key = Some(key.to_string());
    }

    record
}

/// Read and parse a properties file.
pub fn parse_properties_file(path: impl AsRef<Path>) -> Result<Record, ParseError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_properties(&text))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
