//! Line filters applied to command output before parsing.
//!
//! These are the `grep -E` / `sed -re 's/../../g'` stages a shell pipeline
//! would run, applied locally so every shell sees the same bare command.

use std::fmt;

use regex::Regex;

/// A single line-oriented filter stage.
#[derive(Debug, Clone)]
pub enum TextFilter {
    /// Keep lines matching (or, when inverted, not matching) the pattern.
    Grep { pattern: Regex, invert: bool },

    /// Replace every match on each line.
    Sed { pattern: Regex, replacement: String },
}

impl TextFilter {
    /// Keep only lines matching `pattern`.
    pub fn grep(pattern: &str) -> Result<Self, regex::Error> {
        Ok(TextFilter::Grep {
            pattern: Regex::new(pattern)?,
            invert: false,
        })
    }

    /// Drop lines matching `pattern`.
    pub fn grep_invert(pattern: &str) -> Result<Self, regex::Error> {
        Ok(TextFilter::Grep {
            pattern: Regex::new(pattern)?,
            invert: true,
        })
    }

    /// Replace all matches of `pattern` on each line with `replacement`.
    ///
    /// `$1`-style group references are expanded.
    pub fn sed(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(TextFilter::Sed {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Apply this stage to `text`. Each output line is newline-terminated.
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for line in text.lines() {
            match self {
                TextFilter::Grep { pattern, invert } => {
                    if pattern.is_match(line) != *invert {
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                TextFilter::Sed {
                    pattern,
                    replacement,
                } => {
                    out.push_str(&pattern.replace_all(line, replacement.as_str()));
                    out.push('\n');
                }
            }
        }
        out
    }
}

/// Apply a chain of filters in order.
pub(crate) fn apply_all(filters: &[TextFilter], text: &str) -> String {
    filters
        .iter()
        .fold(text.to_string(), |acc, filter| filter.apply(&acc))
}

impl fmt::Display for TextFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFilter::Grep {
                pattern,
                invert: false,
            } => write!(f, "grep -E '{}'", pattern.as_str()),
            TextFilter::Grep {
                pattern,
                invert: true,
            } => write!(f, "grep -E -v '{}'", pattern.as_str()),
            TextFilter::Sed {
                pattern,
                replacement,
            } => write!(f, "sed -re 's/{}/{}/g'", pattern.as_str(), replacement),
        }
    }
}
