//! `Label : value` parsing with optional indentation nesting.

use super::{Record, Value};

/// Options controlling how labels are turned into keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyValueOptions {
    /// Delimiter between label and value.
    pub delim: char,

    /// Lower-case the key.
    pub to_lower: bool,

    /// Replace each space in the key with an underscore.
    pub underscores: bool,

    /// Nest indented lines under the preceding label when it has no value.
    pub process_indent: bool,
}

impl Default for KeyValueOptions {
    fn default() -> Self {
        Self {
            delim: ':',
            to_lower: true,
            underscores: true,
            process_indent: false,
        }
    }
}

impl KeyValueOptions {
    /// Default options with indentation processing turned on.
    pub fn indented() -> Self {
        Self {
            process_indent: true,
            ..Self::default()
        }
    }

    /// Keep labels exactly as printed (case and spaces preserved).
    pub fn verbatim() -> Self {
        Self {
            to_lower: false,
            underscores: false,
            ..Self::default()
        }
    }
}

/// Split one line into a normalized key and its value.
///
/// Only spaces are stripped from either side. A line with no delimiter
/// yields an empty value.
///
/// ```
/// use ipmikit::parse::{KeyValueOptions, parse_key_value};
///
/// let (key, value) = parse_key_value("IPMI timestamp : Thu Jan  1 00:00:00 1970", &KeyValueOptions::default());
/// assert_eq!(key, "ipmi_timestamp");
/// assert_eq!(value, "Thu Jan  1 00:00:00 1970");
/// ```
pub fn parse_key_value(line: &str, options: &KeyValueOptions) -> (String, String) {
    let (key, value) = match line.split_once(options.delim) {
        Some((key, value)) => (key, value),
        None => (line, ""),
    };

    let mut key = key.trim_matches(' ').to_string();
    if options.to_lower {
        key = key.to_lowercase();
    }
    if options.underscores {
        key = key.replace(' ', "_");
    }

    (key, value.trim_matches(' ').to_string())
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Convert a list of `key : value` lines into a record.
///
/// With `process_indent`, a label whose value is empty adopts the
/// more-indented lines that follow it: if any of them contains the
/// delimiter they become a nested record (parsed flat), otherwise an
/// ordered list of the stripped lines.
pub fn key_value_list_to_record<S: AsRef<str>>(lines: &[S], options: &KeyValueOptions) -> Record {
    let mut record = Record::new();

    if !options.process_indent {
        for line in lines {
            let (key, value) = parse_key_value(line.as_ref(), options);
            record.insert(key, Value::Text(value));
        }
        return record;
    }

    let nested = KeyValueOptions {
        process_indent: false,
        ..*options
    };

    // (key, value is empty, indent) of the last labeled line
    let mut parent: Option<(String, bool, usize)> = None;
    let mut sub_lines: Vec<&str> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        let indent = indent_of(line);

        if let Some((_, true, parent_indent)) = &parent {
            if indent > *parent_indent {
                sub_lines.push(line);
                continue;
            }
        }

        if let Some((parent_key, _, _)) = &parent {
            flush_sub_lines(&mut record, parent_key, &mut sub_lines, &nested);
        }

        let (key, value) = parse_key_value(line, options);
        parent = Some((key.clone(), value.is_empty(), indent));
        record.insert(key, Value::Text(value));
    }

    if let Some((parent_key, _, _)) = &parent {
        flush_sub_lines(&mut record, parent_key, &mut sub_lines, &nested);
    }

    record
}

fn flush_sub_lines(
    record: &mut Record,
    parent_key: &str,
    sub_lines: &mut Vec<&str>,
    options: &KeyValueOptions,
) {
    if sub_lines.is_empty() {
        return;
    }

    let value = if sub_lines.iter().any(|line| line.contains(options.delim)) {
        Value::Map(key_value_list_to_record(sub_lines.as_slice(), options))
    } else {
        Value::List(sub_lines.iter().map(|line| line.trim().to_string()).collect())
    };

    record.insert(parent_key.to_string(), value);
    sub_lines.clear();
}

/// Convert a command output buffer into a record, ignoring empty lines.
pub fn key_value_outbuf_to_record(out_buf: &str, options: &KeyValueOptions) -> Record {
    let lines: Vec<&str> = out_buf.lines().filter(|line| !line.is_empty()).collect();
    key_value_list_to_record(&lines, options)
}

/// Convert an output buffer holding several blank-line separated sections
/// into one record per section.
pub fn key_value_outbuf_to_records(out_buf: &str, options: &KeyValueOptions) -> Vec<Record> {
    split_sections(out_buf)
        .into_iter()
        .map(|section| key_value_outbuf_to_record(section, options))
        .collect()
}

/// Split on runs of two or more newlines.
fn split_sections(out_buf: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let bytes = out_buf.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\n' && bytes.get(i + 1) == Some(&b'\n') {
            sections.push(&out_buf[start..i]);
            while i < bytes.len() && bytes[i] == b'\n' {
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }
    sections.push(&out_buf[start..]);

    sections
}
