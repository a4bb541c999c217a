//! Parsing of ipmitool text output into ordered records.
//!
//! ipmitool prints most of its results as `Label : value` lines, sometimes
//! with indented continuation lines that belong to the label above them,
//! and occasionally as a whitespace-aligned table. This module turns both
//! shapes into [`Record`]s whose key order follows the source text.

mod filter;
mod key_value;
mod properties;
mod report;

pub use filter::TextFilter;
pub(crate) use filter::apply_all;
pub use key_value::{
    KeyValueOptions, key_value_list_to_record, key_value_outbuf_to_record,
    key_value_outbuf_to_records, parse_key_value,
};
pub use properties::{parse_properties, parse_properties_file};
pub use report::{list_to_report, outbuf_to_report};

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// An ordered mapping from output labels to values.
pub type Record = IndexMap<String, Value>;

/// A single parsed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Plain text following the label.
    Text(String),

    /// Unlabeled indented lines collected under the preceding label.
    List(Vec<String>),

    /// Labeled indented lines collected under the preceding label.
    Map(Record),
}

impl Value {
    /// Get the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the list, if this is a list value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Get the nested record, if this is a map value.
    pub fn as_map(&self) -> Option<&Record> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Vec<String>> for Value {
    fn from(list: Vec<String>) -> Self {
        Value::List(list)
    }
}

impl From<Record> for Value {
    fn from(map: Record) -> Self {
        Value::Map(map)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{}", text),
            Value::List(list) => write!(f, "[{}]", list.join(", ")),
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Build a record of text values, mostly useful in tests.
pub fn text_record<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Record
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), Value::Text(value.into())))
        .collect()
}
