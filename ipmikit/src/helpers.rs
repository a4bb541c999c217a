//! Small text helpers used alongside the command wrappers.

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{ParseError, Result};

/// Strip every leading `'0'` character.
///
/// This is a character strip, not date reformatting: `"00/12/2021"`
/// becomes `"/12/2021"`.
pub fn fetch_date(date: &str) -> &str {
    date.trim_start_matches('0')
}

/// Date and time of a `sel list` entry, i.e. its second and third
/// `" | "`-separated fields joined by a space.
///
/// ```
/// use ipmikit::helpers::fetch_added_sel_date;
///
/// let entry = "a | 02/14/2020 | 01:16:58 | Sensor_type #0x17 |  | Asserted";
/// assert_eq!(fetch_added_sel_date(entry).unwrap(), "02/14/2020 01:16:58");
/// ```
pub fn fetch_added_sel_date(entry: &str) -> Result<String> {
    let fields: Vec<&str> = entry.split(" | ").collect();
    match fields.as_slice() {
        [_, date, time, ..] => Ok(format!("{} {}", date, time)),
        _ => Err(ParseError::MissingField {
            input: entry.to_string(),
            index: 2,
        }
        .into()),
    }
}

/// Prefix each hex byte string with `0x`.
pub fn prefix_bytes<S: AsRef<str>>(bytes: &[S]) -> Vec<String> {
    bytes
        .iter()
        .map(|byte| format!("0x{}", byte.as_ref()))
        .collect()
}

/// A sensor threshold that may be unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Value(i64),
    NotAvailable,
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Threshold::Value(value) => serializer.serialize_i64(*value),
            Threshold::NotAvailable => serializer.serialize_str("na"),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Value(value) => write!(f, "{}", value),
            Threshold::NotAvailable => write!(f, "na"),
        }
    }
}

/// Step between successive new thresholds.
const THRESHOLD_STEP: i64 = 100;

/// Raise each threshold reading so every new value differs from the old.
///
/// The reading at position `i` becomes `trunc(reading) + 100 * (i + 1)`.
/// `na` readings stay `na` but still use up their step, so
/// `["1", "na", "3"]` becomes `[101, na, 303]`.
///
/// The second result maps each level name to its new value, pairing them
/// by position and stopping at the shorter of the two lists.
pub fn modify_and_fetch_threshold<S, L>(
    old_thresholds: &[S],
    levels: &[L],
) -> Result<(Vec<Threshold>, IndexMap<String, Threshold>)>
where
    S: AsRef<str>,
    L: AsRef<str>,
{
    let mut step = THRESHOLD_STEP;
    let mut thresholds = Vec::with_capacity(old_thresholds.len());

    for reading in old_thresholds {
        let reading = reading.as_ref().trim();
        if reading == "na" {
            thresholds.push(Threshold::NotAvailable);
        } else {
            let value: f64 = reading
                .parse()
                .ok()
                .filter(|value: &f64| value.is_finite())
                .ok_or_else(|| ParseError::InvalidNumber(reading.to_string()))?;
            thresholds.push(Threshold::Value(value.trunc() as i64 + step));
        }
        step += THRESHOLD_STEP;
    }

    let by_level = levels
        .iter()
        .map(|level| level.as_ref().to_string())
        .zip(thresholds.iter().copied())
        .collect();

    Ok((thresholds, by_level))
}

/// Build the numeric aux firmware version from a BMC version id.
///
/// The commit count (`-438-`) is followed by the release number (`-r3`)
/// zero-padded to four digits, or `0000` without one.
///
/// ```
/// use ipmikit::helpers::aux_version;
///
/// assert_eq!(aux_version("xxx-v2.1-438-g0030304-r3-gfea8585").unwrap(), "4380003");
/// assert_eq!(aux_version("xxx-v2.1-438-g0030304").unwrap(), "4380000");
/// ```
pub fn aux_version(version_id: &str) -> Result<String> {
    let commit_re = Regex::new(r"-(\d{1,4})-").map_err(ParseError::from)?;
    let release_re = Regex::new(r"-r(\d{1,4})").map_err(ParseError::from)?;

    let commit = commit_re
        .captures(version_id)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| ParseError::MissingCommitCount(version_id.to_string()))?;

    let release = release_re
        .captures(version_id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or("0");

    Ok(format!("{}{:0>4}", commit.as_str(), release))
}
