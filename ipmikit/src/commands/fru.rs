//! Field-replaceable unit inventory.

use regex::Regex;

use super::{Ipmi, IpmiCommand};
use crate::error::{ParseError, Result};
use crate::parse::{KeyValueOptions, Record, key_value_outbuf_to_record};

const NOT_PRESENT: &str = "Device not present";

impl Ipmi {
    /// `fru print -N 50`, one record per FRU device.
    ///
    /// A device ipmitool cannot read gets a `state` entry holding the
    /// `Device not present ...` message.
    pub async fn fru_info(&self) -> Result<Vec<Record>> {
        let stdout = self.run(&IpmiCommand::new("fru print -N 50")).await?;
        Ok(parse_fru(&stdout))
    }

    /// FRU records for one component type, e.g. `cpu` or `dimm`.
    ///
    /// Pass records from an earlier [`fru_info`](Self::fru_info) call to
    /// avoid querying the BMC again.
    pub async fn component_fru_info(
        &self,
        component: &str,
        fru_records: Option<Vec<Record>>,
    ) -> Result<Vec<Record>> {
        let records = match fru_records {
            Some(records) => records,
            None => self.fru_info().await?,
        };
        filter_component(records, component)
    }
}

fn parse_fru(out_buf: &str) -> Vec<Record> {
    let out_buf = out_buf.replace(NOT_PRESENT, &format!("state : {}", NOT_PRESENT));
    let options = KeyValueOptions::default();

    out_buf
        .split("\n\n")
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| key_value_outbuf_to_record(chunk, &options))
        .collect()
}

/// Keep the records whose `fru_device_description` starts with
/// `component`, an optional unit number and a space (`cpu0 (ID 1)`).
///
/// `component` is a regular expression. Records without a description are
/// dropped.
pub fn filter_component(records: Vec<Record>, component: &str) -> Result<Vec<Record>> {
    let pattern = Regex::new(&format!("^{}([0-9]+)? ", component)).map_err(ParseError::from)?;

    Ok(records
        .into_iter()
        .filter(|record| {
            record
                .get("fru_device_description")
                .and_then(|value| value.as_text())
                .is_some_and(|description| pattern.is_match(description))
        })
        .collect())
}
