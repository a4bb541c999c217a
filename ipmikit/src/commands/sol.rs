//! Serial-over-LAN settings.

use std::io::Write;

use tempfile::NamedTempFile;

use super::{Ipmi, IpmiCommand};
use crate::error::{ParseError, Result};
use crate::parse::{Record, parse_properties_file};

impl Ipmi {
    /// `sol info`, parsed as a properties file.
    ///
    /// Labels are kept as printed. An indented line continues the value
    /// above it, so a wrapped `Info` message stays one value.
    pub async fn sol_info(&self) -> Result<Record> {
        let stdout = self.run(&IpmiCommand::new("sol info")).await?;

        let mut file = NamedTempFile::new().map_err(ParseError::from)?;
        file.write_all(stdout.as_bytes()).map_err(ParseError::from)?;
        file.flush().map_err(ParseError::from)?;

        Ok(parse_properties_file(file.path())?)
    }

    /// `sol set <name> <value>`, returning the exit status.
    pub async fn set_sol_setting(&self, name: &str, value: &str) -> Result<i32> {
        let command = IpmiCommand::new("sol set").arg(name).arg(value);
        let output = self
            .executor
            .execute(&command.command_line(), self.mode, &self.options)
            .await?;
        Ok(output.status)
    }
}
