//! Controller, sensor repository and chassis queries.

use serde::{Deserialize, Serialize};

use super::{Ipmi, IpmiCommand};
use crate::error::{ParseError, Result};
use crate::parse::{KeyValueOptions, Record, Value, key_value_outbuf_to_record};

/// Location of the device-id document on an OpenBMC BMC.
pub const DEV_ID_PATH: &str = "/usr/share/ipmi-providers/dev_id.json";

/// The BMC's `Get Device ID` configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdConfig {
    pub id: u8,
    pub revision: u8,
    pub manuf_id: u32,
    pub prod_id: u16,
    pub addn_dev_support: u8,
    pub aux: u32,

    /// Binary-encoded device revision, bits `[3:0]` of `revision`.
    #[serde(default, skip_deserializing)]
    pub device_revision: u8,
}

impl DeviceIdConfig {
    /// Decode the JSON document and derive `device_revision`.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: DeviceIdConfig = serde_json::from_str(text).map_err(ParseError::from)?;
        config.device_revision = config.revision & 0x0F;
        Ok(config)
    }
}

impl Ipmi {
    /// `mc info`, with indented lists nested under their label.
    pub async fn mc_info(&self) -> Result<Record> {
        self.indented_record(IpmiCommand::new("mc info")).await
    }

    /// `sdr info`.
    pub async fn sdr_info(&self) -> Result<Record> {
        self.indented_record(IpmiCommand::new("sdr info")).await
    }

    /// `chassis status`.
    pub async fn chassis_status(&self) -> Result<Record> {
        self.indented_record(IpmiCommand::new("chassis status")).await
    }

    /// `dcmi power reading`.
    ///
    /// With `strip_watts`, a trailing ` Watts` is removed from every value,
    /// so `"234 Watts"` reads `"234"`.
    pub async fn power_reading(&self, strip_watts: bool) -> Result<Record> {
        let stdout = self.run(&IpmiCommand::new("dcmi power reading")).await?;
        let mut record = key_value_outbuf_to_record(&stdout, &KeyValueOptions::default());

        if strip_watts {
            for value in record.values_mut() {
                if let Value::Text(text) = value {
                    if let Some(stripped) = text.strip_suffix(" Watts") {
                        *text = stripped.to_string();
                    }
                }
            }
        }

        Ok(record)
    }

    /// Read and decode [`DEV_ID_PATH`] on the BMC.
    pub async fn device_id_config(&self) -> Result<DeviceIdConfig> {
        let output = self
            .executor
            .bmc_execute(&format!("cat {}", DEV_ID_PATH), &self.options)
            .await?;
        DeviceIdConfig::from_json(&output.stdout)
    }

    pub(crate) async fn indented_record(&self, command: IpmiCommand) -> Result<Record> {
        let stdout = self.run(&command).await?;
        Ok(key_value_outbuf_to_record(&stdout, &KeyValueOptions::indented()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::commands::fixtures::ipmi;
    use crate::executor::testing::ScriptedShell;
    use crate::executor::{CommandExecutor, ExecOptions};
    use crate::parse::text_record;

    const MC_INFO: &str = "\
Device ID                 : 0
Device Revision           : 0
Firmware Revision         : 2.01
IPMI Version              : 2.0
Manufacturer ID           : 42817
Manufacturer Name         : Unknown (0xA741)
Product ID                : 16975 (0x424f)
Product Name              : Unknown (0x424F)
Device Available          : yes
Provides Device SDRs      : yes
Additional Device Support :
    Sensor Device
    SEL Device
    FRU Inventory Device
    Chassis Device
Aux Firmware Rev Info     :
    0x00
    0x00
    0x00
    0x00
";

    const POWER_READING: &str = "
    Instantaneous power reading:                   234 Watts
    Minimum during sampling period:                 12 Watts
    Maximum during sampling period:                318 Watts
    Average power reading over sample period:      236 Watts
    IPMI timestamp:                           Thu Jan  1 00:00:00 1970
    Sampling period:                          00000000 Seconds.
    Power reading state is:                   deactivated

";

    const CHASSIS_STATUS: &str = "\
System Power              : off
Power Overload            : false
Power Interlock           : inactive
Main Power Fault          : false
Power Control Fault       : false
Power Restore Policy      : previous
Last Power Event          :
Chassis Intrusion         : inactive
Front-Panel Lockout       : inactive
Drive Fault               : false
Cooling/Fan Fault         : false
Sleep Button Disable      : not allowed
Diag Button Disable       : not allowed
Reset Button Disable      : not allowed
Power Button Disable      : allowed
Sleep Button Disabled     : false
Diag Button Disabled      : false
Reset Button Disabled     : false
Power Button Disabled     : false
";

    fn strings(items: &[&str]) -> Value {
        Value::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_mc_info() {
        let record = ipmi(ScriptedShell::new().respond("mc info", MC_INFO))
            .mc_info()
            .await
            .unwrap();

        assert_eq!(record.len(), 12);
        assert_eq!(record["firmware_revision"].as_text(), Some("2.01"));
        assert_eq!(record["product_id"].as_text(), Some("16975 (0x424f)"));
        assert_eq!(
            record["additional_device_support"],
            strings(&["Sensor Device", "SEL Device", "FRU Inventory Device", "Chassis Device"])
        );
        assert_eq!(record["aux_firmware_rev_info"], strings(&["0x00"; 4]));
        assert_eq!(record.get_index(10).map(|(k, _)| k.as_str()), Some("additional_device_support"));
    }

    #[tokio::test]
    async fn test_sdr_info_empty_values() {
        let out = "\
SDR Version                         : 0x51
Record Count                        : 216
Most recent Addition                :
Most recent Erase                   :
SDR overflow                        : no
";
        let record = ipmi(ScriptedShell::new().respond("sdr info", out))
            .sdr_info()
            .await
            .unwrap();

        assert_eq!(
            record,
            text_record([
                ("sdr_version", "0x51"),
                ("record_count", "216"),
                ("most_recent_addition", ""),
                ("most_recent_erase", ""),
                ("sdr_overflow", "no"),
            ])
        );
    }

    #[tokio::test]
    async fn test_chassis_status() {
        let record = ipmi(ScriptedShell::new().respond("chassis status", CHASSIS_STATUS))
            .chassis_status()
            .await
            .unwrap();

        assert_eq!(record.len(), 19);
        assert_eq!(record["system_power"].as_text(), Some("off"));
        assert_eq!(record["last_power_event"].as_text(), Some(""));
        assert_eq!(record["front-panel_lockout"].as_text(), Some("inactive"));
        assert_eq!(record["cooling/fan_fault"].as_text(), Some("false"));
    }

    #[tokio::test]
    async fn test_power_reading() {
        let shell = ScriptedShell::new().respond("dcmi power reading", POWER_READING);
        let ipmi = ipmi(shell);

        let record = ipmi.power_reading(true).await.unwrap();
        assert_eq!(record["instantaneous_power_reading"].as_text(), Some("234"));
        assert_eq!(record["minimum_during_sampling_period"].as_text(), Some("12"));
        assert_eq!(record["ipmi_timestamp"].as_text(), Some("Thu Jan  1 00:00:00 1970"));
        assert_eq!(record["sampling_period"].as_text(), Some("00000000 Seconds."));
        assert_eq!(record["power_reading_state_is"].as_text(), Some("deactivated"));

        let record = ipmi.power_reading(false).await.unwrap();
        assert_eq!(record["average_power_reading_over_sample_period"].as_text(), Some("236 Watts"));
    }

    #[test]
    fn test_device_id_from_json() {
        let config = DeviceIdConfig::from_json(
            r#"{"id": 32, "revision": 129, "addn_dev_support": 141,
                "manuf_id": 7244, "prod_id": 16976, "aux": 0}"#,
        )
        .unwrap();

        assert_eq!(config.id, 32);
        assert_eq!(config.manuf_id, 7244);
        assert_eq!(config.device_revision, 1);
    }

    #[test]
    fn test_device_id_ignores_supplied_revision_field() {
        let config = DeviceIdConfig::from_json(
            r#"{"id": 0, "revision": 3, "addn_dev_support": 0,
                "manuf_id": 0, "prod_id": 0, "aux": 0, "device_revision": 9}"#,
        )
        .unwrap();
        assert_eq!(config.device_revision, 3);
    }

    #[test]
    fn test_device_id_bad_json() {
        let err = DeviceIdConfig::from_json("cat: can't open").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Json(_))));
    }

    #[tokio::test]
    async fn test_device_id_config_reads_bmc_file() {
        let bmc = ScriptedShell::new().respond(
            "cat /usr/share/ipmi-providers/dev_id.json",
            r#"{"id": 32, "revision": 129, "addn_dev_support": 141, "manuf_id": 7244, "prod_id": 16976, "aux": 0}"#,
        );
        let log = bmc.log();
        let ipmi = crate::Ipmi::new(CommandExecutor::builder().bmc_shell(bmc).build())
            .with_options(ExecOptions::default().print_output(false));

        let config = ipmi.device_id_config().await.unwrap();
        assert_eq!(config.prod_id, 16976);
        assert_eq!(config.device_revision, 1);
        assert_eq!(log.lock().unwrap().as_slice(), [format!("cat {}", DEV_ID_PATH)]);
    }
}
