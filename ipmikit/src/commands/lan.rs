//! `lan print`.

use super::{Ipmi, IpmiCommand, grep, grep_invert, sed};
use crate::error::Result;
use crate::executor::IpmiMode;
use crate::parse::{KeyValueOptions, Record, Value, apply_all, key_value_outbuf_to_record};

/// Label whose continuation lines hold one `type : algorithm` pair each.
const AUTH_TYPE_ENABLE: &str = "Auth Type Enable";

/// Lines belonging to the `Auth Type Enable` block.
const AUTH_LINE: &str = r"^(Auth Type Enable)?[ ]+: ";

/// Continuation lines with no label of their own.
const UNLABELED_LINE: &str = r"^[ ]+: ";

impl Ipmi {
    /// `lan print [channel]` as a record keyed by the labels as printed.
    ///
    /// ipmitool spreads `Auth Type Enable` over several lines, one per
    /// privilege level. Those lines become a nested record under
    /// `Auth Type Enable`:
    ///
    /// ```text
    /// Auth Type Enable        : Callback : MD5
    ///                         : User     : MD5
    /// ```
    ///
    /// gives `{"Auth Type Enable": {"Callback": "MD5", "User": "MD5"}}`.
    pub async fn lan_print(&self, channel: Option<u8>, mode: IpmiMode) -> Result<Record> {
        let command = IpmiCommand::new("lan print").opt_arg(channel);
        let stdout = self.run_as(&command, mode, &self.quiet_options()).await?;

        let auth_lines = apply_all(&[grep(AUTH_LINE)?, sed(AUTH_LINE, "")?], &stdout);
        let labeled_lines = apply_all(&[grep_invert(UNLABELED_LINE)?], &stdout);

        let options = KeyValueOptions::verbatim();
        let auth_type_enable = key_value_outbuf_to_record(&auth_lines, &options);
        let mut record = key_value_outbuf_to_record(&labeled_lines, &options);
        record.insert(AUTH_TYPE_ENABLE.to_string(), Value::Map(auth_type_enable));

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::ipmi;
    use crate::executor::testing::ScriptedShell;
    use crate::parse::text_record;

    const LAN_PRINT: &str = "\
Set in Progress         : Set Complete
Auth Type Support       : MD5
Auth Type Enable        : Callback : MD5
                        : User     : MD5
                        : Operator : MD5
                        : Admin    : MD5
                        : OEM      : MD5
IP Address Source       : Static Address
IP Address              : 10.0.0.5
Subnet Mask             : 255.255.255.0
MAC Address             : 70:e2:84:14:16:1b
Default Gateway IP      : 10.0.0.1
802.1q VLAN ID          : Disabled
Cipher Suite Priv Max   : Not Available
Bad Password Threshold  : Not Available
";

    #[tokio::test]
    async fn test_lan_print() {
        let shell = ScriptedShell::new().respond("lan print 1", LAN_PRINT);
        let log = shell.log();
        let record = ipmi(shell)
            .lan_print(Some(1), IpmiMode::External)
            .await
            .unwrap();

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "Set in Progress",
                "Auth Type Support",
                "Auth Type Enable",
                "IP Address Source",
                "IP Address",
                "Subnet Mask",
                "MAC Address",
                "Default Gateway IP",
                "802.1q VLAN ID",
                "Cipher Suite Priv Max",
                "Bad Password Threshold",
            ]
        );

        assert_eq!(
            record[AUTH_TYPE_ENABLE],
            Value::Map(text_record([
                ("Callback", "MD5"),
                ("User", "MD5"),
                ("Operator", "MD5"),
                ("Admin", "MD5"),
                ("OEM", "MD5"),
            ]))
        );
        assert_eq!(record["MAC Address"].as_text(), Some("70:e2:84:14:16:1b"));
        assert!(!record.contains_key("User"));

        // one command serves both passes
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lan_print_default_channel() {
        let shell = ScriptedShell::new().respond("-H 10.0.0.5 lan print", "IP Address : 10.0.0.5\n");
        let record = ipmi(shell)
            .lan_print(None, IpmiMode::External)
            .await
            .unwrap();

        assert_eq!(record["IP Address"].as_text(), Some("10.0.0.5"));
        assert_eq!(record[AUTH_TYPE_ENABLE], Value::Map(Record::new()));
    }
}
