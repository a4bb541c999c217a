//! Channel, user and cipher queries.

use serde::Serialize;

use super::{Ipmi, IpmiCommand, sed};
use crate::error::{ParseError, Result};
use crate::executor::IpmiMode;
use crate::parse::{
    KeyValueOptions, Record, key_value_list_to_record, key_value_outbuf_to_record,
    key_value_outbuf_to_records, outbuf_to_report,
};

/// Result of `channel getaccess`: one user, or every user when no id is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UserInfo {
    Single(Record),
    All(Vec<Record>),
}

/// Where the two settings sections of `channel info` start.
///
/// ipmitool prints the section titles without a trailing colon, so they
/// would not parse as labels. The matching lines are replaced by
/// `<label>:` at column zero, making the settings below them nest.
///
/// By default the titles are expected at fixed positions (the 7th and
/// 12th non-empty lines). [`by_label`](Self::by_label) finds them by
/// their text instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfoLayout {
    volatile_label: String,
    non_volatile_label: String,
    positions: Option<(usize, usize)>,
}

impl Default for ChannelInfoLayout {
    fn default() -> Self {
        Self {
            volatile_label: "Volatile(active) Settings".to_string(),
            non_volatile_label: "Non-Volatile Settings".to_string(),
            positions: Some((6, 11)),
        }
    }
}

impl ChannelInfoLayout {
    /// Locate the section titles by their text.
    pub fn by_label() -> Self {
        Self {
            positions: None,
            ..Self::default()
        }
    }

    /// Use different section titles.
    pub fn with_labels(
        mut self,
        volatile_label: impl Into<String>,
        non_volatile_label: impl Into<String>,
    ) -> Self {
        self.volatile_label = volatile_label.into();
        self.non_volatile_label = non_volatile_label.into();
        self
    }

    /// Expect the section titles at these non-empty line indices.
    pub fn with_positions(mut self, volatile: usize, non_volatile: usize) -> Self {
        self.positions = Some((volatile, non_volatile));
        self
    }

    /// Rewrite the section title lines of `lines` in place.
    pub fn apply(&self, lines: &mut [String]) -> std::result::Result<(), ParseError> {
        let sections = [
            (&self.volatile_label, self.positions.map(|(v, _)| v)),
            (&self.non_volatile_label, self.positions.map(|(_, n)| n)),
        ];

        for (label, position) in sections {
            let index = match position {
                Some(index) if index < lines.len() => index,
                Some(index) => {
                    return Err(ParseError::ShapeMismatch {
                        message: format!(
                            "channel info has {} lines, expected '{}' at line {}",
                            lines.len(),
                            label,
                            index
                        ),
                    });
                }
                None => lines
                    .iter()
                    .position(|line| line.trim_start().starts_with(label.as_str()))
                    .ok_or_else(|| ParseError::ShapeMismatch {
                        message: format!("channel info has no '{}' line", label),
                    })?,
            };
            lines[index] = format!("{}:", label);
        }

        Ok(())
    }
}

impl Ipmi {
    /// `channel getaccess <channel> [user_id]`.
    ///
    /// Without a user id ipmitool prints every user as a blank-line
    /// separated block, returned as [`UserInfo::All`].
    pub async fn user_info(&self, user_id: Option<u8>, channel: u8) -> Result<UserInfo> {
        let command = IpmiCommand::new("channel getaccess")
            .arg(channel)
            .opt_arg(user_id);
        let stdout = self.run(&command).await?;

        let options = KeyValueOptions::indented();
        Ok(match user_id {
            Some(_) => UserInfo::Single(key_value_outbuf_to_record(&stdout, &options)),
            None => UserInfo::All(key_value_outbuf_to_records(&stdout, &options)),
        })
    }

    /// `channel getciphers ipmi`, one record per cipher suite.
    ///
    /// Column titles such as `Auth Alg` are joined to `auth_alg` so the
    /// table splits on whitespace.
    pub async fn channel_ciphers(&self) -> Result<Vec<Record>> {
        let command = IpmiCommand::new("channel getciphers ipmi").filter(sed(" Alg", "_Alg")?);
        let stdout = self
            .run_as(&command, IpmiMode::External, &self.quiet_options())
            .await?;
        Ok(outbuf_to_report(&stdout))
    }

    /// `user list <channel>`, one record per user slot.
    pub async fn user_access(&self, channel: u8) -> Result<Vec<Record>> {
        let command = IpmiCommand::new("user list").arg(channel);
        let stdout = self
            .run_as(&command, IpmiMode::External, &self.quiet_options())
            .await?;
        Ok(outbuf_to_report(&stdout))
    }

    /// `channel info <channel>` with the settings sections nested, using the
    /// default [`ChannelInfoLayout`].
    pub async fn channel_info(&self, channel: u8) -> Result<Record> {
        self.channel_info_with_layout(channel, &ChannelInfoLayout::default())
            .await
    }

    /// `channel info <channel>` with an explicit section layout.
    pub async fn channel_info_with_layout(
        &self,
        channel: u8,
        layout: &ChannelInfoLayout,
    ) -> Result<Record> {
        let stdout = self
            .run(&IpmiCommand::new("channel info").arg(channel))
            .await?;

        let mut lines: Vec<String> = stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        layout.apply(&mut lines)?;

        Ok(key_value_list_to_record(&lines, &KeyValueOptions::indented()))
    }

    /// `channel authcap <channel> <privilege>`.
    pub async fn channel_auth_capabilities(&self, channel: u8, privilege: u8) -> Result<Record> {
        self.indented_record(IpmiCommand::new("channel authcap").arg(channel).arg(privilege))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::commands::fixtures::ipmi;
    use crate::commands::{DEFAULT_CHANNEL, DEFAULT_PRIVILEGE};
    use crate::executor::testing::ScriptedShell;
    use crate::parse::{Value, text_record};

    const CHANNEL_INFO: &str = "\
Channel 0x2 info:
  Channel Medium Type   : 802.3 LAN
  Channel Protocol Type : IPMB-1.0
  Session Support       : multi-session
  Active Session Count  : 0
  Protocol Vendor ID    : 7154
  Volatile(active) Settings
    Alerting            : enabled
    Per-message Auth    : enabled
    User Level Auth     : enabled
    Access Mode         : always available
  Non-Volatile Settings
    Alerting            : enabled
    Per-message Auth    : enabled
    User Level Auth     : enabled
    Access Mode         : always available
";

    const GETACCESS_ALL: &str = "\
Maximum User IDs     : 15
Enabled User IDs     : 2

User ID              : 1
User Name            : root
Fixed Name           : No
Access Available     : call-in / callback
Link Authentication  : enabled
IPMI Messaging       : enabled
Privilege Level      : ADMINISTRATOR
Enable Status        : enabled

User ID              : 2
User Name            : operator
Fixed Name           : No
Access Available     : call-in / callback
Link Authentication  : disabled
IPMI Messaging       : enabled
Privilege Level      : OPERATOR
Enable Status        : enabled
";

    fn settings() -> Value {
        Value::Map(text_record([
            ("alerting", "enabled"),
            ("per-message_auth", "enabled"),
            ("user_level_auth", "enabled"),
            ("access_mode", "always available"),
        ]))
    }

    #[tokio::test]
    async fn test_channel_info() {
        let record = ipmi(ScriptedShell::new().respond("channel info 2", CHANNEL_INFO))
            .channel_info(2)
            .await
            .unwrap();

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["channel_0x2_info", "volatile(active)_settings", "non-volatile_settings"]
        );
        assert_eq!(
            record["channel_0x2_info"],
            Value::Map(text_record([
                ("channel_medium_type", "802.3 LAN"),
                ("channel_protocol_type", "IPMB-1.0"),
                ("session_support", "multi-session"),
                ("active_session_count", "0"),
                ("protocol_vendor_id", "7154"),
            ]))
        );
        assert_eq!(record["volatile(active)_settings"], settings());
        assert_eq!(record["non-volatile_settings"], settings());
    }

    #[tokio::test]
    async fn test_channel_info_short_output_is_shape_mismatch() {
        let out = "Channel 0x2 info:\n  Channel Medium Type   : 802.3 LAN\n";
        let err = ipmi(ScriptedShell::new().respond("channel info 2", out))
            .channel_info(2)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::ShapeMismatch { .. })));
    }

    #[tokio::test]
    async fn test_channel_info_by_label_tolerates_extra_lines() {
        let out = CHANNEL_INFO.replace(
            "  Protocol Vendor ID    : 7154\n",
            "  Protocol Vendor ID    : 7154\n  Session Limit         : 4\n",
        );
        let ipmi = ipmi(ScriptedShell::new().respond("channel info 2", &out));

        // the fixed layout now rewrites the wrong lines
        let fixed = ipmi.channel_info(2).await.unwrap();
        assert!(!fixed.contains_key("session_limit"));

        let record = ipmi
            .channel_info_with_layout(2, &ChannelInfoLayout::by_label())
            .await
            .unwrap();
        assert_eq!(
            record["channel_0x2_info"].as_map().map(|m| m.len()),
            Some(6)
        );
        assert_eq!(record["volatile(active)_settings"], settings());
        assert_eq!(record["non-volatile_settings"], settings());
    }

    #[test]
    fn test_layout_missing_label() {
        let mut lines = vec!["Channel 0x2 info:".to_string(), "  Volatile(active) Settings".to_string()];
        let err = ChannelInfoLayout::by_label().apply(&mut lines).unwrap_err();
        assert!(err.to_string().contains("Non-Volatile Settings"));
    }

    #[test]
    fn test_layout_custom_labels() {
        let mut lines = vec![
            "Channel 0x1 info:".to_string(),
            "  Active".to_string(),
            "    Alerting : enabled".to_string(),
            "  Stored".to_string(),
        ];
        ChannelInfoLayout::default()
            .with_labels("Active", "Stored")
            .with_positions(1, 3)
            .apply(&mut lines)
            .unwrap();
        assert_eq!(lines[1], "Active:");
        assert_eq!(lines[3], "Stored:");
    }

    #[tokio::test]
    async fn test_user_info_single() {
        let out = "\
Maximum User IDs     : 15
Enabled User IDs     : 1
User ID              : 1
User Name            : root
Fixed Name           : No
Access Available     : callback
Link Authentication  : enabled
IPMI Messaging       : enabled
Privilege Level      : ADMINISTRATOR
Enable Status        : enabled
";
        let info = ipmi(ScriptedShell::new().respond("channel getaccess 1 1", out))
            .user_info(Some(1), DEFAULT_CHANNEL)
            .await
            .unwrap();

        let UserInfo::Single(record) = info else {
            panic!("expected a single user");
        };
        assert_eq!(record.len(), 10);
        assert_eq!(record["maximum_user_ids"].as_text(), Some("15"));
        assert_eq!(record["privilege_level"].as_text(), Some("ADMINISTRATOR"));
    }

    #[tokio::test]
    async fn test_user_info_all() {
        let info = ipmi(ScriptedShell::new().respond("channel getaccess 1", GETACCESS_ALL))
            .user_info(None, DEFAULT_CHANNEL)
            .await
            .unwrap();

        let UserInfo::All(records) = info else {
            panic!("expected every user");
        };
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["enabled_user_ids"].as_text(), Some("2"));
        assert_eq!(records[2]["user_name"].as_text(), Some("operator"));
        assert_eq!(records[2]["access_available"].as_text(), Some("call-in / callback"));
    }

    #[tokio::test]
    async fn test_channel_ciphers() {
        let out = "\
ID   IANA    Auth Alg        Integrity Alg   Confidentiality Alg
3    N/A     hmac_sha1       hmac_sha1_96    aes_cbc_128
17   N/A     hmac_sha256     sha256_128      aes_cbc_128
";
        let records = ipmi(ScriptedShell::new().respond("channel getciphers ipmi", out))
            .channel_ciphers()
            .await
            .unwrap();

        assert_eq!(
            records,
            vec![
                text_record([
                    ("id", "3"),
                    ("iana", "N/A"),
                    ("auth_alg", "hmac_sha1"),
                    ("integrity_alg", "hmac_sha1_96"),
                    ("confidentiality_alg", "aes_cbc_128"),
                ]),
                text_record([
                    ("id", "17"),
                    ("iana", "N/A"),
                    ("auth_alg", "hmac_sha256"),
                    ("integrity_alg", "sha256_128"),
                    ("confidentiality_alg", "aes_cbc_128"),
                ]),
            ]
        );
    }

    #[tokio::test]
    async fn test_user_access_runs_external() {
        let out = "\
ID  Name             Callin  Link Auth  IPMI Msg   Channel Priv Limit
1   root             false   true       true       ADMINISTRATOR
2   axzIDwnz         true    false      true       ADMINISTRATOR
";
        let shell = ScriptedShell::new().respond("user list 1", out);
        let log = shell.log();
        let records = ipmi(shell)
            .with_mode(IpmiMode::InBand)
            .user_access(DEFAULT_CHANNEL)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["name"].as_text(), Some("axzIDwnz"));
        assert_eq!(records[1]["callin"].as_text(), Some("true"));
        assert!(log.lock().unwrap()[0].starts_with("ipmitool -I lanplus"));
    }

    #[tokio::test]
    async fn test_channel_auth_capabilities() {
        let out = "\
Channel number             : 2
IPMI v1.5  auth types      :
KG status                  : default (all zeroes)
Per message authentication : enabled
User level authentication  : enabled
Non-null user names exist  : yes
Null user names exist      : no
Anonymous login enabled    : no
Channel supports IPMI v1.5 : no
Channel supports IPMI v2.0 : yes
";
        let record = ipmi(ScriptedShell::new().respond("channel authcap 2 4", out))
            .channel_auth_capabilities(2, DEFAULT_PRIVILEGE)
            .await
            .unwrap();

        assert_eq!(record.len(), 10);
        assert_eq!(record["ipmi_v1.5__auth_types"].as_text(), Some(""));
        assert_eq!(record["kg_status"].as_text(), Some("default (all zeroes)"));
        assert_eq!(record["channel_supports_ipmi_v2.0"].as_text(), Some("yes"));
    }
}
