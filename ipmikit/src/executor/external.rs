//! Building `ipmitool` command lines for out-of-band (LAN) access.

use indexmap::IndexMap;
use secrecy::{ExposeSecret, SecretString};

/// Connection options for external `ipmitool` invocations.
///
/// Renders `ipmitool -I <interface> -C <cipher> -N <retries> -p <port>
/// -U <user> -P <password> -H <host> [extra options] <command>`.
#[derive(Debug, Clone)]
pub struct ExternalOptions {
    program: String,
    host: String,
    username: String,
    password: SecretString,
    interface: String,
    cipher_level: u8,
    retries: u32,
    port: u16,
    extra: IndexMap<String, String>,
}

/// Option letters always emitted, in this order.
const REQUIRED: [&str; 7] = ["I", "C", "N", "p", "U", "P", "H"];

impl ExternalOptions {
    /// Create options for the BMC at `host` with ipmitool's usual defaults
    /// (`lanplus`, cipher suite 17, 3 retries, port 623, user `root`).
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            program: "ipmitool".to_string(),
            host: host.into(),
            username: "root".to_string(),
            password: SecretString::from(String::new()),
            interface: "lanplus".to_string(),
            cipher_level: 17,
            retries: 3,
            port: 623,
            extra: IndexMap::new(),
        }
    }

    /// Set the ipmitool binary.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the IPMI username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the IPMI password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = SecretString::from(password.into());
        self
    }

    /// Set the interface (`-I`).
    pub fn interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = interface.into();
        self
    }

    /// Set the cipher suite level (`-C`).
    pub fn cipher_level(mut self, level: u8) -> Self {
        self.cipher_level = level;
        self
    }

    /// Set the retry count (`-N`).
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the RMCP port (`-p`).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Add or override an option for every command.
    ///
    /// Single-letter names render as `-X value`, longer ones as `--name value`.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// BMC host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Full command line, including the password.
    pub fn command_line(&self, command: &str, overrides: &[(String, String)]) -> String {
        self.render(command, overrides, true)
    }

    /// Command line suitable for logs, with the password masked.
    pub fn display_line(&self, command: &str, overrides: &[(String, String)]) -> String {
        self.render(command, overrides, false)
    }

    fn render(&self, command: &str, overrides: &[(String, String)], reveal: bool) -> String {
        let mut options: IndexMap<&str, String> = IndexMap::new();

        for name in REQUIRED {
            // A command carrying its own -N (e.g. `fru print -N 50`) keeps it
            if name == "N" && command.contains(" -N ") {
                continue;
            }
            let value = match name {
                "I" => self.interface.clone(),
                "C" => self.cipher_level.to_string(),
                "N" => self.retries.to_string(),
                "p" => self.port.to_string(),
                "U" => self.username.clone(),
                "P" => self.password.expose_secret().to_string(),
                _ => self.host.clone(),
            };
            options.insert(name, value);
        }

        for (name, value) in self.extra.iter().map(|(n, v)| (n.as_str(), v)).chain(
            overrides.iter().map(|(n, v)| (n.as_str(), v)),
        ) {
            options.insert(name, value.clone());
        }

        let mut line = self.program.clone();
        for (name, value) in &options {
            let flag = if name.len() == 1 {
                format!("-{}", name)
            } else {
                format!("--{}", name)
            };
            line.push(' ');
            line.push_str(&flag);
            line.push(' ');
            if *name == "P" && !reveal {
                line.push_str("********");
            } else {
                line.push_str(&shell_quote(value));
            }
        }
        line.push(' ');
        line.push_str(command);
        line
    }
}

/// Quote a value for `sh` unless it only holds safe characters.
pub(crate) fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,%+".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
