//! Builder for [`CommandExecutor`].

use std::time::Duration;

use super::external::ExternalOptions;
use super::local::LocalShell;
use super::{CommandExecutor, Shell};

/// Builder for constructing a [`CommandExecutor`].
///
/// Nothing connects here: SSH shells are connected by the caller
/// (see [`SshShell::connect`](super::SshShell::connect)) and handed in.
///
/// # Example
///
/// ```rust,no_run
/// use ipmikit::executor::{CommandExecutor, ExternalOptions, SshShell};
/// use ipmikit::transport::SshConfig;
///
/// # async fn example() -> Result<(), ipmikit::Error> {
/// let host = SshShell::connect(SshConfig::new("server01", "root").with_password("secret")).await?;
///
/// let executor = CommandExecutor::builder()
///     .inband_command("ipmitool -I open")
///     .host_shell(host)
///     .external(ExternalOptions::new("server01-bmc").password("0penBmc"))
///     .build();
/// # Ok(())
/// # }
/// ```
pub struct ExecutorBuilder {
    inband_command: String,
    external: Option<ExternalOptions>,
    timeout: Duration,
    local_shell: Option<Box<dyn Shell>>,
    host_shell: Option<Box<dyn Shell>>,
    bmc_shell: Option<Box<dyn Shell>>,
}

impl ExecutorBuilder {
    /// Create a builder with no shells and the `ipmitool` in-band prefix.
    pub fn new() -> Self {
        Self {
            inband_command: "ipmitool".to_string(),
            external: None,
            timeout: Duration::from_secs(30),
            local_shell: None,
            host_shell: None,
            bmc_shell: None,
        }
    }

    /// Set the prefix prepended to in-band commands (default: `ipmitool`).
    pub fn inband_command(mut self, command: impl Into<String>) -> Self {
        self.inband_command = command.into();
        self
    }

    /// Set the options used for external commands.
    pub fn external(mut self, options: ExternalOptions) -> Self {
        self.external = Some(options);
        self
    }

    /// Set the timeout of the default local shell (default: 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the shell external commands run on.
    pub fn local_shell(mut self, shell: impl Shell + 'static) -> Self {
        self.local_shell = Some(Box::new(shell));
        self
    }

    /// Set the managed host's shell, used for in-band commands.
    pub fn host_shell(mut self, shell: impl Shell + 'static) -> Self {
        self.host_shell = Some(Box::new(shell));
        self
    }

    /// Set the BMC's own shell.
    pub fn bmc_shell(mut self, shell: impl Shell + 'static) -> Self {
        self.bmc_shell = Some(Box::new(shell));
        self
    }

    /// Build the executor.
    pub fn build(self) -> CommandExecutor {
        let timeout = self.timeout;
        CommandExecutor {
            inband_command: self.inband_command,
            external: self.external,
            local_shell: self
                .local_shell
                .unwrap_or_else(|| Box::new(LocalShell::new(timeout))),
            host_shell: self.host_shell,
            bmc_shell: self.bmc_shell,
        }
    }
}

impl Default for ExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
