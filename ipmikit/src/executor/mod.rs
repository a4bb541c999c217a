//! Command execution against the managed system.
//!
//! An IPMI command can reach the BMC two ways:
//!
//! - **in-band**: run on the managed host's own OS (over SSH) through the
//!   local IPMI driver, prefixed with a configurable command such as
//!   `ipmitool -I open`.
//! - **external**: run on this machine as `ipmitool -I lanplus ...` against
//!   the BMC's network interface.
//!
//! Commands can also be run directly on the BMC's shell (over SSH), which
//! is how files on the BMC are read.

mod builder;
mod external;
mod local;
mod output;
mod remote;

pub use builder::ExecutorBuilder;
pub use external::ExternalOptions;
pub use local::LocalShell;
pub use output::CommandOutput;
pub use remote::SshShell;

use std::fmt;

use async_trait::async_trait;
use log::{debug, info, trace, warn};

use crate::error::{ExecError, Result};

/// Something that can run a shell command line and report its output.
#[async_trait]
pub trait Shell: Send + Sync {
    /// Run `command` to completion.
    async fn run(&self, command: &str) -> Result<CommandOutput>;
}

/// How an IPMI command reaches the BMC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpmiMode {
    /// Through the managed host's OS.
    InBand,

    /// Over the network from this machine.
    #[default]
    External,
}

impl fmt::Display for IpmiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpmiMode::InBand => write!(f, "inband"),
            IpmiMode::External => write!(f, "external"),
        }
    }
}

/// Per-call execution options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Log stdout/stderr at info level instead of trace.
    pub print_output: bool,

    /// Return the output of a non-zero exit instead of failing.
    pub ignore_err: bool,

    /// Extra or overriding ipmitool options for external commands.
    pub external: Vec<(String, String)>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            print_output: true,
            ignore_err: false,
            external: Vec::new(),
        }
    }
}

impl ExecOptions {
    /// Set whether output is logged at info level.
    pub fn print_output(mut self, print_output: bool) -> Self {
        self.print_output = print_output;
        self
    }

    /// Set whether non-zero exits are tolerated.
    pub fn ignore_err(mut self, ignore_err: bool) -> Self {
        self.ignore_err = ignore_err;
        self
    }

    /// Add an ipmitool option for external commands.
    pub fn external_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.external.push((name.into(), value.into()));
        self
    }
}

/// Runs IPMI commands in-band or externally, and plain commands on the BMC.
///
/// # Example
///
/// ```rust,no_run
/// use ipmikit::executor::{CommandExecutor, ExecOptions, ExternalOptions, IpmiMode};
///
/// # async fn example() -> Result<(), ipmikit::Error> {
/// let executor = CommandExecutor::builder()
///     .external(ExternalOptions::new("10.0.0.5").password("0penBmc"))
///     .build();
///
/// let output = executor
///     .execute("mc info", IpmiMode::External, &ExecOptions::default())
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
pub struct CommandExecutor {
    inband_command: String,
    external: Option<ExternalOptions>,
    local_shell: Box<dyn Shell>,
    host_shell: Option<Box<dyn Shell>>,
    bmc_shell: Option<Box<dyn Shell>>,
}

impl CommandExecutor {
    /// Start building an executor.
    pub fn builder() -> ExecutorBuilder {
        ExecutorBuilder::new()
    }

    /// Prefix prepended to in-band commands.
    pub fn inband_command(&self) -> &str {
        &self.inband_command
    }

    /// External connection options, if configured.
    pub fn external_options(&self) -> Option<&ExternalOptions> {
        self.external.as_ref()
    }

    /// Run an IPMI sub-command (e.g. `mc info`) the given way.
    pub async fn execute(
        &self,
        command: &str,
        mode: IpmiMode,
        options: &ExecOptions,
    ) -> Result<CommandOutput> {
        match mode {
            IpmiMode::InBand => {
                let shell = self
                    .host_shell
                    .as_deref()
                    .ok_or_else(|| ExecError::ShellUnavailable {
                        target: mode.to_string(),
                    })?;
                let line = format!("{} {}", self.inband_command, command);
                self.run_on(shell, &line, &line, options).await
            }
            IpmiMode::External => {
                let external = self
                    .external
                    .as_ref()
                    .ok_or(ExecError::ExternalNotConfigured)?;
                let line = external.command_line(command, &options.external);
                let display = external.display_line(command, &options.external);
                self.run_on(self.local_shell.as_ref(), &line, &display, options)
                    .await
            }
        }
    }

    /// Run a plain shell command on the BMC itself.
    pub async fn bmc_execute(&self, command: &str, options: &ExecOptions) -> Result<CommandOutput> {
        let shell = self
            .bmc_shell
            .as_deref()
            .ok_or_else(|| ExecError::ShellUnavailable {
                target: "bmc".to_string(),
            })?;
        self.run_on(shell, command, command, options).await
    }

    async fn run_on(
        &self,
        shell: &dyn Shell,
        line: &str,
        display: &str,
        options: &ExecOptions,
    ) -> Result<CommandOutput> {
        debug!("Executing: {}", display);

        let output = shell.run(line).await?.with_command(display);

        if options.print_output {
            info!("{}:\n{}", display, output.stdout);
            if !output.stderr.is_empty() {
                info!("{} (stderr):\n{}", display, output.stderr);
            }
        } else {
            trace!("{}:\n{}", display, output.stdout);
        }

        if !output.is_success() {
            if !options.ignore_err {
                return Err(ExecError::CommandFailed {
                    command: output.command,
                    status: output.status,
                    stderr: output.stderr.trim_end().to_string(),
                }
                .into());
            }
            warn!(
                "Ignoring exit status {} from '{}': {}",
                output.status,
                display,
                output.stderr.trim_end()
            );
        }

        Ok(output)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted shells for exercising command wrappers without a BMC.

    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{CommandOutput, Shell};
    use crate::error::Result;

    /// A shell that answers command lines ending in a known suffix.
    #[derive(Default)]
    pub struct ScriptedShell {
        responses: Vec<(String, i32, String, String)>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedShell {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer commands ending with `suffix` with `stdout` and status 0.
        pub fn respond(self, suffix: &str, stdout: &str) -> Self {
            self.respond_with(suffix, 0, stdout, "")
        }

        pub fn respond_with(mut self, suffix: &str, status: i32, stdout: &str, stderr: &str) -> Self {
            self.responses
                .push((suffix.to_string(), status, stdout.to_string(), stderr.to_string()));
            self
        }

        /// Handle to the command lines this shell has run.
        pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
            self.log.clone()
        }
    }

    #[async_trait]
    impl Shell for ScriptedShell {
        async fn run(&self, command: &str) -> Result<CommandOutput> {
            self.log.lock().unwrap().push(command.to_string());
            let output = match self
                .responses
                .iter()
                .find(|(suffix, ..)| command.ends_with(suffix.as_str()))
            {
                Some((_, status, stdout, stderr)) => {
                    CommandOutput::new(command, stdout, stderr, *status, Duration::ZERO)
                }
                None => CommandOutput::new(command, "", "Invalid command", 1, Duration::ZERO),
            };
            Ok(output)
        }
    }
}
