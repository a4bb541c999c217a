//! IPMI command wrappers.
//!
//! Each wrapper on [`Ipmi`] issues one ipmitool sub-command, runs any
//! filter stages over its output and parses the result into a [`Record`]
//! or a list of records.
//!
//! [`Record`]: crate::parse::Record

mod channel;
mod fru;
mod lan;
mod mc;
mod sol;

pub use channel::{ChannelInfoLayout, UserInfo};
pub use fru::filter_component;
pub use mc::{DEV_ID_PATH, DeviceIdConfig};

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::error::{ParseError, Result};
use crate::executor::{CommandExecutor, CommandOutput, ExecOptions, IpmiMode};
use crate::parse::{TextFilter, apply_all};

/// Channel used when a caller has no particular channel in mind.
pub const DEFAULT_CHANNEL: u8 = 1;

/// Privilege level queried by `channel authcap` by default (administrator).
pub const DEFAULT_PRIVILEGE: u8 = 4;

/// An ipmitool sub-command plus the filter stages run over its output.
#[derive(Debug, Clone)]
pub struct IpmiCommand {
    args: Vec<String>,
    filters: Vec<TextFilter>,
}

impl IpmiCommand {
    /// Start a command, e.g. `IpmiCommand::new("lan print")`.
    pub fn new(sub_command: impl Into<String>) -> Self {
        Self {
            args: vec![sub_command.into()],
            filters: Vec::new(),
        }
    }

    /// Append an argument. Empty arguments are skipped.
    pub fn arg(mut self, arg: impl ToString) -> Self {
        let arg = arg.to_string();
        if !arg.is_empty() {
            self.args.push(arg);
        }
        self
    }

    /// Append an optional argument.
    pub fn opt_arg(self, arg: Option<impl ToString>) -> Self {
        match arg {
            Some(arg) => self.arg(arg),
            None => self,
        }
    }

    /// Append a filter stage.
    pub fn filter(mut self, filter: TextFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// The sub-command as passed to the executor.
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }

    /// Run the filter stages over `stdout`.
    pub fn apply_filters(&self, stdout: &str) -> String {
        if self.filters.is_empty() {
            return stdout.to_string();
        }
        apply_all(&self.filters, stdout)
    }
}

impl fmt::Display for IpmiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_line())?;
        for filter in &self.filters {
            write!(f, " | {}", filter)?;
        }
        Ok(())
    }
}

/// IPMI operations against one managed system.
///
/// Wrappers run in the configured [`IpmiMode`] with the configured
/// [`ExecOptions`], except where ipmitool only supports one mode (cipher
/// and user lists always go external, the device-id file is read on the
/// BMC). `Ipmi` is cheap to clone, so per-call options are set on a copy.
///
/// # Example
///
/// ```rust,no_run
/// use ipmikit::{CommandExecutor, ExecOptions, ExternalOptions, Ipmi};
///
/// # async fn example() -> Result<(), ipmikit::Error> {
/// let executor = CommandExecutor::builder()
///     .external(ExternalOptions::new("10.0.0.5").password("0penBmc"))
///     .build();
/// let ipmi = Ipmi::new(executor);
///
/// let mc_info = ipmi.mc_info().await?;
/// println!("firmware: {:?}", mc_info.get("firmware_revision"));
///
/// // Tolerate a failing command once.
/// let sdr = ipmi
///     .clone()
///     .with_options(ExecOptions::default().ignore_err(true))
///     .sdr_info()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Ipmi {
    executor: Arc<CommandExecutor>,
    mode: IpmiMode,
    options: ExecOptions,
}

impl Ipmi {
    /// Wrap an executor, running commands externally by default.
    pub fn new(executor: CommandExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
            mode: IpmiMode::default(),
            options: ExecOptions::default(),
        }
    }

    /// Set the mode used by the standard wrappers.
    pub fn with_mode(mut self, mode: IpmiMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the execution options used by every wrapper.
    pub fn with_options(mut self, options: ExecOptions) -> Self {
        self.options = options;
        self
    }

    /// The underlying executor.
    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }

    /// Mode used by the standard wrappers.
    pub fn mode(&self) -> IpmiMode {
        self.mode
    }

    /// Options used by every wrapper.
    pub fn options(&self) -> &ExecOptions {
        &self.options
    }

    /// Run an arbitrary ipmitool sub-command and return its raw output.
    pub async fn execute_ipmi_cmd(
        &self,
        command: &str,
        mode: IpmiMode,
        options: &ExecOptions,
    ) -> Result<CommandOutput> {
        self.executor.execute(command, mode, options).await
    }

    /// Run `command` in the configured mode and return its filtered stdout.
    pub(crate) async fn run(&self, command: &IpmiCommand) -> Result<String> {
        self.run_as(command, self.mode, &self.options).await
    }

    pub(crate) async fn run_as(
        &self,
        command: &IpmiCommand,
        mode: IpmiMode,
        options: &ExecOptions,
    ) -> Result<String> {
        debug!("Running {} ({})", command, mode);
        let output = self
            .executor
            .execute(&command.command_line(), mode, options)
            .await?;
        Ok(command.apply_filters(&output.stdout))
    }

    /// Options for wrappers whose raw output is not worth logging at info.
    pub(crate) fn quiet_options(&self) -> ExecOptions {
        self.options.clone().print_output(false)
    }
}

pub(crate) fn grep(pattern: &str) -> Result<TextFilter> {
    Ok(TextFilter::grep(pattern).map_err(ParseError::from)?)
}

pub(crate) fn grep_invert(pattern: &str) -> Result<TextFilter> {
    Ok(TextFilter::grep_invert(pattern).map_err(ParseError::from)?)
}

pub(crate) fn sed(pattern: &str, replacement: &str) -> Result<TextFilter> {
    Ok(TextFilter::sed(pattern, replacement).map_err(ParseError::from)?)
}
