//! Local shell execution via `sh -c`.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::trace;
use tokio::process::Command;

use super::Shell;
use super::output::CommandOutput;
use crate::error::{ExecError, Result};

/// Runs command lines on the local machine through `/bin/sh`.
///
/// External IPMI commands (`ipmitool -I lanplus ...`) run here.
#[derive(Debug, Clone)]
pub struct LocalShell {
    shell: String,
    timeout: Duration,
}

impl LocalShell {
    /// Create a local shell with the given per-command timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            shell: "sh".to_string(),
            timeout,
        }
    }

    /// Use a different shell binary (it must accept `-c <command>`).
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Default for LocalShell {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl Shell for LocalShell {
    async fn run(&self, command: &str) -> Result<CommandOutput> {
        let start = Instant::now();

        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecError::Spawn {
                command: self.shell.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ExecError::Timeout {
                command: self.shell.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| ExecError::Spawn {
                command: self.shell.clone(),
                source,
            })?;

        let status = output.status.code().unwrap_or(-1);
        trace!("{} -c exited with {} after {:?}", self.shell, status, start.elapsed());

        Ok(CommandOutput::new(
            command,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
            status,
            start.elapsed(),
        ))
    }
}
