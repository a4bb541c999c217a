//! Output type for command execution results.

use std::time::Duration;

/// Output of one executed command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// The command line that was executed (credentials redacted).
    pub command: String,

    /// Standard output text.
    pub stdout: String,

    /// Standard error text.
    pub stderr: String,

    /// Exit status. `-1` when the process or channel gave none.
    pub status: i32,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl CommandOutput {
    /// Create a new command output.
    pub fn new(
        command: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        status: i32,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            stdout: stdout.into(),
            stderr: stderr.into(),
            status,
            elapsed,
        }
    }

    /// Replace the recorded command line.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Check if the command exited with status zero.
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Get the stdout lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines()
    }
}

impl std::fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stdout)
    }
}
