//! Error types for ipmikit.

use std::io;
use thiserror::Error;

/// Main error type for ipmikit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Command execution errors
    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    /// Output parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key does not match the known_hosts entry
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not in known_hosts and strict checking is on
    #[error("Host {host}:{port} not found in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Command execution errors.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The command exited with a non-zero status and errors were not ignored
    #[error("Command '{command}' failed with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// No shell was configured for the requested target
    #[error("No shell configured for {target} commands")]
    ShellUnavailable { target: String },

    /// External mode was requested without connection options
    #[error("External IPMI options not configured")]
    ExternalNotConfigured,

    /// The local process could not be started
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The command did not finish in time
    #[error("Command '{command}' timed out after {timeout:?}")]
    Timeout {
        command: String,
        timeout: std::time::Duration,
    },
}

/// Errors turning command output or helper input into structured data.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A delimited field was expected but not present
    #[error("Field {index} missing from '{input}'")]
    MissingField { input: String, index: usize },

    /// A threshold reading was neither numeric nor "na"
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),

    /// No commit count could be found in a version string
    #[error("No commit count in version '{0}'")]
    MissingCommitCount(String),

    /// Output did not have the layout a wrapper depends on
    #[error("Unexpected output layout: {message}")]
    ShapeMismatch { message: String },

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// JSON document could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while staging output in a file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using ipmikit's Error.
pub type Result<T> = std::result::Result<T, Error>;
