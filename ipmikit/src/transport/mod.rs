//! SSH transport layer wrapping russh.
//!
//! In-band IPMI commands run on the managed host's operating system and
//! BMC-side commands run on the BMC's own shell. Both are reached over SSH
//! using exec channels (one channel per command, no PTY).

pub mod config;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use ssh::{ExecResult, SshTransport};
