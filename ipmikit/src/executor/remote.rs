//! Remote shell execution over SSH.

use std::time::Instant;

use async_trait::async_trait;

use super::Shell;
use super::output::CommandOutput;
use crate::error::Result;
use crate::transport::{SshConfig, SshTransport};

/// Runs command lines on a remote host over an SSH exec channel.
///
/// Used for in-band IPMI commands on the managed host's OS and for
/// commands run directly on the BMC.
pub struct SshShell {
    transport: SshTransport,
}

impl SshShell {
    /// Connect and authenticate.
    pub async fn connect(config: SshConfig) -> Result<Self> {
        Ok(Self {
            transport: SshTransport::connect(config).await?,
        })
    }

    /// Wrap an already connected transport.
    pub fn from_transport(transport: SshTransport) -> Self {
        Self { transport }
    }

    /// Host this shell is connected to.
    pub fn host(&self) -> &str {
        &self.transport.config().host
    }

    /// Disconnect from the remote host.
    pub async fn close(self) -> Result<()> {
        self.transport.close().await
    }
}

#[async_trait]
impl Shell for SshShell {
    async fn run(&self, command: &str) -> Result<CommandOutput> {
        let start = Instant::now();
        let result = self.transport.exec(command).await?;

        let status = result
            .exit_status
            .and_then(|s| i32::try_from(s).ok())
            .unwrap_or(-1);

        Ok(CommandOutput::new(
            command,
            String::from_utf8_lossy(&result.stdout),
            String::from_utf8_lossy(&result.stderr),
            status,
            start.elapsed(),
        ))
    }
}
