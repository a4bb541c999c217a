//! # ipmikit
//!
//! Async IPMI command wrappers for hardware test automation.
//!
//! ipmikit runs `ipmitool` sub-commands against a BMC and turns their
//! `Label : value` text output into ordered records a test can assert on.
//!
//! ## Features
//!
//! - External (`ipmitool -I lanplus`) and in-band (over SSH via russh) execution
//! - Commands run directly on the BMC's shell
//! - Indentation-aware key/value parsing, report tables and properties files
//! - One typed wrapper per common sub-command (`mc info`, `lan print`, `fru print`, ...)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ipmikit::{CommandExecutor, ExternalOptions, Ipmi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ipmikit::Error> {
//!     let executor = CommandExecutor::builder()
//!         .external(
//!             ExternalOptions::new("10.0.0.5")
//!                 .username("root")
//!                 .password("0penBmc"),
//!         )
//!         .build();
//!     let ipmi = Ipmi::new(executor);
//!
//!     for fru in ipmi.component_fru_info("cpu", None).await? {
//!         println!("{:?}", fru.get("board_serial"));
//!     }
//!
//!     let status = ipmi.chassis_status().await?;
//!     println!("power: {}", status["system_power"]);
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod error;
pub mod executor;
pub mod helpers;
pub mod parse;
pub mod transport;

// Re-export main types for convenience
pub use commands::{ChannelInfoLayout, DeviceIdConfig, Ipmi, IpmiCommand, UserInfo};
pub use error::Error;
pub use executor::{
    CommandExecutor, CommandOutput, ExecOptions, ExecutorBuilder, ExternalOptions, IpmiMode,
    LocalShell, Shell, SshShell,
};
pub use parse::{Record, Value};
pub use transport::{AuthMethod, SshConfig};
