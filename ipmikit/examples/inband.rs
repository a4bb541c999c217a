//! In-band example: run IPMI commands through the managed host's OS
//!
//! Connects to the host over SSH and runs `ipmitool` there against the
//! local IPMI driver. With `--bmc`, also reads the BMC's device-id
//! configuration over a second SSH connection to the BMC itself.
//!
//! # Prerequisites
//!
//! - SSH access to the managed host, with `ipmitool` and the IPMI driver loaded
//! - Optionally SSH access to the BMC (OpenBMC)
//!
//! # Usage
//!
//! ```bash
//! cargo run --example inband -- --host server01 --user root --password secret
//! ```
//!
//! With the BMC and a key:
//! ```bash
//! cargo run --example inband -- --host server01 --key ~/.ssh/id_ed25519 --bmc server01-bmc --bmc-password 0penBmc
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use ipmikit::helpers::{aux_version, prefix_bytes};
use ipmikit::{CommandExecutor, Ipmi, IpmiMode, SshConfig, SshShell, UserInfo};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let timeout = Duration::from_secs(args.timeout);

    let mut host_config = SshConfig::new(&args.host, &args.user).with_timeout(timeout);
    if let Some(password) = &args.password {
        host_config = host_config.with_password(password);
    } else if let Some(key_path) = &args.key {
        host_config = host_config.with_private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }

    println!("Connecting to {}...", args.host);
    let host_shell = SshShell::connect(host_config).await?;

    let mut builder = CommandExecutor::builder()
        .inband_command(&args.inband_command)
        .host_shell(host_shell);

    if let Some(bmc) = &args.bmc {
        println!("Connecting to BMC {}...", bmc);
        let bmc_config = SshConfig::new(bmc, "root")
            .with_password(args.bmc_password.as_deref().unwrap_or_default())
            .with_timeout(timeout);
        builder = builder.bmc_shell(SshShell::connect(bmc_config).await?);
    }

    let ipmi = Ipmi::new(builder.build()).with_mode(IpmiMode::InBand);

    let mc_info = ipmi.mc_info().await?;
    println!("\nFirmware revision: {}", mc_info["firmware_revision"]);
    if let Some(aux) = mc_info.get("aux_firmware_rev_info").and_then(|v| v.as_list()) {
        println!("Aux firmware bytes: {:?}", aux);
    }

    let sdr = ipmi.sdr_info().await?;
    println!("SDR record count: {}", sdr["record_count"]);

    if let UserInfo::Single(user) = ipmi.user_info(Some(1), 1).await? {
        println!("User 1: {} ({})", user["user_name"], user["privilege_level"]);
    }

    let authcap = ipmi.channel_auth_capabilities(1, 4).await?;
    println!("Channel 1 supports IPMI v2.0: {}", authcap["channel_supports_ipmi_v2.0"]);

    if args.bmc.is_some() {
        let dev_id = ipmi.device_id_config().await?;
        println!(
            "\nDevice id {} revision {} (manufacturer {}, product {})",
            dev_id.id, dev_id.device_revision, dev_id.manuf_id, dev_id.prod_id
        );

        let os_release = ipmi
            .executor()
            .bmc_execute("grep ^VERSION_ID= /etc/os-release", ipmi.options())
            .await?;
        let version_id = os_release.stdout.trim().trim_start_matches("VERSION_ID=");
        let aux = aux_version(version_id.trim_matches('"'))?;
        println!("Expected aux version: {}", aux);
        let pairs: Vec<String> = aux
            .as_bytes()
            .chunks(2)
            .map(|pair| String::from_utf8_lossy(pair).into_owned())
            .collect();
        println!("As byte strings: {:?}", prefix_bytes(&pairs));
    }

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    bmc: Option<String>,
    bmc_password: Option<String>,
    inband_command: String,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut user = env::var("USER").unwrap_or_else(|_| "root".to_string());
        let mut password = None;
        let mut key = None;
        let mut bmc = None;
        let mut bmc_password = None;
        let mut inband_command = "ipmitool".to_string();
        let mut timeout = 30u64;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--key" | "-k" => {
                    i += 1;
                    if i < args.len() {
                        key = Some(PathBuf::from(&args[i]));
                    }
                }
                "--bmc" => {
                    i += 1;
                    if i < args.len() {
                        bmc = Some(args[i].clone());
                    }
                }
                "--bmc-password" => {
                    i += 1;
                    if i < args.len() {
                        bmc_password = Some(args[i].clone());
                    }
                }
                "--inband-command" => {
                    i += 1;
                    if i < args.len() {
                        inband_command = args[i].clone();
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(30);
                    }
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            host,
            user,
            password,
            key,
            bmc,
            bmc_password,
            inband_command,
            timeout,
        }
    }

    fn print_help() {
        println!(
            r#"ipmikit inband example

USAGE:
    cargo run --example inband -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>            Managed host [default: localhost]
    -u, --user <USER>            SSH username [default: $USER]
    -P, --password <PASS>        SSH password
    -k, --key <PATH>             Path to SSH private key
    --bmc <HOST>                 Also connect to this BMC over SSH as root
    --bmc-password <PASS>        BMC root password
    --inband-command <CMD>       In-band ipmitool invocation [default: ipmitool]
    -t, --timeout <SECS>         Per-command timeout [default: 30]
    --help                       Print this help message
"#
        );
    }
}
