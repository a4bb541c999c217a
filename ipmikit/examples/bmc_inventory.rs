//! BMC inventory: query a BMC over the network and print the results as JSON
//!
//! Runs `mc info`, `chassis status`, `fru print`, `lan print` and
//! `channel getciphers ipmi` through `ipmitool -I lanplus` on this machine.
//!
//! # Prerequisites
//!
//! - `ipmitool` installed locally
//! - A BMC reachable on its RMCP+ port (623)
//!
//! # Usage
//!
//! ```bash
//! cargo run --example bmc_inventory -- --host 10.0.0.5 --user root --password 0penBmc
//! ```
//!
//! Only CPU FRU records:
//! ```bash
//! cargo run --example bmc_inventory -- --host 10.0.0.5 --password 0penBmc --component cpu
//! ```

use std::env;
use std::time::Duration;

use ipmikit::{CommandExecutor, ExternalOptions, Ipmi, IpmiMode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug to see every ipmitool command line)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let Some(password) = &args.password else {
        eprintln!("Error: --password is required");
        std::process::exit(1);
    };

    let executor = CommandExecutor::builder()
        .external(
            ExternalOptions::new(&args.host)
                .username(&args.user)
                .password(password)
                .cipher_level(args.cipher)
                .port(args.port),
        )
        .timeout(Duration::from_secs(args.timeout))
        .build();

    let ipmi = Ipmi::new(executor)
        .with_options(ipmikit::ExecOptions::default().print_output(false));

    println!("Querying {}...", args.host);

    let mc_info = ipmi.mc_info().await?;
    println!("\n# mc info\n{}", serde_json::to_string_pretty(&mc_info)?);

    let chassis = ipmi.chassis_status().await?;
    println!("\n# chassis status\n{}", serde_json::to_string_pretty(&chassis)?);

    let frus = match &args.component {
        Some(component) => ipmi.component_fru_info(component, None).await?,
        None => ipmi.fru_info().await?,
    };
    println!("\n# fru ({} records)\n{}", frus.len(), serde_json::to_string_pretty(&frus)?);

    let lan = ipmi.lan_print(args.channel, IpmiMode::External).await?;
    println!("\n# lan print\n{}", serde_json::to_string_pretty(&lan)?);

    let ciphers = ipmi.channel_ciphers().await?;
    println!("\n# cipher suites");
    for cipher in &ciphers {
        println!(
            "  {:>3}  {}",
            cipher.get("id").map(|v| v.to_string()).unwrap_or_default(),
            cipher.get("auth_alg").map(|v| v.to_string()).unwrap_or_default()
        );
    }

    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    cipher: u8,
    channel: Option<u8>,
    component: Option<String>,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 623u16;
        let mut user = "root".to_string();
        let mut password = env::var("IPMI_PASSWORD").ok();
        let mut cipher = 17u8;
        let mut channel = None;
        let mut component = None;
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
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(623);
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
                "--cipher" | "-C" => {
                    i += 1;
                    if i < args.len() {
                        cipher = args[i].parse().unwrap_or(17);
                    }
                }
                "--channel" | "-c" => {
                    i += 1;
                    if i < args.len() {
                        channel = args[i].parse().ok();
                    }
                }
                "--component" => {
                    i += 1;
                    if i < args.len() {
                        component = Some(args[i].clone());
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
            port,
            user,
            password,
            cipher,
            channel,
            component,
            timeout,
        }
    }

    fn print_help() {
        println!(
            r#"ipmikit bmc_inventory example

USAGE:
    cargo run --example bmc_inventory -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>          BMC host [default: localhost]
    -p, --port <PORT>          RMCP+ port [default: 623]
    -u, --user <USER>          IPMI username [default: root]
    -P, --password <PASS>      IPMI password [env: IPMI_PASSWORD]
    -C, --cipher <LEVEL>       Cipher suite [default: 17]
    -c, --channel <N>          LAN channel for lan print [default: ipmitool's]
    --component <NAME>         Only FRU records for this component (e.g. cpu, dimm)
    -t, --timeout <SECS>       Per-command timeout [default: 30]
    --help                     Print this help message
"#
        );
    }
}
