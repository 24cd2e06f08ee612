//! Query one device without Telegram
//!
//! Runs the same detect, map and collect pipeline the bot uses and prints
//! the report as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example query_device -- --host 10.0.0.1 --user admin --password secret
//! cargo run --example query_device -- --host 10.0.0.1 --user admin --key ~/.ssh/id_ed25519 --report interfaces
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use netbot::transport::{Credentials, HostKeyVerification};
use netbot::{Collected, Collector, DeviceAccess, DeviceAddress, DeviceCollector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let Some(address) = DeviceAddress::parse(&args.host) else {
        eprintln!("Error: --host must be a dotted-quad IPv4 address");
        std::process::exit(1);
    };

    let credentials = if let Some(password) = &args.password {
        Credentials::password(&args.user, password)
    } else if let Some(key_path) = &args.key {
        Credentials::private_key(&args.user, key_path, None)
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    };

    let mut access = DeviceAccess::new(credentials);
    access.port = args.port;
    access.timeout = Duration::from_secs(args.timeout);
    if args.insecure {
        access.host_key_verification = HostKeyVerification::Disabled;
    }

    let collector = DeviceCollector::ssh(access);

    println!("Querying {}:{} for {}...\n", address, args.port, args.report);
    let json = match args.report.as_str() {
        "interfaces" => match collector.collect_interfaces(&address).await? {
            Collected::Report(interfaces) => serde_json::to_string_pretty(&interfaces)?,
            Collected::Unsupported => unsupported(),
        },
        _ => match collector.collect_facts(&address).await? {
            Collected::Report(facts) => serde_json::to_string_pretty(&facts)?,
            Collected::Unsupported => unsupported(),
        },
    };
    println!("{json}");

    Ok(())
}

fn unsupported() -> ! {
    eprintln!("Device type is not supported");
    std::process::exit(2);
}

/// Simple argument parser
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    timeout: u64,
    report: String,
    insecure: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = String::new();
        let mut port = 22u16;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut timeout = 30u64;
        let mut report = "facts".to_string();
        let mut insecure = false;

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
                        port = args[i].parse().unwrap_or(22);
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
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(30);
                    }
                }
                "--report" | "-r" => {
                    i += 1;
                    if i < args.len() {
                        report = args[i].clone();
                    }
                }
                "--insecure" => insecure = true,
                "--help" => {
                    println!("Usage: query_device [OPTIONS]");
                    println!();
                    println!("Options:");
                    println!("  -h, --host <HOST>        Device IPv4 address");
                    println!("  -p, --port <PORT>        SSH port [default: 22]");
                    println!("  -u, --user <USER>        Username [default: $USER]");
                    println!("  -P, --password <PASS>    Password");
                    println!("  -k, --key <PATH>         Private key file");
                    println!("  -t, --timeout <SECS>     Timeout in seconds [default: 30]");
                    println!("  -r, --report <REPORT>    facts or interfaces [default: facts]");
                    println!("      --insecure           Skip host key verification");
                    std::process::exit(0);
                }
                _ => {}
            }
            i += 1;
        }

        Self {
            host,
            port,
            user,
            password,
            key,
            timeout,
            report,
            insecure,
        }
    }
}
