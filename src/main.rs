//! # Chat Binary Entry Point
//!
//! Two-party text chat over a direct TCP connection, built for a pair of
//! devices on an ad-hoc network. Device A listens, device B connects; which
//! one this process is comes from the configuration file.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -- --config config/device-a.toml    # on device A
//! cargo run -- --config config/device-b.toml    # on device B
//! ```

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

use adhoc_chat::common::config::{load_config, ChatConfig, Role};
use adhoc_chat::{client, server};

/// Command-line arguments for the chat binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the chat configuration file (TOML format)
    ///
    /// Example: config/device-a.toml
    #[arg(short, long)]
    config: String,
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// Logs are printed to stdout with INFO level by default.
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
}

fn print_banner() {
    println!("{}", "=".repeat(40));
    println!("  Ad-Hoc P2P Chat");
    println!("{}", "=".repeat(40));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();
    let config: ChatConfig = load_config(&args.config)?;

    print_banner();

    match Role::from_device(&config.device) {
        Some(Role::A) => server::run(&config).await?,
        Some(Role::B) => client::run(&config).await?,
        None => {
            println!(
                "Error: Invalid device '{}' in config. Must be 'A' or 'B'.",
                config.device
            );
            std::process::exit(1);
        }
    }

    Ok(())
}
