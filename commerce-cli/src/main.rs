//! Commerce account inspector.
//!
//! # Usage
//!
//! ```bash
//! # Decode base64 account data from an RPC `getAccountInfo` response
//! commerce-inspect decode AgEAAAD9...
//!
//! # Decode base58 data from a file
//! commerce-inspect decode --encoding base58 --input account.txt
//!
//! # Encode a JSON config read from stdin
//! cat config.json | commerce-inspect encode
//!
//! # Account size for 2 policies and 3 accepted currencies
//! commerce-inspect size --policies 2 --currencies 3
//!
//! # Header byte layout
//! commerce-inspect layout config
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to TOML configuration file (default: `commerce.toml`)
//! - `COMMERCE_ENCODING` - Account data encoding (default: `base64`)
//! - `RUST_LOG` - Log level filter (default: `warn`)

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commerce::AccountEncoding;
use tracing_subscriber::EnvFilter;

use commerce_cli::InspectConfig;
use commerce_cli::commands::{self, LayoutKind};

#[derive(Debug, Parser)]
#[command(name = "commerce-inspect", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode account data into JSON.
    Decode {
        /// Account data text encoding.
        #[arg(long, env = "COMMERCE_ENCODING")]
        encoding: Option<AccountEncoding>,
        /// Read account data from a file, or `-` for stdin.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Account data, if not read from a file or stdin.
        data: Option<String>,
    },
    /// Encode a JSON merchant operator config into account data.
    Encode {
        /// Account data text encoding.
        #[arg(long, env = "COMMERCE_ENCODING")]
        encoding: Option<AccountEncoding>,
        /// Read the JSON config from a file, or `-` for stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the size of a merchant operator config account.
    Size {
        /// Number of policy entries.
        #[arg(long, default_value_t = 0)]
        policies: u32,
        /// Number of accepted currencies.
        #[arg(long, default_value_t = 0)]
        currencies: u32,
    },
    /// Print the byte layout of an account or policy payload.
    Layout {
        /// Region to describe.
        #[arg(value_enum)]
        kind: LayoutKind,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("Inspector failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = InspectConfig::load()?;
    tracing::debug!(encoding = %config.encoding, pretty = config.pretty, "Loaded configuration");

    match cli.command {
        Command::Decode {
            encoding,
            input,
            data,
        } => {
            let text = commands::read_input(data.as_deref(), input.as_deref(), std::io::stdin())?;
            let account =
                commands::decode_account(&text, encoding.unwrap_or(config.encoding))?;
            println!("{}", commands::to_json(&account, config.pretty)?);
        }
        Command::Encode { encoding, input } => {
            let json = commands::read_input(None, input.as_deref(), std::io::stdin())?;
            println!(
                "{}",
                commands::encode_config(&json, encoding.unwrap_or(config.encoding))?
            );
        }
        Command::Size {
            policies,
            currencies,
        } => {
            println!("{}", commands::account_size(policies, currencies));
        }
        Command::Layout { kind, json } => {
            let rows = commands::layout_rows(kind);
            if json {
                println!("{}", commands::to_json(&rows, config.pretty)?);
            } else {
                print!("{}", commands::render_layout(&rows));
            }
        }
    }

    Ok(())
}
