//! ChainScribe command line — anchor a payload on a ledger, or read one back
//! by transaction handle.

use std::path::PathBuf;

use anyhow::Context;
use chainscribe_connector::{ConnectorConfig, ConnectorFactory};
use chainscribe_types::TxHandle;
use clap::Parser;

#[derive(Parser)]
#[command(name = "chainscribe", about = "Anchor small payloads on a distributed ledger")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "chainscribe.toml", env = "CHAINSCRIBE_CONFIG")]
    config: PathBuf,

    /// Backend to use; overrides the config file's `connector` value.
    #[arg(long, env = "CHAINSCRIBE_CONNECTOR")]
    connector: Option<String>,

    /// Ledger server URI; overrides the config file's `server` value.
    #[arg(long, env = "CHAINSCRIBE_SERVER")]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Anchor a payload and print the transaction handle.
    Write {
        /// The payload to anchor, stored byte-for-byte.
        payload: String,
    },
    /// Read a previously anchored payload by its transaction handle.
    Read {
        /// The handle returned by a write.
        handle: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chainscribe_utils::init_tracing();

    let cli = Cli::parse();

    let contents = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("failed to read config file {}", cli.config.display()))?;
    let mut config: ConnectorConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", cli.config.display()))?;

    if let Some(connector) = cli.connector {
        config.connector = connector;
    }
    if let Some(server) = cli.server {
        config.server = server;
    }

    tracing::info!(
        connector = %config.connector,
        server = %config.server,
        "creating ledger backend"
    );
    let backend = ConnectorFactory::create(&config.connector, &config)?;

    match cli.command {
        Command::Write { payload } => {
            let handle = backend.write_transaction(&payload).await?;
            // The write returns as soon as the transaction is submitted;
            // poll `read` to observe validation.
            println!("{handle}");
        }
        Command::Read { handle } => {
            let payload = backend.read_transaction(&TxHandle::new(handle)).await?;
            println!("{payload}");
        }
    }

    Ok(())
}
