//! `pricefeed`: developer tooling for the SEDA PriceFeed contract.
//!
//! Any failure is printed as `An error occurred <context>: <error chain>` and
//! the process exits with status 1, unlike the Hardhat task this replaces,
//! which logs the error and still exits 0.

mod config;
mod domain;
mod infrastructure;
mod modules;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, RPC_URL_ENV};
use crate::domain::FeeSchedule;
use crate::infrastructure::ethereum::{signer_from_env, AlloyPriceFeed, WaitOptions};
use crate::modules::transmit::{self, TransmitOutcome};

#[derive(Debug, Parser)]
#[command(
    name = "pricefeed",
    version,
    about = "Developer tooling for the SEDA PriceFeed contract"
)]
struct Args {
    /// Network to use (see `pricefeed networks`)
    #[arg(long, global = true, default_value = config::DEFAULT_NETWORK)]
    network: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calls the transmit function on the PriceFeed contract
    Transmit(TransmitArgs),
    /// Lists configured networks and contract addresses
    Networks,
    /// Aggregates revealed prices into their per-index median
    Tally {
        /// JSON array of `{ "prices": [...], "market_status": "..." }` reveals
        reveals: PathBuf,
    },
}

impl Command {
    fn describe(&self) -> &'static str {
        match self {
            Command::Transmit(_) => "during the transmit function",
            Command::Networks => "while listing networks",
            Command::Tally { .. } => "during the tally phase",
        }
    }
}

#[derive(Debug, clap::Args)]
struct TransmitArgs {
    /// The PriceFeed contract address
    #[arg(long)]
    contract: Option<String>,

    /// Fee for data request (in ETH) [default: 0.0001]
    #[arg(long)]
    request_fee: Option<String>,

    /// Fee for result processing (in ETH) [default: 0.0001]
    #[arg(long)]
    result_fee: Option<String>,

    /// Fee for batch operations (in ETH) [default: 0.0001]
    #[arg(long)]
    batch_fee: Option<String>,

    /// Blocks to wait for after inclusion
    #[arg(long, default_value_t = 1)]
    confirmations: u64,

    /// Seconds to wait for confirmation
    #[arg(long, default_value_t = 120)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    let context = args.command.describe();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("An error occurred {context}: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pricefeed=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Networks => {
            let config = load_config(&args.network)?;
            let mut out = io::stdout().lock();
            modules::networks::list(&config, &mut out)?;
            out.flush()?;
        }
        Command::Transmit(transmit_args) => {
            let config = load_config(&args.network)?;
            run_transmit(&config, &args.network, transmit_args).await?;
        }
        Command::Tally { reveals } => run_tally(&reveals)?,
    }
    Ok(())
}

fn load_config(network: &str) -> Result<Config> {
    let config = config::load().context("failed to load configuration")?;
    debug!(%network, deployments = %config.deployments_dir.display(), "configuration loaded");
    Ok(config)
}

async fn run_transmit(config: &Config, network: &str, args: TransmitArgs) -> Result<()> {
    let override_url = std::env::var(RPC_URL_ENV).ok();
    let network = config
        .network(network)?
        .clone()
        .with_rpc_override(override_url.as_deref());
    debug!(endpoint = %network.rpc_url, "resolved network {}", network.name);

    let mut out = io::stdout().lock();
    let address = transmit::resolve_contract(
        args.contract.as_deref(),
        &network,
        &config.deployments_dir,
        &mut out,
    )?;

    let fees = FeeSchedule::parse(
        args.request_fee.as_deref(),
        args.result_fee.as_deref(),
        args.batch_fee.as_deref(),
    )?;

    let signer = signer_from_env()?;
    let wait = WaitOptions {
        confirmations: args.confirmations,
        timeout: Duration::from_secs(args.timeout),
    };
    let client = AlloyPriceFeed::connect(&network, signer, address, wait)
        .await
        .with_context(|| format!("failed to connect to {}", network.rpc_url))?;

    let outcome = transmit::run(&client, &fees, &mut out).await?;
    out.flush()?;
    if let TransmitOutcome::Submitted {
        receipt,
        request_id,
    } = outcome
    {
        debug!(block = ?receipt.block_number, ?request_id, "transmit finished");
    }
    Ok(())
}

fn run_tally(reveals: &Path) -> Result<()> {
    let mut out = io::stdout().lock();
    modules::tally::run(reveals, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["pricefeed", "transmit"]).unwrap();
        assert_eq!(args.network, "localhost");
        let Command::Transmit(t) = args.command else {
            panic!("expected transmit");
        };
        assert!(t.contract.is_none());
        assert!(t.request_fee.is_none());
        assert_eq!(t.confirmations, 1);
        assert_eq!(t.timeout, 120);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "pricefeed",
            "transmit",
            "--network",
            "baseSepolia",
            "--contract",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "--request-fee",
            "0.01",
            "--batch-fee",
            "20 gwei",
        ])
        .unwrap();
        assert_eq!(args.network, "baseSepolia");
        let Command::Transmit(t) = args.command else {
            panic!("expected transmit");
        };
        assert_eq!(t.request_fee.as_deref(), Some("0.01"));
        assert_eq!(t.result_fee, None);
        assert_eq!(t.batch_fee.as_deref(), Some("20 gwei"));
    }

    #[test]
    fn test_networks_subcommand() {
        let args = Args::try_parse_from(["pricefeed", "-v", "networks"]).unwrap();
        assert!(args.verbose);
        assert!(matches!(args.command, Command::Networks));
        assert_eq!(args.command.describe(), "while listing networks");
    }

    #[test]
    fn test_tally_subcommand() {
        let args = Args::try_parse_from(["pricefeed", "tally", "reveals.json"]).unwrap();
        let Command::Tally { reveals } = &args.command else {
            panic!("expected tally");
        };
        assert_eq!(reveals, &PathBuf::from("reveals.json"));
        assert_eq!(args.command.describe(), "during the tally phase");
    }
}
