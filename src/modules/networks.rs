//! `networks` task: print the known networks and their contract addresses

use std::io::Write;

use crate::config::Config;
use crate::infrastructure::deployments;
use crate::modules::transmit::CONTRACT_NAME;

pub fn list(config: &Config, out: &mut impl Write) -> std::io::Result<()> {
    for network in config.networks() {
        writeln!(out, "{} (chain {})", network.name, network.chain_id)?;
        writeln!(out, "  rpc:        {}", network.rpc_url)?;
        let core = match network.core_address() {
            Ok(Some(address)) => address.to_string(),
            Ok(None) => "-".to_string(),
            Err(err) => err.to_string(),
        };
        writeln!(out, "  core:       {core}")?;

        let feed = match network.price_feed() {
            Ok(Some(address)) => address.to_string(),
            Ok(None) => match deployments::find_deployed(
                &config.deployments_dir,
                network.chain_id,
                CONTRACT_NAME,
            ) {
                Ok(Some(address)) => format!("{address} (deployed)"),
                Ok(None) => "-".to_string(),
                Err(err) => err.to_string(),
            },
            Err(err) => err.to_string(),
        };
        writeln!(out, "  price feed: {feed}")?;
    }
    Ok(())
}
