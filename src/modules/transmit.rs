//! `transmit` task: submit fees to the PriceFeed contract and report the
//! request id emitted in the receipt.

use std::io::Write;
use std::path::Path;

use alloy::primitives::{Address, B256};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, NetworkConfig};
use crate::domain::{find_request_id, format_ether, FeeError, FeeSchedule};
use crate::infrastructure::deployments::{self, DeploymentError};
use crate::infrastructure::ethereum::{hex_word, PriceFeedClient, ProviderError, TxReceipt};

/// Contract name looked up in deployment records.
pub const CONTRACT_NAME: &str = "PriceFeed";

#[derive(Debug, Error)]
pub enum TransmitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fee(#[from] FeeError),
    #[error(transparent)]
    Deployment(#[from] DeploymentError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("invalid contract address: {0}")]
    InvalidContract(String),
    #[error("no PriceFeed deployment found for network '{network}' (chain {chain_id})")]
    NotDeployed { network: String, chain_id: u64 },
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// What happened to a submitted transmit call.
#[derive(Debug, Clone)]
pub enum TransmitOutcome {
    NoReceipt,
    Submitted {
        receipt: TxReceipt,
        request_id: Option<B256>,
    },
}

/// Resolve the PriceFeed address: explicit override, then the network's
/// configured address, then the deployment records.
pub fn resolve_contract(
    contract: Option<&str>,
    network: &NetworkConfig,
    deployments_dir: &Path,
    out: &mut impl Write,
) -> Result<Address, TransmitError> {
    if let Some(contract) = contract {
        return contract
            .trim()
            .parse()
            .map_err(|_| TransmitError::InvalidContract(contract.to_string()));
    }

    writeln!(
        out,
        "No contract address specified, fetching from previous deployments..."
    )?;
    let address = match network.price_feed()? {
        Some(address) => address,
        None => deployments::find_deployed(deployments_dir, network.chain_id, CONTRACT_NAME)?
            .ok_or_else(|| TransmitError::NotDeployed {
                network: network.name.clone(),
                chain_id: network.chain_id,
            })?,
    };
    writeln!(out, "Contract found: {address}")?;
    Ok(address)
}

/// Call `transmit` through `client` and print the result to `out`.
pub async fn run<C>(
    client: &C,
    fees: &FeeSchedule,
    out: &mut impl Write,
) -> Result<TransmitOutcome, TransmitError>
where
    C: PriceFeedClient + ?Sized,
{
    let total = fees.total()?;

    writeln!(
        out,
        "\nCalling transmit() on {CONTRACT_NAME} at {}...\n",
        client.address()
    )?;
    writeln!(
        out,
        "Fees (ETH):\n- Request Fee: {}\n- Result Fee: {}\n- Batch Fee: {}\n- Total: {}\n",
        fees.request.raw,
        fees.result.raw,
        fees.batch.raw,
        format_ether(total)
    )?;

    let Some(receipt) = client.transmit(fees).await? else {
        writeln!(out, "Transaction failed - no receipt received")?;
        return Ok(TransmitOutcome::NoReceipt);
    };

    let tx_hash = hex_word(&receipt.tx_hash);
    if !receipt.success {
        return Err(TransmitError::Reverted { tx_hash });
    }
    info!(
        %tx_hash,
        block = ?receipt.block_number,
        gas_used = receipt.gas_used,
        logs = receipt.logs.len(),
        "transaction confirmed"
    );
    writeln!(out, "Request submitted successfully!")?;

    let request_id = find_request_id(&receipt.logs);
    match &request_id {
        Some(id) => writeln!(out, "Request ID: {}", hex_word(id))?,
        None => {
            warn!(%tx_hash, "no RequestPosted log in receipt");
            writeln!(out, "Transaction successful but could not extract request ID")?;
        }
    }

    Ok(TransmitOutcome::Submitted {
        receipt,
        request_id,
    })
}
