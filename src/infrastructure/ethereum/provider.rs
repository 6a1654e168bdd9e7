//! PriceFeed client abstraction and its Alloy implementation
//!
//! Signing, nonce management and gas estimation are handled by the Alloy
//! filler stack; this layer only submits `transmit` and waits for it.

use std::time::Duration;

use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::NetworkConfig;
use crate::domain::{FeeSchedule, PriceFeed};
use crate::infrastructure::ethereum::types::{hex_word, TxReceipt};

/// Environment variable holding the hex-encoded signing key.
pub const PRIVATE_KEY_ENV: &str = "EVM_PRIVATE_KEY";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("EVM_PRIVATE_KEY is not set; no account available to sign with")]
    MissingKey,
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
    #[error("invalid RPC URL {url}: {reason}")]
    UrlParse { url: String, reason: String },
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("chain id mismatch for '{network}': configured {expected}, endpoint reports {actual}")]
    ChainIdMismatch {
        network: String,
        expected: u64,
        actual: u64,
    },
    #[error("failed to send transaction: {0}")]
    Send(String),
    #[error("failed waiting for confirmation: {0}")]
    Confirm(String),
}

/// Options for waiting on a submitted transaction.
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    pub confirmations: u64,
    pub timeout: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            confirmations: 1,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Remote side of the transmit task.
#[async_trait::async_trait]
pub trait PriceFeedClient: Send + Sync {
    /// Address of the PriceFeed contract being called.
    fn address(&self) -> Address;

    /// Call `transmit` with the given fees, attaching their sum as value, and
    /// wait for confirmation. `Ok(None)` means the transaction was mined but
    /// no receipt could be fetched.
    async fn transmit(&self, fees: &FeeSchedule) -> Result<Option<TxReceipt>, ProviderError>;
}

/// Load the signing key from the environment.
pub fn signer_from_env() -> Result<PrivateKeySigner, ProviderError> {
    let key = std::env::var(PRIVATE_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(ProviderError::MissingKey)?;
    parse_signer(&key)
}

pub fn parse_signer(key: &str) -> Result<PrivateKeySigner, ProviderError> {
    key.trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| ProviderError::InvalidKey(e.to_string()))
}

/// Fail unless the endpoint reports the chain id the network is configured with.
pub fn check_chain_id(network: &NetworkConfig, actual: u64) -> Result<(), ProviderError> {
    if actual != network.chain_id {
        return Err(ProviderError::ChainIdMismatch {
            network: network.name.clone(),
            expected: network.chain_id,
            actual,
        });
    }
    Ok(())
}

/// `transmit` over an HTTP JSON-RPC endpoint with a local signer.
pub struct AlloyPriceFeed {
    provider: DynProvider<Ethereum>,
    address: Address,
    wait: WaitOptions,
}

impl std::fmt::Debug for AlloyPriceFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyPriceFeed")
            .field("address", &self.address)
            .field("wait", &self.wait)
            .finish()
    }
}

impl AlloyPriceFeed {
    /// Connect to the network's endpoint and check that it serves the
    /// configured chain.
    pub async fn connect(
        network: &NetworkConfig,
        signer: PrivateKeySigner,
        address: Address,
        wait: WaitOptions,
    ) -> Result<Self, ProviderError> {
        let url: alloy::transports::http::reqwest::Url = network
            .rpc_url
            .parse()
            .map_err(|e| ProviderError::UrlParse {
                url: network.rpc_url.clone(),
                reason: format!("{e}"),
            })?;

        let sender = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))?;
        check_chain_id(network, chain_id)?;
        debug!(endpoint = %network.rpc_url, chain_id, %sender, "connected");

        Ok(Self {
            provider,
            address,
            wait,
        })
    }
}

#[async_trait::async_trait]
impl PriceFeedClient for AlloyPriceFeed {
    fn address(&self) -> Address {
        self.address
    }

    async fn transmit(&self, fees: &FeeSchedule) -> Result<Option<TxReceipt>, ProviderError> {
        let total = fees
            .total()
            .map_err(|e| ProviderError::Send(e.to_string()))?;
        let contract = PriceFeed::new(self.address, self.provider.clone());

        let pending = contract
            .transmit(fees.request.wei, fees.result.wei, fees.batch.wei)
            .value(total)
            .send()
            .await
            .map_err(|e| ProviderError::Send(e.to_string()))?;
        info!(tx_hash = %hex_word(pending.tx_hash()), "transaction sent");

        let tx_hash = pending
            .with_required_confirmations(self.wait.confirmations)
            .with_timeout(Some(self.wait.timeout))
            .watch()
            .await
            .map_err(|e| ProviderError::Confirm(e.to_string()))?;

        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| ProviderError::Rpc(e.to_string()))?;

        Ok(receipt.map(TxReceipt::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // anvil account #0
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_parse_signer() {
        let signer = parse_signer(TEST_KEY).unwrap();
        assert_eq!(
            signer.address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
        assert!(parse_signer(TEST_KEY.trim_start_matches("0x")).is_ok());
    }

    #[test]
    fn test_parse_signer_rejects_garbage() {
        assert!(matches!(
            parse_signer("0x1234"),
            Err(ProviderError::InvalidKey(_))
        ));
    }

    fn network(rpc_url: &str, chain_id: u64) -> NetworkConfig {
        NetworkConfig {
            name: "baseSepolia".into(),
            rpc_url: rpc_url.into(),
            chain_id,
            core_address: None,
            price_feed: None,
        }
    }

    #[test]
    fn test_check_chain_id() {
        let network = network("https://sepolia.base.org", 84532);
        assert!(check_chain_id(&network, 84532).is_ok());

        let err = check_chain_id(&network, 8453).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::ChainIdMismatch {
                expected: 84532,
                actual: 8453,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "chain id mismatch for 'baseSepolia': configured 84532, endpoint reports 8453"
        );
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let network = network("not a url", 1);
        let err = AlloyPriceFeed::connect(
            &network,
            parse_signer(TEST_KEY).unwrap(),
            Address::ZERO,
            WaitOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProviderError::UrlParse { .. }));
    }
}
