//! Ethereum infrastructure - Alloy provider implementations

mod provider;
pub(crate) mod types;

pub use provider::{
    signer_from_env, AlloyPriceFeed, PriceFeedClient, ProviderError, WaitOptions,
};
pub use types::{hex_word, TxReceipt};
