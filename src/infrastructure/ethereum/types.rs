//! Type conversions between Alloy types and task types

use alloy::primitives::B256;
use alloy::rpc::types::{Log, TransactionReceipt};

/// The parts of a transaction receipt the transmit task reports on.
#[derive(Debug, Clone, Default)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub success: bool,
    pub gas_used: u64,
    pub logs: Vec<Log>,
}

impl From<TransactionReceipt> for TxReceipt {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
            gas_used: receipt.gas_used,
            logs: receipt.inner.logs().to_vec(),
        }
    }
}

/// `0x`-prefixed lowercase hex of a 32-byte word.
pub fn hex_word(word: &B256) -> String {
    format!("0x{}", hex::encode(word.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_word() {
        let word = B256::repeat_byte(0x0f);
        let hex = hex_word(&word);
        assert_eq!(hex.len(), 66);
        assert!(hex.starts_with("0x0f0f"));
    }
}
