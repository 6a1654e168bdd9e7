//! PriceFeed contract binding and `RequestPosted` log matching

use alloy::primitives::{keccak256, B256};
use alloy::rpc::types::Log;
use alloy::sol;

/// Canonical signature of the event carrying the request identifier.
pub const REQUEST_POSTED_SIGNATURE: &str = "RequestPosted(bytes32)";

sol! {
    /// SEDA PriceFeed consumer contract.
    #[sol(rpc)]
    contract PriceFeed {
        event RequestPosted(bytes32 indexed requestId);

        function transmit(uint256 requestFee, uint256 resultFee, uint256 batchFee)
            external
            payable
            returns (bytes32);
    }
}

/// topic0 of a `RequestPosted` log.
pub fn request_posted_topic() -> B256 {
    keccak256(REQUEST_POSTED_SIGNATURE.as_bytes())
}

/// Return the request id (topic1) of the first `RequestPosted` log.
///
/// Logs are matched on topic0 only; the emitting address is not checked.
pub fn find_request_id(logs: &[Log]) -> Option<B256> {
    let topic = request_posted_topic();
    logs.iter()
        .find(|log| log.topics().first() == Some(&topic))
        .and_then(|log| log.topics().get(1).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, Bytes, LogData};
    use alloy::sol_types::SolEvent;

    fn log_with_topics(topics: Vec<B256>) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: Address::ZERO,
                data: LogData::new_unchecked(topics, Bytes::new()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_topic_matches_abi() {
        assert_eq!(
            request_posted_topic(),
            PriceFeed::RequestPosted::SIGNATURE_HASH
        );
    }

    #[test]
    fn test_find_request_id() {
        let id = B256::repeat_byte(0xab);
        let logs = vec![
            log_with_topics(vec![keccak256("Transfer(address,address,uint256)")]),
            log_with_topics(vec![request_posted_topic(), id]),
        ];
        assert_eq!(find_request_id(&logs), Some(id));
    }

    #[test]
    fn test_first_match_wins() {
        let first = B256::repeat_byte(1);
        let second = B256::repeat_byte(2);
        let logs = vec![
            log_with_topics(vec![request_posted_topic(), first]),
            log_with_topics(vec![request_posted_topic(), second]),
        ];
        assert_eq!(find_request_id(&logs), Some(first));
    }

    #[test]
    fn test_no_matching_log() {
        assert_eq!(find_request_id(&[]), None);
        let logs = vec![log_with_topics(vec![B256::repeat_byte(7), B256::repeat_byte(8)])];
        assert_eq!(find_request_id(&logs), None);
    }

    #[test]
    fn test_matching_log_without_id() {
        let logs = vec![log_with_topics(vec![request_posted_topic()])];
        assert_eq!(find_request_id(&logs), None);
    }
}
