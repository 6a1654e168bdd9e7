//! Receipt log scanning for the RequestPosted event
//!
//! Standalone sanity check of the Alloy types the binary relies on. `scan`
//! restates the topic-match rule locally; the shipped `find_request_id` is
//! covered by the unit tests in `domain::price_feed`.
//!
//! Verifies against plain Alloy types that:
//! 1. The event topic is keccak256("RequestPosted(bytes32)")
//! 2. Topic1 of the first matching log decodes as `requestId`
//! 3. Unrelated logs are skipped
//! 4. The default fees sum to 0.0003 ETH

use alloy::primitives::utils::parse_ether;
use alloy::primitives::{keccak256, Address, Bytes, LogData, B256, U256};
use alloy::rpc::types::Log;
use alloy::sol;
use alloy::sol_types::SolEvent;

sol! {
    event RequestPosted(bytes32 indexed requestId);
}

fn log(topics: Vec<B256>) -> Log {
    Log {
        inner: alloy::primitives::Log {
            address: Address::repeat_byte(0x42),
            data: LogData::new_unchecked(topics, Bytes::new()),
        },
        ..Default::default()
    }
}

fn scan(logs: &[Log]) -> Option<B256> {
    let topic = keccak256("RequestPosted(bytes32)");
    logs.iter()
        .find(|log| log.topics().first() == Some(&topic))
        .and_then(|log| log.topics().get(1).copied())
}

#[test]
fn test_event_topic() {
    assert_eq!(keccak256("RequestPosted(bytes32)"), RequestPosted::SIGNATURE_HASH);
    println!("✓ RequestPosted topic: {}", RequestPosted::SIGNATURE_HASH);
}

#[test]
fn test_request_id_extraction() {
    let request_id = keccak256("request-1");
    let transfer = keccak256("Transfer(address,address,uint256)");

    let logs = vec![
        log(vec![transfer, B256::ZERO, B256::ZERO]),
        log(vec![RequestPosted::SIGNATURE_HASH, request_id]),
        log(vec![RequestPosted::SIGNATURE_HASH, keccak256("request-2")]),
    ];

    assert_eq!(scan(&logs), Some(request_id));
    assert_eq!(scan(&logs[..1]), None);

    // Alloy decodes the same log to the same id
    let decoded = RequestPosted::decode_log_data(logs[1].data()).expect("decodes");
    assert_eq!(decoded.requestId, request_id);
    println!("✓ Request ID: 0x{}", hex::encode(request_id));
}

#[test]
fn test_default_fee_total() {
    let fee = parse_ether("0.0001").expect("valid ether amount");
    assert_eq!(fee, U256::from(100_000_000_000_000u64));

    let total = fee + fee + fee;
    assert_eq!(total, parse_ether("0.0003").unwrap());
}
