//! CLI task modules
//!
//! - transmit: call `transmit` on the PriceFeed contract and report the request id
//! - networks: list the configured networks and their contract addresses
//! - tally: aggregate revealed price vectors into their per-index median

pub mod networks;
pub mod tally;
pub mod transmit;
