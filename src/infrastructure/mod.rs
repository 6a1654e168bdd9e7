//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy-based PriceFeed client with a local signer
//! - Deployment record lookup

pub mod deployments;
pub mod ethereum;
