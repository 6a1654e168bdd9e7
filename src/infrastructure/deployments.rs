//! Deployment records
//!
//! Reads `<dir>/chain-<id>/deployed_addresses.json`, a flat JSON object of
//! `"<Module>#<Contract>" -> address` as written by the deploy tooling.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("failed to read deployment record {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed deployment record {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid address for {key} in {path}: {value}")]
    InvalidAddress {
        path: PathBuf,
        key: String,
        value: String,
    },
}

pub fn record_path(dir: &Path, chain_id: u64) -> PathBuf {
    dir.join(format!("chain-{chain_id}"))
        .join("deployed_addresses.json")
}

/// Look up the deployed address of `contract` on `chain_id`.
///
/// Returns `Ok(None)` when there is no record for the chain or the record has
/// no entry for the contract. When several modules deployed the contract, the
/// lexicographically first key wins.
pub fn find_deployed(
    dir: &Path,
    chain_id: u64,
    contract: &str,
) -> Result<Option<Address>, DeploymentError> {
    let path = record_path(dir, chain_id);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(DeploymentError::Read { path, source }),
    };
    let entries: BTreeMap<String, String> = serde_json::from_str(&content)
        .map_err(|source| DeploymentError::Parse {
            path: path.clone(),
            source,
        })?;

    let Some((key, value)) = entries
        .iter()
        .find(|(key, _)| contract_name(key) == contract)
    else {
        return Ok(None);
    };

    value
        .trim()
        .parse::<Address>()
        .map(Some)
        .map_err(|_| DeploymentError::InvalidAddress {
            path,
            key: key.clone(),
            value: value.clone(),
        })
}

fn contract_name(key: &str) -> &str {
    key.rsplit_once('#').map_or(key, |(_, name)| name)
}
