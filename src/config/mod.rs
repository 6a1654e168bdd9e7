//! Network and contract-address configuration
//!
//! Built-in networks live in [`networks`]; an optional TOML file can override
//! any field or add networks of its own.

mod networks;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use serde::Deserialize;
use thiserror::Error;

pub use networks::{builtin_networks, canonical_name, DEFAULT_NETWORK};

/// Environment variable that replaces the selected network's RPC endpoint.
pub const RPC_URL_ENV: &str = "PRICEFEED_RPC_URL";

/// Default location of deployment records, relative to the working directory.
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "ignition/deployments";

/// Errors raised while loading or querying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("unknown network '{name}' (known networks: {known})")]
    UnknownNetwork { name: String, known: String },
    #[error("network '{0}' is missing rpc_url or chain_id")]
    IncompleteNetwork(String),
    #[error("invalid {field} address for network '{network}': {value}")]
    InvalidAddress {
        network: String,
        field: &'static str,
        value: String,
    },
}

/// A resolved network entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
    pub core_address: Option<String>,
    pub price_feed: Option<String>,
}

impl NetworkConfig {
    pub fn core_address(&self) -> Result<Option<Address>, ConfigError> {
        self.parse_address("core_address", self.core_address.as_deref())
    }

    pub fn price_feed(&self) -> Result<Option<Address>, ConfigError> {
        self.parse_address("price_feed", self.price_feed.as_deref())
    }

    /// Replace the RPC URL with `url` when it is set and non-empty.
    pub fn with_rpc_override(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) {
            self.rpc_url = url.to_string();
        }
        self
    }

    fn parse_address(
        &self,
        field: &'static str,
        value: Option<&str>,
    ) -> Result<Option<Address>, ConfigError> {
        let Some(value) = value else {
            return Ok(None);
        };
        value
            .trim()
            .parse::<Address>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidAddress {
                network: self.name.clone(),
                field,
                value: value.to_string(),
            })
    }
}

/// Per-network overrides as written in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkOverride {
    pub rpc_url: Option<String>,
    pub chain_id: Option<u64>,
    pub core_address: Option<String>,
    pub price_feed: Option<String>,
}

/// On-disk configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub deployments_dir: Option<String>,

    #[serde(default)]
    pub networks: BTreeMap<String, NetworkOverride>,
}

/// Fully merged configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub deployments_dir: PathBuf,
    networks: BTreeMap<String, NetworkConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deployments_dir: PathBuf::from(DEFAULT_DEPLOYMENTS_DIR),
            networks: builtin_networks()
                .into_iter()
                .map(|network| (network.name.clone(), network))
                .collect(),
        }
    }
}

impl Config {
    /// Merge a config file over the built-in network table.
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let Self {
            deployments_dir,
            mut networks,
        } = Self::default();

        for (name, patch) in file.networks {
            let name = canonical_name(&name).to_string();
            match networks.get_mut(&name) {
                Some(existing) => {
                    if let Some(rpc_url) = patch.rpc_url {
                        existing.rpc_url = rpc_url;
                    }
                    if let Some(chain_id) = patch.chain_id {
                        existing.chain_id = chain_id;
                    }
                    if patch.core_address.is_some() {
                        existing.core_address = patch.core_address;
                    }
                    if patch.price_feed.is_some() {
                        existing.price_feed = patch.price_feed;
                    }
                }
                None => {
                    let (Some(rpc_url), Some(chain_id)) = (patch.rpc_url, patch.chain_id) else {
                        return Err(ConfigError::IncompleteNetwork(name));
                    };
                    networks.insert(
                        name.clone(),
                        NetworkConfig {
                            name,
                            rpc_url,
                            chain_id,
                            core_address: patch.core_address,
                            price_feed: patch.price_feed,
                        },
                    );
                }
            }
        }

        Ok(Self {
            deployments_dir: file
                .deployments_dir
                .map(PathBuf::from)
                .unwrap_or(deployments_dir),
            networks,
        })
    }

    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
        self.networks
            .get(canonical_name(name))
            .ok_or_else(|| ConfigError::UnknownNetwork {
                name: name.to_string(),
                known: self.network_names().join(", "),
            })
    }

    pub fn networks(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.networks.values()
    }

    pub fn network_names(&self) -> Vec<&str> {
        self.networks.keys().map(String::as_str).collect()
    }
}

/// Load configuration from the default path, if a file exists there.
pub fn load() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) if path.exists() => load_from(&path),
        _ => Ok(Config::default()),
    }
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = toml::from_str::<ConfigFile>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Config::from_file(file)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("PRICEFEED_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("pricefeed").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("pricefeed").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "seda", "pricefeed")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
