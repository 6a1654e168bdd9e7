//! Built-in network table

use super::NetworkConfig;

/// Network used when none is selected on the command line.
pub const DEFAULT_NETWORK: &str = "localhost";

// (name, rpc url, chain id, SEDA core proxy address)
const BUILTIN: &[(&str, &str, u64, Option<&str>)] = &[
    (
        "base",
        "https://mainnet.base.org",
        8453,
        Some("0xDF1fb5ACe711B16D90FC45776fF1bF02CEBc245D"),
    ),
    (
        "baseSepolia",
        "https://sepolia.base.org",
        84532,
        Some("0xffDB1d9bBE4D56780143428450c4C2058061E6F3"),
    ),
    (
        "gnosisChiado",
        "https://rpc.chiadochain.net",
        10200,
        Some("0xbe2ace709959C121759d553cACf7e6532C25a3aA"),
    ),
    (
        "superseedSepolia",
        "https://sepolia.superseed.xyz",
        53302,
        Some("0xE08989FB730E072689b4885c2a62AE5f1fc787F2"),
    ),
    (
        "hyperliquidPurrsec",
        "https://rpc.hyperliquid-testnet.xyz/evm",
        998,
        Some("0x23c01fe3C1b7409A98bBd39a7c9e5C2263C64b59"),
    ),
    ("localhost", "http://127.0.0.1:8545", 31337, None),
];

pub fn builtin_networks() -> Vec<NetworkConfig> {
    BUILTIN
        .iter()
        .map(|(name, rpc_url, chain_id, core)| NetworkConfig {
            name: name.to_string(),
            rpc_url: rpc_url.to_string(),
            chain_id: *chain_id,
            core_address: core.map(str::to_string),
            price_feed: None,
        })
        .collect()
}

/// Map accepted aliases onto the canonical network name.
pub fn canonical_name(name: &str) -> &str {
    match name {
        "chiado" => "gnosisChiado",
        other => other,
    }
}
