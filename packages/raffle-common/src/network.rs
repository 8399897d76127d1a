use cosmwasm_std::{Coin, Uint128};

/// Denom raffle entries and payouts are made in.
pub const NATIVE_DENOM: &str = "inj";

/// One whole unit of the native denom (18 decimals).
pub const ONE_UNIT: u128 = 1_000_000_000_000_000_000;

/// Flat premium the coordinator charges per fulfillment (0.25 units).
pub const BASE_FEE: u128 = ONE_UNIT / 4;
/// Price per unit of callback gas, scaled by 10^9.
pub const GAS_PRICE: u128 = 1_000_000_000;
/// Amount a freshly created subscription is funded with on development chains.
pub const VRF_SUB_FUND_AMOUNT: u128 = 30 * ONE_UNIT;

/// Chains where the coordinator is deployed by us with mock fulfillment enabled.
pub const DEVELOPMENT_CHAINS: &[&str] = &["cosmos-testnet-14002", "localinjective"];

/// Per-chain deployment parameters for the raffle and its coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: &'static str,
    pub chain_id: &'static str,
    /// Entrance fee in base units of [`NATIVE_DENOM`]
    pub entrance_fee: u128,
    pub interval_seconds: u64,
    /// Oracle lane, hex-encoded 32 bytes
    pub key_hash: &'static str,
    pub callback_gas_limit: u32,
    pub request_confirmations: u16,
    pub num_words: u32,
    /// Pre-existing subscription on live chains. `None` means create one.
    pub subscription_id: Option<u64>,
    /// Pre-deployed coordinator on live chains. `None` means deploy one.
    pub vrf_coordinator: Option<&'static str>,
    /// Blocks to wait for after deployment before considering it final.
    pub block_confirmations: u32,
}

impl NetworkConfig {
    pub fn entrance_fee_coin(&self) -> Coin {
        Coin {
            denom: NATIVE_DENOM.to_string(),
            amount: Uint128::new(self.entrance_fee),
        }
    }

    pub fn is_development(&self) -> bool {
        is_development_chain(self.chain_id)
    }
}

const DEFAULT_KEY_HASH: &str = "d89b2bf150e3b9e13446986e571fb9cab24b13cea0a43ea20a6049a85cc807cc";

pub const NETWORKS: &[NetworkConfig] = &[
    NetworkConfig {
        name: "local",
        chain_id: "cosmos-testnet-14002",
        entrance_fee: ONE_UNIT / 100,
        interval_seconds: 30,
        key_hash: DEFAULT_KEY_HASH,
        callback_gas_limit: 500_000,
        request_confirmations: 3,
        num_words: 1,
        subscription_id: None,
        vrf_coordinator: None,
        block_confirmations: 1,
    },
    NetworkConfig {
        name: "localinjective",
        chain_id: "localinjective",
        entrance_fee: ONE_UNIT / 100,
        interval_seconds: 30,
        key_hash: DEFAULT_KEY_HASH,
        callback_gas_limit: 500_000,
        request_confirmations: 3,
        num_words: 1,
        subscription_id: None,
        vrf_coordinator: None,
        block_confirmations: 1,
    },
    NetworkConfig {
        name: "injective-testnet",
        chain_id: "injective-888",
        entrance_fee: ONE_UNIT / 100,
        interval_seconds: 30,
        key_hash: DEFAULT_KEY_HASH,
        callback_gas_limit: 500_000,
        request_confirmations: 3,
        num_words: 1,
        subscription_id: None,
        vrf_coordinator: None,
        block_confirmations: 6,
    },
];

pub fn is_development_chain(chain_id: &str) -> bool {
    DEVELOPMENT_CHAINS.contains(&chain_id)
}

pub fn network_config(chain_id: &str) -> Option<&'static NetworkConfig> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}
