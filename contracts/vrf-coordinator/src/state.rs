use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<CoordinatorConfig> = Item::new("config");
pub const SUBSCRIPTIONS: Map<u64, Subscription> = Map::new("subscriptions");
pub const NEXT_SUB_ID: Item<u64> = Item::new("next_sub_id");
pub const REQUESTS: Map<u64, PendingRequest> = Map::new("requests");
pub const NEXT_REQUEST_ID: Item<u64> = Item::new("next_request_id");
/// drand round -> request id it fulfilled
pub const USED_BEACON_ROUNDS: Map<u64, u64> = Map::new("used_rounds");

#[cw_serde]
pub struct CoordinatorConfig {
    pub admin: Addr,
    pub operators: Vec<Addr>,
    /// Flat premium charged per fulfillment
    pub base_fee: Uint128,
    /// Price per unit of callback gas, scaled by 10^9
    pub gas_price: Uint128,
    /// Anyone may fulfill with request-derived words. Development chains only.
    pub allow_mock_fulfillment: bool,
    pub drand: Option<DrandConfig>,
}

#[cw_serde]
pub struct DrandConfig {
    /// Quicknet public key, 96 bytes (G2 point)
    pub quicknet_pubkey: Vec<u8>,
    /// Genesis time of the drand network (unix seconds)
    pub genesis_time: u64,
    pub period_seconds: u64,
}

impl DrandConfig {
    /// Unix time at which `round` is published. `None` past `u64` seconds.
    pub fn round_time(&self, round: u64) -> Option<u64> {
        round
            .saturating_sub(1)
            .checked_mul(self.period_seconds)?
            .checked_add(self.genesis_time)
    }
}

#[cw_serde]
pub struct Subscription {
    pub id: u64,
    pub owner: Addr,
    pub balance: Uint128,
    pub consumers: Vec<Addr>,
    pub request_count: u64,
}

#[cw_serde]
pub struct PendingRequest {
    pub request_id: u64,
    pub sub_id: u64,
    pub consumer: Addr,
    pub key_hash: String,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
    pub requested_at: Timestamp,
}
