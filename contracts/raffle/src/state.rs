use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, Timestamp, Uint256};
use cw_storage_plus::{Item, Map};
use raffle_common::RaffleStatus;

pub const CONFIG: Item<RaffleConfig> = Item::new("config");
pub const RAFFLE_STATE: Item<RaffleState> = Item::new("raffle_state");
/// (round, entry index) -> player. A round's entries are never rewritten.
pub const PLAYERS: Map<(u64, u32), Addr> = Map::new("players");
pub const ROUND_RESULTS: Map<u64, RoundResult> = Map::new("round_results");

/// Set at instantiation and never updated.
#[cw_serde]
pub struct RaffleConfig {
    pub entrance_fee: Coin,
    /// Minimum seconds between the last draw and the next upkeep
    pub interval_seconds: u64,
    pub vrf_coordinator: Addr,
    /// Oracle lane, hex-encoded 32 bytes
    pub key_hash: String,
    pub subscription_id: u64,
    pub callback_gas_limit: u32,
    pub request_confirmations: u16,
    pub num_words: u32,
}

#[cw_serde]
pub struct RaffleState {
    pub status: RaffleStatus,
    /// Index of the current cycle; bumped on every completed draw
    pub round: u64,
    pub num_players: u32,
    pub last_timestamp: Timestamp,
    pub recent_winner: Option<Addr>,
    /// Outstanding request id while calculating
    pub pending_request: Option<u64>,
}

#[cw_serde]
pub struct RoundResult {
    pub round: u64,
    pub winner: Addr,
    pub winner_index: u32,
    pub num_players: u32,
    pub prize: Coin,
    pub request_id: u64,
    pub random_word: Uint256,
    pub finished_at: Timestamp,
}
