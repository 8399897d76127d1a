use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, Timestamp, Uint256};
use raffle_common::RaffleStatus;

use crate::state::{RaffleConfig, RaffleState, RoundResult};

#[cw_serde]
pub struct InstantiateMsg {
    pub entrance_fee: Coin,
    pub interval_seconds: u64,
    pub vrf_coordinator: String,
    /// Hex-encoded 32-byte oracle lane
    pub key_hash: String,
    pub subscription_id: u64,
    pub callback_gas_limit: u32,
    pub request_confirmations: u16,
    pub num_words: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Enter the current round. Must send at least the entrance fee.
    EnterRaffle {},
    /// Close the round and request randomness. Anyone can call once
    /// `CheckUpkeep` reports `upkeep_needed`.
    PerformUpkeep {},
    /// Coordinator callback. Same shape as `VrfConsumerExecuteMsg`.
    RawFulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}

/// Query message for the VRF coordinator contract.
#[cw_serde]
pub enum CoordinatorQueryMsg {
    NextRequestId {},
}

/// Execute message for the VRF coordinator contract.
#[cw_serde]
pub enum CoordinatorExecuteMsg {
    RequestRandomWords {
        key_hash: String,
        sub_id: u64,
        request_confirmations: u16,
        callback_gas_limit: u32,
        num_words: u32,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RaffleConfig)]
    Config {},
    #[returns(RaffleState)]
    State {},
    #[returns(Coin)]
    EntranceFee {},
    #[returns(u64)]
    Interval {},
    #[returns(RaffleStatus)]
    RaffleStatus {},
    #[returns(Option<Addr>)]
    RecentWinner {},
    #[returns(Addr)]
    Player { index: u32 },
    #[returns(PlayersResponse)]
    Players {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(u32)]
    NumberOfPlayers {},
    #[returns(Timestamp)]
    LatestTimestamp {},
    #[returns(Option<u64>)]
    PendingRequest {},
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep {},
    #[returns(Option<RoundResult>)]
    RoundResult { round: u64 },
    #[returns(RoundHistoryResponse)]
    RoundHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct PlayersResponse {
    pub round: u64,
    pub players: Vec<Addr>,
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    pub is_open: bool,
    pub time_passed: bool,
    pub has_players: bool,
    pub has_balance: bool,
    pub balance: Coin,
    pub num_players: u32,
    pub status: RaffleStatus,
}

#[cw_serde]
pub struct RoundHistoryResponse {
    pub results: Vec<RoundResult>,
}

#[cw_serde]
pub struct MigrateMsg {}
