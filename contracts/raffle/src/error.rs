use cosmwasm_std::{OverflowError, StdError, Uint128};
use raffle_common::RaffleStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("insufficient payment: entrance fee is {required}, sent {sent}")]
    InsufficientPayment { required: Uint128, sent: Uint128 },

    #[error("raffle only accepts {expected}, got {denom}")]
    WrongDenom { expected: String, denom: String },

    #[error("raffle is not open")]
    NotOpen,

    #[error("round already holds the maximum of {max} players")]
    TooManyPlayers { max: u32 },

    #[error("upkeep not needed (balance: {balance}, players: {num_players}, status: {status})")]
    UpkeepNotNeeded {
        balance: Uint128,
        num_players: u32,
        status: RaffleStatus,
    },

    #[error("only the coordinator {want} can fulfill, got {have}")]
    OnlyCoordinatorCanFulfill { have: String, want: String },

    #[error("unknown randomness request {request_id}")]
    UnknownRequest { request_id: u64 },

    #[error("fulfillment carried no random words")]
    NoRandomWords,

    #[error("prize transfer failed: {reason}")]
    TransferFailed { reason: String },

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}
