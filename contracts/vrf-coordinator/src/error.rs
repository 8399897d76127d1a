use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid subscription {sub_id}")]
    InvalidSubscription { sub_id: u64 },

    #[error("{consumer} is not a consumer of subscription {sub_id}")]
    InvalidConsumer { sub_id: u64, consumer: String },

    #[error("subscription {sub_id} already has {max} consumers")]
    TooManyConsumers { sub_id: u64, max: usize },

    #[error("nonexistent request {request_id}")]
    NonexistentRequest { request_id: u64 },

    #[error("num_words {have} out of range (1..={max})")]
    InvalidNumWords { have: u32, max: u32 },

    #[error("request_confirmations {have} out of range ({min}..={max})")]
    InvalidRequestConfirmations { have: u16, min: u16, max: u16 },

    #[error("insufficient subscription balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Uint128, available: Uint128 },

    #[error("mock fulfillment is disabled on this coordinator")]
    MockFulfillmentDisabled,

    #[error("drand beacon verification is not configured")]
    BeaconNotConfigured,

    #[error("beacon round {round} already used")]
    BeaconAlreadyUsed { round: u64 },

    #[error("beacon round {round} was published at {round_time}, before request {request_id} at {requested_at}")]
    BeaconTooEarly {
        round: u64,
        round_time: u64,
        request_id: u64,
        requested_at: u64,
    },

    #[error("beacon round {round} is out of range")]
    RoundOutOfRange { round: u64 },

    #[error("BLS verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("invalid pubkey length: expected 96 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}
