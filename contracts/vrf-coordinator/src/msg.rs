use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

use crate::state::{CoordinatorConfig, PendingRequest, Subscription};

#[cw_serde]
pub struct InstantiateMsg {
    pub base_fee: Uint128,
    pub gas_price: Uint128,
    pub operators: Vec<String>,
    pub allow_mock_fulfillment: bool,
    pub drand: Option<DrandParams>,
}

#[cw_serde]
pub struct DrandParams {
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub quicknet_pubkey_hex: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    CreateSubscription {},
    /// Credit a subscription. Balance is bookkeeping only, no tokens move.
    FundSubscription { sub_id: u64, amount: Uint128 },
    AddConsumer { sub_id: u64, consumer: String },
    RemoveConsumer { sub_id: u64, consumer: String },
    /// Called by a registered consumer contract.
    RequestRandomWords {
        key_hash: String,
        sub_id: u64,
        request_confirmations: u16,
        callback_gas_limit: u32,
        num_words: u32,
    },
    /// Fulfill with words derived from the request id.
    FulfillRandomWords { request_id: u64, consumer: String },
    /// Fulfill with randomness from a verified drand quicknet beacon (operators only).
    FulfillWithBeacon {
        request_id: u64,
        round: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Update operator list (admin only).
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(CoordinatorConfig)]
    Config {},

    #[returns(Option<Subscription>)]
    Subscription { sub_id: u64 },

    #[returns(Option<PendingRequest>)]
    Request { request_id: u64 },

    /// Id the next `RequestRandomWords` will be assigned.
    #[returns(u64)]
    NextRequestId {},

    /// Fee a fulfillment with this gas limit would charge.
    #[returns(Uint128)]
    RequestPrice { callback_gas_limit: u32 },
}

#[cw_serde]
pub struct MigrateMsg {}

/// Body of `ExecuteMsg::RequestRandomWords`.
pub struct RandomWordsRequest {
    pub key_hash: String,
    pub sub_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
}
