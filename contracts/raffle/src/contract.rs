#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult, SubMsgResult,
};
use cw2::{get_contract_version, set_contract_version};
use raffle_common::RaffleStatus;

use crate::error::ContractError;
use crate::execute::{self, PAYOUT_REPLY_ID};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{RaffleConfig, RaffleState, CONFIG, RAFFLE_STATE};

const CONTRACT_NAME: &str = "crates.io:raffle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

// Limits enforced by the coordinator on every request.
const MAX_NUM_WORDS: u32 = 500;
const MIN_REQUEST_CONFIRMATIONS: u16 = 3;
const MAX_REQUEST_CONFIRMATIONS: u16 = 200;

fn validate_instantiate_msg(msg: &InstantiateMsg) -> Result<(), ContractError> {
    if msg.entrance_fee.amount.is_zero() {
        return Err(ContractError::InvalidConfig {
            reason: "entrance fee must be positive".to_string(),
        });
    }
    if msg.interval_seconds == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "interval must be positive".to_string(),
        });
    }
    if msg.num_words == 0 || msg.num_words > MAX_NUM_WORDS {
        return Err(ContractError::InvalidConfig {
            reason: format!("num_words must be in 1..={}", MAX_NUM_WORDS),
        });
    }
    if !(MIN_REQUEST_CONFIRMATIONS..=MAX_REQUEST_CONFIRMATIONS)
        .contains(&msg.request_confirmations)
    {
        return Err(ContractError::InvalidConfig {
            reason: format!(
                "request confirmations must be in {}..={}",
                MIN_REQUEST_CONFIRMATIONS, MAX_REQUEST_CONFIRMATIONS
            ),
        });
    }
    if msg.callback_gas_limit == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "callback gas limit must be positive".to_string(),
        });
    }
    let key_hash = hex::decode(&msg.key_hash).map_err(|_| ContractError::InvalidHex {
        field: "key_hash".to_string(),
    })?;
    if key_hash.len() != 32 {
        return Err(ContractError::InvalidConfig {
            reason: format!("key hash must be 32 bytes, got {}", key_hash.len()),
        });
    }
    Ok(())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    validate_instantiate_msg(&msg)?;

    let config = RaffleConfig {
        entrance_fee: msg.entrance_fee,
        interval_seconds: msg.interval_seconds,
        vrf_coordinator: deps.api.addr_validate(&msg.vrf_coordinator)?,
        key_hash: msg.key_hash.to_lowercase(),
        subscription_id: msg.subscription_id,
        callback_gas_limit: msg.callback_gas_limit,
        request_confirmations: msg.request_confirmations,
        num_words: msg.num_words,
    };
    CONFIG.save(deps.storage, &config)?;

    let state = RaffleState {
        status: RaffleStatus::Open,
        round: 0,
        num_players: 0,
        last_timestamp: env.block.time,
        recent_winner: None,
        pending_request: None,
    };
    RAFFLE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "raffle")
        .add_attribute("creator", info.sender.to_string())
        .add_attribute("entrance_fee", config.entrance_fee.to_string())
        .add_attribute("interval_seconds", config.interval_seconds.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::EnterRaffle {} => execute::enter_raffle(deps, env, info),
        ExecuteMsg::PerformUpkeep {} => execute::perform_upkeep(deps, env, info),
        ExecuteMsg::RawFulfillRandomWords {
            request_id,
            random_words,
        } => execute::fulfill_random_words(deps, env, info, request_id, random_words),
    }
}

/// Turns a failed prize transfer into an error so the whole fulfillment,
/// including the round reset, is reverted.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match (msg.id, msg.result) {
        (PAYOUT_REPLY_ID, SubMsgResult::Err(reason)) => {
            Err(ContractError::TransferFailed { reason })
        }
        (PAYOUT_REPLY_ID, SubMsgResult::Ok(_)) => Ok(Response::new()),
        (id, _) => Err(ContractError::UnknownReplyId { id }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::State {} => query::query_state(deps),
        QueryMsg::EntranceFee {} => query::query_entrance_fee(deps),
        QueryMsg::Interval {} => query::query_interval(deps),
        QueryMsg::RaffleStatus {} => query::query_raffle_status(deps),
        QueryMsg::RecentWinner {} => query::query_recent_winner(deps),
        QueryMsg::Player { index } => query::query_player(deps, index),
        QueryMsg::Players { start_after, limit } => {
            query::query_players(deps, start_after, limit)
        }
        QueryMsg::NumberOfPlayers {} => query::query_number_of_players(deps),
        QueryMsg::LatestTimestamp {} => query::query_latest_timestamp(deps),
        QueryMsg::PendingRequest {} => query::query_pending_request(deps),
        QueryMsg::CheckUpkeep {} => query::query_check_upkeep(deps, env),
        QueryMsg::RoundResult { round } => query::query_round_result(deps, round),
        QueryMsg::RoundHistory { start_after, limit } => {
            query::query_round_history(deps, start_after, limit)
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "cannot migrate from a different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
