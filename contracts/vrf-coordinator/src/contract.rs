#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    from_json, Binary, Deps, DepsMut, Env, Event, MessageInfo, Reply, Response, StdResult,
    SubMsgResult,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute::{self, FULFILL_REPLY_ID};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, RandomWordsRequest};
use crate::query;
use crate::state::{CoordinatorConfig, DrandConfig, CONFIG, NEXT_REQUEST_ID, NEXT_SUB_ID};

const CONTRACT_NAME: &str = "crates.io:raffle-vrf-coordinator";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let drand = match msg.drand {
        Some(params) => {
            let pubkey = hex::decode(&params.quicknet_pubkey_hex).map_err(|_| {
                ContractError::InvalidHex {
                    field: "quicknet_pubkey_hex".to_string(),
                }
            })?;
            if pubkey.len() != 96 {
                return Err(ContractError::InvalidPubkeyLength { got: pubkey.len() });
            }
            Some(DrandConfig {
                quicknet_pubkey: pubkey,
                genesis_time: params.genesis_time,
                period_seconds: params.period_seconds,
            })
        }
        None => None,
    };

    let operators = msg
        .operators
        .iter()
        .map(|op| deps.api.addr_validate(op))
        .collect::<StdResult<Vec<_>>>()?;

    let config = CoordinatorConfig {
        admin: info.sender.clone(),
        operators,
        base_fee: msg.base_fee,
        gas_price: msg.gas_price,
        allow_mock_fulfillment: msg.allow_mock_fulfillment,
        drand,
    };
    CONFIG.save(deps.storage, &config)?;
    NEXT_SUB_ID.save(deps.storage, &1u64)?;
    NEXT_REQUEST_ID.save(deps.storage, &1u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "vrf-coordinator")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute(
            "allow_mock_fulfillment",
            msg.allow_mock_fulfillment.to_string(),
        ))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateSubscription {} => execute::create_subscription(deps, env, info),
        ExecuteMsg::FundSubscription { sub_id, amount } => {
            execute::fund_subscription(deps, env, info, sub_id, amount)
        }
        ExecuteMsg::AddConsumer { sub_id, consumer } => {
            execute::add_consumer(deps, env, info, sub_id, consumer)
        }
        ExecuteMsg::RemoveConsumer { sub_id, consumer } => {
            execute::remove_consumer(deps, env, info, sub_id, consumer)
        }
        ExecuteMsg::RequestRandomWords {
            key_hash,
            sub_id,
            request_confirmations,
            callback_gas_limit,
            num_words,
        } => execute::request_random_words(
            deps,
            env,
            info,
            RandomWordsRequest {
                key_hash,
                sub_id,
                request_confirmations,
                callback_gas_limit,
                num_words,
            },
        ),
        ExecuteMsg::FulfillRandomWords {
            request_id,
            consumer,
        } => execute::fulfill_random_words(deps, env, info, request_id, consumer),
        ExecuteMsg::FulfillWithBeacon {
            request_id,
            round,
            signature_hex,
        } => execute::fulfill_with_beacon(deps, env, info, request_id, round, signature_hex),
        ExecuteMsg::UpdateOperators { add, remove } => {
            execute::update_operators(deps, env, info, add, remove)
        }
    }
}

/// Records the outcome of a consumer callback. Never fails for a known id, so
/// a reverted consumer does not revert the fulfillment itself.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    if msg.id != FULFILL_REPLY_ID {
        return Err(ContractError::UnknownReplyId { id: msg.id });
    }
    let request_id: u64 = from_json(&msg.payload)?;

    let mut event = Event::new("vrf_random_words_fulfilled")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("timestamp", env.block.time.seconds().to_string());
    let success = match msg.result {
        SubMsgResult::Ok(_) => true,
        SubMsgResult::Err(reason) => {
            event = event.add_attribute("error", reason);
            false
        }
    };
    event = event.add_attribute("success", success.to_string());

    Ok(Response::new()
        .add_attribute("action", "fulfill_callback")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("success", success.to_string())
        .add_event(event))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Subscription { sub_id } => query::query_subscription(deps, sub_id),
        QueryMsg::Request { request_id } => query::query_request(deps, request_id),
        QueryMsg::NextRequestId {} => query::query_next_request_id(deps),
        QueryMsg::RequestPrice { callback_gas_limit } => {
            query::query_request_price(deps, callback_gas_limit)
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
