use cosmwasm_std::{
    to_json_binary, Addr, DepsMut, Env, Event, MessageInfo, Response, Storage, SubMsg, Uint128,
    WasmMsg,
};
use raffle_common::randomness::{expand_random_words, mock_seed};
use raffle_common::types::VrfConsumerExecuteMsg;

use crate::error::ContractError;
use crate::msg::RandomWordsRequest;
use crate::state::{
    CoordinatorConfig, PendingRequest, Subscription, CONFIG, NEXT_REQUEST_ID, NEXT_SUB_ID,
    REQUESTS, SUBSCRIPTIONS, USED_BEACON_ROUNDS,
};
use crate::verify::verify_quicknet_beacon;

pub const FULFILL_REPLY_ID: u64 = 1;

pub const MAX_NUM_WORDS: u32 = 500;
pub const MIN_REQUEST_CONFIRMATIONS: u16 = 3;
pub const MAX_REQUEST_CONFIRMATIONS: u16 = 200;
pub const MAX_CONSUMERS: usize = 100;

const GAS_PRICE_SCALE: u128 = 1_000_000_000;

/// Fee for one fulfillment: `base_fee + gas_price * callback_gas_limit / 10^9`.
pub fn request_price(
    config: &CoordinatorConfig,
    callback_gas_limit: u32,
) -> Result<Uint128, ContractError> {
    let gas_cost = config
        .gas_price
        .checked_mul(Uint128::from(callback_gas_limit))?
        / Uint128::new(GAS_PRICE_SCALE);
    Ok(config.base_fee.checked_add(gas_cost)?)
}

fn load_subscription(storage: &dyn Storage, sub_id: u64) -> Result<Subscription, ContractError> {
    SUBSCRIPTIONS
        .may_load(storage, sub_id)?
        .ok_or(ContractError::InvalidSubscription { sub_id })
}

fn only_owner(sub: &Subscription, sender: &Addr) -> Result<(), ContractError> {
    if &sub.owner != sender {
        return Err(ContractError::Unauthorized {
            reason: format!("only the owner of subscription {} can do this", sub.id),
        });
    }
    Ok(())
}

pub fn create_subscription(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let sub_id = NEXT_SUB_ID.load(deps.storage)?;
    NEXT_SUB_ID.save(deps.storage, &(sub_id + 1))?;

    let sub = Subscription {
        id: sub_id,
        owner: info.sender.clone(),
        balance: Uint128::zero(),
        consumers: vec![],
        request_count: 0,
    };
    SUBSCRIPTIONS.save(deps.storage, sub_id, &sub)?;

    Ok(Response::new()
        .add_attribute("action", "create_subscription")
        .add_attribute("sub_id", sub_id.to_string())
        .add_event(
            Event::new("vrf_subscription_created")
                .add_attribute("sub_id", sub_id.to_string())
                .add_attribute("owner", info.sender.to_string()),
        ))
}

pub fn fund_subscription(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    sub_id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let mut sub = load_subscription(deps.storage, sub_id)?;
    let old_balance = sub.balance;
    sub.balance = sub.balance.checked_add(amount)?;
    SUBSCRIPTIONS.save(deps.storage, sub_id, &sub)?;

    Ok(Response::new()
        .add_attribute("action", "fund_subscription")
        .add_attribute("sub_id", sub_id.to_string())
        .add_event(
            Event::new("vrf_subscription_funded")
                .add_attribute("sub_id", sub_id.to_string())
                .add_attribute("old_balance", old_balance.to_string())
                .add_attribute("new_balance", sub.balance.to_string()),
        ))
}

pub fn add_consumer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    sub_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let mut sub = load_subscription(deps.storage, sub_id)?;
    only_owner(&sub, &info.sender)?;

    let consumer_addr = deps.api.addr_validate(&consumer)?;
    if !sub.consumers.contains(&consumer_addr) {
        if sub.consumers.len() >= MAX_CONSUMERS {
            return Err(ContractError::TooManyConsumers {
                sub_id,
                max: MAX_CONSUMERS,
            });
        }
        sub.consumers.push(consumer_addr);
        SUBSCRIPTIONS.save(deps.storage, sub_id, &sub)?;
    }

    Ok(Response::new()
        .add_attribute("action", "add_consumer")
        .add_attribute("sub_id", sub_id.to_string())
        .add_attribute("consumer", consumer))
}

pub fn remove_consumer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    sub_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let mut sub = load_subscription(deps.storage, sub_id)?;
    only_owner(&sub, &info.sender)?;

    let consumer_addr = deps.api.addr_validate(&consumer)?;
    if !sub.consumers.contains(&consumer_addr) {
        return Err(ContractError::InvalidConsumer { sub_id, consumer });
    }
    sub.consumers.retain(|c| c != &consumer_addr);
    SUBSCRIPTIONS.save(deps.storage, sub_id, &sub)?;

    Ok(Response::new()
        .add_attribute("action", "remove_consumer")
        .add_attribute("sub_id", sub_id.to_string())
        .add_attribute("consumer", consumer))
}

/// Register a randomness request from a consumer contract.
pub fn request_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request: RandomWordsRequest,
) -> Result<Response, ContractError> {
    let RandomWordsRequest {
        key_hash,
        sub_id,
        request_confirmations,
        callback_gas_limit,
        num_words,
    } = request;

    let mut sub = load_subscription(deps.storage, sub_id)?;
    if !sub.consumers.contains(&info.sender) {
        return Err(ContractError::InvalidConsumer {
            sub_id,
            consumer: info.sender.to_string(),
        });
    }
    if num_words == 0 || num_words > MAX_NUM_WORDS {
        return Err(ContractError::InvalidNumWords {
            have: num_words,
            max: MAX_NUM_WORDS,
        });
    }
    if !(MIN_REQUEST_CONFIRMATIONS..=MAX_REQUEST_CONFIRMATIONS).contains(&request_confirmations) {
        return Err(ContractError::InvalidRequestConfirmations {
            have: request_confirmations,
            min: MIN_REQUEST_CONFIRMATIONS,
            max: MAX_REQUEST_CONFIRMATIONS,
        });
    }

    let request_id = NEXT_REQUEST_ID.load(deps.storage)?;
    NEXT_REQUEST_ID.save(deps.storage, &(request_id + 1))?;

    let pending = PendingRequest {
        request_id,
        sub_id,
        consumer: info.sender.clone(),
        key_hash: key_hash.clone(),
        request_confirmations,
        callback_gas_limit,
        num_words,
        requested_at: env.block.time,
    };
    REQUESTS.save(deps.storage, request_id, &pending)?;

    sub.request_count += 1;
    SUBSCRIPTIONS.save(deps.storage, sub_id, &sub)?;

    Ok(Response::new()
        .add_attribute("action", "request_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("vrf_random_words_requested")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("sub_id", sub_id.to_string())
                .add_attribute("consumer", info.sender.to_string())
                .add_attribute("key_hash", key_hash)
                .add_attribute("num_words", num_words.to_string())
                .add_attribute("callback_gas_limit", callback_gas_limit.to_string()),
        ))
}

/// Fulfill with words derived from the request id. Only enabled on
/// development deployments; anyone may call it there.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    request_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if !config.allow_mock_fulfillment {
        return Err(ContractError::MockFulfillmentDisabled);
    }

    let request = REQUESTS
        .may_load(deps.storage, request_id)?
        .ok_or(ContractError::NonexistentRequest { request_id })?;

    // a request only exists for the consumer that made it
    let consumer_addr = deps.api.addr_validate(&consumer)?;
    if consumer_addr != request.consumer {
        return Err(ContractError::NonexistentRequest { request_id });
    }

    dispatch_fulfillment(deps, env, &config, request, mock_seed(request_id), "mock")
}

/// Fulfill with a verified drand quicknet beacon. Operators only.
///
/// The beacon round must be published after the request was made, and each
/// round can back a single request.
pub fn fulfill_with_beacon(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    round: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can submit beacons".to_string(),
        });
    }
    let drand = config
        .drand
        .as_ref()
        .ok_or(ContractError::BeaconNotConfigured)?;

    let request = REQUESTS
        .may_load(deps.storage, request_id)?
        .ok_or(ContractError::NonexistentRequest { request_id })?;

    if USED_BEACON_ROUNDS.has(deps.storage, round) {
        return Err(ContractError::BeaconAlreadyUsed { round });
    }

    let round_time = drand
        .round_time(round)
        .ok_or(ContractError::RoundOutOfRange { round })?;
    if round_time <= request.requested_at.seconds() {
        return Err(ContractError::BeaconTooEarly {
            round,
            round_time,
            request_id,
            requested_at: request.requested_at.seconds(),
        });
    }

    let signature = hex::decode(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;
    let randomness = verify_quicknet_beacon(&drand.quicknet_pubkey, round, &signature)
        .map_err(|e| ContractError::VerificationFailed {
            reason: e.to_string(),
        })?;

    USED_BEACON_ROUNDS.save(deps.storage, round, &request_id)?;

    let response = dispatch_fulfillment(deps, env, &config, request, randomness, "drand")?;
    Ok(response.add_attribute("drand_round", round.to_string()))
}

/// Charge the subscription, drop the pending request and call the consumer.
///
/// The consumer callback runs as a reply-always sub-message: a failing
/// consumer is reverted on its own and recorded in `reply`, it does not undo
/// the charge.
fn dispatch_fulfillment(
    deps: DepsMut,
    env: Env,
    config: &CoordinatorConfig,
    request: PendingRequest,
    seed: [u8; 32],
    source: &str,
) -> Result<Response, ContractError> {
    let request_id = request.request_id;
    let payment = request_price(config, request.callback_gas_limit)?;

    let mut sub = load_subscription(deps.storage, request.sub_id)?;
    if sub.balance < payment {
        return Err(ContractError::InsufficientBalance {
            needed: payment,
            available: sub.balance,
        });
    }
    sub.balance -= payment;
    SUBSCRIPTIONS.save(deps.storage, sub.id, &sub)?;
    REQUESTS.remove(deps.storage, request_id);

    let random_words = expand_random_words(&seed, request.num_words);
    let callback = WasmMsg::Execute {
        contract_addr: request.consumer.to_string(),
        msg: to_json_binary(&VrfConsumerExecuteMsg::RawFulfillRandomWords {
            request_id,
            random_words,
        })?,
        funds: vec![],
    };
    let sub_msg = SubMsg::reply_always(callback, FULFILL_REPLY_ID)
        .with_gas_limit(u64::from(request.callback_gas_limit))
        .with_payload(to_json_binary(&request_id)?);

    Ok(Response::new()
        .add_submessage(sub_msg)
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("source", source)
        .add_event(
            Event::new("vrf_fulfillment_dispatched")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("consumer", request.consumer.to_string())
                .add_attribute("payment", payment.to_string())
                .add_attribute("source", source)
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.operators.retain(|a| a != &addr);
    }
    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.operators.contains(&addr) {
            config.operators.push(addr);
        }
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}
