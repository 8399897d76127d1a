use cosmwasm_std::{
    to_json_binary, BankMsg, Deps, DepsMut, Env, Event, MessageInfo, Response, StdResult, SubMsg,
    Uint128, Uint256, WasmMsg,
};
use raffle_common::{winner_index, RaffleStatus};

use crate::error::ContractError;
use crate::msg::{CheckUpkeepResponse, CoordinatorExecuteMsg, CoordinatorQueryMsg};
use crate::state::{RaffleConfig, RoundResult, CONFIG, PLAYERS, RAFFLE_STATE, ROUND_RESULTS};

pub const PAYOUT_REPLY_ID: u64 = 1;

/// Amount of the fee denom in `info.funds`. Any other denom is rejected so
/// it cannot get stuck in the pot.
fn paid_amount(info: &MessageInfo, config: &RaffleConfig) -> Result<Uint128, ContractError> {
    let denom = &config.entrance_fee.denom;
    let mut paid = Uint128::zero();
    for coin in &info.funds {
        if &coin.denom != denom {
            return Err(ContractError::WrongDenom {
                expected: denom.clone(),
                denom: coin.denom.clone(),
            });
        }
        paid = paid.checked_add(coin.amount)?;
    }
    Ok(paid)
}

/// Evaluate the four upkeep conditions. Read-only.
///
/// upkeep_needed = is_open && time_passed && has_players && has_balance
pub fn check_upkeep(deps: Deps, env: &Env) -> StdResult<CheckUpkeepResponse> {
    let config = CONFIG.load(deps.storage)?;
    let state = RAFFLE_STATE.load(deps.storage)?;
    let balance = deps
        .querier
        .query_balance(&env.contract.address, &config.entrance_fee.denom)?;

    let elapsed = env
        .block
        .time
        .seconds()
        .saturating_sub(state.last_timestamp.seconds());

    let is_open = state.status == RaffleStatus::Open;
    let time_passed = elapsed > config.interval_seconds;
    let has_players = state.num_players > 0;
    let has_balance = !balance.amount.is_zero();

    Ok(CheckUpkeepResponse {
        upkeep_needed: is_open && time_passed && has_players && has_balance,
        is_open,
        time_passed,
        has_players,
        has_balance,
        balance,
        num_players: state.num_players,
        status: state.status,
    })
}

/// Append the sender to the current round.
pub fn enter_raffle(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let paid = paid_amount(&info, &config)?;

    if paid < config.entrance_fee.amount {
        return Err(ContractError::InsufficientPayment {
            required: config.entrance_fee.amount,
            sent: paid,
        });
    }

    let mut state = RAFFLE_STATE.load(deps.storage)?;
    if state.status != RaffleStatus::Open {
        return Err(ContractError::NotOpen);
    }

    let index = state.num_players;
    state.num_players = index
        .checked_add(1)
        .ok_or(ContractError::TooManyPlayers { max: u32::MAX })?;
    PLAYERS.save(deps.storage, (state.round, index), &info.sender)?;
    RAFFLE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "enter_raffle")
        .add_attribute("player", info.sender.to_string())
        .add_event(
            Event::new("raffle_entered")
                .add_attribute("player", info.sender.to_string())
                .add_attribute("round", state.round.to_string())
                .add_attribute("index", index.to_string())
                .add_attribute("amount", paid.to_string()),
        ))
}

/// Close the round and ask the coordinator for randomness.
///
/// The request id is read from the coordinator in the same transaction that
/// sends the request, so it is the id the coordinator will assign.
pub fn perform_upkeep(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
) -> Result<Response, ContractError> {
    let check = check_upkeep(deps.as_ref(), &env)?;
    if !check.upkeep_needed {
        return Err(ContractError::UpkeepNotNeeded {
            balance: check.balance.amount,
            num_players: check.num_players,
            status: check.status,
        });
    }

    let config = CONFIG.load(deps.storage)?;
    let request_id: u64 = deps.querier.query_wasm_smart(
        config.vrf_coordinator.to_string(),
        &CoordinatorQueryMsg::NextRequestId {},
    )?;

    let mut state = RAFFLE_STATE.load(deps.storage)?;
    state.status = RaffleStatus::Calculating;
    state.pending_request = Some(request_id);
    RAFFLE_STATE.save(deps.storage, &state)?;

    let request_msg = WasmMsg::Execute {
        contract_addr: config.vrf_coordinator.to_string(),
        msg: to_json_binary(&CoordinatorExecuteMsg::RequestRandomWords {
            key_hash: config.key_hash,
            sub_id: config.subscription_id,
            request_confirmations: config.request_confirmations,
            callback_gas_limit: config.callback_gas_limit,
            num_words: config.num_words,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(request_msg)
        .add_attribute("action", "perform_upkeep")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("raffle_randomness_requested")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("round", state.round.to_string())
                .add_attribute("num_players", state.num_players.to_string())
                .add_attribute("pot", check.balance.to_string()),
        ))
}

/// Resolve the round with the coordinator's random words.
///
/// Winner is `random_words[0] mod num_players`; the whole balance of the fee
/// denom is paid out. State is committed before the payout is dispatched; if
/// the transfer fails, `reply` errors and the chain reverts all of it.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.vrf_coordinator {
        return Err(ContractError::OnlyCoordinatorCanFulfill {
            have: info.sender.to_string(),
            want: config.vrf_coordinator.to_string(),
        });
    }

    let mut state = RAFFLE_STATE.load(deps.storage)?;
    if state.pending_request != Some(request_id) {
        return Err(ContractError::UnknownRequest { request_id });
    }

    let random_word = *random_words.first().ok_or(ContractError::NoRandomWords)?;
    let index = winner_index(random_word, state.num_players)?;
    let winner = PLAYERS.load(deps.storage, (state.round, index))?;

    let prize = deps
        .querier
        .query_balance(&env.contract.address, &config.entrance_fee.denom)?;

    let result = RoundResult {
        round: state.round,
        winner: winner.clone(),
        winner_index: index,
        num_players: state.num_players,
        prize: prize.clone(),
        request_id,
        random_word,
        finished_at: env.block.time,
    };
    ROUND_RESULTS.save(deps.storage, state.round, &result)?;

    let finished_round = state.round;
    state.round += 1;
    state.num_players = 0;
    state.last_timestamp = env.block.time;
    state.recent_winner = Some(winner.clone());
    state.pending_request = None;
    state.status = RaffleStatus::Open;
    RAFFLE_STATE.save(deps.storage, &state)?;

    let mut response = Response::new()
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_event(
            Event::new("raffle_winner_picked")
                .add_attribute("winner", winner.to_string())
                .add_attribute("round", finished_round.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("winner_index", index.to_string())
                .add_attribute("num_players", result.num_players.to_string())
                .add_attribute("prize", prize.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        );

    if !prize.amount.is_zero() {
        let payout = BankMsg::Send {
            to_address: winner.to_string(),
            amount: vec![prize],
        };
        response = response.add_submessage(SubMsg::reply_on_error(payout, PAYOUT_REPLY_ID));
    }

    Ok(response)
}
