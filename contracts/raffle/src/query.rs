use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;

use crate::execute::check_upkeep;
use crate::msg::{PlayersResponse, RoundHistoryResponse};
use crate::state::{CONFIG, PLAYERS, RAFFLE_STATE, ROUND_RESULTS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_state(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state)
}

pub fn query_entrance_fee(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.entrance_fee)
}

pub fn query_interval(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.interval_seconds)
}

pub fn query_raffle_status(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state.status)
}

pub fn query_recent_winner(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state.recent_winner)
}

/// Player at `index` in the current round. Errors past the end.
pub fn query_player(deps: Deps, index: u32) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    let player = PLAYERS
        .may_load(deps.storage, (state.round, index))?
        .filter(|_| index < state.num_players)
        .ok_or_else(|| {
            StdError::generic_err(format!(
                "no player at index {} in round {}",
                index, state.round
            ))
        })?;
    to_json_binary(&player)
}

pub fn query_players(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    let limit = limit.unwrap_or(30).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let players = PLAYERS
        .prefix(state.round)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|r| r.map(|(_, addr)| addr))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&PlayersResponse {
        round: state.round,
        players,
    })
}

pub fn query_number_of_players(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state.num_players)
}

pub fn query_latest_timestamp(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state.last_timestamp)
}

pub fn query_pending_request(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state.pending_request)
}

pub fn query_check_upkeep(deps: Deps, env: Env) -> StdResult<Binary> {
    to_json_binary(&check_upkeep(deps, &env)?)
}

pub fn query_round_result(deps: Deps, round: u64) -> StdResult<Binary> {
    let result = ROUND_RESULTS.may_load(deps.storage, round)?;
    to_json_binary(&result)
}

pub fn query_round_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let results: Vec<_> = ROUND_RESULTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, result)| result)
        .collect();

    to_json_binary(&RoundHistoryResponse { results })
}
