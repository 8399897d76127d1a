use cosmwasm_std::{to_json_binary, Binary, Deps, StdError, StdResult};

use crate::execute::request_price;
use crate::state::{CONFIG, NEXT_REQUEST_ID, REQUESTS, SUBSCRIPTIONS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_subscription(deps: Deps, sub_id: u64) -> StdResult<Binary> {
    let sub = SUBSCRIPTIONS.may_load(deps.storage, sub_id)?;
    to_json_binary(&sub)
}

pub fn query_request(deps: Deps, request_id: u64) -> StdResult<Binary> {
    let request = REQUESTS.may_load(deps.storage, request_id)?;
    to_json_binary(&request)
}

pub fn query_next_request_id(deps: Deps) -> StdResult<Binary> {
    let next = NEXT_REQUEST_ID.load(deps.storage)?;
    to_json_binary(&next)
}

pub fn query_request_price(deps: Deps, callback_gas_limit: u32) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let price = request_price(&config, callback_gas_limit)
        .map_err(|e| StdError::generic_err(e.to_string()))?;
    to_json_binary(&price)
}
