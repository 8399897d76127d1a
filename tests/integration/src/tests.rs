//! End-to-end tests for the raffle and its VRF coordinator.
//!
//! Both contracts run through their entry points on separate mock
//! dependencies. Messages between them are routed by hand: the raffle's
//! randomness request is executed on the coordinator with the raffle as
//! sender, and the coordinator's callback is executed on the raffle with the
//! coordinator as sender. The coordinator's `NextRequestId` answer is fed to
//! the raffle through `MockQuerier::update_wasm`.
//!
//! Run:
//! ```bash
//! cargo test -p raffle-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, BankMsg, Binary, Coin, ContractResult, CosmosMsg, Env,
    MemoryStorage, Order, OwnedDeps, Record, Reply, Response, Storage, SubMsg, SubMsgResponse,
    SubMsgResult, SystemResult, Timestamp, Uint128, WasmMsg, WasmQuery,
};
use raffle::msg::{CheckUpkeepResponse, RoundHistoryResponse};
use raffle::state::RaffleState;
use raffle_common::network::{
    network_config, NetworkConfig, BASE_FEE, GAS_PRICE, NATIVE_DENOM, VRF_SUB_FUND_AMOUNT,
};
use raffle_common::randomness::{expand_random_words, mock_seed};
use raffle_common::{winner_index, RaffleStatus};
use raffle_vrf_coordinator::state::Subscription;
use sha2::{Digest, Sha256};

type MockDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

const CHAIN_ID: &str = "cosmos-testnet-14002";

/// Real drand quicknet public key
const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

/// Real quicknet test vector: round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";

// ─── Harness ───

/// Both contracts plus a shared clock.
struct Deployment {
    network: &'static NetworkConfig,
    coordinator: MockDeps,
    raffle: MockDeps,
    coordinator_addr: Addr,
    raffle_addr: Addr,
    sub_id: u64,
    time: Timestamp,
    /// Makes every prize transfer fail.
    fail_payouts: bool,
}

fn addr(name: &str) -> Addr {
    MockApi::default().addr_make(name)
}

fn contract_env(address: &Addr, time: Timestamp) -> Env {
    let mut env = mock_env();
    env.contract.address = address.clone();
    env.block.time = time;
    env
}

/// The consumer callback the coordinator dispatched, and the reply payload.
struct Callback {
    msg: raffle::msg::ExecuteMsg,
    payload: Binary,
    gas_limit: Option<u64>,
}

fn extract_callback(res: &Response, raffle_addr: &Addr) -> Callback {
    assert_eq!(res.messages.len(), 1);
    let sub_msg = &res.messages[0];
    match &sub_msg.msg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr, msg, ..
        }) => {
            assert_eq!(contract_addr, raffle_addr.as_str());
            Callback {
                msg: from_json(msg).unwrap(),
                payload: sub_msg.payload.clone(),
                gas_limit: sub_msg.gas_limit,
            }
        }
        other => panic!("unexpected coordinator message {:?}", other),
    }
}

#[allow(deprecated)]
fn ok_result() -> SubMsgResult {
    SubMsgResult::Ok(SubMsgResponse {
        events: vec![],
        data: None,
        msg_responses: vec![],
    })
}

fn event_attr(res: &Response, ty: &str, key: &str) -> Option<String> {
    res.events
        .iter()
        .find(|e| e.ty == ty)
        .and_then(|e| e.attributes.iter().find(|a| a.key == key))
        .map(|a| a.value.clone())
}

impl Deployment {
    /// Deploys the way a development chain is set up: coordinator, funded
    /// subscription, raffle, then the raffle registered as consumer.
    fn new() -> Self {
        Self::with_beacon(false)
    }

    fn with_beacon(drand: bool) -> Self {
        let network = network_config(CHAIN_ID).unwrap();
        assert!(network.is_development());

        let coordinator_addr = addr("coordinator");
        let raffle_addr = addr("raffle");
        let deployer = addr("deployer");
        let time = mock_env().block.time;

        let mut coordinator = mock_dependencies();
        raffle_vrf_coordinator::contract::instantiate(
            coordinator.as_mut(),
            contract_env(&coordinator_addr, time),
            message_info(&deployer, &[]),
            raffle_vrf_coordinator::msg::InstantiateMsg {
                base_fee: Uint128::new(BASE_FEE),
                gas_price: Uint128::new(GAS_PRICE),
                operators: vec![addr("operator").to_string()],
                allow_mock_fulfillment: network.is_development(),
                drand: drand.then(|| raffle_vrf_coordinator::msg::DrandParams {
                    quicknet_pubkey_hex: QUICKNET_PK_HEX.to_string(),
                    genesis_time: 1692803367,
                    period_seconds: 3,
                }),
            },
        )
        .unwrap();

        let res = raffle_vrf_coordinator::contract::execute(
            coordinator.as_mut(),
            contract_env(&coordinator_addr, time),
            message_info(&deployer, &[]),
            raffle_vrf_coordinator::msg::ExecuteMsg::CreateSubscription {},
        )
        .unwrap();
        let sub_id: u64 = event_attr(&res, "vrf_subscription_created", "sub_id")
            .unwrap()
            .parse()
            .unwrap();

        raffle_vrf_coordinator::contract::execute(
            coordinator.as_mut(),
            contract_env(&coordinator_addr, time),
            message_info(&deployer, &[]),
            raffle_vrf_coordinator::msg::ExecuteMsg::FundSubscription {
                sub_id,
                amount: Uint128::new(VRF_SUB_FUND_AMOUNT),
            },
        )
        .unwrap();

        let mut raffle = mock_dependencies();
        raffle::contract::instantiate(
            raffle.as_mut(),
            contract_env(&raffle_addr, time),
            message_info(&deployer, &[]),
            raffle::msg::InstantiateMsg {
                entrance_fee: network.entrance_fee_coin(),
                interval_seconds: network.interval_seconds,
                vrf_coordinator: coordinator_addr.to_string(),
                key_hash: network.key_hash.to_string(),
                subscription_id: sub_id,
                callback_gas_limit: network.callback_gas_limit,
                request_confirmations: network.request_confirmations,
                num_words: network.num_words,
            },
        )
        .unwrap();

        raffle_vrf_coordinator::contract::execute(
            coordinator.as_mut(),
            contract_env(&coordinator_addr, time),
            message_info(&deployer, &[]),
            raffle_vrf_coordinator::msg::ExecuteMsg::AddConsumer {
                sub_id,
                consumer: raffle_addr.to_string(),
            },
        )
        .unwrap();

        Deployment {
            network,
            coordinator,
            raffle,
            coordinator_addr,
            raffle_addr,
            sub_id,
            time,
            fail_payouts: false,
        }
    }

    fn advance(&mut self, seconds: u64) {
        self.time = self.time.plus_seconds(seconds);
    }

    fn raffle_env(&self) -> Env {
        contract_env(&self.raffle_addr, self.time)
    }

    fn coordinator_env(&self) -> Env {
        contract_env(&self.coordinator_addr, self.time)
    }

    fn fee(&self) -> u128 {
        self.network.entrance_fee
    }

    fn balance(&self, who: &Addr) -> Uint128 {
        self.raffle
            .as_ref()
            .querier
            .query_balance(who, NATIVE_DENOM)
            .unwrap()
            .amount
    }

    fn set_balance(&mut self, who: &Addr, amount: Uint128) {
        self.raffle
            .querier
            .bank
            .update_balance(who, coins(amount.u128(), NATIVE_DENOM));
    }

    fn execute_raffle(
        &mut self,
        sender: &Addr,
        funds: &[Coin],
        msg: raffle::msg::ExecuteMsg,
    ) -> Result<Response, raffle::error::ContractError> {
        let env = self.raffle_env();
        raffle::contract::execute(self.raffle.as_mut(), env, message_info(sender, funds), msg)
    }

    fn execute_coordinator(
        &mut self,
        sender: &Addr,
        msg: raffle_vrf_coordinator::msg::ExecuteMsg,
    ) -> Result<Response, raffle_vrf_coordinator::error::ContractError> {
        let env = self.coordinator_env();
        raffle_vrf_coordinator::contract::execute(
            self.coordinator.as_mut(),
            env,
            message_info(sender, &[]),
            msg,
        )
    }

    /// Every key/value pair in the raffle's storage.
    fn snapshot_raffle(&self) -> Vec<Record> {
        self.raffle
            .storage
            .range(None, None, Order::Ascending)
            .collect()
    }

    /// Puts the raffle's storage back to `snapshot`, as the chain does when
    /// a transaction fails.
    fn restore_raffle(&mut self, snapshot: Vec<Record>) {
        let keys: Vec<Vec<u8>> = self
            .raffle
            .storage
            .range(None, None, Order::Ascending)
            .map(|(key, _)| key)
            .collect();
        for key in keys {
            self.raffle.storage.remove(&key);
        }
        for (key, value) in snapshot {
            self.raffle.storage.set(&key, &value);
        }
    }

    fn enter(
        &mut self,
        player: &Addr,
        funds: &[Coin],
    ) -> Result<Response, raffle::error::ContractError> {
        let res = self.execute_raffle(player, funds, raffle::msg::ExecuteMsg::EnterRaffle {})?;
        let paid: Uint128 = funds.iter().map(|c| c.amount).sum();
        let pot = self.balance(&self.raffle_addr.clone()) + paid;
        let raffle_addr = self.raffle_addr.clone();
        self.set_balance(&raffle_addr, pot);
        Ok(res)
    }

    fn check_upkeep(&self) -> CheckUpkeepResponse {
        let res = raffle::contract::query(
            self.raffle.as_ref(),
            self.raffle_env(),
            raffle::msg::QueryMsg::CheckUpkeep {},
        )
        .unwrap();
        from_json(res).unwrap()
    }

    fn raffle_state(&self) -> RaffleState {
        let res = raffle::contract::query(
            self.raffle.as_ref(),
            self.raffle_env(),
            raffle::msg::QueryMsg::State {},
        )
        .unwrap();
        from_json(res).unwrap()
    }

    fn subscription(&self) -> Subscription {
        let res = raffle_vrf_coordinator::contract::query(
            self.coordinator.as_ref(),
            self.coordinator_env(),
            raffle_vrf_coordinator::msg::QueryMsg::Subscription {
                sub_id: self.sub_id,
            },
        )
        .unwrap();
        let sub: Option<Subscription> = from_json(res).unwrap();
        sub.unwrap()
    }

    /// Points the raffle's wasm querier at the coordinator's current
    /// `NextRequestId`.
    fn sync_next_request_id(&mut self) {
        let res = raffle_vrf_coordinator::contract::query(
            self.coordinator.as_ref(),
            self.coordinator_env(),
            raffle_vrf_coordinator::msg::QueryMsg::NextRequestId {},
        )
        .unwrap();
        let next: u64 = from_json(res).unwrap();
        let coordinator = self.coordinator_addr.to_string();
        self.raffle.querier.update_wasm(move |query| match query {
            WasmQuery::Smart { contract_addr, .. } if *contract_addr == coordinator => {
                SystemResult::Ok(ContractResult::Ok(to_json_binary(&next).unwrap()))
            }
            other => panic!("unexpected wasm query {:?}", other),
        });
    }

    /// Runs `PerformUpkeep` on the raffle and delivers its randomness request
    /// to the coordinator. Returns the request id.
    fn perform_upkeep(&mut self) -> Result<u64, raffle::error::ContractError> {
        self.sync_next_request_id();
        let keeper = addr("keeper");
        let res =
            self.execute_raffle(&keeper, &[], raffle::msg::ExecuteMsg::PerformUpkeep {})?;
        let announced: u64 = event_attr(&res, "raffle_randomness_requested", "request_id")
            .unwrap()
            .parse()
            .unwrap();

        assert_eq!(res.messages.len(), 1);
        let request: raffle_vrf_coordinator::msg::ExecuteMsg = match &res.messages[0].msg {
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr, msg, ..
            }) => {
                assert_eq!(contract_addr, self.coordinator_addr.as_str());
                from_json(msg).unwrap()
            }
            other => panic!("unexpected raffle message {:?}", other),
        };

        let raffle_addr = self.raffle_addr.clone();
        let res = self.execute_coordinator(&raffle_addr, request).unwrap();
        let assigned: u64 = event_attr(&res, "vrf_random_words_requested", "request_id")
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(announced, assigned);

        Ok(assigned)
    }

    /// Mock-fulfills `request_id` at the coordinator.
    fn coordinator_fulfill(
        &mut self,
        request_id: u64,
    ) -> Result<Response, raffle_vrf_coordinator::error::ContractError> {
        let anyone = addr("anyone");
        let consumer = self.raffle_addr.to_string();
        self.execute_coordinator(
            &anyone,
            raffle_vrf_coordinator::msg::ExecuteMsg::FulfillRandomWords {
                request_id,
                consumer,
            },
        )
    }

    /// Delivers a coordinator callback to the raffle, settles the payout on
    /// the mock bank and reports the outcome back to the coordinator.
    ///
    /// Returns the raffle's response, or the coordinator's reply response
    /// when the raffle's callback failed. A failed callback leaves the
    /// raffle's storage as it was before the call.
    fn deliver(&mut self, callback: Callback) -> Response {
        let snapshot = self.snapshot_raffle();
        let coordinator_addr = self.coordinator_addr.clone();
        let raffle_res = match self.execute_raffle(&coordinator_addr, &[], callback.msg) {
            Ok(res) => {
                let settled = res
                    .messages
                    .iter()
                    .try_for_each(|sub_msg| self.settle(sub_msg));
                settled.map(|_| res)
            }
            Err(err) => Err(err),
        };

        let result = match &raffle_res {
            Ok(_) => ok_result(),
            Err(err) => {
                self.restore_raffle(snapshot);
                SubMsgResult::Err(err.to_string())
            }
        };

        let reply = Reply {
            id: raffle_vrf_coordinator::execute::FULFILL_REPLY_ID,
            payload: callback.payload,
            gas_used: 0,
            result,
        };
        let env = self.coordinator_env();
        let coordinator_res =
            raffle_vrf_coordinator::contract::reply(self.coordinator.as_mut(), env, reply)
                .unwrap();

        raffle_res.unwrap_or(coordinator_res)
    }

    /// Applies a payout on the mock bank, or reports it to the raffle as
    /// failed when `fail_payouts` is set.
    fn settle(&mut self, sub_msg: &SubMsg) -> Result<(), raffle::error::ContractError> {
        match &sub_msg.msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
                assert_eq!(sub_msg.id, raffle::execute::PAYOUT_REPLY_ID);
                if self.fail_payouts {
                    let env = self.raffle_env();
                    let reply = Reply {
                        id: sub_msg.id,
                        payload: sub_msg.payload.clone(),
                        gas_used: 0,
                        result: SubMsgResult::Err("insufficient funds".to_string()),
                    };
                    raffle::contract::reply(self.raffle.as_mut(), env, reply)?;
                    return Ok(());
                }
                let sent = amount[0].amount;
                let raffle_addr = self.raffle_addr.clone();
                let pot = self.balance(&raffle_addr);
                self.set_balance(&raffle_addr, pot - sent);
                let winner = Addr::unchecked(to_address);
                let before = self.balance(&winner);
                self.set_balance(&winner, before + sent);
                Ok(())
            }
            other => panic!("unexpected raffle message {:?}", other),
        }
    }

    /// One full round: fulfill `request_id` via the mock path and deliver it.
    fn fulfill(&mut self, request_id: u64) -> Response {
        let res = self.coordinator_fulfill(request_id).unwrap();
        let callback = extract_callback(&res, &self.raffle_addr);
        self.deliver(callback)
    }
}

fn players(n: usize) -> Vec<Addr> {
    (0..n).map(|i| addr(&format!("player{}", i))).collect()
}

fn expected_winner(seed: &[u8; 32], players: &[Addr]) -> Addr {
    let word = expand_random_words(seed, 1)[0];
    let index = winner_index(word, players.len() as u32).unwrap();
    players[index as usize].clone()
}

fn request_price(network: &NetworkConfig) -> Uint128 {
    Uint128::new(BASE_FEE + GAS_PRICE * network.callback_gas_limit as u128 / 1_000_000_000)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_deployment() {
    let d = Deployment::new();

    let sub = d.subscription();
    assert_eq!(sub.balance, Uint128::new(VRF_SUB_FUND_AMOUNT));
    assert_eq!(sub.consumers, vec![d.raffle_addr.clone()]);

    let res = raffle::contract::query(
        d.raffle.as_ref(),
        d.raffle_env(),
        raffle::msg::QueryMsg::EntranceFee {},
    )
    .unwrap();
    let fee: Coin = from_json(res).unwrap();
    assert_eq!(fee, d.network.entrance_fee_coin());

    let state = d.raffle_state();
    assert_eq!(state.status, RaffleStatus::Open);
    assert_eq!(state.num_players, 0);
    assert_eq!(state.last_timestamp, d.time);
}

#[test]
fn test_entry_rules() {
    let mut d = Deployment::new();
    let player = addr("player");

    let err = d.enter(&player, &[]).unwrap_err();
    assert!(matches!(
        err,
        raffle::error::ContractError::InsufficientPayment { .. }
    ));

    let res = d.enter(&player, &coins(d.fee(), NATIVE_DENOM)).unwrap();
    assert_eq!(
        event_attr(&res, "raffle_entered", "player"),
        Some(player.to_string())
    );

    let res = raffle::contract::query(
        d.raffle.as_ref(),
        d.raffle_env(),
        raffle::msg::QueryMsg::Player { index: 0 },
    )
    .unwrap();
    let first: Addr = from_json(res).unwrap();
    assert_eq!(first, player);

    d.advance(d.network.interval_seconds + 1);
    d.perform_upkeep().unwrap();

    let err = d.enter(&player, &coins(d.fee(), NATIVE_DENOM)).unwrap_err();
    assert!(matches!(err, raffle::error::ContractError::NotOpen));
}

#[test]
fn test_upkeep_gating() {
    let mut d = Deployment::new();

    // interval passed but nobody entered
    d.advance(d.network.interval_seconds + 1);
    let check = d.check_upkeep();
    assert!(check.time_passed && !check.has_players && !check.upkeep_needed);
    let err = d.perform_upkeep().unwrap_err();
    assert!(matches!(
        err,
        raffle::error::ContractError::UpkeepNotNeeded { .. }
    ));

    let player = addr("player");
    d.enter(&player, &coins(d.fee(), NATIVE_DENOM)).unwrap();
    assert!(d.check_upkeep().upkeep_needed);
}

#[test]
fn test_coordinator_rejects_nonexistent_requests() {
    let mut d = Deployment::new();

    for request_id in [0u64, 1] {
        let err = d.coordinator_fulfill(request_id).unwrap_err();
        assert!(matches!(
            err,
            raffle_vrf_coordinator::error::ContractError::NonexistentRequest { .. }
        ));
    }
}

#[test]
fn test_full_round_picks_winner_and_pays_out() {
    let mut d = Deployment::new();
    let entrants = players(4);
    let start = d.time;

    for player in &entrants {
        d.enter(player, &coins(d.fee(), NATIVE_DENOM)).unwrap();
    }
    assert_eq!(d.balance(&d.raffle_addr.clone()), Uint128::new(d.fee() * 4));

    d.advance(d.network.interval_seconds + 1);
    let request_id = d.perform_upkeep().unwrap();
    assert_eq!(request_id, 1);
    assert_eq!(d.raffle_state().status, RaffleStatus::Calculating);

    d.advance(6);
    let res = d.coordinator_fulfill(request_id).unwrap();
    let callback = extract_callback(&res, &d.raffle_addr);
    assert_eq!(callback.gas_limit, Some(d.network.callback_gas_limit as u64));
    let res = d.deliver(callback);

    let winner = expected_winner(&mock_seed(request_id), &entrants);
    assert_eq!(
        event_attr(&res, "raffle_winner_picked", "winner"),
        Some(winner.to_string())
    );
    assert_eq!(d.balance(&winner), Uint128::new(d.fee() * 4));
    assert!(d.balance(&d.raffle_addr.clone()).is_zero());

    let state = d.raffle_state();
    assert_eq!(state.status, RaffleStatus::Open);
    assert_eq!(state.num_players, 0);
    assert_eq!(state.recent_winner, Some(winner));
    assert_eq!(state.pending_request, None);
    assert!(state.last_timestamp > start);

    let sub = d.subscription();
    assert_eq!(
        sub.balance,
        Uint128::new(VRF_SUB_FUND_AMOUNT) - request_price(d.network)
    );

    // the coordinator forgot the request; a second fulfillment is refused
    let err = d.coordinator_fulfill(request_id).unwrap_err();
    assert!(matches!(
        err,
        raffle_vrf_coordinator::error::ContractError::NonexistentRequest { request_id: 1 }
    ));
}

#[test]
fn test_multiple_rounds_recorded_in_history() {
    let mut d = Deployment::new();

    let mut winners = vec![];
    for round in 0..3u64 {
        let entrants: Vec<Addr> = (0..(round + 2))
            .map(|i| addr(&format!("round{}-player{}", round, i)))
            .collect();
        for player in &entrants {
            d.enter(player, &coins(d.fee(), NATIVE_DENOM)).unwrap();
        }
        d.advance(d.network.interval_seconds + 1);
        let request_id = d.perform_upkeep().unwrap();
        assert_eq!(request_id, round + 1);
        d.fulfill(request_id);

        let winner = expected_winner(&mock_seed(request_id), &entrants);
        assert_eq!(
            d.balance(&winner),
            Uint128::new(d.fee() * entrants.len() as u128)
        );
        winners.push(winner);
    }

    let res = raffle::contract::query(
        d.raffle.as_ref(),
        d.raffle_env(),
        raffle::msg::QueryMsg::RoundHistory {
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let history: RoundHistoryResponse = from_json(res).unwrap();
    assert_eq!(history.results.len(), 3);
    for (i, result) in history.results.iter().enumerate() {
        assert_eq!(result.round, i as u64);
        assert_eq!(result.request_id, i as u64 + 1);
        assert_eq!(result.winner, winners[i]);
        assert_eq!(result.num_players, i as u32 + 2);
    }

    assert_eq!(d.subscription().request_count, 3);
}

#[test]
fn test_failed_callback_keeps_raffle_calculating() {
    let mut d = Deployment::new();
    let player = addr("player");
    d.enter(&player, &coins(d.fee(), NATIVE_DENOM)).unwrap();
    d.advance(d.network.interval_seconds + 1);
    let request_id = d.perform_upkeep().unwrap();

    // the callback arrives with a request id the raffle does not know
    let res = d.coordinator_fulfill(request_id).unwrap();
    let mut callback = extract_callback(&res, &d.raffle_addr);
    callback.msg = raffle::msg::ExecuteMsg::RawFulfillRandomWords {
        request_id: request_id + 1,
        random_words: vec![],
    };
    let res = d.deliver(callback);
    assert_eq!(
        event_attr(&res, "vrf_random_words_fulfilled", "success"),
        Some("false".to_string())
    );

    let state = d.raffle_state();
    assert_eq!(state.status, RaffleStatus::Calculating);
    assert_eq!(state.pending_request, Some(request_id));
    assert_eq!(state.num_players, 1);
    assert_eq!(d.balance(&player), Uint128::zero());
}

#[test]
fn test_failed_payout_reverts_fulfillment() {
    let mut d = Deployment::new();
    let entrants = players(2);
    for player in &entrants {
        d.enter(player, &coins(d.fee(), NATIVE_DENOM)).unwrap();
    }
    d.advance(d.network.interval_seconds + 1);
    let request_id = d.perform_upkeep().unwrap();
    let before = d.raffle_state();

    d.fail_payouts = true;
    d.advance(6);
    let res = d.fulfill(request_id);
    assert_eq!(
        event_attr(&res, "vrf_random_words_fulfilled", "success"),
        Some("false".to_string())
    );
    assert!(event_attr(&res, "vrf_random_words_fulfilled", "error")
        .unwrap()
        .contains("insufficient funds"));

    let state = d.raffle_state();
    assert_eq!(state, before);
    assert_eq!(state.status, RaffleStatus::Calculating);
    assert_eq!(state.num_players, 2);
    assert_eq!(state.pending_request, Some(request_id));

    let res = raffle::contract::query(
        d.raffle.as_ref(),
        d.raffle_env(),
        raffle::msg::QueryMsg::RoundResult { round: 0 },
    )
    .unwrap();
    let result: Option<raffle::state::RoundResult> = from_json(res).unwrap();
    assert!(result.is_none());

    assert_eq!(d.balance(&d.raffle_addr.clone()), Uint128::new(d.fee() * 2));
    for player in &entrants {
        assert!(d.balance(player).is_zero());
    }
}

#[test]
fn test_beacon_fulfillment() {
    let mut d = Deployment::with_beacon(true);
    let entrants = players(3);
    for player in &entrants {
        d.enter(player, &coins(d.fee(), NATIVE_DENOM)).unwrap();
    }
    d.advance(d.network.interval_seconds + 1);
    let request_id = d.perform_upkeep().unwrap();

    let operator = addr("operator");
    let res = d
        .execute_coordinator(
            &operator,
            raffle_vrf_coordinator::msg::ExecuteMsg::FulfillWithBeacon {
                request_id,
                round: TEST_ROUND,
                signature_hex: TEST_SIG_HEX.to_string(),
            },
        )
        .unwrap();
    let callback = extract_callback(&res, &d.raffle_addr);
    d.deliver(callback);

    let signature = hex::decode(TEST_SIG_HEX).unwrap();
    let randomness: [u8; 32] = Sha256::digest(&signature).into();
    assert_eq!(hex::encode(randomness), TEST_RANDOMNESS_HEX);

    let winner = expected_winner(&randomness, &entrants);
    assert_eq!(d.balance(&winner), Uint128::new(d.fee() * 3));
    assert_eq!(d.raffle_state().recent_winner, Some(winner));
}
