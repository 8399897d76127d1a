use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint256;

/// Lifecycle status of the raffle. Cycles Open -> Calculating -> Open.
#[cw_serde]
#[derive(Copy, Default)]
pub enum RaffleStatus {
    #[default]
    Open,
    Calculating,
}

impl RaffleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaffleStatus::Open => "open",
            RaffleStatus::Calculating => "calculating",
        }
    }
}

impl std::fmt::Display for RaffleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback the coordinator sends to a consumer contract once a request is
/// fulfilled. Consumers must accept this variant in their `ExecuteMsg`.
#[cw_serde]
pub enum VrfConsumerExecuteMsg {
    RawFulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}
