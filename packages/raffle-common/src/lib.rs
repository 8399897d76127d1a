pub mod network;
pub mod randomness;
pub mod types;

pub use randomness::{expand_random_words, winner_index};
pub use types::{RaffleStatus, VrfConsumerExecuteMsg};
