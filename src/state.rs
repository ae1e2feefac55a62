use crate::game::Game;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

/// Grace period in seconds after joining before an unrevealed game can be claimed.
pub const DEFAULT_REVEAL_TIMEOUT: u64 = 86_400;

#[cw_serde]
pub struct Config {
    /// The only denomination accepted as stake.
    pub denom: String,
    /// Seconds after a join before `Claim` is accepted.
    pub reveal_timeout: u64,
}

/// Running totals of the funds held by the contract.
///
/// `credited` never exceeds `deposited - withdrawn`; the difference is the stake still
/// locked in games that have not resolved.
#[cw_serde]
#[derive(Default)]
pub struct Ledger {
    pub deposited: Uint128,
    pub credited: Uint128,
    pub withdrawn: Uint128,
}

impl Ledger {
    /// Funds currently held by the contract.
    pub fn escrowed(&self) -> Uint128 {
        self.deposited - self.withdrawn
    }
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const LEDGER: Item<Ledger> = Item::new("ledger");
pub const TOTAL_GAMES: Item<u64> = Item::new("total_games");
pub const GAMES: Map<u64, Game> = Map::new("games");
/// Credited winnings and refunds waiting to be withdrawn, pooled per address.
pub const BALANCES: Map<&Addr, Uint128> = Map::new("balances");
