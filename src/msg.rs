use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{HexBinary, Uint128};

use crate::game::{Entry, Game, Outcome};
use crate::state::{Config, Ledger};

#[cw_serde]
pub struct InstantiateMsg {
    /// The denomination stakes are paid in.
    pub denom: String,
    /// Seconds after a join before an unrevealed game can be claimed. Defaults to a day.
    pub reveal_timeout: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Open a new game. The attached funds are the stake.
    CreateGame {
        /// The creator's commitment, see `QueryMsg::EncryptMove`.
        commitment: HexBinary,
    },
    /// Join an open game with a stake equal to the creator's.
    JoinGame { game_id: u64, entry: Entry },
    /// Disclose a committed move.
    Reveal {
        game_id: u64,
        /// 0 = rock, 1 = paper, 2 = scissors.
        choice: u8,
        secret: String,
    },
    /// Take the whole pot when the opponent has not revealed in time.
    Claim { game_id: u64 },
    /// Cancel a game nobody joined and get the stake back.
    RescindGame { game_id: u64 },
    /// Send all credited funds to the sender.
    Withdraw {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    /// Number of games ever created. Also the id of the next game.
    #[returns(TotalGamesResponse)]
    TotalGames {},
    #[returns(Game)]
    Game { game_id: u64 },
    /// Games in ascending id order.
    #[returns(GamesResponse)]
    Games {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Credited funds an address can withdraw.
    #[returns(BalanceResponse)]
    Balance { address: String },
    #[returns(Ledger)]
    Ledger {},
    /// Compare two moves without touching any game.
    #[returns(WinnerResponse)]
    Winner { move1: u8, move2: u8 },
    /// Compute the commitment `player` would submit for `choice` and `secret`.
    #[returns(CommitmentResponse)]
    EncryptMove {
        player: String,
        choice: u8,
        secret: String,
    },
}

#[cw_serde]
pub struct TotalGamesResponse {
    pub total: u64,
}

#[cw_serde]
pub struct GamesResponse {
    pub games: Vec<Game>,
}

#[cw_serde]
pub struct BalanceResponse {
    pub address: String,
    pub amount: Uint128,
}

#[cw_serde]
pub struct WinnerResponse {
    /// 0 = tie, 1 = player one, 2 = player two.
    pub winner: u8,
    pub outcome: Outcome,
}

#[cw_serde]
pub struct CommitmentResponse {
    pub commitment: HexBinary,
}
