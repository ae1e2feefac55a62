use crate::game::GameError;
use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    StdError(#[from] StdError),
    #[error("{0}")]
    GameError(#[from] GameError),
    #[error("Game {game_id} does not exist")]
    GameNotFound { game_id: u64 },
    #[error("Commitment must be 32 bytes, got {length}")]
    InvalidCommitment { length: usize },
    #[error("Stakes must be paid in {denom} only")]
    InvalidFunds { denom: String },
    #[error("No balance to withdraw")]
    NoWithdrawableBalance,
    #[error("Transfer failed: {reason}")]
    TransferFailed { reason: String },
    #[error("Unknown reply id {id}")]
    UnknownReply { id: u64 },
}
