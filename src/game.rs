use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary, Timestamp, Uint128};
use thiserror::Error;

use crate::commitment;

/// A hand in the game. Encoded on the wire as `0`, `1` and `2`.
#[cw_serde]
#[derive(Copy)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub fn code(self) -> u8 {
        match self {
            Move::Rock => 0,
            Move::Paper => 1,
            Move::Scissors => 2,
        }
    }
}

impl TryFrom<u8> for Move {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Move::Rock),
            1 => Ok(Move::Paper),
            2 => Ok(Move::Scissors),
            other => Err(GameError::InvalidMove(other)),
        }
    }
}

/// The result of comparing two moves.
#[cw_serde]
#[derive(Copy)]
pub enum Outcome {
    Tie,
    Player1,
    Player2,
}

impl Outcome {
    /// `0` for a tie, `1` when player one wins, `2` when player two wins.
    pub fn code(self) -> u8 {
        match self {
            Outcome::Tie => 0,
            Outcome::Player1 => 1,
            Outcome::Player2 => 2,
        }
    }
}

/// Where a game is in its lifecycle. `Settled`, `Claimed` and `Rescinded` are terminal.
#[cw_serde]
#[derive(Copy)]
pub enum Phase {
    Created,
    Joined,
    Settled,
    Claimed,
    Rescinded,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Settled | Phase::Claimed | Phase::Rescinded)
    }
}

/// An error that can occur when playing a game.
#[derive(Error, Debug, PartialEq)]
pub enum GameError {
    #[error("Move {0} is not one of rock (0), paper (1) or scissors (2)")]
    InvalidMove(u8),
    #[error("A game cannot be created without a stake")]
    ZeroStake,
    #[error("Stake must be exactly {expected}, received {received}")]
    StakeMismatch {
        expected: Uint128,
        received: Uint128,
    },
    #[error("The game already has a second player")]
    AlreadyJoined,
    #[error("A player cannot join their own game")]
    CannotJoinOwnGame,
    #[error("No one has joined the game yet")]
    NotJoined,
    #[error("Sender is not a player of this game")]
    NotAParticipant,
    #[error("Only the creator can rescind the game")]
    NotCreator,
    #[error("Move already revealed")]
    AlreadyRevealed,
    #[error("Move and secret do not match the commitment")]
    CommitmentMismatch,
    #[error("The game is already over")]
    AlreadyResolved,
    #[error("The reveal period ends at {available_at}")]
    TimeoutNotElapsed { available_at: Timestamp },
    #[error("Exactly one player must have revealed to claim")]
    InvalidClaimState,
    #[error("Only the player who revealed can claim the pot")]
    NotRevealer,
}

/// Returns the outcome of `move1` (player one) against `move2` (player two).
///
/// With rock, paper and scissors numbered 0, 1 and 2, each move beats the one numbered
/// just below it, wrapping around.
pub fn winner(move1: Move, move2: Move) -> Outcome {
    match (3 + move1.code() - move2.code()) % 3 {
        0 => Outcome::Tie,
        1 => Outcome::Player1,
        _ => Outcome::Player2,
    }
}

/// Splits a tied pot. Player two gets the floor half, player one the rest, so an odd
/// unit goes to the creator.
pub fn split_tie(pot: Uint128) -> (Uint128, Uint128) {
    let half = pot.multiply_ratio(1u128, 2u128);
    (pot - half, half)
}

/// How a player enters a game.
#[cw_serde]
pub enum Entry {
    /// A commitment produced by `encrypt_move`, revealed later.
    Sealed { commitment: HexBinary },
    /// A move disclosed immediately. The creator is already bound by their commitment.
    Open { choice: u8 },
}

/// The amounts credited to each player when a game resolves.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Payout {
    pub player1: Uint128,
    pub player2: Uint128,
}

/// A single rock-paper-scissors game and the stake it holds in escrow.
#[cw_serde]
pub struct Game {
    pub id: u64,
    pub player1: Addr,
    pub player2: Option<Addr>,
    pub commitment1: HexBinary,
    pub commitment2: Option<HexBinary>,
    pub move1: Option<Move>,
    pub move2: Option<Move>,
    pub stake: Uint128,
    pub pot: Uint128,
    pub created_at: Timestamp,
    pub joined_at: Option<Timestamp>,
    pub payout1: Uint128,
    pub payout2: Uint128,
    pub phase: Phase,
}

impl Game {
    /// Opens a game with the creator's commitment and stake.
    pub fn new(
        id: u64,
        player1: Addr,
        commitment1: HexBinary,
        stake: Uint128,
        now: Timestamp,
    ) -> Result<Game, GameError> {
        if stake.is_zero() {
            return Err(GameError::ZeroStake);
        }

        Ok(Game {
            id,
            player1,
            player2: None,
            commitment1,
            commitment2: None,
            move1: None,
            move2: None,
            stake,
            pot: stake,
            created_at: now,
            joined_at: None,
            payout1: Uint128::zero(),
            payout2: Uint128::zero(),
            phase: Phase::Created,
        })
    }

    fn ensure_live(&self) -> Result<(), GameError> {
        if self.phase.is_terminal() {
            return Err(GameError::AlreadyResolved);
        }
        Ok(())
    }

    /// Seats the second player. The stake must match the creator's exactly.
    pub fn join(
        &mut self,
        player2: Addr,
        entry: Entry,
        stake: Uint128,
        now: Timestamp,
    ) -> Result<(), GameError> {
        self.ensure_live()?;
        if self.phase != Phase::Created {
            return Err(GameError::AlreadyJoined);
        }
        if player2 == self.player1 {
            return Err(GameError::CannotJoinOwnGame);
        }
        if stake != self.stake {
            return Err(GameError::StakeMismatch {
                expected: self.stake,
                received: stake,
            });
        }

        match entry {
            Entry::Sealed { commitment } => self.commitment2 = Some(commitment),
            Entry::Open { choice } => self.move2 = Some(Move::try_from(choice)?),
        }
        self.player2 = Some(player2);
        self.pot += stake;
        self.joined_at = Some(now);
        self.phase = Phase::Joined;
        Ok(())
    }

    /// Records a verified move. Returns the outcome and payout once both moves are known.
    pub fn reveal(
        &mut self,
        player: &Addr,
        choice: u8,
        secret: &str,
    ) -> Result<Option<(Outcome, Payout)>, GameError> {
        self.ensure_live()?;
        if self.phase != Phase::Joined {
            return Err(GameError::NotJoined);
        }

        let is_player1 = *player == self.player1;
        if !is_player1 && self.player2.as_ref() != Some(player) {
            return Err(GameError::NotAParticipant);
        }
        let played = Move::try_from(choice)?;

        let (commitment, revealed) = if is_player1 {
            (Some(&self.commitment1), self.move1)
        } else {
            (self.commitment2.as_ref(), self.move2)
        };
        if revealed.is_some() {
            return Err(GameError::AlreadyRevealed);
        }
        // An open join has no commitment and is always already revealed.
        let commitment = commitment.ok_or(GameError::AlreadyRevealed)?;
        if !commitment::verify(commitment, played, secret, player) {
            return Err(GameError::CommitmentMismatch);
        }

        if is_player1 {
            self.move1 = Some(played);
        } else {
            self.move2 = Some(played);
        }

        match (self.move1, self.move2) {
            (Some(move1), Some(move2)) => Ok(Some(self.settle(move1, move2))),
            _ => Ok(None),
        }
    }

    fn settle(&mut self, move1: Move, move2: Move) -> (Outcome, Payout) {
        let outcome = winner(move1, move2);
        let (payout1, payout2) = match outcome {
            Outcome::Tie => split_tie(self.pot),
            Outcome::Player1 => (self.pot, Uint128::zero()),
            Outcome::Player2 => (Uint128::zero(), self.pot),
        };
        self.payout1 = payout1;
        self.payout2 = payout2;
        self.phase = Phase::Settled;
        (
            outcome,
            Payout {
                player1: payout1,
                player2: payout2,
            },
        )
    }

    /// Awards the whole pot to `claimant` once the reveal period is over and the other
    /// player has still not revealed.
    pub fn claim(
        &mut self,
        claimant: &Addr,
        now: Timestamp,
        reveal_timeout: u64,
    ) -> Result<Payout, GameError> {
        self.ensure_live()?;
        let joined_at = match (self.phase, self.joined_at) {
            (Phase::Joined, Some(joined_at)) => joined_at,
            _ => return Err(GameError::NotJoined),
        };

        let is_player1 = *claimant == self.player1;
        if !is_player1 && self.player2.as_ref() != Some(claimant) {
            return Err(GameError::NotAParticipant);
        }

        let revealer_is_player1 = match (self.move1.is_some(), self.move2.is_some()) {
            (true, false) => true,
            (false, true) => false,
            _ => return Err(GameError::InvalidClaimState),
        };
        if revealer_is_player1 != is_player1 {
            return Err(GameError::NotRevealer);
        }

        let available_at = joined_at.plus_seconds(reveal_timeout);
        if now < available_at {
            return Err(GameError::TimeoutNotElapsed { available_at });
        }

        if is_player1 {
            self.payout1 = self.pot;
        } else {
            self.payout2 = self.pot;
        }
        self.phase = Phase::Claimed;
        Ok(Payout {
            player1: self.payout1,
            player2: self.payout2,
        })
    }

    /// Cancels a game nobody joined. Returns the amount owed back to the creator.
    pub fn rescind(&mut self, sender: &Addr) -> Result<Uint128, GameError> {
        self.ensure_live()?;
        if *sender != self.player1 {
            return Err(GameError::NotCreator);
        }
        if self.phase != Phase::Created {
            return Err(GameError::AlreadyJoined);
        }

        self.payout1 = self.pot;
        self.phase = Phase::Rescinded;
        Ok(self.pot)
    }
}
