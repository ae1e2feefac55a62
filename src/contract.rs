use crate::game::{Entry, Game, Move, Payout};
use crate::state::{
    Config, Ledger, BALANCES, CONFIG, DEFAULT_REVEAL_TIMEOUT, GAMES, LEDGER, TOTAL_GAMES,
};
use crate::{
    error::ContractError,
    msg::{ExecuteMsg, InstantiateMsg, QueryMsg},
};
use cosmwasm_std::{
    ensure, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdError, StdResult, Storage, SubMsgResult, Uint128,
};

/// Reply id of the bank transfer sent by `Withdraw`.
pub const WITHDRAW_REPLY_ID: u64 = 1;

pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    if msg.denom.is_empty() {
        return Err(StdError::generic_err("denom must not be empty").into());
    }

    let config = Config {
        denom: msg.denom,
        reveal_timeout: msg.reveal_timeout.unwrap_or(DEFAULT_REVEAL_TIMEOUT),
    };
    CONFIG.save(deps.storage, &config)?;
    LEDGER.save(deps.storage, &Ledger::default())?;
    TOTAL_GAMES.save(deps.storage, &0)?;

    Ok(Response::default()
        .add_attribute("action", "instantiate")
        .add_attribute("denom", config.denom)
        .add_attribute("reveal_timeout", config.reveal_timeout.to_string()))
}

pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateGame { commitment } => exec::create_game(deps, env, info, commitment),
        ExecuteMsg::JoinGame { game_id, entry } => {
            exec::join_game(deps, env, info, game_id, entry)
        }
        ExecuteMsg::Reveal {
            game_id,
            choice,
            secret,
        } => exec::reveal(deps, info, game_id, choice, &secret),
        ExecuteMsg::Claim { game_id } => exec::claim(deps, env, info, game_id),
        ExecuteMsg::RescindGame { game_id } => exec::rescind_game(deps, info, game_id),
        ExecuteMsg::Withdraw {} => exec::withdraw(deps, info),
    }
}

pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match (msg.id, msg.result) {
        (WITHDRAW_REPLY_ID, SubMsgResult::Err(reason)) => {
            // Failing here reverts the whole withdrawal, so the balance stays credited.
            Err(ContractError::TransferFailed { reason })
        }
        (WITHDRAW_REPLY_ID, SubMsgResult::Ok(_)) => Ok(Response::default()),
        (id, _) => Err(ContractError::UnknownReply { id }),
    }
}

fn load_game(storage: &dyn Storage, game_id: u64) -> Result<Game, ContractError> {
    GAMES
        .may_load(storage, game_id)?
        .ok_or(ContractError::GameNotFound { game_id })
}

mod exec {
    use super::*;
    use crate::commitment::COMMITMENT_LEN;
    use cosmwasm_std::{coins, BankMsg, HexBinary, SubMsg};

    /// Sums the attached funds, rejecting any coin not in the configured denom.
    fn paid_stake(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
        let mut stake = Uint128::zero();
        for coin in &info.funds {
            ensure!(
                coin.denom == denom,
                ContractError::InvalidFunds {
                    denom: denom.to_string()
                }
            );
            stake += coin.amount;
        }
        Ok(stake)
    }

    fn check_commitment(commitment: &HexBinary) -> Result<(), ContractError> {
        ensure!(
            commitment.len() == COMMITMENT_LEN,
            ContractError::InvalidCommitment {
                length: commitment.len()
            }
        );
        Ok(())
    }

    /// Adds `amount` to the withdrawable balance of `player`.
    fn credit(
        storage: &mut dyn Storage,
        ledger: &mut Ledger,
        player: &Addr,
        amount: Uint128,
    ) -> StdResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        BALANCES.update(storage, player, |balance| -> StdResult<_> {
            Ok(balance.unwrap_or_default() + amount)
        })?;
        ledger.credited += amount;
        Ok(())
    }

    fn credit_payout(
        storage: &mut dyn Storage,
        game: &Game,
        payout: Payout,
    ) -> StdResult<()> {
        let mut ledger = LEDGER.load(storage)?;
        credit(storage, &mut ledger, &game.player1, payout.player1)?;
        if let Some(player2) = &game.player2 {
            credit(storage, &mut ledger, player2, payout.player2)?;
        }
        if ledger.credited > ledger.escrowed() {
            return Err(StdError::generic_err("credited funds exceed escrow"));
        }
        LEDGER.save(storage, &ledger)
    }

    pub fn create_game(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        commitment: HexBinary,
    ) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let stake = paid_stake(&info, &config.denom)?;
        check_commitment(&commitment)?;

        let game_id = TOTAL_GAMES.load(deps.storage)?;
        let game = Game::new(game_id, info.sender, commitment, stake, env.block.time)?;

        GAMES.save(deps.storage, game_id, &game)?;
        TOTAL_GAMES.save(deps.storage, &(game_id + 1))?;
        LEDGER.update(deps.storage, |mut ledger| -> StdResult<_> {
            ledger.deposited += stake;
            Ok(ledger)
        })?;

        Ok(Response::default()
            .add_attribute("action", "create_game")
            .add_attribute("game_id", game_id.to_string())
            .add_attribute("player", game.player1.to_string())
            .add_attribute("stake", stake.to_string()))
    }

    pub fn join_game(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        game_id: u64,
        entry: Entry,
    ) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let mut game = load_game(deps.storage, game_id)?;
        let stake = paid_stake(&info, &config.denom)?;
        if let Entry::Sealed { commitment } = &entry {
            check_commitment(commitment)?;
        }

        game.join(info.sender.clone(), entry, stake, env.block.time)?;

        GAMES.save(deps.storage, game_id, &game)?;
        LEDGER.update(deps.storage, |mut ledger| -> StdResult<_> {
            ledger.deposited += stake;
            Ok(ledger)
        })?;

        Ok(Response::default()
            .add_attribute("action", "join_game")
            .add_attribute("game_id", game_id.to_string())
            .add_attribute("player", info.sender.to_string())
            .add_attribute("pot", game.pot.to_string()))
    }

    pub fn reveal(
        deps: DepsMut,
        info: MessageInfo,
        game_id: u64,
        choice: u8,
        secret: &str,
    ) -> Result<Response, ContractError> {
        let mut game = load_game(deps.storage, game_id)?;
        let settled = game.reveal(&info.sender, choice, secret)?;

        let mut response = Response::default()
            .add_attribute("action", "reveal")
            .add_attribute("game_id", game_id.to_string())
            .add_attribute("player", info.sender.to_string())
            .add_attribute("choice", choice.to_string());

        if let Some((outcome, payout)) = settled {
            credit_payout(deps.storage, &game, payout)?;
            response = response
                .add_attribute("outcome", outcome.code().to_string())
                .add_attribute("payout1", payout.player1.to_string())
                .add_attribute("payout2", payout.player2.to_string());
        }
        GAMES.save(deps.storage, game_id, &game)?;

        Ok(response)
    }

    pub fn claim(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        game_id: u64,
    ) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let mut game = load_game(deps.storage, game_id)?;

        let payout = game.claim(&info.sender, env.block.time, config.reveal_timeout)?;
        credit_payout(deps.storage, &game, payout)?;
        GAMES.save(deps.storage, game_id, &game)?;

        Ok(Response::default()
            .add_attribute("action", "claim")
            .add_attribute("game_id", game_id.to_string())
            .add_attribute("player", info.sender.to_string())
            .add_attribute("amount", game.pot.to_string()))
    }

    pub fn rescind_game(
        deps: DepsMut,
        info: MessageInfo,
        game_id: u64,
    ) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let mut game = load_game(deps.storage, game_id)?;

        let refund = game.rescind(&info.sender)?;
        GAMES.save(deps.storage, game_id, &game)?;
        LEDGER.update(deps.storage, |mut ledger| -> StdResult<_> {
            ledger.withdrawn += refund;
            Ok(ledger)
        })?;

        Ok(Response::default()
            .add_message(BankMsg::Send {
                to_address: info.sender.to_string(),
                amount: coins(refund.u128(), config.denom),
            })
            .add_attribute("action", "rescind_game")
            .add_attribute("game_id", game_id.to_string())
            .add_attribute("player", info.sender.to_string())
            .add_attribute("amount", refund.to_string()))
    }

    pub fn withdraw(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
        let config = CONFIG.load(deps.storage)?;
        let amount = BALANCES
            .may_load(deps.storage, &info.sender)?
            .unwrap_or_default();
        ensure!(!amount.is_zero(), ContractError::NoWithdrawableBalance);

        // The balance is cleared before the transfer is dispatched.
        BALANCES.remove(deps.storage, &info.sender);
        LEDGER.update(deps.storage, |mut ledger| -> StdResult<_> {
            ledger.credited -= amount;
            ledger.withdrawn += amount;
            Ok(ledger)
        })?;

        let send = BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: coins(amount.u128(), config.denom),
        };
        Ok(Response::default()
            .add_submessage(SubMsg::reply_on_error(send, WITHDRAW_REPLY_ID))
            .add_attribute("action", "withdraw")
            .add_attribute("player", info.sender.to_string())
            .add_attribute("amount", amount.to_string()))
    }
}

pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => Ok(to_json_binary(&CONFIG.load(deps.storage)?)?),
        QueryMsg::TotalGames {} => Ok(to_json_binary(&query::total_games(deps)?)?),
        QueryMsg::Game { game_id } => Ok(to_json_binary(&load_game(deps.storage, game_id)?)?),
        QueryMsg::Games { start_after, limit } => {
            Ok(to_json_binary(&query::games(deps, start_after, limit)?)?)
        }
        QueryMsg::Balance { address } => {
            let addr = deps.api.addr_validate(&address)?;
            Ok(to_json_binary(&query::balance(deps, addr)?)?)
        }
        QueryMsg::Ledger {} => Ok(to_json_binary(&LEDGER.load(deps.storage)?)?),
        QueryMsg::Winner { move1, move2 } => {
            Ok(to_json_binary(&query::winner(move1, move2)?)?)
        }
        QueryMsg::EncryptMove {
            player,
            choice,
            secret,
        } => {
            let player_addr = deps.api.addr_validate(&player)?;
            Ok(to_json_binary(&query::encrypt_move(
                &player_addr,
                choice,
                &secret,
            )?)?)
        }
    }
}

mod query {
    use super::*;
    use crate::commitment;
    use crate::msg::{
        BalanceResponse, CommitmentResponse, GamesResponse, TotalGamesResponse, WinnerResponse,
    };
    use cosmwasm_std::Order;
    use cw_storage_plus::Bound;

    const DEFAULT_LIMIT: u32 = 10;
    const MAX_LIMIT: u32 = 30;

    pub fn total_games(deps: Deps) -> Result<TotalGamesResponse, ContractError> {
        let total = TOTAL_GAMES.load(deps.storage)?;
        Ok(TotalGamesResponse { total })
    }

    pub fn games(
        deps: Deps,
        start_after: Option<u64>,
        limit: Option<u32>,
    ) -> Result<GamesResponse, ContractError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
        let games: StdResult<Vec<_>> = GAMES
            .range(
                deps.storage,
                start_after.map(Bound::exclusive),
                None,
                Order::Ascending,
            )
            .take(limit)
            .map(|game| game.map(|(_, game)| game))
            .collect();

        Ok(GamesResponse { games: games? })
    }

    pub fn balance(deps: Deps, addr: Addr) -> Result<BalanceResponse, ContractError> {
        let amount = BALANCES.may_load(deps.storage, &addr)?.unwrap_or_default();
        Ok(BalanceResponse {
            address: addr.to_string(),
            amount,
        })
    }

    pub fn winner(move1: u8, move2: u8) -> Result<WinnerResponse, ContractError> {
        let outcome = crate::game::winner(Move::try_from(move1)?, Move::try_from(move2)?);
        Ok(WinnerResponse {
            winner: outcome.code(),
            outcome,
        })
    }

    pub fn encrypt_move(
        player: &Addr,
        choice: u8,
        secret: &str,
    ) -> Result<CommitmentResponse, ContractError> {
        let commitment = commitment::encrypt_move(Move::try_from(choice)?, secret, player);
        Ok(CommitmentResponse { commitment })
    }
}
