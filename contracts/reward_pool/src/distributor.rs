use soroban_sdk::{contracttype, symbol_short, Env, Symbol, I256};

use crate::{ledger, rewards, ContractError};

const ROUNDS: Symbol = symbol_short!("ROUNDS");
const REWARDS_IN: Symbol = symbol_short!("RWD_IN");
const REWARDS_OUT: Symbol = symbol_short!("RWD_OUT");

/// Outcome of one reward round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundReceipt {
    pub round: u64,
    pub amount: i128,
    pub total_staked: i128,
    pub acc_reward_per_share: I256,
    pub rewards_deposited: i128,
}

/// Compute the round that depositing `amount` would produce, without
/// writing anything.
///
/// Every way a deposit can fail is detected here, so once the funds have
/// been received [`commit`] cannot fail. The only limit on the round size
/// is that cumulative deposits, and so every payout, stay within i128.
pub fn prepare(env: &Env, amount: i128) -> Result<RoundReceipt, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let total_staked = ledger::total_staked(env);
    let acc = rewards::accumulate(
        env,
        &rewards::acc_reward_per_share(env),
        amount,
        total_staked,
    )?;

    Ok(RoundReceipt {
        round: reward_rounds(env).saturating_add(1),
        amount,
        total_staked,
        acc_reward_per_share: acc,
        rewards_deposited: rewards_deposited(env)
            .checked_add(amount)
            .ok_or(ContractError::Overflow)?,
    })
}

/// Apply a prepared round.
///
/// Only the accumulator and the round bookkeeping change; no staker record
/// is read or written, so the cost does not depend on how many stakers the
/// pool has.
pub fn commit(env: &Env, receipt: &RoundReceipt) {
    rewards::set_acc_reward_per_share(env, &receipt.acc_reward_per_share);
    env.storage().instance().set(&ROUNDS, &receipt.round);
    env.storage()
        .instance()
        .set(&REWARDS_IN, &receipt.rewards_deposited);
}

/// Record reward paid out by a withdrawal.
pub fn record_paid(env: &Env, reward: i128) -> Result<(), ContractError> {
    let paid = rewards_paid(env)
        .checked_add(reward)
        .ok_or(ContractError::Overflow)?;
    env.storage().instance().set(&REWARDS_OUT, &paid);
    Ok(())
}

/// Number of reward rounds distributed so far.
pub fn reward_rounds(env: &Env) -> u64 {
    env.storage().instance().get(&ROUNDS).unwrap_or(0)
}

/// Cumulative reward deposited across all rounds.
pub fn rewards_deposited(env: &Env) -> i128 {
    env.storage().instance().get(&REWARDS_IN).unwrap_or(0)
}

/// Cumulative reward paid to withdrawing stakers.
pub fn rewards_paid(env: &Env) -> i128 {
    env.storage().instance().get(&REWARDS_OUT).unwrap_or(0)
}
