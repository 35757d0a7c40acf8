use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, I256};

use crate::rewards;
use crate::ContractError;

// ── Storage key constants ───────────────────────────────────────────────────

const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");
const STAKER: Symbol = symbol_short!("STAKER");

const STAKER_TTL_THRESHOLD: u32 = 5_184_000; // ~60 days
const STAKER_TTL_EXTEND_TO: u32 = 10_368_000; // ~120 days

// ── Types ───────────────────────────────────────────────────────────────────

/// One participant's position in the pool.
///
/// An account with zero principal is never stored; withdrawing removes the
/// entry so a later `stake` starts from scratch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerAccount {
    /// Base units currently staked.
    pub principal: i128,
    /// Accumulator value when `principal` was last set.
    pub reward_debt: I256,
    /// Reward settled by a re-stake and not yet paid out.
    pub settled_reward: i128,
}

/// Amounts released by a withdrawal, handed to the caller for transfer.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payout {
    pub principal: i128,
    pub reward: i128,
}

impl Payout {
    pub fn total(&self) -> Result<i128, ContractError> {
        self.principal
            .checked_add(self.reward)
            .ok_or(ContractError::Overflow)
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn staker_key(account: &Address) -> (Symbol, Address) {
    (STAKER, account.clone())
}

fn extend_staker_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, STAKER_TTL_THRESHOLD, STAKER_TTL_EXTEND_TO);
}

fn store_staker(env: &Env, account: &Address, record: &StakerAccount) {
    let key = staker_key(account);
    env.storage().persistent().set(&key, record);
    extend_staker_ttl(env, &key);
}

fn set_total_staked(env: &Env, total: i128) {
    env.storage().instance().set(&TOTAL_STAKED, &total);
}

/// Retrieve a staker's record, returning `None` when absent.
pub fn staker(env: &Env, account: &Address) -> Option<StakerAccount> {
    let key = staker_key(account);
    let record = env.storage().persistent().get(&key);
    if record.is_some() {
        extend_staker_ttl(env, &key);
    }
    record
}

/// Sum of every staker's principal. Reward deposits never change it.
pub fn total_staked(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
}

// ── Ledger operations ───────────────────────────────────────────────────────

/// Reward a record has accrued against the accumulator value `acc`.
fn accrued(env: &Env, record: &StakerAccount, acc: &I256) -> Result<i128, ContractError> {
    record
        .settled_reward
        .checked_add(rewards::owed(
            env,
            record.principal,
            acc,
            &record.reward_debt,
        )?)
        .ok_or(ContractError::Overflow)
}

/// Add `amount` to `account`'s principal.
///
/// A re-stake first moves whatever the existing principal has accrued into
/// `settled_reward`, then resets `reward_debt` to the current accumulator so
/// the new principal only earns from later rounds.
pub fn stake(env: &Env, account: &Address, amount: i128) -> Result<StakerAccount, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let acc = rewards::acc_reward_per_share(env);
    let record = match staker(env, account) {
        Some(prev) => StakerAccount {
            principal: prev
                .principal
                .checked_add(amount)
                .ok_or(ContractError::Overflow)?,
            settled_reward: accrued(env, &prev, &acc)?,
            reward_debt: acc,
        },
        None => StakerAccount {
            principal: amount,
            reward_debt: acc,
            settled_reward: 0,
        },
    };

    let new_total = total_staked(env)
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;

    store_staker(env, account, &record);
    set_total_staked(env, new_total);

    Ok(record)
}

/// Reward `account` would receive if it withdrew now. Zero when absent.
pub fn pending_reward(env: &Env, account: &Address) -> Result<i128, ContractError> {
    match staker(env, account) {
        Some(record) => accrued(env, &record, &rewards::acc_reward_per_share(env)),
        None => Ok(0),
    }
}

/// Close `account`'s position.
///
/// The pending reward is computed and the record removed in one step, and
/// the prior record is returned alongside the payout so a failed transfer
/// can be compensated with [`restore`].
pub fn withdraw(env: &Env, account: &Address) -> Result<(StakerAccount, Payout), ContractError> {
    let prior = staker(env, account)
        .filter(|r| r.principal > 0)
        .ok_or(ContractError::NothingStaked)?;

    let payout = Payout {
        principal: prior.principal,
        reward: accrued(env, &prior, &rewards::acc_reward_per_share(env))?,
    };

    let new_total = total_staked(env)
        .checked_sub(prior.principal)
        .filter(|t| *t >= 0)
        .ok_or(ContractError::Overflow)?;

    env.storage().persistent().remove(&staker_key(account));
    set_total_staked(env, new_total);

    Ok((prior, payout))
}

/// Undo a [`withdraw`] whose payout could not be delivered.
pub fn restore(env: &Env, account: &Address, prior: &StakerAccount) -> Result<(), ContractError> {
    let new_total = total_staked(env)
        .checked_add(prior.principal)
        .ok_or(ContractError::Overflow)?;

    store_staker(env, account, prior);
    set_total_staked(env, new_total);
    Ok(())
}
