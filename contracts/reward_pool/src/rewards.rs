use soroban_sdk::{symbol_short, Env, Symbol, I256};

use crate::ContractError;

/// Fixed-point scaling factor for the reward-per-share accumulator.
///
/// Every reward round adds `reward × SCALE / total_staked` to the
/// accumulator, so sub-unit shares of a round survive integer division.
/// With 10^18 the per-round floor loses less than one base unit per
/// `10^18 / total_staked` staked units.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

const ACC_RPS: Symbol = symbol_short!("ACC_RPS");

// ── Core reward engine ──────────────────────────────────────────────────────
//
// The accumulator and both products are 256-bit. The accumulator never
// exceeds `rewards_deposited × SCALE`, and `principal × Δacc` never exceeds
// the rewards deposited while that principal was staked times `SCALE`, so
// with every amount an i128 neither can leave I256. Only the final payout is
// narrowed back to i128.

/// Advance the accumulator by one reward round.
///
/// ```text
/// Δacc    = reward × SCALE / total_staked        (floor)
/// new_acc = stored + Δacc
/// ```
///
/// An empty pool has nobody to attribute the round to, so the call fails
/// with `NoStakers` instead of stranding the funds.
///
/// # Arguments
/// * `stored`       – current accumulator value (scaled by SCALE)
/// * `reward`       – base units deposited this round
/// * `total_staked` – aggregate principal at the moment of the deposit
pub fn accumulate(
    env: &Env,
    stored: &I256,
    reward: i128,
    total_staked: i128,
) -> Result<I256, ContractError> {
    if total_staked <= 0 {
        return Err(ContractError::NoStakers);
    }
    if reward <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let delta = I256::from_i128(env, reward)
        .mul(&I256::from_i128(env, SCALE))
        .div(&I256::from_i128(env, total_staked));

    Ok(stored.add(&delta))
}

/// Reward accrued by `principal` between two accumulator readings.
///
/// ```text
/// owed = principal × (current − snapshot) / SCALE    (floor)
/// ```
///
/// Only the accumulation since `snapshot` is counted, so a round that
/// happened before the account's last settlement is never paid twice.
pub fn owed(
    env: &Env,
    principal: i128,
    current: &I256,
    snapshot: &I256,
) -> Result<i128, ContractError> {
    if principal <= 0 {
        return Ok(0);
    }
    let zero = I256::from_i128(env, 0);
    if current < snapshot {
        return Err(ContractError::Overflow);
    }
    let delta = current.sub(snapshot);
    if delta == zero {
        return Ok(0);
    }

    I256::from_i128(env, principal)
        .mul(&delta)
        .div(&I256::from_i128(env, SCALE))
        .to_i128()
        .ok_or(ContractError::Overflow)
}

// ── Storage helpers ─────────────────────────────────────────────────────────

/// Current accumulator value; zero before the first reward round.
pub fn acc_reward_per_share(env: &Env) -> I256 {
    env.storage()
        .instance()
        .get(&ACC_RPS)
        .unwrap_or_else(|| I256::from_i128(env, 0))
}

pub(crate) fn set_acc_reward_per_share(env: &Env, value: &I256) {
    env.storage().instance().set(&ACC_RPS, value);
}

// ── Unit tests ──────────────────────────────────────────────────────────────
