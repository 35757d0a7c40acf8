//! # Pool State Invariants
//!
//! Invariants that must hold after every pool operation, checked against a
//! [`PoolSnapshot`] captured through the public contract interface. Used by
//! the property tests and the fuzz harness.
//!
//! Capturing a snapshot is O(n) in the number of tracked stakers; the pool
//! itself never iterates its stakers.

extern crate std;

use std::string::{String, ToString};
use std::vec::Vec;

use soroban_sdk::{token, Address, Env, I256};

use crate::RewardPoolContractClient;

// ── Snapshot ─────────────────────────────────────────────────────────────────

/// Observable pool state at one point in an operation sequence.
#[derive(Clone, Debug)]
pub struct PoolSnapshot {
    pub total_staked: i128,
    pub acc_reward_per_share: I256,
    pub reward_rounds: u64,
    pub rewards_deposited: i128,
    pub rewards_paid: i128,
    /// Pool's balance of the staked asset.
    pub asset_balance: i128,
    /// `(staker, principal, pending_reward, shares)` for every tracked staker.
    pub positions: Vec<(Address, i128, i128, i128)>,
}

impl PoolSnapshot {
    pub fn capture(env: &Env, pool: &Address, stakers: &[Address]) -> Self {
        let client = RewardPoolContractClient::new(env, pool);
        let asset = token::Client::new(env, &client.asset());

        let positions = stakers
            .iter()
            .map(|s| {
                let info = client.get_staker(s);
                (s.clone(), info.principal, info.pending_reward, info.shares)
            })
            .collect();

        Self {
            total_staked: client.total_staked(),
            acc_reward_per_share: client.acc_reward_per_share(),
            reward_rounds: client.reward_rounds(),
            rewards_deposited: client.rewards_deposited(),
            rewards_paid: client.rewards_paid(),
            asset_balance: asset.balance(pool),
            positions,
        }
    }

    pub fn sum_principal(&self) -> i128 {
        self.positions.iter().map(|(_, p, _, _)| *p).sum()
    }

    pub fn sum_pending(&self) -> i128 {
        self.positions.iter().map(|(_, _, r, _)| *r).sum()
    }

    /// Reward deposited but owed to nobody: floor-division dust.
    pub fn stranded(&self) -> i128 {
        self.rewards_deposited - self.rewards_paid - self.sum_pending()
    }

    fn position(&self, staker: &Address) -> Option<&(Address, i128, i128, i128)> {
        self.positions.iter().find(|(a, _, _, _)| a == staker)
    }
}

// ── Invariant Trait ──────────────────────────────────────────────────────────

/// A named invariant that can be verified against a snapshot.
pub trait Invariant {
    fn name(&self) -> &str;

    /// `Err(description)` on violation.
    fn check(&self, snapshot: &PoolSnapshot) -> Result<(), String>;
}

// ── Built-in Invariants ──────────────────────────────────────────────────────

/// `total_staked == Σ principal` over the tracked stakers.
///
/// Only meaningful when every address that ever staked is tracked.
pub struct TotalStakeConsistency;

impl Invariant for TotalStakeConsistency {
    fn name(&self) -> &str {
        "total_staked == sum(principal)"
    }

    fn check(&self, snapshot: &PoolSnapshot) -> Result<(), String> {
        let sum = snapshot.sum_principal();
        if snapshot.total_staked != sum {
            return Err(std::format!(
                "total staked ({}) != sum of principal ({})",
                snapshot.total_staked,
                sum
            ));
        }
        Ok(())
    }
}

/// Share balance mirrors principal for every staker.
pub struct SharesMirrorPrincipal;

impl Invariant for SharesMirrorPrincipal {
    fn name(&self) -> &str {
        "shares == principal"
    }

    fn check(&self, snapshot: &PoolSnapshot) -> Result<(), String> {
        for (addr, principal, _, shares) in &snapshot.positions {
            if principal != shares {
                return Err(std::format!(
                    "{:?} holds {} shares for principal {}",
                    addr,
                    shares,
                    principal
                ));
            }
        }
        Ok(())
    }
}

/// Principal and pending reward are never negative.
pub struct NonNegativePositions;

impl Invariant for NonNegativePositions {
    fn name(&self) -> &str {
        "principal >= 0 and pending >= 0"
    }

    fn check(&self, snapshot: &PoolSnapshot) -> Result<(), String> {
        for (addr, principal, pending, _) in &snapshot.positions {
            if *principal < 0 || *pending < 0 {
                return Err(std::format!(
                    "{:?} has principal {} and pending {}",
                    addr,
                    principal,
                    pending
                ));
            }
        }
        Ok(())
    }
}

/// The pool can always pay every staker out in full.
pub struct Solvency;

impl Invariant for Solvency {
    fn name(&self) -> &str {
        "asset balance >= total_staked + sum(pending)"
    }

    fn check(&self, snapshot: &PoolSnapshot) -> Result<(), String> {
        let owed = snapshot.total_staked + snapshot.sum_pending();
        if snapshot.asset_balance < owed {
            return Err(std::format!(
                "balance {} cannot cover {} owed",
                snapshot.asset_balance,
                owed
            ));
        }
        Ok(())
    }
}

/// Stranded dust is non-negative and at most `max` base units.
///
/// Flooring the accumulator strands less than `total_staked / SCALE + 1`
/// units per round, and each position strands less than one more when its
/// reward is floored. [`round_dust_allowance`] gives the per-round term.
pub struct DustBound {
    pub max: i128,
}

impl Invariant for DustBound {
    fn name(&self) -> &str {
        "0 <= stranded dust <= bound"
    }

    fn check(&self, snapshot: &PoolSnapshot) -> Result<(), String> {
        let stranded = snapshot.stranded();
        if stranded < 0 || stranded > self.max {
            return Err(std::format!(
                "stranded dust {} outside [0, {}]",
                stranded,
                self.max
            ));
        }
        Ok(())
    }
}

/// Upper bound on what one round of `total_staked` can strand.
pub fn round_dust_allowance(total_staked: i128) -> i128 {
    total_staked / crate::rewards::SCALE + 1
}

// ── Invariant Set ────────────────────────────────────────────────────────────

/// A composable set of invariants checked together.
pub struct InvariantSet {
    invariants: Vec<std::boxed::Box<dyn Invariant>>,
}

impl InvariantSet {
    pub fn new() -> Self {
        Self {
            invariants: Vec::new(),
        }
    }

    /// Every state invariant except the dust bound, which needs the
    /// caller's operation counts.
    pub fn pool_defaults() -> Self {
        let mut set = Self::new();
        set.add(std::boxed::Box::new(TotalStakeConsistency));
        set.add(std::boxed::Box::new(SharesMirrorPrincipal));
        set.add(std::boxed::Box::new(NonNegativePositions));
        set.add(std::boxed::Box::new(Solvency));
        set
    }

    pub fn add(&mut self, invariant: std::boxed::Box<dyn Invariant>) {
        self.invariants.push(invariant);
    }

    /// `(invariant_name, violation)` for every failure.
    pub fn check_all(&self, snapshot: &PoolSnapshot) -> Vec<(String, String)> {
        let mut violations = Vec::new();
        for inv in &self.invariants {
            if let Err(msg) = inv.check(snapshot) {
                violations.push((inv.name().to_string(), msg));
            }
        }
        violations
    }

    /// Panic with a report listing every violation.
    pub fn assert_all(&self, snapshot: &PoolSnapshot) {
        let violations = self.check_all(snapshot);
        if !violations.is_empty() {
            let mut report = String::from("Invariant violations detected:\n");
            for (name, msg) in &violations {
                report.push_str(&std::format!("  [{}]: {}\n", name, msg));
            }
            panic!("{}", report);
        }
    }

    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

impl Default for InvariantSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── Transition Invariants ────────────────────────────────────────────────────

/// Checks between the snapshots taken before and after one operation.
pub fn check_transition(before: &PoolSnapshot, after: &PoolSnapshot) -> Result<(), String> {
    if after.acc_reward_per_share < before.acc_reward_per_share {
        return Err(std::format!(
            "accumulator decreased: {:?} -> {:?}",
            before.acc_reward_per_share,
            after.acc_reward_per_share
        ));
    }

    // Only a withdrawal may lower a pending reward, and it zeroes principal.
    for (addr, principal, pending, _) in &after.positions {
        if *principal == 0 {
            continue;
        }
        if let Some((_, prev_principal, prev_pending, _)) = before.position(addr) {
            if *prev_principal > 0 && pending < prev_pending {
                return Err(std::format!(
                    "pending reward of {:?} decreased: {} -> {}",
                    addr,
                    prev_pending,
                    pending
                ));
            }
        }
    }
    Ok(())
}
