#![no_std]

pub mod distributor;
pub mod events;
#[cfg(any(test, feature = "testutils"))]
pub mod invariants;
pub mod ledger;
pub mod rewards;
pub mod transfer;

use soroban_sdk::{
    contract, contractclient, contractimpl, contracttype, log, symbol_short, Address, Env, Symbol,
    I256,
};

pub use distributor::RoundReceipt;
pub use ledger::{Payout, StakerAccount};
use transfer::{FundsTransfer, TokenTransfer};

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
const ASSET: Symbol = symbol_short!("ASSET");
const SHARE_TOKEN: Symbol = symbol_short!("SHR_TOK");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotAdmin = 3,
    InvalidAmount = 4,
    NoStakers = 5,
    NothingStaked = 6,
    TransferFailed = 7,
    Overflow = 8,
    InvalidConfig = 9,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Snapshot of a staker's position returned by `get_staker`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub principal: i128,
    pub pending_reward: i128,
    pub shares: i128,
}

/// The part of the accounting token the pool drives.
#[contractclient(name = "ShareTokenClient")]
pub trait ShareTokenInterface {
    fn mint(env: Env, to: Address, amount: i128);
    fn burn(env: Env, from: Address, amount: i128);
    fn balance(env: Env, id: Address) -> i128;
    fn admin(env: Env) -> Address;
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct RewardPoolContract;

#[contractimpl]
impl RewardPoolContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `admin`       – the only address allowed to deposit rewards; fixed.
    /// * `asset`       – SEP-41 token staked and paid out by the pool.
    /// * `share_token` – accounting token, already initialized with this
    ///   contract as its admin.
    pub fn initialize(
        env: Env,
        admin: Address,
        asset: Address,
        share_token: Address,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();

        if asset == share_token {
            return Err(ContractError::InvalidConfig);
        }
        let minter = ShareTokenClient::new(&env, &share_token).try_admin();
        if !matches!(minter, Ok(Ok(ref a)) if *a == env.current_contract_address()) {
            log!(&env, "share token is not minted by this pool", share_token.clone());
            return Err(ContractError::InvalidConfig);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&ASSET, &asset);
        env.storage().instance().set(&SHARE_TOKEN, &share_token);
        env.storage().instance().set(&INITIALIZED, &true);

        events::publish_initialized(&env, admin, asset, share_token);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` of the pool asset and receive the same number of
    /// share tokens.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let funds = TokenTransfer::new(&env, &Self::asset_address(&env)?);
        let record = Self::stake_with(&env, &funds, &staker, amount)?;

        Self::share_client(&env)?.mint(&staker, &amount);

        events::publish_staked(
            &env,
            staker,
            amount,
            record.principal,
            ledger::total_staked(&env),
        );

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Distribute `amount` over everything currently staked, in proportion
    /// to each staker's principal. Admin only.
    pub fn deposit_rewards(
        env: Env,
        caller: Address,
        amount: i128,
    ) -> Result<RoundReceipt, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let funds = TokenTransfer::new(&env, &Self::asset_address(&env)?);
        let receipt = Self::deposit_rewards_with(&env, &funds, &caller, amount)?;

        events::publish_rewards_deposited(
            &env,
            caller,
            receipt.round,
            receipt.amount,
            receipt.total_staked,
            receipt.acc_reward_per_share.clone(),
        );

        Ok(receipt)
    }

    // ── Withdrawal ──────────────────────────────────────────────────────────

    /// Close the caller's position, paying out principal plus every reward
    /// accrued since it was opened, and burn the matching share tokens.
    pub fn withdraw(env: Env, staker: Address) -> Result<Payout, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let funds = TokenTransfer::new(&env, &Self::asset_address(&env)?);
        let payout = Self::withdraw_with(&env, &funds, &staker)?;

        let shares = Self::share_client(&env)?;
        let held = shares.balance(&staker);
        if held > 0 {
            shares.burn(&staker, &held);
        }

        events::publish_withdrawn(
            &env,
            staker,
            payout.principal,
            payout.reward,
            ledger::total_staked(&env),
        );

        Ok(payout)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Sum of all principal currently staked. Rewards are not included.
    pub fn total_staked(env: Env) -> i128 {
        ledger::total_staked(&env)
    }

    /// Reward `staker` would receive by withdrawing now.
    pub fn pending_reward(env: Env, staker: Address) -> Result<i128, ContractError> {
        ledger::pending_reward(&env, &staker)
    }

    /// Combined position of `staker`.
    pub fn get_staker(env: Env, staker: Address) -> Result<StakerInfo, ContractError> {
        let principal = ledger::staker(&env, &staker)
            .map(|r| r.principal)
            .unwrap_or(0);
        Ok(StakerInfo {
            principal,
            pending_reward: ledger::pending_reward(&env, &staker)?,
            shares: Self::share_client(&env)?.balance(&staker),
        })
    }

    pub fn acc_reward_per_share(env: Env) -> I256 {
        rewards::acc_reward_per_share(&env)
    }

    pub fn reward_rounds(env: Env) -> u64 {
        distributor::reward_rounds(&env)
    }

    pub fn rewards_deposited(env: Env) -> i128 {
        distributor::rewards_deposited(&env)
    }

    pub fn rewards_paid(env: Env) -> i128 {
        distributor::rewards_paid(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn asset(env: Env) -> Result<Address, ContractError> {
        Self::asset_address(&env)
    }

    /// Address of the accounting token that mirrors principal.
    pub fn share_token(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&SHARE_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn version() -> u32 {
        1
    }
}

// ── Ledger orchestration ─────────────────────────────────────────────────────
//
// The entry points above bind these to the pool asset; tests bind them to
// a `FundsTransfer` that can be made to fail.

impl RewardPoolContract {
    pub(crate) fn stake_with<F: FundsTransfer>(
        env: &Env,
        funds: &F,
        staker: &Address,
        amount: i128,
    ) -> Result<StakerAccount, ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        // Total principal is bounded by the asset's i128 supply, so the
        // ledger update cannot overflow once the funds have arrived.
        funds.pull(staker, amount)?;
        ledger::stake(env, staker, amount)
    }

    pub(crate) fn deposit_rewards_with<F: FundsTransfer>(
        env: &Env,
        funds: &F,
        caller: &Address,
        amount: i128,
    ) -> Result<RoundReceipt, ContractError> {
        Self::require_admin(env, caller)?;

        let receipt = distributor::prepare(env, amount)?;
        funds.pull(caller, amount)?;
        distributor::commit(env, &receipt);

        Ok(receipt)
    }

    pub(crate) fn withdraw_with<F: FundsTransfer>(
        env: &Env,
        funds: &F,
        staker: &Address,
    ) -> Result<Payout, ContractError> {
        let (prior, payout) = ledger::withdraw(env, staker)?;
        let total = payout.total()?;

        if let Err(err) = funds.push(staker, total) {
            log!(env, "payout failed, restoring position", staker.clone(), total);
            ledger::restore(env, staker, &prior)?;
            return Err(err);
        }

        distributor::record_paid(env, payout.reward)?;
        Ok(payout)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` is not the admin fixed at initialization.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != admin {
            log!(env, "deposit_rewards rejected for non-admin", caller.clone());
            return Err(ContractError::NotAdmin);
        }
        Ok(())
    }

    fn asset_address(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ASSET)
            .ok_or(ContractError::NotInitialized)
    }

    fn share_client(env: &Env) -> Result<ShareTokenClient<'_>, ContractError> {
        let address: Address = env
            .storage()
            .instance()
            .get(&SHARE_TOKEN)
            .ok_or(ContractError::NotInitialized)?;
        Ok(ShareTokenClient::new(env, &address))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_props;
