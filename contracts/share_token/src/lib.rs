#![no_std]

pub mod events;

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, String, Symbol};

/// Storage keys for the contract
const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
const DECIMALS: Symbol = symbol_short!("DECIMALS");
const NAME: Symbol = symbol_short!("NAME");
const SYMBOL: Symbol = symbol_short!("SYMBOL");
const TOTAL_SUPPLY: Symbol = symbol_short!("SUPPLY");
const BALANCE: Symbol = symbol_short!("BAL");

const BALANCE_TTL_THRESHOLD: u32 = 5_184_000; // ~60 days
const BALANCE_TTL_EXTEND_TO: u32 = 10_368_000; // ~120 days

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum TokenError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidAmount = 3,
    InsufficientBalance = 4,
    Overflow = 5,
}

/// Non-transferable accounting token. Balances are minted and burned only
/// by the admin (the pool contract) and mirror each holder's staked
/// principal.
#[contract]
pub struct ShareTokenContract;

#[contractimpl]
impl ShareTokenContract {
    /// Initialize the token with the minting authority and metadata
    pub fn initialize(
        env: Env,
        admin: Address,
        decimal: u32,
        name: String,
        symbol: String,
    ) -> Result<(), TokenError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(TokenError::AlreadyInitialized);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&DECIMALS, &decimal);
        env.storage().instance().set(&NAME, &name);
        env.storage().instance().set(&SYMBOL, &symbol);
        env.storage().instance().set(&INITIALIZED, &true);

        Ok(())
    }

    /// Credit `amount` shares to `to`
    pub fn mint(env: Env, to: Address, amount: i128) -> Result<(), TokenError> {
        Self::require_admin(&env)?;
        if amount <= 0 {
            return Err(TokenError::InvalidAmount);
        }

        let balance = Self::balance(env.clone(), to.clone())
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let supply = Self::total_supply(env.clone())
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        Self::write_balance(&env, &to, balance);
        env.storage().instance().set(&TOTAL_SUPPLY, &supply);

        events::publish_minted(&env, to, amount, balance);

        Ok(())
    }

    /// Debit `amount` shares from `from`
    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), TokenError> {
        Self::require_admin(&env)?;
        if amount <= 0 {
            return Err(TokenError::InvalidAmount);
        }

        let held = Self::balance(env.clone(), from.clone());
        if held < amount {
            return Err(TokenError::InsufficientBalance);
        }
        let balance = held - amount;
        let supply = Self::total_supply(env.clone()) - amount;

        Self::write_balance(&env, &from, balance);
        env.storage().instance().set(&TOTAL_SUPPLY, &supply);

        events::publish_burned(&env, from, amount, balance);

        Ok(())
    }

    /// Shares held by `id`
    pub fn balance(env: Env, id: Address) -> i128 {
        let key = (BALANCE, id);
        let balance = env.storage().persistent().get(&key);
        if balance.is_some() {
            env.storage()
                .persistent()
                .extend_ttl(&key, BALANCE_TTL_THRESHOLD, BALANCE_TTL_EXTEND_TO);
        }
        balance.unwrap_or(0)
    }

    pub fn total_supply(env: Env) -> i128 {
        env.storage().instance().get(&TOTAL_SUPPLY).unwrap_or(0)
    }

    pub fn decimals(env: Env) -> u32 {
        env.storage().instance().get(&DECIMALS).unwrap_or(0)
    }

    pub fn name(env: Env) -> Result<String, TokenError> {
        env.storage()
            .instance()
            .get(&NAME)
            .ok_or(TokenError::NotInitialized)
    }

    pub fn symbol(env: Env) -> Result<String, TokenError> {
        env.storage()
            .instance()
            .get(&SYMBOL)
            .ok_or(TokenError::NotInitialized)
    }

    /// Get the minting authority
    pub fn admin(env: Env) -> Result<Address, TokenError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(TokenError::NotInitialized)
    }

    fn require_admin(env: &Env) -> Result<(), TokenError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(TokenError::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }

    fn write_balance(env: &Env, id: &Address, balance: i128) {
        let key = (BALANCE, id.clone());
        if balance == 0 {
            env.storage().persistent().remove(&key);
            return;
        }
        env.storage().persistent().set(&key, &balance);
        env.storage()
            .persistent()
            .extend_ttl(&key, BALANCE_TTL_THRESHOLD, BALANCE_TTL_EXTEND_TO);
    }
}

#[cfg(test)]
mod test;
