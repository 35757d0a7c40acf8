use soroban_sdk::{token, Address, Env};

use crate::ContractError;

/// Moves the pool asset between a participant and the pool.
///
/// Implementations report failure instead of trapping so that the
/// controller can undo its own ledger writes before surfacing
/// `TransferFailed`.
pub trait FundsTransfer {
    /// Move `amount` from `from` into the pool.
    fn pull(&self, from: &Address, amount: i128) -> Result<(), ContractError>;

    /// Move `amount` from the pool to `to`.
    fn push(&self, to: &Address, amount: i128) -> Result<(), ContractError>;
}

/// [`FundsTransfer`] backed by a SEP-41 token contract.
pub struct TokenTransfer<'a> {
    env: &'a Env,
    token: token::Client<'a>,
}

impl<'a> TokenTransfer<'a> {
    pub fn new(env: &'a Env, asset: &Address) -> Self {
        Self {
            env,
            token: token::Client::new(env, asset),
        }
    }

    fn transfer(&self, from: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
        match self.token.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}

impl FundsTransfer for TokenTransfer<'_> {
    fn pull(&self, from: &Address, amount: i128) -> Result<(), ContractError> {
        self.transfer(from, &self.env.current_contract_address(), amount)
    }

    fn push(&self, to: &Address, amount: i128) -> Result<(), ContractError> {
        self.transfer(&self.env.current_contract_address(), to, amount)
    }
}
