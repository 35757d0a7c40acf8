use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintedEvent {
    pub to: Address,
    pub amount: i128,
    pub balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BurnedEvent {
    pub from: Address,
    pub amount: i128,
    pub balance: i128,
}

pub fn publish_minted(env: &Env, to: Address, amount: i128, balance: i128) {
    env.events().publish(
        (symbol_short!("MINT"), to.clone()),
        MintedEvent { to, amount, balance },
    );
}

pub fn publish_burned(env: &Env, from: Address, amount: i128, balance: i128) {
    env.events().publish(
        (symbol_short!("BURN"), from.clone()),
        BurnedEvent {
            from,
            amount,
            balance,
        },
    );
}
