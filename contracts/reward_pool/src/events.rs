use soroban_sdk::{contracttype, symbol_short, Address, Env, I256};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub asset: Address,
    pub share_token: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub principal: i128,
    pub total_staked: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsDepositedEvent {
    pub round: u64,
    pub amount: i128,
    pub total_staked: i128,
    pub acc_reward_per_share: I256,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub principal: i128,
    pub reward: i128,
    pub total_staked: i128,
}

pub fn publish_initialized(env: &Env, admin: Address, asset: Address, share_token: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            asset,
            share_token,
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, principal: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("STAKE"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            principal,
            total_staked,
        },
    );
}

pub fn publish_rewards_deposited(
    env: &Env,
    admin: Address,
    round: u64,
    amount: i128,
    total_staked: i128,
    acc_reward_per_share: I256,
) {
    env.events().publish(
        (symbol_short!("REWARD"), admin),
        RewardsDepositedEvent {
            round,
            amount,
            total_staked,
            acc_reward_per_share,
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, principal: i128, reward: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), staker.clone()),
        WithdrawnEvent {
            staker,
            principal,
            reward,
            total_staked,
        },
    );
}
