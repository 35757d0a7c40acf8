#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reward_pool::invariants::{
    check_transition, round_dust_allowance, DustBound, Invariant, InvariantSet, PoolSnapshot,
};
use reward_pool::{RewardPoolContract, RewardPoolContractClient};
use share_token::{ShareTokenContract, ShareTokenContractClient};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{token, Address, Env, String};

const STAKERS: usize = 4;
/// One whole token at 18 decimals.
const TOKEN: i128 = 1_000_000_000_000_000_000;
const FUNDING: i128 = 1_000_000_000_000 * TOKEN;

/// `tokens` whole tokens plus `wei` base units.
#[derive(Arbitrary, Debug, Clone, Copy)]
struct Amount {
    tokens: u32,
    wei: u64,
}

impl Amount {
    fn value(self) -> i128 {
        i128::from(self.tokens) * TOKEN + i128::from(self.wei)
    }
}

#[derive(Arbitrary, Debug)]
enum Op {
    Stake { who: u8, amount: Amount },
    Deposit { amount: Amount },
    Withdraw { who: u8 },
    /// Reward deposit attempted by a staker instead of the admin.
    Intrude { who: u8, amount: Amount },
}

#[derive(Arbitrary, Debug)]
struct Input {
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 64 {
        return;
    }

    let env = Env::default();
    env.mock_all_auths();

    let sac = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let asset = token::StellarAssetClient::new(&env, &sac.address());

    let pool = env.register(RewardPoolContract, ());
    let share_id = env.register(ShareTokenContract, ());
    ShareTokenContractClient::new(&env, &share_id).initialize(
        &pool,
        &7,
        &String::from_str(&env, "Pool Share"),
        &String::from_str(&env, "PSHR"),
    );

    let admin = Address::generate(&env);
    let client = RewardPoolContractClient::new(&env, &pool);
    client.initialize(&admin, &sac.address(), &share_id);
    asset.mint(&admin, &FUNDING);

    let stakers: Vec<Address> = (0..STAKERS)
        .map(|_| {
            let who = Address::generate(&env);
            asset.mint(&who, &FUNDING);
            who
        })
        .collect();

    let checks = InvariantSet::pool_defaults();
    let mut dust_allowance: i128 = 0;
    let mut before = PoolSnapshot::capture(&env, &pool, &stakers);

    for op in &input.ops {
        match op {
            Op::Stake { who, amount } => {
                let staker = &stakers[*who as usize % STAKERS];
                if client.try_stake(staker, &amount.value()).is_ok() {
                    dust_allowance += 1;
                }
            }
            Op::Deposit { amount } => {
                if let Ok(Ok(receipt)) = client.try_deposit_rewards(&admin, &amount.value()) {
                    dust_allowance += round_dust_allowance(receipt.total_staked);
                }
            }
            Op::Withdraw { who } => {
                let _ = client.try_withdraw(&stakers[*who as usize % STAKERS]);
            }
            Op::Intrude { who, amount } => {
                let caller = &stakers[*who as usize % STAKERS];
                assert!(client
                    .try_deposit_rewards(caller, &amount.value())
                    .is_err());
            }
        }

        let after = PoolSnapshot::capture(&env, &pool, &stakers);
        checks.assert_all(&after);
        if let Err(msg) = check_transition(&before, &after) {
            panic!("{:?}: {}", op, msg);
        }
        before = after;
    }

    if let Err(msg) = (DustBound { max: dust_allowance }).check(&before) {
        panic!("{}", msg);
    }
});
