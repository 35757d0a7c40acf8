extern crate std;

use std::vec::Vec;

use proptest::prelude::*;
use share_token::{ShareTokenContract, ShareTokenContractClient};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{token, Address, Env, String, I256};

use crate::invariants::{
    check_transition, round_dust_allowance, DustBound, Invariant, InvariantSet, PoolSnapshot,
};
use crate::rewards::{accumulate, owed};
use crate::*;

const STAKERS: usize = 3;
/// One whole token at 18 decimals.
const TOKEN: i128 = 1_000_000_000_000_000_000;
const FUNDING: i128 = 1_000_000_000 * TOKEN;

#[derive(Clone, Debug)]
enum Op {
    Stake(usize, i128),
    Deposit(i128),
    Withdraw(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..STAKERS, 1i128..=1_000_000 * TOKEN).prop_map(|(who, amount)| Op::Stake(who, amount)),
        2 => (1i128..=1_000_000 * TOKEN).prop_map(Op::Deposit),
        1 => (0..STAKERS).prop_map(Op::Withdraw),
    ]
}

struct Harness<'a> {
    pool: Address,
    client: RewardPoolContractClient<'a>,
    admin: Address,
    stakers: Vec<Address>,
}

fn harness(env: &Env) -> Harness<'_> {
    env.mock_all_auths();

    let sac = env.register_stellar_asset_contract_v2(Address::generate(env));
    let asset_admin = token::StellarAssetClient::new(env, &sac.address());

    let pool = env.register(RewardPoolContract, ());
    let share_id = env.register(ShareTokenContract, ());
    ShareTokenContractClient::new(env, &share_id).initialize(
        &pool,
        &7,
        &String::from_str(env, "Pool Share"),
        &String::from_str(env, "PSHR"),
    );

    let admin = Address::generate(env);
    let client = RewardPoolContractClient::new(env, &pool);
    client.initialize(&admin, &sac.address(), &share_id);
    asset_admin.mint(&admin, &FUNDING);

    let stakers = (0..STAKERS)
        .map(|_| {
            let who = Address::generate(env);
            asset_admin.mint(&who, &FUNDING);
            who
        })
        .collect();

    Harness {
        pool,
        client,
        admin,
        stakers,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_accumulator_never_decreases(
        stored in 0i128..=i128::MAX,
        reward in 1i128..=i128::MAX,
        total in 1i128..=i128::MAX,
    ) {
        let env = Env::default();
        let stored = I256::from_i128(&env, stored);
        let next = accumulate(&env, &stored, reward, total).unwrap();
        prop_assert!(next >= stored);
    }

    #[test]
    fn prop_single_round_split_is_proportional(
        a in 1i128..=1_000_000_000 * TOKEN,
        b in 1i128..=1_000_000_000 * TOKEN,
        reward in 1i128..=1_000_000_000 * TOKEN,
    ) {
        let env = Env::default();
        let zero = I256::from_i128(&env, 0);
        let acc = accumulate(&env, &zero, reward, a + b).unwrap();
        let owed_a = owed(&env, a, &acc, &zero).unwrap();
        let owed_b = owed(&env, b, &acc, &zero).unwrap();

        // Never more than deposited. The accumulator floor loses under
        // (a + b) / SCALE units, and each position floor under one more.
        prop_assert!(owed_a + owed_b <= reward);
        prop_assert!(reward - (owed_a + owed_b) <= round_dust_allowance(a + b) + 2);

        // owed_a / a ≈ owed_b / b, cross-multiplied in 256 bits.
        let wide = |v: i128| I256::from_i128(&env, v);
        let lhs = wide(owed_a).mul(&wide(b));
        let rhs = wide(owed_b).mul(&wide(a));
        let gap = if lhs > rhs { lhs.sub(&rhs) } else { rhs.sub(&lhs) };
        let slack = wide(a.max(b)).mul(&wide(round_dust_allowance(a + b) + 1));
        prop_assert!(gap <= slack);
    }

    #[test]
    fn prop_pool_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..20)) {
        let env = Env::default();
        let h = harness(&env);
        let checks = InvariantSet::pool_defaults();

        let mut rounds: u64 = 0;
        let mut dust_allowance: i128 = 0;
        let mut before = PoolSnapshot::capture(&env, &h.pool, &h.stakers);

        for op in &ops {
            match op {
                Op::Stake(who, amount) => {
                    if h.client.try_stake(&h.stakers[*who], amount).is_ok() {
                        dust_allowance += 1;
                    }
                }
                Op::Deposit(amount) => {
                    match h.client.try_deposit_rewards(&h.admin, amount) {
                        Ok(Ok(receipt)) => {
                            rounds += 1;
                            dust_allowance += round_dust_allowance(receipt.total_staked);
                        }
                        Ok(Err(_)) => prop_assert!(false, "receipt did not decode"),
                        Err(err) => {
                            prop_assert_eq!(before.total_staked, 0);
                            prop_assert_eq!(err, Ok(ContractError::NoStakers));
                        }
                    }
                }
                Op::Withdraw(who) => {
                    let staker = &h.stakers[*who];
                    let principal = h.client.get_staker(staker).principal;
                    match h.client.try_withdraw(staker) {
                        Ok(Ok(payout)) => prop_assert_eq!(payout.principal, principal),
                        Ok(Err(_)) => prop_assert!(false, "payout did not decode"),
                        Err(err) => {
                            prop_assert_eq!(principal, 0);
                            prop_assert_eq!(err, Ok(ContractError::NothingStaked));
                        }
                    }
                }
            }

            let after = PoolSnapshot::capture(&env, &h.pool, &h.stakers);
            checks.assert_all(&after);
            if let Err(msg) = check_transition(&before, &after) {
                prop_assert!(false, "{:?} broke a transition: {}", op, msg);
            }
            before = after;
        }

        let dust = DustBound { max: dust_allowance };
        if let Err(msg) = dust.check(&before) {
            prop_assert!(false, "{}", msg);
        }
        prop_assert_eq!(before.reward_rounds, rounds);
    }
}
