use soroban_sdk::testutils::{Address as _, Events};
use soroban_sdk::{symbol_short, Address, Env, IntoVal, String, TryIntoVal};

use crate::{events, ShareTokenContract, ShareTokenContractClient, TokenError};

fn setup(env: &Env) -> (ShareTokenContractClient<'_>, Address) {
    let contract_id = env.register(ShareTokenContract, ());
    let client = ShareTokenContractClient::new(env, &contract_id);

    let admin = Address::generate(env);
    client.initialize(
        &admin,
        &7,
        &String::from_str(env, "Pool Share"),
        &String::from_str(env, "PSHR"),
    );
    (client, admin)
}

#[test]
fn test_initialize() {
    let env = Env::default();
    let (client, admin) = setup(&env);

    assert_eq!(client.admin(), admin);
    assert_eq!(client.decimals(), 7);
    assert_eq!(client.name(), String::from_str(&env, "Pool Share"));
    assert_eq!(client.symbol(), String::from_str(&env, "PSHR"));
    assert_eq!(client.total_supply(), 0);
}

#[test]
fn test_initialize_twice_fails() {
    let env = Env::default();
    let (client, admin) = setup(&env);

    let result = client.try_initialize(
        &admin,
        &7,
        &String::from_str(&env, "Other"),
        &String::from_str(&env, "OTH"),
    );
    assert_eq!(result, Err(Ok(TokenError::AlreadyInitialized)));
}

#[test]
fn test_mint_and_burn() {
    let env = Env::default();
    env.mock_all_auths();
    let (client, _admin) = setup(&env);

    let alice = Address::generate(&env);
    client.mint(&alice, &30_000_000);
    assert_eq!(client.balance(&alice), 30_000_000);
    assert_eq!(client.total_supply(), 30_000_000);

    let events = env.events().all();
    let event = events.get(events.len() - 1).unwrap();
    assert_eq!(
        event.1,
        (symbol_short!("MINT"), alice.clone()).into_val(&env)
    );
    let payload: events::MintedEvent = event.2.try_into_val(&env).unwrap();
    assert_eq!(payload.amount, 30_000_000);
    assert_eq!(payload.balance, 30_000_000);

    client.burn(&alice, &30_000_000);
    assert_eq!(client.balance(&alice), 0);
    assert_eq!(client.total_supply(), 0);
}

#[test]
fn test_burn_more_than_balance_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let (client, _admin) = setup(&env);

    let alice = Address::generate(&env);
    client.mint(&alice, &10);

    assert_eq!(
        client.try_burn(&alice, &11),
        Err(Ok(TokenError::InsufficientBalance))
    );
    assert_eq!(client.balance(&alice), 10);
}

#[test]
fn test_zero_amount_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let (client, _admin) = setup(&env);

    let alice = Address::generate(&env);
    assert_eq!(client.try_mint(&alice, &0), Err(Ok(TokenError::InvalidAmount)));
    assert_eq!(client.try_burn(&alice, &-1), Err(Ok(TokenError::InvalidAmount)));
}

#[test]
fn test_mint_requires_admin_auth() {
    let env = Env::default();
    let (client, _admin) = setup(&env);

    // No authorization mocked: the admin has not signed.
    let alice = Address::generate(&env);
    assert!(client.try_mint(&alice, &10).is_err());
    assert_eq!(client.balance(&alice), 0);
}
