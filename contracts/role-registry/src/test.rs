extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Env};

use crate::{RoleRegistry, RoleRegistryClient};

fn register_contract(e: &Env) -> RoleRegistryClient<'_> {
    let contract_id = e.register(RoleRegistry, ());
    RoleRegistryClient::new(e, &contract_id)
}

#[test]
fn init_records_owner() {
    let e = Env::default();
    let owner = Address::generate(&e);
    let other = Address::generate(&e);
    let client = register_contract(&e);

    client.init(&owner);

    assert_eq!(client.owner(), owner);
    assert!(client.is_owner(&owner));
    assert!(!client.is_owner(&other));
    assert!(!client.is_verifier(&other));
}

#[test]
#[should_panic(expected = "Error(Contract, #1)")]
fn reinit_rejected() {
    let e = Env::default();
    let owner = Address::generate(&e);
    let client = register_contract(&e);

    client.init(&owner);
    client.init(&owner);
}

#[test]
fn verifier_grant_and_revoke() {
    let e = Env::default();
    let owner = Address::generate(&e);
    let verifier = Address::generate(&e);
    let client = register_contract(&e);
    e.mock_all_auths();

    client.init(&owner);
    client.add_verifier(&verifier);
    assert!(client.is_verifier(&verifier));

    client.remove_verifier(&verifier);
    assert!(!client.is_verifier(&verifier));
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn duplicate_verifier_rejected() {
    let e = Env::default();
    let owner = Address::generate(&e);
    let verifier = Address::generate(&e);
    let client = register_contract(&e);
    e.mock_all_auths();

    client.init(&owner);
    client.add_verifier(&verifier);
    client.add_verifier(&verifier);
}

#[test]
#[should_panic(expected = "Error(Contract, #4)")]
fn revoke_unknown_verifier_rejected() {
    let e = Env::default();
    let owner = Address::generate(&e);
    let verifier = Address::generate(&e);
    let client = register_contract(&e);
    e.mock_all_auths();

    client.init(&owner);
    client.remove_verifier(&verifier);
}
