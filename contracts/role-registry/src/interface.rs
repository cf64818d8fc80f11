use soroban_sdk::{contractclient, Address, Env};

/// Client-only interface for invoking the RoleRegistry contract.
#[allow(dead_code)]
#[contractclient(name = "RoleRegistryClient")]
pub trait RoleRegistryInterface {
    fn init(env: Env, owner: Address);

    fn add_verifier(env: Env, verifier: Address);

    fn remove_verifier(env: Env, verifier: Address);

    fn owner(env: Env) -> Address;

    fn is_owner(env: Env, address: Address) -> bool;

    fn is_verifier(env: Env, address: Address) -> bool;
}
