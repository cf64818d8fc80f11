use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, Address, Env, Vec,
};

use crate::storage::DataKey;

#[contract]
pub struct RoleRegistry;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracterror]
#[repr(u32)]
pub enum RoleRegistryError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    VerifierExists = 3,
    VerifierNotFound = 4,
}

#[contractimpl]
impl RoleRegistry {
    pub fn init(e: Env, owner: Address) {
        if e.storage().instance().has(&DataKey::Owner) {
            panic_with_error!(&e, RoleRegistryError::AlreadyInitialized);
        }
        e.storage().instance().set(&DataKey::Owner, &owner);
    }

    pub fn add_verifier(e: Env, verifier: Address) {
        let owner = read_owner_or_panic(&e);
        owner.require_auth();

        let mut verifiers = read_verifiers(&e);
        if contains_address(&verifiers, &verifier) {
            panic_with_error!(&e, RoleRegistryError::VerifierExists);
        }
        verifiers.push_back(verifier);
        write_verifiers(&e, &verifiers);
    }

    pub fn remove_verifier(e: Env, verifier: Address) {
        let owner = read_owner_or_panic(&e);
        owner.require_auth();

        let verifiers = read_verifiers(&e);
        let mut filtered = Vec::new(&e);
        let mut removed = false;
        for existing in verifiers.iter() {
            if existing == verifier {
                removed = true;
                continue;
            }
            filtered.push_back(existing);
        }

        if !removed {
            panic_with_error!(&e, RoleRegistryError::VerifierNotFound);
        }
        write_verifiers(&e, &filtered);
    }

    pub fn owner(e: Env) -> Address {
        read_owner_or_panic(&e)
    }

    pub fn is_owner(e: Env, address: Address) -> bool {
        match e.storage().instance().get::<_, Address>(&DataKey::Owner) {
            Some(owner) => owner == address,
            None => false,
        }
    }

    pub fn is_verifier(e: Env, address: Address) -> bool {
        contains_address(&read_verifiers(&e), &address)
    }
}

fn read_owner_or_panic(e: &Env) -> Address {
    match e.storage().instance().get::<_, Address>(&DataKey::Owner) {
        Some(owner) => owner,
        None => panic_with_error!(e, RoleRegistryError::NotInitialized),
    }
}

fn read_verifiers(e: &Env) -> Vec<Address> {
    e.storage()
        .instance()
        .get::<_, Vec<Address>>(&DataKey::Verifiers)
        .unwrap_or_else(|| Vec::new(e))
}

fn write_verifiers(e: &Env, verifiers: &Vec<Address>) {
    if verifiers.len() == 0 {
        e.storage().instance().remove(&DataKey::Verifiers);
    } else {
        e.storage().instance().set(&DataKey::Verifiers, verifiers);
    }
}

fn contains_address(vec: &Vec<Address>, addr: &Address) -> bool {
    let target = addr.clone();
    for existing in vec.iter() {
        if existing == target {
            return true;
        }
    }
    false
}
