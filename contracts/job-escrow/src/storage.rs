use soroban_sdk::{contracttype, Address, BytesN};

use crate::types::CloseConsent;

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    RoleRegistry,
    Token,
    PlatformFeeBps,
    MaxOpenContracts,
    Contract(BytesN<32>),
    ActiveContracts(Address),
    PreApproved(BytesN<32>, BytesN<32>),
    WithdrawalBalance(Address),
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ContractDetails {
    pub requestor: Address,
    pub contractor: Option<Address>,
    pub payout_per_message: i128,
    pub contracted_messages: u32,
    pub fulfilled_messages: u32,
    pub close_after: Option<u64>,
    pub finalized: CloseConsent,
}

impl ContractDetails {
    pub fn remaining_messages(&self) -> u32 {
        self.contracted_messages - self.fulfilled_messages
    }

    pub fn is_contractor(&self, address: &Address) -> bool {
        match &self.contractor {
            Some(contractor) => contractor == address,
            None => false,
        }
    }
}
