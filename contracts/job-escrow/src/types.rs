use soroban_sdk::{contracterror, contracttype, Address, BytesN};

/// Bilateral consent to close a contract. Transitions are idempotent:
/// a party re-recording its own consent leaves the state unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub enum CloseConsent {
    Neither,
    RequestorOnly,
    ContractorOnly,
    Both,
}

impl CloseConsent {
    pub fn with_requestor(self) -> Self {
        match self {
            CloseConsent::Neither | CloseConsent::RequestorOnly => CloseConsent::RequestorOnly,
            CloseConsent::ContractorOnly | CloseConsent::Both => CloseConsent::Both,
        }
    }

    pub fn with_contractor(self) -> Self {
        match self {
            CloseConsent::Neither | CloseConsent::ContractorOnly => CloseConsent::ContractorOnly,
            CloseConsent::RequestorOnly | CloseConsent::Both => CloseConsent::Both,
        }
    }

    pub fn requestor_agreed(&self) -> bool {
        matches!(self, CloseConsent::RequestorOnly | CloseConsent::Both)
    }

    pub fn contractor_agreed(&self) -> bool {
        matches!(self, CloseConsent::ContractorOnly | CloseConsent::Both)
    }
}

#[derive(Clone)]
#[contracttype]
pub struct ContractCreatedLog {
    pub job_id: BytesN<32>,
    pub requestor: Address,
    pub payout_per_message: i128,
    pub contracted_messages: u32,
    pub payment: i128,
    pub created_at: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct ContractorAssignedLog {
    pub job_id: BytesN<32>,
    pub requestor: Address,
    pub contractor: Address,
}

#[derive(Clone)]
#[contracttype]
pub struct MessagesVerifiedLog {
    pub job_id: BytesN<32>,
    pub verifier: Address,
    pub credited: u32,
    pub fulfilled_messages: u32,
}

#[derive(Clone)]
#[contracttype]
pub struct ContractClosedLog {
    pub job_id: BytesN<32>,
    pub requestor_credit: i128,
    pub contractor_credit: i128,
    pub closed_at: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct CloseDeferredLog {
    pub job_id: BytesN<32>,
    pub close_after: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct WithdrawalLog {
    pub party: Address,
    pub amount: i128,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracterror]
#[repr(u32)]
pub enum EscrowError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    DuplicateJob = 5,
    TooManyOpenContracts = 6,
    InsufficientPayment = 7,
    InvalidContractor = 8,
    AlreadyAssigned = 9,
    NotInvolved = 10,
    JobNotFound = 11,
    LengthMismatch = 12,
    InsufficientBalance = 13,
}
