#![no_std]
#![allow(clippy::too_many_arguments)]

mod contract;
mod storage;
mod types;
mod utils;

pub use contract::{JobEscrow, CLOSE_GRACE_PERIOD};
pub use storage::ContractDetails;
pub use types::{
    CloseConsent, CloseDeferredLog, ContractClosedLog, ContractCreatedLog, ContractorAssignedLog,
    EscrowError, MessagesVerifiedLog, WithdrawalLog,
};
