use role_registry::RoleRegistryClient;
use soroban_sdk::{
    contract, contractimpl, panic_with_error, symbol_short, token, Address, BytesN, Env, Vec,
};

use crate::{
    storage::{ContractDetails, DataKey},
    types::{
        CloseConsent, CloseDeferredLog, ContractClosedLog, ContractCreatedLog,
        ContractorAssignedLog, EscrowError, MessagesVerifiedLog, WithdrawalLog,
    },
    utils::{creditable_units, required_payment},
};

/// Grace window recorded when a close is deferred for lack of consent.
pub const CLOSE_GRACE_PERIOD: u64 = 7 * 24 * 60 * 60;

const MAX_FEE_BPS: u32 = 10_000;

#[contract]
pub struct JobEscrow;

#[contractimpl]
impl JobEscrow {
    pub fn init(
        e: Env,
        registry: Address,
        token: Address,
        platform_fee_bps: u32,
        max_open_contracts: u32,
    ) {
        if e.storage().instance().has(&DataKey::RoleRegistry) {
            panic_with_error!(&e, EscrowError::AlreadyInitialized);
        }
        if platform_fee_bps > MAX_FEE_BPS {
            panic_with_error!(&e, EscrowError::InvalidAmount);
        }
        e.storage().instance().set(&DataKey::RoleRegistry, &registry);
        e.storage().instance().set(&DataKey::Token, &token);
        e.storage()
            .instance()
            .set(&DataKey::PlatformFeeBps, &platform_fee_bps);
        e.storage()
            .instance()
            .set(&DataKey::MaxOpenContracts, &max_open_contracts);
    }

    pub fn set_platform_fee(e: Env, caller: Address, fee_bps: u32) {
        caller.require_auth();
        if fee_bps > MAX_FEE_BPS {
            panic_with_error!(&e, EscrowError::InvalidAmount);
        }

        let registry_addr = require_registry(&e);
        let registry = RoleRegistryClient::new(&e, &registry_addr);
        if !registry.is_owner(&caller) {
            panic_with_error!(&e, EscrowError::Unauthorized);
        }

        e.storage().instance().set(&DataKey::PlatformFeeBps, &fee_bps);
    }

    pub fn create_contract(
        e: Env,
        requestor: Address,
        job_id: BytesN<32>,
        payout_per_message: i128,
        message_count: u32,
        payment: i128,
    ) {
        requestor.require_auth();
        if payout_per_message < 0 || message_count == 0 {
            panic_with_error!(&e, EscrowError::InvalidAmount);
        }
        if e.storage()
            .instance()
            .has(&DataKey::Contract(job_id.clone()))
        {
            panic_with_error!(&e, EscrowError::DuplicateJob);
        }

        let mut open = read_active_contracts(&e, &requestor);
        if open.len() >= read_max_open_contracts(&e) {
            panic_with_error!(&e, EscrowError::TooManyOpenContracts);
        }

        let required = required_payment(payout_per_message, message_count, read_platform_fee(&e))
            .unwrap_or_else(|| panic_with_error!(&e, EscrowError::InvalidAmount));
        if payment < required {
            panic_with_error!(&e, EscrowError::InsufficientPayment);
        }

        // The full offered payment is escrowed; overpayment is not refunded.
        let token = token::Client::new(&e, &require_token(&e));
        token.transfer(&requestor, &e.current_contract_address(), &payment);

        let record = ContractDetails {
            requestor: requestor.clone(),
            contractor: None,
            payout_per_message,
            contracted_messages: message_count,
            fulfilled_messages: 0,
            close_after: None,
            finalized: CloseConsent::Neither,
        };
        write_contract(&e, &job_id, &record);

        open.push_back(job_id.clone());
        write_active_contracts(&e, &requestor, &open);

        e.events().publish(
            (symbol_short!("contract"), symbol_short!("created")),
            ContractCreatedLog {
                job_id,
                requestor,
                payout_per_message,
                contracted_messages: message_count,
                payment,
                created_at: e.ledger().timestamp(),
            },
        );
    }

    pub fn set_contractor(e: Env, caller: Address, job_id: BytesN<32>, contractor: Address) {
        caller.require_auth();
        let mut record = read_contract_or_panic(&e, &job_id);
        if record.requestor != caller {
            panic_with_error!(&e, EscrowError::Unauthorized);
        }
        if contractor == record.requestor {
            panic_with_error!(&e, EscrowError::InvalidContractor);
        }
        if record.contractor.is_some() {
            panic_with_error!(&e, EscrowError::AlreadyAssigned);
        }

        record.contractor = Some(contractor.clone());
        write_contract(&e, &job_id, &record);

        let mut open = read_active_contracts(&e, &contractor);
        open.push_back(job_id.clone());
        write_active_contracts(&e, &contractor, &open);

        e.events().publish(
            (symbol_short!("contract"), symbol_short!("assigned")),
            ContractorAssignedLog {
                job_id,
                requestor: record.requestor,
                contractor,
            },
        );
    }

    pub fn add_pre_approved_messages(
        e: Env,
        caller: Address,
        job_id: BytesN<32>,
        message_ids: Vec<BytesN<32>>,
        counts: Vec<u32>,
    ) {
        caller.require_auth();
        let record = read_contract_or_panic(&e, &job_id);
        if record.requestor != caller {
            panic_with_error!(&e, EscrowError::Unauthorized);
        }
        if message_ids.len() != counts.len() {
            panic_with_error!(&e, EscrowError::LengthMismatch);
        }

        for (message_id, count) in message_ids.iter().zip(counts.iter()) {
            let outstanding = read_pre_approved(&e, &job_id, &message_id);
            let new_outstanding = outstanding
                .checked_add(count)
                .unwrap_or_else(|| panic_with_error!(&e, EscrowError::InvalidAmount));
            write_pre_approved(&e, &job_id, &message_id, new_outstanding);
        }
    }

    pub fn verify_messages(
        e: Env,
        caller: Address,
        job_id: BytesN<32>,
        message_ids: Vec<BytesN<32>>,
        counts: Vec<u32>,
    ) {
        caller.require_auth();
        let registry_addr = require_registry(&e);
        let registry = RoleRegistryClient::new(&e, &registry_addr);
        if !registry.is_verifier(&caller) {
            panic_with_error!(&e, EscrowError::Unauthorized);
        }

        let mut record = read_contract_or_panic(&e, &job_id);
        if message_ids.len() != counts.len() {
            panic_with_error!(&e, EscrowError::LengthMismatch);
        }

        let mut credited_total: u32 = 0;
        for (message_id, requested) in message_ids.iter().zip(counts.iter()) {
            let outstanding = read_pre_approved(&e, &job_id, &message_id);
            let credit = creditable_units(outstanding, record.remaining_messages(), requested);
            record.fulfilled_messages += credit;
            credited_total += credit;

            if record.fulfilled_messages == record.contracted_messages {
                // Fully satisfied: drain whatever pre-approval surplus is
                // left on this message so it cannot be replayed.
                write_pre_approved(&e, &job_id, &message_id, 0);
            } else {
                write_pre_approved(&e, &job_id, &message_id, outstanding - credit);
            }
        }
        write_contract(&e, &job_id, &record);

        e.events().publish(
            (symbol_short!("messages"), symbol_short!("verified")),
            MessagesVerifiedLog {
                job_id,
                verifier: caller,
                credited: credited_total,
                fulfilled_messages: record.fulfilled_messages,
            },
        );
    }

    pub fn finalize_contract(e: Env, caller: Address, job_id: BytesN<32>) {
        caller.require_auth();
        let mut record = read_contract_or_panic(&e, &job_id);

        if record.requestor == caller {
            record.finalized = record.finalized.clone().with_requestor();
        } else if record.is_contractor(&caller) {
            record.finalized = record.finalized.clone().with_contractor();
        } else {
            panic_with_error!(&e, EscrowError::NotInvolved);
        }
        write_contract(&e, &job_id, &record);
    }

    /// Returns true when the contract settled and was removed. A false
    /// return means the close was deferred behind the grace window.
    pub fn close_contract(e: Env, caller: Address, job_id: BytesN<32>) -> bool {
        caller.require_auth();
        let mut record = read_contract_or_panic(&e, &job_id);

        let is_requestor = record.requestor == caller;
        if !is_requestor && !record.is_contractor(&caller) {
            panic_with_error!(&e, EscrowError::NotInvolved);
        }

        let now = e.ledger().timestamp();
        let timeout_elapsed = match record.close_after {
            Some(after) => now >= after,
            None => false,
        };
        let counterparty_agreed = if is_requestor {
            record.finalized.contractor_agreed()
        } else {
            record.finalized.requestor_agreed()
        };

        if record.contractor.is_none() || counterparty_agreed || timeout_elapsed {
            settle_and_remove(&e, &job_id, &record, now);
            return true;
        }

        // No consent and no elapsed timeout: arm the escape hatch. An
        // already-pending deadline is left untouched so repeated calls
        // cannot push it out.
        if record.close_after.is_none() {
            let after = now + CLOSE_GRACE_PERIOD;
            record.close_after = Some(after);
            write_contract(&e, &job_id, &record);

            e.events().publish(
                (symbol_short!("contract"), symbol_short!("deferred")),
                CloseDeferredLog {
                    job_id,
                    close_after: after,
                },
            );
        }
        false
    }

    pub fn withdraw(e: Env, caller: Address, amount: i128) {
        caller.require_auth();
        if amount <= 0 {
            panic_with_error!(&e, EscrowError::InvalidAmount);
        }
        let balance = read_withdrawal_balance(&e, &caller);
        if balance < amount {
            panic_with_error!(&e, EscrowError::InsufficientBalance);
        }

        // Debit before the outbound transfer.
        write_withdrawal_balance(&e, &caller, balance - amount);

        let token = token::Client::new(&e, &require_token(&e));
        token.transfer(&e.current_contract_address(), &caller, &amount);

        e.events().publish(
            (symbol_short!("funds"), symbol_short!("withdrawn")),
            WithdrawalLog {
                party: caller,
                amount,
            },
        );
    }

    pub fn get_contract(e: Env, job_id: BytesN<32>) -> Option<ContractDetails> {
        e.storage().instance().get(&DataKey::Contract(job_id))
    }

    pub fn active_contracts(e: Env, party: Address) -> Vec<BytesN<32>> {
        read_active_contracts(&e, &party)
    }

    pub fn pre_approved_count(e: Env, job_id: BytesN<32>, message_id: BytesN<32>) -> u32 {
        read_pre_approved(&e, &job_id, &message_id)
    }

    pub fn withdrawal_balance(e: Env, party: Address) -> i128 {
        read_withdrawal_balance(&e, &party)
    }

    pub fn platform_fee(e: Env) -> u32 {
        read_platform_fee(&e)
    }

    pub fn calculate_required_payment(
        e: Env,
        payout_per_message: i128,
        message_count: u32,
    ) -> i128 {
        if payout_per_message < 0 {
            panic_with_error!(&e, EscrowError::InvalidAmount);
        }
        required_payment(payout_per_message, message_count, read_platform_fee(&e))
            .unwrap_or_else(|| panic_with_error!(&e, EscrowError::InvalidAmount))
    }
}

fn settle_and_remove(e: &Env, job_id: &BytesN<32>, record: &ContractDetails, closed_at: u64) {
    let requestor_credit = record
        .payout_per_message
        .checked_mul(i128::from(record.remaining_messages()))
        .unwrap_or_else(|| panic_with_error!(e, EscrowError::InvalidAmount));
    credit_withdrawal(e, &record.requestor, requestor_credit);
    remove_from_active_contracts(e, &record.requestor, job_id);

    let contractor_credit = match &record.contractor {
        Some(contractor) => {
            let credit = record
                .payout_per_message
                .checked_mul(i128::from(record.fulfilled_messages))
                .unwrap_or_else(|| panic_with_error!(e, EscrowError::InvalidAmount));
            credit_withdrawal(e, contractor, credit);
            remove_from_active_contracts(e, contractor, job_id);
            credit
        }
        None => 0,
    };

    e.storage()
        .instance()
        .remove(&DataKey::Contract(job_id.clone()));

    e.events().publish(
        (symbol_short!("contract"), symbol_short!("closed")),
        ContractClosedLog {
            job_id: job_id.clone(),
            requestor_credit,
            contractor_credit,
            closed_at,
        },
    );
}

fn require_registry(e: &Env) -> Address {
    match e
        .storage()
        .instance()
        .get::<_, Address>(&DataKey::RoleRegistry)
    {
        Some(addr) => addr,
        None => panic_with_error!(e, EscrowError::NotInitialized),
    }
}

fn require_token(e: &Env) -> Address {
    match e.storage().instance().get::<_, Address>(&DataKey::Token) {
        Some(addr) => addr,
        None => panic_with_error!(e, EscrowError::NotInitialized),
    }
}

fn read_platform_fee(e: &Env) -> u32 {
    e.storage()
        .instance()
        .get::<_, u32>(&DataKey::PlatformFeeBps)
        .unwrap_or(0)
}

fn read_max_open_contracts(e: &Env) -> u32 {
    match e
        .storage()
        .instance()
        .get::<_, u32>(&DataKey::MaxOpenContracts)
    {
        Some(max) => max,
        None => panic_with_error!(e, EscrowError::NotInitialized),
    }
}

fn read_contract_or_panic(e: &Env, job_id: &BytesN<32>) -> ContractDetails {
    match e
        .storage()
        .instance()
        .get::<_, ContractDetails>(&DataKey::Contract(job_id.clone()))
    {
        Some(record) => record,
        None => panic_with_error!(e, EscrowError::JobNotFound),
    }
}

fn write_contract(e: &Env, job_id: &BytesN<32>, record: &ContractDetails) {
    e.storage()
        .instance()
        .set(&DataKey::Contract(job_id.clone()), record);
}

fn read_active_contracts(e: &Env, party: &Address) -> Vec<BytesN<32>> {
    e.storage()
        .instance()
        .get::<_, Vec<BytesN<32>>>(&DataKey::ActiveContracts(party.clone()))
        .unwrap_or_else(|| Vec::new(e))
}

fn write_active_contracts(e: &Env, party: &Address, jobs: &Vec<BytesN<32>>) {
    if jobs.len() == 0 {
        e.storage()
            .instance()
            .remove(&DataKey::ActiveContracts(party.clone()));
    } else {
        e.storage()
            .instance()
            .set(&DataKey::ActiveContracts(party.clone()), jobs);
    }
}

fn remove_from_active_contracts(e: &Env, party: &Address, job_id: &BytesN<32>) {
    let mut jobs = read_active_contracts(e, party);
    if let Some(index) = jobs.first_index_of(job_id) {
        // Lookups never depend on order: swap the tail entry in, then shrink.
        let last = jobs.len() - 1;
        if index != last {
            let tail = jobs.get_unchecked(last);
            jobs.set(index, tail);
        }
        jobs.pop_back();
    }
    write_active_contracts(e, party, &jobs);
}

fn read_pre_approved(e: &Env, job_id: &BytesN<32>, message_id: &BytesN<32>) -> u32 {
    e.storage()
        .instance()
        .get::<_, u32>(&DataKey::PreApproved(job_id.clone(), message_id.clone()))
        .unwrap_or(0)
}

fn write_pre_approved(e: &Env, job_id: &BytesN<32>, message_id: &BytesN<32>, outstanding: u32) {
    let key = DataKey::PreApproved(job_id.clone(), message_id.clone());
    if outstanding == 0 {
        e.storage().instance().remove(&key);
    } else {
        e.storage().instance().set(&key, &outstanding);
    }
}

fn read_withdrawal_balance(e: &Env, party: &Address) -> i128 {
    e.storage()
        .instance()
        .get::<_, i128>(&DataKey::WithdrawalBalance(party.clone()))
        .unwrap_or(0)
}

fn write_withdrawal_balance(e: &Env, party: &Address, amount: i128) {
    e.storage()
        .instance()
        .set(&DataKey::WithdrawalBalance(party.clone()), &amount);
}

fn credit_withdrawal(e: &Env, party: &Address, amount: i128) {
    let balance = read_withdrawal_balance(e, party);
    let new_balance = balance
        .checked_add(amount)
        .unwrap_or_else(|| panic_with_error!(e, EscrowError::InvalidAmount));
    write_withdrawal_balance(e, party, new_balance);
}
