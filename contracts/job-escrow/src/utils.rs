pub const FEE_DENOMINATOR_BPS: u32 = 10_000;

/// Escrow required up front: gross payout plus the platform fee, with the
/// fee rounded down to the nearest whole token unit.
pub fn required_payment(payout_per_message: i128, message_count: u32, fee_bps: u32) -> Option<i128> {
    let gross = payout_per_message.checked_mul(i128::from(message_count))?;
    let fee = gross
        .checked_mul(i128::from(fee_bps))?
        .checked_div(i128::from(FEE_DENOMINATOR_BPS))?;
    gross.checked_add(fee)
}

/// Units creditable for one message: never more than was pre-approved,
/// never more than the contract can still absorb, never more than asked.
pub fn creditable_units(pre_approved: u32, remaining: u32, requested: u32) -> u32 {
    pre_approved.min(remaining).min(requested)
}
