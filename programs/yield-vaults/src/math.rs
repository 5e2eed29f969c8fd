// =============================================================================
// Share Pricing & Fee Math
// =============================================================================
// Pure integer functions with truncating division. Every product is formed in
// u128 and divided afterwards (multiply-then-divide) so no precision is lost
// before the single final truncation.
//
// Truncation always favors the pool: a depositor receives at most one share
// fewer, a redeemer at most one unit less, than the exact proportional value.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::{BLOCKS_PER_YEAR, BPS_DENOMINATOR, SECONDS_PER_BLOCK};
use crate::error::VaultError;

fn to_u64(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(VaultError::MathOverflow))
}

/// `floor(a * b / c)` computed in u128
pub fn mul_div(a: u64, b: u64, c: u64) -> Result<u64> {
    let product = (a as u128)
        .checked_mul(b as u128)
        .ok_or(VaultError::MathOverflow)?;
    let quotient = product
        .checked_div(c as u128)
        .ok_or(VaultError::DivisionByZero)?;
    to_u64(quotient)
}

// =============================================================================
// Share Pricing
// =============================================================================

/// Shares minted for depositing `amount` into a vault holding
/// `(total_deposits, total_shares)` before the deposit.
///
/// - Empty vault: 1:1, the first depositor sets the price
/// - Otherwise: `floor(amount * total_shares / total_deposits)`
pub fn shares_for_deposit(amount: u64, total_deposits: u64, total_shares: u64) -> Result<u64> {
    if total_shares == 0 {
        return Ok(amount);
    }
    mul_div(amount, total_shares, total_deposits)
}

/// Asset value redeemable for `shares` of a vault holding
/// `(total_deposits, total_shares)`.
///
/// Formula: `floor(shares * total_deposits / total_shares)`, 0 for an empty vault
pub fn value_for_shares(shares: u64, total_deposits: u64, total_shares: u64) -> Result<u64> {
    if total_shares == 0 {
        return Ok(0);
    }
    mul_div(shares, total_deposits, total_shares)
}

// =============================================================================
// Fees
// =============================================================================

/// `floor(amount * bps / 10000)`
pub fn bps_of(amount: u64, bps: u16) -> Result<u64> {
    mul_div(amount, bps as u64, BPS_DENOMINATOR)
}

/// Fee taken from harvested yield
pub fn performance_fee(profit: u64, fee_bps: u16) -> Result<u64> {
    bps_of(profit, fee_bps)
}

/// Annualized management fee pro-rated over `blocks`:
/// `floor(amount * bps * blocks / (10000 * BLOCKS_PER_YEAR))`, never more than `amount`
pub fn management_fee(amount: u64, fee_bps: u16, blocks: u64) -> Result<u64> {
    let numerator = (amount as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(VaultError::MathOverflow)?
        .checked_mul(blocks as u128)
        .ok_or(VaultError::MathOverflow)?;
    let denominator = (BPS_DENOMINATOR as u128) * (BLOCKS_PER_YEAR as u128);
    let fee = numerator / denominator;
    Ok(to_u64(fee)?.min(amount))
}

/// Fee taken from every standard withdrawal
pub fn withdrawal_fee(amount: u64, fee_bps: u16) -> Result<u64> {
    bps_of(amount, fee_bps)
}

/// Penalty taken from an emergency withdrawal instead of the withdrawal fee
pub fn emergency_penalty(amount: u64, penalty_bps: u16) -> Result<u64> {
    bps_of(amount, penalty_bps)
}

/// Simulated yield realized by one harvest
pub fn harvest_yield(total_deposits: u64, yield_rate_bps: u16) -> Result<u64> {
    bps_of(total_deposits, yield_rate_bps)
}

/// Splits `amount` into `(fee, net)` where `net = amount - fee`
pub fn split_fee(amount: u64, fee: u64) -> Result<(u64, u64)> {
    let net = amount.checked_sub(fee).ok_or(VaultError::MathUnderflow)?;
    Ok((fee, net))
}

// =============================================================================
// Time
// =============================================================================

/// Logical block height for a unix timestamp. Pre-epoch clocks map to block 0.
pub fn block_at(unix_timestamp: i64) -> u64 {
    (unix_timestamp.max(0) as u64) / SECONDS_PER_BLOCK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use test_case::test_case;

    #[test]
    fn first_deposit_is_one_to_one() {
        assert_eq!(shares_for_deposit(1_000_000, 0, 0).unwrap(), 1_000_000);
        assert_eq!(shares_for_deposit(1, 0, 0).unwrap(), 1);
    }

    #[test]
    fn deposit_after_growth_truncates_toward_pool() {
        // price 1.0294 per share: 1000 / 1.0294 = 971.4...
        assert_eq!(shares_for_deposit(1_000, 1_544_100, 1_500_000).unwrap(), 971);
    }

    #[test]
    fn value_of_shares_in_empty_vault_is_zero() {
        assert_eq!(value_for_shares(500, 0, 0).unwrap(), 0);
    }

    #[test]
    fn value_of_shares_uses_wide_intermediate() {
        // shares * total_deposits overflows u64 but the quotient fits
        let big = u64::MAX / 2;
        assert_eq!(value_for_shares(big, big, big).unwrap(), big);
        assert_eq!(shares_for_deposit(big, big, big).unwrap(), big);
    }

    #[test]
    fn shares_against_zero_deposits_is_reported() {
        let err = shares_for_deposit(10, 0, 5).unwrap_err();
        assert_eq!(err, VaultError::DivisionByZero.into());
    }

    #[test]
    fn quotient_too_large_is_overflow() {
        let err = shares_for_deposit(u64::MAX, 1, 2).unwrap_err();
        assert_eq!(err, VaultError::MathOverflow.into());
    }

    #[test_case(45_000, 900 ; "scenario harvest")]
    #[test_case(49, 0 ; "below one unit truncates to zero")]
    #[test_case(50, 1 ; "exactly one unit")]
    #[test_case(0, 0 ; "no profit")]
    fn performance_fee_at_default_rate(profit: u64, expected: u64) {
        assert_eq!(
            performance_fee(profit, DEFAULT_PERFORMANCE_FEE_BPS).unwrap(),
            expected
        );
    }

    #[test_case(1_029_400, 1_029 ; "scenario withdrawal")]
    #[test_case(999, 0 ; "dust pays nothing")]
    #[test_case(1_000, 1 ; "one unit")]
    fn withdrawal_fee_at_default_rate(amount: u64, expected: u64) {
        assert_eq!(
            withdrawal_fee(amount, DEFAULT_WITHDRAWAL_FEE_BPS).unwrap(),
            expected
        );
    }

    #[test]
    fn emergency_penalty_is_five_percent() {
        assert_eq!(
            emergency_penalty(1_000_000, DEFAULT_EMERGENCY_PENALTY_BPS).unwrap(),
            50_000
        );
        assert_eq!(emergency_penalty(19, DEFAULT_EMERGENCY_PENALTY_BPS).unwrap(), 0);
    }

    #[test]
    fn management_fee_accrues_per_block() {
        // one full year at 0.5%
        assert_eq!(
            management_fee(1_000_000, DEFAULT_MANAGEMENT_FEE_BPS, BLOCKS_PER_YEAR).unwrap(),
            5_000
        );
        // one day: 1_000_000 * 50 * 144 / 525_600_000 = 13.69...
        assert_eq!(
            management_fee(1_000_000, DEFAULT_MANAGEMENT_FEE_BPS, HARVEST_COOLDOWN_BLOCKS)
                .unwrap(),
            13
        );
        assert_eq!(management_fee(1_000_000, DEFAULT_MANAGEMENT_FEE_BPS, 0).unwrap(), 0);
    }

    #[test]
    fn management_fee_never_exceeds_amount() {
        let fee = management_fee(1_000, MAX_MANAGEMENT_FEE_BPS, BLOCKS_PER_YEAR * 1_000).unwrap();
        assert_eq!(fee, 1_000);
    }

    #[test]
    fn fees_stay_within_amount_at_full_rate() {
        for amount in [0u64, 1, 9_999, 10_000, u64::MAX] {
            let fee = bps_of(amount, BPS_DENOMINATOR as u16).unwrap();
            assert_eq!(fee, amount);
        }
    }

    #[test]
    fn harvest_yield_is_three_percent() {
        assert_eq!(harvest_yield(1_500_000, DEFAULT_YIELD_RATE_BPS).unwrap(), 45_000);
        assert_eq!(harvest_yield(0, DEFAULT_YIELD_RATE_BPS).unwrap(), 0);
    }

    #[test]
    fn split_fee_rejects_fee_above_amount() {
        assert_eq!(split_fee(100, 3).unwrap(), (3, 97));
        assert_eq!(split_fee(100, 101).unwrap_err(), VaultError::MathUnderflow.into());
    }

    #[test_case(0, 0 ; "epoch")]
    #[test_case(599, 0 ; "just before first block")]
    #[test_case(600, 1 ; "first block")]
    #[test_case(86_400, 144 ; "one day")]
    #[test_case(-5, 0 ; "pre epoch")]
    fn block_height(timestamp: i64, expected: u64) {
        assert_eq!(block_at(timestamp), expected);
    }
}
