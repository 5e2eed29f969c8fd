// =============================================================================
// Position State Account
// =============================================================================
// One user's holding in one vault. Created on the first deposit, merged on
// every later deposit, and closed (account deleted) once its shares reach
// zero. A zero-share position is never kept around.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::math;

/// PDA derived from ["position", vault_pubkey, owner_pubkey].
#[account]
#[derive(InitSpace, Default)]
pub struct Position {
    /// The vault this position belongs to
    pub vault: Pubkey,

    /// The wallet that owns the position and must sign for withdrawals
    pub owner: Pubkey,

    /// Vault shares held
    pub shares: u64,

    /// Cost basis: principal deposited, re-based to current value by compounding
    pub deposited: u64,

    /// Earnings realized by compounding (cumulative)
    pub earned: u64,

    /// Block of the last deposit, withdrawal or compound
    pub last_action: u64,

    /// Withdrawals are refused before this block
    pub lock_until: u64,

    pub bump: u8,
}

impl Position {
    /// True until the first deposit initializes the account
    pub fn is_new(&self) -> bool {
        self.owner == Pubkey::default()
    }

    /// Withdrawal timelock check (boundary inclusive: allowed at lock_until)
    pub fn is_unlocked(&self, now: u64) -> bool {
        now >= self.lock_until
    }

    /// Cost basis released when `shares` of this position are redeemed:
    /// the proportional slice `floor(deposited * shares / self.shares)`
    pub fn basis_for_shares(&self, shares: u64) -> Result<u64> {
        if shares >= self.shares {
            return Ok(self.deposited);
        }
        math::mul_div(self.deposited, shares, self.shares)
    }

    pub(crate) fn record_deposit(
        &mut self,
        amount: u64,
        shares: u64,
        now: u64,
        lock_until: u64,
    ) -> Result<()> {
        self.shares = self
            .shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        self.deposited = self
            .deposited
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        self.last_action = now;
        self.lock_until = lock_until;
        Ok(())
    }

    pub(crate) fn record_withdrawal(&mut self, shares: u64, basis: u64, now: u64) -> Result<()> {
        self.shares = self
            .shares
            .checked_sub(shares)
            .ok_or(VaultError::InsufficientBalance)?;
        self.deposited = self
            .deposited
            .checked_sub(basis)
            .ok_or(VaultError::MathUnderflow)?;
        self.last_action = now;
        Ok(())
    }

    /// Re-base the cost basis to `current_value`, booking the gain as earned
    pub(crate) fn record_compound(&mut self, current_value: u64, now: u64) -> Result<u64> {
        let earnings = current_value
            .checked_sub(self.deposited)
            .filter(|earnings| *earnings > 0)
            .ok_or(VaultError::InvalidAmount)?;

        self.deposited = current_value;
        self.earned = self
            .earned
            .checked_add(earnings)
            .ok_or(VaultError::MathOverflow)?;
        self.last_action = now;

        Ok(earnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(shares: u64, deposited: u64) -> Position {
        Position {
            owner: Pubkey::new_unique(),
            shares,
            deposited,
            ..Default::default()
        }
    }

    #[test]
    fn fresh_account_is_new() {
        assert!(Position::default().is_new());
        assert!(!position(1, 1).is_new());
    }

    #[test]
    fn timelock_boundary_is_inclusive() {
        let mut p = position(10, 10);
        p.lock_until = 50;
        assert!(!p.is_unlocked(49));
        assert!(p.is_unlocked(50));
        assert!(p.is_unlocked(51));
    }

    #[test]
    fn partial_redemption_releases_proportional_basis() {
        let p = position(1_000, 999);
        // 999 * 300 / 1000 = 299.7
        assert_eq!(p.basis_for_shares(300).unwrap(), 299);
        assert_eq!(p.basis_for_shares(1_000).unwrap(), 999);
    }

    #[test]
    fn compound_requires_growth() {
        let mut p = position(1_000, 1_000);
        assert_eq!(
            p.record_compound(1_000, 1).unwrap_err(),
            VaultError::InvalidAmount.into()
        );
        assert_eq!(
            p.record_compound(900, 1).unwrap_err(),
            VaultError::InvalidAmount.into()
        );

        assert_eq!(p.record_compound(1_029, 2).unwrap(), 29);
        assert_eq!(p.deposited, 1_029);
        assert_eq!(p.earned, 29);
        assert_eq!(p.shares, 1_000);
        assert_eq!(p.last_action, 2);
    }

    #[test]
    fn withdrawing_more_than_held_fails() {
        let mut p = position(10, 10);
        assert_eq!(
            p.record_withdrawal(11, 0, 1).unwrap_err(),
            VaultError::InsufficientBalance.into()
        );
    }
}
