// =============================================================================
// User Statistics Account
// =============================================================================
// Lifetime totals for one wallet across every vault. Created lazily on the
// first deposit and never closed; all counters only grow.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::VaultError;

/// PDA derived from ["user_stats", owner_pubkey].
#[account]
#[derive(InitSpace, Default)]
pub struct UserStats {
    pub owner: Pubkey,

    /// Principal deposited into all vaults
    pub total_deposited: u64,

    /// Net amount received from withdrawals (after fees and penalties)
    pub total_withdrawn: u64,

    /// Earnings realized by compounding
    pub total_earned: u64,

    /// Number of times the user opened a position in a vault
    pub vaults_entered: u32,

    /// Block of the user's first deposit, 0 before it
    pub first_deposit: u64,

    pub bump: u8,
}

impl UserStats {
    pub(crate) fn record_deposit(&mut self, amount: u64, opened_position: bool, now: u64) -> Result<()> {
        self.total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        if opened_position {
            self.vaults_entered = self
                .vaults_entered
                .checked_add(1)
                .ok_or(VaultError::MathOverflow)?;
        }

        if self.first_deposit == 0 {
            self.first_deposit = now;
        }

        Ok(())
    }

    pub(crate) fn record_withdrawal(&mut self, net_amount: u64) -> Result<()> {
        self.total_withdrawn = self
            .total_withdrawn
            .checked_add(net_amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub(crate) fn record_earnings(&mut self, earnings: u64) -> Result<()> {
        self.total_earned = self
            .total_earned
            .checked_add(earnings)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    /// Realized profit/loss: withdrawn minus deposited
    pub fn realized_pnl(&self) -> i128 {
        self.total_withdrawn as i128 - self.total_deposited as i128
    }
}
