// =============================================================================
// Strategy State Account
// =============================================================================
// Metadata for a yield strategy attached to a vault: target allocation, risk
// tier and running balance. Strategies never affect share pricing; the vault
// only consults them for capacity checks. They are never deleted, only
// deactivated.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::BPS_DENOMINATOR;
use crate::error::VaultError;
use crate::state::RiskLevel;

/// PDA derived from ["strategy", id.to_le_bytes()].
#[account]
#[derive(InitSpace, Default)]
pub struct Strategy {
    /// Monotonic id assigned from ProtocolState::strategy_count
    pub id: u64,

    /// The vault this strategy is attached to
    pub vault: Pubkey,

    #[max_len(32)]
    pub name: String,

    /// Target share of the vault's assets, 0..=10000 basis points.
    /// The sum across a vault's strategies is the admin's responsibility.
    pub allocation_bps: u16,

    /// Assets currently deployed (maintained by an external strategy adapter)
    pub current_balance: u64,

    /// Returns reported by the strategy (cumulative)
    pub total_returns: u64,

    pub risk_level: RiskLevel,

    pub is_active: bool,

    /// Block of the last allocation or status change
    pub last_update: u64,

    pub bump: u8,
}

/// Allocations are basis points of the vault and may not exceed 100%
pub fn validate_allocation(allocation_bps: u16) -> Result<()> {
    require!(
        (allocation_bps as u64) <= BPS_DENOMINATOR,
        VaultError::InvalidAmount
    );
    Ok(())
}

impl Strategy {
    pub fn require_active(&self) -> Result<()> {
        require!(self.is_active, VaultError::StrategyInactive);
        Ok(())
    }

    pub fn set_allocation(&mut self, allocation_bps: u16, now: u64) -> Result<()> {
        self.require_active()?;
        validate_allocation(allocation_bps)?;

        self.allocation_bps = allocation_bps;
        self.last_update = now;
        Ok(())
    }
}
