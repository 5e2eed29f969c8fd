// =============================================================================
// Protocol State Account
// =============================================================================
// Process-wide accounting state: admin authority, custody accounts, the fee
// schedule, monotonic id counters and the running accumulators (TVL, yield,
// revenue). Created once by initialize_protocol and passed into every
// instruction that touches aggregate totals.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;

/// Global configuration and accumulators.
///
/// PDA derived from ["protocol"].
#[account]
#[derive(InitSpace, Default)]
pub struct ProtocolState {
    // =========================================================================
    // Authority & Asset Accounts
    // =========================================================================

    /// The admin who creates vaults, manages strategies and withdraws fees
    pub admin: Pubkey,

    /// The SPL token mint every vault accepts
    pub asset_mint: Pubkey,

    /// Token account holding all vault deposits (PDA-owned)
    pub custody: Pubkey,

    /// Token account accumulating protocol fees (PDA-owned)
    pub treasury: Pubkey,

    /// Token account funding harvested yield (PDA-owned)
    pub yield_reserve: Pubkey,

    // =========================================================================
    // Accumulators
    // =========================================================================

    /// Sum of all vault deposits, including harvested net yield
    pub total_value_locked: u64,

    /// Gross yield realized by all harvests (before performance fees)
    pub total_yield_generated: u64,

    /// Fees collected and not yet withdrawn by the admin
    pub protocol_revenue: u64,

    /// Block of the most recent harvest across all vaults
    pub last_harvest_block: u64,

    // =========================================================================
    // Id Counters (monotonic, never reused)
    // =========================================================================

    pub vault_count: u64,
    pub strategy_count: u64,
    pub harvest_count: u64,

    // =========================================================================
    // Fee Schedule & Configuration (basis points)
    // =========================================================================

    pub performance_fee_bps: u16,
    pub management_fee_bps: u16,
    pub withdrawal_fee_bps: u16,
    pub emergency_penalty_bps: u16,

    /// Simulated return per harvest
    pub yield_rate_bps: u16,

    /// Withdrawal timelock applied to a position on every deposit
    pub deposit_lock_blocks: u64,

    /// Protocol-wide halt: no deposits, withdrawals, harvests or rebalances
    pub is_paused: bool,

    // =========================================================================
    // PDA Bumps
    // =========================================================================

    pub bump: u8,
    pub custody_bump: u8,
    pub treasury_bump: u8,
    pub yield_reserve_bump: u8,
}

impl ProtocolState {
    /// Reset the fee schedule and configuration to protocol defaults
    pub fn apply_default_config(&mut self) {
        self.performance_fee_bps = DEFAULT_PERFORMANCE_FEE_BPS;
        self.management_fee_bps = DEFAULT_MANAGEMENT_FEE_BPS;
        self.withdrawal_fee_bps = DEFAULT_WITHDRAWAL_FEE_BPS;
        self.emergency_penalty_bps = DEFAULT_EMERGENCY_PENALTY_BPS;
        self.yield_rate_bps = DEFAULT_YIELD_RATE_BPS;
        self.deposit_lock_blocks = DEFAULT_DEPOSIT_LOCK_BLOCKS;
        self.is_paused = false;
    }

    pub fn require_not_paused(&self) -> Result<()> {
        require!(!self.is_paused, VaultError::Paused);
        Ok(())
    }

    pub fn next_vault_id(&self) -> Result<u64> {
        Ok(self.vault_count.checked_add(1).ok_or(VaultError::MathOverflow)?)
    }

    pub fn next_strategy_id(&self) -> Result<u64> {
        Ok(self.strategy_count.checked_add(1).ok_or(VaultError::MathOverflow)?)
    }

    pub fn next_harvest_id(&self) -> Result<u64> {
        Ok(self.harvest_count.checked_add(1).ok_or(VaultError::MathOverflow)?)
    }

    /// Validate and store a new fee schedule
    pub fn set_fees(
        &mut self,
        performance_fee_bps: u16,
        management_fee_bps: u16,
        withdrawal_fee_bps: u16,
        emergency_penalty_bps: u16,
    ) -> Result<()> {
        require!(
            performance_fee_bps <= MAX_PERFORMANCE_FEE_BPS,
            VaultError::InvalidAmount
        );
        require!(
            management_fee_bps <= MAX_MANAGEMENT_FEE_BPS,
            VaultError::InvalidAmount
        );
        require!(
            withdrawal_fee_bps <= MAX_WITHDRAWAL_FEE_BPS,
            VaultError::InvalidAmount
        );
        require!(
            emergency_penalty_bps <= MAX_EMERGENCY_PENALTY_BPS,
            VaultError::InvalidAmount
        );

        self.performance_fee_bps = performance_fee_bps;
        self.management_fee_bps = management_fee_bps;
        self.withdrawal_fee_bps = withdrawal_fee_bps;
        self.emergency_penalty_bps = emergency_penalty_bps;

        Ok(())
    }

    pub fn set_yield_rate(&mut self, yield_rate_bps: u16) -> Result<()> {
        require!(yield_rate_bps <= MAX_YIELD_RATE_BPS, VaultError::InvalidAmount);
        self.yield_rate_bps = yield_rate_bps;
        Ok(())
    }

    pub fn set_deposit_lock(&mut self, blocks: u64) -> Result<()> {
        require!(blocks <= MAX_DEPOSIT_LOCK_BLOCKS, VaultError::InvalidAmount);
        self.deposit_lock_blocks = blocks;
        Ok(())
    }

    /// Move `amount` of collected revenue out of the treasury
    pub fn withdraw_revenue(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, VaultError::InvalidAmount);
        require!(
            amount <= self.protocol_revenue,
            VaultError::InsufficientBalance
        );
        self.protocol_revenue -= amount;
        Ok(())
    }

    // =========================================================================
    // Accumulator updates used by the ledger
    // =========================================================================

    pub(crate) fn record_inflow(&mut self, amount: u64) -> Result<()> {
        self.total_value_locked = self
            .total_value_locked
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub(crate) fn record_outflow(&mut self, amount: u64, fee: u64) -> Result<()> {
        self.total_value_locked = self
            .total_value_locked
            .checked_sub(amount)
            .ok_or(VaultError::MathUnderflow)?;
        self.protocol_revenue = self
            .protocol_revenue
            .checked_add(fee)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub(crate) fn record_harvest(
        &mut self,
        yield_amount: u64,
        performance_fee: u64,
        net_yield: u64,
        now: u64,
    ) -> Result<()> {
        self.total_yield_generated = self
            .total_yield_generated
            .checked_add(yield_amount)
            .ok_or(VaultError::MathOverflow)?;
        self.protocol_revenue = self
            .protocol_revenue
            .checked_add(performance_fee)
            .ok_or(VaultError::MathOverflow)?;
        self.total_value_locked = self
            .total_value_locked
            .checked_add(net_yield)
            .ok_or(VaultError::MathOverflow)?;
        self.harvest_count = self.next_harvest_id()?;
        self.last_harvest_block = now;
        Ok(())
    }
}
