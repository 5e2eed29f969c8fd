// =============================================================================
// Yield Vaults - Pooled Yield Accounting on Solana
// =============================================================================
//
// Users deposit a single SPL asset into named vaults and receive shares:
// - Share price = vault total_deposits / total_shares
// - Harvests realize simulated yield from a reserve into the vaults
// - Performance, withdrawal and emergency fees accrue to a treasury
// - Strategies record allocation targets per vault
//
// This is the main entry point for the Yield Vaults Anchor program.
// =============================================================================

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use events::*;
pub use instructions::*;
pub use ledger::{CompoundQuote, HarvestQuote, WithdrawalQuote};
pub use state::*;

declare_id!("5Yv1tFqXo8LdKbR7wPZ3mJ2sHcN9uA4eG6iTgBxKp1Qz");

/// The Yield Vaults program module
#[program]
pub mod yield_vaults {
    use super::*;

    // =========================================================================
    // Protocol & Vault Setup
    // =========================================================================

    /// Initialize the protocol for one asset mint
    ///
    /// Creates:
    /// - ProtocolState (admin, fee schedule, accumulators)
    /// - Custody token account (holds all deposits)
    /// - Treasury token account (collects fees)
    /// - Yield reserve token account (funds harvests)
    ///
    /// Can only be called once
    pub fn initialize_protocol(ctx: Context<InitializeProtocol>) -> Result<()> {
        instructions::initialize_protocol::handler_initialize_protocol(ctx)
    }

    /// Create a vault (admin only). Returns the vault id.
    ///
    /// # Arguments
    /// * `name` - 1..=32 bytes
    /// * `risk_level` - 1 conservative, 2 moderate, 3 aggressive
    pub fn create_vault(ctx: Context<CreateVault>, name: String, risk_level: u8) -> Result<u64> {
        instructions::create_vault::handler_create_vault(ctx, name, risk_level)
    }

    /// Lock or unlock a vault for new deposits (admin only)
    pub fn set_vault_lock(ctx: Context<SetVaultLock>, locked: bool) -> Result<()> {
        instructions::admin::handler_set_vault_lock(ctx, locked)
    }

    /// Change a vault's deposit capacity (admin only)
    pub fn update_vault_cap(ctx: Context<UpdateVaultCap>, new_cap: u64) -> Result<()> {
        instructions::update_vault_cap::handler_update_vault_cap(ctx, new_cap)
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Deposit asset tokens into a vault
    ///
    /// # Arguments
    /// * `amount` - Base units, at least MIN_DEPOSIT_AMOUNT
    ///
    /// # Returns
    /// * Shares minted at the pre-deposit share price
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<u64> {
        instructions::deposit::handler_deposit(ctx, amount)
    }

    /// Redeem shares, less the withdrawal fee
    ///
    /// # Arguments
    /// * `shares` - Shares to burn from the caller's position
    ///
    /// # Returns
    /// * Net amount paid out
    pub fn withdraw(ctx: Context<Withdraw>, shares: u64) -> Result<u64> {
        instructions::withdraw::handler_withdraw(ctx, shares)
    }

    /// Exit the whole position at the emergency penalty, bypassing pause,
    /// vault lock and the withdrawal timelock
    pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>) -> Result<u64> {
        instructions::emergency_withdraw::handler_emergency_withdraw(ctx)
    }

    /// Fold the position's unrealized gain into its cost basis
    pub fn compound(ctx: Context<Compound>) -> Result<u64> {
        instructions::compound::handler_compound(ctx)
    }

    // =========================================================================
    // Yield & Strategies
    // =========================================================================

    /// Realize simulated yield for a vault (anyone may call)
    ///
    /// Subject to a per-vault cooldown of HARVEST_COOLDOWN_BLOCKS; an empty
    /// vault cannot be harvested
    pub fn harvest(ctx: Context<Harvest>) -> Result<HarvestQuote> {
        instructions::harvest::handler_harvest(ctx)
    }

    /// Attach a strategy to a vault (admin only). Returns the strategy id.
    pub fn add_strategy(
        ctx: Context<AddStrategy>,
        name: String,
        allocation_bps: u16,
        risk_level: u8,
    ) -> Result<u64> {
        instructions::manage_strategy::handler_add_strategy(ctx, name, allocation_bps, risk_level)
    }

    pub fn update_strategy_allocation(
        ctx: Context<UpdateStrategy>,
        allocation_bps: u16,
    ) -> Result<()> {
        instructions::manage_strategy::handler_update_strategy_allocation(ctx, allocation_bps)
    }

    pub fn set_strategy_active(ctx: Context<UpdateStrategy>, active: bool) -> Result<()> {
        instructions::manage_strategy::handler_set_strategy_active(ctx, active)
    }

    pub fn rebalance(ctx: Context<Rebalance>) -> Result<()> {
        instructions::rebalance::handler_rebalance(ctx)
    }

    // =========================================================================
    // Admin Operations
    // =========================================================================

    pub fn set_paused(ctx: Context<ProtocolAdmin>, paused: bool) -> Result<()> {
        instructions::admin::handler_set_paused(ctx, paused)
    }

    pub fn transfer_admin(ctx: Context<ProtocolAdmin>, new_admin: Pubkey) -> Result<()> {
        instructions::admin::handler_transfer_admin(ctx, new_admin)
    }

    /// Update the fee schedule, each fee bounded by its cap
    pub fn update_fees(
        ctx: Context<ProtocolAdmin>,
        performance_fee_bps: u16,
        management_fee_bps: u16,
        withdrawal_fee_bps: u16,
        emergency_penalty_bps: u16,
    ) -> Result<()> {
        instructions::admin::handler_update_fees(
            ctx,
            performance_fee_bps,
            management_fee_bps,
            withdrawal_fee_bps,
            emergency_penalty_bps,
        )
    }

    pub fn update_yield_rate(ctx: Context<ProtocolAdmin>, yield_rate_bps: u16) -> Result<()> {
        instructions::admin::handler_update_yield_rate(ctx, yield_rate_bps)
    }

    pub fn update_deposit_lock(ctx: Context<ProtocolAdmin>, blocks: u64) -> Result<()> {
        instructions::admin::handler_update_deposit_lock(ctx, blocks)
    }

    /// Move collected fees from the treasury to an admin-chosen token account
    pub fn withdraw_fees(ctx: Context<WithdrawFees>, amount: u64) -> Result<()> {
        instructions::admin::handler_withdraw_fees(ctx, amount)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_vault_apy(ctx: Context<VaultQuery>) -> Result<u64> {
        instructions::queries::handler_get_vault_apy(ctx)
    }

    pub fn get_user_balance(ctx: Context<PositionQuery>) -> Result<u64> {
        instructions::queries::handler_get_user_balance(ctx)
    }

    pub fn get_total_value_locked(ctx: Context<ProtocolQuery>) -> Result<u64> {
        instructions::queries::handler_get_total_value_locked(ctx)
    }

    pub fn get_protocol_revenue(ctx: Context<ProtocolQuery>) -> Result<u64> {
        instructions::queries::handler_get_protocol_revenue(ctx)
    }

    pub fn can_harvest(ctx: Context<VaultQuery>) -> Result<bool> {
        instructions::queries::handler_can_harvest(ctx)
    }

    pub fn preview_management_fee(ctx: Context<VaultQuery>) -> Result<u64> {
        instructions::queries::handler_preview_management_fee(ctx)
    }
}
