// =============================================================================
// Strategy Instructions
// =============================================================================
// Admin-only strategy registry maintenance. Strategies are metadata: an
// allocation target and a risk tier per vault. No balances move.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{StrategyAdded, StrategyUpdated};
use crate::ledger;
use crate::state::{ProtocolState, Strategy, Vault};

use super::current_block;

// =============================================================================
// Add Strategy
// =============================================================================

#[derive(Accounts)]
pub struct AddStrategy<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump,
        has_one = admin @ VaultError::Unauthorized
    )]
    pub protocol: Account<'info, ProtocolState>,

    #[account(
        mut,
        seeds = [VAULT_SEED, &vault.id.to_le_bytes()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        init,
        payer = admin,
        space = 8 + Strategy::INIT_SPACE,
        seeds = [STRATEGY_SEED, &protocol.strategy_count.saturating_add(1).to_le_bytes()],
        bump
    )]
    pub strategy: Account<'info, Strategy>,

    pub system_program: Program<'info, System>,
}

/// # Arguments
/// * `name` - Display name, 1..=32 bytes
/// * `allocation_bps` - Target share of vault deposits, at most 10000
/// * `risk_level` - 1 conservative, 2 moderate, 3 aggressive
pub fn handler_add_strategy(
    ctx: Context<AddStrategy>,
    name: String,
    allocation_bps: u16,
    risk_level: u8,
) -> Result<u64> {
    let now = current_block()?;
    let vault_key = ctx.accounts.vault.key();
    let strategy_key = ctx.accounts.strategy.key();
    ctx.accounts.strategy.bump = ctx.bumps.strategy;

    let accounts = &mut *ctx.accounts;
    let strategy_id = ledger::add_strategy(
        &mut accounts.protocol,
        vault_key,
        &mut accounts.vault,
        &mut accounts.strategy,
        name,
        allocation_bps,
        risk_level,
        now,
    )?;

    msg!(
        "Strategy {} ({}) added to vault {}",
        strategy_id,
        accounts.strategy.name,
        accounts.vault.id
    );
    msg!("Allocation: {} bps", allocation_bps);
    msg!("Active strategies: {}", accounts.vault.active_strategy_count);

    emit!(StrategyAdded {
        vault: vault_key,
        strategy: strategy_key,
        strategy_id,
        allocation_bps,
        risk_level: accounts.strategy.risk_level.tier(),
    });

    Ok(strategy_id)
}

// =============================================================================
// Update Strategy (allocation, activation)
// =============================================================================

#[derive(Accounts)]
pub struct UpdateStrategy<'info> {
    pub admin: Signer<'info>,

    #[account(
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump,
        has_one = admin @ VaultError::Unauthorized
    )]
    pub protocol: Account<'info, ProtocolState>,

    #[account(
        mut,
        seeds = [VAULT_SEED, &vault.id.to_le_bytes()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [STRATEGY_SEED, &strategy.id.to_le_bytes()],
        bump = strategy.bump,
        constraint = strategy.vault == vault.key() @ VaultError::NotFound
    )]
    pub strategy: Account<'info, Strategy>,
}

pub fn handler_update_strategy_allocation(
    ctx: Context<UpdateStrategy>,
    allocation_bps: u16,
) -> Result<()> {
    let now = current_block()?;
    let strategy = &mut ctx.accounts.strategy;

    let old_allocation = strategy.allocation_bps;
    strategy.set_allocation(allocation_bps, now)?;

    msg!(
        "Strategy {} allocation: {} -> {} bps",
        strategy.id,
        old_allocation,
        allocation_bps
    );

    emit!(StrategyUpdated {
        strategy: strategy.key(),
        allocation_bps,
        is_active: strategy.is_active,
    });

    Ok(())
}

pub fn handler_set_strategy_active(ctx: Context<UpdateStrategy>, active: bool) -> Result<()> {
    let now = current_block()?;

    let accounts = &mut *ctx.accounts;
    ledger::set_strategy_active(&mut accounts.vault, &mut accounts.strategy, active, now)?;

    msg!(
        "Strategy {} {}",
        accounts.strategy.id,
        if active { "ACTIVATED" } else { "DEACTIVATED" }
    );
    msg!("Active strategies: {}", accounts.vault.active_strategy_count);

    emit!(StrategyUpdated {
        strategy: accounts.strategy.key(),
        allocation_bps: accounts.strategy.allocation_bps,
        is_active: accounts.strategy.is_active,
    });

    Ok(())
}
