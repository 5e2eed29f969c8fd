// =============================================================================
// Query Instructions
// =============================================================================
// Read-only views returned through Anchor return data. Raw account records
// (vaults, positions, strategies, user stats) are read by fetching the PDAs.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::ledger;
use crate::state::{Position, ProtocolState, Vault};

use super::current_block;

#[derive(Accounts)]
pub struct ProtocolQuery<'info> {
    #[account(
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Account<'info, ProtocolState>,
}

#[derive(Accounts)]
pub struct VaultQuery<'info> {
    #[account(
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Account<'info, ProtocolState>,

    #[account(
        seeds = [VAULT_SEED, &vault.id.to_le_bytes()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,
}

#[derive(Accounts)]
pub struct PositionQuery<'info> {
    #[account(
        seeds = [VAULT_SEED, &vault.id.to_le_bytes()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        seeds = [POSITION_SEED, vault.key().as_ref(), position.owner.as_ref()],
        bump = position.bump,
        constraint = position.vault == vault.key() @ VaultError::NotFound
    )]
    pub position: Account<'info, Position>,
}

/// performance * 10000 / total_deposits, 0 for an empty vault
pub fn handler_get_vault_apy(ctx: Context<VaultQuery>) -> Result<u64> {
    ctx.accounts.vault.apy_bps()
}

pub fn handler_get_user_balance(ctx: Context<PositionQuery>) -> Result<u64> {
    ledger::user_balance(&ctx.accounts.vault, &ctx.accounts.position)
}

pub fn handler_get_total_value_locked(ctx: Context<ProtocolQuery>) -> Result<u64> {
    Ok(ctx.accounts.protocol.total_value_locked)
}

pub fn handler_get_protocol_revenue(ctx: Context<ProtocolQuery>) -> Result<u64> {
    Ok(ctx.accounts.protocol.protocol_revenue)
}

/// Whether the vault's harvest cooldown has elapsed
pub fn handler_can_harvest(ctx: Context<VaultQuery>) -> Result<bool> {
    let now = current_block()?;
    Ok(ctx.accounts.vault.can_harvest(now))
}

/// Management fee accrued since the vault's last harvest. Not charged.
pub fn handler_preview_management_fee(ctx: Context<VaultQuery>) -> Result<u64> {
    let now = current_block()?;
    ledger::accrued_management_fee(&ctx.accounts.protocol, &ctx.accounts.vault, now)
}
