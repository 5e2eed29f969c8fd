// =============================================================================
// Create Vault Instruction
// =============================================================================
// Admin-only. Allocates the next vault id and its PDA.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::VaultCreated;
use crate::ledger;
use crate::state::{ProtocolState, Vault};

use super::current_block;

#[derive(Accounts)]
pub struct CreateVault<'info> {
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
        init,
        payer = admin,
        space = 8 + Vault::INIT_SPACE,
        seeds = [VAULT_SEED, &protocol.vault_count.saturating_add(1).to_le_bytes()],
        bump
    )]
    pub vault: Account<'info, Vault>,

    pub system_program: Program<'info, System>,
}

/// # Arguments
/// * `name` - Display name, 1..=32 bytes
/// * `risk_level` - 1 conservative, 2 moderate, 3 aggressive
pub fn handler_create_vault(ctx: Context<CreateVault>, name: String, risk_level: u8) -> Result<u64> {
    let now = current_block()?;
    let vault_key = ctx.accounts.vault.key();

    let protocol = &mut ctx.accounts.protocol;
    let vault = &mut ctx.accounts.vault;

    let vault_id = ledger::create_vault(protocol, vault, name, risk_level, DEFAULT_VAULT_CAP, now)?;
    vault.bump = ctx.bumps.vault;

    msg!("Vault {} created: {} (risk {:?})", vault_id, vault.name, vault.risk_level);
    msg!("Capacity: {}", vault.max_capacity);

    emit!(VaultCreated {
        vault: vault_key,
        vault_id,
        name: vault.name.clone(),
        risk_level: vault.risk_level.tier(),
    });

    Ok(vault_id)
}
