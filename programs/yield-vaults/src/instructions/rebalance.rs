// =============================================================================
// Rebalance Instruction
// =============================================================================
// Admin hook for strategy rebalancing. Allocations are targets only, so this
// records when the vault was last rebalanced and moves nothing.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::VaultRebalanced;
use crate::ledger;
use crate::state::{ProtocolState, Vault};

use super::current_block;

#[derive(Accounts)]
pub struct Rebalance<'info> {
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
}

pub fn handler_rebalance(ctx: Context<Rebalance>) -> Result<()> {
    let now = current_block()?;

    ledger::rebalance(&ctx.accounts.protocol, &mut ctx.accounts.vault, now)?;

    msg!("Vault {} rebalanced at block {}", ctx.accounts.vault.id, now);

    emit!(VaultRebalanced {
        vault: ctx.accounts.vault.key(),
        block: now,
    });

    Ok(())
}
