// =============================================================================
// Compound Instruction
// =============================================================================
// Realizes a position's unrealized gain into its cost basis. No tokens move
// and no shares are minted: the share price already reflects the gain.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::Compounded;
use crate::ledger;
use crate::state::{Position, UserStats, Vault};

use super::current_block;

#[derive(Accounts)]
pub struct Compound<'info> {
    pub user: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, &vault.id.to_le_bytes()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [POSITION_SEED, vault.key().as_ref(), user.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == user.key() @ VaultError::Unauthorized
    )]
    pub position: Account<'info, Position>,

    #[account(
        mut,
        seeds = [USER_STATS_SEED, user.key().as_ref()],
        bump = user_stats.bump
    )]
    pub user_stats: Account<'info, UserStats>,
}

/// Returns the earnings folded into the cost basis
pub fn handler_compound(ctx: Context<Compound>) -> Result<u64> {
    let now = current_block()?;

    let quote = ledger::quote_compound(&ctx.accounts.vault, &ctx.accounts.position)?;

    let accounts = &mut *ctx.accounts;
    ledger::apply_compound(&mut accounts.position, &mut accounts.user_stats, &quote, now)?;

    msg!("Compounded {} earnings", quote.earnings);
    msg!("New cost basis: {}", accounts.position.deposited);

    emit!(Compounded {
        vault: accounts.vault.key(),
        owner: accounts.user.key(),
        earnings: quote.earnings,
        new_basis: accounts.position.deposited,
    });

    Ok(quote.earnings)
}
