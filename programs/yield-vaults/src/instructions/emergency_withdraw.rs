// =============================================================================
// Emergency Withdraw Instruction
// =============================================================================
// Exits the whole position immediately at the emergency penalty. Works while
// the protocol is paused, the vault is locked or the timelock is running.
// The position account is always closed.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::EmergencyWithdrawn;
use crate::ledger;
use crate::state::{Position, ProtocolState, UserStats, Vault};

use super::{current_block, transfer_from_protocol};

#[derive(Accounts)]
pub struct EmergencyWithdraw<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
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
        close = user,
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

    #[account(
        mut,
        constraint = user_token_account.mint == protocol.asset_mint @ VaultError::InvalidMint,
        constraint = user_token_account.owner == user.key() @ VaultError::InvalidTokenAccountOwner
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [CUSTODY_SEED, protocol.key().as_ref()],
        bump = protocol.custody_bump
    )]
    pub custody: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [TREASURY_SEED, protocol.key().as_ref()],
        bump = protocol.treasury_bump
    )]
    pub treasury: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Returns the net amount paid to the user
pub fn handler_emergency_withdraw(ctx: Context<EmergencyWithdraw>) -> Result<u64> {
    let now = current_block()?;

    let quote = ledger::quote_emergency_withdrawal(
        &ctx.accounts.protocol,
        &ctx.accounts.vault,
        &ctx.accounts.position,
    )?;

    require!(
        ctx.accounts.custody.amount >= quote.amount,
        VaultError::InsufficientBalance
    );

    transfer_from_protocol(
        &ctx.accounts.token_program,
        &ctx.accounts.protocol,
        &ctx.accounts.custody,
        &ctx.accounts.user_token_account,
        quote.net,
    )?;
    transfer_from_protocol(
        &ctx.accounts.token_program,
        &ctx.accounts.protocol,
        &ctx.accounts.custody,
        &ctx.accounts.treasury,
        quote.fee,
    )?;

    let vault_key = ctx.accounts.vault.key();
    let user_key = ctx.accounts.user.key();

    let accounts = &mut *ctx.accounts;
    ledger::apply_withdrawal(
        &mut accounts.protocol,
        &mut accounts.vault,
        &mut accounts.position,
        &mut accounts.user_stats,
        &quote,
        now,
    )?;

    msg!("Emergency withdrawal: {} shares", quote.shares);
    msg!("Gross: {}, penalty: {}, net: {}", quote.amount, quote.fee, quote.net);

    emit!(EmergencyWithdrawn {
        vault: vault_key,
        owner: user_key,
        shares_burned: quote.shares,
        amount: quote.amount,
        penalty: quote.fee,
        net: quote.net,
    });

    Ok(quote.net)
}
