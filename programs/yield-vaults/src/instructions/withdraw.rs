// =============================================================================
// Withdraw Instruction
// =============================================================================
// Redeems shares at the current share price, less the withdrawal fee.
//
// Flow:
// 1. Validate pause flag, share balance and the position's timelock
// 2. amount = shares * total_deposits / total_shares
// 3. Transfer net custody -> user, fee custody -> treasury
// 4. Update vault, position, user stats and protocol accumulators
// 5. Close the position once it holds no shares
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::Withdrawn;
use crate::ledger;
use crate::state::{Position, ProtocolState, UserStats, Vault};

use super::{current_block, transfer_from_protocol};

/// Accounts required for the withdraw instruction
#[derive(Accounts)]
pub struct Withdraw<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    #[account(mut)]
    pub user: Signer<'info>,

    // =========================================================================
    // Protocol Accounts
    // =========================================================================

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

    // =========================================================================
    // Token Accounts
    // =========================================================================

    /// Destination for the net amount
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

/// Handler for the withdraw instruction
///
/// # Arguments
/// * `shares` - Shares to burn from the caller's position
///
/// # Returns
/// * Net amount paid to the user
pub fn handler_withdraw(ctx: Context<Withdraw>, shares: u64) -> Result<u64> {
    let now = current_block()?;

    // =========================================================================
    // Validation & Pricing
    // =========================================================================

    let quote = ledger::quote_withdrawal(
        &ctx.accounts.protocol,
        &ctx.accounts.vault,
        &ctx.accounts.position,
        shares,
        now,
    )?;

    require!(
        ctx.accounts.custody.amount >= quote.amount,
        VaultError::InsufficientBalance
    );

    msg!("Withdrawing {} tokens for {} shares", quote.amount, quote.shares);

    // =========================================================================
    // Transfer Tokens: Custody -> User, Custody -> Treasury
    // =========================================================================

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

    // =========================================================================
    // Commit
    // =========================================================================

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

    if quote.closes_position {
        accounts.position.close(accounts.user.to_account_info())?;
        msg!("Position closed");
    }

    msg!("Withdrawal successful!");
    msg!("Gross: {}, fee: {}, net: {}", quote.amount, quote.fee, quote.net);
    msg!("Vault total deposits: {}", accounts.vault.total_deposits);
    msg!("Vault total shares: {}", accounts.vault.total_shares);

    emit!(Withdrawn {
        vault: vault_key,
        owner: user_key,
        shares_burned: quote.shares,
        amount: quote.amount,
        fee: quote.fee,
        net: quote.net,
    });

    Ok(quote.net)
}
