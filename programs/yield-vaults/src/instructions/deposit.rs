// =============================================================================
// Deposit Instruction
// =============================================================================
// Moves asset tokens from the user into custody and credits vault shares.
//
// Flow:
// 1. Validate against pause, minimum deposit, vault lock and capacity
// 2. Price shares against the pre-deposit vault
// 3. Transfer user -> custody
// 4. Open or merge the position, update user stats and protocol TVL
//
// Share calculation:
// - First deposit: shares = amount (1:1)
// - Later deposits: shares = amount * total_shares / total_deposits
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::Deposited;
use crate::ledger;
use crate::state::{Position, ProtocolState, UserStats, Vault};

use super::current_block;

/// Accounts required for the deposit instruction
#[derive(Accounts)]
pub struct Deposit<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// The user depositing tokens
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

    /// The user's position in this vault
    ///
    /// init_if_needed: first deposit into a vault opens the position
    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Position::INIT_SPACE,
        seeds = [POSITION_SEED, vault.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub position: Account<'info, Position>,

    /// Lifetime totals across all of the user's vaults
    #[account(
        init_if_needed,
        payer = user,
        space = 8 + UserStats::INIT_SPACE,
        seeds = [USER_STATS_SEED, user.key().as_ref()],
        bump
    )]
    pub user_stats: Account<'info, UserStats>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    /// Source of the deposit
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

    // =========================================================================
    // Programs
    // =========================================================================

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Handler for the deposit instruction
///
/// # Arguments
/// * `amount` - Asset tokens to deposit, at least MIN_DEPOSIT_AMOUNT
///
/// # Returns
/// * Shares minted
pub fn handler_deposit(ctx: Context<Deposit>, amount: u64) -> Result<u64> {
    let now = current_block()?;

    // =========================================================================
    // Validation & Pricing
    // =========================================================================

    let shares = ledger::quote_deposit(&ctx.accounts.protocol, &ctx.accounts.vault, amount)?;

    require!(
        ctx.accounts.user_token_account.amount >= amount,
        VaultError::InsufficientBalance
    );

    // =========================================================================
    // Transfer Tokens: User -> Custody
    // =========================================================================

    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.user_token_account.to_account_info(),
            to: ctx.accounts.custody.to_account_info(),
            authority: ctx.accounts.user.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    // =========================================================================
    // Commit
    // =========================================================================

    let vault_key = ctx.accounts.vault.key();
    let user_key = ctx.accounts.user.key();

    if ctx.accounts.position.is_new() {
        ctx.accounts.position.bump = ctx.bumps.position;
    }
    if ctx.accounts.user_stats.owner == Pubkey::default() {
        ctx.accounts.user_stats.bump = ctx.bumps.user_stats;
    }

    let accounts = &mut *ctx.accounts;
    ledger::apply_deposit(
        &mut accounts.protocol,
        vault_key,
        &mut accounts.vault,
        user_key,
        &mut accounts.position,
        &mut accounts.user_stats,
        amount,
        shares,
        now,
    )?;

    msg!("Deposit successful!");
    msg!("Amount deposited: {}", amount);
    msg!("Shares minted: {}", shares);
    msg!("Vault total deposits: {}", accounts.vault.total_deposits);
    msg!("Vault total shares: {}", accounts.vault.total_shares);
    msg!("Withdrawals unlock at block {}", accounts.position.lock_until);

    emit!(Deposited {
        vault: vault_key,
        owner: user_key,
        amount,
        shares_minted: shares,
    });

    Ok(shares)
}
