// =============================================================================
// Admin Instructions
// =============================================================================
// Administrative functions that only the protocol admin can call:
// - pause / unpause the protocol
// - hand the admin role to another key
// - fee schedule, simulated yield rate and deposit timelock
// - lock / unlock a vault for new deposits
// - withdraw collected fees from the treasury
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{AdminTransferred, FeesUpdated, FeesWithdrawn, ProtocolPaused, VaultLockChanged};
use crate::state::{ProtocolState, Vault};

use super::transfer_from_protocol;

// =============================================================================
// Protocol Configuration
// =============================================================================

/// Accounts shared by every protocol-level configuration change
#[derive(Accounts)]
pub struct ProtocolAdmin<'info> {
    /// The admin must sign
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump,
        has_one = admin @ VaultError::Unauthorized
    )]
    pub protocol: Account<'info, ProtocolState>,
}

/// Pause or unpause deposits, withdrawals, harvests and rebalances.
/// Emergency withdrawals stay available while paused.
pub fn handler_set_paused(ctx: Context<ProtocolAdmin>, paused: bool) -> Result<()> {
    let protocol = &mut ctx.accounts.protocol;

    if protocol.is_paused == paused {
        msg!(
            "Protocol is already {}",
            if paused { "paused" } else { "unpaused" }
        );
        return Ok(());
    }

    protocol.is_paused = paused;

    msg!(
        "Protocol {} by admin {}",
        if paused { "PAUSED" } else { "UNPAUSED" },
        ctx.accounts.admin.key()
    );

    emit!(ProtocolPaused { paused });

    Ok(())
}

pub fn handler_transfer_admin(ctx: Context<ProtocolAdmin>, new_admin: Pubkey) -> Result<()> {
    let protocol = &mut ctx.accounts.protocol;

    require!(new_admin != Pubkey::default(), VaultError::InvalidAmount);
    require!(new_admin != protocol.admin, VaultError::AlreadyExists);

    let old_admin = protocol.admin;
    protocol.admin = new_admin;

    msg!("Admin transferred");
    msg!("Old admin: {}", old_admin);
    msg!("New admin: {}", new_admin);

    emit!(AdminTransferred {
        old_admin,
        new_admin,
    });

    Ok(())
}

pub fn handler_update_fees(
    ctx: Context<ProtocolAdmin>,
    performance_fee_bps: u16,
    management_fee_bps: u16,
    withdrawal_fee_bps: u16,
    emergency_penalty_bps: u16,
) -> Result<()> {
    let protocol = &mut ctx.accounts.protocol;

    protocol.set_fees(
        performance_fee_bps,
        management_fee_bps,
        withdrawal_fee_bps,
        emergency_penalty_bps,
    )?;

    msg!("Fees updated");
    msg!("Performance: {} bps", performance_fee_bps);
    msg!("Management: {} bps", management_fee_bps);
    msg!("Withdrawal: {} bps", withdrawal_fee_bps);
    msg!("Emergency penalty: {} bps", emergency_penalty_bps);

    emit!(FeesUpdated {
        performance_fee_bps,
        management_fee_bps,
        withdrawal_fee_bps,
        emergency_penalty_bps,
    });

    Ok(())
}

pub fn handler_update_yield_rate(ctx: Context<ProtocolAdmin>, yield_rate_bps: u16) -> Result<()> {
    let protocol = &mut ctx.accounts.protocol;
    let old_rate = protocol.yield_rate_bps;

    protocol.set_yield_rate(yield_rate_bps)?;

    msg!("Yield rate updated: {} -> {} bps", old_rate, yield_rate_bps);

    Ok(())
}

pub fn handler_update_deposit_lock(ctx: Context<ProtocolAdmin>, blocks: u64) -> Result<()> {
    let protocol = &mut ctx.accounts.protocol;
    let old_lock = protocol.deposit_lock_blocks;

    protocol.set_deposit_lock(blocks)?;

    // existing positions keep the lock_until stamped at their last deposit
    msg!("Deposit lock updated: {} -> {} blocks", old_lock, blocks);

    Ok(())
}

// =============================================================================
// Vault Lock
// =============================================================================

#[derive(Accounts)]
pub struct SetVaultLock<'info> {
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

/// A locked vault rejects deposits. Withdrawals are unaffected.
pub fn handler_set_vault_lock(ctx: Context<SetVaultLock>, locked: bool) -> Result<()> {
    let vault = &mut ctx.accounts.vault;

    vault.is_locked = locked;

    msg!(
        "Vault {} {}",
        vault.id,
        if locked { "LOCKED" } else { "UNLOCKED" }
    );

    emit!(VaultLockChanged {
        vault: vault.key(),
        locked,
    });

    Ok(())
}

// =============================================================================
// Withdraw Fees
// =============================================================================

#[derive(Accounts)]
pub struct WithdrawFees<'info> {
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
        seeds = [TREASURY_SEED, protocol.key().as_ref()],
        bump = protocol.treasury_bump
    )]
    pub treasury: Account<'info, TokenAccount>,

    /// Receives the fees
    #[account(
        mut,
        constraint = destination.mint == protocol.asset_mint @ VaultError::InvalidMint
    )]
    pub destination: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_withdraw_fees(ctx: Context<WithdrawFees>, amount: u64) -> Result<()> {
    // =========================================================================
    // Validation
    // =========================================================================

    require!(amount > 0, VaultError::InvalidAmount);
    require!(
        amount <= ctx.accounts.protocol.protocol_revenue,
        VaultError::InsufficientBalance
    );
    require!(
        ctx.accounts.treasury.amount >= amount,
        VaultError::InsufficientBalance
    );

    // =========================================================================
    // Transfer Tokens: Treasury -> Destination
    // =========================================================================

    transfer_from_protocol(
        &ctx.accounts.token_program,
        &ctx.accounts.protocol,
        &ctx.accounts.treasury,
        &ctx.accounts.destination,
        amount,
    )?;

    let protocol = &mut ctx.accounts.protocol;
    protocol.withdraw_revenue(amount)?;

    msg!("Fees withdrawn: {}", amount);
    msg!("Remaining revenue: {}", protocol.protocol_revenue);

    emit!(FeesWithdrawn {
        destination: ctx.accounts.destination.key(),
        amount,
        remaining_revenue: protocol.protocol_revenue,
    });

    Ok(())
}
