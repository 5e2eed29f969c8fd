// =============================================================================
// Initialize Protocol Instruction
// =============================================================================
// Creates the global ProtocolState and the three PDA-owned token accounts for
// the protocol asset:
// - custody: holds every vault's deposits
// - treasury: accumulates withdrawal fees, penalties and performance fees
// - yield_reserve: funds harvested yield (topped up by plain SPL transfers)
//
// The signer becomes the admin. Can only run once per program deployment.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::events::ProtocolInitialized;
use crate::state::ProtocolState;

/// Accounts required for the initialize_protocol instruction.
#[derive(Accounts)]
pub struct InitializeProtocol<'info> {
    /// The admin who will control the protocol
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = 8 + ProtocolState::INIT_SPACE,
        seeds = [PROTOCOL_SEED],
        bump
    )]
    pub protocol: Account<'info, ProtocolState>,

    /// The token every vault accepts
    pub asset_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = admin,
        token::mint = asset_mint,
        token::authority = protocol,
        seeds = [CUSTODY_SEED, protocol.key().as_ref()],
        bump
    )]
    pub custody: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = admin,
        token::mint = asset_mint,
        token::authority = protocol,
        seeds = [TREASURY_SEED, protocol.key().as_ref()],
        bump
    )]
    pub treasury: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = admin,
        token::mint = asset_mint,
        token::authority = protocol,
        seeds = [YIELD_RESERVE_SEED, protocol.key().as_ref()],
        bump
    )]
    pub yield_reserve: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler_initialize_protocol(ctx: Context<InitializeProtocol>) -> Result<()> {
    let protocol = &mut ctx.accounts.protocol;

    // =========================================================================
    // Store account references
    // =========================================================================

    protocol.admin = ctx.accounts.admin.key();
    protocol.asset_mint = ctx.accounts.asset_mint.key();
    protocol.custody = ctx.accounts.custody.key();
    protocol.treasury = ctx.accounts.treasury.key();
    protocol.yield_reserve = ctx.accounts.yield_reserve.key();

    // =========================================================================
    // Zero accumulators, default configuration
    // =========================================================================

    protocol.total_value_locked = 0;
    protocol.total_yield_generated = 0;
    protocol.protocol_revenue = 0;
    protocol.last_harvest_block = 0;
    protocol.vault_count = 0;
    protocol.strategy_count = 0;
    protocol.harvest_count = 0;
    protocol.apply_default_config();

    protocol.bump = ctx.bumps.protocol;
    protocol.custody_bump = ctx.bumps.custody;
    protocol.treasury_bump = ctx.bumps.treasury;
    protocol.yield_reserve_bump = ctx.bumps.yield_reserve;

    msg!("Yield Vaults protocol initialized");
    msg!("Admin: {}", protocol.admin);
    msg!("Asset mint: {}", protocol.asset_mint);
    msg!("Custody: {}", protocol.custody);
    msg!("Treasury: {}", protocol.treasury);
    msg!("Yield reserve: {}", protocol.yield_reserve);

    emit!(ProtocolInitialized {
        protocol: protocol.key(),
        admin: protocol.admin,
        asset_mint: protocol.asset_mint,
    });

    Ok(())
}
