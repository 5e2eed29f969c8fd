// =============================================================================
// Harvest Instruction
// =============================================================================
// Realizes one round of simulated yield for a vault.
//
// Flow:
// 1. Enforce the pause flag and the vault's harvest cooldown
// 2. yield = total_deposits * yield_rate_bps / 10000, must be non-zero
// 3. Split into performance fee and net yield
// 4. Move net yield reserve -> custody and the fee reserve -> treasury
// 5. Credit the vault, write a HarvestRecord, update protocol accumulators
//
// Anyone may call this. The yield reserve must hold at least `yield`.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::Harvested;
use crate::ledger::{self, HarvestQuote};
use crate::state::{HarvestRecord, ProtocolState, Vault};

use super::{current_block, transfer_from_protocol};

/// Accounts required for the harvest instruction
#[derive(Accounts)]
pub struct Harvest<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// Any caller; pays rent for the harvest record
    #[account(mut)]
    pub harvester: Signer<'info>,

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

    /// Log entry for this harvest, keyed by the next harvest id
    #[account(
        init,
        payer = harvester,
        space = 8 + HarvestRecord::INIT_SPACE,
        seeds = [HARVEST_SEED, &protocol.harvest_count.saturating_add(1).to_le_bytes()],
        bump
    )]
    pub harvest_record: Account<'info, HarvestRecord>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    #[account(
        mut,
        seeds = [YIELD_RESERVE_SEED, protocol.key().as_ref()],
        bump = protocol.yield_reserve_bump
    )]
    pub yield_reserve: Account<'info, TokenAccount>,

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

    // =========================================================================
    // Programs
    // =========================================================================

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Handler for the harvest instruction
///
/// # Returns
/// * The realized yield, the performance fee and the net yield
pub fn handler_harvest(ctx: Context<Harvest>) -> Result<HarvestQuote> {
    let now = current_block()?;

    // =========================================================================
    // Validation & Yield Calculation
    // =========================================================================

    let quote = ledger::quote_harvest(&ctx.accounts.protocol, &ctx.accounts.vault, now)?;

    require!(
        ctx.accounts.yield_reserve.amount >= quote.yield_amount,
        VaultError::InsufficientBalance
    );

    msg!("Harvesting vault {}", ctx.accounts.vault.id);
    msg!("Yield: {}", quote.yield_amount);
    msg!("Performance fee: {}", quote.performance_fee);
    msg!("Net yield: {}", quote.net_yield);

    // =========================================================================
    // Transfer Tokens: Reserve -> Custody, Reserve -> Treasury
    // =========================================================================

    transfer_from_protocol(
        &ctx.accounts.token_program,
        &ctx.accounts.protocol,
        &ctx.accounts.yield_reserve,
        &ctx.accounts.custody,
        quote.net_yield,
    )?;
    transfer_from_protocol(
        &ctx.accounts.token_program,
        &ctx.accounts.protocol,
        &ctx.accounts.yield_reserve,
        &ctx.accounts.treasury,
        quote.performance_fee,
    )?;

    // =========================================================================
    // Commit
    // =========================================================================

    let vault_key = ctx.accounts.vault.key();
    let harvester_key = ctx.accounts.harvester.key();
    ctx.accounts.harvest_record.bump = ctx.bumps.harvest_record;

    let accounts = &mut *ctx.accounts;
    let harvest_id = ledger::apply_harvest(
        &mut accounts.protocol,
        vault_key,
        &mut accounts.vault,
        &mut accounts.harvest_record,
        harvester_key,
        &quote,
        now,
    )?;

    msg!("Harvest {} recorded at block {}", harvest_id, now);
    msg!("Vault total deposits: {}", accounts.vault.total_deposits);
    msg!("Protocol revenue: {}", accounts.protocol.protocol_revenue);

    emit!(Harvested {
        vault: vault_key,
        harvest_id,
        harvester: harvester_key,
        yield_amount: quote.yield_amount,
        performance_fee: quote.performance_fee,
        net_yield: quote.net_yield,
    });

    Ok(quote)
}
