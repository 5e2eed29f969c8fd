// =============================================================================
// Instructions Module
// =============================================================================
// Account contexts and handlers for every Yield Vaults instruction. Handlers
// validate and price through the ledger, move tokens, then commit.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::PROTOCOL_SEED;
use crate::math;
use crate::state::ProtocolState;

// Protocol & vault setup
pub mod create_vault;
pub mod initialize_protocol;
pub mod update_vault_cap;

// User operations
pub mod compound;
pub mod deposit;
pub mod emergency_withdraw;
pub mod withdraw;

// Yield & strategies
pub mod harvest;
pub mod manage_strategy;
pub mod rebalance;

// Admin operations
pub mod admin;

// Read-only queries
pub mod queries;

// The #[derive(Accounts)] macro generates helper types that need to be at crate root
pub use admin::*;
pub use compound::*;
pub use create_vault::*;
pub use deposit::*;
pub use emergency_withdraw::*;
pub use harvest::*;
pub use initialize_protocol::*;
pub use manage_strategy::*;
pub use queries::*;
pub use rebalance::*;
pub use update_vault_cap::*;
pub use withdraw::*;

/// Current logical block from the cluster clock
pub(crate) fn current_block() -> Result<u64> {
    let clock = Clock::get()?;
    Ok(math::block_at(clock.unix_timestamp))
}

/// Transfer out of a protocol-owned token account, signing as the protocol
/// PDA. Zero amounts are skipped.
pub(crate) fn transfer_from_protocol<'info>(
    token_program: &Program<'info, Token>,
    protocol: &Account<'info, ProtocolState>,
    from: &Account<'info, TokenAccount>,
    to: &Account<'info, TokenAccount>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let bump = [protocol.bump];
    let protocol_seeds: &[&[u8]] = &[PROTOCOL_SEED, &bump];
    let signer_seeds = &[protocol_seeds];

    let transfer_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        Transfer {
            from: from.to_account_info(),
            to: to.to_account_info(),
            authority: protocol.to_account_info(),
        },
        signer_seeds,
    );

    token::transfer(transfer_ctx, amount)
}
