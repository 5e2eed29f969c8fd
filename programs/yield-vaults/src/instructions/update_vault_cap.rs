// =============================================================================
// Update Vault Cap Instruction
// =============================================================================
// Lets the admin raise or lower a vault's deposit capacity.
//
// Security: only callable by the protocol admin
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::VaultCapUpdated;
use crate::state::{ProtocolState, Vault};

/// Update the maximum deposits a vault accepts
///
/// # Arguments
/// * `new_cap` - New capacity in base units
///
/// # Security
/// - Only admin can call this
/// - New cap cannot exceed MAX_VAULT_CAP
/// - New cap must be >= current total_deposits
#[derive(Accounts)]
pub struct UpdateVaultCap<'info> {
    /// The admin authority (must match protocol.admin)
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

pub fn handler_update_vault_cap(ctx: Context<UpdateVaultCap>, new_cap: u64) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    let old_cap = vault.max_capacity;

    vault.set_capacity(new_cap)?;

    msg!("Vault {} cap updated", vault.id);
    msg!("Old cap: {}", old_cap);
    msg!("New cap: {}", new_cap);
    msg!("Current deposits: {}", vault.total_deposits);

    emit!(VaultCapUpdated {
        vault: vault.key(),
        old_cap,
        new_cap,
    });

    Ok(())
}
