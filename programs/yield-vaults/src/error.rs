// =============================================================================
// Yield Vaults Error Codes
// =============================================================================
// Every failure is detected by a precondition check before any state is
// mutated, and surfaces to the caller as one of these codes.
// =============================================================================

use anchor_lang::prelude::*;

/// All errors the Yield Vaults program can return.
///
/// Anchor assigns numeric codes starting from 6000 in declaration order, so
/// new variants go at the end of their group's block or at the very end.
#[error_code]
pub enum VaultError {
    // =========================================================================
    // Authorization & Protocol State
    // =========================================================================

    /// Caller is not the protocol admin
    #[msg("Unauthorized - signer is not the protocol admin")]
    Unauthorized,

    /// Protocol-wide halt is active
    #[msg("Protocol is paused")]
    Paused,

    // =========================================================================
    // Input Validation
    // =========================================================================

    /// Zero or out-of-range numeric input, bad risk tier, bad name,
    /// allocation over 100%, or an operation that would do nothing
    #[msg("Invalid amount or parameter")]
    InvalidAmount,

    /// Token balance or share holding is smaller than requested
    #[msg("Insufficient balance for operation")]
    InsufficientBalance,

    // =========================================================================
    // Vault Errors
    // =========================================================================

    /// Deposit would push the vault past its capacity
    #[msg("Vault capacity exceeded")]
    VaultCapacityExceeded,

    /// Vault is locked for new deposits
    #[msg("Vault is locked for deposits")]
    VaultLocked,

    /// Position is still inside its withdrawal timelock
    #[msg("Withdrawal is still time-locked")]
    WithdrawalLocked,

    /// Harvest was attempted before the cooldown elapsed
    #[msg("Harvest cooldown has not elapsed")]
    HarvestCooldown,

    // =========================================================================
    // Strategy Errors
    // =========================================================================

    /// Strategy is deactivated
    #[msg("Strategy is inactive")]
    StrategyInactive,

    /// Vault already holds the maximum number of active strategies
    #[msg("Maximum strategies per vault exceeded")]
    MaxStrategiesExceeded,

    // =========================================================================
    // Lookup Errors
    // =========================================================================

    /// Vault, strategy or position does not exist (or holds nothing)
    #[msg("Record not found")]
    NotFound,

    /// Record already exists
    #[msg("Record already exists")]
    AlreadyExists,

    // =========================================================================
    // Math Errors
    // =========================================================================

    /// A calculation would overflow
    #[msg("Math overflow - calculation exceeded maximum value")]
    MathOverflow,

    /// A calculation would go negative
    #[msg("Math underflow - result would be negative")]
    MathUnderflow,

    /// Division by zero - a vault with shares but no deposits
    #[msg("Division by zero")]
    DivisionByZero,

    // =========================================================================
    // Account Validation Errors
    // =========================================================================

    /// Token account is for a different mint than the protocol asset
    #[msg("Invalid mint - must use the protocol asset")]
    InvalidMint,

    /// Token account owner doesn't match the signer
    #[msg("Invalid token account owner")]
    InvalidTokenAccountOwner,
}
