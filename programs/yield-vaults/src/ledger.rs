// =============================================================================
// Ledger Transitions
// =============================================================================
// Every user-facing operation is split in two:
//
// - quote_*: validates all preconditions and computes the deltas from current
//   state. Takes shared references only, so a failed quote leaves nothing
//   half-applied.
// - apply_*: commits a quote to vault, position, user stats and protocol
//   accumulators together.
//
// Instruction handlers run quote -> token transfers -> apply. Nothing in this
// module touches the runtime (clock, CPIs, logs), so whole operation
// sequences can be exercised off-chain.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::MIN_DEPOSIT_AMOUNT;
use crate::error::VaultError;
use crate::math;
use crate::state::*;

/// Result of a withdrawal quote
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawalQuote {
    /// Shares burned
    pub shares: u64,
    /// Gross value of the shares, removed from the vault
    pub amount: u64,
    /// Withdrawal fee or emergency penalty, moved to the treasury
    pub fee: u64,
    /// Paid to the user (amount - fee)
    pub net: u64,
    /// Cost basis released from the position
    pub basis: u64,
    /// The position holds no shares afterwards and must be closed
    pub closes_position: bool,
}

/// Result of a harvest quote, also returned by the harvest instruction
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarvestQuote {
    pub yield_amount: u64,
    pub performance_fee: u64,
    pub net_yield: u64,
}

/// Result of a compound quote
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompoundQuote {
    pub current_value: u64,
    pub earnings: u64,
}

// =============================================================================
// Vault & Strategy Registry
// =============================================================================

/// Fill a freshly allocated vault account and advance the vault counter.
/// Returns the new vault id.
pub fn create_vault(
    protocol: &mut ProtocolState,
    vault: &mut Vault,
    name: String,
    risk_tier: u8,
    default_capacity: u64,
    now: u64,
) -> Result<u64> {
    validate_name(&name)?;
    let risk_level = RiskLevel::from_tier(risk_tier)?;
    let id = protocol.next_vault_id()?;

    vault.id = id;
    vault.name = name;
    vault.risk_level = risk_level;
    vault.total_deposits = 0;
    vault.total_shares = 0;
    vault.performance = 0;
    vault.max_capacity = default_capacity;
    vault.active_strategy_count = 0;
    vault.is_locked = false;
    vault.harvest_count = 0;
    vault.created_at = now;
    vault.last_harvest = 0;
    vault.last_rebalance = 0;

    protocol.vault_count = id;

    Ok(id)
}

/// Attach a new strategy to `vault` and advance the strategy counter.
/// Returns the new strategy id.
#[allow(clippy::too_many_arguments)]
pub fn add_strategy(
    protocol: &mut ProtocolState,
    vault_key: Pubkey,
    vault: &mut Vault,
    strategy: &mut Strategy,
    name: String,
    allocation_bps: u16,
    risk_tier: u8,
    now: u64,
) -> Result<u64> {
    validate_name(&name)?;
    validate_allocation(allocation_bps)?;
    let risk_level = RiskLevel::from_tier(risk_tier)?;
    let id = protocol.next_strategy_id()?;

    vault.attach_strategy()?;

    strategy.id = id;
    strategy.vault = vault_key;
    strategy.name = name;
    strategy.allocation_bps = allocation_bps;
    strategy.current_balance = 0;
    strategy.total_returns = 0;
    strategy.risk_level = risk_level;
    strategy.is_active = true;
    strategy.last_update = now;

    protocol.strategy_count = id;

    Ok(id)
}

/// Activate or deactivate a strategy, keeping the vault's active count in step.
/// Setting the current status again is a no-op.
pub fn set_strategy_active(
    vault: &mut Vault,
    strategy: &mut Strategy,
    active: bool,
    now: u64,
) -> Result<()> {
    if strategy.is_active == active {
        return Ok(());
    }

    if active {
        vault.attach_strategy()?;
    } else {
        vault.detach_strategy()?;
    }

    strategy.is_active = active;
    strategy.last_update = now;
    Ok(())
}

/// Placeholder rebalance hook: moves no balances, only stamps the vault
pub fn rebalance(protocol: &ProtocolState, vault: &mut Vault, now: u64) -> Result<()> {
    protocol.require_not_paused()?;
    vault.last_rebalance = now;
    Ok(())
}

// =============================================================================
// Deposit
// =============================================================================

/// Validate a deposit of `amount` and price it against the pre-deposit vault.
/// Returns the shares to mint.
pub fn quote_deposit(protocol: &ProtocolState, vault: &Vault, amount: u64) -> Result<u64> {
    protocol.require_not_paused()?;
    require!(amount >= MIN_DEPOSIT_AMOUNT, VaultError::InvalidAmount);
    vault.require_accepts_deposit(amount)?;

    let shares = vault.shares_for_deposit(amount)?;
    require!(shares > 0, VaultError::InvalidAmount);

    Ok(shares)
}

/// Commit a quoted deposit. Opens the position if this is the owner's first
/// deposit into the vault, otherwise merges into it.
#[allow(clippy::too_many_arguments)]
pub fn apply_deposit(
    protocol: &mut ProtocolState,
    vault_key: Pubkey,
    vault: &mut Vault,
    owner: Pubkey,
    position: &mut Position,
    stats: &mut UserStats,
    amount: u64,
    shares: u64,
    now: u64,
) -> Result<()> {
    let opened_position = position.is_new();
    let lock_until = now
        .checked_add(protocol.deposit_lock_blocks)
        .ok_or(VaultError::MathOverflow)?;

    if opened_position {
        position.vault = vault_key;
        position.owner = owner;
    }
    if stats.owner == Pubkey::default() {
        stats.owner = owner;
    }

    position.record_deposit(amount, shares, now, lock_until)?;
    vault.record_deposit(amount, shares)?;
    stats.record_deposit(amount, opened_position, now)?;
    protocol.record_inflow(amount)?;

    Ok(())
}

// =============================================================================
// Withdraw & Emergency Withdraw
// =============================================================================

fn quote_redemption(
    vault: &Vault,
    position: &Position,
    shares: u64,
    fee_for: impl Fn(u64) -> Result<u64>,
) -> Result<WithdrawalQuote> {
    require!(
        shares <= vault.total_shares,
        VaultError::InsufficientBalance
    );

    let amount = vault.value_for_shares(shares)?;
    let (fee, net) = math::split_fee(amount, fee_for(amount)?)?;
    let basis = position.basis_for_shares(shares)?;

    Ok(WithdrawalQuote {
        shares,
        amount,
        fee,
        net,
        basis,
        closes_position: shares == position.shares,
    })
}

/// Validate a standard withdrawal of `shares` at block `now`
pub fn quote_withdrawal(
    protocol: &ProtocolState,
    vault: &Vault,
    position: &Position,
    shares: u64,
    now: u64,
) -> Result<WithdrawalQuote> {
    protocol.require_not_paused()?;
    require!(shares > 0, VaultError::InvalidAmount);
    require!(position.shares > 0, VaultError::NotFound);
    require!(
        shares <= position.shares,
        VaultError::InsufficientBalance
    );
    require!(position.is_unlocked(now), VaultError::WithdrawalLocked);

    quote_redemption(vault, position, shares, |amount| {
        math::withdrawal_fee(amount, protocol.withdrawal_fee_bps)
    })
}

/// Quote redeeming the whole position at the emergency penalty.
/// Bypasses the pause flag, the vault lock and the withdrawal timelock.
pub fn quote_emergency_withdrawal(
    protocol: &ProtocolState,
    vault: &Vault,
    position: &Position,
) -> Result<WithdrawalQuote> {
    require!(position.shares > 0, VaultError::NotFound);

    quote_redemption(vault, position, position.shares, |amount| {
        math::emergency_penalty(amount, protocol.emergency_penalty_bps)
    })
}

/// Commit a quoted withdrawal (standard or emergency). The caller closes the
/// position account when `quote.closes_position` is set.
pub fn apply_withdrawal(
    protocol: &mut ProtocolState,
    vault: &mut Vault,
    position: &mut Position,
    stats: &mut UserStats,
    quote: &WithdrawalQuote,
    now: u64,
) -> Result<()> {
    vault.record_withdrawal(quote.amount, quote.shares)?;
    position.record_withdrawal(quote.shares, quote.basis, now)?;
    stats.record_withdrawal(quote.net)?;
    protocol.record_outflow(quote.amount, quote.fee)?;

    Ok(())
}

// =============================================================================
// Compound
// =============================================================================

/// Value the position and compute the earnings above its cost basis.
/// Fails with InvalidAmount when there has been no growth.
pub fn quote_compound(vault: &Vault, position: &Position) -> Result<CompoundQuote> {
    require!(position.shares > 0, VaultError::NotFound);

    let current_value = vault.value_for_shares(position.shares)?;
    let earnings = current_value
        .checked_sub(position.deposited)
        .filter(|earnings| *earnings > 0)
        .ok_or(VaultError::InvalidAmount)?;

    Ok(CompoundQuote {
        current_value,
        earnings,
    })
}

/// Re-base the position to its current value. Shares and vault totals are
/// untouched: the share price already reflects the gain.
pub fn apply_compound(
    position: &mut Position,
    stats: &mut UserStats,
    quote: &CompoundQuote,
    now: u64,
) -> Result<()> {
    let earnings = position.record_compound(quote.current_value, now)?;
    stats.record_earnings(earnings)?;
    Ok(())
}

// =============================================================================
// Harvest
// =============================================================================

/// Validate the vault's cooldown and split the simulated yield into fee and
/// net. A harvest that would realize nothing is rejected so it cannot consume
/// the cooldown.
pub fn quote_harvest(protocol: &ProtocolState, vault: &Vault, now: u64) -> Result<HarvestQuote> {
    protocol.require_not_paused()?;
    require!(vault.can_harvest(now), VaultError::HarvestCooldown);

    let yield_amount = math::harvest_yield(vault.total_deposits, protocol.yield_rate_bps)?;
    require!(yield_amount > 0, VaultError::InvalidAmount);
    let fee = math::performance_fee(yield_amount, protocol.performance_fee_bps)?;
    let (performance_fee, net_yield) = math::split_fee(yield_amount, fee)?;

    Ok(HarvestQuote {
        yield_amount,
        performance_fee,
        net_yield,
    })
}

/// Commit a quoted harvest: credit the vault, write the log entry and update
/// the protocol accumulators. Returns the harvest id.
pub fn apply_harvest(
    protocol: &mut ProtocolState,
    vault_key: Pubkey,
    vault: &mut Vault,
    record: &mut HarvestRecord,
    harvester: Pubkey,
    quote: &HarvestQuote,
    now: u64,
) -> Result<u64> {
    let id = protocol.next_harvest_id()?;

    vault.record_harvest(quote.net_yield, now)?;
    protocol.record_harvest(quote.yield_amount, quote.performance_fee, quote.net_yield, now)?;

    record.id = id;
    record.vault = vault_key;
    record.yield_amount = quote.yield_amount;
    record.performance_fee = quote.performance_fee;
    record.net_yield = quote.net_yield;
    record.block = now;
    record.harvester = harvester;

    Ok(id)
}

// =============================================================================
// Queries
// =============================================================================

/// Current redeemable value of a position
pub fn user_balance(vault: &Vault, position: &Position) -> Result<u64> {
    vault.value_for_shares(position.shares)
}

/// Management fee the vault would owe for the blocks since its last harvest
/// (or creation). Informational only: no operation charges it.
pub fn accrued_management_fee(protocol: &ProtocolState, vault: &Vault, now: u64) -> Result<u64> {
    let since = vault.last_harvest.max(vault.created_at);
    math::management_fee(
        vault.total_deposits,
        protocol.management_fee_bps,
        now.saturating_sub(since),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    fn protocol() -> ProtocolState {
        let mut protocol = ProtocolState::default();
        protocol.apply_default_config();
        protocol
    }

    fn new_vault(protocol: &mut ProtocolState) -> Vault {
        let mut vault = Vault::default();
        create_vault(protocol, &mut vault, "core".to_string(), 2, DEFAULT_VAULT_CAP, 10).unwrap();
        vault
    }

    #[test]
    fn vault_ids_are_monotonic() {
        let mut protocol = protocol();
        let a = new_vault(&mut protocol);
        let b = new_vault(&mut protocol);
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(protocol.vault_count, 2);
        assert_eq!(a.risk_level, RiskLevel::Moderate);
        assert_eq!(a.created_at, 10);
    }

    #[test]
    fn bad_vault_input_leaves_counter_alone() {
        let mut protocol = protocol();
        let mut vault = Vault::default();
        assert!(create_vault(&mut protocol, &mut vault, String::new(), 1, DEFAULT_VAULT_CAP, 0).is_err());
        assert!(create_vault(&mut protocol, &mut vault, "x".into(), 4, DEFAULT_VAULT_CAP, 0).is_err());
        assert_eq!(protocol.vault_count, 0);
    }

    #[test]
    fn strategy_cap_is_enforced() {
        let mut protocol = protocol();
        let mut vault = new_vault(&mut protocol);
        let key = Pubkey::new_unique();

        for _ in 0..MAX_STRATEGIES_PER_VAULT {
            let mut s = Strategy::default();
            add_strategy(&mut protocol, key, &mut vault, &mut s, "s".into(), 1_000, 1, 0).unwrap();
        }

        let mut extra = Strategy::default();
        let err = add_strategy(&mut protocol, key, &mut vault, &mut extra, "s".into(), 1_000, 1, 0)
            .unwrap_err();
        assert_eq!(err, VaultError::MaxStrategiesExceeded.into());
        assert_eq!(protocol.strategy_count, MAX_STRATEGIES_PER_VAULT as u64);
    }

    #[test]
    fn strategy_rejects_over_full_allocation() {
        let mut protocol = protocol();
        let mut vault = new_vault(&mut protocol);
        let mut s = Strategy::default();
        let err = add_strategy(
            &mut protocol,
            Pubkey::new_unique(),
            &mut vault,
            &mut s,
            "s".into(),
            10_001,
            1,
            0,
        )
        .unwrap_err();
        assert_eq!(err, VaultError::InvalidAmount.into());
        assert_eq!(vault.active_strategy_count, 0);
    }

    #[test]
    fn deactivation_frees_a_slot() {
        let mut protocol = protocol();
        let mut vault = new_vault(&mut protocol);
        let mut s = Strategy::default();
        add_strategy(&mut protocol, Pubkey::new_unique(), &mut vault, &mut s, "s".into(), 0, 3, 0)
            .unwrap();

        set_strategy_active(&mut vault, &mut s, false, 5).unwrap();
        assert_eq!(vault.active_strategy_count, 0);
        assert!(!s.is_active);

        // repeated deactivation is a no-op, not an underflow
        set_strategy_active(&mut vault, &mut s, false, 6).unwrap();
        assert_eq!(s.last_update, 5);

        set_strategy_active(&mut vault, &mut s, true, 7).unwrap();
        assert_eq!(vault.active_strategy_count, 1);
    }

    #[test]
    fn paused_protocol_blocks_rebalance_and_deposit() {
        let mut protocol = protocol();
        let mut vault = new_vault(&mut protocol);
        protocol.is_paused = true;

        assert_eq!(
            rebalance(&protocol, &mut vault, 3).unwrap_err(),
            VaultError::Paused.into()
        );
        assert_eq!(
            quote_deposit(&protocol, &vault, 1_000_000).unwrap_err(),
            VaultError::Paused.into()
        );

        protocol.is_paused = false;
        rebalance(&protocol, &mut vault, 3).unwrap();
        assert_eq!(vault.last_rebalance, 3);
        assert_eq!(vault.last_harvest, 0);
    }

    #[test]
    fn deposit_below_minimum_is_rejected() {
        let mut protocol = protocol();
        let vault = new_vault(&mut protocol);
        assert_eq!(
            quote_deposit(&protocol, &vault, MIN_DEPOSIT_AMOUNT - 1).unwrap_err(),
            VaultError::InvalidAmount.into()
        );
        assert_eq!(
            quote_deposit(&protocol, &vault, MIN_DEPOSIT_AMOUNT).unwrap(),
            MIN_DEPOSIT_AMOUNT
        );
    }

    #[test]
    fn withdrawal_of_missing_position_is_not_found() {
        let protocol = protocol();
        let vault = Vault::default();
        let position = Position::default();
        assert_eq!(
            quote_withdrawal(&protocol, &vault, &position, 1, 0).unwrap_err(),
            VaultError::NotFound.into()
        );
        assert_eq!(
            quote_emergency_withdrawal(&protocol, &vault, &position).unwrap_err(),
            VaultError::NotFound.into()
        );
        assert_eq!(
            quote_withdrawal(&protocol, &vault, &position, 0, 0).unwrap_err(),
            VaultError::InvalidAmount.into()
        );
    }

    #[test]
    fn management_fee_preview_counts_from_last_harvest() {
        let mut protocol = protocol();
        let mut vault = new_vault(&mut protocol);
        vault.total_deposits = 1_000_000;

        let year_later = vault.created_at + BLOCKS_PER_YEAR;
        assert_eq!(accrued_management_fee(&protocol, &vault, year_later).unwrap(), 5_000);

        vault.last_harvest = year_later;
        assert_eq!(accrued_management_fee(&protocol, &vault, year_later).unwrap(), 0);
    }

    #[test]
    fn empty_vault_cannot_be_harvested() {
        let mut protocol = protocol();
        let vault = new_vault(&mut protocol);
        assert_eq!(
            quote_harvest(&protocol, &vault, 200).unwrap_err(),
            VaultError::InvalidAmount.into()
        );
    }
}
