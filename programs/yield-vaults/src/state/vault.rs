// =============================================================================
// Vault State Account
// =============================================================================
// A named pool of the protocol asset. Tracks aggregate deposits and the shares
// issued against them; share price = total_deposits / total_shares.
//
// Harvests grow total_deposits without minting shares, which is how every
// holder's redeemable value rises proportionally.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::math;

/// Risk tier shared by vaults and strategies
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum RiskLevel {
    #[default]
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskLevel {
    /// Parse the 1-based tier used in instruction arguments
    pub fn from_tier(tier: u8) -> Result<Self> {
        match tier {
            1 => Ok(RiskLevel::Conservative),
            2 => Ok(RiskLevel::Moderate),
            3 => Ok(RiskLevel::Aggressive),
            _ => err!(VaultError::InvalidAmount),
        }
    }

    pub fn tier(&self) -> u8 {
        match self {
            RiskLevel::Conservative => 1,
            RiskLevel::Moderate => 2,
            RiskLevel::Aggressive => 3,
        }
    }
}

/// Names must be non-empty and fit the account's reserved space
pub fn validate_name(name: &str) -> Result<()> {
    require!(
        !name.is_empty() && name.len() <= MAX_NAME_LEN,
        VaultError::InvalidAmount
    );
    Ok(())
}

/// PDA derived from ["vault", id.to_le_bytes()].
#[account]
#[derive(InitSpace, Default)]
pub struct Vault {
    // =========================================================================
    // Identification
    // =========================================================================

    /// Monotonic id assigned from ProtocolState::vault_count
    pub id: u64,

    #[max_len(32)]
    pub name: String,

    pub risk_level: RiskLevel,

    // =========================================================================
    // Financial State (base units)
    // =========================================================================

    /// Assets claimable by all shareholders, including harvested net yield
    pub total_deposits: u64,

    /// Shares outstanding across all positions
    pub total_shares: u64,

    /// Net yield added over the vault's lifetime
    pub performance: u64,

    /// Deposits may not push total_deposits above this
    pub max_capacity: u64,

    // =========================================================================
    // Strategy & Status
    // =========================================================================

    pub active_strategy_count: u8,

    /// Blocks new deposits; withdrawals stay open
    pub is_locked: bool,

    /// Harvests credited to this vault
    pub harvest_count: u64,

    // =========================================================================
    // Timestamps (blocks)
    // =========================================================================

    pub created_at: u64,
    pub last_harvest: u64,
    pub last_rebalance: u64,

    pub bump: u8,
}

impl Vault {
    /// Shares minted for `amount` at the current price
    pub fn shares_for_deposit(&self, amount: u64) -> Result<u64> {
        math::shares_for_deposit(amount, self.total_deposits, self.total_shares)
    }

    /// Assets redeemable for `shares` at the current price
    pub fn value_for_shares(&self, shares: u64) -> Result<u64> {
        math::value_for_shares(shares, self.total_deposits, self.total_shares)
    }

    /// Check the vault can take `amount` more: unlocked and under capacity
    pub fn require_accepts_deposit(&self, amount: u64) -> Result<()> {
        require!(!self.is_locked, VaultError::VaultLocked);

        let new_total = self
            .total_deposits
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        require!(
            new_total <= self.max_capacity,
            VaultError::VaultCapacityExceeded
        );
        Ok(())
    }

    /// Whether a harvest may run at block `now`.
    ///
    /// A vault's first harvest is always allowed; afterwards at least
    /// HARVEST_COOLDOWN_BLOCKS must separate two harvests of the same vault
    /// (boundary inclusive).
    pub fn can_harvest(&self, now: u64) -> bool {
        self.harvest_count == 0
            || now.saturating_sub(self.last_harvest) >= HARVEST_COOLDOWN_BLOCKS
    }

    /// Annualized performance in basis points: performance * 10000 / total_deposits
    pub fn apy_bps(&self) -> Result<u64> {
        if self.total_deposits == 0 {
            return Ok(0);
        }
        math::mul_div(self.performance, BPS_DENOMINATOR, self.total_deposits)
    }

    pub fn set_capacity(&mut self, new_cap: u64) -> Result<()> {
        require!(
            new_cap > 0 && new_cap <= MAX_VAULT_CAP,
            VaultError::InvalidAmount
        );
        require!(
            new_cap >= self.total_deposits,
            VaultError::VaultCapacityExceeded
        );
        self.max_capacity = new_cap;
        Ok(())
    }

    /// Reserve a slot for one more active strategy
    pub fn attach_strategy(&mut self) -> Result<()> {
        require!(
            self.active_strategy_count < MAX_STRATEGIES_PER_VAULT,
            VaultError::MaxStrategiesExceeded
        );
        self.active_strategy_count += 1;
        Ok(())
    }

    /// Release the slot of a deactivated strategy
    pub fn detach_strategy(&mut self) -> Result<()> {
        self.active_strategy_count = self
            .active_strategy_count
            .checked_sub(1)
            .ok_or(VaultError::MathUnderflow)?;
        Ok(())
    }

    // =========================================================================
    // Aggregate updates used by the ledger
    // =========================================================================

    pub(crate) fn record_deposit(&mut self, amount: u64, shares: u64) -> Result<()> {
        self.total_deposits = self
            .total_deposits
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        self.total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }

    pub(crate) fn record_withdrawal(&mut self, amount: u64, shares: u64) -> Result<()> {
        self.total_deposits = self
            .total_deposits
            .checked_sub(amount)
            .ok_or(VaultError::MathUnderflow)?;
        self.total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or(VaultError::MathUnderflow)?;
        Ok(())
    }

    pub(crate) fn record_harvest(&mut self, net_yield: u64, now: u64) -> Result<()> {
        self.total_deposits = self
            .total_deposits
            .checked_add(net_yield)
            .ok_or(VaultError::MathOverflow)?;
        self.performance = self
            .performance
            .checked_add(net_yield)
            .ok_or(VaultError::MathOverflow)?;
        self.harvest_count = self
            .harvest_count
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;
        self.last_harvest = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault(total_deposits: u64, total_shares: u64) -> Vault {
        Vault {
            id: 1,
            name: "stable".to_string(),
            total_deposits,
            total_shares,
            max_capacity: DEFAULT_VAULT_CAP,
            ..Default::default()
        }
    }

    #[test]
    fn risk_tiers_parse() {
        assert_eq!(RiskLevel::from_tier(1).unwrap(), RiskLevel::Conservative);
        assert_eq!(RiskLevel::from_tier(3).unwrap().tier(), 3);
        assert_eq!(RiskLevel::default(), RiskLevel::Conservative);
        assert!(RiskLevel::from_tier(0).is_err());
        assert!(RiskLevel::from_tier(4).is_err());
    }

    #[test]
    fn names_are_bounded() {
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn locked_vault_refuses_deposits() {
        let mut v = vault(0, 0);
        v.is_locked = true;
        assert_eq!(
            v.require_accepts_deposit(1).unwrap_err(),
            VaultError::VaultLocked.into()
        );
    }

    #[test]
    fn capacity_is_inclusive() {
        let v = vault(DEFAULT_VAULT_CAP - 10, DEFAULT_VAULT_CAP - 10);
        assert!(v.require_accepts_deposit(10).is_ok());
        assert_eq!(
            v.require_accepts_deposit(11).unwrap_err(),
            VaultError::VaultCapacityExceeded.into()
        );
    }

    #[test]
    fn capacity_cannot_drop_below_deposits() {
        let mut v = vault(5_000, 5_000);
        assert!(v.set_capacity(4_999).is_err());
        assert!(v.set_capacity(0).is_err());
        assert!(v.set_capacity(MAX_VAULT_CAP + 1).is_err());
        v.set_capacity(5_000).unwrap();
        assert_eq!(v.max_capacity, 5_000);
    }

    #[test]
    fn apy_reflects_performance() {
        let mut v = vault(0, 0);
        assert_eq!(v.apy_bps().unwrap(), 0);

        v.total_deposits = 1_544_100;
        v.performance = 44_100;
        // 44_100 * 10_000 / 1_544_100 = 285.6
        assert_eq!(v.apy_bps().unwrap(), 285);
    }

    #[test]
    fn strategy_slots_are_capped() {
        let mut v = vault(0, 0);
        for _ in 0..MAX_STRATEGIES_PER_VAULT {
            v.attach_strategy().unwrap();
        }
        assert_eq!(
            v.attach_strategy().unwrap_err(),
            VaultError::MaxStrategiesExceeded.into()
        );
        v.detach_strategy().unwrap();
        assert!(v.attach_strategy().is_ok());
    }

    #[test]
    fn harvest_raises_price_without_minting() {
        let mut v = vault(1_500_000, 1_500_000);
        v.record_harvest(44_100, 7).unwrap();

        assert_eq!(v.total_deposits, 1_544_100);
        assert_eq!(v.total_shares, 1_500_000);
        assert_eq!(v.performance, 44_100);
        assert_eq!(v.last_harvest, 7);
        assert_eq!(v.harvest_count, 1);
        assert_eq!(v.value_for_shares(1_000_000).unwrap(), 1_029_400);
    }

    #[test]
    fn first_harvest_ignores_cooldown() {
        let v = vault(1_000, 1_000);
        assert!(v.can_harvest(0));
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let mut v = vault(1_000, 1_000);
        v.record_harvest(98, 1_000).unwrap();

        assert!(!v.can_harvest(1_000));
        assert!(!v.can_harvest(1_000 + HARVEST_COOLDOWN_BLOCKS - 1));
        assert!(v.can_harvest(1_000 + HARVEST_COOLDOWN_BLOCKS));
    }
}
