//! End-to-end ledger sequences: every operation goes through the same
//! quote/apply pair the instruction handlers use, minus the token transfers.

use anchor_lang::prelude::*;
use test_case::test_case;
use yield_vaults::constants::*;
use yield_vaults::error::VaultError;
use yield_vaults::ledger::{self, HarvestQuote, WithdrawalQuote};
use yield_vaults::math;
use yield_vaults::state::*;

struct Harness {
    protocol: ProtocolState,
    vault_key: Pubkey,
    vault: Vault,
    harvests: Vec<HarvestRecord>,
}

struct User {
    key: Pubkey,
    position: Position,
    stats: UserStats,
}

impl User {
    fn new() -> Self {
        Self {
            key: Pubkey::new_unique(),
            position: Position::default(),
            stats: UserStats::default(),
        }
    }
}

impl Harness {
    fn new() -> Self {
        let mut protocol = ProtocolState::default();
        protocol.apply_default_config();

        let mut vault = Vault::default();
        ledger::create_vault(&mut protocol, &mut vault, "stable".into(), 1, DEFAULT_VAULT_CAP, 0)
            .unwrap();

        Self {
            protocol,
            vault_key: Pubkey::new_unique(),
            vault,
            harvests: Vec::new(),
        }
    }

    fn deposit(&mut self, user: &mut User, amount: u64, now: u64) -> Result<u64> {
        let shares = ledger::quote_deposit(&self.protocol, &self.vault, amount)?;
        ledger::apply_deposit(
            &mut self.protocol,
            self.vault_key,
            &mut self.vault,
            user.key,
            &mut user.position,
            &mut user.stats,
            amount,
            shares,
            now,
        )?;
        Ok(shares)
    }

    fn withdraw(&mut self, user: &mut User, shares: u64, now: u64) -> Result<WithdrawalQuote> {
        let quote =
            ledger::quote_withdrawal(&self.protocol, &self.vault, &user.position, shares, now)?;
        self.settle(user, &quote, now)?;
        Ok(quote)
    }

    fn emergency_withdraw(&mut self, user: &mut User, now: u64) -> Result<WithdrawalQuote> {
        let quote = ledger::quote_emergency_withdrawal(&self.protocol, &self.vault, &user.position)?;
        self.settle(user, &quote, now)?;
        Ok(quote)
    }

    fn settle(&mut self, user: &mut User, quote: &WithdrawalQuote, now: u64) -> Result<()> {
        ledger::apply_withdrawal(
            &mut self.protocol,
            &mut self.vault,
            &mut user.position,
            &mut user.stats,
            quote,
            now,
        )?;
        if quote.closes_position {
            user.position = Position::default();
        }
        Ok(())
    }

    fn harvest(&mut self, now: u64) -> Result<HarvestQuote> {
        let quote = ledger::quote_harvest(&self.protocol, &self.vault, now)?;
        let mut record = HarvestRecord::default();
        ledger::apply_harvest(
            &mut self.protocol,
            self.vault_key,
            &mut self.vault,
            &mut record,
            Pubkey::new_unique(),
            &quote,
            now,
        )?;
        self.harvests.push(record);
        Ok(quote)
    }

    fn compound(&self, user: &mut User, now: u64) -> Result<u64> {
        let quote = ledger::quote_compound(&self.vault, &user.position)?;
        ledger::apply_compound(&mut user.position, &mut user.stats, &quote, now)?;
        Ok(quote.earnings)
    }
}

#[test]
fn two_depositors_harvest_and_withdraw() {
    let mut h = Harness::new();
    let mut alice = User::new();
    let mut bob = User::new();

    assert_eq!(h.deposit(&mut alice, 1_000_000, 1).unwrap(), 1_000_000);
    assert_eq!(h.deposit(&mut bob, 500_000, 2).unwrap(), 500_000);

    let harvest = h.harvest(3).unwrap();
    assert_eq!(
        harvest,
        HarvestQuote {
            yield_amount: 45_000,
            performance_fee: 900,
            net_yield: 44_100,
        }
    );
    assert_eq!((h.vault.total_deposits, h.vault.total_shares), (1_544_100, 1_500_000));
    assert_eq!(h.vault.performance, 44_100);
    assert_eq!(h.protocol.total_yield_generated, 45_000);

    let record = &h.harvests[0];
    assert_eq!((record.id, record.block, record.vault), (1, 3, h.vault_key));

    let quote = h.withdraw(&mut alice, 1_000_000, 4).unwrap();
    assert_eq!((quote.amount, quote.fee, quote.net), (1_029_400, 1_029, 1_028_371));
    assert!(quote.closes_position);

    assert_eq!((h.vault.total_deposits, h.vault.total_shares), (514_700, 500_000));
    assert_eq!(h.protocol.protocol_revenue, 900 + 1_029);
    assert_eq!(h.protocol.total_value_locked, 514_700);
    assert_eq!(alice.stats.total_withdrawn, 1_028_371);
    assert_eq!(alice.stats.realized_pnl(), 28_371);
}

#[test]
fn balances_never_exceed_vault_deposits() {
    let mut h = Harness::new();
    let mut users: Vec<User> = (0..4).map(|_| User::new()).collect();

    for (i, user) in users.iter_mut().enumerate() {
        h.deposit(user, 333_333 + i as u64 * 17_011, i as u64).unwrap();
    }
    h.harvest(10).unwrap();
    h.harvest(10 + HARVEST_COOLDOWN_BLOCKS).unwrap();
    h.withdraw(&mut users[1], 100_000, 500).unwrap();

    let claims: u64 = users
        .iter()
        .map(|u| ledger::user_balance(&h.vault, &u.position).unwrap())
        .sum();
    let shares: u64 = users.iter().map(|u| u.position.shares).sum();

    assert!(claims <= h.vault.total_deposits);
    assert_eq!(shares, h.vault.total_shares);
    assert_eq!(h.protocol.total_value_locked, h.vault.total_deposits);
}

#[test_case(MIN_DEPOSIT_AMOUNT ; "minimum")]
#[test_case(1_000_000 ; "round")]
#[test_case(987_654_321 ; "odd")]
fn first_depositor_gets_one_share_per_unit(amount: u64) {
    let mut h = Harness::new();
    let mut user = User::new();
    assert_eq!(h.deposit(&mut user, amount, 0).unwrap(), amount);
    assert_eq!(ledger::user_balance(&h.vault, &user.position).unwrap(), amount);
}

#[test]
fn round_trip_into_empty_vault_costs_only_the_withdrawal_fee() {
    let mut h = Harness::new();
    let mut user = User::new();
    let amount = 1_000_000;

    let shares = h.deposit(&mut user, amount, 0).unwrap();
    let quote = h.withdraw(&mut user, shares, 0).unwrap();

    let fee = math::withdrawal_fee(amount, DEFAULT_WITHDRAWAL_FEE_BPS).unwrap();
    assert_eq!(fee, 1_000);
    assert_eq!((quote.amount, quote.fee, quote.net), (amount, fee, amount - fee));
    assert!(quote.closes_position);
    assert!(user.position.is_new());
    assert_eq!((h.vault.total_deposits, h.vault.total_shares), (0, 0));
    assert_eq!(h.protocol.total_value_locked, 0);
    assert_eq!(h.protocol.protocol_revenue, fee);
}

#[test]
fn round_trip_after_growth_loses_at_most_one_unit() {
    let mut h = Harness::new();
    h.protocol.set_fees(0, 0, 0, 0).unwrap();

    let mut seed = User::new();
    let mut user = User::new();
    h.deposit(&mut seed, 2_000_000, 0).unwrap();
    h.harvest(1).unwrap();

    let shares = h.deposit(&mut user, 750_000, 2).unwrap();
    let quote = h.withdraw(&mut user, shares, 2).unwrap();

    assert!(quote.net <= 750_000);
    assert!(750_000 - quote.net <= 1);
    assert_eq!(user.position.shares, 0);
}

#[test]
fn share_price_never_drops_across_harvests() {
    let mut h = Harness::new();
    let mut user = User::new();
    h.deposit(&mut user, 1_000_000, 0).unwrap();

    let mut last = h.vault.value_for_shares(1_000_000).unwrap();
    for round in 0..5 {
        h.harvest(round * HARVEST_COOLDOWN_BLOCKS).unwrap();
        let value = h.vault.value_for_shares(1_000_000).unwrap();
        assert!(value > last);
        last = value;
    }
    assert_eq!(h.protocol.harvest_count, 5);
}

#[test]
fn harvest_cooldown_is_enforced() {
    let mut h = Harness::new();
    let mut user = User::new();
    h.deposit(&mut user, 1_000_000, 0).unwrap();

    h.harvest(100).unwrap();
    assert_eq!(
        h.harvest(100 + HARVEST_COOLDOWN_BLOCKS - 1).unwrap_err(),
        VaultError::HarvestCooldown.into()
    );
    assert_eq!(h.protocol.harvest_count, 1);

    h.harvest(100 + HARVEST_COOLDOWN_BLOCKS).unwrap();
    assert_eq!(h.protocol.harvest_count, 2);
}

#[test]
fn compound_requires_growth() {
    let mut h = Harness::new();
    let mut user = User::new();
    h.deposit(&mut user, 1_000_000, 0).unwrap();

    assert_eq!(h.compound(&mut user, 1).unwrap_err(), VaultError::InvalidAmount.into());

    h.harvest(2).unwrap();
    assert_eq!(h.compound(&mut user, 3).unwrap(), 29_400);
    assert_eq!(user.position.deposited, 1_029_400);
    assert_eq!(user.stats.total_earned, 29_400);
    assert_eq!(h.vault.total_shares, 1_000_000);

    assert_eq!(h.compound(&mut user, 4).unwrap_err(), VaultError::InvalidAmount.into());
}

#[test]
fn withdrawal_timelock_boundary() {
    let mut h = Harness::new();
    h.protocol.set_deposit_lock(10).unwrap();
    let mut user = User::new();
    h.deposit(&mut user, 1_000_000, 50).unwrap();
    assert_eq!(user.position.lock_until, 60);

    assert_eq!(
        h.withdraw(&mut user, 1_000, 59).unwrap_err(),
        VaultError::WithdrawalLocked.into()
    );
    h.withdraw(&mut user, 1_000, 60).unwrap();
    assert_eq!(user.position.shares, 999_000);
}

#[test]
fn partial_withdrawal_reduces_basis_proportionally() {
    let mut h = Harness::new();
    let mut user = User::new();
    h.deposit(&mut user, 1_000_000, 0).unwrap();

    let quote = h.withdraw(&mut user, 250_000, 1).unwrap();
    assert_eq!(quote.basis, 250_000);
    assert!(!quote.closes_position);
    assert_eq!((user.position.shares, user.position.deposited), (750_000, 750_000));
}

#[test]
fn withdrawing_more_than_held_fails() {
    let mut h = Harness::new();
    let mut user = User::new();
    h.deposit(&mut user, 100_000, 0).unwrap();

    assert_eq!(
        h.withdraw(&mut user, 100_001, 1).unwrap_err(),
        VaultError::InsufficientBalance.into()
    );
    assert_eq!(h.vault.total_shares, 100_000);
}

#[test]
fn emergency_exit_ignores_pause_lock_and_timelock() {
    let mut h = Harness::new();
    h.protocol.set_deposit_lock(MAX_DEPOSIT_LOCK_BLOCKS).unwrap();
    let mut user = User::new();
    h.deposit(&mut user, 1_000_000, 0).unwrap();

    h.protocol.is_paused = true;
    h.vault.is_locked = true;

    assert_eq!(
        h.withdraw(&mut user, 1_000_000, 1).unwrap_err(),
        VaultError::Paused.into()
    );

    let quote = h.emergency_withdraw(&mut user, 1).unwrap();
    assert_eq!((quote.amount, quote.fee, quote.net), (1_000_000, 50_000, 950_000));
    assert!(quote.closes_position);
    assert_eq!((h.vault.total_deposits, h.vault.total_shares), (0, 0));
    assert_eq!(h.protocol.protocol_revenue, 50_000);
    assert!(user.position.is_new());
}

#[test]
fn locked_vault_rejects_deposits_but_not_withdrawals() {
    let mut h = Harness::new();
    let mut user = User::new();
    h.deposit(&mut user, 500_000, 0).unwrap();

    h.vault.is_locked = true;
    assert_eq!(
        h.deposit(&mut user, 500_000, 1).unwrap_err(),
        VaultError::VaultLocked.into()
    );

    h.withdraw(&mut user, 500_000, 1).unwrap();
    assert_eq!(h.vault.total_deposits, 0);
}

#[test]
fn capacity_is_checked_against_post_deposit_total() {
    let mut h = Harness::new();
    h.vault.set_capacity(1_500_000).unwrap();
    let mut user = User::new();

    h.deposit(&mut user, 1_000_000, 0).unwrap();
    h.deposit(&mut user, 500_000, 1).unwrap();
    assert_eq!(
        h.deposit(&mut user, MIN_DEPOSIT_AMOUNT, 2).unwrap_err(),
        VaultError::VaultCapacityExceeded.into()
    );
    assert_eq!(user.stats.vaults_entered, 1);
    assert_eq!(user.stats.total_deposited, 1_500_000);
}

#[test]
fn paused_protocol_blocks_harvest() {
    let mut h = Harness::new();
    let mut user = User::new();
    h.deposit(&mut user, 1_000_000, 0).unwrap();

    h.protocol.is_paused = true;
    assert_eq!(h.harvest(1).unwrap_err(), VaultError::Paused.into());
    assert!(h.harvests.is_empty());
}

#[test]
fn harvest_cooldown_is_tracked_per_vault() {
    let mut h = Harness::new();
    let mut alice = User::new();
    h.deposit(&mut alice, 1_000_000, 0).unwrap();

    let mut other = Vault::default();
    let other_key = Pubkey::new_unique();
    ledger::create_vault(&mut h.protocol, &mut other, "growth".into(), 3, DEFAULT_VAULT_CAP, 0)
        .unwrap();

    // nothing to realize in an empty vault, and nothing is committed
    assert_eq!(
        ledger::quote_harvest(&h.protocol, &other, 200).unwrap_err(),
        VaultError::InvalidAmount.into()
    );
    assert_eq!(other.harvest_count, 0);

    h.harvest(201).unwrap();

    let mut bob = User::new();
    let shares = ledger::quote_deposit(&h.protocol, &other, 500_000).unwrap();
    ledger::apply_deposit(
        &mut h.protocol,
        other_key,
        &mut other,
        bob.key,
        &mut bob.position,
        &mut bob.stats,
        500_000,
        shares,
        201,
    )
    .unwrap();

    let quote = ledger::quote_harvest(&h.protocol, &other, 202).unwrap();
    assert_eq!(quote.yield_amount, 15_000);
    let mut record = HarvestRecord::default();
    ledger::apply_harvest(&mut h.protocol, other_key, &mut other, &mut record, bob.key, &quote, 202)
        .unwrap();
    assert_eq!((record.id, h.protocol.harvest_count), (2, 2));

    assert_eq!(
        h.harvest(202).unwrap_err(),
        VaultError::HarvestCooldown.into()
    );
    h.harvest(201 + HARVEST_COOLDOWN_BLOCKS).unwrap();
}
