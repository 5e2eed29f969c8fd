// =============================================================================
// Yield Vaults Protocol Constants
// =============================================================================
// Seeds, limits and the default fee schedule for the Yield Vaults program.
// Runtime-adjustable values (fee schedule, yield rate, deposit lock, vault cap)
// start from the defaults below and live on ProtocolState / Vault afterwards.
// =============================================================================

// =============================================================================
// BASIS POINTS
// =============================================================================

/// Total basis points (100%) - denominator for every fee and allocation
/// Example: fee = amount * FEE_BPS / BPS_DENOMINATOR
pub const BPS_DENOMINATOR: u64 = 10_000;

// =============================================================================
// DEFAULT FEE SCHEDULE (in basis points - 1 BPS = 0.01%)
// =============================================================================

/// Performance fee: 2% of harvested yield goes to protocol revenue
/// Never charged on principal
pub const DEFAULT_PERFORMANCE_FEE_BPS: u16 = 200;

/// Management fee: 0.5% per year, pro-rated per block
pub const DEFAULT_MANAGEMENT_FEE_BPS: u16 = 50;

/// Withdrawal fee: 0.1% on every standard withdrawal
pub const DEFAULT_WITHDRAWAL_FEE_BPS: u16 = 10;

/// Emergency penalty: 5% on emergency withdrawals (replaces the withdrawal fee)
pub const DEFAULT_EMERGENCY_PENALTY_BPS: u16 = 500;

/// Simulated strategy return realized by each harvest: 3% of vault deposits
pub const DEFAULT_YIELD_RATE_BPS: u16 = 300;

// Upper bounds the admin cannot exceed when updating the schedule
pub const MAX_PERFORMANCE_FEE_BPS: u16 = 2_000;
pub const MAX_MANAGEMENT_FEE_BPS: u16 = 500;
pub const MAX_WITHDRAWAL_FEE_BPS: u16 = 100;
pub const MAX_EMERGENCY_PENALTY_BPS: u16 = 2_000;
pub const MAX_YIELD_RATE_BPS: u16 = 1_000;

// =============================================================================
// TIME
// =============================================================================
// All protocol clocks count "blocks": unix_timestamp / SECONDS_PER_BLOCK.
// =============================================================================

/// Length of one protocol block in seconds (10 minutes)
pub const SECONDS_PER_BLOCK: u64 = 600;

/// Blocks per year, the denominator of the management fee
pub const BLOCKS_PER_YEAR: u64 = 52_560;

/// Minimum blocks between two harvests (24 hours)
pub const HARVEST_COOLDOWN_BLOCKS: u64 = 144;

/// Default withdrawal timelock applied to a position on deposit
pub const DEFAULT_DEPOSIT_LOCK_BLOCKS: u64 = 0;

/// Longest withdrawal timelock the admin may configure (30 days)
pub const MAX_DEPOSIT_LOCK_BLOCKS: u64 = 4_320;

// =============================================================================
// VAULT & STRATEGY LIMITS
// =============================================================================

/// Maximum byte length of vault and strategy names
pub const MAX_NAME_LEN: usize = 32;

/// Maximum active strategies attached to a single vault
pub const MAX_STRATEGIES_PER_VAULT: u8 = 10;

/// Minimum deposit amount (0.01 token at 6 decimals)
/// Keeps dust positions out of the ledger
pub const MIN_DEPOSIT_AMOUNT: u64 = 10_000;

/// Default capacity of a freshly created vault (1M tokens at 6 decimals)
pub const DEFAULT_VAULT_CAP: u64 = 1_000_000_000_000;

/// Global ceiling for any vault capacity (1B tokens at 6 decimals)
pub const MAX_VAULT_CAP: u64 = 1_000_000_000_000_000;

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Seed for the ProtocolState PDA
/// Full seed: ["protocol"]
pub const PROTOCOL_SEED: &[u8] = b"protocol";

/// Seed for a Vault PDA
/// Full seed: ["vault", vault_id.to_le_bytes()]
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for a Position PDA
/// Full seed: ["position", vault_pubkey, owner_pubkey]
pub const POSITION_SEED: &[u8] = b"position";

/// Seed for a UserStats PDA
/// Full seed: ["user_stats", owner_pubkey]
pub const USER_STATS_SEED: &[u8] = b"user_stats";

/// Seed for a Strategy PDA
/// Full seed: ["strategy", strategy_id.to_le_bytes()]
pub const STRATEGY_SEED: &[u8] = b"strategy";

/// Seed for a HarvestRecord PDA
/// Full seed: ["harvest", harvest_id.to_le_bytes()]
pub const HARVEST_SEED: &[u8] = b"harvest";

/// Seed for the custody token account holding every vault's deposits
/// Full seed: ["custody", protocol_pubkey]
pub const CUSTODY_SEED: &[u8] = b"custody";

/// Seed for the treasury token account accumulating protocol fees
/// Full seed: ["treasury", protocol_pubkey]
pub const TREASURY_SEED: &[u8] = b"treasury";

/// Seed for the reserve token account that funds harvested yield
/// Full seed: ["yield_reserve", protocol_pubkey]
pub const YIELD_RESERVE_SEED: &[u8] = b"yield_reserve";
