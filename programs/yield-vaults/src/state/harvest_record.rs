use anchor_lang::prelude::*;

/// Append-only log entry written once per successful harvest
/// PDA: ["harvest", id.to_le_bytes()]
#[account]
#[derive(InitSpace, Default)]
pub struct HarvestRecord {
    /// Monotonic id assigned from ProtocolState::harvest_count
    pub id: u64,

    /// The vault that was harvested
    pub vault: Pubkey,

    /// Gross yield realized
    pub yield_amount: u64,

    /// Portion of the yield taken as performance fee
    pub performance_fee: u64,

    /// Yield credited to the vault (yield_amount - performance_fee)
    pub net_yield: u64,

    /// Block the harvest ran at
    pub block: u64,

    /// Whoever triggered the harvest
    pub harvester: Pubkey,

    pub bump: u8,
}
