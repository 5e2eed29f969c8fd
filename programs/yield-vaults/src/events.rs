use anchor_lang::prelude::*;

#[event]
pub struct ProtocolInitialized {
    pub protocol: Pubkey,
    pub admin: Pubkey,
    pub asset_mint: Pubkey,
}

#[event]
pub struct VaultCreated {
    pub vault: Pubkey,
    pub vault_id: u64,
    pub name: String,
    pub risk_level: u8,
}

#[event]
pub struct VaultLockChanged {
    pub vault: Pubkey,
    pub locked: bool,
}

#[event]
pub struct VaultCapUpdated {
    pub vault: Pubkey,
    pub old_cap: u64,
    pub new_cap: u64,
}

#[event]
pub struct VaultRebalanced {
    pub vault: Pubkey,
    pub block: u64,
}

#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub shares_minted: u64,
}

#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub shares_burned: u64,
    pub amount: u64,
    pub fee: u64,
    pub net: u64,
}

#[event]
pub struct EmergencyWithdrawn {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub shares_burned: u64,
    pub amount: u64,
    pub penalty: u64,
    pub net: u64,
}

#[event]
pub struct Compounded {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub earnings: u64,
    pub new_basis: u64,
}

#[event]
pub struct Harvested {
    pub vault: Pubkey,
    pub harvest_id: u64,
    pub harvester: Pubkey,
    pub yield_amount: u64,
    pub performance_fee: u64,
    pub net_yield: u64,
}

#[event]
pub struct StrategyAdded {
    pub vault: Pubkey,
    pub strategy: Pubkey,
    pub strategy_id: u64,
    pub allocation_bps: u16,
    pub risk_level: u8,
}

#[event]
pub struct StrategyUpdated {
    pub strategy: Pubkey,
    pub allocation_bps: u16,
    pub is_active: bool,
}

#[event]
pub struct ProtocolPaused {
    pub paused: bool,
}

#[event]
pub struct FeesUpdated {
    pub performance_fee_bps: u16,
    pub management_fee_bps: u16,
    pub withdrawal_fee_bps: u16,
    pub emergency_penalty_bps: u16,
}

#[event]
pub struct FeesWithdrawn {
    pub destination: Pubkey,
    pub amount: u64,
    pub remaining_revenue: u64,
}

#[event]
pub struct AdminTransferred {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
}
