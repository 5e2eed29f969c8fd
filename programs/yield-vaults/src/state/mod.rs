// =============================================================================
// State Module
// =============================================================================
// Account structures stored by the Yield Vaults program.
// =============================================================================

pub mod harvest_record;
pub mod position;
pub mod protocol;
pub mod strategy;
pub mod user_stats;
pub mod vault;

pub use harvest_record::*;
pub use position::*;
pub use protocol::*;
pub use strategy::*;
pub use user_stats::*;
pub use vault::*;
