#![no_std]
use soroban_sdk::{contractclient, contracttype, Address, Env};

pub mod math;

// Shared types used by the chief ledger and its rewarder contracts

// ============================================================================
// Constants
// ============================================================================

/// Scale applied to reward-per-share values. Sized so that a per-tick reward in
/// the 10^20 range spread over a virtual supply in the 10^35 range still
/// advances reward-per-share by a non-zero amount.
pub const ACC_SCALE: i128 = 100_000_000_000_000_000_000_000;

/// Basis points representing a 1.0x lock multiplier
pub const MULTIPLIER_SCALE: i128 = 10000;

// ============================================================================
// Pool Configuration Types
// ============================================================================

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockTier {
    pub lock_length: u32, // Ticks a deposit stays locked
    pub multiplier: u32,  // Basis points (10000 = 1x)
}

// ============================================================================
// Rewarder Hook
// ============================================================================

/// Secondary reward stream attached to a pool.
///
/// The chief calls `on_reward` after it has settled and moved funds for
/// deposit, withdraw, harvest and emergency exit. `reward` is the primary
/// reward paid in that call (zero when nothing was harvested) and
/// `new_virtual_amount` is the account's multiplier-weighted stake afterwards.
#[contractclient(name = "RewarderClient")]
pub trait RewarderInterface {
    fn on_reward(
        env: Env,
        pool_id: u32,
        account: Address,
        recipient: Address,
        reward: i128,
        new_virtual_amount: i128,
    );
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: i128) -> bool {
    amount > 0
}
