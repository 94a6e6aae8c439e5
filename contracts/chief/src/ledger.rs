use lockstake_shared::math::apply_multiplier;
use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::registry::PoolInfo;
use crate::storage::DataKey;
use crate::ChiefError;

/// One entry of an account's per-pool deposit log. `amount == 0` marks a
/// withdrawn slot; slots are never reused or compacted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositInfo {
    pub amount: i128,
    pub multiplier: u32,
    pub unlock_tick: u32,
    pub virtual_amount: i128, // This deposit's share of the pool's virtual supply
}

/// The account's whole log for `pool_id`, withdrawn slots included.
///
/// The log lives in a single storage entry so that exits touch a fixed number
/// of entries however many deposits were made.
pub fn load(env: &Env, pool_id: u32, account: &Address) -> Vec<DepositInfo> {
    env.storage()
        .persistent()
        .get(&DataKey::Deposits(pool_id, account.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn save(env: &Env, pool_id: u32, account: &Address, log: &Vec<DepositInfo>) {
    env.storage()
        .persistent()
        .set(&DataKey::Deposits(pool_id, account.clone()), log);
}

/// Push `deposit` onto the end of the log and return its index.
pub fn append(log: &mut Vec<DepositInfo>, deposit: DepositInfo) -> u32 {
    let index = log.len();
    log.push_back(deposit);
    index
}

/// Take `amount` of principal out of `deposit` and return the virtual amount
/// that leaves the pool with it.
///
/// The removed virtual amount is the difference between the deposit's
/// recorded contribution and the contribution of what remains, so the pool
/// total always equals the sum of live contributions.
pub fn reduce(env: &Env, deposit: &mut DepositInfo, amount: i128) -> Result<i128, ChiefError> {
    if amount > deposit.amount {
        return Err(ChiefError::InsufficientDepositAmount);
    }

    let remaining = deposit.amount - amount;
    let remaining_virtual = if remaining == 0 {
        0
    } else {
        apply_multiplier(env, remaining, deposit.multiplier).ok_or(ChiefError::ArithmeticOverflow)?
    };
    let removed = deposit
        .virtual_amount
        .checked_sub(remaining_virtual)
        .ok_or(ChiefError::ArithmeticOverflow)?;

    deposit.amount = remaining;
    deposit.virtual_amount = remaining_virtual;
    Ok(removed)
}

pub fn is_unlocked(deposit: &DepositInfo, pool: &PoolInfo, now: u32) -> bool {
    pool.unlocked || now >= deposit.unlock_tick
}

/// Index of the first live deposit still under its time-lock, if any.
pub fn first_locked(log: &Vec<DepositInfo>, pool: &PoolInfo, now: u32) -> Option<u32> {
    log.iter()
        .position(|deposit| deposit.amount > 0 && !is_unlocked(&deposit, pool, now))
        .map(|index| index as u32)
}

/// Sum of live principal across the log.
pub fn live_principal(log: &Vec<DepositInfo>) -> Result<i128, ChiefError> {
    log.iter().try_fold(0i128, |total, deposit| {
        total
            .checked_add(deposit.amount)
            .ok_or(ChiefError::ArithmeticOverflow)
    })
}

/// Drop the log; the next deposit starts again at index zero.
pub fn clear(env: &Env, pool_id: u32, account: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Deposits(pool_id, account.clone()));
}
