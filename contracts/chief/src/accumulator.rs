use lockstake_shared::math::{accrued_floor, mul_div_floor, share_delta, to_amount};
use soroban_sdk::{Env, I256};

use crate::registry::PoolInfo;
use crate::storage::ChiefConfig;
use crate::supply::UserPoolAccount;
use crate::ChiefError;

/// Reward-per-share the pool would have at `now`, without touching state.
///
/// ```text
/// pool_reward = elapsed * emission_per_tick * alloc_weight / total_alloc_weight
/// rps        += pool_reward * ACC_SCALE / virtual_total_supply
/// ```
///
/// An empty pool (no virtual stake) or a pool with no weight accrues nothing,
/// and the interval is not paid out later. `rps` is 256-bit: a sole dust stake
/// can raise it past `i128` in a single tick.
pub fn reward_per_share_at(
    env: &Env,
    config: &ChiefConfig,
    pool: &PoolInfo,
    now: u32,
) -> Result<I256, ChiefError> {
    if now <= pool.last_update_tick
        || pool.virtual_total_supply == 0
        || pool.alloc_weight == 0
        || config.total_alloc_weight == 0
    {
        return Ok(pool.reward_per_share.clone());
    }

    let elapsed = (now - pool.last_update_tick) as i128;
    let emitted = elapsed
        .checked_mul(config.emission_per_tick)
        .ok_or(ChiefError::ArithmeticOverflow)?;
    let pool_reward = mul_div_floor(
        env,
        emitted,
        pool.alloc_weight as i128,
        config.total_alloc_weight as i128,
    )
    .ok_or(ChiefError::ArithmeticOverflow)?;
    let delta = share_delta(env, pool_reward, pool.virtual_total_supply)
        .ok_or(ChiefError::ArithmeticOverflow)?;

    Ok(pool.reward_per_share.add(&delta))
}

/// Settle `pool` up to `now`. Returns `false` when the pool was already current.
///
/// Every operation that changes virtual supply or a deposit calls this first.
pub fn update(
    env: &Env,
    config: &ChiefConfig,
    pool: &mut PoolInfo,
    now: u32,
) -> Result<bool, ChiefError> {
    if now <= pool.last_update_tick {
        return Ok(false);
    }

    pool.reward_per_share = reward_per_share_at(env, config, pool, now)?;
    pool.last_update_tick = now;
    Ok(true)
}

/// `virtual_amount * reward_per_share / ACC_SCALE`, rounded down.
pub fn accumulated(env: &Env, virtual_amount: i128, reward_per_share: &I256) -> Result<I256, ChiefError> {
    accrued_floor(env, virtual_amount, reward_per_share).ok_or(ChiefError::ArithmeticOverflow)
}

/// Reward owed on top of `debt`, narrowed to a token amount.
pub fn owed(accrued: &I256, debt: &I256) -> Result<i128, ChiefError> {
    to_amount(&accrued.sub(debt)).ok_or(ChiefError::ArithmeticOverflow)
}

/// Unclaimed reward of `account` at `now`, simulated on a read-only pool.
pub fn pending(
    env: &Env,
    config: &ChiefConfig,
    pool: &PoolInfo,
    account: &UserPoolAccount,
    now: u32,
) -> Result<i128, ChiefError> {
    let reward_per_share = reward_per_share_at(env, config, pool, now)?;
    let accrued = accumulated(env, account.virtual_amount, &reward_per_share)?;
    owed(&accrued, &account.reward_debt)
}

/// Claim everything owed on an already-settled pool and reset the account's debt.
pub fn harvest(env: &Env, pool: &PoolInfo, account: &mut UserPoolAccount) -> Result<i128, ChiefError> {
    let accrued = accumulated(env, account.virtual_amount, &pool.reward_per_share)?;
    let reward = owed(&accrued, &account.reward_debt)?;

    account.reward_debt = accrued;
    Ok(reward)
}
