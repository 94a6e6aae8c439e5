use lockstake_shared::LockTier;
use soroban_sdk::{contracttype, Address, Env, Vec, I256};

use crate::storage::{ChiefConfig, DataKey};
use crate::ChiefError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    pub id: u32,
    pub staking_token: Address,
    pub alloc_weight: u32,
    pub last_update_tick: u32,
    pub reward_per_share: I256, // Scaled by ACC_SCALE
    pub virtual_total_supply: i128,
    pub lock_tiers: Vec<LockTier>,
    pub rewarder: Option<Address>,
    pub force_locked: bool,
    pub unlocked: bool, // Administrative override of every deposit's unlock tick
}

pub fn load_pool(env: &Env, pool_id: u32) -> Result<PoolInfo, ChiefError> {
    env.storage()
        .persistent()
        .get(&DataKey::Pool(pool_id))
        .ok_or(ChiefError::PoolNotFound)
}

pub fn save_pool(env: &Env, pool: &PoolInfo) {
    env.storage().persistent().set(&DataKey::Pool(pool.id), pool);
}

/// Register a new pool and fold its weight into the config total.
///
/// The caller persists `config`.
pub fn add_pool(
    env: &Env,
    config: &mut ChiefConfig,
    staking_token: Address,
    alloc_weight: u32,
    rewarder: Option<Address>,
    lock_tiers: Vec<LockTier>,
    now: u32,
) -> Result<PoolInfo, ChiefError> {
    validate_tiers(&lock_tiers)?;

    let token_key = DataKey::PoolByToken(staking_token.clone());
    if env.storage().persistent().has(&token_key) {
        return Err(ChiefError::PoolAlreadyExists);
    }

    let pool = PoolInfo {
        id: config.pool_count,
        staking_token,
        alloc_weight,
        last_update_tick: now,
        reward_per_share: I256::from_i32(env, 0),
        virtual_total_supply: 0,
        lock_tiers,
        rewarder,
        force_locked: false,
        unlocked: false,
    };

    config.total_alloc_weight = config
        .total_alloc_weight
        .checked_add(alloc_weight as u64)
        .ok_or(ChiefError::ArithmeticOverflow)?;
    config.pool_count = config
        .pool_count
        .checked_add(1)
        .ok_or(ChiefError::ArithmeticOverflow)?;

    env.storage().persistent().set(&token_key, &pool.id);
    save_pool(env, &pool);

    Ok(pool)
}

/// Re-weight a pool, optionally replacing its rewarder. Other pools are not settled.
pub fn set_pool(
    config: &mut ChiefConfig,
    pool: &mut PoolInfo,
    alloc_weight: u32,
    rewarder: Option<Address>,
    overwrite: bool,
) -> Result<(), ChiefError> {
    config.total_alloc_weight = config
        .total_alloc_weight
        .checked_sub(pool.alloc_weight as u64)
        .and_then(|total| total.checked_add(alloc_weight as u64))
        .ok_or(ChiefError::ArithmeticOverflow)?;
    pool.alloc_weight = alloc_weight;

    if overwrite {
        pool.rewarder = rewarder;
    }
    Ok(())
}

/// Exact-match lookup of the multiplier for `lock_length`.
pub fn resolve_multiplier(pool: &PoolInfo, lock_length: u32) -> Result<u32, ChiefError> {
    pool.lock_tiers
        .iter()
        .find(|tier| tier.lock_length == lock_length)
        .map(|tier| tier.multiplier)
        .ok_or(ChiefError::NoMatchingLockTier)
}

/// Insert or replace a lock tier.
///
/// Lowering an existing multiplier unlocks the pool unless governance has
/// force-locked it. Returns whether the pool ended up unlocked by this call.
pub fn set_lock_tier(
    pool: &mut PoolInfo,
    lock_length: u32,
    multiplier: u32,
) -> Result<bool, ChiefError> {
    if multiplier == 0 {
        return Err(ChiefError::InvalidConfiguration);
    }

    let tier = LockTier {
        lock_length,
        multiplier,
    };
    let position = pool
        .lock_tiers
        .iter()
        .position(|existing| existing.lock_length == lock_length);

    let mut unlocked = false;
    match position {
        Some(index) => {
            let current = pool
                .lock_tiers
                .get(index as u32)
                .ok_or(ChiefError::NoMatchingLockTier)?;
            if multiplier < current.multiplier && !pool.force_locked && !pool.unlocked {
                pool.unlocked = true;
                unlocked = true;
            }
            pool.lock_tiers.set(index as u32, tier);
        }
        None => pool.lock_tiers.push_back(tier),
    }

    Ok(unlocked)
}

pub fn unlock(pool: &mut PoolInfo) {
    pool.unlocked = true;
    pool.force_locked = false;
}

pub fn lock(pool: &mut PoolInfo) {
    pool.unlocked = false;
    pool.force_locked = true;
}

fn validate_tiers(lock_tiers: &Vec<LockTier>) -> Result<(), ChiefError> {
    if lock_tiers.is_empty() {
        return Err(ChiefError::InvalidConfiguration);
    }

    for (i, tier) in lock_tiers.iter().enumerate() {
        if tier.multiplier == 0 {
            return Err(ChiefError::InvalidConfiguration);
        }
        let duplicate = lock_tiers
            .iter()
            .skip(i + 1)
            .any(|other| other.lock_length == tier.lock_length);
        if duplicate {
            return Err(ChiefError::InvalidConfiguration);
        }
    }
    Ok(())
}
