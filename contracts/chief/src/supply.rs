use lockstake_shared::math::{accrued_ceil, accrued_floor};
use soroban_sdk::{contracttype, Address, Env, I256};

use crate::registry::PoolInfo;
use crate::storage::DataKey;
use crate::ChiefError;

/// Aggregate of one account's deposits in one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserPoolAccount {
    pub virtual_amount: i128,
    pub reward_debt: I256, // Signed: partial withdrawals carry accrued reward forward
}

impl UserPoolAccount {
    pub fn empty(env: &Env) -> Self {
        UserPoolAccount {
            virtual_amount: 0,
            reward_debt: I256::from_i32(env, 0),
        }
    }
}

pub fn load_account(env: &Env, pool_id: u32, account: &Address) -> UserPoolAccount {
    env.storage()
        .persistent()
        .get(&DataKey::UserPool(pool_id, account.clone()))
        .unwrap_or_else(|| UserPoolAccount::empty(env))
}

pub fn save_account(env: &Env, pool_id: u32, account: &Address, info: &UserPoolAccount) {
    env.storage()
        .persistent()
        .set(&DataKey::UserPool(pool_id, account.clone()), info);
}

pub fn remove_account(env: &Env, pool_id: u32, account: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::UserPool(pool_id, account.clone()));
}

/// Credit `virtual_amount` to both the pool total and the account.
///
/// The account's debt grows by the share of reward-per-share the new stake
/// has not earned, so earlier accrual is neither lost nor counted twice.
pub fn add(
    env: &Env,
    pool: &mut PoolInfo,
    account: &mut UserPoolAccount,
    virtual_amount: i128,
) -> Result<(), ChiefError> {
    let debt = accrued_floor(env, virtual_amount, &pool.reward_per_share)
        .ok_or(ChiefError::ArithmeticOverflow)?;

    pool.virtual_total_supply = pool
        .virtual_total_supply
        .checked_add(virtual_amount)
        .ok_or(ChiefError::ArithmeticOverflow)?;
    account.virtual_amount = account
        .virtual_amount
        .checked_add(virtual_amount)
        .ok_or(ChiefError::ArithmeticOverflow)?;
    account.reward_debt = account.reward_debt.add(&debt);
    Ok(())
}

/// Debit `virtual_amount` from both the pool total and the account.
///
/// The debt shrinks by the removed slice's accrued share, rounded up so the
/// account's pending reward can never go negative.
pub fn remove(
    env: &Env,
    pool: &mut PoolInfo,
    account: &mut UserPoolAccount,
    virtual_amount: i128,
) -> Result<(), ChiefError> {
    if virtual_amount > account.virtual_amount || virtual_amount > pool.virtual_total_supply {
        return Err(ChiefError::ArithmeticOverflow);
    }
    let debt = accrued_ceil(env, virtual_amount, &pool.reward_per_share)
        .ok_or(ChiefError::ArithmeticOverflow)?;

    pool.virtual_total_supply -= virtual_amount;
    account.virtual_amount -= virtual_amount;
    account.reward_debt = account.reward_debt.sub(&debt);
    Ok(())
}

/// Drop the account's whole virtual stake from the pool and zero it, forfeiting
/// anything unclaimed.
pub fn clear(env: &Env, pool: &mut PoolInfo, account: &mut UserPoolAccount) -> Result<(), ChiefError> {
    pool.virtual_total_supply = pool
        .virtual_total_supply
        .checked_sub(account.virtual_amount)
        .filter(|remaining| *remaining >= 0)
        .ok_or(ChiefError::ArithmeticOverflow)?;
    *account = UserPoolAccount::empty(env);
    Ok(())
}
