use soroban_sdk::{Env, I256};

use crate::ACC_SCALE;

/// `a * b / denominator`, rounded down, with a 256-bit intermediate product.
///
/// Returns `None` when an operand is negative, the denominator is zero, or the
/// quotient does not fit back into an `i128`.
pub fn mul_div_floor(env: &Env, a: i128, b: i128, denominator: i128) -> Option<i128> {
    if a < 0 || b < 0 || denominator <= 0 {
        return None;
    }
    if a == 0 || b == 0 {
        return Some(0);
    }

    let product = I256::from_i128(env, a).mul(&I256::from_i128(env, b));
    product.div(&I256::from_i128(env, denominator)).to_i128()
}

/// `a * b / denominator`, rounded up. Same failure modes as [`mul_div_floor`].
pub fn mul_div_ceil(env: &Env, a: i128, b: i128, denominator: i128) -> Option<i128> {
    if a < 0 || b < 0 || denominator <= 0 {
        return None;
    }
    if a == 0 || b == 0 {
        return Some(0);
    }

    let divisor = I256::from_i128(env, denominator);
    let bias = divisor.sub(&I256::from_i128(env, 1));
    let product = I256::from_i128(env, a).mul(&I256::from_i128(env, b));
    product.add(&bias).div(&divisor).to_i128()
}

/// Weight `amount` by a basis-point lock multiplier.
pub fn apply_multiplier(env: &Env, amount: i128, multiplier: u32) -> Option<i128> {
    mul_div_floor(env, amount, multiplier as i128, crate::MULTIPLIER_SCALE)
}

/// Reward-per-share increment from spreading `reward` over `supply`, scaled by
/// `ACC_SCALE` and kept at 256 bits.
///
/// A dust supply pushes the increment far past `i128`, so it is never narrowed.
pub fn share_delta(env: &Env, reward: i128, supply: i128) -> Option<I256> {
    if reward < 0 || supply <= 0 {
        return None;
    }

    let scaled = I256::from_i128(env, reward).mul(&I256::from_i128(env, ACC_SCALE));
    Some(scaled.div(&I256::from_i128(env, supply)))
}

/// `amount * per_share / ACC_SCALE`, rounded down.
pub fn accrued_floor(env: &Env, amount: i128, per_share: &I256) -> Option<I256> {
    let (whole, fraction) = split_product(env, amount, per_share)?;
    let scale = I256::from_i128(env, ACC_SCALE);
    Some(whole.add(&fraction.div(&scale)))
}

/// `amount * per_share / ACC_SCALE`, rounded up.
pub fn accrued_ceil(env: &Env, amount: i128, per_share: &I256) -> Option<I256> {
    let (whole, fraction) = split_product(env, amount, per_share)?;
    let scale = I256::from_i128(env, ACC_SCALE);
    let bias = scale.sub(&I256::from_i32(env, 1));
    Some(whole.add(&fraction.add(&bias).div(&scale)))
}

/// Narrow a 256-bit reward to a token amount. `None` if negative or too large.
pub fn to_amount(value: &I256) -> Option<i128> {
    value.to_i128().filter(|amount| *amount >= 0)
}

// `per_share` is split into whole units of ACC_SCALE and a remainder, so that
// `amount * whole + amount * remainder / ACC_SCALE` never needs the full
// `amount * per_share` product.
fn split_product(env: &Env, amount: i128, per_share: &I256) -> Option<(I256, I256)> {
    if amount < 0 || *per_share < I256::from_i32(env, 0) {
        return None;
    }

    let scale = I256::from_i128(env, ACC_SCALE);
    let amount = I256::from_i128(env, amount);
    let whole = per_share.div(&scale);
    let fraction = per_share.rem_euclid(&scale);
    Some((amount.mul(&whole), amount.mul(&fraction)))
}
