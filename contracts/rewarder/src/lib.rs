#![no_std]
use lockstake_shared::{math::mul_div_floor, MULTIPLIER_SCALE};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, symbol_short, token, Address, Env,
};

// Bonus stream paid in a second token alongside the chief's primary reward

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewarderConfig {
    pub admin: Address,
    pub chief: Address,
    pub reward_token: Address,
    pub reward_ratio: u32, // Basis points of the primary reward paid as bonus
}

#[contracttype]
pub enum DataKey {
    Config,
    LastVirtual(u32, Address), // pool_id, account
    TotalPaid(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RewarderError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidConfiguration = 4,
    InsufficientRewards = 5,
    NumericOverflow = 6,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BonusPaidEvent {
    pub pool_id: u32,
    pub account: Address,
    pub recipient: Address,
    pub primary_reward: i128,
    pub bonus: i128,
}

#[contract]
pub struct RewarderContract;

#[contractimpl]
impl RewarderContract {
    /// Bind the rewarder to the chief allowed to drive it
    pub fn initialize(
        env: Env,
        admin: Address,
        chief: Address,
        reward_token: Address,
        reward_ratio: u32,
    ) -> Result<(), RewarderError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(RewarderError::AlreadyInitialized);
        }

        admin.require_auth();

        let config = RewarderConfig {
            admin: admin.clone(),
            chief,
            reward_token,
            reward_ratio,
        };
        env.storage().instance().set(&DataKey::Config, &config);

        log!(&env, "Rewarder initialized by admin: {}", admin);

        Ok(())
    }

    /// Hook called by the chief after every stake change or harvest.
    ///
    /// Pays `reward * reward_ratio / 10000` of the bonus token to `recipient`
    /// and records the account's latest virtual stake.
    pub fn on_reward(
        env: Env,
        pool_id: u32,
        account: Address,
        recipient: Address,
        reward: i128,
        new_virtual_amount: i128,
    ) -> Result<(), RewarderError> {
        let config = Self::get_config(env.clone())?;
        config.chief.require_auth();

        env.storage()
            .persistent()
            .set(&DataKey::LastVirtual(pool_id, account.clone()), &new_virtual_amount);

        let bonus = Self::bonus_for(&env, &config, reward)?;
        if bonus == 0 {
            return Ok(());
        }

        let token_client = token::Client::new(&env, &config.reward_token);
        if token_client.balance(&env.current_contract_address()) < bonus {
            return Err(RewarderError::InsufficientRewards);
        }
        token_client.transfer(&env.current_contract_address(), &recipient, &bonus);

        let paid_key = DataKey::TotalPaid(account.clone());
        let total_paid: i128 = env.storage().persistent().get(&paid_key).unwrap_or(0);
        let total_paid = total_paid
            .checked_add(bonus)
            .ok_or(RewarderError::NumericOverflow)?;
        env.storage().persistent().set(&paid_key, &total_paid);

        env.events().publish(
            (symbol_short!("bonus"), pool_id, account.clone()),
            BonusPaidEvent {
                pool_id,
                account: account.clone(),
                recipient,
                primary_reward: reward,
                bonus,
            },
        );

        log!(&env, "Bonus {} paid for {} in pool {}", bonus, account, pool_id);

        Ok(())
    }

    /// Change the bonus ratio (admin only)
    pub fn set_reward_ratio(env: Env, admin: Address, reward_ratio: u32) -> Result<(), RewarderError> {
        let mut config = Self::get_config(env.clone())?;

        admin.require_auth();
        if admin != config.admin {
            return Err(RewarderError::Unauthorized);
        }

        config.reward_ratio = reward_ratio;
        env.storage().instance().set(&DataKey::Config, &config);

        log!(&env, "Bonus ratio set to {}", reward_ratio);

        Ok(())
    }

    /// Bonus that a primary reward of `reward` would pay out
    pub fn pending_tokens(env: Env, reward: i128) -> Result<i128, RewarderError> {
        let config = Self::get_config(env.clone())?;
        Self::bonus_for(&env, &config, reward)
    }

    pub fn last_virtual_amount(env: Env, pool_id: u32, account: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::LastVirtual(pool_id, account))
            .unwrap_or(0)
    }

    pub fn total_paid(env: Env, account: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::TotalPaid(account))
            .unwrap_or(0)
    }

    pub fn get_config(env: Env) -> Result<RewarderConfig, RewarderError> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(RewarderError::NotInitialized)
    }

    fn bonus_for(env: &Env, config: &RewarderConfig, reward: i128) -> Result<i128, RewarderError> {
        if reward < 0 {
            return Err(RewarderError::InvalidConfiguration);
        }
        if reward == 0 || config.reward_ratio == 0 {
            return Ok(0);
        }
        mul_div_floor(env, reward, config.reward_ratio as i128, MULTIPLIER_SCALE)
            .ok_or(RewarderError::NumericOverflow)
    }
}
