#![no_std]
use lockstake_shared::{math::apply_multiplier, validate_positive_amount, LockTier, RewarderClient};
use soroban_sdk::{contract, contracterror, contractimpl, log, token, Address, Env, Vec};

mod accumulator;
mod events;
mod ledger;
mod registry;
mod storage;
mod supply;

pub use ledger::DepositInfo;
pub use registry::PoolInfo;
pub use storage::ChiefConfig;
pub use supply::UserPoolAccount;

use events::{
    DepositEvent, EmergencyWithdrawEvent, EmissionRateEvent, GovernanceChangedEvent, HarvestEvent,
    LockTierSetEvent, PoolAddedEvent, PoolSetEvent, PoolUpdatedEvent, WithdrawAllEvent,
    WithdrawEvent,
};

// Error Types
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ChiefError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    PoolNotFound = 4,
    NoMatchingLockTier = 5,
    InsufficientDepositAmount = 6,
    DepositStillLocked = 7,
    ArithmeticOverflow = 8,
    InvalidAmount = 9,
    InvalidConfiguration = 10,
    ContractPaused = 11,
    PoolAlreadyExists = 12,
}

#[contract]
pub struct ChiefContract;

#[contractimpl]
impl ChiefContract {
    /// Initialize the chief with its governance identity and reward emission
    pub fn initialize(
        env: Env,
        governance: Address,
        reward_token: Address,
        emission_per_tick: i128,
    ) -> Result<(), ChiefError> {
        if storage::has_config(&env) {
            return Err(ChiefError::AlreadyInitialized);
        }
        if emission_per_tick < 0 {
            return Err(ChiefError::InvalidAmount);
        }

        governance.require_auth();

        let config = ChiefConfig {
            governance: governance.clone(),
            reward_token,
            emission_per_tick,
            total_alloc_weight: 0,
            pool_count: 0,
            paused: false,
        };
        storage::set_config(&env, &config);

        log!(&env, "Chief initialized by governance: {}", governance);

        Ok(())
    }

    // ========================================================================
    // Depositor operations
    // ========================================================================

    /// Stake `amount` of the pool's token under the tier matching `lock_length`.
    ///
    /// Returns the index the deposit was written to in the account's log.
    pub fn deposit(
        env: Env,
        account: Address,
        pool_id: u32,
        amount: i128,
        lock_length: u32,
    ) -> Result<u32, ChiefError> {
        account.require_auth();

        let config = storage::get_config(&env)?;
        if config.paused {
            return Err(ChiefError::ContractPaused);
        }
        if !validate_positive_amount(amount) {
            return Err(ChiefError::InvalidAmount);
        }

        let now = env.ledger().sequence();
        let mut pool = registry::load_pool(&env, pool_id)?;
        Self::settle(&env, &config, &mut pool, now)?;

        let multiplier = registry::resolve_multiplier(&pool, lock_length)?;
        let virtual_amount =
            apply_multiplier(&env, amount, multiplier).ok_or(ChiefError::ArithmeticOverflow)?;
        let unlock_tick = now
            .checked_add(lock_length)
            .ok_or(ChiefError::ArithmeticOverflow)?;

        let mut user = supply::load_account(&env, pool_id, &account);
        supply::add(&env, &mut pool, &mut user, virtual_amount)?;

        let deposit = DepositInfo {
            amount,
            multiplier,
            unlock_tick,
            virtual_amount,
        };
        let mut log = ledger::load(&env, pool_id, &account);
        let index = ledger::append(&mut log, deposit);

        ledger::save(&env, pool_id, &account, &log);
        registry::save_pool(&env, &pool);
        supply::save_account(&env, pool_id, &account, &user);

        token::Client::new(&env, &pool.staking_token).transfer(
            &account,
            &env.current_contract_address(),
            &amount,
        );
        Self::notify_rewarder(&env, &pool, &account, &account, 0, user.virtual_amount);

        events::publish_deposit(
            &env,
            DepositEvent {
                account: account.clone(),
                pool_id,
                index,
                amount,
                virtual_amount,
                multiplier,
                unlock_tick,
            },
        );

        log!(&env, "Account {} deposited {} into pool {} at index {}", account, amount, pool_id, index);

        Ok(index)
    }

    /// Pay out all pending reward of `account` in `pool_id` to `to`.
    pub fn harvest(env: Env, account: Address, pool_id: u32, to: Address) -> Result<i128, ChiefError> {
        account.require_auth();

        let config = storage::get_config(&env)?;
        let now = env.ledger().sequence();
        let mut pool = registry::load_pool(&env, pool_id)?;
        Self::settle(&env, &config, &mut pool, now)?;

        let mut user = supply::load_account(&env, pool_id, &account);
        let reward = accumulator::harvest(&env, &pool, &mut user)?;

        registry::save_pool(&env, &pool);
        supply::save_account(&env, pool_id, &account, &user);

        Self::pay_reward(&env, &config, &to, reward);
        Self::notify_rewarder(&env, &pool, &account, &to, reward, user.virtual_amount);

        events::publish_harvest(
            &env,
            HarvestEvent {
                account: account.clone(),
                pool_id,
                amount: reward,
                to,
            },
        );

        log!(&env, "Account {} harvested {} from pool {}", account, reward, pool_id);

        Ok(reward)
    }

    /// Withdraw `amount` of principal from the deposit at `index`.
    ///
    /// Reward accrued so far stays claimable through `harvest`; the slot is
    /// zeroed in place when emptied.
    pub fn withdraw_from_deposit(
        env: Env,
        account: Address,
        pool_id: u32,
        amount: i128,
        to: Address,
        index: u32,
    ) -> Result<(), ChiefError> {
        account.require_auth();

        let config = storage::get_config(&env)?;
        if !validate_positive_amount(amount) {
            return Err(ChiefError::InvalidAmount);
        }

        let now = env.ledger().sequence();
        let mut pool = registry::load_pool(&env, pool_id)?;
        let mut log = ledger::load(&env, pool_id, &account);
        let mut deposit = log.get(index).ok_or(ChiefError::InsufficientDepositAmount)?;
        if amount > deposit.amount {
            return Err(ChiefError::InsufficientDepositAmount);
        }
        if !ledger::is_unlocked(&deposit, &pool, now) {
            return Err(ChiefError::DepositStillLocked);
        }

        Self::settle(&env, &config, &mut pool, now)?;

        let mut user = supply::load_account(&env, pool_id, &account);
        let removed = ledger::reduce(&env, &mut deposit, amount)?;
        supply::remove(&env, &mut pool, &mut user, removed)?;
        let remaining = deposit.amount;
        log.set(index, deposit);

        ledger::save(&env, pool_id, &account, &log);
        registry::save_pool(&env, &pool);
        supply::save_account(&env, pool_id, &account, &user);

        token::Client::new(&env, &pool.staking_token).transfer(
            &env.current_contract_address(),
            &to,
            &amount,
        );
        Self::notify_rewarder(&env, &pool, &account, &to, 0, user.virtual_amount);

        events::publish_withdraw(
            &env,
            WithdrawEvent {
                account: account.clone(),
                pool_id,
                index,
                amount,
                remaining,
                to,
            },
        );

        log!(&env, "Account {} withdrew {} from pool {} index {}", account, amount, pool_id, index);

        Ok(())
    }

    /// Close every unlocked deposit and harvest everything pending in one go.
    ///
    /// Locked deposits are left untouched. Returns `(principal, reward)`.
    pub fn withdraw_all_and_harvest(
        env: Env,
        account: Address,
        pool_id: u32,
        to: Address,
    ) -> Result<(i128, i128), ChiefError> {
        account.require_auth();

        let config = storage::get_config(&env)?;
        let now = env.ledger().sequence();
        let mut pool = registry::load_pool(&env, pool_id)?;
        Self::settle(&env, &config, &mut pool, now)?;

        let mut user = supply::load_account(&env, pool_id, &account);
        let mut principal = 0i128;
        let mut deposits_closed = 0u32;

        let mut log = ledger::load(&env, pool_id, &account);
        for index in 0..log.len() {
            let Some(mut deposit) = log.get(index) else {
                continue;
            };
            if deposit.amount == 0 || !ledger::is_unlocked(&deposit, &pool, now) {
                continue;
            }

            let amount = deposit.amount;
            let removed = ledger::reduce(&env, &mut deposit, amount)?;
            supply::remove(&env, &mut pool, &mut user, removed)?;
            log.set(index, deposit);

            principal = principal
                .checked_add(amount)
                .ok_or(ChiefError::ArithmeticOverflow)?;
            deposits_closed += 1;
        }

        let reward = accumulator::harvest(&env, &pool, &mut user)?;

        if deposits_closed > 0 {
            ledger::save(&env, pool_id, &account, &log);
        }
        registry::save_pool(&env, &pool);
        supply::save_account(&env, pool_id, &account, &user);

        if principal > 0 {
            token::Client::new(&env, &pool.staking_token).transfer(
                &env.current_contract_address(),
                &to,
                &principal,
            );
        }
        Self::pay_reward(&env, &config, &to, reward);
        Self::notify_rewarder(&env, &pool, &account, &to, reward, user.virtual_amount);

        events::publish_withdraw_all(
            &env,
            WithdrawAllEvent {
                account: account.clone(),
                pool_id,
                principal,
                reward,
                deposits_closed,
                to,
            },
        );

        log!(&env, "Account {} withdrew {} and harvested {} from pool {}", account, principal, reward, pool_id);

        Ok((principal, reward))
    }

    /// Return all principal and forfeit every unclaimed reward.
    ///
    /// All-or-nothing: fails if any live deposit is still locked. Clears the
    /// account's deposit log for the pool.
    pub fn emergency_withdraw(
        env: Env,
        account: Address,
        pool_id: u32,
        to: Address,
    ) -> Result<i128, ChiefError> {
        account.require_auth();

        let config = storage::get_config(&env)?;
        let now = env.ledger().sequence();
        let mut pool = registry::load_pool(&env, pool_id)?;

        let log = ledger::load(&env, pool_id, &account);
        if ledger::first_locked(&log, &pool, now).is_some() {
            return Err(ChiefError::DepositStillLocked);
        }

        Self::settle(&env, &config, &mut pool, now)?;

        let mut user = supply::load_account(&env, pool_id, &account);
        let accrued = accumulator::accumulated(&env, user.virtual_amount, &pool.reward_per_share)?;
        let forfeited = accumulator::owed(&accrued, &user.reward_debt)?;
        let principal = ledger::live_principal(&log)?;

        supply::clear(&env, &mut pool, &mut user)?;
        ledger::clear(&env, pool_id, &account);
        supply::remove_account(&env, pool_id, &account);
        registry::save_pool(&env, &pool);

        if principal > 0 {
            token::Client::new(&env, &pool.staking_token).transfer(
                &env.current_contract_address(),
                &to,
                &principal,
            );
        }
        Self::notify_rewarder(&env, &pool, &account, &to, 0, 0);

        events::publish_emergency_withdraw(
            &env,
            EmergencyWithdrawEvent {
                account: account.clone(),
                pool_id,
                amount: principal,
                forfeited,
                to,
            },
        );

        log!(&env, "Account {} emergency withdrew {} from pool {}, forfeiting {}", account, principal, pool_id, forfeited);

        Ok(principal)
    }

    /// Settle one pool up to the current tick. Callable by anyone.
    pub fn update_pool(env: Env, pool_id: u32) -> Result<PoolInfo, ChiefError> {
        let config = storage::get_config(&env)?;
        let now = env.ledger().sequence();
        let mut pool = registry::load_pool(&env, pool_id)?;

        Self::settle(&env, &config, &mut pool, now)?;
        registry::save_pool(&env, &pool);

        Ok(pool)
    }

    /// Settle every pool up to the current tick. Callable by anyone.
    pub fn mass_update_pools(env: Env) -> Result<(), ChiefError> {
        let config = storage::get_config(&env)?;
        let now = env.ledger().sequence();

        for pool_id in 0..config.pool_count {
            let mut pool = registry::load_pool(&env, pool_id)?;
            Self::settle(&env, &config, &mut pool, now)?;
            registry::save_pool(&env, &pool);
        }

        Ok(())
    }

    // ========================================================================
    // Governance
    // ========================================================================

    /// Register a new pool for `staking_token`. Returns the new pool id.
    pub fn add_pool(
        env: Env,
        governance: Address,
        staking_token: Address,
        alloc_weight: u32,
        rewarder: Option<Address>,
        lock_tiers: Vec<LockTier>,
    ) -> Result<u32, ChiefError> {
        let mut config = storage::require_governance(&env, &governance)?;
        let now = env.ledger().sequence();

        let pool = registry::add_pool(
            &env,
            &mut config,
            staking_token.clone(),
            alloc_weight,
            rewarder.clone(),
            lock_tiers,
            now,
        )?;
        storage::set_config(&env, &config);

        events::publish_pool_added(
            &env,
            PoolAddedEvent {
                pool_id: pool.id,
                staking_token,
                alloc_weight,
                rewarder,
                tier_count: pool.lock_tiers.len(),
            },
        );

        log!(&env, "Pool {} added with weight {}", pool.id, alloc_weight);

        Ok(pool.id)
    }

    /// Re-weight a pool and optionally replace its rewarder.
    ///
    /// Pools are not settled here; call `mass_update_pools` first to apply the
    /// old weights to the elapsed ticks.
    pub fn set_pool(
        env: Env,
        governance: Address,
        pool_id: u32,
        alloc_weight: u32,
        rewarder: Option<Address>,
        overwrite: bool,
    ) -> Result<(), ChiefError> {
        let mut config = storage::require_governance(&env, &governance)?;
        let mut pool = registry::load_pool(&env, pool_id)?;

        registry::set_pool(&mut config, &mut pool, alloc_weight, rewarder, overwrite)?;
        registry::save_pool(&env, &pool);
        storage::set_config(&env, &config);

        events::publish_pool_set(
            &env,
            PoolSetEvent {
                pool_id,
                alloc_weight,
                rewarder: pool.rewarder.clone(),
                overwrite,
            },
        );

        log!(&env, "Pool {} weight set to {}", pool_id, alloc_weight);

        Ok(())
    }

    /// Change the global emission per tick used by subsequent settles.
    pub fn set_emission_rate(
        env: Env,
        governance: Address,
        emission_per_tick: i128,
    ) -> Result<(), ChiefError> {
        let mut config = storage::require_governance(&env, &governance)?;
        if emission_per_tick < 0 {
            return Err(ChiefError::InvalidAmount);
        }

        let old_rate = config.emission_per_tick;
        config.emission_per_tick = emission_per_tick;
        storage::set_config(&env, &config);

        events::publish_emission_rate(
            &env,
            EmissionRateEvent {
                old_rate,
                new_rate: emission_per_tick,
            },
        );

        log!(&env, "Emission per tick updated to: {}", emission_per_tick);

        Ok(())
    }

    /// Add a lock tier or change an existing tier's multiplier.
    ///
    /// Existing deposits keep the multiplier they were made with. Lowering a
    /// multiplier unlocks the pool unless it is force-locked.
    pub fn set_lock_tier(
        env: Env,
        governance: Address,
        pool_id: u32,
        lock_length: u32,
        multiplier: u32,
    ) -> Result<(), ChiefError> {
        storage::require_governance(&env, &governance)?;
        let mut pool = registry::load_pool(&env, pool_id)?;

        let unlocked = registry::set_lock_tier(&mut pool, lock_length, multiplier)?;
        registry::save_pool(&env, &pool);

        events::publish_lock_tier_set(
            &env,
            LockTierSetEvent {
                pool_id,
                lock_length,
                multiplier,
                unlocked,
            },
        );
        if unlocked {
            events::publish_pool_unlocked(&env, pool_id);
        }

        log!(&env, "Pool {} tier {} set to multiplier {}", pool_id, lock_length, multiplier);

        Ok(())
    }

    /// Make every deposit in the pool withdrawable regardless of unlock tick.
    pub fn unlock_pool(env: Env, governance: Address, pool_id: u32) -> Result<(), ChiefError> {
        storage::require_governance(&env, &governance)?;
        let mut pool = registry::load_pool(&env, pool_id)?;

        registry::unlock(&mut pool);
        registry::save_pool(&env, &pool);

        events::publish_pool_unlocked(&env, pool_id);
        log!(&env, "Pool {} unlocked by governance", pool_id);

        Ok(())
    }

    /// Restore time-locks on a pool and pin them against automatic unlocks.
    pub fn lock_pool(env: Env, governance: Address, pool_id: u32) -> Result<(), ChiefError> {
        storage::require_governance(&env, &governance)?;
        let mut pool = registry::load_pool(&env, pool_id)?;

        registry::lock(&mut pool);
        registry::save_pool(&env, &pool);

        events::publish_pool_locked(&env, pool_id);
        log!(&env, "Pool {} locked by governance", pool_id);

        Ok(())
    }

    /// Stop emission to a pool and let everyone out.
    pub fn reset_rewards(env: Env, governance: Address, pool_id: u32) -> Result<(), ChiefError> {
        let mut config = storage::require_governance(&env, &governance)?;
        let now = env.ledger().sequence();
        let mut pool = registry::load_pool(&env, pool_id)?;

        Self::settle(&env, &config, &mut pool, now)?;
        registry::set_pool(&mut config, &mut pool, 0, None, false)?;
        registry::unlock(&mut pool);
        registry::save_pool(&env, &pool);
        storage::set_config(&env, &config);

        events::publish_rewards_reset(&env, pool_id);
        log!(&env, "Pool {} rewards reset", pool_id);

        Ok(())
    }

    /// Pause or resume new deposits. Exits and harvests are never paused.
    pub fn set_paused(env: Env, governance: Address, paused: bool) -> Result<(), ChiefError> {
        let mut config = storage::require_governance(&env, &governance)?;

        config.paused = paused;
        storage::set_config(&env, &config);

        events::publish_paused(&env, paused);
        log!(&env, "Deposits paused: {}", paused);

        Ok(())
    }

    /// Hand the governance role to `new_governance`.
    pub fn set_governance(
        env: Env,
        governance: Address,
        new_governance: Address,
    ) -> Result<(), ChiefError> {
        let mut config = storage::require_governance(&env, &governance)?;

        config.governance = new_governance.clone();
        storage::set_config(&env, &config);

        events::publish_governance_changed(
            &env,
            GovernanceChangedEvent {
                old_governance: governance,
                new_governance,
            },
        );

        Ok(())
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    pub fn pending_reward(env: Env, pool_id: u32, account: Address) -> Result<i128, ChiefError> {
        let config = storage::get_config(&env)?;
        let pool = registry::load_pool(&env, pool_id)?;
        let user = supply::load_account(&env, pool_id, &account);

        accumulator::pending(&env, &config, &pool, &user, env.ledger().sequence())
    }

    pub fn deposit_info(env: Env, pool_id: u32, account: Address, index: u32) -> Option<DepositInfo> {
        ledger::load(&env, pool_id, &account).get(index)
    }

    /// Length of the account's deposit log, withdrawn slots included.
    pub fn open_deposit_count(env: Env, pool_id: u32, account: Address) -> u32 {
        ledger::load(&env, pool_id, &account).len()
    }

    pub fn pool_info(env: Env, pool_id: u32) -> Result<PoolInfo, ChiefError> {
        registry::load_pool(&env, pool_id)
    }

    pub fn user_info(env: Env, pool_id: u32, account: Address) -> UserPoolAccount {
        supply::load_account(&env, pool_id, &account)
    }

    /// Live principal the account has in the pool across all deposits.
    pub fn total_staked_in_pool(env: Env, pool_id: u32, account: Address) -> Result<i128, ChiefError> {
        ledger::live_principal(&ledger::load(&env, pool_id, &account))
    }

    pub fn lock_tiers(env: Env, pool_id: u32) -> Result<Vec<LockTier>, ChiefError> {
        registry::load_pool(&env, pool_id).map(|pool| pool.lock_tiers)
    }

    pub fn pool_count(env: Env) -> Result<u32, ChiefError> {
        storage::get_config(&env).map(|config| config.pool_count)
    }

    pub fn get_config(env: Env) -> Result<ChiefConfig, ChiefError> {
        storage::get_config(&env)
    }

    // Internal helper functions
    fn settle(env: &Env, config: &ChiefConfig, pool: &mut PoolInfo, now: u32) -> Result<(), ChiefError> {
        if accumulator::update(env, config, pool, now)? {
            events::publish_pool_updated(
                env,
                PoolUpdatedEvent {
                    pool_id: pool.id,
                    last_update_tick: pool.last_update_tick,
                    virtual_total_supply: pool.virtual_total_supply,
                    reward_per_share: pool.reward_per_share.clone(),
                },
            );
        }
        Ok(())
    }

    fn pay_reward(env: &Env, config: &ChiefConfig, to: &Address, reward: i128) {
        if reward > 0 {
            token::Client::new(env, &config.reward_token).transfer(
                &env.current_contract_address(),
                to,
                &reward,
            );
        }
    }

    /// Call the pool's rewarder, if any. Its failure never reverts the ledger.
    fn notify_rewarder(
        env: &Env,
        pool: &PoolInfo,
        account: &Address,
        recipient: &Address,
        reward: i128,
        new_virtual_amount: i128,
    ) {
        if let Some(rewarder) = &pool.rewarder {
            let outcome = RewarderClient::new(env, rewarder).try_on_reward(
                &pool.id,
                account,
                recipient,
                &reward,
                &new_virtual_amount,
            );
            if !matches!(outcome, Ok(Ok(()))) {
                log!(env, "Rewarder {} failed for pool {}", rewarder.clone(), pool.id);
            }
        }
    }
}
