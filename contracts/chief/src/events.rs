use soroban_sdk::{contracttype, symbol_short, Address, Env, I256};

// Events

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub account: Address,
    pub pool_id: u32,
    pub index: u32,
    pub amount: i128,
    pub virtual_amount: i128,
    pub multiplier: u32,
    pub unlock_tick: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub account: Address,
    pub pool_id: u32,
    pub index: u32,
    pub amount: i128,
    pub remaining: i128,
    pub to: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestEvent {
    pub account: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub to: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawAllEvent {
    pub account: Address,
    pub pool_id: u32,
    pub principal: i128,
    pub reward: i128,
    pub deposits_closed: u32,
    pub to: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub account: Address,
    pub pool_id: u32,
    pub amount: i128,
    pub forfeited: i128,
    pub to: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub staking_token: Address,
    pub alloc_weight: u32,
    pub rewarder: Option<Address>,
    pub tier_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSetEvent {
    pub pool_id: u32,
    pub alloc_weight: u32,
    pub rewarder: Option<Address>,
    pub overwrite: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockTierSetEvent {
    pub pool_id: u32,
    pub lock_length: u32,
    pub multiplier: u32,
    pub unlocked: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionRateEvent {
    pub old_rate: i128,
    pub new_rate: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolUpdatedEvent {
    pub pool_id: u32,
    pub last_update_tick: u32,
    pub virtual_total_supply: i128,
    pub reward_per_share: I256,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GovernanceChangedEvent {
    pub old_governance: Address,
    pub new_governance: Address,
}

pub fn publish_deposit(env: &Env, event: DepositEvent) {
    env.events()
        .publish((symbol_short!("deposit"), event.pool_id, event.account.clone()), event);
}

pub fn publish_withdraw(env: &Env, event: WithdrawEvent) {
    env.events()
        .publish((symbol_short!("withdraw"), event.pool_id, event.account.clone()), event);
}

pub fn publish_harvest(env: &Env, event: HarvestEvent) {
    env.events()
        .publish((symbol_short!("harvest"), event.pool_id, event.account.clone()), event);
}

pub fn publish_withdraw_all(env: &Env, event: WithdrawAllEvent) {
    env.events()
        .publish((symbol_short!("wd_all"), event.pool_id, event.account.clone()), event);
}

pub fn publish_emergency_withdraw(env: &Env, event: EmergencyWithdrawEvent) {
    env.events()
        .publish((symbol_short!("emerg_wd"), event.pool_id, event.account.clone()), event);
}

pub fn publish_pool_added(env: &Env, event: PoolAddedEvent) {
    env.events().publish((symbol_short!("add_pool"), event.pool_id), event);
}

pub fn publish_pool_set(env: &Env, event: PoolSetEvent) {
    env.events().publish((symbol_short!("set_pool"), event.pool_id), event);
}

pub fn publish_lock_tier_set(env: &Env, event: LockTierSetEvent) {
    env.events().publish((symbol_short!("set_tier"), event.pool_id), event);
}

pub fn publish_emission_rate(env: &Env, event: EmissionRateEvent) {
    env.events().publish((symbol_short!("emission"),), event);
}

pub fn publish_pool_unlocked(env: &Env, pool_id: u32) {
    env.events().publish((symbol_short!("unlock"), pool_id), true);
}

pub fn publish_pool_locked(env: &Env, pool_id: u32) {
    env.events().publish((symbol_short!("lock"), pool_id), true);
}

pub fn publish_rewards_reset(env: &Env, pool_id: u32) {
    env.events().publish((symbol_short!("reset"), pool_id), true);
}

pub fn publish_pool_updated(env: &Env, event: PoolUpdatedEvent) {
    env.events().publish((symbol_short!("upd_pool"), event.pool_id), event);
}

pub fn publish_paused(env: &Env, paused: bool) {
    env.events().publish((symbol_short!("paused"),), paused);
}

pub fn publish_governance_changed(env: &Env, event: GovernanceChangedEvent) {
    env.events().publish((symbol_short!("gov"),), event);
}
