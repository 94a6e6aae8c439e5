use soroban_sdk::{contracttype, Address, Env};

use crate::ChiefError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChiefConfig {
    pub governance: Address,
    pub reward_token: Address,
    pub emission_per_tick: i128,
    pub total_alloc_weight: u64, // Sum of every pool's allocation weight
    pub pool_count: u32,
    pub paused: bool,
}

// Storage Keys
#[contracttype]
pub enum DataKey {
    Config,
    Pool(u32),
    PoolByToken(Address),
    UserPool(u32, Address),
    Deposits(u32, Address), // Whole deposit log of an account in a pool
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<ChiefConfig, ChiefError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(ChiefError::NotInitialized)
}

pub fn set_config(env: &Env, config: &ChiefConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

/// Load the config and check that `governance` is the stored governance identity.
pub fn require_governance(env: &Env, governance: &Address) -> Result<ChiefConfig, ChiefError> {
    governance.require_auth();

    let config = get_config(env)?;
    if config.governance != *governance {
        return Err(ChiefError::Unauthorized);
    }
    Ok(config)
}
