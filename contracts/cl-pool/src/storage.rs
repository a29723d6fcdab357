use cl_types::{Error, Params, PoolConfig, PoolState, Position, PositionKey, TickInfo};
use soroban_sdk::{contracttype, Address, Env};

// ============================================================================
// SOROBAN RESOURCE LIMITS
// ============================================================================
// - Write entries per tx: 50 entries / 132 KB
// - Read entries per tx: 100 entries / 200 KB
//
// Every pool lives under its own pool id, so ticks, bitmap words, positions
// and sumtree nodes of different pools never share a key.
//
// Swap: each tick crossing rewrites one tick entry.
// Add liquidity: 2 ticks, up to 2 bitmap words and 2 summary words, the
// position, the pool state, and one sumtree path per join time touched
// (16 nodes each, shared upper levels count once).
// ============================================================================

/// Maximum number of initialized tick crossings per swap.
/// A swap that hits the cap is partially filled.
pub const MAX_TICK_CROSSINGS_PER_SWAP: u32 = 40;

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Module admin (Instance storage)
    Admin,
    /// Module parameters (Instance storage)
    Params,
    /// pool_id -> PoolConfig (Persistent storage)
    Config(u64),
    /// pool_id -> PoolState (Persistent storage)
    State(u64),
    /// (pool_id, tick) -> TickInfo (Persistent storage)
    Tick(u64, i32),
    /// (pool_id, word_position) -> u128 bitmap of initialized ticks
    TickBitmap(u64, i32),
    /// (pool_id, summary_position) -> u128 bitmap of non-empty bitmap words
    TickBitmapSummary(u64, i32),
    /// PositionKey -> Position (Persistent storage)
    Position(PositionKey),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Admin & Params ===

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    extend_instance_ttl(env);
}

pub fn get_params(env: &Env) -> Result<Params, Error> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Params)
        .ok_or(Error::NotInitialized)
}

pub fn set_params(env: &Env, params: &Params) {
    env.storage().instance().set(&DataKey::Params, params);
    extend_instance_ttl(env);
}

// === Config ===

pub fn has_config(env: &Env, pool_id: u64) -> bool {
    env.storage().persistent().has(&DataKey::Config(pool_id))
}

pub fn get_config(env: &Env, pool_id: u64) -> Result<PoolConfig, Error> {
    let key = DataKey::Config(pool_id);
    let config = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::PoolNotFound)?;
    extend_persistent_ttl(env, &key);
    Ok(config)
}

pub fn set_config(env: &Env, pool_id: u64, config: &PoolConfig) {
    let key = DataKey::Config(pool_id);
    env.storage().persistent().set(&key, config);
    extend_persistent_ttl(env, &key);
}

// === State ===

pub fn get_state(env: &Env, pool_id: u64) -> Result<PoolState, Error> {
    let key = DataKey::State(pool_id);
    let state = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::PoolNotFound)?;
    extend_persistent_ttl(env, &key);
    Ok(state)
}

pub fn set_state(env: &Env, pool_id: u64, state: &PoolState) {
    let key = DataKey::State(pool_id);
    env.storage().persistent().set(&key, state);
    extend_persistent_ttl(env, &key);
}

// === Tick ===

pub fn get_tick(env: &Env, pool_id: u64, tick: i32) -> TickInfo {
    let key = DataKey::Tick(pool_id, tick);
    env.storage()
        .persistent()
        .get(&key)
        .unwrap_or_default()
}

pub fn set_tick(env: &Env, pool_id: u64, tick: i32, info: &TickInfo) {
    let key = DataKey::Tick(pool_id, tick);
    if !info.is_initialized() {
        // Remove unreferenced tick
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, info);
        extend_persistent_ttl(env, &key);
    }
}

pub fn has_tick(env: &Env, pool_id: u64, tick: i32) -> bool {
    env.storage().persistent().has(&DataKey::Tick(pool_id, tick))
}

// === Tick Bitmap ===

pub fn get_tick_bitmap_word(env: &Env, pool_id: u64, word_pos: i32) -> u128 {
    let key = DataKey::TickBitmap(pool_id, word_pos);
    env.storage().persistent().get(&key).unwrap_or(0u128)
}

pub fn set_tick_bitmap_word(env: &Env, pool_id: u64, word_pos: i32, bitmap: u128) {
    set_bitmap(env, DataKey::TickBitmap(pool_id, word_pos), bitmap);
}

pub fn get_tick_bitmap_summary(env: &Env, pool_id: u64, summary_pos: i32) -> u128 {
    let key = DataKey::TickBitmapSummary(pool_id, summary_pos);
    env.storage().persistent().get(&key).unwrap_or(0u128)
}

pub fn set_tick_bitmap_summary(env: &Env, pool_id: u64, summary_pos: i32, bitmap: u128) {
    set_bitmap(env, DataKey::TickBitmapSummary(pool_id, summary_pos), bitmap);
}

fn set_bitmap(env: &Env, key: DataKey, bitmap: u128) {
    if bitmap == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &bitmap);
        extend_persistent_ttl(env, &key);
    }
}

// === Position ===

pub fn get_position(env: &Env, key: &PositionKey) -> Position {
    let data_key = DataKey::Position(key.clone());
    env.storage()
        .persistent()
        .get(&data_key)
        .unwrap_or_default()
}

pub fn set_position(env: &Env, key: &PositionKey, position: &Position) {
    let data_key = DataKey::Position(key.clone());
    if position.liquidity.is_zero() {
        // Remove empty position
        env.storage().persistent().remove(&data_key);
    } else {
        env.storage().persistent().set(&data_key, position);
        extend_persistent_ttl(env, &data_key);
    }
}
