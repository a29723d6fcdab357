#![no_std]

mod events;
mod incentives;
mod invariants;
mod liquidity;
mod storage;
mod swap;
mod tick;

use cl_math::{sqrt_price_to_tick, tick_to_sqrt_price};
use cl_types::{
    max_liquidity_per_tick, tick_bounds, Dec, Error, LiquidityChange, Params, PoolConfig,
    PoolState, Position, PositionKey, SwapResult, TickInfo,
};
use soroban_sdk::{contract, contractimpl, Address, Env};
use storage::{
    get_admin, get_config, get_state, has_admin, has_config, set_admin, set_config, set_state,
};

#[contract]
pub struct ClPool;

#[contractimpl]
impl ClPool {
    /// Initialize the module with its admin and parameters
    pub fn initialize(env: Env, admin: Address, params: Params) -> Result<(), Error> {
        if has_admin(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if !params.is_valid() {
            return Err(Error::InvalidParams);
        }

        set_admin(&env, &admin);
        storage::set_params(&env, &params);
        events::emit_params_set(&env, &params);
        Ok(())
    }

    /// Replace the authorized tick spacings and swap fees (admin only).
    /// Existing pools keep their configuration.
    pub fn set_params(env: Env, params: Params) -> Result<(), Error> {
        let admin = get_admin(&env)?;
        admin.require_auth();

        if !params.is_valid() {
            return Err(Error::InvalidParams);
        }
        storage::set_params(&env, &params);
        events::emit_params_set(&env, &params);
        Ok(())
    }

    pub fn get_params(env: Env) -> Result<Params, Error> {
        storage::get_params(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        get_admin(&env)
    }

    /// Create a pool at `sqrt_price` (admin only).
    ///
    /// The tick spacing and swap fee must both be authorized by the module
    /// params. Tick bounds and the per-tick liquidity cap are derived from
    /// the spacing.
    pub fn initialize_pool(
        env: Env,
        pool_id: u64,
        tick_spacing: i32,
        swap_fee: Dec,
        sqrt_price: Dec,
    ) -> Result<PoolState, Error> {
        let admin = get_admin(&env)?;
        admin.require_auth();

        let params = storage::get_params(&env)?;
        if !params.is_authorized(tick_spacing, swap_fee) {
            return Err(Error::UnauthorizedParam);
        }
        if has_config(&env, pool_id) {
            return Err(Error::PoolAlreadyExists);
        }
        if !sqrt_price.is_positive() {
            return Err(Error::InvalidAmount);
        }

        let (min_tick, max_tick) = tick_bounds(tick_spacing);
        let min_sqrt_price = tick_to_sqrt_price(&env, min_tick)?;
        let max_sqrt_price = tick_to_sqrt_price(&env, max_tick)?;
        // MAX exclusive so the current tick stays below max_tick
        if sqrt_price < min_sqrt_price || sqrt_price >= max_sqrt_price {
            return Err(Error::BoundExceeded);
        }
        let tick = sqrt_price_to_tick(&env, sqrt_price)?;

        let config = PoolConfig {
            tick_spacing,
            swap_fee,
            min_tick,
            max_tick,
            max_liquidity_per_tick: max_liquidity_per_tick(tick_spacing),
        };
        set_config(&env, pool_id, &config);

        let state = PoolState::new(sqrt_price, tick);
        set_state(&env, pool_id, &state);

        events::emit_pool_initialized(&env, pool_id, &state);
        Ok(state)
    }

    /// Add liquidity to the owner's position over [tick_lower, tick_upper]
    pub fn add_liquidity(
        env: Env,
        pool_id: u64,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: Dec,
    ) -> Result<LiquidityChange, Error> {
        owner.require_auth();

        let change =
            liquidity::add_liquidity(&env, pool_id, &owner, tick_lower, tick_upper, liquidity)?;
        events::emit_liquidity_added(&env, pool_id, &owner, tick_lower, tick_upper, &change);
        Ok(change)
    }

    /// Withdraw liquidity from the owner's position over [tick_lower, tick_upper]
    pub fn remove_liquidity(
        env: Env,
        pool_id: u64,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: Dec,
    ) -> Result<LiquidityChange, Error> {
        owner.require_auth();

        let change =
            liquidity::remove_liquidity(&env, pool_id, &owner, tick_lower, tick_upper, liquidity)?;
        events::emit_liquidity_removed(&env, pool_id, &owner, tick_lower, tick_upper, &change);
        Ok(change)
    }

    /// Execute a swap
    ///
    /// `amount_specified > 0` swaps an exact input, `< 0` an exact output.
    pub fn swap(
        env: Env,
        pool_id: u64,
        sender: Address,
        zero_for_one: bool,
        amount_specified: Dec,
        sqrt_price_limit: Option<Dec>,
    ) -> Result<SwapResult, Error> {
        sender.require_auth();

        let result =
            swap::execute_swap(&env, pool_id, zero_for_one, amount_specified, sqrt_price_limit)?;
        events::emit_swap(&env, pool_id, &sender, zero_for_one, &result);
        Ok(result)
    }

    // === View Functions ===

    pub fn get_pool_config(env: Env, pool_id: u64) -> Result<PoolConfig, Error> {
        get_config(&env, pool_id)
    }

    pub fn get_pool_state(env: Env, pool_id: u64) -> Result<PoolState, Error> {
        get_state(&env, pool_id)
    }

    pub fn get_tick(env: Env, pool_id: u64, tick: i32) -> Result<TickInfo, Error> {
        get_config(&env, pool_id)?;
        Ok(storage::get_tick(&env, pool_id, tick))
    }

    pub fn get_position(
        env: Env,
        pool_id: u64,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Position {
        storage::get_position(
            &env,
            &PositionKey {
                pool_id,
                owner,
                tick_lower,
                tick_upper,
            },
        )
    }

    /// Next initialized tick strictly below (`zero_for_one`) or above `from`
    pub fn next_initialized_tick(
        env: Env,
        pool_id: u64,
        from: i32,
        zero_for_one: bool,
    ) -> Result<i32, Error> {
        let config = get_config(&env, pool_id)?;
        Ok(tick::next_initialized_tick(
            &env,
            pool_id,
            &config,
            from,
            zero_for_one,
        ))
    }

    pub fn fee_growth_inside(
        env: Env,
        pool_id: u64,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<(Dec, Dec), Error> {
        let state = get_state(&env, pool_id)?;
        Ok(tick::fee_growth_inside(
            &env, pool_id, &state, tick_lower, tick_upper,
        ))
    }

    // === Join Time Queries ===

    pub fn liquidity_before_or_at_join_time(
        env: Env,
        pool_id: u64,
        join_time: u64,
    ) -> Result<Dec, Error> {
        incentives::liquidity_before_or_at_join_time(&env, pool_id, join_time)
    }

    pub fn liquidity_after_join_time(env: Env, pool_id: u64, join_time: u64) -> Result<Dec, Error> {
        incentives::liquidity_after_join_time(&env, pool_id, join_time)
    }

    pub fn liquidity_at_join_time(env: Env, pool_id: u64, join_time: u64) -> Result<Dec, Error> {
        incentives::liquidity_at_join_time(&env, pool_id, join_time)
    }
}
