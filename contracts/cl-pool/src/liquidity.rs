use crate::incentives::{reindex_on_decrease, reindex_on_increase};
use crate::invariants;
use crate::storage::{get_config, get_position, get_state, set_position, set_state};
use crate::tick::{check_update, update_tick};
use cl_math::{add_delta, amounts_for_liquidity, tick_to_sqrt_price};
use cl_types::{Dec, Error, LiquidityChange, PoolConfig, PoolState, PositionKey};
use soroban_sdk::{Address, Env};

/// Add liquidity to a position, creating it if needed.
///
/// The position's join time moves to the current ledger timestamp and its
/// whole liquidity is re-indexed there. Nothing is written unless every check
/// passes.
pub fn add_liquidity(
    env: &Env,
    pool_id: u64,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: Dec,
) -> Result<LiquidityChange, Error> {
    let config = get_config(env, pool_id)?;
    validate_ticks(&config, tick_lower, tick_upper)?;
    if !liquidity.is_positive() {
        return Err(Error::InvalidLiquidity);
    }
    let mut state = get_state(env, pool_id)?;

    let key = PositionKey {
        pool_id,
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let mut position = get_position(env, &key);
    let new_liquidity = position
        .liquidity
        .checked_add(liquidity)
        .ok_or(Error::InvalidLiquidity)?;

    check_update(env, pool_id, &config, tick_lower, liquidity)?;
    check_update(env, pool_id, &config, tick_upper, liquidity)?;
    let in_range = is_in_range(&state, tick_lower, tick_upper);
    let active_liquidity = if in_range {
        add_delta(state.liquidity, liquidity)?
    } else {
        state.liquidity
    };

    let now = env.ledger().timestamp();
    reindex_on_increase(env, pool_id, &position, new_liquidity, now)?;

    update_tick(env, pool_id, &config, &state, tick_lower, liquidity, false)?;
    update_tick(env, pool_id, &config, &state, tick_upper, liquidity, true)?;

    if in_range {
        state.liquidity = active_liquidity;
        set_state(env, pool_id, &state);
    }

    position.liquidity = new_liquidity;
    position.join_time = now;
    set_position(env, &key, &position);

    // Deposits round up
    let (amount_0, amount_1) =
        amounts_for_range(env, &state, tick_lower, tick_upper, liquidity, true)?;

    Ok(LiquidityChange {
        position,
        amount_0,
        amount_1,
    })
}

/// Withdraw liquidity from a position.
///
/// The join time is left untouched. A position withdrawn to zero is deleted.
pub fn remove_liquidity(
    env: &Env,
    pool_id: u64,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: Dec,
) -> Result<LiquidityChange, Error> {
    let config = get_config(env, pool_id)?;
    validate_ticks(&config, tick_lower, tick_upper)?;
    if !liquidity.is_positive() {
        return Err(Error::InvalidLiquidity);
    }
    let mut state = get_state(env, pool_id)?;

    let key = PositionKey {
        pool_id,
        owner: owner.clone(),
        tick_lower,
        tick_upper,
    };
    let mut position = get_position(env, &key);
    if liquidity > position.liquidity {
        return Err(Error::InsufficientLiquidity);
    }

    let delta = -liquidity;
    check_update(env, pool_id, &config, tick_lower, delta)?;
    check_update(env, pool_id, &config, tick_upper, delta)?;
    let in_range = is_in_range(&state, tick_lower, tick_upper);
    let active_liquidity = if in_range {
        add_delta(state.liquidity, delta)?
    } else {
        state.liquidity
    };

    reindex_on_decrease(env, pool_id, &position, liquidity)?;

    update_tick(env, pool_id, &config, &state, tick_lower, delta, false)?;
    update_tick(env, pool_id, &config, &state, tick_upper, delta, true)?;

    if in_range {
        state.liquidity = active_liquidity;
        set_state(env, pool_id, &state);
    }
    debug_assert!(invariants::liquidity_non_negative(&state));

    position.liquidity -= liquidity;
    set_position(env, &key, &position);

    // Withdrawals round down
    let (amount_0, amount_1) =
        amounts_for_range(env, &state, tick_lower, tick_upper, liquidity, false)?;

    Ok(LiquidityChange {
        position,
        amount_0,
        amount_1,
    })
}

fn validate_ticks(config: &PoolConfig, tick_lower: i32, tick_upper: i32) -> Result<(), Error> {
    if !invariants::tick_range_valid(tick_lower, tick_upper)
        || tick_lower < config.min_tick
        || tick_upper > config.max_tick
        || !invariants::tick_on_spacing(tick_lower, config.tick_spacing)
        || !invariants::tick_on_spacing(tick_upper, config.tick_spacing)
    {
        return Err(Error::InvalidRange);
    }
    Ok(())
}

fn is_in_range(state: &PoolState, tick_lower: i32, tick_upper: i32) -> bool {
    state.tick >= tick_lower && state.tick < tick_upper
}

fn amounts_for_range(
    env: &Env,
    state: &PoolState,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: Dec,
    round_up: bool,
) -> Result<(Dec, Dec), Error> {
    let sqrt_price_lower = tick_to_sqrt_price(env, tick_lower)?;
    let sqrt_price_upper = tick_to_sqrt_price(env, tick_upper)?;
    Ok(amounts_for_liquidity(
        env,
        state.sqrt_price,
        sqrt_price_lower,
        sqrt_price_upper,
        liquidity,
        round_up,
    ))
}
