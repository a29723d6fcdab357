//! Per-pool index of position liquidity keyed by join time.
//!
//! Incentive distribution pays a position only for the time its liquidity has
//! been in the pool, so reward logic needs to know how much of the pool's
//! liquidity joined before or after a given moment. Every position's
//! liquidity sits in the pool's sumtree under the position's join time.

use crate::storage::get_config;
use cl_types::{Dec, Error, Position};
use soroban_sdk::Env;
use sumtree::Sumtree;

fn join_time_index(env: &Env, pool_id: u64) -> Sumtree<'_> {
    Sumtree::new(env, pool_id)
}

/// Move a position's liquidity to `now` after an increase.
///
/// The whole position, old liquidity included, is re-indexed at the new
/// join time.
pub fn reindex_on_increase(
    env: &Env,
    pool_id: u64,
    position: &Position,
    new_liquidity: Dec,
    now: u64,
) -> Result<(), Error> {
    let index = join_time_index(env, pool_id);
    if position.liquidity.is_positive() {
        index.decrease(position.join_time, position.liquidity)?;
    }
    index.increase(now, new_liquidity)
}

/// Withdrawn liquidity leaves the index at the position's existing join time.
pub fn reindex_on_decrease(
    env: &Env,
    pool_id: u64,
    position: &Position,
    liquidity_removed: Dec,
) -> Result<(), Error> {
    join_time_index(env, pool_id).decrease(position.join_time, liquidity_removed)
}

/// Liquidity of positions that joined at or before `join_time`
pub fn liquidity_before_or_at_join_time(
    env: &Env,
    pool_id: u64,
    join_time: u64,
) -> Result<Dec, Error> {
    get_config(env, pool_id)?;
    Ok(join_time_index(env, pool_id).prefix_sum(join_time))
}

/// Liquidity of positions that joined strictly after `join_time`
pub fn liquidity_after_join_time(env: &Env, pool_id: u64, join_time: u64) -> Result<Dec, Error> {
    get_config(env, pool_id)?;
    Ok(match join_time.checked_add(1) {
        Some(after) => join_time_index(env, pool_id).range_sum(after, None),
        None => Dec::ZERO,
    })
}

/// Liquidity of positions whose join time is exactly `join_time`
pub fn liquidity_at_join_time(env: &Env, pool_id: u64, join_time: u64) -> Result<Dec, Error> {
    get_config(env, pool_id)?;
    Ok(join_time_index(env, pool_id).exact_sum(join_time))
}

/// Liquidity indexed across all join times
pub fn total_indexed_liquidity(env: &Env, pool_id: u64) -> Dec {
    join_time_index(env, pool_id).total()
}
