use cl_types::{LiquidityChange, Params, PoolState, SwapResult};
use soroban_sdk::{Address, Env, Symbol};

pub fn emit_params_set(env: &Env, params: &Params) {
    env.events().publish(
        (Symbol::new(env, "params_set"),),
        (
            params.authorized_tick_spacings.clone(),
            params.authorized_swap_fees.clone(),
        ),
    );
}

pub fn emit_pool_initialized(env: &Env, pool_id: u64, state: &PoolState) {
    env.events().publish(
        (Symbol::new(env, "pool_initialized"), pool_id),
        (state.sqrt_price, state.tick),
    );
}

pub fn emit_liquidity_added(
    env: &Env,
    pool_id: u64,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    change: &LiquidityChange,
) {
    env.events().publish(
        (Symbol::new(env, "liquidity_added"), pool_id),
        (
            owner.clone(),
            tick_lower,
            tick_upper,
            change.position.liquidity,
            change.position.join_time,
            change.amount_0,
            change.amount_1,
        ),
    );
}

pub fn emit_liquidity_removed(
    env: &Env,
    pool_id: u64,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    change: &LiquidityChange,
) {
    env.events().publish(
        (Symbol::new(env, "liquidity_removed"), pool_id),
        (
            owner.clone(),
            tick_lower,
            tick_upper,
            change.position.liquidity,
            change.position.join_time,
            change.amount_0,
            change.amount_1,
        ),
    );
}

pub fn emit_swap(env: &Env, pool_id: u64, sender: &Address, zero_for_one: bool, result: &SwapResult) {
    env.events().publish(
        (Symbol::new(env, "swap"), pool_id),
        (
            sender.clone(),
            zero_for_one,
            result.amount_in,
            result.amount_out,
            result.fee_charged,
            result.sqrt_price,
            result.tick,
        ),
    );
}
