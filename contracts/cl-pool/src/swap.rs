use crate::invariants;
use crate::storage::{get_config, get_state, set_state, MAX_TICK_CROSSINGS_PER_SWAP};
use crate::tick::{cross_tick, next_initialized_tick};
use cl_math::{
    sqrt_price_to_tick, tick_to_sqrt_price, OneForZeroStrategy, SwapStrategy, ZeroForOneStrategy,
};
use cl_types::{Dec, Error, PoolConfig, PoolState, SwapResult};
use soroban_sdk::Env;

/// Execute a swap against a pool.
///
/// A positive `amount_specified` is an exact input, a negative one an exact
/// output. Without a `sqrt_price_limit` the swap may run to the pool's bound
/// price in its direction.
///
/// Note: The number of initialized ticks crossed per swap is capped to stay
/// within Soroban's write entry limit. A swap that hits the cap is partially
/// filled and the rest can be swapped in a subsequent transaction.
pub fn execute_swap(
    env: &Env,
    pool_id: u64,
    zero_for_one: bool,
    amount_specified: Dec,
    sqrt_price_limit: Option<Dec>,
) -> Result<SwapResult, Error> {
    if amount_specified.is_zero() {
        return Err(Error::InvalidAmount);
    }

    let config = get_config(env, pool_id)?;
    let state = get_state(env, pool_id)?;
    let min_sqrt_price = tick_to_sqrt_price(env, config.min_tick)?;
    let max_sqrt_price = tick_to_sqrt_price(env, config.max_tick)?;

    let swap = Swap {
        env,
        pool_id,
        config: &config,
        min_sqrt_price,
        max_sqrt_price,
    };
    if zero_for_one {
        let strategy = ZeroForOneStrategy {
            sqrt_price_limit: sqrt_price_limit.unwrap_or(min_sqrt_price),
            swap_fee: config.swap_fee,
        };
        swap.run(state, &strategy, amount_specified)
    } else {
        let strategy = OneForZeroStrategy {
            sqrt_price_limit: sqrt_price_limit.unwrap_or(max_sqrt_price),
            swap_fee: config.swap_fee,
        };
        swap.run(state, &strategy, amount_specified)
    }
}

struct Swap<'a> {
    env: &'a Env,
    pool_id: u64,
    config: &'a PoolConfig,
    min_sqrt_price: Dec,
    max_sqrt_price: Dec,
}

impl Swap<'_> {
    fn run<S: SwapStrategy>(
        &self,
        mut state: PoolState,
        strategy: &S,
        amount_specified: Dec,
    ) -> Result<SwapResult, Error> {
        let env = self.env;
        let zero_for_one = strategy.zero_for_one();
        strategy.validate_price_limit(state.sqrt_price, self.min_sqrt_price, self.max_sqrt_price)?;

        let exact_input = amount_specified.is_positive();

        // Swap state
        let mut amount_remaining = if exact_input {
            amount_specified
        } else {
            -amount_specified
        };
        let mut amount_in = Dec::ZERO;
        let mut amount_out = Dec::ZERO;
        let mut fee_charged = Dec::ZERO;
        let mut sqrt_price = state.sqrt_price;
        let mut tick = state.tick;
        let mut liquidity = state.liquidity;
        let fee_growth_before = if zero_for_one {
            state.fee_growth_global_0
        } else {
            state.fee_growth_global_1
        };
        let mut fee_growth_global = fee_growth_before;

        let mut tick_crossings: u32 = 0;

        // Stops if we run out of amount, hit the price limit, or exceed the tick crossing limit
        while amount_remaining.is_positive()
            && sqrt_price != strategy.sqrt_price_limit()
            && tick_crossings < MAX_TICK_CROSSINGS_PER_SWAP
        {
            let tick_next = next_initialized_tick(
                env,
                self.pool_id,
                self.config,
                strategy.search_start(tick),
                zero_for_one,
            );
            let sqrt_price_next_tick = tick_to_sqrt_price(env, tick_next)?;
            let sqrt_price_target = strategy.sqrt_target_price(sqrt_price_next_tick);

            let step = if exact_input {
                strategy.compute_swap_step_out_given_in(
                    env,
                    sqrt_price,
                    sqrt_price_target,
                    liquidity,
                    amount_remaining,
                )
            } else {
                strategy.compute_swap_step_in_given_out(
                    env,
                    sqrt_price,
                    sqrt_price_target,
                    liquidity,
                    amount_remaining,
                )
            };
            debug_assert!(invariants::step_within_remaining(
                &step,
                amount_remaining,
                exact_input
            ));

            // An exact-output step saturates its input when the price move
            // cannot be paid for in a Dec
            let step_amount_in = step
                .amount_in
                .checked_add(step.fee_charge)
                .filter(|amount| *amount < Dec::MAX)
                .ok_or(Error::BoundExceeded)?;
            if exact_input {
                amount_remaining -= step_amount_in;
            } else {
                amount_remaining -= step.amount_out;
            }
            amount_in = amount_in
                .checked_add(step_amount_in)
                .ok_or(Error::BoundExceeded)?;
            amount_out += step.amount_out;
            fee_charged += step.fee_charge;

            if liquidity.is_positive() {
                fee_growth_global += step.fee_charge.div_floor(env, liquidity);
            }

            let sqrt_price_start = sqrt_price;
            sqrt_price = step.sqrt_price_next;

            if sqrt_price == sqrt_price_next_tick {
                let (fee_growth_global_0, fee_growth_global_1) = if zero_for_one {
                    (fee_growth_global, state.fee_growth_global_1)
                } else {
                    (state.fee_growth_global_0, fee_growth_global)
                };
                let crossed = cross_tick(
                    env,
                    self.pool_id,
                    tick_next,
                    strategy,
                    &mut liquidity,
                    fee_growth_global_0,
                    fee_growth_global_1,
                )?;
                if crossed {
                    tick_crossings += 1;
                }
                tick = strategy.tick_after_cross(tick_next);
            } else if sqrt_price != sqrt_price_start {
                // Price moved but did not reach the next tick
                tick = sqrt_price_to_tick(env, sqrt_price)?;
            }

            if sqrt_price != sqrt_price_target {
                // Stopping short of the target means the remaining amount is
                // exhausted up to rounding
                break;
            }
        }

        debug_assert!(invariants::swap_direction_consistent(
            zero_for_one,
            state.sqrt_price,
            sqrt_price
        ));
        debug_assert!(invariants::swap_respects_limit(
            zero_for_one,
            sqrt_price,
            strategy.sqrt_price_limit()
        ));
        debug_assert!(invariants::fee_growth_monotonic(
            fee_growth_before,
            fee_growth_global
        ));
        debug_assert!(invariants::tick_crossings_bounded(
            tick_crossings,
            MAX_TICK_CROSSINGS_PER_SWAP
        ));

        state.sqrt_price = sqrt_price;
        state.tick = tick;
        state.liquidity = liquidity;
        if zero_for_one {
            state.fee_growth_global_0 = fee_growth_global;
        } else {
            state.fee_growth_global_1 = fee_growth_global;
        }
        debug_assert!(invariants::tick_in_bounds(self.config, &state));
        debug_assert!(invariants::price_in_bounds(
            &state,
            self.min_sqrt_price,
            self.max_sqrt_price
        ));
        debug_assert!(sqrt_price_to_tick(env, sqrt_price)
            .map(|computed| invariants::tick_consistent_with_price(tick, computed))
            .unwrap_or(false));
        debug_assert!(invariants::liquidity_non_negative(&state));

        set_state(env, self.pool_id, &state);

        Ok(SwapResult {
            amount_in,
            amount_out,
            fee_charged,
            sqrt_price,
            tick,
            liquidity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquidity::add_liquidity;
    use crate::storage::{get_tick, set_config, set_state};
    use cl_types::{max_liquidity_per_tick, tick_bounds};
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::Address;

    const POOL: u64 = 1;

    fn with_contract<F, R>(env: &Env, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let contract_id = env.register(crate::ClPool, ());
        env.as_contract(&contract_id, f)
    }

    fn create_pool(env: &Env, swap_fee: Dec) -> PoolConfig {
        let (min_tick, max_tick) = tick_bounds(10);
        let config = PoolConfig {
            tick_spacing: 10,
            swap_fee,
            min_tick,
            max_tick,
            max_liquidity_per_tick: max_liquidity_per_tick(10),
        };
        set_config(env, POOL, &config);
        set_state(env, POOL, &PoolState::new(Dec::ONE, 0));
        config
    }

    fn dec(value: i128) -> Dec {
        Dec::from_int(value)
    }

    fn price(env: &Env, tick: i32) -> Dec {
        tick_to_sqrt_price(env, tick).unwrap()
    }

    /// A = [-100, 100] with 1000, B = [100, 200] with 500
    fn two_ranges(env: &Env, owner: &Address) {
        add_liquidity(env, POOL, owner, -100, 100, dec(1_000)).unwrap();
        add_liquidity(env, POOL, owner, 100, 200, dec(500)).unwrap();
    }

    #[test]
    fn test_swap_crosses_tick_both_ways() {
        let env = Env::default();
        let owner = Address::generate(&env);
        with_contract(&env, || {
            create_pool(&env, Dec::ZERO);
            two_ranges(&env, &owner);
            assert_eq!(get_state(&env, POOL).unwrap().liquidity, dec(1_000));

            let up = execute_swap(&env, POOL, false, dec(1_000_000), Some(price(&env, 150))).unwrap();
            assert_eq!(up.sqrt_price, price(&env, 150));
            assert_eq!(up.tick, 150);
            assert_eq!(up.liquidity, dec(500));
            assert!(up.amount_in.is_positive() && up.amount_out.is_positive());
            // Tick 100 was crossed upward
            assert_eq!(get_tick(&env, POOL, 100).liquidity_net, dec(-500));

            let down = execute_swap(&env, POOL, true, dec(1_000_000), Some(price(&env, -50))).unwrap();
            assert_eq!(down.sqrt_price, price(&env, -50));
            assert_eq!(down.tick, -50);
            assert_eq!(down.liquidity, dec(1_000));

            let state = get_state(&env, POOL).unwrap();
            assert_eq!(state.tick, -50);
            assert_eq!(state.liquidity, dec(1_000));
        });
    }

    #[test]
    fn test_exact_input_is_fully_consumed_within_range() {
        let env = Env::default();
        let owner = Address::generate(&env);
        with_contract(&env, || {
            create_pool(&env, Dec(3_000_000_000_000_000));
            two_ranges(&env, &owner);

            let result = execute_swap(&env, POOL, true, dec(1), None).unwrap();
            assert_eq!(result.amount_in, dec(1));
            assert!(result.fee_charged.is_positive());
            assert!(result.amount_out.is_positive() && result.amount_out < dec(1));
            assert!(result.sqrt_price < Dec::ONE);
            // Nowhere near the lower end of the range
            assert!(result.tick < 0 && result.tick > -100);
            assert_eq!(result.liquidity, dec(1_000));

            let state = get_state(&env, POOL).unwrap();
            assert!(state.fee_growth_global_0.is_positive());
            assert_eq!(state.fee_growth_global_1, Dec::ZERO);
        });
    }

    #[test]
    fn test_exact_output() {
        let env = Env::default();
        let owner = Address::generate(&env);
        with_contract(&env, || {
            create_pool(&env, Dec::ZERO);
            two_ranges(&env, &owner);

            let wanted = dec(2);
            let result = execute_swap(&env, POOL, false, -wanted, None).unwrap();
            assert!(result.amount_out <= wanted);
            assert!(wanted - result.amount_out <= Dec(10));
            assert!(result.amount_in > result.amount_out);
            assert!(result.sqrt_price > Dec::ONE);
        });
    }

    #[test]
    fn test_swap_runs_to_bound_without_liquidity() {
        let env = Env::default();
        with_contract(&env, || {
            let config = create_pool(&env, Dec::ZERO);

            let result = execute_swap(&env, POOL, false, dec(5), None).unwrap();
            assert_eq!(result.amount_in, Dec::ZERO);
            assert_eq!(result.amount_out, Dec::ZERO);
            assert_eq!(result.sqrt_price, price(&env, config.max_tick));
            assert_eq!(result.tick, config.max_tick);
        });
    }

    #[test]
    fn test_fee_growth_credits_active_liquidity() {
        let env = Env::default();
        let owner = Address::generate(&env);
        with_contract(&env, || {
            create_pool(&env, Dec(10_000_000_000_000_000));
            add_liquidity(&env, POOL, &owner, -1_000, 1_000, dec(1_000)).unwrap();

            let result = execute_swap(&env, POOL, false, dec(10), None).unwrap();
            let state = get_state(&env, POOL).unwrap();
            assert!(result.fee_charged.is_positive());
            assert_eq!(
                state.fee_growth_global_1,
                result.fee_charged.div_floor(&env, dec(1_000))
            );

            let (inside_0, inside_1) =
                crate::tick::fee_growth_inside(&env, POOL, &state, -1_000, 1_000);
            assert_eq!(inside_0, Dec::ZERO);
            assert_eq!(inside_1, state.fee_growth_global_1);
        });
    }

    #[test]
    fn test_swap_against_large_full_range_position() {
        let env = Env::default();
        let owner = Address::generate(&env);
        with_contract(&env, || {
            let config = create_pool(&env, Dec(3_000_000_000_000_000));
            // Reaching either bound would take more than a Dec can hold
            let liquidity = dec(1_000_000_000_000);
            add_liquidity(&env, POOL, &owner, config.min_tick, config.max_tick, liquidity).unwrap();

            let up = execute_swap(&env, POOL, false, dec(1), None).unwrap();
            assert_eq!(up.amount_in, dec(1));
            assert!(up.amount_out.is_positive() && up.amount_out < dec(1));
            assert!(up.sqrt_price > Dec::ONE);
            assert_eq!(up.tick, 0);
            assert_eq!(up.liquidity, liquidity);

            let down = execute_swap(&env, POOL, true, dec(2), None).unwrap();
            assert_eq!(down.amount_in, dec(2));
            assert!(down.amount_out.is_positive() && down.amount_out < dec(2));
            assert!(down.sqrt_price < Dec::ONE);
            assert_eq!(down.tick, -1);
            assert_eq!(down.liquidity, liquidity);

            let out = execute_swap(&env, POOL, false, -dec(1), None).unwrap();
            assert!(out.amount_out <= dec(1) && dec(1) - out.amount_out <= Dec(10));
            assert!(out.amount_in > Dec::ZERO && out.amount_in < dec(2));
        });
    }

    #[test]
    fn test_exact_output_beyond_representable_input_fails() {
        let env = Env::default();
        let owner = Address::generate(&env);
        with_contract(&env, || {
            let config = create_pool(&env, Dec::ZERO);
            let liquidity = dec(1_000_000_000_000);
            add_liquidity(&env, POOL, &owner, config.min_tick, config.max_tick, liquidity).unwrap();
            let before = get_state(&env, POOL).unwrap();

            // Draining all token1 needs more token0 than a Dec can hold
            assert_eq!(
                execute_swap(&env, POOL, true, -liquidity, None),
                Err(Error::BoundExceeded)
            );
            assert_eq!(get_state(&env, POOL).unwrap(), before);
        });
    }

    #[test]
    fn test_swap_rejections() {
        let env = Env::default();
        with_contract(&env, || {
            let config = create_pool(&env, Dec::ZERO);

            assert_eq!(
                execute_swap(&env, POOL, true, Dec::ZERO, None),
                Err(Error::InvalidAmount)
            );
            // Limit on the wrong side of the current price
            assert_eq!(
                execute_swap(&env, POOL, true, dec(1), Some(dec(2))),
                Err(Error::BoundExceeded)
            );
            assert_eq!(
                execute_swap(&env, POOL, false, dec(1), Some(Dec(1))),
                Err(Error::BoundExceeded)
            );
            // Limit beyond the pool bound
            let past_max = price(&env, config.max_tick) + Dec(1);
            assert_eq!(
                execute_swap(&env, POOL, false, dec(1), Some(past_max)),
                Err(Error::BoundExceeded)
            );
            assert_eq!(
                execute_swap(&env, 9, false, dec(1), None),
                Err(Error::PoolNotFound)
            );
            assert_eq!(get_state(&env, POOL).unwrap(), PoolState::new(Dec::ONE, 0));
        });
    }
}
