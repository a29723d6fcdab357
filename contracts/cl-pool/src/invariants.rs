// ============================================================================
// INVARIANTS
// ============================================================================
//
// Pure predicates over pool, tick and position state. The contract checks
// them with `debug_assert!` on its hot paths and the tests check them after
// every scenario.
//
// 1. PRICE
//    - Price stays within the pool's bound prices
//    - Tick is consistent with sqrt price
//
// 2. LIQUIDITY
//    - Active and per-tick liquidity never go negative
//    - |liquidity_net| <= liquidity_gross on every tick
//
// 3. FEES
//    - Global fee growth never decreases
//    - A step never consumes more than what is left
//
// 4. JOIN TIMES
//    - Liquidity at or before a join time plus liquidity after it is the
//      total liquidity indexed for the pool
//
// ============================================================================

use cl_math::SwapStep;
use cl_types::{Dec, PoolConfig, PoolState, TickInfo};

// ============================================================================
// PRICE INVARIANTS
// ============================================================================

/// Property:
///   min_sqrt_price <= sqrt_price <= max_sqrt_price
pub fn price_in_bounds(state: &PoolState, min_sqrt_price: Dec, max_sqrt_price: Dec) -> bool {
    state.sqrt_price >= min_sqrt_price && state.sqrt_price <= max_sqrt_price
}

/// Property:
///   min_tick - 1 <= tick <= max_tick
///
/// A swap that ends exactly on the lowest bound price has crossed below
/// `min_tick`, so the current tick may sit one below it.
pub fn tick_in_bounds(config: &PoolConfig, state: &PoolState) -> bool {
    state.tick >= config.min_tick - 1 && state.tick <= config.max_tick
}

/// Property:
///   |tick - sqrt_price_to_tick(sqrt_price)| <= 1
///
/// The stored tick may be one below the computed tick after crossing a tick
/// downward and stopping exactly on its price.
pub fn tick_consistent_with_price(tick: i32, computed_tick_from_price: i32) -> bool {
    (tick - computed_tick_from_price).abs() <= 1
}

// ============================================================================
// LIQUIDITY INVARIANTS
// ============================================================================

pub fn liquidity_non_negative(state: &PoolState) -> bool {
    !state.liquidity.is_negative()
}

/// Property:
///   |tick.liquidity_net| <= tick.liquidity_gross
///
/// Every unit of net liquidity was added by some position referencing the
/// tick, and each such position also counts toward gross.
pub fn tick_net_bounded_by_gross(info: &TickInfo) -> bool {
    !info.liquidity_gross.is_negative()
        && info.liquidity_net <= info.liquidity_gross
        && -info.liquidity_net <= info.liquidity_gross
}

pub fn tick_liquidity_bounded(info: &TickInfo, config: &PoolConfig) -> bool {
    info.liquidity_gross <= config.max_liquidity_per_tick
}

/// Property:
///   sum(tick.liquidity_net for all ticks) == 0
///
/// Global over every tick of a pool, so only checked by tests.
#[cfg(test)]
pub fn liquidity_net_sums_to_zero<I>(ticks: I) -> bool
where
    I: IntoIterator<Item = TickInfo>,
{
    ticks
        .into_iter()
        .fold(Dec::ZERO, |acc, info| acc + info.liquidity_net)
        .is_zero()
}

// ============================================================================
// FEE INVARIANTS
// ============================================================================

pub fn fee_growth_monotonic(old_fee_growth: Dec, new_fee_growth: Dec) -> bool {
    new_fee_growth >= old_fee_growth
}

/// Property (exact input):
///   step.amount_in + step.fee_charge <= amount_remaining
/// Property (exact output):
///   step.amount_out <= amount_remaining
pub fn step_within_remaining(step: &SwapStep, amount_remaining: Dec, exact_input: bool) -> bool {
    let non_negative = !step.amount_in.is_negative()
        && !step.amount_out.is_negative()
        && !step.fee_charge.is_negative();
    let bounded = if exact_input {
        step.amount_in + step.fee_charge <= amount_remaining
    } else {
        step.amount_out <= amount_remaining
    };
    non_negative && bounded
}

// ============================================================================
// SWAP INVARIANTS
// ============================================================================

/// Property:
///   - zero_for_one => price does not increase
///   - !zero_for_one => price does not decrease
pub fn swap_direction_consistent(
    zero_for_one: bool,
    sqrt_price_before: Dec,
    sqrt_price_after: Dec,
) -> bool {
    if zero_for_one {
        sqrt_price_after <= sqrt_price_before
    } else {
        sqrt_price_after >= sqrt_price_before
    }
}

pub fn swap_respects_limit(zero_for_one: bool, sqrt_price_after: Dec, sqrt_price_limit: Dec) -> bool {
    if zero_for_one {
        sqrt_price_after >= sqrt_price_limit
    } else {
        sqrt_price_after <= sqrt_price_limit
    }
}

pub fn tick_crossings_bounded(ticks_crossed: u32, max_crossings: u32) -> bool {
    ticks_crossed <= max_crossings
}

// ============================================================================
// POSITION INVARIANTS
// ============================================================================

pub fn tick_on_spacing(tick: i32, tick_spacing: i32) -> bool {
    tick % tick_spacing == 0
}

pub fn tick_range_valid(tick_lower: i32, tick_upper: i32) -> bool {
    tick_lower < tick_upper
}

/// Property:
///   before_or_at(t) + after(t) == total
#[cfg(test)]
pub fn join_time_partition(before_or_at: Dec, after: Dec, total: Dec) -> bool {
    before_or_at + after == total
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_types::{max_liquidity_per_tick, tick_bounds};

    fn dec(value: i128) -> Dec {
        Dec::from_int(value)
    }

    fn config(tick_spacing: i32) -> PoolConfig {
        let (min_tick, max_tick) = tick_bounds(tick_spacing);
        PoolConfig {
            tick_spacing,
            swap_fee: Dec::ZERO,
            min_tick,
            max_tick,
            max_liquidity_per_tick: max_liquidity_per_tick(tick_spacing),
        }
    }

    #[test]
    fn test_price_in_bounds() {
        let state = PoolState::new(dec(1), 0);
        assert!(price_in_bounds(&state, Dec(1), dec(2)));
        assert!(price_in_bounds(&state, dec(1), dec(1)));
        assert!(!price_in_bounds(&state, dec(2), dec(3)));
    }

    #[test]
    fn test_tick_in_bounds_allows_one_below_min() {
        let config = config(10);
        let mut state = PoolState::new(dec(1), config.min_tick - 1);
        assert!(tick_in_bounds(&config, &state));

        state.tick = config.min_tick - 2;
        assert!(!tick_in_bounds(&config, &state));

        state.tick = config.max_tick + 1;
        assert!(!tick_in_bounds(&config, &state));
    }

    #[test]
    fn test_tick_consistent_with_price() {
        assert!(tick_consistent_with_price(99, 100));
        assert!(tick_consistent_with_price(100, 100));
        assert!(!tick_consistent_with_price(98, 100));
    }

    #[test]
    fn test_tick_net_bounded_by_gross() {
        let mut info = TickInfo {
            liquidity_gross: dec(80),
            liquidity_net: dec(-80),
            ..Default::default()
        };
        assert!(tick_net_bounded_by_gross(&info));

        info.liquidity_net = dec(81);
        assert!(!tick_net_bounded_by_gross(&info));
    }

    #[test]
    fn test_liquidity_net_sums_to_zero() {
        let lower = TickInfo {
            liquidity_gross: dec(10),
            liquidity_net: dec(10),
            ..Default::default()
        };
        let upper = TickInfo {
            liquidity_gross: dec(10),
            liquidity_net: dec(-10),
            ..Default::default()
        };
        assert!(liquidity_net_sums_to_zero([lower.clone(), upper]));
        assert!(!liquidity_net_sums_to_zero([lower]));
    }

    #[test]
    fn test_step_within_remaining() {
        let step = SwapStep {
            sqrt_price_next: dec(1),
            amount_in: dec(9),
            amount_out: dec(5),
            fee_charge: dec(1),
        };
        assert!(step_within_remaining(&step, dec(10), true));
        assert!(!step_within_remaining(&step, dec(9), true));
        assert!(step_within_remaining(&step, dec(5), false));
        assert!(!step_within_remaining(&step, dec(4), false));
    }

    #[test]
    fn test_swap_direction_and_limit() {
        assert!(swap_direction_consistent(true, dec(2), dec(1)));
        assert!(!swap_direction_consistent(true, dec(1), dec(2)));
        assert!(swap_direction_consistent(false, dec(1), dec(1)));

        assert!(swap_respects_limit(true, dec(2), dec(2)));
        assert!(!swap_respects_limit(false, dec(3), dec(2)));
    }

    #[test]
    fn test_range_helpers() {
        assert!(tick_on_spacing(-120, 60));
        assert!(!tick_on_spacing(-100, 60));
        assert!(tick_range_valid(-10, 10));
        assert!(!tick_range_valid(10, 10));
        assert!(join_time_partition(dec(3), dec(4), dec(7)));
        assert!(!join_time_partition(dec(3), dec(4), dec(8)));
    }
}
