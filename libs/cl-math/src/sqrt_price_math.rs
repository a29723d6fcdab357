use cl_types::Dec;
use soroban_sdk::{Env, U256};

fn sorted(sqrt_price_a: Dec, sqrt_price_b: Dec) -> (Dec, Dec) {
    if sqrt_price_a > sqrt_price_b {
        (sqrt_price_b, sqrt_price_a)
    } else {
        (sqrt_price_a, sqrt_price_b)
    }
}

/// Calculate amount0 delta for a price move between two sqrt prices
/// delta_x = L * (sqrt_pb - sqrt_pa) / (sqrt_pa * sqrt_pb)
pub fn amount0_delta(
    env: &Env,
    sqrt_price_a: Dec,
    sqrt_price_b: Dec,
    liquidity: Dec,
    round_up: bool,
) -> Dec {
    let (lower, upper) = sorted(sqrt_price_a, sqrt_price_b);
    let diff = upper - lower;

    if round_up {
        liquidity
            .mul_div_ceil(env, diff, upper)
            .div_ceil(env, lower)
    } else {
        liquidity
            .mul_div_floor(env, diff, upper)
            .div_floor(env, lower)
    }
}

/// Calculate amount1 delta for a price move between two sqrt prices
/// delta_y = L * (sqrt_pb - sqrt_pa)
pub fn amount1_delta(
    env: &Env,
    sqrt_price_a: Dec,
    sqrt_price_b: Dec,
    liquidity: Dec,
    round_up: bool,
) -> Dec {
    let (lower, upper) = sorted(sqrt_price_a, sqrt_price_b);

    if round_up {
        liquidity.mul_ceil(env, upper - lower)
    } else {
        liquidity.mul_floor(env, upper - lower)
    }
}

/// [`amount0_delta`] that returns `None` instead of trapping when the amount
/// does not fit.
pub fn checked_amount0_delta(
    env: &Env,
    sqrt_price_a: Dec,
    sqrt_price_b: Dec,
    liquidity: Dec,
    round_up: bool,
) -> Option<Dec> {
    let (lower, upper) = sorted(sqrt_price_a, sqrt_price_b);
    let diff = upper - lower;

    if round_up {
        liquidity
            .checked_mul_div_ceil(env, diff, upper)?
            .checked_div_ceil(env, lower)
    } else {
        liquidity
            .checked_mul_div_floor(env, diff, upper)?
            .checked_div_floor(env, lower)
    }
}

/// [`amount1_delta`] that returns `None` instead of trapping when the amount
/// does not fit.
pub fn checked_amount1_delta(
    env: &Env,
    sqrt_price_a: Dec,
    sqrt_price_b: Dec,
    liquidity: Dec,
    round_up: bool,
) -> Option<Dec> {
    let (lower, upper) = sorted(sqrt_price_a, sqrt_price_b);

    if round_up {
        liquidity.checked_mul_ceil(env, upper - lower)
    } else {
        liquidity.checked_mul_floor(env, upper - lower)
    }
}

fn to_u256(env: &Env, value: Dec) -> U256 {
    U256::from_u128(env, value.raw().unsigned_abs())
}

/// Sqrt price after adding `amount` of token0 (price moves down)
/// sqrt_price_next = L * sqrt_price / (L + amount * sqrt_price)
///
/// Rounded up so the pool never gives away more token1 than it should.
pub fn next_sqrt_price_from_amount0_in_round_up(
    env: &Env,
    sqrt_price: Dec,
    liquidity: Dec,
    amount: Dec,
) -> Dec {
    if amount.is_zero() || liquidity.is_zero() {
        return sqrt_price;
    }
    // amount * sqrt_price may not fit in i128, so the denominator stays in 256 bits
    let scale = to_u256(env, Dec::ONE);
    let liquidity = to_u256(env, liquidity);
    let numerator = liquidity.mul(&to_u256(env, sqrt_price));
    let denominator = liquidity.add(&to_u256(env, amount).mul(&to_u256(env, sqrt_price)).div(&scale));

    let mut next = numerator.div(&denominator);
    if numerator.rem_euclid(&denominator).gt(&U256::from_u32(env, 0)) {
        next = next.add(&U256::from_u32(env, 1));
    }

    // Never above sqrt_price, so it always fits
    next.to_u128()
        .and_then(|raw| i128::try_from(raw).ok())
        .map(Dec)
        .unwrap_or(sqrt_price)
}

/// Sqrt price after removing `amount` of token0 (price moves up)
/// sqrt_price_next = L * sqrt_price / (L - amount * sqrt_price)
///
/// Returns [`Dec::MAX`] when `amount` drains the liquidity or the price does
/// not fit; callers clamp the result to their target.
pub fn next_sqrt_price_from_amount0_out_round_up(
    env: &Env,
    sqrt_price: Dec,
    liquidity: Dec,
    amount: Dec,
) -> Dec {
    if amount.is_zero() {
        return sqrt_price;
    }
    amount
        .checked_mul_ceil(env, sqrt_price)
        .and_then(|product| liquidity.checked_sub(product))
        .and_then(|denominator| liquidity.checked_mul_div_ceil(env, sqrt_price, denominator))
        .unwrap_or(Dec::MAX)
}

/// Sqrt price after adding `amount` of token1 (price moves up)
/// sqrt_price_next = sqrt_price + amount / L
pub fn next_sqrt_price_from_amount1_in_round_down(
    env: &Env,
    sqrt_price: Dec,
    liquidity: Dec,
    amount: Dec,
) -> Dec {
    sqrt_price + amount.div_floor(env, liquidity)
}

/// Sqrt price after removing `amount` of token1 (price moves down)
/// sqrt_price_next = sqrt_price - amount / L
pub fn next_sqrt_price_from_amount1_out_round_down(
    env: &Env,
    sqrt_price: Dec,
    liquidity: Dec,
    amount: Dec,
) -> Dec {
    sqrt_price - amount.div_ceil(env, liquidity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    fn dec(value: i128) -> Dec {
        Dec::from_int(value)
    }

    #[test]
    fn test_amount0_delta_exact() {
        let env = Env::default();
        // 100 * (2 - 1) / (1 * 2) = 50
        assert_eq!(amount0_delta(&env, dec(1), dec(2), dec(100), false), dec(50));
        assert_eq!(amount0_delta(&env, dec(1), dec(2), dec(100), true), dec(50));
    }

    #[test]
    fn test_amount0_delta_order_independent() {
        let env = Env::default();
        let a = Dec::ONE;
        let b = Dec(1_100_000_000_000_000_000);
        assert_eq!(
            amount0_delta(&env, a, b, dec(1_000), false),
            amount0_delta(&env, b, a, dec(1_000), false)
        );
    }

    #[test]
    fn test_amount0_delta_rounding() {
        let env = Env::default();
        // 1 * (3 - 1) / 3 / 1 = 0.666...
        let down = amount0_delta(&env, dec(1), dec(3), dec(1), false);
        let up = amount0_delta(&env, dec(1), dec(3), dec(1), true);
        assert_eq!(down, Dec(666_666_666_666_666_666));
        assert_eq!(up, Dec(666_666_666_666_666_667));
    }

    #[test]
    fn test_amount1_delta() {
        let env = Env::default();
        assert_eq!(amount1_delta(&env, dec(1), dec(2), dec(100), false), dec(100));
        assert_eq!(amount1_delta(&env, dec(2), dec(1), dec(100), true), dec(100));

        // 1e-18 liquidity over a 0.5 move
        let tiny = Dec(1);
        let half = Dec(Dec::SCALE / 2);
        assert_eq!(amount1_delta(&env, Dec::ONE, Dec::ONE + half, tiny, false), Dec::ZERO);
        assert_eq!(amount1_delta(&env, Dec::ONE, Dec::ONE + half, tiny, true), Dec(1));
    }

    #[test]
    fn test_zero_liquidity_moves_nothing() {
        let env = Env::default();
        assert_eq!(amount0_delta(&env, dec(1), dec(2), Dec::ZERO, true), Dec::ZERO);
        assert_eq!(amount1_delta(&env, dec(1), dec(2), Dec::ZERO, true), Dec::ZERO);
    }

    #[test]
    fn test_next_sqrt_price_from_amount0_in() {
        let env = Env::default();
        // 100 * 2 / (100 + 50 * 2) = 1
        let next = next_sqrt_price_from_amount0_in_round_up(&env, dec(2), dec(100), dec(50));
        assert_eq!(next, dec(1));

        // 100 * 2 / 150 = 1.333... rounded up
        let next = next_sqrt_price_from_amount0_in_round_up(&env, dec(2), dec(100), dec(25));
        assert_eq!(next, Dec(1_333_333_333_333_333_334));

        let unchanged = next_sqrt_price_from_amount0_in_round_up(&env, dec(2), dec(100), Dec::ZERO);
        assert_eq!(unchanged, dec(2));
    }

    #[test]
    fn test_next_sqrt_price_from_amount0_out() {
        let env = Env::default();
        // 100 * 1 / (100 - 50 * 1) = 2
        let next = next_sqrt_price_from_amount0_out_round_up(&env, dec(1), dec(100), dec(50));
        assert_eq!(next, dec(2));
    }

    #[test]
    fn test_next_sqrt_price_from_amount1() {
        let env = Env::default();
        let up = next_sqrt_price_from_amount1_in_round_down(&env, dec(1), dec(100), dec(50));
        assert_eq!(up, Dec(1_500_000_000_000_000_000));

        let down = next_sqrt_price_from_amount1_out_round_down(&env, dec(2), dec(100), dec(50));
        assert_eq!(down, Dec(1_500_000_000_000_000_000));

        // 1 / 3 rounds the price down in both directions
        let up = next_sqrt_price_from_amount1_in_round_down(&env, dec(1), dec(3), dec(1));
        assert_eq!(up, Dec(1_333_333_333_333_333_333));
        let down = next_sqrt_price_from_amount1_out_round_down(&env, dec(2), dec(3), dec(1));
        assert_eq!(down, Dec(1_666_666_666_666_666_666));
    }

    #[test]
    fn test_checked_deltas() {
        let env = Env::default();
        assert_eq!(
            checked_amount0_delta(&env, dec(1), dec(3), dec(1), true),
            Some(amount0_delta(&env, dec(1), dec(3), dec(1), true))
        );
        assert_eq!(
            checked_amount1_delta(&env, dec(1), dec(2), dec(100), false),
            Some(dec(100))
        );

        // Full range with L = 1e12: neither side fits in i128
        let liquidity = dec(1_000_000_000_000);
        let max_price = dec(4_000_000_000);
        let min_price = Dec(250_000_000);
        assert_eq!(checked_amount1_delta(&env, dec(1), max_price, liquidity, true), None);
        assert_eq!(checked_amount0_delta(&env, min_price, dec(1), liquidity, true), None);
    }

    #[test]
    fn test_next_sqrt_price_from_amount0_in_large_amount() {
        let env = Env::default();
        // amount * sqrt_price alone overflows i128
        let sqrt_price = dec(4_000_000_000);
        let liquidity = dec(1_000);
        let amount = dec(100_000_000_000_000_000_000);
        let next = next_sqrt_price_from_amount0_in_round_up(&env, sqrt_price, liquidity, amount);
        // 1e3 * 4e9 / (1e3 + 4e29) is about 1e-17
        assert!(next.is_positive());
        assert!(next < Dec(100));
    }

    #[test]
    fn test_next_sqrt_price_from_amount0_out_drained() {
        let env = Env::default();
        // Removing everything the liquidity holds at this price has no finite answer
        let next = next_sqrt_price_from_amount0_out_round_up(&env, dec(1), dec(100), dec(100));
        assert_eq!(next, Dec::MAX);
    }

    #[test]
    fn test_amount_in_then_price_consistent() {
        let env = Env::default();
        // Adding exactly the token0 needed to reach a price lands on that price
        let current = dec(2);
        let target = dec(1);
        let liquidity = dec(100);
        let needed = amount0_delta(&env, target, current, liquidity, true);
        let next = next_sqrt_price_from_amount0_in_round_up(&env, current, liquidity, needed);
        assert_eq!(next, target);
    }
}
