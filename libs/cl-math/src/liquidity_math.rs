use crate::sqrt_price_math::{amount0_delta, amount1_delta};
use cl_types::{Dec, Error};
use soroban_sdk::Env;

/// Add signed liquidity delta to a non-negative liquidity counter
pub fn add_delta(liquidity: Dec, delta: Dec) -> Result<Dec, Error> {
    let result = liquidity.checked_add(delta).ok_or(Error::InvalidLiquidity)?;
    if result.is_negative() {
        return Err(Error::InvalidLiquidity);
    }
    Ok(result)
}

/// Token amounts backing `liquidity` over [sqrt_price_a, sqrt_price_b] at the
/// current price.
///
/// Deposits round up and withdrawals round down.
pub fn amounts_for_liquidity(
    env: &Env,
    sqrt_price: Dec,
    sqrt_price_a: Dec,
    sqrt_price_b: Dec,
    liquidity: Dec,
    round_up: bool,
) -> (Dec, Dec) {
    let (lower, upper) = if sqrt_price_a > sqrt_price_b {
        (sqrt_price_b, sqrt_price_a)
    } else {
        (sqrt_price_a, sqrt_price_b)
    };

    if sqrt_price <= lower {
        // Below range - all token0
        (amount0_delta(env, lower, upper, liquidity, round_up), Dec::ZERO)
    } else if sqrt_price < upper {
        (
            amount0_delta(env, sqrt_price, upper, liquidity, round_up),
            amount1_delta(env, lower, sqrt_price, liquidity, round_up),
        )
    } else {
        // Above range - all token1
        (Dec::ZERO, amount1_delta(env, lower, upper, liquidity, round_up))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    #[test]
    fn test_add_delta() {
        let l = Dec::from_int(100);
        assert_eq!(add_delta(l, Dec::from_int(50)), Ok(Dec::from_int(150)));
        assert_eq!(add_delta(l, Dec::from_int(-100)), Ok(Dec::ZERO));
        assert_eq!(add_delta(l, Dec::from_int(-101)), Err(Error::InvalidLiquidity));
        assert_eq!(add_delta(Dec(i128::MAX), Dec(1)), Err(Error::InvalidLiquidity));
    }

    #[test]
    fn test_amounts_below_range() {
        let env = Env::default();
        let (a0, a1) = amounts_for_liquidity(
            &env,
            Dec::ONE,
            Dec::from_int(1),
            Dec::from_int(2),
            Dec::from_int(100),
            true,
        );
        assert_eq!(a0, Dec::from_int(50));
        assert_eq!(a1, Dec::ZERO);
    }

    #[test]
    fn test_amounts_above_range() {
        let env = Env::default();
        let (a0, a1) = amounts_for_liquidity(
            &env,
            Dec::from_int(3),
            Dec::from_int(1),
            Dec::from_int(2),
            Dec::from_int(100),
            false,
        );
        assert_eq!(a0, Dec::ZERO);
        assert_eq!(a1, Dec::from_int(100));
    }

    #[test]
    fn test_amounts_in_range() {
        let env = Env::default();
        // price 2 inside [1, 4]: amount0 = 100 * 2 / 8, amount1 = 100 * 1
        let (a0, a1) = amounts_for_liquidity(
            &env,
            Dec::from_int(2),
            Dec::from_int(4),
            Dec::from_int(1),
            Dec::from_int(100),
            false,
        );
        assert_eq!(a0, Dec::from_int(25));
        assert_eq!(a1, Dec::from_int(100));
    }

    #[test]
    fn test_amounts_round_up_covers_round_down() {
        let env = Env::default();
        let sqrt_price = Dec(1_234_567_890_123_456_789);
        let lower = Dec::ONE;
        let upper = Dec(1_700_000_000_000_000_000);
        let liquidity = Dec::from_int(777);
        let (up0, up1) = amounts_for_liquidity(&env, sqrt_price, lower, upper, liquidity, true);
        let (down0, down1) = amounts_for_liquidity(&env, sqrt_price, lower, upper, liquidity, false);
        assert!(up0 >= down0 && up0 - down0 <= Dec(2));
        assert!(up1 >= down1 && up1 - down1 <= Dec(1));
    }
}
