use cl_types::{Dec, Error, MAX_TICK, MIN_TICK};
use soroban_sdk::{Env, U256};

// Q128 constant: 2^128 represented as U256
fn q128(env: &Env) -> U256 {
    U256::from_u128(env, 1u128 << 64).mul(&U256::from_u128(env, 1u128 << 64))
}

// sqrt(1.0001^-(2^i)) in Q128, i = 0..=18
const SQRT_RATIO_CONSTANTS: [u128; 19] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
];

/// sqrt(1.0001^tick) as a decimal.
///
/// The ratio for `-|tick|` is built in Q128 by multiplying the precomputed
/// constant for every set bit of `|tick|`, then rescaled to 18 decimals
/// (inverted first for positive ticks). Both conversions truncate.
pub fn tick_to_sqrt_price(env: &Env, tick: i32) -> Result<Dec, Error> {
    if tick < MIN_TICK || tick > MAX_TICK {
        return Err(Error::InvalidRange);
    }

    let abs_tick = tick.unsigned_abs();
    let q128 = q128(env);

    let mut ratio = q128.clone();
    for (bit, constant) in SQRT_RATIO_CONSTANTS.iter().enumerate() {
        if abs_tick & (1 << bit) != 0 {
            ratio = ratio.mul(&U256::from_u128(env, *constant)).div(&q128);
        }
    }

    let scale = U256::from_u128(env, Dec::SCALE as u128);
    let raw = if tick > 0 {
        scale.mul(&q128).div(&ratio)
    } else {
        ratio.mul(&scale).div(&q128)
    };

    raw.to_u128()
        .and_then(|r| i128::try_from(r).ok())
        .map(Dec)
        .ok_or(Error::BoundExceeded)
}

/// Greatest tick whose sqrt price is <= `sqrt_price`.
/// Binary search over the full tick range.
pub fn sqrt_price_to_tick(env: &Env, sqrt_price: Dec) -> Result<i32, Error> {
    if sqrt_price < min_sqrt_price(env)? || sqrt_price > max_sqrt_price(env)? {
        return Err(Error::BoundExceeded);
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;

    while low < high {
        let mid = low + (high - low + 1) / 2;
        if tick_to_sqrt_price(env, mid)? <= sqrt_price {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Ok(low)
}

pub fn min_sqrt_price(env: &Env) -> Result<Dec, Error> {
    tick_to_sqrt_price(env, MIN_TICK)
}

pub fn max_sqrt_price(env: &Env) -> Result<Dec, Error> {
    tick_to_sqrt_price(env, MAX_TICK)
}
