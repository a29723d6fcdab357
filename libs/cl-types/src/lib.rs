#![no_std]

mod decimal;
mod error;
mod params;
mod pool;
mod position;
mod tick;

pub use decimal::*;
pub use error::*;
pub use params::*;
pub use pool::*;
pub use position::*;
pub use tick::*;

/// Minimum tick index
/// sqrt(1.0001^-443636) keeps 9 significant digits at 18 decimals
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
pub const MAX_TICK: i32 = 443636;

/// Usable tick bounds for a spacing, rounded toward zero onto the spacing
pub fn tick_bounds(tick_spacing: i32) -> (i32, i32) {
    (
        (MIN_TICK / tick_spacing) * tick_spacing,
        (MAX_TICK / tick_spacing) * tick_spacing,
    )
}

/// Calculate maximum liquidity per tick for a given tick spacing
pub fn max_liquidity_per_tick(tick_spacing: i32) -> Dec {
    let (min_tick, max_tick) = tick_bounds(tick_spacing);
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as i128 + 1;
    Dec(i128::MAX / num_ticks)
}
