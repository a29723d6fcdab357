#![no_std]

pub mod liquidity_math;
pub mod sqrt_price_math;
pub mod swap_strategy;
pub mod tick_math;

pub use liquidity_math::*;
pub use sqrt_price_math::*;
pub use swap_strategy::*;
pub use tick_math::*;
