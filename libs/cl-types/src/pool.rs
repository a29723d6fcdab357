use crate::Dec;
use soroban_sdk::contracttype;

/// Current pool state, rewritten after every swap and in-range liquidity change
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Current sqrt(price)
    pub sqrt_price: Dec,
    /// Current tick, the greatest tick whose sqrt price is <= `sqrt_price`
    pub tick: i32,
    /// Total liquidity currently in range
    pub liquidity: Dec,
    /// Fee growth per unit of liquidity, token0
    pub fee_growth_global_0: Dec,
    /// Fee growth per unit of liquidity, token1
    pub fee_growth_global_1: Dec,
}

impl PoolState {
    pub fn new(sqrt_price: Dec, tick: i32) -> Self {
        Self {
            sqrt_price,
            tick,
            liquidity: Dec::ZERO,
            fee_growth_global_0: Dec::ZERO,
            fee_growth_global_1: Dec::ZERO,
        }
    }
}

/// Pool configuration - immutable after creation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub tick_spacing: i32,
    /// Fraction of every input charged as fee, in [0, 1)
    pub swap_fee: Dec,
    /// Lowest usable tick, aligned to `tick_spacing`
    pub min_tick: i32,
    /// Highest usable tick, aligned to `tick_spacing`
    pub max_tick: i32,
    pub max_liquidity_per_tick: Dec,
}

/// Outcome of a full swap across one or more ticks
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapResult {
    /// Input consumed, fees included
    pub amount_in: Dec,
    pub amount_out: Dec,
    /// Portion of `amount_in` charged as fee
    pub fee_charged: Dec,
    pub sqrt_price: Dec,
    pub tick: i32,
    pub liquidity: Dec,
}
