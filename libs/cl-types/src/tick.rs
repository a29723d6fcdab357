use crate::Dec;
use soroban_sdk::contracttype;

/// Aggregate liquidity referencing a single tick
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TickInfo {
    /// Total liquidity referencing this tick from either side
    pub liquidity_gross: Dec,
    /// Change in active liquidity when the tick is crossed upward
    pub liquidity_net: Dec,
    /// Fee growth per unit of liquidity on the far side of the tick, token0
    pub fee_growth_outside_0: Dec,
    /// Fee growth per unit of liquidity on the far side of the tick, token1
    pub fee_growth_outside_1: Dec,
}

impl TickInfo {
    pub fn is_initialized(&self) -> bool {
        !self.liquidity_gross.is_zero()
    }
}
