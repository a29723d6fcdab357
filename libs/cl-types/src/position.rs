use crate::Dec;
use soroban_sdk::{contracttype, Address};

/// A position is addressed by its owner, pool and tick range
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionKey {
    pub pool_id: u64,
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Position {
    pub liquidity: Dec,
    /// Ledger timestamp of the last liquidity increase
    pub join_time: u64,
}

/// Result of adding or removing liquidity
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidityChange {
    /// Position after the change; zero liquidity once fully withdrawn
    pub position: Position,
    pub amount_0: Dec,
    pub amount_1: Dec,
}
