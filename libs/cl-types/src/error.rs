use soroban_sdk::contracterror;

/// Failures reported by the pool, the tick index and the liquidity sumtree.
///
/// Codes are part of the contract ABI and must stay stable.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Tick bounds are inverted, out of range or off the tick spacing
    InvalidRange = 1,
    /// Liquidity would go negative, exceed the per-tick maximum, or the delta is not positive
    InvalidLiquidity = 2,
    /// Removing more liquidity than the position holds
    InsufficientLiquidity = 3,
    /// Sumtree decrease larger than the value recorded at the key
    Underflow = 4,
    /// Price or price limit outside the pool bounds
    BoundExceeded = 5,
    NotInitialized = 6,
    AlreadyInitialized = 7,
    PoolNotFound = 8,
    PoolAlreadyExists = 9,
    /// Tick spacing or swap fee not in the authorized set
    UnauthorizedParam = 10,
    /// Zero swap amount or non-positive price
    InvalidAmount = 11,
    /// Malformed module parameters
    InvalidParams = 12,
}
