use crate::Dec;
use soroban_sdk::{contracttype, Vec};

/// Module-wide parameters governing which pools may be created
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Params {
    pub authorized_tick_spacings: Vec<i32>,
    pub authorized_swap_fees: Vec<Dec>,
}

impl Params {
    /// Spacings must be positive and fees must lie in [0, 1).
    pub fn is_valid(&self) -> bool {
        self.authorized_tick_spacings.iter().all(|s| s > 0)
            && self
                .authorized_swap_fees
                .iter()
                .all(|f| !f.is_negative() && f < Dec::ONE)
    }

    pub fn is_authorized(&self, tick_spacing: i32, swap_fee: Dec) -> bool {
        self.authorized_tick_spacings.iter().any(|s| s == tick_spacing)
            && self.authorized_swap_fees.iter().any(|f| f == swap_fee)
    }
}
