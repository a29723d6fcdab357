use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use soroban_fixed_point_math::SorobanFixedPoint;
use soroban_sdk::{contracttype, Env, U256};

/// Number of decimal digits carried by [`Dec`].
pub const PRECISION: u32 = 18;

/// Signed fixed-point decimal with 18 digits of precision.
///
/// The wrapped value is the raw integer scaled by `10^18`, so `Dec(1)` is the
/// smallest representable step and `Dec::ONE` is `1.0`. Every multiplication
/// or division names its rounding direction; there is no implicit rounding.
#[contracttype]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Dec(pub i128);

impl Dec {
    pub const SCALE: i128 = 1_000_000_000_000_000_000;
    pub const ZERO: Dec = Dec(0);
    pub const ONE: Dec = Dec(Self::SCALE);
    pub const MAX: Dec = Dec(i128::MAX);

    pub const fn from_raw(raw: i128) -> Self {
        Dec(raw)
    }

    /// Whole-number value, e.g. `from_int(5)` is `5.0`.
    pub const fn from_int(value: i128) -> Self {
        Dec(value * Self::SCALE)
    }

    /// `numerator / denominator` rounded down.
    pub fn from_ratio(env: &Env, numerator: i128, denominator: i128) -> Self {
        Dec(numerator.fixed_div_floor(env, &denominator, &Self::SCALE))
    }

    pub const fn raw(&self) -> i128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Dec) -> Option<Dec> {
        self.0.checked_add(other.0).map(Dec)
    }

    pub fn checked_sub(self, other: Dec) -> Option<Dec> {
        self.0.checked_sub(other.0).map(Dec)
    }

    pub fn mul_floor(self, env: &Env, other: Dec) -> Dec {
        Dec(self.0.fixed_mul_floor(env, &other.0, &Self::SCALE))
    }

    pub fn mul_ceil(self, env: &Env, other: Dec) -> Dec {
        Dec(self.0.fixed_mul_ceil(env, &other.0, &Self::SCALE))
    }

    /// `self / other` rounded down. Panics if `other` is zero.
    pub fn div_floor(self, env: &Env, other: Dec) -> Dec {
        Dec(self.0.fixed_div_floor(env, &other.0, &Self::SCALE))
    }

    /// `self / other` rounded up. Panics if `other` is zero.
    pub fn div_ceil(self, env: &Env, other: Dec) -> Dec {
        Dec(self.0.fixed_div_ceil(env, &other.0, &Self::SCALE))
    }

    /// `self * numerator / denominator` with a single rounding step.
    pub fn mul_div_floor(self, env: &Env, numerator: Dec, denominator: Dec) -> Dec {
        Dec(self.0.fixed_mul_floor(env, &numerator.0, &denominator.0))
    }

    pub fn mul_div_ceil(self, env: &Env, numerator: Dec, denominator: Dec) -> Dec {
        Dec(self.0.fixed_mul_ceil(env, &numerator.0, &denominator.0))
    }

    /// `self * numerator / denominator` rounded down, computed in 256 bits.
    ///
    /// Returns `None` when an operand is negative, the denominator is zero, or
    /// the result does not fit.
    pub fn checked_mul_div_floor(self, env: &Env, numerator: Dec, denominator: Dec) -> Option<Dec> {
        wide_mul_div(env, self, numerator, denominator, false)
    }

    pub fn checked_mul_div_ceil(self, env: &Env, numerator: Dec, denominator: Dec) -> Option<Dec> {
        wide_mul_div(env, self, numerator, denominator, true)
    }

    pub fn checked_mul_floor(self, env: &Env, other: Dec) -> Option<Dec> {
        self.checked_mul_div_floor(env, other, Dec::ONE)
    }

    pub fn checked_mul_ceil(self, env: &Env, other: Dec) -> Option<Dec> {
        self.checked_mul_div_ceil(env, other, Dec::ONE)
    }

    pub fn checked_div_floor(self, env: &Env, other: Dec) -> Option<Dec> {
        self.checked_mul_div_floor(env, Dec::ONE, other)
    }

    pub fn checked_div_ceil(self, env: &Env, other: Dec) -> Option<Dec> {
        self.checked_mul_div_ceil(env, Dec::ONE, other)
    }

    /// Integer part, truncated toward negative infinity.
    pub fn floor_int(&self) -> i128 {
        self.0.div_euclid(Self::SCALE)
    }

    /// Integer part, rounded toward positive infinity.
    pub fn ceil_int(&self) -> i128 {
        let floor = self.floor_int();
        if self.0.rem_euclid(Self::SCALE) == 0 {
            floor
        } else {
            floor + 1
        }
    }
}

fn wide_mul_div(env: &Env, a: Dec, b: Dec, denominator: Dec, round_up: bool) -> Option<Dec> {
    if !denominator.is_positive() {
        return None;
    }
    let a = U256::from_u128(env, u128::try_from(a.0).ok()?);
    let b = U256::from_u128(env, u128::try_from(b.0).ok()?);
    let denominator = U256::from_u128(env, u128::try_from(denominator.0).ok()?);

    let product = a.mul(&b);
    let mut result = product.div(&denominator);
    if round_up && product.rem_euclid(&denominator).gt(&U256::from_u32(env, 0)) {
        result = result.add(&U256::from_u32(env, 1));
    }

    result
        .to_u128()
        .and_then(|raw| i128::try_from(raw).ok())
        .map(Dec)
}

impl Add for Dec {
    type Output = Dec;

    fn add(self, rhs: Dec) -> Dec {
        Dec(self.0 + rhs.0)
    }
}

impl AddAssign for Dec {
    fn add_assign(&mut self, rhs: Dec) {
        self.0 += rhs.0;
    }
}

impl Sub for Dec {
    type Output = Dec;

    fn sub(self, rhs: Dec) -> Dec {
        Dec(self.0 - rhs.0)
    }
}

impl SubAssign for Dec {
    fn sub_assign(&mut self, rhs: Dec) {
        self.0 -= rhs.0;
    }
}

impl Neg for Dec {
    type Output = Dec;

    fn neg(self) -> Dec {
        Dec(-self.0)
    }
}
