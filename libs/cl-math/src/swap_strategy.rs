use crate::sqrt_price_math::{
    amount0_delta, amount1_delta, checked_amount0_delta, checked_amount1_delta,
    next_sqrt_price_from_amount0_in_round_up,
    next_sqrt_price_from_amount0_out_round_up, next_sqrt_price_from_amount1_in_round_down,
    next_sqrt_price_from_amount1_out_round_down,
};
use cl_types::{Dec, Error};
use soroban_sdk::Env;

/// Result of a single swap step within one tick interval
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapStep {
    /// The sqrt price after this step
    pub sqrt_price_next: Dec,
    /// Amount of input token consumed, fee excluded
    pub amount_in: Dec,
    /// Amount of output token produced
    pub amount_out: Dec,
    /// Fee charged on top of `amount_in`
    pub fee_charge: Dec,
}

/// Direction-specific swap step computation.
///
/// Outputs round down, inputs and fees round up. None of the step functions
/// fail or trap; the caller validates price direction and amounts beforehand.
/// When the amount needed to reach the target does not fit in a [`Dec`], the
/// target is out of reach and the step stops short of it.
pub trait SwapStrategy {
    fn zero_for_one(&self) -> bool;

    fn sqrt_price_limit(&self) -> Dec;

    /// Step target: the next tick's sqrt price, clamped to the price limit.
    fn sqrt_target_price(&self, next_tick_sqrt_price: Dec) -> Dec;

    /// Consume at most `amount_remaining` of input (fee included) moving from
    /// `current` toward `target`.
    fn compute_swap_step_out_given_in(
        &self,
        env: &Env,
        current: Dec,
        target: Dec,
        liquidity: Dec,
        amount_remaining: Dec,
    ) -> SwapStep;

    /// Produce at most `amount_out_remaining` of output moving from `current`
    /// toward `target`.
    fn compute_swap_step_in_given_out(
        &self,
        env: &Env,
        current: Dec,
        target: Dec,
        liquidity: Dec,
        amount_out_remaining: Dec,
    ) -> SwapStep;

    /// The price limit must sit on the swap's side of `current` and inside
    /// `[min, max]`.
    fn validate_price_limit(&self, current: Dec, min: Dec, max: Dec) -> Result<(), Error>;

    /// Liquidity change when crossing a tick with the given net liquidity.
    fn liquidity_net_delta(&self, liquidity_net: Dec) -> Dec;

    /// Tick to search from so that the next initialized tick is the next one
    /// the price will reach.
    fn search_start(&self, current_tick: i32) -> i32;

    /// Current tick after crossing `tick`.
    fn tick_after_cross(&self, tick: i32) -> i32;
}

/// Sells token0 for token1, sqrt price decreases
#[derive(Clone, Debug)]
pub struct ZeroForOneStrategy {
    pub sqrt_price_limit: Dec,
    pub swap_fee: Dec,
}

/// Sells token1 for token0, sqrt price increases
#[derive(Clone, Debug)]
pub struct OneForZeroStrategy {
    pub sqrt_price_limit: Dec,
    pub swap_fee: Dec,
}

/// amount_in * fee / (1 - fee), rounded up
pub fn fee_on_amount(env: &Env, amount_in: Dec, swap_fee: Dec) -> Dec {
    if swap_fee.is_zero() || amount_in.is_zero() {
        return Dec::ZERO;
    }
    amount_in
        .checked_mul_div_ceil(env, swap_fee, Dec::ONE - swap_fee)
        .unwrap_or(Dec::MAX)
}

fn amount_less_fee(env: &Env, amount: Dec, swap_fee: Dec) -> Dec {
    amount.mul_floor(env, Dec::ONE - swap_fee)
}

/// Fee for an exact-input step.
///
/// A step that reached its target pays the fee on what it consumed, capped so
/// the total never exceeds the remaining amount. A step that stopped short
/// exhausted the input, so the fee is whatever was left over.
fn fee_out_given_in(
    env: &Env,
    reached_target: bool,
    amount_in: Dec,
    amount_remaining: Dec,
    swap_fee: Dec,
) -> Dec {
    if reached_target {
        fee_on_amount(env, amount_in, swap_fee).min(amount_remaining - amount_in)
    } else {
        amount_remaining - amount_in
    }
}

impl SwapStrategy for ZeroForOneStrategy {
    fn zero_for_one(&self) -> bool {
        true
    }

    fn sqrt_price_limit(&self) -> Dec {
        self.sqrt_price_limit
    }

    fn sqrt_target_price(&self, next_tick_sqrt_price: Dec) -> Dec {
        next_tick_sqrt_price.max(self.sqrt_price_limit)
    }

    fn compute_swap_step_out_given_in(
        &self,
        env: &Env,
        current: Dec,
        target: Dec,
        liquidity: Dec,
        amount_remaining: Dec,
    ) -> SwapStep {
        let amount_remaining_less_fee = amount_less_fee(env, amount_remaining, self.swap_fee);
        let amount_in_to_target = checked_amount0_delta(env, target, current, liquidity, true);

        let (reached_target, sqrt_price_next, amount_in) = match amount_in_to_target {
            Some(amount_in) if amount_remaining_less_fee >= amount_in => (true, target, amount_in),
            _ => {
                let next = next_sqrt_price_from_amount0_in_round_up(
                    env,
                    current,
                    liquidity,
                    amount_remaining_less_fee,
                )
                .max(target);
                let amount_in = checked_amount0_delta(env, next, current, liquidity, true)
                    .unwrap_or(amount_remaining);
                (false, next, amount_in.min(amount_remaining))
            }
        };

        let amount_out = amount1_delta(env, sqrt_price_next, current, liquidity, false);
        let fee_charge =
            fee_out_given_in(env, reached_target, amount_in, amount_remaining, self.swap_fee);

        SwapStep {
            sqrt_price_next,
            amount_in,
            amount_out,
            fee_charge,
        }
    }

    fn compute_swap_step_in_given_out(
        &self,
        env: &Env,
        current: Dec,
        target: Dec,
        liquidity: Dec,
        amount_out_remaining: Dec,
    ) -> SwapStep {
        let amount_out_to_target = checked_amount1_delta(env, target, current, liquidity, false);

        let (sqrt_price_next, amount_out) = match amount_out_to_target {
            Some(amount_out) if amount_out_remaining >= amount_out => (target, amount_out),
            _ => {
                let next = next_sqrt_price_from_amount1_out_round_down(
                    env,
                    current,
                    liquidity,
                    amount_out_remaining,
                )
                .max(target);
                let amount_out = checked_amount1_delta(env, next, current, liquidity, false)
                    .unwrap_or(amount_out_remaining);
                (next, amount_out.min(amount_out_remaining))
            }
        };

        // Saturates when the input does not fit; the swap driver rejects the total
        let amount_in = checked_amount0_delta(env, sqrt_price_next, current, liquidity, true)
            .unwrap_or(Dec::MAX);

        SwapStep {
            sqrt_price_next,
            amount_in,
            amount_out,
            fee_charge: fee_on_amount(env, amount_in, self.swap_fee),
        }
    }

    fn validate_price_limit(&self, current: Dec, min: Dec, _max: Dec) -> Result<(), Error> {
        if self.sqrt_price_limit > current || self.sqrt_price_limit < min {
            return Err(Error::BoundExceeded);
        }
        Ok(())
    }

    fn liquidity_net_delta(&self, liquidity_net: Dec) -> Dec {
        -liquidity_net
    }

    fn search_start(&self, current_tick: i32) -> i32 {
        // The current tick has not been crossed downward yet
        current_tick + 1
    }

    fn tick_after_cross(&self, tick: i32) -> i32 {
        tick - 1
    }
}

impl SwapStrategy for OneForZeroStrategy {
    fn zero_for_one(&self) -> bool {
        false
    }

    fn sqrt_price_limit(&self) -> Dec {
        self.sqrt_price_limit
    }

    fn sqrt_target_price(&self, next_tick_sqrt_price: Dec) -> Dec {
        next_tick_sqrt_price.min(self.sqrt_price_limit)
    }

    fn compute_swap_step_out_given_in(
        &self,
        env: &Env,
        current: Dec,
        target: Dec,
        liquidity: Dec,
        amount_remaining: Dec,
    ) -> SwapStep {
        let amount_remaining_less_fee = amount_less_fee(env, amount_remaining, self.swap_fee);
        let amount_in_to_target = checked_amount1_delta(env, current, target, liquidity, true);

        let (reached_target, sqrt_price_next, amount_in) = match amount_in_to_target {
            Some(amount_in) if amount_remaining_less_fee >= amount_in => (true, target, amount_in),
            _ => {
                let next = next_sqrt_price_from_amount1_in_round_down(
                    env,
                    current,
                    liquidity,
                    amount_remaining_less_fee,
                )
                .min(target);
                let amount_in = checked_amount1_delta(env, current, next, liquidity, true)
                    .unwrap_or(amount_remaining);
                (false, next, amount_in.min(amount_remaining))
            }
        };

        let amount_out = amount0_delta(env, current, sqrt_price_next, liquidity, false);
        let fee_charge =
            fee_out_given_in(env, reached_target, amount_in, amount_remaining, self.swap_fee);

        SwapStep {
            sqrt_price_next,
            amount_in,
            amount_out,
            fee_charge,
        }
    }

    fn compute_swap_step_in_given_out(
        &self,
        env: &Env,
        current: Dec,
        target: Dec,
        liquidity: Dec,
        amount_out_remaining: Dec,
    ) -> SwapStep {
        let amount_out_to_target = checked_amount0_delta(env, current, target, liquidity, false);

        let (sqrt_price_next, amount_out) = match amount_out_to_target {
            Some(amount_out) if amount_out_remaining >= amount_out => (target, amount_out),
            _ => {
                let next = next_sqrt_price_from_amount0_out_round_up(
                    env,
                    current,
                    liquidity,
                    amount_out_remaining,
                )
                .min(target);
                let amount_out = checked_amount0_delta(env, current, next, liquidity, false)
                    .unwrap_or(amount_out_remaining);
                (next, amount_out.min(amount_out_remaining))
            }
        };

        let amount_in = checked_amount1_delta(env, current, sqrt_price_next, liquidity, true)
            .unwrap_or(Dec::MAX);

        SwapStep {
            sqrt_price_next,
            amount_in,
            amount_out,
            fee_charge: fee_on_amount(env, amount_in, self.swap_fee),
        }
    }

    fn validate_price_limit(&self, current: Dec, _min: Dec, max: Dec) -> Result<(), Error> {
        if self.sqrt_price_limit < current || self.sqrt_price_limit > max {
            return Err(Error::BoundExceeded);
        }
        Ok(())
    }

    fn liquidity_net_delta(&self, liquidity_net: Dec) -> Dec {
        liquidity_net
    }

    fn search_start(&self, current_tick: i32) -> i32 {
        current_tick
    }

    fn tick_after_cross(&self, tick: i32) -> i32 {
        tick
    }
}
