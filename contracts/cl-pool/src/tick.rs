use crate::invariants;
use crate::storage::{
    get_tick, get_tick_bitmap_summary, get_tick_bitmap_word, has_tick, set_tick,
    set_tick_bitmap_summary, set_tick_bitmap_word,
};
use cl_math::{add_delta, SwapStrategy};
use cl_types::{Dec, Error, PoolConfig, PoolState};
use soroban_sdk::Env;

/// Bits per bitmap word
const WORD_BITS: i32 = 128;

/// Check that a liquidity change at `tick` would be accepted, without writing.
pub fn check_update(
    env: &Env,
    pool_id: u64,
    config: &PoolConfig,
    tick: i32,
    liquidity_delta: Dec,
) -> Result<(), Error> {
    let info = get_tick(env, pool_id, tick);
    let gross_after = add_delta(info.liquidity_gross, liquidity_delta)?;
    if gross_after > config.max_liquidity_per_tick {
        return Err(Error::InvalidLiquidity);
    }
    // Either side of the range may be updated with this delta
    if info.liquidity_net.checked_add(liquidity_delta).is_none()
        || info.liquidity_net.checked_sub(liquidity_delta).is_none()
    {
        return Err(Error::InvalidLiquidity);
    }
    Ok(())
}

/// Update a tick with liquidity delta
/// Returns true if the tick was flipped (initialized or uninitialized)
pub fn update_tick(
    env: &Env,
    pool_id: u64,
    config: &PoolConfig,
    state: &PoolState,
    tick: i32,
    liquidity_delta: Dec,
    upper: bool,
) -> Result<bool, Error> {
    let mut info = get_tick(env, pool_id, tick);

    let gross_before = info.liquidity_gross;
    let gross_after = add_delta(gross_before, liquidity_delta)?;
    if gross_after > config.max_liquidity_per_tick {
        return Err(Error::InvalidLiquidity);
    }

    let flipped = gross_after.is_zero() != gross_before.is_zero();

    if gross_before.is_zero() && tick <= state.tick {
        // All growth so far happened below the tick
        info.fee_growth_outside_0 = state.fee_growth_global_0;
        info.fee_growth_outside_1 = state.fee_growth_global_1;
    }

    info.liquidity_gross = gross_after;
    info.liquidity_net = if upper {
        info.liquidity_net.checked_sub(liquidity_delta)
    } else {
        info.liquidity_net.checked_add(liquidity_delta)
    }
    .ok_or(Error::InvalidLiquidity)?;

    debug_assert!(invariants::tick_net_bounded_by_gross(&info));
    debug_assert!(invariants::tick_liquidity_bounded(&info, config));
    set_tick(env, pool_id, tick, &info);

    if flipped {
        flip_tick(env, pool_id, tick, config.tick_spacing);
    }

    Ok(flipped)
}

/// Cross `tick` in the direction of `strategy`, applying its net liquidity to
/// `active_liquidity`.
///
/// Returns false without touching anything if the tick holds no liquidity.
pub fn cross_tick<S: SwapStrategy>(
    env: &Env,
    pool_id: u64,
    tick: i32,
    strategy: &S,
    active_liquidity: &mut Dec,
    fee_growth_global_0: Dec,
    fee_growth_global_1: Dec,
) -> Result<bool, Error> {
    if !has_tick(env, pool_id, tick) {
        return Ok(false);
    }
    let mut info = get_tick(env, pool_id, tick);

    *active_liquidity = add_delta(
        *active_liquidity,
        strategy.liquidity_net_delta(info.liquidity_net),
    )?;

    // Flip fee growth outside
    info.fee_growth_outside_0 = fee_growth_global_0 - info.fee_growth_outside_0;
    info.fee_growth_outside_1 = fee_growth_global_1 - info.fee_growth_outside_1;
    set_tick(env, pool_id, tick, &info);

    Ok(true)
}

/// Fee growth per unit of liquidity accumulated inside [lower, upper]
pub fn fee_growth_inside(
    env: &Env,
    pool_id: u64,
    state: &PoolState,
    tick_lower: i32,
    tick_upper: i32,
) -> (Dec, Dec) {
    let lower = get_tick(env, pool_id, tick_lower);
    let upper = get_tick(env, pool_id, tick_upper);

    let (below_0, below_1) = if state.tick >= tick_lower {
        (lower.fee_growth_outside_0, lower.fee_growth_outside_1)
    } else {
        (
            state.fee_growth_global_0 - lower.fee_growth_outside_0,
            state.fee_growth_global_1 - lower.fee_growth_outside_1,
        )
    };

    let (above_0, above_1) = if state.tick < tick_upper {
        (upper.fee_growth_outside_0, upper.fee_growth_outside_1)
    } else {
        (
            state.fee_growth_global_0 - upper.fee_growth_outside_0,
            state.fee_growth_global_1 - upper.fee_growth_outside_1,
        )
    };

    (
        state.fee_growth_global_0 - below_0 - above_0,
        state.fee_growth_global_1 - below_1 - above_1,
    )
}

// === Tick Bitmap ===
// One bit per spacing-compressed tick, 128 per word. A summary bitmap keeps
// one bit per non-empty word so searches skip empty words in bulk.

/// (word, bit) holding a compressed index
fn position(compressed: i32) -> (i32, u32) {
    (compressed >> 7, compressed.rem_euclid(WORD_BITS) as u32)
}

/// Bits strictly above `bit` cleared
fn mask_at_or_below(bit: u32) -> u128 {
    (1u128 << bit) - 1 + (1u128 << bit)
}

/// Bits strictly below `bit` cleared
fn mask_at_or_above(bit: u32) -> u128 {
    !((1u128 << bit) - 1)
}

fn highest_bit(word: u128) -> i32 {
    127 - word.leading_zeros() as i32
}

fn lowest_bit(word: u128) -> i32 {
    word.trailing_zeros() as i32
}

/// Flip a tick in the bitmap. `tick` must be a multiple of `tick_spacing`.
pub fn flip_tick(env: &Env, pool_id: u64, tick: i32, tick_spacing: i32) {
    let (word_pos, bit_pos) = position(tick.div_euclid(tick_spacing));

    let word = get_tick_bitmap_word(env, pool_id, word_pos);
    let flipped = word ^ (1u128 << bit_pos);
    set_tick_bitmap_word(env, pool_id, word_pos, flipped);

    if (word == 0) != (flipped == 0) {
        let (summary_pos, summary_bit) = position(word_pos);
        let summary = get_tick_bitmap_summary(env, pool_id, summary_pos);
        set_tick_bitmap_summary(env, pool_id, summary_pos, summary ^ (1u128 << summary_bit));
    }
}

/// Next initialized tick strictly beyond `from` in the swap direction.
///
/// Searching down (`zero_for_one`) looks below `from`, searching up looks
/// above it. Falls back to the pool's tick bound when nothing is initialized
/// in that direction.
pub fn next_initialized_tick(
    env: &Env,
    pool_id: u64,
    config: &PoolConfig,
    from: i32,
    zero_for_one: bool,
) -> i32 {
    let spacing = config.tick_spacing;
    if zero_for_one {
        let start = if from.rem_euclid(spacing) == 0 {
            from.div_euclid(spacing) - 1
        } else {
            from.div_euclid(spacing)
        };
        find_at_or_below(env, pool_id, start, config.min_tick.div_euclid(spacing))
            .map(|compressed| compressed * spacing)
            .unwrap_or(config.min_tick)
    } else {
        let start = from.div_euclid(spacing) + 1;
        find_at_or_above(env, pool_id, start, config.max_tick.div_euclid(spacing))
            .map(|compressed| compressed * spacing)
            .unwrap_or(config.max_tick)
    }
}

fn find_at_or_above(env: &Env, pool_id: u64, compressed: i32, max_compressed: i32) -> Option<i32> {
    if compressed > max_compressed {
        return None;
    }

    let (word_pos, bit_pos) = position(compressed);
    let masked = get_tick_bitmap_word(env, pool_id, word_pos) & mask_at_or_above(bit_pos);
    if masked != 0 {
        let found = word_pos * WORD_BITS + lowest_bit(masked);
        return Some(found).filter(|c| *c <= max_compressed);
    }

    let max_word = max_compressed >> 7;
    let mut next_word = word_pos + 1;
    while next_word <= max_word {
        let (summary_pos, summary_bit) = position(next_word);
        let masked =
            get_tick_bitmap_summary(env, pool_id, summary_pos) & mask_at_or_above(summary_bit);
        if masked != 0 {
            let found_word = summary_pos * WORD_BITS + lowest_bit(masked);
            if found_word > max_word {
                return None;
            }
            let word = get_tick_bitmap_word(env, pool_id, found_word);
            let found = found_word * WORD_BITS + lowest_bit(word);
            return Some(found).filter(|c| *c <= max_compressed);
        }
        next_word = (summary_pos + 1) * WORD_BITS;
    }
    None
}

fn find_at_or_below(env: &Env, pool_id: u64, compressed: i32, min_compressed: i32) -> Option<i32> {
    if compressed < min_compressed {
        return None;
    }

    let (word_pos, bit_pos) = position(compressed);
    let masked = get_tick_bitmap_word(env, pool_id, word_pos) & mask_at_or_below(bit_pos);
    if masked != 0 {
        let found = word_pos * WORD_BITS + highest_bit(masked);
        return Some(found).filter(|c| *c >= min_compressed);
    }

    let min_word = min_compressed >> 7;
    let mut prev_word = word_pos - 1;
    while prev_word >= min_word {
        let (summary_pos, summary_bit) = position(prev_word);
        let masked =
            get_tick_bitmap_summary(env, pool_id, summary_pos) & mask_at_or_below(summary_bit);
        if masked != 0 {
            let found_word = summary_pos * WORD_BITS + highest_bit(masked);
            if found_word < min_word {
                return None;
            }
            let word = get_tick_bitmap_word(env, pool_id, found_word);
            let found = found_word * WORD_BITS + highest_bit(word);
            return Some(found).filter(|c| *c >= min_compressed);
        }
        prev_word = summary_pos * WORD_BITS - 1;
    }
    None
}
