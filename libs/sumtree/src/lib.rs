#![no_std]

//! Range-sum accumulator over `u64` keys.
//!
//! The key space is covered by a sparse 16-way radix tree of fixed depth. Every
//! node holds one partial sum per child; the leaf level holds the exact value
//! stored at each key. Point updates and prefix sums touch one node per level,
//! so their cost is independent of how many keys are populated. Nodes are
//! created lazily and never deleted.

mod storage;

use cl_types::{Dec, Error};
use soroban_sdk::{Env, Vec};

/// Bits of the key consumed per tree level
pub const BRANCH_BITS: u32 = 4;

/// Children per node
pub const BRANCHES: u32 = 1 << BRANCH_BITS;

/// Levels between the root and the leaves, inclusive
pub const DEPTH: u32 = u64::BITS / BRANCH_BITS;

const LEAF_LEVEL: u32 = DEPTH - 1;

/// A handle on one accumulator, isolated from others by `namespace`.
pub struct Sumtree<'a> {
    env: &'a Env,
    namespace: u64,
}

impl<'a> Sumtree<'a> {
    pub fn new(env: &'a Env, namespace: u64) -> Self {
        Self { env, namespace }
    }

    /// Add `amount` at `key`. Zero is a no-op.
    pub fn increase(&self, key: u64, amount: Dec) -> Result<(), Error> {
        if amount.is_negative() {
            return Err(Error::InvalidLiquidity);
        }
        if amount.is_zero() {
            return Ok(());
        }
        self.apply(key, amount);
        Ok(())
    }

    /// Subtract `amount` at `key`.
    ///
    /// Fails with `Underflow` before touching storage if the value at `key`
    /// is smaller than `amount`.
    pub fn decrease(&self, key: u64, amount: Dec) -> Result<(), Error> {
        if amount.is_negative() {
            return Err(Error::InvalidLiquidity);
        }
        if amount.is_zero() {
            return Ok(());
        }
        if self.exact_sum(key) < amount {
            return Err(Error::Underflow);
        }
        self.apply(key, -amount);
        Ok(())
    }

    /// Sum of all values at keys <= `key`
    pub fn prefix_sum(&self, key: u64) -> Dec {
        let mut sum = Dec::ZERO;
        for level in 0..DEPTH {
            let Some(node) = storage::get_node(self.env, self.namespace, level, node_prefix(key, level))
            else {
                // Nothing was ever written below this point
                break;
            };
            let slot = slot(key, level);
            let end = if level == LEAF_LEVEL { slot + 1 } else { slot };
            sum = node.iter().take(end as usize).fold(sum, |acc, value| acc + value);
        }
        sum
    }

    /// Sum over `[low, high]`, or `[low, +inf)` when `high` is `None`.
    /// An inverted range is empty.
    pub fn range_sum(&self, low: u64, high: Option<u64>) -> Dec {
        let upto_high = match high {
            Some(high) if high < low => return Dec::ZERO,
            Some(high) => self.prefix_sum(high),
            None => self.total(),
        };
        let below_low = if low == 0 {
            Dec::ZERO
        } else {
            self.prefix_sum(low - 1)
        };
        upto_high - below_low
    }

    /// Value stored at exactly `key`
    pub fn exact_sum(&self, key: u64) -> Dec {
        storage::get_node(self.env, self.namespace, LEAF_LEVEL, node_prefix(key, LEAF_LEVEL))
            .and_then(|node| node.get(slot(key, LEAF_LEVEL)))
            .unwrap_or(Dec::ZERO)
    }

    /// Sum over every key
    pub fn total(&self) -> Dec {
        storage::get_node(self.env, self.namespace, 0, 0)
            .map(|root| root.iter().fold(Dec::ZERO, |acc, value| acc + value))
            .unwrap_or(Dec::ZERO)
    }

    fn apply(&self, key: u64, delta: Dec) {
        for level in 0..DEPTH {
            let prefix = node_prefix(key, level);
            let mut node = storage::get_node(self.env, self.namespace, level, prefix)
                .unwrap_or_else(|| empty_node(self.env));
            let slot = slot(key, level);
            let value = node.get(slot).unwrap_or(Dec::ZERO);
            node.set(slot, value + delta);
            storage::set_node(self.env, self.namespace, level, prefix, &node);
        }
    }
}

/// Key bits above the span of a node at `level`; the root's prefix is 0
fn node_prefix(key: u64, level: u32) -> u64 {
    key.checked_shr(BRANCH_BITS * (DEPTH - level)).unwrap_or(0)
}

/// Child slot `key` falls into at `level`
fn slot(key: u64, level: u32) -> u32 {
    ((key >> (BRANCH_BITS * (LEAF_LEVEL - level))) & (BRANCHES as u64 - 1)) as u32
}

fn empty_node(env: &Env) -> Vec<Dec> {
    Vec::from_array(env, [Dec::ZERO; BRANCHES as usize])
}
