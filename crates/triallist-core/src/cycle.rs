//! Reshuffling cycle over index positions, shared by the block assigner and
//! the circular row generator.

use rand::seq::SliceRandom;

use crate::errors::{ErrorInfo, TrialError};
use crate::rng::RngHandle;

/// An unbounded dispenser over `0..len` that emits every index exactly once
/// per pass.
///
/// With an RNG the order is shuffled once up front and reshuffled exactly
/// when the cursor wraps back to position 0 — never mid-pass — so each full
/// pass is an independent permutation and no index repeats before a pass
/// completes. Without an RNG the cycle dispenses `0..len` sequentially
/// forever.
#[derive(Debug, Clone)]
pub struct ShuffledCycle {
    order: Vec<usize>,
    cursor: usize,
    rng: Option<RngHandle>,
}

impl ShuffledCycle {
    /// Builds a cycle over `0..len`, shuffled when `rng` is provided.
    pub fn new(len: usize, rng: Option<RngHandle>) -> Result<Self, TrialError> {
        if len == 0 {
            return Err(TrialError::InvalidInput(ErrorInfo::new(
                "empty-cycle",
                "a cycle requires at least one element",
            )));
        }
        let mut order: Vec<usize> = (0..len).collect();
        let mut rng = rng;
        if let Some(rng) = rng.as_mut() {
            order.shuffle(rng);
        }
        Ok(Self {
            order,
            cursor: 0,
            rng,
        })
    }

    /// Builds a seeded cycle; `seed: None` leaves the order sequential.
    pub fn from_optional_seed(len: usize, seed: Option<u64>) -> Result<Self, TrialError> {
        Self::new(len, seed.map(RngHandle::from_seed))
    }

    /// Dispenses the next index and advances the cursor.
    pub fn next_index(&mut self) -> usize {
        let ix = self.order[self.cursor];
        self.cursor = (self.cursor + 1) % self.order.len();
        if self.cursor == 0 {
            if let Some(rng) = self.rng.as_mut() {
                self.order.shuffle(rng);
            }
        }
        ix
    }

    /// Number of elements in one full pass.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the cycle covers no elements; never true after construction.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Current pass order, for state inspection.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Cursor position within the current pass.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
