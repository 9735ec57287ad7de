//! The mutable sequence a session sorts, plus the sources that produce it.
//!
//! A [`Sequence`] is handed to exactly one engine for the lifetime of a
//! session. Only engine code calls the mutators ([`Sequence::swap`] and
//! [`Sequence::relocate`]); everything else reads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::order::{ConvergenceDirection, OrderDirection};

/// Shortest sequence a session may be created with.
pub const MIN_LENGTH: usize = 5;
/// Longest sequence a session may be created with.
pub const MAX_LENGTH: usize = 20;
/// Smallest generated value.
pub const MIN_VALUE: i32 = 1;
/// Largest generated value.
pub const MAX_VALUE: i32 = 99;

/// Ordered values under sort together with the session's two policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sequence {
    values: Vec<i32>,
    order: OrderDirection,
    convergence: ConvergenceDirection,
}

impl Sequence {
    #[must_use]
    pub const fn new(
        values: Vec<i32>,
        order: OrderDirection,
        convergence: ConvergenceDirection,
    ) -> Self {
        Self {
            values,
            order,
            convergence,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<i32> {
        self.values.get(index).copied()
    }

    #[must_use]
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    #[must_use]
    pub const fn order(&self) -> OrderDirection {
        self.order
    }

    #[must_use]
    pub const fn convergence(&self) -> ConvergenceDirection {
        self.convergence
    }

    /// Shorthand for the session's ordering predicate.
    #[must_use]
    pub const fn precedes(&self, a: i32, b: i32) -> bool {
        self.order.precedes(a, b)
    }

    /// Whether the values already satisfy the session's order.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.order.is_ordered(&self.values)
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.values.swap(a, b);
    }

    /// Remove the value at `from` and reinsert it so it lands before the
    /// element that was at `to` (or at the end when `to == len`).
    ///
    /// `to` is expressed in pre-removal indices; when it lies past `from` the
    /// removal shifts it down by one. Returns the index the value now occupies.
    pub(crate) fn relocate(&mut self, from: usize, to: usize) -> usize {
        let value = self.values.remove(from);
        let effective = if to > from { to - 1 } else { to };
        self.values.insert(effective, value);
        effective
    }
}

/// Supplier of fresh sequences for new sessions.
pub trait SequenceSource {
    /// Produce `len` values.
    fn generate(&mut self, len: usize) -> Vec<i32>;
}

/// Uniform random values in an inclusive range.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    min: i32,
    max: i32,
}

impl RandomSource {
    /// Entropy-seeded source over `[MIN_VALUE, MAX_VALUE]`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            min: MIN_VALUE,
            max: MAX_VALUE,
        }
    }

    /// Reproducible source over `[MIN_VALUE, MAX_VALUE]`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            min: MIN_VALUE,
            max: MAX_VALUE,
        }
    }

    /// Restrict generated values to `[min, max]`. Bounds are swapped if reversed.
    #[must_use]
    pub const fn with_range(mut self, min: i32, max: i32) -> Self {
        if min <= max {
            self.min = min;
            self.max = max;
        } else {
            self.min = max;
            self.max = min;
        }
        self
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceSource for RandomSource {
    fn generate(&mut self, len: usize) -> Vec<i32> {
        (0..len)
            .map(|_| self.rng.gen_range(self.min..=self.max))
            .collect()
    }
}

/// Replays a fixed list, truncated or cycled to the requested length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSource {
    values: Vec<i32>,
}

impl FixedSource {
    #[must_use]
    pub const fn new(values: Vec<i32>) -> Self {
        Self { values }
    }
}

impl SequenceSource for FixedSource {
    fn generate(&mut self, len: usize) -> Vec<i32> {
        if self.values.is_empty() {
            return vec![MIN_VALUE; len];
        }
        self.values.iter().copied().cycle().take(len).collect()
    }
}
