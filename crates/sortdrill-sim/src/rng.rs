use serde::{Deserialize, Serialize};
use sortdrill_core::sequence::{MAX_VALUE, MIN_VALUE, SequenceSource};

/// Tiny deterministic RNG used by the simulator.
///
/// Reproducible across platforms so a failing seed replays exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    /// Next pseudo-random `u64`.
    #[must_use]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        // High bits of an LCG are the well-mixed ones.
        self.state >> 16
    }

    /// Next value in `[0, upper_exclusive)`.
    #[must_use]
    pub fn next_bounded(&mut self, upper_exclusive: u64) -> u64 {
        if upper_exclusive == 0 {
            return 0;
        }
        self.next_u64() % upper_exclusive
    }

    /// Next value in `[min, max]`.
    #[must_use]
    pub fn next_in(&mut self, min: i32, max: i32) -> i32 {
        let span = u64::try_from(i64::from(max) - i64::from(min) + 1).unwrap_or(1);
        let offset = i64::try_from(self.next_bounded(span)).unwrap_or(0);
        i32::try_from(i64::from(min) + offset).unwrap_or(min)
    }

    /// Uniform choice from a slice.
    #[must_use]
    pub fn choose<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        let len = u64::try_from(items.len()).ok()?;
        let index = usize::try_from(self.next_bounded(len)).ok()?;
        items.get(index).copied()
    }

    /// Bernoulli trial with integer percent.
    #[must_use]
    pub fn hit_rate_percent(&mut self, percent: u8) -> bool {
        if percent == 0 {
            return false;
        }
        if percent >= 100 {
            return true;
        }
        self.next_bounded(100) < u64::from(percent)
    }
}

impl SequenceSource for DeterministicRng {
    fn generate(&mut self, len: usize) -> Vec<i32> {
        (0..len).map(|_| self.next_in(MIN_VALUE, MAX_VALUE)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = DeterministicRng::new(11);
        let mut b = DeterministicRng::new(11);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn generated_values_stay_in_range() {
        let values = DeterministicRng::new(3).generate(500);
        assert_eq!(values.len(), 500);
        assert!(values.iter().all(|v| (MIN_VALUE..=MAX_VALUE).contains(v)));
        assert!(values.iter().any(|&v| v != values[0]));
    }

    #[test]
    fn next_in_single_point_range() {
        let mut rng = DeterministicRng::new(0);
        assert_eq!(rng.next_in(5, 5), 5);
    }

    #[test]
    fn choose_handles_empty() {
        let mut rng = DeterministicRng::new(0);
        assert_eq!(rng.choose::<u8>(&[]), None);
        assert_eq!(rng.choose(&[9]), Some(9));
    }

    #[test]
    fn hit_rate_extremes() {
        let mut rng = DeterministicRng::new(1);
        assert!(!rng.hit_rate_percent(0));
        assert!(rng.hit_rate_percent(100));
    }
}
