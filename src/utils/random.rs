#[cfg(test)]
#[path = "../../tests/unit/utils/random_test.rs"]
mod random_test;

use rand::prelude::*;
use std::cell::RefCell;

/// Provides the way to use randomized values in generic way.
pub trait Random {
    /// Produces integral random value, uniformly distributed on the closed interval [min, max].
    fn uniform_int(&self, min: i64, max: i64) -> i64;

    /// Produces real random value, uniformly distributed on the interval [min, max).
    fn uniform_real(&self, min: f64, max: f64) -> f64;

    /// Flips a coin and returns true if it is "heads", false otherwise.
    fn is_head_not_tails(&self) -> bool;

    /// Tests probability value in (0., 1.) range.
    fn is_hit(&self, probability: f64) -> bool;

    /// Returns an index into the weights slice by cumulative-weight roulette. When all weights
    /// are zero, every index is equally likely.
    fn weighted(&self, weights: &[f64]) -> usize;
}

/// A default random implementation backed by a small, seedable 64-bit generator. Two instances
/// created with the same seed produce identical value sequences.
pub struct DefaultRandom {
    rng: RefCell<SmallRng>,
}

impl DefaultRandom {
    /// Creates a new instance of `DefaultRandom` with the given seed.
    pub fn new_with_seed(seed: u64) -> Self {
        Self { rng: RefCell::new(SmallRng::seed_from_u64(seed)) }
    }
}

impl Default for DefaultRandom {
    fn default() -> Self {
        Self::new_with_seed(0)
    }
}

impl Random for DefaultRandom {
    fn uniform_int(&self, min: i64, max: i64) -> i64 {
        if min == max {
            return min;
        }

        assert!(min < max);
        self.rng.borrow_mut().gen_range(min..=max)
    }

    fn uniform_real(&self, min: f64, max: f64) -> f64 {
        if (min - max).abs() < f64::EPSILON {
            return min;
        }

        assert!(min < max);
        self.rng.borrow_mut().gen_range(min..max)
    }

    fn is_head_not_tails(&self) -> bool {
        self.rng.borrow_mut().gen_bool(0.5)
    }

    fn is_hit(&self, probability: f64) -> bool {
        self.rng.borrow_mut().gen_bool(probability.clamp(0., 1.))
    }

    fn weighted(&self, weights: &[f64]) -> usize {
        assert!(!weights.is_empty());

        let total: f64 = weights.iter().sum();
        if total == 0. {
            return self.uniform_int(0, weights.len() as i64 - 1) as usize;
        }

        let picked = self.uniform_real(0., total);
        let mut cumulative = 0.;
        let mut last_candidate = 0;
        for (index, &weight) in weights.iter().enumerate() {
            if weight == 0. {
                continue;
            }
            cumulative += weight;
            last_candidate = index;
            if cumulative >= picked {
                return index;
            }
        }

        last_candidate
    }
}

/// Randomly selects an item from the given non-empty slice.
pub fn choose<'a, T>(random: &dyn Random, items: &'a [T]) -> &'a T {
    assert!(!items.is_empty());
    &items[random.uniform_int(0, items.len() as i64 - 1) as usize]
}
