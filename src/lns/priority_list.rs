#[cfg(test)]
#[path = "../../tests/unit/lns/priority_list_test.rs"]
mod priority_list_test;

use crate::utils::Random;
use std::sync::Arc;

struct PriorityListEntry<T> {
    value: T,
    period_score: f64,
    period_invocations: usize,
    weight: f64,
}

/// A weighted list of values supporting roulette selection and adaptive weight updates from
/// observed score feedback. Newly added values are assigned the current average weight, so
/// their initial sampling probability equals the mean of the incumbents.
pub struct AdaptivePriorityList<T> {
    entries: Vec<PriorityListEntry<T>>,
    total_weight: f64,
    smoothing_factor: f64,
    random: Arc<dyn Random>,
}

impl<T> AdaptivePriorityList<T> {
    /// Creates a new instance of `AdaptivePriorityList` with the given smoothing factor in
    /// `[0, 1]`.
    pub fn new(random: Arc<dyn Random>, smoothing_factor: f64) -> Self {
        assert!((0. ..=1.).contains(&smoothing_factor));
        Self { entries: Vec::new(), total_weight: 0., smoothing_factor, random }
    }

    /// Adds a value and returns its index.
    pub fn add(&mut self, value: T) -> usize {
        let weight = self.average_weight();
        self.total_weight += weight;
        self.entries.push(PriorityListEntry { value, period_score: 0., period_invocations: 0, weight });
        self.entries.len() - 1
    }

    /// Removes the value at the given index. Later indices shift down by one.
    pub fn remove(&mut self, index: usize) {
        let entry = self.entries.remove(index);
        self.total_weight -= entry.weight;
    }

    /// Credits the value at the given index with a score for the current period.
    pub fn update(&mut self, index: usize, score: f64) {
        let entry = &mut self.entries[index];
        entry.period_score += score;
        entry.period_invocations += 1;
    }

    /// Smoothes the period scores into the weights and resets the period counters:
    /// `new_weight = lambda * (period_score / max(1, period_invocations)) + (1 - lambda) * old_weight`.
    pub fn adapt(&mut self) {
        self.total_weight = 0.;
        for entry in self.entries.iter_mut() {
            entry.weight = self.smoothing_factor * (entry.period_score / 1f64.max(entry.period_invocations as f64))
                + (1. - self.smoothing_factor) * entry.weight;

            debug_assert!(entry.weight >= 0.);

            self.total_weight += entry.weight;
            entry.period_score = 0.;
            entry.period_invocations = 0;
        }
    }

    /// Sets all weights to 1 and clears the period counters.
    pub fn reset_weights(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.weight = 1.;
            entry.period_score = 0.;
            entry.period_invocations = 0;
        }
        self.total_weight = self.entries.len() as f64;
    }

    /// Samples an index by cumulative-weight roulette.
    pub fn pick(&self) -> usize {
        assert!(!self.entries.is_empty(), "cannot pick from an empty priority list");

        let picked = self.random.uniform_real(0., self.total_weight);
        let mut cumulative = 0.;
        for (index, entry) in self.entries.iter().enumerate() {
            cumulative += entry.weight;
            if cumulative >= picked {
                return index;
            }
        }

        self.entries.len() - 1
    }

    /// Returns the value at the given index.
    pub fn get(&self, index: usize) -> &T {
        &self.entries[index].value
    }

    /// Returns a mutable reference to the value at the given index.
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        &mut self.entries[index].value
    }

    /// Returns the current weight of the value at the given index.
    pub fn weight(&self, index: usize) -> f64 {
        self.entries[index].weight
    }

    /// Returns the amount of values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the values.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|entry| &entry.value)
    }

    fn average_weight(&self) -> f64 {
        if self.entries.is_empty() {
            1.
        } else {
            self.total_weight / self.entries.len() as f64
        }
    }
}
