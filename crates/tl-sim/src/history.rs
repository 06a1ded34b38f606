//! Tick history recording.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::HistoryCapacity;

/// One recorded tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Simulation time [s]
    pub time_s: f64,
    /// Tank levels [L]
    pub levels_l: [f64; 3],
    /// Signed realized path flows [L/s]
    pub flows_lps: [f64; 2],
    /// Tank temperatures [°C]
    pub temperatures_c: [f64; 3],
    /// Tank bulk densities [kg/m³]
    pub densities_kg_m3: [f64; 3],
}

/// Ordered sample store, unbounded or ring-buffered per configuration.
#[derive(Debug, Clone)]
pub struct History {
    capacity: HistoryCapacity,
    samples: VecDeque<Sample>,
}

impl History {
    pub fn new(capacity: HistoryCapacity) -> Self {
        let samples = match capacity {
            HistoryCapacity::Unbounded => VecDeque::new(),
            HistoryCapacity::Bounded(n) => VecDeque::with_capacity(n),
        };
        Self { capacity, samples }
    }

    /// Append a sample, evicting the oldest when bounded and full.
    pub fn push(&mut self, sample: Sample) {
        if let HistoryCapacity::Bounded(n) = self.capacity {
            if n == 0 {
                return;
            }
            while self.samples.len() >= n {
                self.samples.pop_front();
            }
        }
        self.samples.push_back(sample);
    }

    pub fn capacity(&self) -> HistoryCapacity {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample, if any.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Oldest-to-newest iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time_s: f64) -> Sample {
        Sample {
            time_s,
            levels_l: [0.0; 3],
            flows_lps: [0.0; 2],
            temperatures_c: [20.0; 3],
            densities_kg_m3: [998.2; 3],
        }
    }

    #[test]
    fn unbounded_history_grows() {
        let mut h = History::new(HistoryCapacity::Unbounded);
        for i in 0..500 {
            h.push(sample(i as f64));
        }
        assert_eq!(h.len(), 500);
        assert_eq!(h.latest().unwrap().time_s, 499.0);
    }

    #[test]
    fn bounded_history_evicts_oldest() {
        let mut h = History::new(HistoryCapacity::Bounded(3));
        for i in 0..5 {
            h.push(sample(i as f64));
        }
        assert_eq!(h.len(), 3);
        let times: Vec<f64> = h.iter().map(|s| s.time_s).collect();
        assert_eq!(times, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut h = History::new(HistoryCapacity::Bounded(0));
        h.push(sample(1.0));
        assert!(h.is_empty());
    }
}
