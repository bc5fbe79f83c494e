//! Stochastic wait-time model.
//!
//! Adjustments are applied in a fixed order: department base, peak-hour
//! factor, weekend factor, then jitter. The result is truncated and floored.

use crate::record::base_wait_minutes;
use chrono::Weekday;
use rand::Rng;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, PartialEq)]
pub struct WaitTimeModel {
    pub peak_hours: Vec<u32>,
    pub peak_multiplier: f64,
    pub weekend_multiplier: f64,
    pub jitter: RangeInclusive<f64>,
    pub floor_minutes: u32,
}

impl Default for WaitTimeModel {
    fn default() -> Self {
        Self {
            peak_hours: vec![8, 9, 10, 13, 14, 15],
            peak_multiplier: 1.5,
            weekend_multiplier: 0.7,
            jitter: 0.7..=1.3,
            floor_minutes: 5,
        }
    }
}

impl WaitTimeModel {
    /// Expected wait before jitter.
    pub fn adjusted_base(&self, department: &str, hour: u32, weekday: Weekday) -> f64 {
        let mut wait = base_wait_minutes(department);

        if self.peak_hours.contains(&hour) {
            wait *= self.peak_multiplier;
        }

        if matches!(weekday, Weekday::Sat | Weekday::Sun) {
            wait *= self.weekend_multiplier;
        }

        wait
    }

    /// Deterministic wait for a given jitter factor.
    pub fn wait_minutes(&self, department: &str, hour: u32, weekday: Weekday, jitter: f64) -> u32 {
        let wait = self.adjusted_base(department, hour, weekday) * jitter;
        // `as` truncates toward zero and saturates at the u32 bounds
        (wait.trunc() as u32).max(self.floor_minutes)
    }

    /// Draw a jitter factor from `rng` and compute the wait.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        department: &str,
        hour: u32,
        weekday: Weekday,
        rng: &mut R,
    ) -> u32 {
        let jitter = rng.gen_range(self.jitter.clone());
        self.wait_minutes(department, hour, weekday, jitter)
    }
}
