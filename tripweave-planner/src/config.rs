//! Tunables for [`PlanManager`](crate::PlanManager).

use std::time::Duration;

use tripweave_core::{ClockTime, TravelSpeeds};

/// Configuration for the planner.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use tripweave_planner::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_deadline(Some(Duration::from_millis(500)))
///     .with_worker_threads(Some(2));
/// assert_eq!(config.worker_threads, Some(2));
/// assert_eq!(config.fixed_tolerance, Duration::from_secs(30 * 60));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Wall-clock budget for one request; `None` searches to completion.
    pub deadline: Option<Duration>,
    /// Worker threads; `None` uses one per logical core.
    pub worker_threads: Option<usize>,
    /// How far from its requested time a fixed place may start.
    pub fixed_tolerance: Duration,
    /// Reward bonus for leaving a fixed restaurant on time.
    pub restaurant_bonus: f64,
    /// Reward bonus for leaving any other fixed place on time.
    pub attraction_bonus: f64,
    /// Canonical lunch time.
    pub lunch_at: ClockTime,
    /// Canonical dinner time.
    pub dinner_at: ClockTime,
    /// Search radius around the start for meal restaurants, in metres.
    pub meal_radius_m: f64,
    /// Speeds for legs that have no measured matrix entry.
    pub speeds: TravelSpeeds,
}

/// Lunch at 13:00.
const LUNCH: ClockTime = match ClockTime::from_hm(13, 0) {
    Some(time) => time,
    None => ClockTime::MIDNIGHT,
};

/// Dinner at 19:00.
const DINNER: ClockTime = match ClockTime::from_hm(19, 0) {
    Some(time) => time,
    None => ClockTime::MIDNIGHT,
};

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            deadline: Some(Duration::from_secs(3)),
            worker_threads: None,
            fixed_tolerance: Duration::from_secs(30 * 60),
            restaurant_bonus: 2.0,
            attraction_bonus: 1.0,
            lunch_at: LUNCH,
            dinner_at: DINNER,
            meal_radius_m: 2_000.0,
            speeds: TravelSpeeds::default(),
        }
    }
}

impl PlannerConfig {
    /// Replace the search deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Replace the worker count.
    #[must_use]
    pub const fn with_worker_threads(mut self, workers: Option<usize>) -> Self {
        self.worker_threads = workers;
        self
    }

    /// Fixed-time tolerance in whole seconds.
    #[must_use]
    pub fn tolerance_seconds(&self) -> u32 {
        u32::try_from(self.fixed_tolerance.as_secs()).unwrap_or(u32::MAX)
    }
}
