//! Precomputed transition rewards.
//!
//! A reward scores moving from one node to another when leaving at a given
//! hour of the day. It only depends on the hour, never on search state, so
//! the whole grid is computed once per request.

use log::error;
use tripweave_core::{PlaceCategory, SECONDS_PER_DAY};

use crate::config::PlannerConfig;
use crate::problem::Problem;

const HOURS: usize = 24;
const SECONDS_PER_HOUR: u32 = 3_600;

/// Reward for one transition.
///
/// `travel_seconds` is floored at one second. `heuristic` weighs travel
/// efficiency against the destination's rating; `bonus` is added on top.
///
/// # Examples
/// ```
/// use tripweave_planner::evaluate_reward;
///
/// // Pure efficiency: a ten-second hop is worth a tenth.
/// assert!((evaluate_reward(10, 4.0, 1.0, 0.0) - 0.1).abs() < 1e-12);
/// // Pure quality: the rating itself.
/// assert!((evaluate_reward(10, 4.0, 0.0, 0.0) - 4.0).abs() < 1e-12);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the reward model is a weighted sum of floats"
)]
pub fn evaluate_reward(travel_seconds: u32, next_rating: f64, heuristic: f64, bonus: f64) -> f64 {
    let travel = f64::from(travel_seconds.max(1));
    (1.0 / travel) * heuristic + next_rating * (1.0 - heuristic) + bonus
}

/// Rewards for every hour bucket and ordered node pair, plus each pair's
/// peak over all hours.
#[derive(Debug, Clone)]
pub(crate) struct RewardGrid {
    n: usize,
    values: Vec<f64>,
    peaks: Vec<f64>,
}

impl RewardGrid {
    /// Compute the grid for `problem`.
    pub(crate) fn build(problem: &Problem, heuristic: f64, config: &PlannerConfig) -> Self {
        let n = problem.len();
        let mut values = vec![0.0; HOURS * n * n];
        let mut peaks = vec![0.0_f64; n * n];
        for (from, source) in problem.nodes.iter().enumerate() {
            let bonus = match source.place.category {
                PlaceCategory::Restaurant => config.restaurant_bonus,
                PlaceCategory::Attraction | PlaceCategory::Start => config.attraction_bonus,
            };
            for (to, target) in problem.nodes.iter().enumerate() {
                if from == to || target.place.id.is_start() {
                    continue;
                }
                let travel = match problem.drive(from, to) {
                    Some((drive, _)) => problem.walk(from, to).min(drive),
                    None => problem.walk(from, to),
                };
                for hour in 0..HOURS {
                    let on_time = source.fixed.is_some_and(|fixed| {
                        hour_near(hour, fixed.clock().seconds(), problem.tolerance)
                    });
                    let reward = evaluate_reward(
                        travel,
                        target.place.rating,
                        heuristic,
                        if on_time { bonus } else { 0.0 },
                    );
                    if let Some(slot) = values.get_mut((hour * n + from) * n + to) {
                        *slot = reward;
                    }
                    if let Some(peak) = peaks.get_mut(from * n + to) {
                        *peak = peak.max(reward);
                    }
                }
            }
        }
        Self { n, values, peaks }
    }

    /// Reward for `from → to` when leaving during `hour`.
    ///
    /// A lookup outside the grid is a programming error: it asserts in debug
    /// builds and scores zero otherwise.
    pub(crate) fn reward(&self, hour: usize, from: usize, to: usize) -> f64 {
        let in_grid = hour < HOURS && from < self.n && to < self.n;
        debug_assert!(in_grid, "reward lookup ({hour}, {from}, {to}) outside grid");
        let value = in_grid
            .then(|| self.values.get((hour * self.n + from) * self.n + to))
            .flatten();
        value.copied().unwrap_or_else(|| {
            error!("reward lookup ({hour}, {from}, {to}) outside grid of {}", self.n);
            0.0
        })
    }

    /// Highest reward for `from → to` at any hour.
    pub(crate) fn peak(&self, from: usize, to: usize) -> f64 {
        let in_grid = from < self.n && to < self.n;
        debug_assert!(in_grid, "peak lookup ({from}, {to}) outside grid");
        let value = in_grid.then(|| self.peaks.get(from * self.n + to)).flatten();
        value.copied().unwrap_or_else(|| {
            error!("peak lookup ({from}, {to}) outside grid of {}", self.n);
            0.0
        })
    }
}

/// Whether the hour bucket `[hour:00, hour+1:00)` comes within `tolerance`
/// seconds of `fixed` (seconds since midnight).
fn hour_near(hour: usize, fixed: u32, tolerance: u32) -> bool {
    let start = u32::try_from(hour).unwrap_or(u32::MAX).saturating_mul(SECONDS_PER_HOUR);
    let end = start.saturating_add(SECONDS_PER_HOUR);
    let low = fixed.saturating_sub(tolerance);
    let high = fixed.saturating_add(tolerance).min(SECONDS_PER_DAY);
    start <= high && low < end
}
