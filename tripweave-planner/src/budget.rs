//! Cooperative cancellation for a planning request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared stop flag with an optional wall-clock deadline.
///
/// Every recursive search step checks [`SearchBudget::is_exhausted`] first;
/// the first check past the deadline flips the flag for everyone.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use tripweave_planner::SearchBudget;
///
/// let budget = SearchBudget::new(None);
/// assert!(!budget.is_exhausted());
/// budget.cancel();
/// assert!(budget.is_exhausted());
/// assert!(!budget.deadline_reached());
///
/// let expired = SearchBudget::new(Some(Duration::ZERO));
/// assert!(expired.is_exhausted());
/// assert!(expired.deadline_reached());
/// ```
#[derive(Debug)]
pub struct SearchBudget {
    stopped: AtomicBool,
    timed_out: AtomicBool,
    started_at: Instant,
    deadline: Option<Instant>,
}

impl SearchBudget {
    /// Start the clock now; `limit` of `None` never expires.
    #[must_use]
    pub fn new(limit: Option<Duration>) -> Self {
        let started_at = Instant::now();
        Self {
            stopped: AtomicBool::new(false),
            timed_out: AtomicBool::new(false),
            started_at,
            deadline: limit.and_then(|l| started_at.checked_add(l)),
        }
    }

    /// Whether new work should be refused.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.timed_out.store(true, Ordering::Relaxed);
            self.stopped.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    /// Stop all searches sharing this budget.
    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// Whether the deadline, rather than an explicit cancel, stopped the
    /// search.
    #[must_use]
    pub fn deadline_reached(&self) -> bool {
        self.timed_out.load(Ordering::Relaxed)
    }

    /// Time since the budget was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
