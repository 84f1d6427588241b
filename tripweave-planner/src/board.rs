//! Best itineraries found so far, shared by every search task.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tripweave_core::{Itinerary, PlaceId};

#[derive(Debug)]
struct BoardState {
    best: f64,
    per_start: BTreeMap<PlaceId, Itinerary>,
}

/// Shared best score and each starting place's best itinerary.
///
/// The best score is global across starting places: a strong itinerary from
/// one start prunes every other start's search too. Writes happen under one
/// lock; the hot-path read goes through an atomic mirror.
///
/// # Examples
/// ```
/// use tripweave_core::{Itinerary, PlaceId};
/// use tripweave_planner::ResultBoard;
///
/// let board = ResultBoard::new();
/// let build = |score| move || Itinerary::new(Vec::new(), score, PlaceId(1));
/// assert!(board.offer(PlaceId(1), 2.0, build(2.0)));
/// assert!(!board.offer(PlaceId(2), 2.0, build(2.0)));
/// assert_eq!(board.best(), 2.0);
/// ```
#[derive(Debug)]
pub struct ResultBoard {
    best_bits: AtomicU64,
    state: Mutex<BoardState>,
}

impl Default for ResultBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultBoard {
    /// An empty board; the best score starts at negative infinity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            best_bits: AtomicU64::new(f64::NEG_INFINITY.to_bits()),
            state: Mutex::new(BoardState {
                best: f64::NEG_INFINITY,
                per_start: BTreeMap::new(),
            }),
        }
    }

    /// Best score recorded by any task.
    #[must_use]
    pub fn best(&self) -> f64 {
        f64::from_bits(self.best_bits.load(Ordering::Acquire))
    }

    /// Record an itinerary for `start` if `score` strictly beats the global
    /// best. `build` only runs when the itinerary is kept.
    pub fn offer<F>(&self, start: PlaceId, score: f64, build: F) -> bool
    where
        F: FnOnce() -> Itinerary,
    {
        if score <= self.best() {
            return false;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if score <= state.best {
            return false;
        }
        state.best = score;
        self.best_bits.store(score.to_bits(), Ordering::Release);
        state.per_start.insert(start, build());
        true
    }

    /// Per-start bests, highest score first, ties by start id.
    #[must_use]
    pub fn into_ranked(self) -> Vec<Itinerary> {
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut ranked: Vec<Itinerary> = state.per_start.into_values().collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.start_id.cmp(&b.start_id))
        });
        ranked
    }
}
