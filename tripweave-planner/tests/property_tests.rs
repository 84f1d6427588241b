//! Property-based tests for the planner.
//!
//! # Invariants tested
//!
//! - **Opening hours:** every stop starts while its place is open and inside
//!   the user's window, walking or driving.
//! - **No duplicates:** each place appears at most once per itinerary.
//! - **Stats:** `duration`, `distance`, `averageRating` and `size` agree with
//!   the route.
//! - **Ranking:** itineraries come back best first, one per starting place.


use std::collections::HashSet;
use std::time::Duration;

use proptest::prelude::*;
use tripweave_core::{Itinerary, PlanningWindow, TravelMode};
use tripweave_planner::PlannerConfig;

use planner_support::{instance, manager, user_frame};

fn mode(driving: bool) -> TravelMode {
    if driving {
        TravelMode::Driving
    } else {
        TravelMode::Walking
    }
}

fn plans(
    seed: u64,
    count: i64,
    driving: bool,
    deadline: Option<Duration>,
) -> (planner_support::Instance, Vec<Itinerary>) {
    let instance = instance(seed, count, mode(driving));
    let config = PlannerConfig::default()
        .with_deadline(deadline)
        .with_worker_threads(Some(2));
    let plans = manager(&instance, config).plan(&instance.request);
    (instance, plans)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn stops_respect_opening_hours(seed in any::<u64>(), count in 1_i64..=7, driving in any::<bool>()) {
        let (instance, plans) = plans(seed, count, driving, Some(Duration::from_millis(200)));
        let window = PlanningWindow::from_frame(&user_frame());
        prop_assert!(window.is_some());
        for itinerary in &plans {
            for stop in itinerary.stops.iter().filter(|s| !s.id.is_start()) {
                let place = instance.places.iter().find(|p| p.id == stop.id);
                prop_assert!(place.is_some_and(|p| p.can_visit(stop.planned_at)));
                prop_assert!(window.is_some_and(|w| w.contains(stop.planned_at)));
            }
        }
    }

    #[test]
    fn itineraries_never_repeat_a_place(seed in any::<u64>(), count in 1_i64..=7, driving in any::<bool>()) {
        let (_, plans) = plans(seed, count, driving, Some(Duration::from_millis(200)));
        for itinerary in &plans {
            let mut seen = HashSet::new();
            prop_assert!(itinerary.ids().all(|id| seen.insert(id)));
        }
    }

    #[test]
    fn stats_agree_with_the_route(seed in any::<u64>(), count in 1_i64..=6, driving in any::<bool>()) {
        let (_, plans) = plans(seed, count, driving, None);
        for itinerary in &plans {
            let stats = itinerary.stats();
            let duration: u64 = itinerary
                .stops
                .iter()
                .map(|s| u64::from(s.duration) + u64::from(s.duration_to_next))
                .sum();
            let distance: u64 = itinerary.stops.iter().map(|s| u64::from(s.distance_to_next)).sum();
            prop_assert_eq!(stats.duration, duration);
            prop_assert_eq!(stats.distance, distance);
            prop_assert_eq!(stats.size, itinerary.len());
            prop_assert!(stats.average_rating >= 0.0 && stats.average_rating <= 5.0);
        }
    }

    #[test]
    fn results_are_ranked_with_one_per_start(seed in any::<u64>(), count in 2_i64..=6) {
        let (_, plans) = plans(seed, count, false, None);
        let starts: HashSet<_> = plans.iter().map(|i| i.start_id).collect();
        prop_assert_eq!(starts.len(), plans.len());
        let ranked = plans.windows(2).all(|pair| {
            pair.first().map(|a| a.score) >= pair.get(1).map(|b| b.score)
        });
        prop_assert!(ranked);
    }
}
