//! Lunch and dinner stops.

use std::collections::HashSet;

use geo::Coord;
use log::{debug, warn};
use tripweave_core::{City, ClockTime, FixedAt, Place, PlaceId, PlanningWindow};

use crate::config::PlannerConfig;

/// Which meals the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct MealRequest {
    pub(crate) lunch: bool,
    pub(crate) dinner: bool,
}

/// Pick restaurants for the requested meals, each fixed at its meal time.
///
/// Candidates are open at the meal instant on the planning day and within
/// the configured radius of `origin`. Places already requested are skipped,
/// and dinner never repeats the lunch pick. Meals outside the window are
/// left out.
pub(crate) fn meal_stops(
    city: &City,
    window: &PlanningWindow,
    origin: Coord<f64>,
    requested: &HashSet<PlaceId>,
    meals: MealRequest,
    config: &PlannerConfig,
) -> Vec<Place> {
    let mut taken = requested.clone();
    let mut picks = Vec::new();
    let wanted = [
        (meals.lunch, "lunch", config.lunch_at),
        (meals.dinner, "dinner", config.dinner_at),
    ];
    for (meal, time) in wanted
        .into_iter()
        .filter_map(|(on, meal, time)| on.then_some((meal, time)))
    {
        if let Some(place) = pick(city, window, origin, &taken, meal, time, config) {
            debug!("{meal} at {time}: {} ({})", place.name, place.id);
            taken.insert(place.id);
            picks.push(place);
        }
    }
    picks
}

fn pick(
    city: &City,
    window: &PlanningWindow,
    origin: Coord<f64>,
    taken: &HashSet<PlaceId>,
    meal: &str,
    time: ClockTime,
    config: &PlannerConfig,
) -> Option<Place> {
    let Some(instant) = window.instant_at(time) else {
        debug!("{meal} at {time} falls outside the planning window");
        return None;
    };
    let found = city
        .restaurants_near(instant, origin, config.meal_radius_m)
        .into_iter()
        .find(|p| !taken.contains(&p.id));
    if found.is_none() {
        warn!("no restaurant open for {meal} in {}", city.name());
    }
    found.map(|mut place| {
        place.fixed_at = FixedAt::At(time);
        place
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tripweave_core::{Interval, PlaceCategory, TimeFrame, Weekday};

    fn hm(h: u32, m: u32) -> ClockTime {
        ClockTime::from_hm(h, m).expect("valid time")
    }

    fn restaurant(id: i64, rating: f64) -> Place {
        Place::builder(PlaceId(id), format!("r{id}"), Coord { x: 0.0, y: 0.0 })
            .rating(rating)
            .category(PlaceCategory::Restaurant)
            .build()
    }

    #[fixture]
    fn city() -> City {
        City::new("Bologna", vec![restaurant(1, 5.0), restaurant(2, 4.0), restaurant(3, 3.0)])
    }

    fn window(close: ClockTime) -> PlanningWindow {
        let frame = TimeFrame::closed().with_timed(Weekday::Friday, Interval::new(hm(9, 0), close));
        PlanningWindow::from_frame(&frame).expect("open on friday")
    }

    fn both() -> MealRequest {
        MealRequest {
            lunch: true,
            dinner: true,
        }
    }

    #[rstest]
    fn dinner_takes_the_next_best(city: City) {
        let picks = meal_stops(
            &city,
            &window(hm(22, 0)),
            Coord { x: 0.0, y: 0.0 },
            &HashSet::new(),
            both(),
            &PlannerConfig::default(),
        );
        let ids: Vec<_> = picks.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PlaceId(1), PlaceId(2)]);
        assert_eq!(picks.first().and_then(Place::fixed_time), Some(hm(13, 0)));
        assert_eq!(picks.get(1).and_then(Place::fixed_time), Some(hm(19, 0)));
    }

    #[rstest]
    fn skips_requested_places_and_meals_outside_window(city: City) {
        let requested = HashSet::from([PlaceId(1)]);
        let picks = meal_stops(
            &city,
            &window(hm(17, 0)),
            Coord { x: 0.0, y: 0.0 },
            &requested,
            both(),
            &PlannerConfig::default(),
        );
        let ids: Vec<_> = picks.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PlaceId(2)]);
    }

    #[rstest]
    fn nothing_requested_picks_nothing(city: City) {
        let picks = meal_stops(
            &city,
            &window(hm(22, 0)),
            Coord { x: 0.0, y: 0.0 },
            &HashSet::new(),
            MealRequest::default(),
            &PlannerConfig::default(),
        );
        assert!(picks.is_empty());
    }
}
