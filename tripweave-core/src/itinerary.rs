//! Planned itineraries and their wire form.

use serde::{Deserialize, Serialize};

use crate::clock::{ClockTime, WeekInstant};
use crate::place::{Place, PlaceCategory, PlaceId, TravelMode};

/// One visit within an itinerary, with the decisions the search made about
/// it.
///
/// Durations are whole seconds and distances whole metres. The travel fields
/// describe the leg leaving this stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    /// Place id.
    pub id: PlaceId,
    /// Place name.
    pub name: String,
    /// Place rating.
    pub rating: f64,
    /// Visit duration in seconds.
    pub duration: u32,
    /// Place category.
    pub category: PlaceCategory,
    /// How the user leaves for the next stop.
    pub travel_mode: TravelMode,
    /// Seconds to the next stop, including any walk back to the car.
    pub duration_to_next: u32,
    /// Metres to the next stop.
    pub distance_to_next: u32,
    /// Wall-clock time the visit starts.
    pub planned_hour: ClockTime,
    /// Week-relative instant the visit starts.
    #[serde(skip)]
    pub planned_at: WeekInstant,
    /// Seconds spent waiting before the visit starts.
    pub wait_time: u32,
    /// The user walks back to the parked car before the next leg.
    pub get_car_back: bool,
    /// The user parks the car here and walks on.
    pub park_here: bool,
    /// Where the car is parked while the user is on foot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_place_id: Option<PlaceId>,
    /// Name of the place the car is parked at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_place_name: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Stop {
    /// A visit to `place` starting at `planned_at` after waiting `wait_time`
    /// seconds. Travel fields start empty and are filled in when the next leg
    /// is chosen.
    #[must_use]
    pub fn visit(place: &Place, planned_at: WeekInstant, wait_time: u32) -> Self {
        Self {
            id: place.id,
            name: place.name.clone(),
            rating: place.rating,
            duration: u32::try_from(place.visit_duration.as_secs()).unwrap_or(u32::MAX),
            category: place.category,
            travel_mode: TravelMode::Walking,
            duration_to_next: 0,
            distance_to_next: 0,
            planned_hour: planned_at.clock(),
            planned_at,
            wait_time,
            get_car_back: false,
            park_here: false,
            car_place_id: None,
            car_place_name: None,
            latitude: place.latitude(),
            longitude: place.longitude(),
        }
    }
}

/// Aggregate figures over an itinerary's stops.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryStats {
    /// Total metres travelled.
    pub distance: u64,
    /// Total seconds spent visiting and travelling.
    pub duration: u64,
    /// Mean rating over every stop.
    pub average_rating: f64,
    /// Number of stops.
    pub size: usize,
}

impl ItineraryStats {
    /// Compute the figures for `stops`.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "the mean rating divides by a small stop count"
    )]
    #[must_use]
    pub fn from_stops(stops: &[Stop]) -> Self {
        let distance = stops.iter().map(|s| u64::from(s.distance_to_next)).sum();
        let duration = stops
            .iter()
            .map(|s| u64::from(s.duration) + u64::from(s.duration_to_next))
            .sum();
        let rating_sum: f64 = stops.iter().map(|s| s.rating).sum();
        let average_rating = if stops.is_empty() {
            0.0
        } else {
            rating_sum / stops.len() as f64
        };
        Self {
            distance,
            duration,
            average_rating,
            size: stops.len(),
        }
    }
}

/// A complete plan found by the search.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tripweave_core::{Itinerary, Place, PlaceId, Stop, WeekInstant};
///
/// let start = Place::start("Hotel", Coord { x: 0.0, y: 0.0 });
/// let museum = Place::builder(PlaceId(1), "Museum", Coord { x: 0.0, y: 0.01 })
///     .rating(4.0)
///     .build();
/// let stops = vec![
///     Stop::visit(&start, WeekInstant::from_seconds(36_000), 0),
///     Stop::visit(&museum, WeekInstant::from_seconds(36_600), 0),
/// ];
/// let itinerary = Itinerary::new(stops, 1.5, PlaceId(1));
/// assert_eq!(itinerary.stats().size, 2);
/// assert_eq!(itinerary.stats().average_rating, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ItineraryView")]
pub struct Itinerary {
    /// Stops in visiting order, the synthetic start first.
    pub stops: Vec<Stop>,
    /// Accumulated reward.
    pub score: f64,
    /// First place visited after the synthetic start.
    pub start_id: PlaceId,
}

impl Itinerary {
    /// Wrap a finished route.
    #[must_use]
    pub const fn new(stops: Vec<Stop>, score: f64, start_id: PlaceId) -> Self {
        Self {
            stops,
            score,
            start_id,
        }
    }

    /// Aggregate figures.
    #[must_use]
    pub fn stats(&self) -> ItineraryStats {
        ItineraryStats::from_stops(&self.stops)
    }

    /// Number of stops.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the itinerary has no stops.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Place ids in visiting order.
    pub fn ids(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.stops.iter().map(|s| s.id)
    }
}

/// Response body for one itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryView {
    /// Aggregate figures.
    pub stats: ItineraryStats,
    /// Stops in order.
    pub route: Vec<Stop>,
}

impl From<Itinerary> for ItineraryView {
    fn from(itinerary: Itinerary) -> Self {
        Self {
            stats: itinerary.stats(),
            route: itinerary.stops,
        }
    }
}
