//! Straight-line travel estimates.
//!
//! Used where no measured matrix exists: legs from the user's literal start
//! coordinates, and the estimating matrix provider in `tripweave-data`.

use geo::{Coord, Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::place::TravelMode;

/// Average speeds used for estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelSpeeds {
    /// Walking speed in km/h.
    pub walking_kmh: f64,
    /// Driving speed in km/h.
    pub driving_kmh: f64,
    /// Multiplier turning great-circle distance into street distance.
    pub detour_factor: f64,
}

impl Default for TravelSpeeds {
    fn default() -> Self {
        Self {
            walking_kmh: 5.0,
            driving_kmh: 30.0,
            detour_factor: 1.3,
        }
    }
}

impl TravelSpeeds {
    /// Speed for `mode` in km/h.
    #[must_use]
    pub const fn kmh(&self, mode: TravelMode) -> f64 {
        match mode {
            TravelMode::Driving => self.driving_kmh,
            TravelMode::Walking => self.walking_kmh,
        }
    }
}

/// Estimated duration and distance of one leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LegEstimate {
    /// Seconds.
    pub duration: u32,
    /// Metres.
    pub distance: u32,
}

/// Great-circle distance in metres between two coordinates.
#[must_use]
pub fn great_circle_metres(from: Coord<f64>, to: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(from), Point::from(to))
}

/// Estimate a leg from great-circle distance and average speed.
///
/// A non-positive speed yields the maximum duration, which the planner treats
/// as unreachable within any window.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tripweave_core::{TravelMode, TravelSpeeds, travel};
///
/// let a = Coord { x: 2.2945, y: 48.8584 };
/// let b = Coord { x: 2.3376, y: 48.8606 };
/// let walk = travel::estimate(a, b, TravelMode::Walking, &TravelSpeeds::default());
/// let drive = travel::estimate(a, b, TravelMode::Driving, &TravelSpeeds::default());
/// assert!(walk.duration > drive.duration);
/// assert_eq!(walk.distance, drive.distance);
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "legs are rounded from metric float estimates; `as` saturates"
)]
#[must_use]
pub fn estimate(
    from: Coord<f64>,
    to: Coord<f64>,
    mode: TravelMode,
    speeds: &TravelSpeeds,
) -> LegEstimate {
    let metres = great_circle_metres(from, to) * speeds.detour_factor.max(1.0);
    let metres_per_second = speeds.kmh(mode) / 3.6;
    let duration = if metres_per_second > 0.0 {
        (metres / metres_per_second).round() as u32
    } else {
        u32::MAX
    };
    LegEstimate {
        duration,
        distance: metres.round() as u32,
    }
}
