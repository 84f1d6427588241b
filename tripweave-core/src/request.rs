//! Planning request wire schema and its validation.

use std::collections::HashSet;
use std::time::Duration;

use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::place::{FixedAt, PlaceId, TravelMode};
use crate::time_frame::TimeFrame;

/// Longest visit a request may ask for: one day.
pub const MAX_VISIT_SECONDS: u64 = 86_400;

/// Problems found by [`PlanRequest::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanRequestValidationError {
    /// No city was named.
    #[error("city must not be empty")]
    EmptyCity,
    /// No user id was given.
    #[error("uid must not be empty")]
    EmptyUid,
    /// The efficiency weight was outside `[0, 1]`.
    #[error("heuristicValue {value} must be within [0, 1]")]
    HeuristicOutOfRange {
        /// Offending value.
        value: f64,
    },
    /// The start coordinates were not a valid position.
    #[error("start position ({latitude}, {longitude}) is not a valid coordinate")]
    InvalidStart {
        /// Requested latitude.
        latitude: f64,
        /// Requested longitude.
        longitude: f64,
    },
    /// No places were requested.
    #[error("at least one place must be requested")]
    NoPlaces,
    /// A fixed place had no usable `fixedAt`.
    #[error("place {id} is fixed but fixedAt {raw:?} is not an HHMM time")]
    InvalidFixedTime {
        /// Place id.
        id: PlaceId,
        /// Raw `fixedAt` value.
        raw: Option<String>,
    },
    /// A requested visit duration was longer than a day.
    #[error("place {id} duration {seconds}s exceeds {MAX_VISIT_SECONDS}s")]
    InvalidDuration {
        /// Place id.
        id: PlaceId,
        /// Requested seconds.
        seconds: u64,
    },
    /// The same place was requested twice.
    #[error("place {id} is requested more than once")]
    DuplicatePlace {
        /// Repeated id.
        id: PlaceId,
    },
}

/// User preferences for one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// When the user is available.
    pub time_frame: TimeFrame,
    /// How the user travels.
    pub travel_mode: TravelMode,
    /// Weight of travel efficiency against rating, in `[0, 1]`.
    pub heuristic_value: f64,
    /// Add a lunch stop.
    #[serde(default)]
    pub lunch: bool,
    /// Add a dinner stop.
    #[serde(default)]
    pub dinner: bool,
}

/// Where the user sets out from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartPoint {
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl StartPoint {
    /// Position as a `geo` coordinate (`x` = longitude).
    #[must_use]
    pub const fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }
}

/// A place the user wants in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedPlace {
    /// Catalog id.
    pub id: PlaceId,
    /// Preferred visit duration in seconds, blended with the catalog value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Whether the place must be visited at `fixed_at`.
    #[serde(default)]
    pub is_fixed: bool,
    /// Requested time, `"HHMM"`; only read when `is_fixed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_at: Option<String>,
}

impl RequestedPlace {
    /// Parsed fixed-time requirement. Unfixed places are
    /// [`FixedAt::Anytime`]; fixed places need an `"HHMM"` time.
    #[must_use]
    pub fn fixed(&self) -> Option<FixedAt> {
        if !self.is_fixed {
            return Some(FixedAt::Anytime);
        }
        match self.fixed_at.as_deref()?.parse().ok()? {
            FixedAt::Anytime => None,
            at @ FixedAt::At(_) => Some(at),
        }
    }

    /// Preferred visit duration.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration.map(Duration::from_secs)
    }
}

/// A request for itineraries.
///
/// # Examples
/// ```
/// use tripweave_core::PlanRequest;
///
/// let json = r#"{
///     "city": "Rome",
///     "uid": "u-1",
///     "preferences": {
///         "timeFrame": [{"day": 1, "open": "0900", "close": "1800"}],
///         "travelMode": "walking",
///         "heuristicValue": 0.5
///     },
///     "start": {"name": "Hotel", "latitude": 41.9, "longitude": 12.5},
///     "places": [{"id": 1}, {"id": 2, "isFixed": true, "fixedAt": "1400"}]
/// }"#;
/// let request: PlanRequest = serde_json::from_str(json)?;
/// assert!(request.validate().is_ok());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// City whose catalog to plan in.
    pub city: String,
    /// Requesting user.
    pub uid: String,
    /// Planning preferences.
    pub preferences: Preferences,
    /// Starting point.
    pub start: StartPoint,
    /// Places to consider.
    pub places: Vec<RequestedPlace>,
}

impl PlanRequest {
    /// Check the request, reporting the first problem found.
    pub fn validate(&self) -> Result<(), PlanRequestValidationError> {
        if self.city.trim().is_empty() {
            return Err(PlanRequestValidationError::EmptyCity);
        }
        if self.uid.trim().is_empty() {
            return Err(PlanRequestValidationError::EmptyUid);
        }
        let value = self.preferences.heuristic_value;
        if !(0.0..=1.0).contains(&value) {
            return Err(PlanRequestValidationError::HeuristicOutOfRange { value });
        }
        let StartPoint {
            latitude,
            longitude,
            ..
        } = self.start;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(PlanRequestValidationError::InvalidStart {
                latitude,
                longitude,
            });
        }
        if self.places.is_empty() {
            return Err(PlanRequestValidationError::NoPlaces);
        }
        if let Some(bad) = self.places.iter().find(|p| p.fixed().is_none()) {
            return Err(PlanRequestValidationError::InvalidFixedTime {
                id: bad.id,
                raw: bad.fixed_at.clone(),
            });
        }
        if let Some((id, seconds)) = self
            .places
            .iter()
            .filter_map(|p| p.duration.map(|seconds| (p.id, seconds)))
            .find(|(_, seconds)| *seconds > MAX_VISIT_SECONDS)
        {
            return Err(PlanRequestValidationError::InvalidDuration { id, seconds });
        }
        let mut seen = HashSet::with_capacity(self.places.len());
        if let Some(dup) = self.places.iter().find(|p| !seen.insert(p.id)) {
            return Err(PlanRequestValidationError::DuplicatePlace { id: dup.id });
        }
        Ok(())
    }
}
