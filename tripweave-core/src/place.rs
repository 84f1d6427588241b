//! Places a user can visit.
//!
//! A [`Place`] is immutable once loaded; a search records what it decided
//! about a visit in a [`crate::Stop`] instead of mutating the place.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::clock::{ClockTime, ClockTimeError, WeekInstant};
use crate::time_frame::TimeFrame;

/// Identifier of a place within a city catalog.
///
/// # Examples
/// ```
/// use tripweave_core::PlaceId;
///
/// assert!(PlaceId::START.is_start());
/// assert!(!PlaceId(7).is_start());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlaceId(pub i64);

impl PlaceId {
    /// Reserved id of the synthetic starting point.
    pub const START: Self = Self(-1);

    /// Whether this is the synthetic starting point.
    #[must_use]
    pub const fn is_start(self) -> bool {
        self.0 == Self::START.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of place this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    /// The synthetic starting point.
    Start,
    /// A sight, museum, park and so on.
    #[default]
    Attraction,
    /// Somewhere to eat.
    Restaurant,
}

/// How the user moves between places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// The user has a car and may park it.
    Driving,
    /// On foot only.
    #[default]
    Walking,
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
        })
    }
}

/// When a place must be visited.
///
/// The wire form is either the sentinel `"anytime"` or an `"HHMM"` clock
/// time.
///
/// # Examples
/// ```
/// use tripweave_core::FixedAt;
///
/// assert_eq!("anytime".parse::<FixedAt>()?, FixedAt::Anytime);
/// assert!(matches!("1400".parse::<FixedAt>()?, FixedAt::At(_)));
/// # Ok::<(), tripweave_core::ClockTimeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FixedAt {
    /// No time requirement.
    #[default]
    Anytime,
    /// Visit at approximately this time.
    At(ClockTime),
}

impl FixedAt {
    /// Sentinel used on the wire for [`FixedAt::Anytime`].
    pub const ANYTIME: &'static str = "anytime";

    /// The requested time, if any.
    #[must_use]
    pub const fn time(self) -> Option<ClockTime> {
        match self {
            Self::Anytime => None,
            Self::At(time) => Some(time),
        }
    }
}

impl FromStr for FixedAt {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(Self::ANYTIME) {
            Ok(Self::Anytime)
        } else {
            ClockTime::parse_hhmm(s).map(Self::At)
        }
    }
}

impl TryFrom<String> for FixedAt {
    type Error = ClockTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FixedAt> for String {
    fn from(value: FixedAt) -> Self {
        match value {
            FixedAt::Anytime => FixedAt::ANYTIME.to_owned(),
            FixedAt::At(time) => time.to_string(),
        }
    }
}

/// Descriptive extras carried through to clients untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceMetadata {
    /// Short address or neighbourhood.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
    /// Contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Free-form tags from the venue source.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 5.0;

/// A visitable place with its static attributes.
///
/// `location` uses `x` for longitude and `y` for latitude, as `geo` does.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Identifier, unique within a city.
    pub id: PlaceId,
    /// Display name.
    pub name: String,
    /// Position (`x` = longitude, `y` = latitude).
    pub location: Coord<f64>,
    /// Typical time spent at the place.
    pub visit_duration: Duration,
    /// Rating in `0.0..=5.0`.
    pub rating: f64,
    /// Weekly opening hours.
    pub time_frame: TimeFrame,
    /// Fixed-time requirement.
    pub fixed_at: FixedAt,
    /// Kind of place.
    pub category: PlaceCategory,
    /// Descriptive extras.
    pub metadata: PlaceMetadata,
}

impl Place {
    /// Start building a place with defaults: non-stop hours, no rating, no
    /// visit duration, an attraction.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use geo::Coord;
    /// use tripweave_core::{Place, PlaceCategory, PlaceId};
    ///
    /// let cafe = Place::builder(PlaceId(3), "Cafe", Coord { x: 2.35, y: 48.85 })
    ///     .rating(4.5)
    ///     .visit_duration(Duration::from_secs(1_800))
    ///     .category(PlaceCategory::Restaurant)
    ///     .build();
    /// assert_eq!(cafe.rating, 4.5);
    /// ```
    pub fn builder(id: PlaceId, name: impl Into<String>, location: Coord<f64>) -> PlaceBuilder {
        PlaceBuilder {
            place: Self {
                id,
                name: name.into(),
                location,
                visit_duration: Duration::ZERO,
                rating: 0.0,
                time_frame: TimeFrame::non_stop(),
                fixed_at: FixedAt::Anytime,
                category: PlaceCategory::Attraction,
                metadata: PlaceMetadata::default(),
            },
        }
    }

    /// The synthetic starting point at the user's coordinates.
    #[must_use]
    pub fn start(name: impl Into<String>, location: Coord<f64>) -> Self {
        Self::builder(PlaceId::START, name, location)
            .category(PlaceCategory::Start)
            .build()
    }

    /// Whether the place is open at `instant`.
    #[must_use]
    pub fn can_visit(&self, instant: WeekInstant) -> bool {
        self.time_frame.can_visit(instant)
    }

    /// Whether the place carries a fixed time.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self.fixed_at, FixedAt::At(_))
    }

    /// The fixed time, if any.
    #[must_use]
    pub const fn fixed_time(&self) -> Option<ClockTime> {
        self.fixed_at.time()
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }
}

/// Builder returned by [`Place::builder`].
#[derive(Debug, Clone)]
#[must_use]
pub struct PlaceBuilder {
    place: Place,
}

impl PlaceBuilder {
    /// Typical visit duration.
    pub const fn visit_duration(mut self, duration: Duration) -> Self {
        self.place.visit_duration = duration;
        self
    }

    /// Rating; values are clamped to `0.0..=5.0` and non-finite values
    /// become zero.
    pub const fn rating(mut self, rating: f64) -> Self {
        self.place.rating = if rating.is_finite() {
            rating.clamp(0.0, MAX_RATING)
        } else {
            0.0
        };
        self
    }

    /// Opening hours.
    pub const fn time_frame(mut self, frame: TimeFrame) -> Self {
        self.place.time_frame = frame;
        self
    }

    /// Fixed-time requirement.
    pub const fn fixed_at(mut self, fixed_at: FixedAt) -> Self {
        self.place.fixed_at = fixed_at;
        self
    }

    /// Category.
    pub const fn category(mut self, category: PlaceCategory) -> Self {
        self.place.category = category;
        self
    }

    /// Descriptive extras.
    pub fn metadata(mut self, metadata: PlaceMetadata) -> Self {
        self.place.metadata = metadata;
        self
    }

    /// Finish building.
    pub fn build(self) -> Place {
        self.place
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Weekday;
    use crate::time_frame::Interval;
    use rstest::rstest;

    #[rstest]
    #[case(7.5, 5.0)]
    #[case(-1.0, 0.0)]
    #[case(f64::NAN, 0.0)]
    #[case(3.2, 3.2)]
    #[expect(clippy::float_arithmetic, reason = "ratings compare within epsilon")]
    fn rating_is_clamped(#[case] raw: f64, #[case] expected: f64) {
        let place = Place::builder(PlaceId(1), "x", Coord { x: 0.0, y: 0.0 })
            .rating(raw)
            .build();
        assert!((place.rating - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    fn start_is_synthetic() {
        let start = Place::start("Hotel", Coord { x: 1.0, y: 2.0 });
        assert!(start.id.is_start());
        assert_eq!(start.category, PlaceCategory::Start);
        assert!(start.rating.abs() < f64::EPSILON);
        assert!((start.latitude() - 2.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn visitability_follows_time_frame() {
        let nine = ClockTime::from_hm(9, 0).expect("clock");
        let noon = ClockTime::from_hm(12, 0).expect("clock");
        let museum = Place::builder(PlaceId(2), "Museum", Coord { x: 0.0, y: 0.0 })
            .time_frame(TimeFrame::closed().with_timed(Weekday::Tuesday, Interval::new(nine, noon)))
            .build();
        assert!(museum.can_visit(WeekInstant::new(Weekday::Tuesday, nine)));
        assert!(!museum.can_visit(WeekInstant::new(Weekday::Tuesday, noon)));
    }

    #[rstest]
    #[case("\"anytime\"", FixedAt::Anytime)]
    #[case("\"ANYTIME\"", FixedAt::Anytime)]
    #[case("\"1400\"", FixedAt::At(ClockTime::from_hm(14, 0).expect("clock")))]
    fn fixed_at_decodes(#[case] json: &str, #[case] expected: FixedAt) {
        let decoded: FixedAt = serde_json::from_str(json).expect("valid fixedAt");
        assert_eq!(decoded, expected);
    }

    #[rstest]
    fn fixed_at_rejects_garbage() {
        assert!(serde_json::from_str::<FixedAt>("\"noonish\"").is_err());
    }
}
