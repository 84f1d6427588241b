//! On-disk schema of the catalog directory.
//!
//! ```text
//! <root>/users.json            ["uid-1", "uid-2"]
//! <root>/<city>.json           [PlaceRecord, ...]
//! <root>/<city>.matrices.json  CityMatricesRecord (optional)
//! ```

use std::time::Duration;

use geo::Coord;
use serde::{Deserialize, Serialize};
use tripweave_core::{
    Place, PlaceCategory, PlaceId, PlaceMatrix, PlaceMetadata, TimeFrame, TravelMode,
};

/// Visit duration assumed when a record gives none: one hour.
pub const DEFAULT_VISIT_SECONDS: u64 = 3_600;

const fn default_visit_seconds() -> u64 {
    DEFAULT_VISIT_SECONDS
}

/// One place as stored in `<city>.json`.
///
/// # Examples
/// ```
/// use tripweave_core::{Place, PlaceId};
/// use tripweave_data::PlaceRecord;
///
/// let json = r#"{
///     "id": 12,
///     "name": "Pantheon",
///     "latitude": 41.8986,
///     "longitude": 12.4769,
///     "rating": 4.8,
///     "timeFrame": [{"day": 1, "open": "0900", "close": "1900"}],
///     "vicinity": "Piazza della Rotonda"
/// }"#;
/// let record: PlaceRecord = serde_json::from_str(json)?;
/// let place = Place::from(record);
/// assert_eq!(place.id, PlaceId(12));
/// assert_eq!(place.visit_duration.as_secs(), 3_600);
/// assert_eq!(place.metadata.vicinity.as_deref(), Some("Piazza della Rotonda"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    /// Identifier, unique within the city.
    pub id: PlaceId,
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Typical visit length in seconds.
    #[serde(default = "default_visit_seconds")]
    pub duration: u64,
    /// Rating in `0.0..=5.0`.
    #[serde(default)]
    pub rating: f64,
    /// Kind of place.
    #[serde(default)]
    pub category: PlaceCategory,
    /// Weekly opening hours; omitted means always open.
    #[serde(default = "TimeFrame::non_stop")]
    pub time_frame: TimeFrame,
    /// Descriptive extras.
    #[serde(flatten)]
    pub metadata: PlaceMetadata,
}

impl From<PlaceRecord> for Place {
    fn from(record: PlaceRecord) -> Self {
        let location = Coord {
            x: record.longitude,
            y: record.latitude,
        };
        Self::builder(record.id, record.name, location)
            .visit_duration(Duration::from_secs(record.duration))
            .rating(record.rating)
            .category(record.category)
            .time_frame(record.time_frame)
            .metadata(record.metadata)
            .build()
    }
}

impl From<&Place> for PlaceRecord {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id,
            name: place.name.clone(),
            latitude: place.latitude(),
            longitude: place.longitude(),
            duration: place.visit_duration.as_secs(),
            rating: place.rating,
            category: place.category,
            time_frame: place.time_frame,
            metadata: place.metadata.clone(),
        }
    }
}

/// Measured matrices for one travel mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModeMatrices {
    /// Seconds between places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durations: Option<PlaceMatrix>,
    /// Metres between places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<PlaceMatrix>,
}

/// Contents of `<city>.matrices.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CityMatricesRecord {
    /// Walking matrices.
    #[serde(default)]
    pub walking: ModeMatrices,
    /// Driving matrices.
    #[serde(default)]
    pub driving: ModeMatrices,
}

impl CityMatricesRecord {
    /// Matrices for `mode`.
    #[must_use]
    pub const fn mode(&self, mode: TravelMode) -> &ModeMatrices {
        match mode {
            TravelMode::Walking => &self.walking,
            TravelMode::Driving => &self.driving,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn minimal_record_takes_defaults() {
        let json = r#"{"id": 1, "name": "Fountain", "latitude": 1.0, "longitude": 2.0}"#;
        let place = Place::from(serde_json::from_str::<PlaceRecord>(json).expect("valid record"));
        assert_eq!(place.category, PlaceCategory::Attraction);
        assert!(place.time_frame.is_non_stop());
        assert_eq!(place.visit_duration, Duration::from_secs(DEFAULT_VISIT_SECONDS));
        assert!((place.location.x - 2.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn records_survive_a_place_round_trip() {
        let json = r#"{
            "id": 5, "name": "Trattoria", "latitude": 45.0, "longitude": 9.0,
            "duration": 5400, "rating": 4.2, "category": "restaurant",
            "timeFrame": [{"day": 5, "open": "1900", "close": "0100"}],
            "phone": "+39 02 000", "tags": {"cuisine": "milanese"}
        }"#;
        let record: PlaceRecord = serde_json::from_str(json).expect("valid record");
        let back = PlaceRecord::from(&Place::from(record.clone()));
        assert_eq!(back, record);
    }

    #[rstest]
    fn matrices_file_may_omit_modes() {
        let json = r#"{"walking": {"durations": {"ids": [1, 2], "rows": [[0, 60], [60, 0]]}}}"#;
        let record: CityMatricesRecord = serde_json::from_str(json).expect("valid matrices");
        assert!(record.mode(TravelMode::Walking).durations.is_some());
        assert!(record.mode(TravelMode::Walking).distances.is_none());
        assert_eq!(record.mode(TravelMode::Driving), &ModeMatrices::default());
    }

    #[rstest]
    fn ragged_matrix_is_rejected() {
        let json = r#"{"driving": {"durations": {"ids": [1, 2], "rows": [[0, 60], [60]]}}}"#;
        assert!(serde_json::from_str::<CityMatricesRecord>(json).is_err());
    }
}
