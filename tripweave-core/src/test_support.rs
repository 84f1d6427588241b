//! In-memory collaborators for unit and behaviour tests.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use geo::Coord;

use crate::{
    CatalogError, MatrixError, MatrixProvider, Place, PlaceCatalog, PlaceId, PlaceMatrix,
    TravelMode, UserDirectory,
};

/// An attraction with id `id`, open non-stop, rated 3, visited for 30
/// minutes, placed `id` thousandths of a degree east of the origin.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "fixture ids are small enough to map onto longitudes"
)]
#[must_use]
pub fn place(id: i64) -> Place {
    let lon = id as f64 * 0.001;
    Place::builder(PlaceId(id), format!("place-{id}"), Coord { x: lon, y: 0.0 })
        .rating(3.0)
        .visit_duration(Duration::from_secs(1_800))
        .build()
}

/// Catalog backed by a map of city name to places.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    cities: HashMap<String, Vec<Place>>,
}

impl MemoryCatalog {
    /// Add or replace a city.
    #[must_use]
    pub fn with_city(mut self, name: &str, places: Vec<Place>) -> Self {
        self.cities.insert(name.to_owned(), places);
        self
    }
}

impl PlaceCatalog for MemoryCatalog {
    fn places(&self, city: &str) -> Result<Vec<Place>, CatalogError> {
        self.cities
            .get(city)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownCity {
                city: city.to_owned(),
            })
    }
}

/// Provider returning the same value for every pair of distinct places.
///
/// Driving legs take a third of the walking duration.
#[derive(Debug, Clone, Copy)]
pub struct FlatMatrixProvider {
    /// Walking seconds between distinct places.
    pub walking_seconds: u32,
    /// Metres between distinct places.
    pub metres: u32,
}

impl Default for FlatMatrixProvider {
    fn default() -> Self {
        Self {
            walking_seconds: 600,
            metres: 800,
        }
    }
}

impl MatrixProvider for FlatMatrixProvider {
    #[expect(clippy::integer_division, reason = "driving rounds down to whole seconds")]
    fn durations(
        &self,
        _city: &str,
        places: &[Place],
        mode: TravelMode,
    ) -> Result<PlaceMatrix, MatrixError> {
        let seconds = match mode {
            TravelMode::Walking => self.walking_seconds,
            TravelMode::Driving => self.walking_seconds / 3,
        };
        PlaceMatrix::from_fn(ids(places), |a, b| if a == b { 0 } else { seconds })
    }

    fn distances(
        &self,
        _city: &str,
        places: &[Place],
        _mode: TravelMode,
    ) -> Result<PlaceMatrix, MatrixError> {
        let metres = self.metres;
        PlaceMatrix::from_fn(ids(places), |a, b| if a == b { 0 } else { metres })
    }
}

/// Provider serving fixed matrices regardless of the places asked for.
#[derive(Debug, Clone, Default)]
pub struct FixedMatrixProvider {
    durations: HashMap<TravelMode, PlaceMatrix>,
    distances: HashMap<TravelMode, PlaceMatrix>,
}

impl FixedMatrixProvider {
    /// Serve `durations` and `distances` for `mode`.
    #[must_use]
    pub fn with_mode(mut self, mode: TravelMode, durations: PlaceMatrix, distances: PlaceMatrix) -> Self {
        self.durations.insert(mode, durations);
        self.distances.insert(mode, distances);
        self
    }

    fn lookup(
        table: &HashMap<TravelMode, PlaceMatrix>,
        city: &str,
        mode: TravelMode,
    ) -> Result<PlaceMatrix, MatrixError> {
        table.get(&mode).cloned().ok_or_else(|| MatrixError::Unavailable {
            city: city.to_owned(),
            mode,
            message: "no fixture matrix".to_owned(),
        })
    }
}

impl MatrixProvider for FixedMatrixProvider {
    fn durations(&self, city: &str, _places: &[Place], mode: TravelMode) -> Result<PlaceMatrix, MatrixError> {
        Self::lookup(&self.durations, city, mode)
    }

    fn distances(&self, city: &str, _places: &[Place], mode: TravelMode) -> Result<PlaceMatrix, MatrixError> {
        Self::lookup(&self.distances, city, mode)
    }
}

/// Directory of a fixed set of user ids.
#[derive(Debug, Clone, Default)]
pub struct StaticUsers {
    users: HashSet<String>,
}

impl StaticUsers {
    /// Directory containing `uids`.
    #[must_use]
    pub fn new<I, S>(uids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: uids.into_iter().map(Into::into).collect(),
        }
    }
}

impl UserDirectory for StaticUsers {
    fn contains_user(&self, uid: &str) -> bool {
        self.users.contains(uid)
    }
}

fn ids(places: &[Place]) -> Vec<PlaceId> {
    places.iter().map(|p| p.id).collect()
}
