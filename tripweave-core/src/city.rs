//! Per-city place catalog and travel matrices, and the registry caching them.
//!
//! A [`City`] is shared between concurrent requests. Its catalog sits behind
//! a read-mostly lock; each matrix is an `Arc` snapshot, so replacing one
//! never disturbs a search that already holds the previous snapshot.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use geo::Coord;
use log::{debug, info, warn};
use thiserror::Error;

use crate::catalog::{CatalogError, PlaceCatalog};
use crate::clock::WeekInstant;
use crate::matrix::{MatrixError, MatrixProvider, PlaceMatrix};
use crate::place::{Place, PlaceCategory, PlaceId, TravelMode};
use crate::travel::great_circle_metres;

/// Errors from [`CityRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CityError {
    /// The catalog could not supply the city.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The catalog returned no places.
    #[error("city {city} has no places")]
    Empty {
        /// City name.
        city: String,
    },
    /// A matrix could not be fetched or did not fit the catalog.
    #[error("{kind} matrix for {city}: {source}")]
    Matrix {
        /// City name.
        city: String,
        /// `"duration"` or `"distance"`.
        kind: &'static str,
        /// Underlying failure.
        #[source]
        source: MatrixError,
    },
}

/// Duration and distance matrices for one travel mode.
#[derive(Debug, Clone)]
pub struct TravelMatrices {
    /// Seconds between places.
    pub durations: Arc<PlaceMatrix>,
    /// Metres between places.
    pub distances: Arc<PlaceMatrix>,
}

#[derive(Debug, Default)]
struct ModeSlots {
    durations: Option<Arc<PlaceMatrix>>,
    distances: Option<Arc<PlaceMatrix>>,
}

#[derive(Debug, Default)]
struct MatrixSlots {
    driving: ModeSlots,
    walking: ModeSlots,
}

impl MatrixSlots {
    const fn mode(&self, mode: TravelMode) -> &ModeSlots {
        match mode {
            TravelMode::Driving => &self.driving,
            TravelMode::Walking => &self.walking,
        }
    }

    const fn mode_mut(&mut self, mode: TravelMode) -> &mut ModeSlots {
        match mode {
            TravelMode::Driving => &mut self.driving,
            TravelMode::Walking => &mut self.walking,
        }
    }
}

/// One city's places and travel matrices.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use geo::Coord;
/// use tripweave_core::{City, Place, PlaceId};
///
/// let museum = Place::builder(PlaceId(1), "Museum", Coord { x: 0.0, y: 0.0 })
///     .visit_duration(Duration::from_secs(3_600))
///     .build();
/// let city = City::new("Springfield", vec![museum]);
///
/// let blended = city.blend_visit_duration(PlaceId(1), Duration::from_secs(1_800));
/// assert_eq!(blended, Some(Duration::from_secs(2_700)));
/// ```
#[derive(Debug)]
pub struct City {
    name: String,
    places: RwLock<BTreeMap<PlaceId, Place>>,
    matrices: RwLock<MatrixSlots>,
}

impl City {
    /// Build a city from its catalog. Later duplicates of an id replace
    /// earlier ones.
    #[must_use]
    pub fn new(name: impl Into<String>, places: Vec<Place>) -> Self {
        let name = name.into();
        let mut by_id = BTreeMap::new();
        for place in places {
            if let Some(previous) = by_id.insert(place.id, place) {
                warn!(
                    "city {name}: duplicate place id {}, keeping the later entry",
                    previous.id
                );
            }
        }
        Self {
            name,
            places: RwLock::new(by_id),
            matrices: RwLock::new(MatrixSlots::default()),
        }
    }

    /// City name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of catalog places.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_places().len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_places().is_empty()
    }

    /// Copy of the catalog entry for `id`.
    #[must_use]
    pub fn place(&self, id: PlaceId) -> Option<Place> {
        self.read_places().get(&id).cloned()
    }

    /// Copies of every catalog place, ordered by id.
    #[must_use]
    pub fn places(&self) -> Vec<Place> {
        self.read_places().values().cloned().collect()
    }

    /// Catalog ids, ascending.
    #[must_use]
    pub fn place_ids(&self) -> Vec<PlaceId> {
        self.read_places().keys().copied().collect()
    }

    /// Average a user-supplied visit duration with the catalog value, store
    /// the result, and return it. Returns `None` for unknown ids.
    #[must_use]
    pub fn blend_visit_duration(&self, id: PlaceId, requested: Duration) -> Option<Duration> {
        let mut places = self
            .places
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let place = places.get_mut(&id)?;
        let blended = place.visit_duration.saturating_add(requested) / 2;
        place.visit_duration = blended;
        Some(blended)
    }

    /// Restaurants open at `instant` within `radius_m` metres of `origin`,
    /// best rated first, nearer first among equals.
    #[must_use]
    pub fn restaurants_near(
        &self,
        instant: WeekInstant,
        origin: Coord<f64>,
        radius_m: f64,
    ) -> Vec<Place> {
        let places = self.read_places();
        let mut found: Vec<(f64, &Place)> = places
            .values()
            .filter(|p| p.category == PlaceCategory::Restaurant && p.can_visit(instant))
            .map(|p| (great_circle_metres(origin, p.location), p))
            .filter(|(metres, _)| *metres <= radius_m)
            .collect();
        found.sort_by(|(da, a), (db, b)| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| da.partial_cmp(db).unwrap_or(Ordering::Equal))
                .then_with(|| a.id.cmp(&b.id))
        });
        found.into_iter().map(|(_, p)| p.clone()).collect()
    }

    /// Whether a duration matrix for `mode` is loaded.
    #[must_use]
    pub fn has_durations(&self, mode: TravelMode) -> bool {
        self.read_matrices().mode(mode).durations.is_some()
    }

    /// Whether a distance matrix for `mode` is loaded.
    #[must_use]
    pub fn has_distances(&self, mode: TravelMode) -> bool {
        self.read_matrices().mode(mode).distances.is_some()
    }

    /// Install a duration matrix after checking it covers the catalog.
    pub fn set_durations(&self, mode: TravelMode, matrix: PlaceMatrix) -> Result<(), MatrixError> {
        matrix.covers(self.place_ids())?;
        self.write_matrices().mode_mut(mode).durations = Some(Arc::new(matrix));
        Ok(())
    }

    /// Install a distance matrix after checking it covers the catalog.
    pub fn set_distances(&self, mode: TravelMode, matrix: PlaceMatrix) -> Result<(), MatrixError> {
        matrix.covers(self.place_ids())?;
        self.write_matrices().mode_mut(mode).distances = Some(Arc::new(matrix));
        Ok(())
    }

    /// Snapshot of both matrices for `mode`, if both are loaded.
    #[must_use]
    pub fn matrices(&self, mode: TravelMode) -> Option<TravelMatrices> {
        let slots = self.read_matrices();
        let slot = slots.mode(mode);
        Some(TravelMatrices {
            durations: Arc::clone(slot.durations.as_ref()?),
            distances: Arc::clone(slot.distances.as_ref()?),
        })
    }

    fn read_places(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<PlaceId, Place>> {
        self.places.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_matrices(&self) -> std::sync::RwLockReadGuard<'_, MatrixSlots> {
        self.matrices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_matrices(&self) -> std::sync::RwLockWriteGuard<'_, MatrixSlots> {
        self.matrices.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lazily populated cache of cities, keyed by name.
///
/// Replaces a process-wide singleton: the owner decides its lifetime and
/// shares it with the planner explicitly.
#[derive(Debug)]
pub struct CityRegistry<C, M> {
    catalog: C,
    provider: M,
    cities: RwLock<HashMap<String, Arc<City>>>,
}

impl<C: PlaceCatalog, M: MatrixProvider> CityRegistry<C, M> {
    /// Create an empty registry over the given collaborators.
    #[must_use]
    pub fn new(catalog: C, provider: M) -> Self {
        Self {
            catalog,
            provider,
            cities: RwLock::new(HashMap::new()),
        }
    }

    /// The cached city, loading it from the catalog on first use.
    pub fn city(&self, name: &str) -> Result<Arc<City>, CityError> {
        if let Some(city) = self.cached(name) {
            return Ok(city);
        }
        let places = self.catalog.places(name)?;
        if places.is_empty() {
            return Err(CityError::Empty {
                city: name.to_owned(),
            });
        }
        info!("loaded {} places for {name}", places.len());
        let fresh = Arc::new(City::new(name, places));
        let mut cities = self.cities.write().unwrap_or_else(PoisonError::into_inner);
        // Another request may have loaded the city while we fetched.
        let city = cities.entry(name.to_owned()).or_insert(fresh);
        Ok(Arc::clone(city))
    }

    /// The cached city, without loading.
    #[must_use]
    pub fn cached(&self, name: &str) -> Option<Arc<City>> {
        self.cities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Drop a cached city so the next request reloads it.
    #[must_use]
    pub fn evict(&self, name: &str) -> Option<Arc<City>> {
        self.cities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Matrices for `mode`, fetching whichever are missing first.
    pub fn ensure_matrices(&self, city: &City, mode: TravelMode) -> Result<TravelMatrices, CityError> {
        let matrix_error = |kind, source| CityError::Matrix {
            city: city.name().to_owned(),
            kind,
            source,
        };
        if !city.has_durations(mode) || !city.has_distances(mode) {
            let places = city.places();
            if !city.has_durations(mode) {
                debug!("fetching {mode} durations for {}", city.name());
                let matrix = self
                    .provider
                    .durations(city.name(), &places, mode)
                    .map_err(|e| matrix_error("duration", e))?;
                city.set_durations(mode, matrix)
                    .map_err(|e| matrix_error("duration", e))?;
            }
            if !city.has_distances(mode) {
                debug!("fetching {mode} distances for {}", city.name());
                let matrix = self
                    .provider
                    .distances(city.name(), &places, mode)
                    .map_err(|e| matrix_error("distance", e))?;
                city.set_distances(mode, matrix)
                    .map_err(|e| matrix_error("distance", e))?;
            }
        }
        city.matrices(mode).ok_or_else(|| {
            matrix_error(
                "duration",
                MatrixError::Unavailable {
                    city: city.name().to_owned(),
                    mode,
                    message: "matrix slot empty after fetch".to_owned(),
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockTime, Weekday};
    use crate::test_support::{FlatMatrixProvider, MemoryCatalog, place};
    use crate::time_frame::{Interval, TimeFrame};
    use rstest::rstest;

    fn restaurant(id: i64, rating: f64, lon: f64) -> Place {
        Place::builder(PlaceId(id), format!("r{id}"), Coord { x: lon, y: 0.0 })
            .rating(rating)
            .category(PlaceCategory::Restaurant)
            .build()
    }

    #[rstest]
    fn restaurants_rank_by_rating_then_distance() {
        let city = City::new(
            "c",
            vec![
                restaurant(1, 4.0, 0.001),
                restaurant(2, 4.5, 0.010),
                restaurant(3, 4.5, 0.002),
                restaurant(4, 5.0, 1.0),
                place(5),
            ],
        );
        let noon = WeekInstant::new(Weekday::Monday, ClockTime::from_hm(12, 0).expect("clock"));
        let ids: Vec<_> = city
            .restaurants_near(noon, Coord { x: 0.0, y: 0.0 }, 2_000.0)
            .into_iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[rstest]
    fn restaurants_must_be_open() {
        let lunch_only = Place::builder(PlaceId(1), "lunch", Coord { x: 0.0, y: 0.0 })
            .category(PlaceCategory::Restaurant)
            .time_frame(TimeFrame::closed().with_timed(
                Weekday::Monday,
                Interval::new(
                    ClockTime::from_hm(11, 0).expect("clock"),
                    ClockTime::from_hm(15, 0).expect("clock"),
                ),
            ))
            .build();
        let city = City::new("c", vec![lunch_only]);
        let evening = WeekInstant::new(Weekday::Monday, ClockTime::from_hm(19, 0).expect("clock"));
        assert!(city.restaurants_near(evening, Coord { x: 0.0, y: 0.0 }, 500.0).is_empty());
    }

    #[rstest]
    fn blending_averages_and_saturates() {
        let city = City::new("c", vec![place(1)]);
        assert_eq!(
            city.blend_visit_duration(PlaceId(1), Duration::from_secs(3_600)),
            Some(Duration::from_secs(2_700))
        );
        let huge = city.blend_visit_duration(PlaceId(1), Duration::MAX);
        assert_eq!(huge, Some(Duration::MAX / 2));
    }

    #[rstest]
    fn blending_unknown_place_is_none() {
        let city = City::new("c", vec![place(1)]);
        assert_eq!(city.blend_visit_duration(PlaceId(9), Duration::from_secs(60)), None);
    }

    #[rstest]
    fn rejects_matrix_missing_a_place() {
        let city = City::new("c", vec![place(1), place(2)]);
        let partial = PlaceMatrix::from_fn(vec![PlaceId(1)], |_, _| 0).expect("matrix");
        assert_eq!(
            city.set_durations(TravelMode::Walking, partial),
            Err(MatrixError::MissingPlace { id: PlaceId(2) })
        );
        assert!(!city.has_durations(TravelMode::Walking));
    }

    #[rstest]
    fn replacing_a_matrix_keeps_old_snapshots_alive() {
        let city = City::new("c", vec![place(1), place(2)]);
        let ids = city.place_ids();
        let matrix = |v| PlaceMatrix::from_fn(ids.clone(), move |_, _| v).expect("matrix");
        city.set_durations(TravelMode::Walking, matrix(10)).expect("fits");
        city.set_distances(TravelMode::Walking, matrix(20)).expect("fits");
        let before = city.matrices(TravelMode::Walking).expect("loaded");
        city.set_durations(TravelMode::Walking, matrix(99)).expect("fits");
        let after = city.matrices(TravelMode::Walking).expect("loaded");
        assert_eq!(before.durations.get(PlaceId(1), PlaceId(2)), Some(10));
        assert_eq!(after.durations.get(PlaceId(1), PlaceId(2)), Some(99));
    }

    #[rstest]
    fn registry_loads_once_and_reports_unknown_cities() {
        let catalog = MemoryCatalog::default().with_city("a", vec![place(1)]);
        let registry = CityRegistry::new(catalog, FlatMatrixProvider::default());
        let first = registry.city("a").expect("known city");
        let second = registry.city("a").expect("known city");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(matches!(
            registry.city("b"),
            Err(CityError::Catalog(CatalogError::UnknownCity { .. }))
        ));
    }

    #[rstest]
    fn ensure_matrices_fetches_missing_modes() {
        let catalog = MemoryCatalog::default().with_city("a", vec![place(1), place(2)]);
        let registry = CityRegistry::new(catalog, FlatMatrixProvider::default());
        let city = registry.city("a").expect("known city");
        assert!(!city.has_durations(TravelMode::Driving));
        let driving = registry
            .ensure_matrices(&city, TravelMode::Driving)
            .expect("provider succeeds");
        assert!(city.has_distances(TravelMode::Driving));
        assert!(!city.has_durations(TravelMode::Walking));
        assert_eq!(driving.distances.len(), 2);
    }
}
