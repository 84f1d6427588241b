//! Behavioural tests for `CityRegistry` using rstest-bdd.

use std::cell::RefCell;
use std::sync::Arc;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tripweave_core::{
    CatalogError, City, CityError, CityRegistry, MatrixError, MatrixProvider, Place, PlaceCatalog,
    PlaceId, PlaceMatrix, TravelMode,
};

/// Serves three attractions for Springfield only.
#[derive(Debug)]
struct SpringfieldCatalog;

impl PlaceCatalog for SpringfieldCatalog {
    fn places(&self, city: &str) -> Result<Vec<Place>, CatalogError> {
        if city != "Springfield" {
            return Err(CatalogError::UnknownCity {
                city: city.to_owned(),
            });
        }
        Ok((1..=3)
            .map(|id| Place::builder(PlaceId(id), format!("p{id}"), Coord { x: 0.0, y: 0.0 }).build())
            .collect())
    }
}

/// One minute and one hundred metres between any two places.
#[derive(Debug)]
struct UnitMatrices;

impl MatrixProvider for UnitMatrices {
    fn durations(&self, _: &str, places: &[Place], _: TravelMode) -> Result<PlaceMatrix, MatrixError> {
        PlaceMatrix::from_fn(places.iter().map(|p| p.id).collect(), |a, b| if a == b { 0 } else { 60 })
    }

    fn distances(&self, _: &str, places: &[Place], _: TravelMode) -> Result<PlaceMatrix, MatrixError> {
        PlaceMatrix::from_fn(places.iter().map(|p| p.id).collect(), |a, b| if a == b { 0 } else { 100 })
    }
}

type Registry = CityRegistry<SpringfieldCatalog, UnitMatrices>;

#[derive(Debug)]
struct RegistryWorld {
    registry: RefCell<Option<Registry>>,
    loaded: RefCell<Vec<Result<Arc<City>, CityError>>>,
}

impl RegistryWorld {
    fn new() -> Self {
        Self {
            registry: RefCell::new(None),
            loaded: RefCell::new(Vec::new()),
        }
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn request(&self, name: &str) {
        let registry = self.registry.borrow();
        let outcome = registry
            .as_ref()
            .expect("registry should be configured")
            .city(name);
        self.loaded.borrow_mut().push(outcome);
    }
}

#[fixture]
fn world() -> RegistryWorld {
    RegistryWorld::new()
}

#[given("a catalog with the city Springfield")]
fn given_catalog(world: &RegistryWorld) {
    world
        .registry
        .replace(Some(CityRegistry::new(SpringfieldCatalog, UnitMatrices)));
}

#[when("Springfield is requested twice")]
fn when_requested_twice(world: &RegistryWorld) {
    world.request("Springfield");
    world.request("Springfield");
}

#[when("Shelbyville is requested")]
fn when_unknown_requested(world: &RegistryWorld) {
    world.request("Shelbyville");
}

#[when("walking matrices are ensured for Springfield")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_matrices_ensured(world: &RegistryWorld) {
    world.request("Springfield");
    let loaded = world.loaded.borrow();
    let city = loaded
        .first()
        .and_then(|r| r.as_ref().ok())
        .expect("Springfield should load");
    let registry = world.registry.borrow();
    registry
        .as_ref()
        .expect("registry should be configured")
        .ensure_matrices(city, TravelMode::Walking)
        .expect("flat provider always succeeds");
}

#[then("both requests share one cached city")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_shared(world: &RegistryWorld) {
    let loaded = world.loaded.borrow();
    let first = loaded.first().and_then(|r| r.as_ref().ok()).expect("first load succeeds");
    let second = loaded.get(1).and_then(|r| r.as_ref().ok()).expect("second load succeeds");
    assert!(Arc::ptr_eq(first, second));
    assert_eq!(first.len(), 3);
}

#[then("Springfield has walking durations and distances")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_has_matrices(world: &RegistryWorld) {
    let loaded = world.loaded.borrow();
    let city = loaded.first().and_then(|r| r.as_ref().ok()).expect("Springfield should load");
    assert!(city.has_durations(TravelMode::Walking));
    assert!(city.has_distances(TravelMode::Walking));
    assert!(!city.has_durations(TravelMode::Driving));
}

#[then("an unknown city error is returned")]
fn then_unknown(world: &RegistryWorld) {
    let loaded = world.loaded.borrow();
    assert!(matches!(
        loaded.first(),
        Some(Err(CityError::Catalog(CatalogError::UnknownCity { .. })))
    ));
}

#[scenario(path = "tests/features/city_registry.feature", index = 0)]
fn cached_city(world: RegistryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/city_registry.feature", index = 1)]
fn matrices_on_demand(world: RegistryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/city_registry.feature", index = 2)]
fn unknown_city(world: RegistryWorld) {
    let _ = world;
}
