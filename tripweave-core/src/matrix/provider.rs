//! Source of duration and distance matrices.

use crate::place::{Place, TravelMode};

use super::{MatrixError, PlaceMatrix};

/// Fetch pairwise durations (seconds) and distances (metres) for a city.
///
/// Implementations must return a matrix covering every id in `places`.
///
/// # Examples
///
/// ```rust
/// use tripweave_core::{MatrixError, MatrixProvider, Place, PlaceMatrix, TravelMode};
///
/// struct Flat;
///
/// impl MatrixProvider for Flat {
///     fn durations(&self, _: &str, places: &[Place], _: TravelMode) -> Result<PlaceMatrix, MatrixError> {
///         PlaceMatrix::from_fn(places.iter().map(|p| p.id).collect(), |a, b| if a == b { 0 } else { 60 })
///     }
///
///     fn distances(&self, _: &str, places: &[Place], _: TravelMode) -> Result<PlaceMatrix, MatrixError> {
///         PlaceMatrix::from_fn(places.iter().map(|p| p.id).collect(), |a, b| if a == b { 0 } else { 100 })
///     }
/// }
///
/// assert_eq!(Flat.durations("Paris", &[], TravelMode::Walking), Err(MatrixError::EmptyInput));
/// ```
pub trait MatrixProvider: Send + Sync {
    /// Travel durations in seconds between every pair of `places`.
    fn durations(
        &self,
        city: &str,
        places: &[Place],
        mode: TravelMode,
    ) -> Result<PlaceMatrix, MatrixError>;

    /// Travel distances in metres between every pair of `places`.
    fn distances(
        &self,
        city: &str,
        places: &[Place],
        mode: TravelMode,
    ) -> Result<PlaceMatrix, MatrixError>;
}
