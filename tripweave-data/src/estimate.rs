//! Matrices estimated from great-circle distance.

use std::collections::HashMap;

use geo::Coord;
use tripweave_core::{
    MatrixError, MatrixProvider, Place, PlaceId, PlaceMatrix, TravelMode, TravelSpeeds, travel,
};

/// Derives durations and distances from coordinates and average speeds.
///
/// Used when a city has no measured matrices. Every pair gets a value, so
/// the result always covers the places asked for.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tripweave_core::{MatrixProvider, Place, PlaceId, TravelMode};
/// use tripweave_data::EstimatingMatrixProvider;
///
/// let places = vec![
///     Place::builder(PlaceId(1), "Duomo", Coord { x: 9.1916, y: 45.4642 }).build(),
///     Place::builder(PlaceId(2), "Castello", Coord { x: 9.1795, y: 45.4705 }).build(),
/// ];
/// let provider = EstimatingMatrixProvider::default();
/// let walk = provider.durations("Milan", &places, TravelMode::Walking)?;
/// let drive = provider.durations("Milan", &places, TravelMode::Driving)?;
/// assert!(walk.get(PlaceId(1), PlaceId(2)) > drive.get(PlaceId(1), PlaceId(2)));
/// # Ok::<(), tripweave_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EstimatingMatrixProvider {
    speeds: TravelSpeeds,
}

impl EstimatingMatrixProvider {
    /// Estimate with the given speeds.
    #[must_use]
    pub const fn new(speeds: TravelSpeeds) -> Self {
        Self { speeds }
    }

    fn build<F>(places: &[Place], mut value: F) -> Result<PlaceMatrix, MatrixError>
    where
        F: FnMut(Coord<f64>, Coord<f64>) -> u32,
    {
        let locations: HashMap<PlaceId, Coord<f64>> =
            places.iter().map(|p| (p.id, p.location)).collect();
        let ids = places.iter().map(|p| p.id).collect();
        PlaceMatrix::from_fn(ids, |a, b| {
            match (locations.get(&a), locations.get(&b)) {
                (Some(&from), Some(&to)) if a != b => value(from, to),
                _ => 0,
            }
        })
    }
}

impl MatrixProvider for EstimatingMatrixProvider {
    fn durations(
        &self,
        _city: &str,
        places: &[Place],
        mode: TravelMode,
    ) -> Result<PlaceMatrix, MatrixError> {
        Self::build(places, |from, to| {
            travel::estimate(from, to, mode, &self.speeds).duration
        })
    }

    fn distances(
        &self,
        _city: &str,
        places: &[Place],
        mode: TravelMode,
    ) -> Result<PlaceMatrix, MatrixError> {
        Self::build(places, |from, to| {
            travel::estimate(from, to, mode, &self.speeds).distance
        })
    }
}
