//! Measured matrices from the catalog directory, with a fallback.

use std::sync::Arc;

use log::{debug, warn};
use tripweave_core::{MatrixError, MatrixProvider, Place, PlaceMatrix, TravelMode};

use crate::catalog::JsonCatalog;
use crate::record::ModeMatrices;

/// Which matrix of a [`ModeMatrices`] pair is being served.
#[derive(Debug, Clone, Copy)]
enum Kind {
    Durations,
    Distances,
}

impl Kind {
    const fn pick(self, matrices: &ModeMatrices) -> Option<&PlaceMatrix> {
        match self {
            Self::Durations => matrices.durations.as_ref(),
            Self::Distances => matrices.distances.as_ref(),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Durations => "durations",
            Self::Distances => "distances",
        }
    }
}

/// Serves `<city>.matrices.json` when it covers the requested places and
/// defers to `fallback` otherwise.
///
/// A matrices file that exists but cannot be decoded is an error, not a
/// reason to fall back.
#[derive(Debug, Clone)]
pub struct MeasuredMatrices<F> {
    catalog: Arc<JsonCatalog>,
    fallback: F,
}

impl<F: MatrixProvider> MeasuredMatrices<F> {
    /// Read measured matrices from `catalog`, falling back to `fallback`.
    #[must_use]
    pub const fn new(catalog: Arc<JsonCatalog>, fallback: F) -> Self {
        Self { catalog, fallback }
    }

    fn measured(
        &self,
        city: &str,
        places: &[Place],
        mode: TravelMode,
        kind: Kind,
    ) -> Result<Option<PlaceMatrix>, MatrixError> {
        let Some(record) = self
            .catalog
            .load_matrices(city)
            .map_err(|err| err.into_matrix_error(city, mode))?
        else {
            debug!("no measured matrices for {city}");
            return Ok(None);
        };
        let Some(matrix) = kind.pick(record.mode(mode)) else {
            debug!("no measured {mode} {} for {city}", kind.label());
            return Ok(None);
        };
        match matrix.covers(places.iter().map(|p| p.id)) {
            Ok(()) => Ok(Some(matrix.clone())),
            Err(err) => {
                warn!(
                    "measured {mode} {} for {city} are stale ({err}); estimating instead",
                    kind.label()
                );
                Ok(None)
            }
        }
    }
}

impl<F: MatrixProvider> MatrixProvider for MeasuredMatrices<F> {
    fn durations(
        &self,
        city: &str,
        places: &[Place],
        mode: TravelMode,
    ) -> Result<PlaceMatrix, MatrixError> {
        match self.measured(city, places, mode, Kind::Durations)? {
            Some(matrix) => Ok(matrix),
            None => self.fallback.durations(city, places, mode),
        }
    }

    fn distances(
        &self,
        city: &str,
        places: &[Place],
        mode: TravelMode,
    ) -> Result<PlaceMatrix, MatrixError> {
        match self.measured(city, places, mode, Kind::Distances)? {
            Some(matrix) => Ok(matrix),
            None => self.fallback.distances(city, places, mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EstimatingMatrixProvider;
    use camino::Utf8Path;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;
    use tripweave_core::PlaceId;

    fn place(id: i64) -> Place {
        let x = match id {
            1 => 10.40,
            2 => 10.41,
            _ => 10.42,
        };
        Place::builder(PlaceId(id), format!("p{id}"), Coord { x, y: 43.72 }).build()
    }

    #[fixture]
    fn dir() -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("Pisa.matrices.json"),
            r#"{"walking": {"durations": {"ids": [1, 2], "rows": [[0, 777], [778, 0]]}}}"#,
        )
        .expect("write matrices");
        dir
    }

    fn provider(dir: &TempDir) -> MeasuredMatrices<EstimatingMatrixProvider> {
        let path = Utf8Path::from_path(dir.path()).expect("utf-8 temp path");
        let catalog = JsonCatalog::open(path).expect("catalog opens");
        MeasuredMatrices::new(Arc::new(catalog), EstimatingMatrixProvider::default())
    }

    #[rstest]
    fn covering_file_is_served(dir: TempDir) {
        let matrix = provider(&dir)
            .durations("Pisa", &[place(1), place(2)], TravelMode::Walking)
            .expect("matrix");
        assert_eq!(matrix.get(PlaceId(2), PlaceId(1)), Some(778));
    }

    #[rstest]
    fn missing_kind_or_mode_falls_back(dir: TempDir) {
        let provider = provider(&dir);
        let places = [place(1), place(2)];
        let distances = provider
            .distances("Pisa", &places, TravelMode::Walking)
            .expect("estimated distances");
        assert!(distances.get(PlaceId(1), PlaceId(2)).is_some_and(|m| m > 0));
        let driving = provider
            .durations("Pisa", &places, TravelMode::Driving)
            .expect("estimated durations");
        assert_ne!(driving.get(PlaceId(2), PlaceId(1)), Some(778));
    }

    #[rstest]
    fn stale_file_falls_back(dir: TempDir) {
        let matrix = provider(&dir)
            .durations("Pisa", &[place(1), place(2), place(3)], TravelMode::Walking)
            .expect("estimated matrix");
        assert!(matrix.contains(PlaceId(3)));
    }

    #[rstest]
    fn corrupt_file_is_an_error(dir: TempDir) {
        fs::write(dir.path().join("Lucca.matrices.json"), "[").expect("write");
        let err = provider(&dir)
            .durations("Lucca", &[place(1)], TravelMode::Walking)
            .expect_err("corrupt matrices");
        assert!(matches!(err, MatrixError::Unavailable { .. }));
    }
}
