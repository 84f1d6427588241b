//! Errors raised while building or fetching a [`PlaceMatrix`](super::PlaceMatrix).

use thiserror::Error;

use crate::place::{PlaceId, TravelMode};

/// Errors from matrix construction and [`MatrixProvider`](super::MatrixProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// No places were supplied.
    #[error("at least one place is required")]
    EmptyInput,
    /// The number of rows did not match the number of ids.
    #[error("matrix has {rows} rows, expected {expected}")]
    RowCount {
        /// Rows found.
        rows: usize,
        /// Rows expected.
        expected: usize,
    },
    /// A row had the wrong length.
    #[error("matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Row index.
        row: usize,
        /// Entries found.
        len: usize,
        /// Entries expected.
        expected: usize,
    },
    /// The same id labelled two rows.
    #[error("place {id} appears more than once")]
    DuplicatePlace {
        /// Repeated id.
        id: PlaceId,
    },
    /// A place in the catalog has no row.
    #[error("matrix does not cover place {id}")]
    MissingPlace {
        /// Uncovered id.
        id: PlaceId,
    },
    /// The provider could not produce a matrix.
    #[error("{mode} matrix for {city} is unavailable: {message}")]
    Unavailable {
        /// City name.
        city: String,
        /// Travel mode requested.
        mode: TravelMode,
        /// Provider diagnostic.
        message: String,
    },
}
