//! Pairwise travel matrices between the places of a city.
//!
//! A [`PlaceMatrix`] stores one value per ordered pair of places: seconds for
//! duration matrices and metres for distance matrices. A [`MatrixProvider`]
//! produces them on demand for one city and travel mode.

mod error;
mod provider;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use error::MatrixError;
pub use provider::MatrixProvider;

use crate::place::PlaceId;

/// Square matrix indexed by [`PlaceId`].
///
/// # Examples
/// ```
/// use tripweave_core::{PlaceId, PlaceMatrix};
///
/// let ids = vec![PlaceId(1), PlaceId(2)];
/// let matrix = PlaceMatrix::new(ids, vec![vec![0, 60], vec![75, 0]])?;
/// assert_eq!(matrix.get(PlaceId(2), PlaceId(1)), Some(75));
/// assert_eq!(matrix.get(PlaceId(2), PlaceId(9)), None);
/// # Ok::<(), tripweave_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRecord", into = "MatrixRecord")]
pub struct PlaceMatrix {
    ids: Vec<PlaceId>,
    index: HashMap<PlaceId, usize>,
    values: Vec<u32>,
}

impl PlaceMatrix {
    /// Build a matrix from row-major values; `rows[i][j]` is the value from
    /// `ids[i]` to `ids[j]`.
    pub fn new(ids: Vec<PlaceId>, rows: Vec<Vec<u32>>) -> Result<Self, MatrixError> {
        let n = ids.len();
        if n == 0 {
            return Err(MatrixError::EmptyInput);
        }
        if rows.len() != n {
            return Err(MatrixError::RowCount {
                rows: rows.len(),
                expected: n,
            });
        }
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(MatrixError::NotSquare {
                row,
                len: bad.len(),
                expected: n,
            });
        }
        let index = index_ids(&ids)?;
        let values = rows.into_iter().flatten().collect();
        Ok(Self { ids, index, values })
    }

    /// Build a matrix by evaluating `value(from, to)` for every ordered pair.
    pub fn from_fn<F>(ids: Vec<PlaceId>, mut value: F) -> Result<Self, MatrixError>
    where
        F: FnMut(PlaceId, PlaceId) -> u32,
    {
        if ids.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        let index = index_ids(&ids)?;
        let values = ids
            .iter()
            .flat_map(|from| ids.iter().map(move |to| (*from, *to)))
            .map(|(from, to)| value(from, to))
            .collect();
        Ok(Self { ids, index, values })
    }

    /// Value from `from` to `to`, or `None` when either id is not covered.
    #[must_use]
    pub fn get(&self, from: PlaceId, to: PlaceId) -> Option<u32> {
        let row = *self.index.get(&from)?;
        let col = *self.index.get(&to)?;
        self.values.get(row * self.ids.len() + col).copied()
    }

    /// Whether `id` has a row in the matrix.
    #[must_use]
    pub fn contains(&self, id: PlaceId) -> bool {
        self.index.contains_key(&id)
    }

    /// Check that every id in `ids` is covered.
    pub fn covers<I>(&self, ids: I) -> Result<(), MatrixError>
    where
        I: IntoIterator<Item = PlaceId>,
    {
        ids.into_iter()
            .find(|id| !self.contains(*id))
            .map_or(Ok(()), |id| Err(MatrixError::MissingPlace { id }))
    }

    /// Ids in row order.
    #[must_use]
    pub const fn ids(&self) -> &[PlaceId] {
        self.ids.as_slice()
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the matrix has no rows. Never true for a constructed matrix.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn index_ids(ids: &[PlaceId]) -> Result<HashMap<PlaceId, usize>, MatrixError> {
    let mut index = HashMap::with_capacity(ids.len());
    for (row, id) in ids.iter().enumerate() {
        if index.insert(*id, row).is_some() {
            return Err(MatrixError::DuplicatePlace { id: *id });
        }
    }
    Ok(index)
}

/// Serialised form of a [`PlaceMatrix`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRecord {
    /// Row and column ids.
    pub ids: Vec<PlaceId>,
    /// Row-major values.
    pub rows: Vec<Vec<u32>>,
}

impl TryFrom<MatrixRecord> for PlaceMatrix {
    type Error = MatrixError;

    fn try_from(record: MatrixRecord) -> Result<Self, Self::Error> {
        Self::new(record.ids, record.rows)
    }
}

impl From<PlaceMatrix> for MatrixRecord {
    fn from(matrix: PlaceMatrix) -> Self {
        let n = matrix.ids.len();
        let rows = if n == 0 {
            Vec::new()
        } else {
            matrix.values.chunks(n).map(<[u32]>::to_vec).collect()
        };
        Self {
            ids: matrix.ids,
            rows,
        }
    }
}
