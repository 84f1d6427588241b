//! Errors raised while reading the catalog directory.

use camino::Utf8PathBuf;
use thiserror::Error;
use tripweave_core::{CatalogError, MatrixError, TravelMode};

/// Errors raised by the file-backed collaborators.
#[derive(Debug, Error)]
pub enum DataError {
    /// The catalog directory could not be opened.
    #[error("failed to open catalog directory {path:?}")]
    OpenDir {
        /// Directory that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A catalog file exists but could not be read.
    #[error("failed to read {path:?}")]
    Read {
        /// File inside the catalog directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A catalog file is not valid JSON for its schema.
    #[error("failed to decode {path:?}")]
    Decode {
        /// File inside the catalog directory.
        path: Utf8PathBuf,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// No places file exists for the city.
    #[error("no catalog file for city {city}")]
    MissingCity {
        /// Requested city.
        city: String,
    },
    /// The city name cannot be mapped to a file name.
    #[error("city name {city:?} is not a plain file name")]
    UnsafeCityName {
        /// Requested city.
        city: String,
    },
}

impl DataError {
    /// Map to the catalog collaborator's error type.
    #[must_use]
    pub fn into_catalog_error(self, city: &str) -> CatalogError {
        match self {
            Self::MissingCity { .. } | Self::UnsafeCityName { .. } => CatalogError::UnknownCity {
                city: city.to_owned(),
            },
            other => CatalogError::Unreadable {
                city: city.to_owned(),
                message: error_chain(&other),
            },
        }
    }

    /// Map to the matrix collaborator's error type.
    #[must_use]
    pub fn into_matrix_error(self, city: &str, mode: TravelMode) -> MatrixError {
        MatrixError::Unavailable {
            city: city.to_owned(),
            mode,
            message: error_chain(&self),
        }
    }
}

/// Render an error and its sources on one line.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unsafe_names_look_like_unknown_cities() {
        let err = DataError::UnsafeCityName {
            city: "../x".to_owned(),
        };
        assert!(matches!(
            err.into_catalog_error("../x"),
            CatalogError::UnknownCity { .. }
        ));
    }

    #[rstest]
    fn decode_failures_keep_their_cause() {
        let source = serde_json::from_str::<Vec<u8>>("{").expect_err("invalid json");
        let err = DataError::Decode {
            path: Utf8PathBuf::from("rome.json"),
            source,
        };
        let CatalogError::Unreadable { message, .. } = err.into_catalog_error("rome") else {
            panic!("decode errors are unreadable catalogs");
        };
        assert!(message.starts_with("failed to decode \"rome.json\": "));
    }
}
