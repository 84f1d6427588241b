//! Collaborators that supply places and check users.

use thiserror::Error;

use crate::place::Place;

/// Errors from [`PlaceCatalog::places`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog has no entry for the city.
    #[error("unknown city: {city}")]
    UnknownCity {
        /// Requested city name.
        city: String,
    },
    /// The catalog exists but could not be read or decoded.
    #[error("catalog for {city} is unreadable: {message}")]
    Unreadable {
        /// Requested city name.
        city: String,
        /// Source diagnostic.
        message: String,
    },
}

/// Source of a city's places.
///
/// # Examples
///
/// ```rust
/// use tripweave_core::{CatalogError, Place, PlaceCatalog};
///
/// struct Nowhere;
///
/// impl PlaceCatalog for Nowhere {
///     fn places(&self, city: &str) -> Result<Vec<Place>, CatalogError> {
///         Err(CatalogError::UnknownCity { city: city.to_owned() })
///     }
/// }
///
/// assert!(Nowhere.places("Atlantis").is_err());
/// ```
pub trait PlaceCatalog: Send + Sync {
    /// Every place known for `city`.
    fn places(&self, city: &str) -> Result<Vec<Place>, CatalogError>;
}

/// Source of known user ids.
pub trait UserDirectory: Send + Sync {
    /// Whether `uid` is a registered user.
    fn contains_user(&self, uid: &str) -> bool;
}

impl<T: PlaceCatalog + ?Sized> PlaceCatalog for std::sync::Arc<T> {
    fn places(&self, city: &str) -> Result<Vec<Place>, CatalogError> {
        (**self).places(city)
    }
}

impl<T: UserDirectory + ?Sized> UserDirectory for std::sync::Arc<T> {
    fn contains_user(&self, uid: &str) -> bool {
        (**self).contains_user(uid)
    }
}
