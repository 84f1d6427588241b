//! A directory of JSON files acting as place catalog and user directory.

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use tripweave_core::{CatalogError, Place, PlaceCatalog, UserDirectory};

use crate::error::DataError;
use crate::fs::{is_plain_name, open_dir, read_optional};
use crate::record::{CityMatricesRecord, PlaceRecord};

/// Name of the user list inside the catalog directory.
pub const USERS_FILE: &str = "users.json";

/// Catalog served from a directory of JSON files.
///
/// The directory is opened once; every later read is confined to it, so a
/// city name can never reach a file outside the catalog.
///
/// # Examples
/// ```no_run
/// use tripweave_core::PlaceCatalog;
/// use tripweave_data::JsonCatalog;
///
/// let catalog = JsonCatalog::open("catalog")?;
/// let places = catalog.load_places("Rome")?;
/// println!("{} places in Rome", places.len());
/// # Ok::<(), tripweave_data::DataError>(())
/// ```
#[derive(Debug)]
pub struct JsonCatalog {
    root: Utf8PathBuf,
    dir: fs_utf8::Dir,
    users: HashSet<String>,
}

impl JsonCatalog {
    /// Open `path` and load its user list. A missing `users.json` leaves
    /// the directory with no known users.
    ///
    /// # Errors
    /// Returns [`DataError`] when the directory cannot be opened or the user
    /// list cannot be read or decoded.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, DataError> {
        let root = path.as_ref().to_path_buf();
        let dir = open_dir(&root).map_err(|source| DataError::OpenDir {
            path: root.clone(),
            source,
        })?;
        let mut catalog = Self {
            root,
            dir,
            users: HashSet::new(),
        };
        match catalog.read_json::<Vec<String>>(USERS_FILE)? {
            Some(users) => catalog.users = users.into_iter().collect(),
            None => warn!("no {USERS_FILE} in {}; every user is unknown", catalog.root),
        }
        info!(
            "opened catalog {} with {} user(s)",
            catalog.root,
            catalog.users.len()
        );
        Ok(catalog)
    }

    /// Directory the catalog was opened from.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Places listed in `<city>.json`.
    ///
    /// # Errors
    /// Returns [`DataError::MissingCity`] when the file does not exist, and
    /// other variants when it cannot be read or decoded.
    pub fn load_places(&self, city: &str) -> Result<Vec<Place>, DataError> {
        let name = Self::file_name(city, "json")?;
        let records: Vec<PlaceRecord> =
            self.read_json(&name)?.ok_or_else(|| DataError::MissingCity {
                city: city.to_owned(),
            })?;
        debug!("loaded {} place(s) for {city}", records.len());
        Ok(records.into_iter().map(Place::from).collect())
    }

    /// Measured matrices from `<city>.matrices.json`, if the file exists.
    ///
    /// # Errors
    /// Returns [`DataError`] when the file exists but cannot be read or
    /// decoded.
    pub fn load_matrices(&self, city: &str) -> Result<Option<CityMatricesRecord>, DataError> {
        let name = Self::file_name(city, "matrices.json")?;
        self.read_json(&name)
    }

    fn file_name(city: &str, extension: &str) -> Result<String, DataError> {
        if is_plain_name(city) {
            Ok(format!("{city}.{extension}"))
        } else {
            Err(DataError::UnsafeCityName {
                city: city.to_owned(),
            })
        }
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, DataError> {
        let path = self.root.join(name);
        let Some(contents) = read_optional(&self.dir, name).map_err(|source| DataError::Read {
            path: path.clone(),
            source,
        })?
        else {
            return Ok(None);
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| DataError::Decode { path, source })
    }
}

impl PlaceCatalog for JsonCatalog {
    fn places(&self, city: &str) -> Result<Vec<Place>, CatalogError> {
        self.load_places(city)
            .map_err(|err| err.into_catalog_error(city))
    }
}

impl UserDirectory for JsonCatalog {
    fn contains_user(&self, uid: &str) -> bool {
        self.users.contains(uid)
    }
}
