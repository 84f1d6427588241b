//! File-backed collaborators for the Tripweave planner.
//!
//! A catalog directory holds one JSON file of places per city, an optional
//! file of measured travel matrices per city, and the list of known users.
//! [`JsonCatalog`] serves places and users from it; [`MeasuredMatrices`]
//! serves its matrices and falls back to [`EstimatingMatrixProvider`] where
//! none were measured.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod catalog;
mod error;
mod estimate;
mod fs;
mod measured;
mod record;

pub use catalog::{JsonCatalog, USERS_FILE};
pub use error::DataError;
pub use estimate::EstimatingMatrixProvider;
pub use measured::MeasuredMatrices;
pub use record::{CityMatricesRecord, DEFAULT_VISIT_SECONDS, ModeMatrices, PlaceRecord};
