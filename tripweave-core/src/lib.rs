//! Core domain types for the Tripweave itinerary planner.
//!
//! This crate holds the vocabulary shared by the planner, the data loaders
//! and the CLI: weekly opening hours, places, per-city travel matrices, the
//! request/response wire schema, and the collaborator traits through which
//! catalogs, matrices and user checks are supplied.
//!
//! Inputs are validated at construction or decode time so the search never
//! has to second-guess them.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod catalog;
pub mod city;
pub mod clock;
pub mod itinerary;
pub mod matrix;
pub mod place;
pub mod request;
pub mod time_frame;
pub mod travel;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use catalog::{CatalogError, PlaceCatalog, UserDirectory};
pub use city::{City, CityError, CityRegistry, TravelMatrices};
pub use clock::{ClockTime, ClockTimeError, SECONDS_PER_DAY, SECONDS_PER_WEEK, WeekInstant, Weekday};
pub use itinerary::{Itinerary, ItineraryStats, ItineraryView, Stop};
pub use matrix::{MatrixError, MatrixProvider, MatrixRecord, PlaceMatrix};
pub use place::{
    FixedAt, MAX_RATING, Place, PlaceBuilder, PlaceCategory, PlaceId, PlaceMetadata, TravelMode,
};
pub use request::{
    MAX_VISIT_SECONDS, PlanRequest, PlanRequestValidationError, Preferences, RequestedPlace,
    StartPoint,
};
pub use time_frame::{
    DaySchedule, Interval, OpeningPeriod, Openness, PlanningWindow, TimeFrame, TimeFrameError,
};
pub use travel::{LegEstimate, TravelSpeeds};
