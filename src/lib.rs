//! Facade crate for the Tripweave itinerary planner.
//!
//! This crate re-exports the core domain types and exposes the planner and
//! the file-backed collaborators behind feature flags.
//!
//! ```
//! # #[cfg(all(feature = "planner", feature = "test-support"))]
//! # {
//! use std::sync::Arc;
//! use tripweave::test_support::{FlatMatrixProvider, MemoryCatalog, StaticUsers, place};
//! use tripweave::{CityRegistry, PlanManager, PlannerConfig};
//!
//! let catalog = MemoryCatalog::default().with_city("Siena", vec![place(1), place(2)]);
//! let registry = Arc::new(CityRegistry::new(catalog, FlatMatrixProvider::default()));
//! let manager = PlanManager::new(registry, StaticUsers::new(["u"]), PlannerConfig::default())?;
//! assert_eq!(manager.plan_json("not a request"), "[]");
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use tripweave_core::{
    CatalogError, City, CityError, CityRegistry, ClockTime, DaySchedule, FixedAt, Interval,
    Itinerary, ItineraryStats, ItineraryView, MatrixError, MatrixProvider, Place, PlaceCatalog,
    PlaceCategory, PlaceId, PlaceMatrix, PlanRequest, PlanRequestValidationError, PlanningWindow,
    Stop, TimeFrame, TravelMode, TravelSpeeds, UserDirectory, WeekInstant, Weekday,
};

#[cfg(feature = "test-support")]
pub use tripweave_core::test_support;

#[cfg(feature = "planner")]
pub use tripweave_planner::{
    PlanError, PlanManager, PlannerConfig, ResultBoard, SearchBudget, evaluate_reward,
};

#[cfg(feature = "data")]
pub use tripweave_data::{DataError, EstimatingMatrixProvider, JsonCatalog, MeasuredMatrices};
