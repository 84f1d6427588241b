//! Branch-and-bound itinerary search for Tripweave.
//!
//! [`PlanManager`] turns a [`PlanRequest`](tripweave_core::PlanRequest) into
//! ranked [`Itinerary`](tripweave_core::Itinerary) values. It resolves the
//! requested places against a shared
//! [`CityRegistry`](tripweave_core::CityRegistry), precomputes an hourly
//! reward grid, and searches every feasible starting place as its own task
//! on a `rayon` pool.
//!
//! The search is an anytime algorithm: a [`SearchBudget`] deadline stops it
//! cooperatively, and whatever the [`ResultBoard`] holds at that point is
//! returned. Every returned itinerary satisfies opening hours, the user's
//! window and fixed-time tolerances; only optimality is given up.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod board;
mod budget;
mod config;
mod manager;
mod meals;
mod problem;
mod reward;
mod search;

pub use board::ResultBoard;
pub use budget::SearchBudget;
pub use config::PlannerConfig;
pub use manager::{PlanError, PlanManager};
pub use reward::evaluate_reward;
