//! Shared test harness modules for the Tripweave CLI.

use super::*;

mod helpers;
mod plan_steps;
