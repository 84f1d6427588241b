//! Command-line interface for the Tripweave planner.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;

pub use error::CliError;
use plan::{PlanArgs, run_plan};

const ARG_PLAN_REQUEST: &str = "request";
const ARG_PLAN_CATALOG_DIR: &str = "catalog-dir";
const ARG_PLAN_DEADLINE_MS: &str = "deadline-ms";
const ARG_PLAN_WORKERS: &str = "workers";
const ENV_PLAN_REQUEST: &str = "TRIPWEAVE_CMDS_PLAN_REQUEST_PATH";

/// Run the Tripweave CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, when the
/// catalog or request cannot be read, or when planning fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tripweave",
    about = "Plan multi-stop city itineraries from a catalog directory",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan itineraries for a JSON request.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
