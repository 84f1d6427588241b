//! Error types emitted by the Tripweave CLI.
//!
//! Many helpers return `Result<_, CliError>` and the workspace enables
//! `clippy::result_large_err`, so large sources are kept behind their own
//! boxes or `Arc`s.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use tripweave_data::DataError;
use tripweave_planner::PlanError;

/// Errors emitted by the Tripweave CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Option name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Option name.
        field: &'static str,
        /// Path that was given.
        path: Utf8PathBuf,
    },
    /// The request file could not be read.
    #[error("failed to read plan request at {path:?}: {source}")]
    ReadPlanRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The request file is not a valid plan request.
    #[error("failed to parse plan request JSON at {path:?}: {source}")]
    ParsePlanRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The catalog directory could not be opened.
    #[error(transparent)]
    Catalog(#[from] DataError),
    /// The planner rejected the request or could not run.
    #[error("planning failed: {source}")]
    Plan {
        /// Planner error.
        #[source]
        source: Box<PlanError>,
    },
    /// Serialising the itineraries failed.
    #[error("failed to serialise itineraries: {0}")]
    SerialiseItineraries(#[source] serde_json::Error),
    /// Writing the itineraries failed.
    #[error("failed to write itineraries: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<PlanError> for CliError {
    fn from(source: PlanError) -> Self {
        Self::Plan {
            source: Box::new(source),
        }
    }
}
