//! Plan command implementation for the Tripweave CLI.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tripweave_core::{CityRegistry, Itinerary, PlanRequest};
use tripweave_data::{EstimatingMatrixProvider, JsonCatalog, MeasuredMatrices};
use tripweave_planner::{PlanManager, PlannerConfig};

use crate::{
    ARG_PLAN_CATALOG_DIR, ARG_PLAN_DEADLINE_MS, ARG_PLAN_REQUEST, ARG_PLAN_WORKERS, CliError,
    ENV_PLAN_REQUEST,
};

type FileManager =
    PlanManager<Arc<JsonCatalog>, MeasuredMatrices<EstimatingMatrixProvider>, Arc<JsonCatalog>>;

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan itineraries for a JSON-encoded PlanRequest. Places, \
                 users and optional measured travel matrices are read from \
                 the catalog directory; missing matrices are estimated from \
                 coordinates.",
    about = "Plan itineraries for a request"
)]
#[ortho_config(prefix = "TRIPWEAVE")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file containing a PlanRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Directory holding `<city>.json`, `<city>.matrices.json` and `users.json`.
    #[arg(long = ARG_PLAN_CATALOG_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) catalog_dir: Option<Utf8PathBuf>,
    /// Search budget in milliseconds; `0` searches to completion.
    #[arg(long = ARG_PLAN_DEADLINE_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) deadline_ms: Option<u64>,
    /// Worker threads; defaults to one per logical core.
    #[arg(long = ARG_PLAN_WORKERS, value_name = "count")]
    #[serde(default)]
    pub(crate) workers: Option<usize>,
}

impl PlanArgs {
    pub(crate) fn into_settings(self) -> Result<PlanSettings, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanSettings::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanSettings {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Catalog directory.
    pub(crate) catalog_dir: Utf8PathBuf,
    /// Planner tunables after applying overrides.
    pub(crate) planner: PlannerConfig,
}

impl TryFrom<PlanArgs> for PlanSettings {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_REQUEST,
            env: ENV_PLAN_REQUEST,
        })?;
        let catalog_dir = args.catalog_dir.unwrap_or_else(|| Utf8PathBuf::from("."));

        let mut planner = PlannerConfig::default().with_worker_threads(args.workers);
        if let Some(ms) = args.deadline_ms {
            planner = planner.with_deadline((ms > 0).then(|| Duration::from_millis(ms)));
        }

        Ok(Self {
            request_path,
            catalog_dir,
            planner,
        })
    }
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    run_plan_with(args, &mut stdout)
}

pub(crate) fn run_plan_with(args: PlanArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let itineraries = execute_plan(args)?;
    write_itineraries(writer, &itineraries)
}

fn execute_plan(args: PlanArgs) -> Result<Vec<Itinerary>, CliError> {
    let settings = args.into_settings()?;
    let request = load_plan_request(&settings.request_path)?;
    let manager = build_manager(&settings)?;
    let itineraries = manager.try_plan(&request)?;
    info!(
        "planned {} itinerary(ies) for {} in {}",
        itineraries.len(),
        request.uid,
        request.city
    );
    Ok(itineraries)
}

fn build_manager(settings: &PlanSettings) -> Result<FileManager, CliError> {
    let catalog = Arc::new(JsonCatalog::open(&settings.catalog_dir)?);
    let estimates = EstimatingMatrixProvider::new(settings.planner.speeds);
    let matrices = MeasuredMatrices::new(Arc::clone(&catalog), estimates);
    let registry = Arc::new(CityRegistry::new(Arc::clone(&catalog), matrices));
    Ok(PlanManager::new(registry, catalog, settings.planner.clone())?)
}

/// Loads a JSON-encoded [`PlanRequest`] from disk.
pub(crate) fn load_plan_request(path: &Utf8Path) -> Result<PlanRequest, CliError> {
    let contents = read_utf8(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CliError::MissingSourceFile {
                field: ARG_PLAN_REQUEST,
                path: path.to_path_buf(),
            }
        } else {
            CliError::ReadPlanRequest {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParsePlanRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn read_utf8(path: &Utf8Path) -> io::Result<String> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path does not name a file")
    })?;
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?.read_to_string(name)
}

fn write_itineraries(writer: &mut dyn Write, itineraries: &[Itinerary]) -> Result<(), CliError> {
    let payload =
        serde_json::to_string_pretty(itineraries).map_err(CliError::SerialiseItineraries)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
