//! Request handling: validation, place resolution and the parallel fan-out.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, error, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;
use tripweave_core::{
    CityError, CityRegistry, Itinerary, MatrixError, MatrixProvider, Place, PlaceCatalog,
    PlanRequest, PlanRequestValidationError, PlanningWindow, TravelMode, UserDirectory,
};

use crate::board::ResultBoard;
use crate::budget::SearchBudget;
use crate::config::PlannerConfig;
use crate::meals::{MealRequest, meal_stops};
use crate::problem::{Problem, ProblemInput};
use crate::reward::RewardGrid;
use crate::search::{Branch, Search, SearchStats};

/// Reasons a request produced no itineraries.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The request failed validation.
    #[error(transparent)]
    InvalidRequest(#[from] PlanRequestValidationError),
    /// The user directory does not know the requester.
    #[error("unknown user {uid}")]
    UnknownUser {
        /// Requesting user id.
        uid: String,
    },
    /// The requested time frame is closed all week.
    #[error("the requested time frame has no open day")]
    NoOpenDay,
    /// The city could not be loaded or its matrices fetched.
    #[error(transparent)]
    City(#[from] CityError),
    /// A travel matrix did not cover a candidate place.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    /// The worker pool could not be started.
    #[error("failed to build planner thread pool: {0}")]
    Pool(#[from] ThreadPoolBuildError),
}

/// Plans itineraries against a shared [`CityRegistry`].
///
/// One worker pool serves every request; within a request each starting
/// place is searched as its own task.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use tripweave_core::test_support::{FlatMatrixProvider, MemoryCatalog, StaticUsers, place};
/// use tripweave_core::CityRegistry;
/// use tripweave_planner::{PlanManager, PlannerConfig};
///
/// let catalog = MemoryCatalog::default().with_city("Turin", vec![place(1), place(2)]);
/// let registry = Arc::new(CityRegistry::new(catalog, FlatMatrixProvider::default()));
/// let manager = PlanManager::new(registry, StaticUsers::new(["u-1"]), PlannerConfig::default())?;
///
/// let body = r#"{
///     "city": "Turin",
///     "uid": "u-1",
///     "preferences": {
///         "timeFrame": [{"day": 1, "open": "0900", "close": "1800"}],
///         "travelMode": "walking",
///         "heuristicValue": 0.5
///     },
///     "start": {"name": "Hotel", "latitude": 0.0, "longitude": 0.0},
///     "places": [{"id": 1}, {"id": 2}]
/// }"#;
/// let reply = manager.plan_json(body);
/// assert!(reply.starts_with(r#"[{"stats""#));
/// assert_eq!(manager.plan_json("not json"), "[]");
/// # Ok::<(), tripweave_planner::PlanError>(())
/// ```
pub struct PlanManager<C, M, U> {
    registry: Arc<CityRegistry<C, M>>,
    users: U,
    config: PlannerConfig,
    pool: ThreadPool,
}

impl<C, M, U> std::fmt::Debug for PlanManager<C, M, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanManager")
            .field("config", &self.config)
            .field("workers", &self.pool.current_num_threads())
            .finish_non_exhaustive()
    }
}

impl<C, M, U> PlanManager<C, M, U>
where
    C: PlaceCatalog,
    M: MatrixProvider,
    U: UserDirectory,
{
    /// Start the worker pool.
    ///
    /// # Errors
    /// Returns [`PlanError::Pool`] when the pool cannot be built.
    pub fn new(
        registry: Arc<CityRegistry<C, M>>,
        users: U,
        config: PlannerConfig,
    ) -> Result<Self, PlanError> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("tripweave-plan-{i}"));
        if let Some(workers) = config.worker_threads {
            builder = builder.num_threads(workers);
        }
        let pool = builder.build()?;
        debug!("planner pool ready with {} workers", pool.current_num_threads());
        Ok(Self {
            registry,
            users,
            config,
            pool,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// City cache shared with other planners.
    #[must_use]
    pub const fn registry(&self) -> &Arc<CityRegistry<C, M>> {
        &self.registry
    }

    /// Decode a JSON request and reply with a JSON itinerary list.
    ///
    /// Any failure, including malformed JSON, yields `"[]"`.
    #[must_use]
    pub fn plan_json(&self, body: &str) -> String {
        let itineraries = match serde_json::from_str::<PlanRequest>(body) {
            Ok(request) => self.plan(&request),
            Err(err) => {
                warn!("rejecting undecodable plan request: {err}");
                Vec::new()
            }
        };
        serde_json::to_string(&itineraries).unwrap_or_else(|err| {
            error!("failed to encode itineraries: {err}");
            "[]".to_owned()
        })
    }

    /// Best itineraries per starting place, highest score first.
    ///
    /// Never fails: errors and panics are logged and yield an empty list.
    #[must_use]
    pub fn plan(&self, request: &PlanRequest) -> Vec<Itinerary> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.try_plan(request))) {
            Ok(Ok(itineraries)) => itineraries,
            Ok(Err(err)) => {
                warn!("no plan for {} in {}: {err}", request.uid, request.city);
                Vec::new()
            }
            Err(_) => {
                error!(
                    "planner panicked on a request for {} in {}",
                    request.uid, request.city
                );
                Vec::new()
            }
        }
    }

    /// Plan with the failure reason exposed.
    ///
    /// # Errors
    /// Returns a [`PlanError`] when the request is invalid, the user or city
    /// is unknown, the time frame is closed all week, or travel matrices
    /// cannot be obtained. A request whose places are all unusable is not an
    /// error and yields an empty list.
    pub fn try_plan(&self, request: &PlanRequest) -> Result<Vec<Itinerary>, PlanError> {
        request.validate()?;
        let city = self.registry.city(&request.city)?;
        if !self.users.contains_user(&request.uid) {
            return Err(PlanError::UnknownUser {
                uid: request.uid.clone(),
            });
        }
        let preferences = &request.preferences;
        let window =
            PlanningWindow::from_frame(&preferences.time_frame).ok_or(PlanError::NoOpenDay)?;

        let mut places = Vec::with_capacity(request.places.len() + 2);
        for wanted in &request.places {
            let blended = wanted
                .duration()
                .and_then(|duration| city.blend_visit_duration(wanted.id, duration));
            let Some(mut place) = city.place(wanted.id) else {
                warn!("place {} is not in {}; skipping it", wanted.id, city.name());
                continue;
            };
            if let Some(visit) = blended {
                debug!("place {} visit blended to {}s", place.id, visit.as_secs());
            }
            if let Some(fixed) = wanted.fixed() {
                place.fixed_at = fixed;
            }
            if !place.time_frame.overlaps(&preferences.time_frame) {
                debug!("place {} is never open when the user is; skipping it", place.id);
                continue;
            }
            places.push(place);
        }
        let requested: HashSet<_> = request.places.iter().map(|p| p.id).collect();
        places.extend(meal_stops(
            &city,
            &window,
            request.start.coord(),
            &requested,
            MealRequest {
                lunch: preferences.lunch,
                dinner: preferences.dinner,
            },
            &self.config,
        ));
        if places.is_empty() {
            debug!("nothing to plan in {}", city.name());
            return Ok(Vec::new());
        }

        let walking = self.registry.ensure_matrices(&city, TravelMode::Walking)?;
        let driving = match preferences.travel_mode {
            TravelMode::Driving => Some(self.registry.ensure_matrices(&city, TravelMode::Driving)?),
            TravelMode::Walking => None,
        };
        let problem = Problem::build(ProblemInput {
            start: Place::start(request.start.name.clone(), request.start.coord()),
            places,
            mode: preferences.travel_mode,
            window,
            tolerance: self.config.tolerance_seconds(),
            walking: &walking,
            driving: driving.as_ref(),
            speeds: &self.config.speeds,
        })?;
        let rewards = RewardGrid::build(&problem, preferences.heuristic_value, &self.config);
        Ok(self.search(&problem, &rewards, &request.city))
    }

    /// Fan the starting places out over the pool and collect the board.
    fn search(&self, problem: &Problem, rewards: &RewardGrid, city: &str) -> Vec<Itinerary> {
        let budget = SearchBudget::new(self.config.deadline);
        let board = ResultBoard::new();
        let seeds = Search::new(problem, rewards, &budget, &board).children(&Branch::root(problem));
        let tasks = seeds.len();
        let stats = self.pool.install(|| {
            seeds
                .into_par_iter()
                .map(|seed| {
                    let mut search = Search::new(problem, rewards, &budget, &board);
                    search.explore(seed);
                    search.stats()
                })
                .reduce(SearchStats::default, SearchStats::merge)
        });
        info!(
            "planned {city}: {tasks} start(s), {} nodes explored, {} pruned in {:?}{}",
            stats.explored,
            stats.pruned,
            budget.elapsed(),
            if budget.deadline_reached() {
                " (deadline reached)"
            } else {
                ""
            }
        );
        board.into_ranked()
    }
}
