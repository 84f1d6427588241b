//! Behaviour-driven step definitions driving the plan CLI scenarios.

use super::helpers::{CatalogDir, request_json, write_utf8};
use super::*;
use crate::plan::run_plan_with;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tripweave_core::{ItineraryView, PlaceId};
use tripweave_planner::PlanError;

struct PlanWorld {
    catalog: RefCell<Option<CatalogDir>>,
    include_request: RefCell<bool>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl PlanWorld {
    fn new() -> Self {
        Self {
            catalog: RefCell::new(None),
            include_request: RefCell::new(true),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn write_request(&self, contents: &[u8]) {
        let catalog = self.catalog.borrow();
        let dir = catalog.as_ref().expect("catalog directory prepared");
        write_utf8(&dir.request_path(), contents);
    }

    fn build_command_line(&self) -> Vec<String> {
        let catalog = self.catalog.borrow();
        let dir = catalog.as_ref().expect("catalog directory prepared");
        let mut argv = vec!["tripweave".to_owned(), "plan".to_owned()];
        if *self.include_request.borrow() {
            argv.push(dir.request_path().into_string());
        }
        argv.extend([
            format!("--{ARG_PLAN_CATALOG_DIR}"),
            dir.root().as_str().to_owned(),
            format!("--{ARG_PLAN_DEADLINE_MS}"),
            "0".to_owned(),
            format!("--{ARG_PLAN_WORKERS}"),
            "2".to_owned(),
        ]);
        argv
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> PlanWorld {
    PlanWorld::new()
}

#[given("a catalog directory with Lisbon")]
fn catalog_directory(#[from(world)] world: &PlanWorld) {
    world.catalog.replace(Some(CatalogDir::new()));
}

#[given("a plan request for user ana exists on disk")]
fn request_for_known_user(#[from(world)] world: &PlanWorld) {
    world.write_request(request_json("ana").as_bytes());
}

#[given("a plan request for user zed exists on disk")]
fn request_for_unknown_user(#[from(world)] world: &PlanWorld) {
    world.write_request(request_json("zed").as_bytes());
}

#[given("the plan request contains invalid JSON")]
fn request_contains_invalid_json(#[from(world)] world: &PlanWorld) {
    world.write_request(b"{ not valid json");
}

#[given("I omit the plan request path")]
fn omit_request_path(#[from(world)] world: &PlanWorld) {
    *world.include_request.borrow_mut() = false;
}

#[when("I run the plan command")]
fn run_plan_command(#[from(world)] world: &PlanWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| {
        let Command::Plan(args) = cli.command;
        let mut buffer = world.stdout.borrow_mut();
        run_plan_with(args, &mut *buffer)
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints itineraries")]
fn command_succeeds(#[from(world)] world: &PlanWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let itineraries: Vec<ItineraryView> =
        serde_json::from_str(&stdout).expect("output should be a JSON itinerary list");
    assert!(!itineraries.is_empty());
    for itinerary in &itineraries {
        assert!(itinerary.route.len() >= 2);
        assert_eq!(itinerary.route.first().map(|s| s.id), Some(PlaceId::START));
    }
}

#[then("the command fails because the request JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::ParsePlanRequest { .. } => {}
        other => panic!("expected ParsePlanRequest, found {other:?}"),
    }
}

#[then("the command fails because the request path is missing")]
fn command_fails_missing_request_path(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_PLAN_REQUEST),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the user is unknown")]
fn command_fails_unknown_user(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::Plan { source } => {
            assert!(matches!(**source, PlanError::UnknownUser { .. }));
        }
        other => panic!("expected Plan, found {other:?}"),
    }
}

macro_rules! register_plan_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/plan_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: PlanWorld) {
            let _ = world;
        }
    };
}

register_plan_scenario!(plan_happy_path, "planning a request from JSON");
register_plan_scenario!(plan_invalid_json, "rejecting invalid JSON input");
register_plan_scenario!(plan_missing_request, "rejecting missing request paths");
register_plan_scenario!(plan_unknown_user, "rejecting unknown users");
