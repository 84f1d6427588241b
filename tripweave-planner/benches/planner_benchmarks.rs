//! Criterion benchmarks for the itinerary planner.
//!
//! Measures planning time for small, medium and large requests on generated
//! walking-mode cities.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package tripweave-planner
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tripweave_core::TravelMode;
use tripweave_planner::PlannerConfig;

#[path = "../tests/planner_support.rs"]
mod planner_support;

use planner_support::{instance, manager};

/// Places per request.
const PROBLEM_SIZES: &[i64] = &[6, 9, 12];

/// Fixed seed so every run plans the same cities.
const BENCHMARK_SEED: u64 = 0x7269_7073;

fn bench_plan_times(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_time");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    for &size in PROBLEM_SIZES {
        let instance = instance(BENCHMARK_SEED, size, TravelMode::Walking);
        let config = PlannerConfig::default().with_deadline(Some(Duration::from_secs(1)));
        let planner = manager(&instance, config);
        group.bench_with_input(BenchmarkId::from_parameter(size), &instance, |b, inst| {
            b.iter(|| planner.plan(&inst.request));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plan_times);
criterion_main!(benches);
