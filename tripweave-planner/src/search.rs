//! Depth-first branch and bound from one starting place.
//!
//! A [`Branch`] owns its open set, fixed queue and route; children are built
//! as fresh values so concurrent searches never share mutable state. The
//! only cross-task state is the [`ResultBoard`] and the [`SearchBudget`].

use std::cmp::Ordering;

use log::trace;
use tripweave_core::{Itinerary, PlaceId, Stop, TravelMode, WeekInstant};

use crate::board::ResultBoard;
use crate::budget::SearchBudget;
use crate::problem::{Problem, START};
use crate::reward::RewardGrid;

/// Where the car is in driving mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Car {
    /// Travelling with the user.
    WithUser,
    /// Left at a node while the user walks on.
    ParkedAt(usize),
}

/// How the user leaves a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Leg {
    pub(crate) mode: TravelMode,
    pub(crate) seconds: u32,
    pub(crate) metres: u32,
    pub(crate) park_here: bool,
    pub(crate) get_car_back: bool,
}

#[derive(Debug, Clone, Copy)]
struct Visit {
    node: usize,
    planned_at: WeekInstant,
    wait: u32,
    /// Where the car waits while the user is here.
    car_at: Option<usize>,
    leg: Option<Leg>,
}

/// One partial itinerary.
#[derive(Debug, Clone)]
pub(crate) struct Branch {
    open: Vec<usize>,
    fixed: Vec<usize>,
    route: Vec<Visit>,
    departure: WeekInstant,
    score: f64,
    car: Option<Car>,
    start_id: PlaceId,
}

impl Branch {
    /// The synthetic start at the opening of the planning window.
    pub(crate) fn root(problem: &Problem) -> Self {
        let at = problem.window.start;
        Self {
            open: problem.open.clone(),
            fixed: problem.fixed.clone(),
            route: vec![Visit {
                node: START,
                planned_at: at,
                wait: 0,
                car_at: None,
                leg: None,
            }],
            departure: at.plus_seconds(problem.visit_seconds(START)),
            score: 0.0,
            car: (problem.mode == TravelMode::Driving).then_some(Car::WithUser),
            start_id: PlaceId::START,
        }
    }

    fn current(&self) -> usize {
        self.route.last().map_or(START, |v| v.node)
    }

    fn planned_at(&self) -> WeekInstant {
        self.route.last().map_or(self.departure, |v| v.planned_at)
    }
}

/// Counters for one search task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SearchStats {
    pub(crate) explored: u64,
    pub(crate) pruned: u64,
}

impl SearchStats {
    pub(crate) const fn merge(self, other: Self) -> Self {
        Self {
            explored: self.explored.saturating_add(other.explored),
            pruned: self.pruned.saturating_add(other.pruned),
        }
    }
}

/// A sequential search over one subtree.
pub(crate) struct Search<'a> {
    problem: &'a Problem,
    rewards: &'a RewardGrid,
    budget: &'a SearchBudget,
    board: &'a ResultBoard,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    pub(crate) const fn new(
        problem: &'a Problem,
        rewards: &'a RewardGrid,
        budget: &'a SearchBudget,
        board: &'a ResultBoard,
    ) -> Self {
        Self {
            problem,
            rewards,
            budget,
            board,
            stats: SearchStats {
                explored: 0,
                pruned: 0,
            },
        }
    }

    pub(crate) const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Explore `branch` and everything below it until the budget runs out.
    #[expect(
        clippy::float_arithmetic,
        reason = "pruning compares the score plus an optimistic bound"
    )]
    pub(crate) fn explore(&mut self, branch: Branch) {
        if self.budget.is_exhausted() {
            return;
        }
        self.stats.explored = self.stats.explored.saturating_add(1);
        if branch.score + self.bound(&branch) <= self.board.best() {
            self.stats.pruned = self.stats.pruned.saturating_add(1);
            return;
        }
        let children = self.children(&branch);
        if children.is_empty() {
            self.record(&branch);
            return;
        }
        for child in children {
            self.explore(child);
        }
    }

    /// Feasible next steps, best first.
    ///
    /// The earliest reachable fixed place is due when no open place can be
    /// slotted in before it; a due place is the only child.
    pub(crate) fn children(&self, branch: &Branch) -> Vec<Branch> {
        let mut open: Vec<(usize, Branch)> = branch
            .open
            .iter()
            .filter_map(|&n| self.step(branch, n).map(|child| (n, child)))
            .collect();
        let next_fixed = branch
            .fixed
            .iter()
            .find_map(|&f| self.step(branch, f).map(|child| (f, child)));
        if let Some((fixed, child)) = next_fixed {
            let deferrable = open.iter().any(|(_, o)| self.step(o, fixed).is_some());
            if !deferrable {
                return vec![child];
            }
        }
        let hour = branch.planned_at().hour_bucket();
        let from = branch.current();
        open.sort_by(|(a, _), (b, _)| self.order(hour, from, *a, *b));
        open.into_iter().map(|(_, child)| child).collect()
    }

    fn order(&self, hour: usize, from: usize, a: usize, b: usize) -> Ordering {
        let reward_a = self.rewards.reward(hour, from, a);
        let reward_b = self.rewards.reward(hour, from, b);
        let key = |i: usize| {
            self.problem
                .node(i)
                .map(|n| (n.place.time_frame.openness(), n.place.id))
        };
        reward_b
            .total_cmp(&reward_a)
            .then_with(|| key(a).cmp(&key(b)))
    }

    /// Move from the branch's current node to `to`, or `None` when the move
    /// breaks the window, the opening hours or a fixed time.
    #[expect(clippy::float_arithmetic, reason = "scores accumulate rewards")]
    fn step(&self, branch: &Branch, to: usize) -> Option<Branch> {
        let node = self.problem.node(to)?;
        let from = branch.current();
        let (leg, car) = self.leg(from, to, branch.car);
        let arrival = branch.departure.plus_seconds(leg.seconds);
        let tolerance = self.problem.tolerance;
        let start = match node.fixed {
            Some(at) if arrival.seconds() > at.seconds().saturating_add(tolerance) => return None,
            Some(at) if arrival.seconds().saturating_add(tolerance) < at.seconds() => at,
            _ => arrival,
        };
        if !self.problem.window.contains(start) || !node.place.can_visit(start) {
            return None;
        }
        let departure = start.plus_seconds(self.problem.visit_seconds(to));

        let mut route = Vec::with_capacity(branch.route.len() + 1);
        route.extend_from_slice(&branch.route);
        if let Some(last) = route.last_mut() {
            last.leg = Some(leg);
        }
        route.push(Visit {
            node: to,
            planned_at: start,
            wait: start.seconds_since(arrival),
            car_at: match car {
                Some(Car::ParkedAt(k)) => Some(k),
                _ => None,
            },
            leg: None,
        });

        let reachable = |&f: &usize| {
            f != to
                && self.problem.node(f).and_then(|n| n.fixed).is_some_and(|at| {
                    at.seconds().saturating_add(tolerance) >= departure.seconds()
                })
        };
        Some(Branch {
            open: branch.open.iter().copied().filter(|&o| o != to).collect(),
            fixed: branch.fixed.iter().copied().filter(reachable).collect(),
            route,
            departure,
            score: branch.score + self.rewards.reward(branch.planned_at().hour_bucket(), from, to),
            car,
            start_id: if from == START {
                node.place.id
            } else {
                branch.start_id
            },
        })
    }

    /// Choose how to travel `from → to` given where the car is.
    ///
    /// With the car at hand, parking and walking wins only when the walk
    /// there and back is strictly faster than driving. With the car parked
    /// at `k`, fetching it wins only when walking to `k` and driving on is
    /// strictly faster than walking on and back to `k` later.
    pub(crate) fn leg(&self, from: usize, to: usize, car: Option<Car>) -> (Leg, Option<Car>) {
        let problem = self.problem;
        let walk = Leg {
            mode: TravelMode::Walking,
            seconds: problem.walk(from, to),
            metres: problem.walk_distance(from, to),
            park_here: false,
            get_car_back: false,
        };
        match car {
            None => (walk, None),
            Some(Car::WithUser) => {
                let Some((seconds, metres)) = problem.drive(from, to) else {
                    return (walk, car);
                };
                let there_and_back = walk.seconds.saturating_add(problem.walk(to, from));
                if there_and_back < seconds {
                    (
                        Leg {
                            park_here: true,
                            ..walk
                        },
                        Some(Car::ParkedAt(from)),
                    )
                } else {
                    (
                        Leg {
                            mode: TravelMode::Driving,
                            seconds,
                            metres,
                            park_here: false,
                            get_car_back: false,
                        },
                        car,
                    )
                }
            }
            Some(Car::ParkedAt(k)) => {
                let Some((seconds, metres)) = problem.drive(k, to) else {
                    return (walk, car);
                };
                let keep_walking = walk.seconds.saturating_add(problem.walk(to, k));
                let fetch = problem.walk(from, k).saturating_add(seconds);
                if fetch < keep_walking {
                    (
                        Leg {
                            mode: TravelMode::Driving,
                            seconds: fetch,
                            metres: problem.walk_distance(from, k).saturating_add(metres),
                            park_here: false,
                            get_car_back: true,
                        },
                        Some(Car::WithUser),
                    )
                } else {
                    (walk, car)
                }
            }
        }
    }

    /// Optimistic gain still available: every remaining place entered by
    /// its best transition from the current node or another remaining place.
    fn bound(&self, branch: &Branch) -> f64 {
        let current = branch.current();
        let remaining = || branch.open.iter().chain(branch.fixed.iter()).copied();
        remaining()
            .map(|r| {
                remaining()
                    .chain(std::iter::once(current))
                    .filter(|&s| s != r)
                    .map(|s| self.rewards.peak(s, r))
                    .fold(0.0_f64, f64::max)
            })
            .sum()
    }

    fn record(&self, branch: &Branch) {
        if branch.route.len() < 2 {
            return;
        }
        let recorded = self
            .board
            .offer(branch.start_id, branch.score, || self.itinerary(branch));
        if recorded {
            trace!(
                "start {} improved to {:.4} with {} stops",
                branch.start_id,
                branch.score,
                branch.route.len()
            );
        }
    }

    /// Materialise stops for a finished branch.
    fn itinerary(&self, branch: &Branch) -> Itinerary {
        let problem = self.problem;
        let mut stops = Vec::with_capacity(branch.route.len());
        for visit in &branch.route {
            let Some(node) = problem.node(visit.node) else {
                continue;
            };
            let mut stop = Stop::visit(&node.place, visit.planned_at, visit.wait);
            if let Some(leg) = visit.leg {
                stop.travel_mode = leg.mode;
                stop.duration_to_next = leg.seconds;
                stop.distance_to_next = leg.metres;
                stop.park_here = leg.park_here;
                stop.get_car_back = leg.get_car_back;
            }
            if let Some(car) = visit
                .car_at
                .filter(|&k| k != visit.node)
                .and_then(|k| problem.node(k))
            {
                stop.car_place_id = Some(car.place.id);
                stop.car_place_name = Some(car.place.name.clone());
            }
            stops.push(stop);
        }
        if let (Some(Car::ParkedAt(k)), Some(last)) = (branch.car, stops.last_mut()) {
            let current = branch.current();
            if k != current {
                last.get_car_back = true;
                last.travel_mode = TravelMode::Walking;
                last.duration_to_next = problem.walk(current, k);
                last.distance_to_next = problem.walk_distance(current, k);
            }
        }
        Itinerary::new(stops, branch.score, branch.start_id)
    }
}
