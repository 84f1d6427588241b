//! The node set and travel tables for one planning request.
//!
//! Index `0` is always the synthetic start. Matrices keyed by place id are
//! copied into dense local tables once so the search never hashes.

use log::warn;
use tripweave_core::{
    MatrixError, Place, PlaceId, PlaceMatrix, PlanningWindow, TravelMatrices, TravelMode, TravelSpeeds,
    WeekInstant, travel,
};

/// Index of the synthetic start in [`Problem::nodes`].
pub(crate) const START: usize = 0;

/// A candidate place with its resolved fixed instant.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) place: Place,
    pub(crate) fixed: Option<WeekInstant>,
}

/// Dense `n × n` table of seconds or metres.
#[derive(Debug, Clone)]
pub(crate) struct Table {
    n: usize,
    values: Vec<u32>,
}

impl Table {
    fn build<F>(n: usize, mut value: F) -> Result<Self, MatrixError>
    where
        F: FnMut(usize, usize) -> Result<u32, MatrixError>,
    {
        let mut values = Vec::with_capacity(n * n);
        for from in 0..n {
            for to in 0..n {
                values.push(if from == to { 0 } else { value(from, to)? });
            }
        }
        Ok(Self { n, values })
    }

    pub(crate) fn get(&self, from: usize, to: usize) -> u32 {
        let value = self.values.get(from * self.n + to).copied();
        debug_assert!(value.is_some(), "table lookup {from}->{to} outside {}", self.n);
        value.unwrap_or(u32::MAX)
    }
}

/// Durations and distances for one travel mode.
#[derive(Debug, Clone)]
pub(crate) struct ModeTables {
    pub(crate) time: Table,
    pub(crate) distance: Table,
}

impl ModeTables {
    fn build(
        nodes: &[Node],
        mode: TravelMode,
        matrices: &TravelMatrices,
        speeds: &TravelSpeeds,
    ) -> Result<Self, MatrixError> {
        let lookup = |from: usize,
                      to: usize,
                      measured: &PlaceMatrix,
                      seconds: bool|
         -> Result<u32, MatrixError> {
            let (a, b) = (node_place(nodes, from)?, node_place(nodes, to)?);
            if a.id.is_start() || b.id.is_start() {
                let leg = travel::estimate(a.location, b.location, mode, speeds);
                return Ok(if seconds { leg.duration } else { leg.distance });
            }
            measured
                .get(a.id, b.id)
                .ok_or(MatrixError::MissingPlace { id: b.id })
        };
        Ok(Self {
            time: Table::build(nodes.len(), |f, t| lookup(f, t, &matrices.durations, true))?,
            distance: Table::build(nodes.len(), |f, t| lookup(f, t, &matrices.distances, false))?,
        })
    }
}

fn node_place(nodes: &[Node], index: usize) -> Result<&Place, MatrixError> {
    nodes
        .get(index)
        .map(|n| &n.place)
        .ok_or(MatrixError::MissingPlace { id: PlaceId::START })
}

/// Everything a search needs, immutable once built.
#[derive(Debug, Clone)]
pub(crate) struct Problem {
    pub(crate) nodes: Vec<Node>,
    pub(crate) mode: TravelMode,
    pub(crate) window: PlanningWindow,
    pub(crate) tolerance: u32,
    pub(crate) walking: ModeTables,
    pub(crate) driving: Option<ModeTables>,
    /// Freely orderable nodes, ascending.
    pub(crate) open: Vec<usize>,
    /// Time-locked nodes, earliest fixed instant first.
    pub(crate) fixed: Vec<usize>,
}

/// Inputs to [`Problem::build`].
pub(crate) struct ProblemInput<'a> {
    pub(crate) start: Place,
    pub(crate) places: Vec<Place>,
    pub(crate) mode: TravelMode,
    pub(crate) window: PlanningWindow,
    pub(crate) tolerance: u32,
    pub(crate) walking: &'a TravelMatrices,
    pub(crate) driving: Option<&'a TravelMatrices>,
    pub(crate) speeds: &'a TravelSpeeds,
}

impl Problem {
    /// Resolve fixed times against the window and copy travel tables.
    ///
    /// Fixed places whose time falls outside the window cannot be honoured
    /// and are left out.
    pub(crate) fn build(input: ProblemInput<'_>) -> Result<Self, MatrixError> {
        let ProblemInput {
            start,
            places,
            mode,
            window,
            tolerance,
            walking,
            driving,
            speeds,
        } = input;
        let mut nodes = Vec::with_capacity(places.len() + 1);
        nodes.push(Node {
            place: start,
            fixed: None,
        });
        for place in places {
            let fixed = match place.fixed_time() {
                None => None,
                Some(time) => match window.instant_at(time) {
                    Some(instant) => Some(instant),
                    None => {
                        warn!(
                            "place {} is fixed at {time}, outside the planning window; dropping it",
                            place.id
                        );
                        continue;
                    }
                },
            };
            nodes.push(Node { place, fixed });
        }

        let walking_tables = ModeTables::build(&nodes, TravelMode::Walking, walking, speeds)?;
        let driving_tables = match (mode, driving) {
            (TravelMode::Driving, Some(matrices)) => {
                Some(ModeTables::build(&nodes, TravelMode::Driving, matrices, speeds)?)
            }
            _ => None,
        };

        let mut open = Vec::new();
        let mut fixed = Vec::new();
        for (index, node) in nodes.iter().enumerate().skip(1) {
            if node.fixed.is_some() {
                fixed.push(index);
            } else {
                open.push(index);
            }
        }
        fixed.sort_by_key(|&i| {
            let node = nodes.get(i);
            (node.and_then(|n| n.fixed), node.map(|n| n.place.id))
        });

        Ok(Self {
            nodes,
            // Without driving tables there is no car to manage.
            mode: if driving_tables.is_some() {
                TravelMode::Driving
            } else {
                TravelMode::Walking
            },
            window,
            tolerance,
            walking: walking_tables,
            driving: driving_tables,
            open,
            fixed,
        })
    }

    /// Number of nodes including the start.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Walking seconds between two nodes.
    pub(crate) fn walk(&self, from: usize, to: usize) -> u32 {
        self.walking.time.get(from, to)
    }

    /// Walking metres between two nodes.
    pub(crate) fn walk_distance(&self, from: usize, to: usize) -> u32 {
        self.walking.distance.get(from, to)
    }

    /// Driving seconds and metres, if driving tables exist.
    pub(crate) fn drive(&self, from: usize, to: usize) -> Option<(u32, u32)> {
        self.driving
            .as_ref()
            .map(|t| (t.time.get(from, to), t.distance.get(from, to)))
    }

    /// Visit duration of a node in whole seconds.
    pub(crate) fn visit_seconds(&self, index: usize) -> u32 {
        self.node(index).map_or(0, |n| {
            u32::try_from(n.place.visit_duration.as_secs()).unwrap_or(u32::MAX)
        })
    }
}
