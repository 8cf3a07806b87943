//! Runtime invariant guard for the transit network.
//!
//! Runs every `validate_interval` ticks (from `TopologyParams`) after trains
//! have advanced. It checks that every line's path interleaves its stations
//! with control points, that no line revisits a station except to close a
//! loop, that station membership mirrors line contents, and that every
//! assigned train points at a waypoint of its line. Out-of-range
//! pointers are clamped through `PathFollower::revalidate`; everything else
//! is only logged, since rewriting a path would lose operator edits.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::network::TransitNetwork;
use crate::params::TopologyParams;
use crate::train::PathFollower;
use crate::{LineId, StationId, TrainId};

/// One broken invariant found during a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvariantViolation {
    /// `path.len() != 2 * stations - 1`.
    PathLength {
        line: LineId,
        expected: usize,
        actual: usize,
    },
    /// `path[2i]` is not the position of the line's `i`th station.
    Interleave { line: LineId, index: usize },
    /// A station appears twice on a line other than as both ends of a loop.
    RepeatedStation { line: LineId, station: StationId },
    /// A line references a station the network doesn't hold.
    UnknownStation { line: LineId, station: StationId },
    /// Station and line disagree on whether the line stops there, or the
    /// station lists the line more than once.
    Membership { line: LineId, station: StationId },
    /// A train on `line` points past the end of its path.
    PointerOutOfRange {
        train: TrainId,
        line: LineId,
        pointer: usize,
        len: usize,
    },
    /// A train names a line that doesn't list it.
    OrphanTrain { train: TrainId, line: LineId },
}

/// Counts from the last validation pass. Used by integration tests.
#[derive(Resource, Default, Debug)]
pub struct TopologyInvariantViolations {
    pub path_length: u32,
    pub interleave: u32,
    pub repeated_station: u32,
    pub membership: u32,
    pub pointer_out_of_range: u32,
    pub orphan_train: u32,
    /// Clock time of the last pass.
    pub last_checked: Option<u64>,
}

impl TopologyInvariantViolations {
    pub fn total(&self) -> u32 {
        self.path_length
            + self.interleave
            + self.repeated_station
            + self.membership
            + self.pointer_out_of_range
            + self.orphan_train
    }

    fn reset(&mut self) {
        let last_checked = self.last_checked;
        *self = Self {
            last_checked,
            ..Default::default()
        };
    }

    fn record(&mut self, violation: &InvariantViolation) {
        match violation {
            InvariantViolation::PathLength { .. } => self.path_length += 1,
            InvariantViolation::Interleave { .. } => self.interleave += 1,
            InvariantViolation::RepeatedStation { .. } => self.repeated_station += 1,
            InvariantViolation::UnknownStation { .. } | InvariantViolation::Membership { .. } => {
                self.membership += 1
            }
            InvariantViolation::PointerOutOfRange { .. } => self.pointer_out_of_range += 1,
            InvariantViolation::OrphanTrain { .. } => self.orphan_train += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Every broken invariant in `network`, without changing it.
pub fn find_violations(network: &TransitNetwork) -> Vec<InvariantViolation> {
    let mut found = Vec::new();

    for line in network.lines() {
        let n = line.station_count();
        let expected = (2 * n).saturating_sub(1);
        if line.path().len() != expected {
            found.push(InvariantViolation::PathLength {
                line: line.id,
                expected,
                actual: line.path().len(),
            });
        }

        for (i, &station_id) in line.stations().iter().enumerate() {
            let closing_end = line.is_loop() && i == n - 1;
            if !closing_end && line.stations()[..i].contains(&station_id) {
                found.push(InvariantViolation::RepeatedStation {
                    line: line.id,
                    station: station_id,
                });
            }
            let Some(station) = network.station(station_id) else {
                found.push(InvariantViolation::UnknownStation {
                    line: line.id,
                    station: station_id,
                });
                continue;
            };
            if line.path().get(2 * i) != Some(&station.position()) {
                found.push(InvariantViolation::Interleave {
                    line: line.id,
                    index: i,
                });
            }
        }
    }

    for station in network.stations() {
        for line in network.lines() {
            let listed = station.lines().iter().filter(|&&l| l == line.id).count();
            let stops = line.contains_station(station.id);
            if listed > 1 || (listed == 1) != stops {
                found.push(InvariantViolation::Membership {
                    line: line.id,
                    station: station.id,
                });
            }
        }
        for &line_id in station.lines() {
            if network.line(line_id).is_none() {
                found.push(InvariantViolation::Membership {
                    line: line_id,
                    station: station.id,
                });
            }
        }
    }

    for train in network.trains() {
        let Some(line_id) = train.line() else {
            continue;
        };
        match network.line(line_id) {
            Some(line) => {
                if !line.trains().contains(&train.id) {
                    found.push(InvariantViolation::OrphanTrain {
                        train: train.id,
                        line: line_id,
                    });
                }
                if train.pointer() >= line.path().len() {
                    found.push(InvariantViolation::PointerOutOfRange {
                        train: train.id,
                        line: line_id,
                        pointer: train.pointer(),
                        len: line.path().len(),
                    });
                }
            }
            None => found.push(InvariantViolation::OrphanTrain {
                train: train.id,
                line: line_id,
            }),
        }
    }

    found
}

/// Clamp every out-of-range train pointer back onto its path. Returns how
/// many trains were touched.
pub fn heal_pointers(network: &mut TransitNetwork) -> u32 {
    let lines = &network.lines;
    let mut healed = 0;
    for train in &mut network.trains {
        let Some(line) = train
            .line()
            .and_then(|id| lines.iter().find(|l| l.id == id))
        else {
            continue;
        };
        if train.pointer() >= line.path().len() {
            train.revalidate(line.path(), line.is_loop());
            healed += 1;
        }
    }
    healed
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

pub fn validate_network(
    clock: Res<Clock>,
    params: Res<TopologyParams>,
    mut network: ResMut<TransitNetwork>,
    mut violations: ResMut<TopologyInvariantViolations>,
) {
    let now = clock.current_time();
    let interval = u64::from(params.validate_interval.max(1));
    if now % interval != 0 || violations.last_checked == Some(now) {
        return;
    }
    violations.reset();
    violations.last_checked = Some(now);

    let found = find_violations(&network);
    for violation in &found {
        warn!("Invariant violation at t={}: {:?}", now, violation);
        violations.record(violation);
    }

    if violations.pointer_out_of_range > 0 {
        let healed = heal_pointers(&mut network);
        warn!("Clamped {} out-of-range train pointers", healed);
    }
}
