use serde::{Deserialize, Serialize};

use crate::{LineId, StationId, TrainId};

/// A topology edit that was refused. The line, its stations and its trains
/// are left exactly as they were.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopologyError {
    /// `remove_station` on a loop: the caller must pick an end via `remove_loop`.
    AmbiguousLoopEndpoint,
    /// The station sits strictly between the two ends of the line.
    InteriorStation,
    /// The station is not on the line, or not at the end being edited.
    StationNotOnLine,
    IndexOutOfRange { index: usize, len: usize },
    /// A loop-only edit on a line whose ends differ.
    NotALoop,
    /// The line is down to a single station; removing it would leave no path.
    LastStation,
    /// A line cannot start and end at the same station on creation.
    SameStation,
    /// The station is already an end of the line and adding it there again
    /// would not close a loop.
    RepeatedStation,
    UnknownStation(StationId),
    UnknownLine(LineId),
    UnknownTrain(TrainId),
    /// The station is still referenced by at least one line.
    StationInUse(StationId),
}
