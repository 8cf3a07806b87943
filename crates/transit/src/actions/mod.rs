//! Queued topology actions.
//!
//! Operators (UI, scripts, tests) never edit the network directly while the
//! simulation runs. They push a [`TopologyAction`] onto the
//! [`TopologyActionQueue`]; the executor drains it at the start of each
//! `FixedUpdate` tick, before any train advances, and records every outcome
//! in the [`TopologyResultLog`].

mod executor;
mod queue;
mod result_log;
mod results;


pub use executor::{execute_single, execute_topology_actions};
pub use queue::{QueuedAction, TopologyActionQueue};
pub use result_log::{LoggedAction, TopologyResultLog};
pub use results::ActionResult;

use serde::{Deserialize, Serialize};

use crate::line::{LineColor, LoopEnd};
use crate::position::Position;
use crate::station::StationShape;
use crate::{LineId, StationId, TrainId};

/// A requested change to the network. Pointer policies for insertion and
/// loop trimming come from `TopologyParams` at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TopologyAction {
    AddStation {
        position: Position,
        shape: StationShape,
    },
    RemoveStation {
        station: StationId,
    },
    CreateLine {
        a: StationId,
        b: StationId,
        color: LineColor,
        control: Position,
    },
    RemoveLine {
        line: LineId,
    },
    ExtendLine {
        line: LineId,
        station: StationId,
        control: Position,
    },
    InsertStation {
        line: LineId,
        index: usize,
        station: StationId,
        control: Position,
    },
    InsertStationFromLink {
        line: LineId,
        index: usize,
        station: StationId,
        before: Position,
        after: Position,
    },
    RemoveLineStation {
        line: LineId,
        station: StationId,
    },
    TrimLoop {
        line: LineId,
        station: StationId,
        end: LoopEnd,
    },
    SpawnTrain {
        line: LineId,
        /// Falls back to `TopologyParams::default_train_speed`.
        speed: Option<f32>,
    },
    AssignTrain {
        train: TrainId,
        line: LineId,
    },
    UnassignTrain {
        train: TrainId,
    },
    SetPaused {
        paused: bool,
    },
}
