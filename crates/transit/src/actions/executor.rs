//! Action executor system: drains the [`TopologyActionQueue`] each
//! fixed-update tick and applies every queued [`TopologyAction`] to the
//! network, recording results in the [`TopologyResultLog`].
//!
//! Each action runs to completion, including pointer reconciliation, before
//! the next one starts.

use bevy::prelude::*;

use crate::clock::Clock;
use crate::error::TopologyError;
use crate::line::LineEdit;
use crate::network::TransitNetwork;
use crate::params::TopologyParams;
use crate::LineId;

use super::{ActionResult, TopologyAction, TopologyActionQueue, TopologyResultLog};

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Drains all pending actions from the queue and executes them in order.
pub fn execute_topology_actions(
    mut queue: ResMut<TopologyActionQueue>,
    mut log: ResMut<TopologyResultLog>,
    mut network: ResMut<TransitNetwork>,
    mut clock: ResMut<Clock>,
    params: Res<TopologyParams>,
) {
    for queued in queue.drain() {
        let result = execute_single(&queued.action, &mut network, &mut clock, &params);
        if let ActionResult::Error(e) = result {
            warn!(
                "Topology action queued at t={} refused: {:?} ({:?})",
                queued.tick, e, queued.action
            );
        }
        log.push(queued.tick, queued.action, result);
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub fn execute_single(
    action: &TopologyAction,
    network: &mut TransitNetwork,
    clock: &mut Clock,
    params: &TopologyParams,
) -> ActionResult {
    match *action {
        TopologyAction::AddStation { position, shape } => {
            ActionResult::Created(network.add_station(position, shape))
        }
        TopologyAction::RemoveStation { station } => unit(network.remove_station(station)),
        TopologyAction::CreateLine {
            a,
            b,
            color,
            control,
        } => created(network.create_line(a, b, color, control)),
        TopologyAction::RemoveLine { line } => unit(network.remove_line(line)),
        TopologyAction::ExtendLine {
            line,
            station,
            control,
        } => edited(network, line, |n| n.extend_line(line, station, control)),
        TopologyAction::InsertStation {
            line,
            index,
            station,
            control,
        } => edited(network, line, |n| {
            n.insert_station(line, index, station, control, params.insert_shift)
        }),
        TopologyAction::InsertStationFromLink {
            line,
            index,
            station,
            before,
            after,
        } => edited(network, line, |n| {
            n.insert_station_from_link(line, index, station, before, after)
        }),
        TopologyAction::RemoveLineStation { line, station } => {
            edited(network, line, |n| n.remove_line_station(line, station))
        }
        TopologyAction::TrimLoop { line, station, end } => edited(network, line, |n| {
            n.trim_loop(line, station, end, params.loop_trim)
        }),
        TopologyAction::SpawnTrain { line, speed } => {
            let speed = speed.unwrap_or(params.default_train_speed);
            created(network.spawn_train(line, speed))
        }
        TopologyAction::AssignTrain { train, line } => unit(network.assign_train(train, line)),
        TopologyAction::UnassignTrain { train } => unit(network.unassign_train(train)),
        TopologyAction::SetPaused { paused } => {
            clock.paused = paused;
            ActionResult::Success
        }
    }
}

fn unit(result: Result<(), TopologyError>) -> ActionResult {
    match result {
        Ok(()) => ActionResult::Success,
        Err(e) => e.into(),
    }
}

fn created(result: Result<u32, TopologyError>) -> ActionResult {
    match result {
        Ok(id) => ActionResult::Created(id),
        Err(e) => e.into(),
    }
}

/// Run a line edit and flag a line left with a single station.
fn edited(
    network: &mut TransitNetwork,
    line: LineId,
    edit: impl FnOnce(&mut TransitNetwork) -> Result<LineEdit, TopologyError>,
) -> ActionResult {
    if let Err(e) = edit(network) {
        return e.into();
    }
    match network.line(line) {
        Some(l) if l.is_degenerate() => ActionResult::Degenerate(line),
        _ => ActionResult::Success,
    }
}
