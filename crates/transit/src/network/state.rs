//! `TransitNetwork` methods: station, line and train management plus every
//! topology edit.

use bevy::prelude::*;

use crate::error::TopologyError;
use crate::line::{
    InsertShiftPolicy, Line, LineColor, LineEdit, LoopEnd, LoopTrimPolicy, MembershipChange,
    TopologyEdit,
};
use crate::position::Position;
use crate::station::{Station, StationShape};
use crate::train::{PathFollower, Train};
use crate::{LineId, StationId, TrainId};

use super::types::TransitNetwork;

impl TransitNetwork {
    // -------------------------------------------------------------------------
    // Station management
    // -------------------------------------------------------------------------

    pub fn add_station(&mut self, position: Position, shape: StationShape) -> StationId {
        let id = self.next_station_id;
        self.next_station_id += 1;
        self.stations.push(Station::new(id, position, shape));
        id
    }

    /// Delete a station no line stops at any more.
    pub fn remove_station(&mut self, station_id: StationId) -> Result<(), TopologyError> {
        let idx = self.station_index(station_id)?;
        let referenced = !self.stations[idx].is_orphaned()
            || self.lines.iter().any(|l| l.contains_station(station_id));
        if referenced {
            return Err(TopologyError::StationInUse(station_id));
        }
        self.stations.remove(idx);
        Ok(())
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    fn station_index(&self, id: StationId) -> Result<usize, TopologyError> {
        self.stations
            .iter()
            .position(|s| s.id == id)
            .ok_or(TopologyError::UnknownStation(id))
    }

    fn station_ref(&self, id: StationId) -> Result<(StationId, Position), TopologyError> {
        let station = &self.stations[self.station_index(id)?];
        Ok((station.id, station.position()))
    }

    // -------------------------------------------------------------------------
    // Line management
    // -------------------------------------------------------------------------

    /// Create a two-station line and register it on both stations.
    pub fn create_line(
        &mut self,
        a: StationId,
        b: StationId,
        color: LineColor,
        control: Position,
    ) -> Result<LineId, TopologyError> {
        if a == b {
            return Err(TopologyError::SameStation);
        }
        let ia = self.station_index(a)?;
        let ib = self.station_index(b)?;

        let id = self.next_line_id;
        self.next_line_id += 1;

        let line = Line::new(id, &self.stations[ia], &self.stations[ib], color, control);
        self.stations[ia].add_line(id);
        self.stations[ib].add_line(id);
        self.lines.push(line);

        debug!("Line {}: created between stations {} and {}", id, a, b);
        Ok(id)
    }

    /// Delete a line, unregistering it from its stations and leaving its
    /// trains idle.
    pub fn remove_line(&mut self, line_id: LineId) -> Result<(), TopologyError> {
        let idx = self.line_index(line_id)?;
        let mut line = self.lines.remove(idx);

        for station in &mut self.stations {
            if line.contains_station(station.id) {
                station.remove_line(line_id);
            }
        }
        let detached = line.take_trains();
        for train in &mut self.trains {
            if detached.contains(&train.id) || train.line() == Some(line_id) {
                train.set_line(None);
            }
        }

        debug!("Line {}: removed, {} trains left idle", line_id, detached.len());
        Ok(())
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Lines that stop at `station`.
    pub fn lines_through(&self, station: StationId) -> impl Iterator<Item = &Line> {
        self.lines
            .iter()
            .filter(move |l| l.contains_station(station))
    }

    pub fn line_contains_shape(
        &self,
        line_id: LineId,
        shape: StationShape,
    ) -> Result<bool, TopologyError> {
        let line = &self.lines[self.line_index(line_id)?];
        Ok(line.contains_shape(shape, &self.stations))
    }

    fn line_index(&self, id: LineId) -> Result<usize, TopologyError> {
        self.lines
            .iter()
            .position(|l| l.id == id)
            .ok_or(TopologyError::UnknownLine(id))
    }

    // -------------------------------------------------------------------------
    // Topology edits
    // -------------------------------------------------------------------------

    /// Append `station` to the tail of a line. Closing a loop onto the head
    /// station keeps a single membership entry.
    pub fn extend_line(
        &mut self,
        line_id: LineId,
        station: StationId,
        control: Position,
    ) -> Result<LineEdit, TopologyError> {
        let (station, position) = self.station_ref(station)?;
        let edit = self.edit_line(
            line_id,
            TopologyEdit::Extend {
                station,
                position,
                control,
            },
        )?;
        // Extending never reports a membership change; the owner registers.
        self.apply_membership(line_id, MembershipChange::Register(station));
        Ok(edit)
    }

    pub fn insert_station(
        &mut self,
        line_id: LineId,
        index: usize,
        station: StationId,
        control: Position,
        policy: InsertShiftPolicy,
    ) -> Result<LineEdit, TopologyError> {
        let (station, position) = self.station_ref(station)?;
        self.edit_line(
            line_id,
            TopologyEdit::InsertAt {
                index,
                station,
                position,
                control,
                policy,
            },
        )
    }

    pub fn insert_station_from_link(
        &mut self,
        line_id: LineId,
        index: usize,
        station: StationId,
        before: Position,
        after: Position,
    ) -> Result<LineEdit, TopologyError> {
        let (station, position) = self.station_ref(station)?;
        self.edit_line(
            line_id,
            TopologyEdit::InsertFromLink {
                index,
                station,
                position,
                before,
                after,
            },
        )
    }

    /// Remove the head or tail station of a non-loop line.
    pub fn remove_line_station(
        &mut self,
        line_id: LineId,
        station: StationId,
    ) -> Result<LineEdit, TopologyError> {
        self.station_index(station)?;
        self.edit_line(line_id, TopologyEdit::RemoveEndpoint { station })
    }

    /// Trim the first or last stop of a loop.
    pub fn trim_loop(
        &mut self,
        line_id: LineId,
        station: StationId,
        end: LoopEnd,
        policy: LoopTrimPolicy,
    ) -> Result<LineEdit, TopologyError> {
        self.station_index(station)?;
        self.edit_line(
            line_id,
            TopologyEdit::TrimLoop {
                station,
                end,
                policy,
            },
        )
    }

    /// Apply `edit` to a line and carry out its pointer and membership side
    /// effects before returning. A refused edit changes nothing.
    pub fn edit_line(
        &mut self,
        line_id: LineId,
        edit: TopologyEdit,
    ) -> Result<LineEdit, TopologyError> {
        let idx = self.line_index(line_id)?;
        let applied = self.lines[idx].apply_edit(edit)?;
        applied.log(line_id);
        trace!("Line {} stops:\n{}", line_id, self.lines[idx]);

        let line = &self.lines[idx];
        line.reconcile(&applied, self.trains.iter_mut());
        self.apply_membership(line_id, applied.membership);

        if self.lines[idx].is_degenerate() {
            info!(
                "Line {} is down to a single station; remove it or extend it",
                line_id
            );
        }
        Ok(applied)
    }

    /// Keep `station.is_on_line(line)` equal to "the line stops at the
    /// station".
    fn apply_membership(&mut self, line_id: LineId, change: MembershipChange) {
        let Some(line) = self.lines.iter().find(|l| l.id == line_id) else {
            return;
        };
        match change {
            MembershipChange::None => {}
            MembershipChange::Register(id) => {
                if let Some(station) = self.stations.iter_mut().find(|s| s.id == id) {
                    if !station.is_on_line(line_id) {
                        station.add_line(line_id);
                    }
                }
            }
            MembershipChange::Unregister(id) => {
                if line.contains_station(id) {
                    return;
                }
                if let Some(station) = self.stations.iter_mut().find(|s| s.id == id) {
                    station.remove_line(line_id);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Train management
    // -------------------------------------------------------------------------

    /// Spawn a train at the start of a line's path.
    pub fn spawn_train(&mut self, line_id: LineId, speed: f32) -> Result<TrainId, TopologyError> {
        let idx = self.line_index(line_id)?;

        let id = self.next_train_id;
        self.next_train_id += 1;

        let line = &mut self.lines[idx];
        let mut train = Train::new(id, speed);
        train.place_at_start(line.path());
        line.add_train(&mut train);
        self.trains.push(train);
        Ok(id)
    }

    /// Move a train onto `line_id`, taking it off any line it was on.
    pub fn assign_train(&mut self, train_id: TrainId, line_id: LineId) -> Result<(), TopologyError> {
        let train_idx = self.train_index(train_id)?;
        let line_idx = self.line_index(line_id)?;

        self.detach_train(train_idx);
        let line = &mut self.lines[line_idx];
        let train = &mut self.trains[train_idx];
        line.add_train(train);
        train.place_at_start(line.path());
        Ok(())
    }

    /// Take a train off its line, leaving it idle.
    pub fn unassign_train(&mut self, train_id: TrainId) -> Result<(), TopologyError> {
        let train_idx = self.train_index(train_id)?;
        self.detach_train(train_idx);
        Ok(())
    }

    pub fn despawn_train(&mut self, train_id: TrainId) -> Result<(), TopologyError> {
        let train_idx = self.train_index(train_id)?;
        self.detach_train(train_idx);
        self.trains.remove(train_idx);
        Ok(())
    }

    fn detach_train(&mut self, train_idx: usize) {
        let train = &mut self.trains[train_idx];
        let Some(prev) = train.line() else {
            return;
        };
        match self.lines.iter_mut().find(|l| l.id == prev) {
            Some(line) => line.remove_train(train),
            None => train.set_line(None),
        }
    }

    pub fn train(&self, id: TrainId) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    fn train_index(&self, id: TrainId) -> Result<usize, TopologyError> {
        self.trains
            .iter()
            .position(|t| t.id == id)
            .ok_or(TopologyError::UnknownTrain(id))
    }

    /// Move every assigned train one tick along its line.
    pub fn advance_trains(&mut self) {
        let lines = &self.lines;
        for train in &mut self.trains {
            let Some(line_id) = train.line() else {
                continue;
            };
            let Some(line) = lines.iter().find(|l| l.id == line_id) else {
                continue;
            };
            train.advance(line.path(), line.is_loop());
        }
    }
}
