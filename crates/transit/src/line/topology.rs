//! `Line`: station sequence, interleaved waypoint path, and every edit that
//! changes them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TopologyError;
use crate::position::Position;
use crate::station::{Station, StationShape};
use crate::train::PathFollower;
use crate::{LineId, StationId, TrainId};

use super::edit::*;

/// Display colour of a line. Opaque to the topology engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineColor(pub [u8; 3]);

/// A line through an ordered sequence of stations.
///
/// `path` interleaves station positions and control points:
/// `path[2i]` is the position of `stations[i]` and `path[2i + 1]` is the
/// control point shaping the segment to `stations[i + 1]`, so
/// `path.len() == 2 * stations.len() - 1` for any non-empty line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Unique line identifier.
    pub id: LineId,
    pub color: LineColor,
    stations: Vec<StationId>,
    path: Vec<Position>,
    trains: Vec<TrainId>,
}

impl Line {
    /// Create a two-station line. Registering the line on `a` and `b` is
    /// left to the owner of the stations.
    pub fn new(id: LineId, a: &Station, b: &Station, color: LineColor, control: Position) -> Self {
        Self {
            id,
            color,
            stations: vec![a.id, b.id],
            path: vec![a.position(), control, b.position()],
            trains: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn trains(&self) -> &[TrainId] {
        &self.trains
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// A line trimmed down to a single station. Callers decide what to do
    /// with it; the line never deletes itself.
    pub fn is_degenerate(&self) -> bool {
        self.stations.len() == 1
    }

    /// First index of `station` in the station sequence.
    pub fn station_index(&self, station: StationId) -> Option<usize> {
        self.stations.iter().position(|&s| s == station)
    }

    pub fn contains_station(&self, station: StationId) -> bool {
        self.stations.contains(&station)
    }

    /// Head and tail station.
    pub fn endpoints(&self) -> Option<(StationId, StationId)> {
        Some((*self.stations.first()?, *self.stations.last()?))
    }

    /// First and last station are the same and the line has more than one
    /// stop.
    pub fn is_loop(&self) -> bool {
        match self.endpoints() {
            Some((head, tail)) => head == tail && self.stations.len() != 1,
            None => false,
        }
    }

    /// False only when `station` is an interior stop. Stations not on the
    /// line, or at either end, may be added.
    pub fn add_allowed(&self, station: StationId) -> bool {
        match self.station_index(station) {
            Some(idx) => idx == 0 || idx == self.stations.len() - 1,
            None => true,
        }
    }

    /// Whether any station of this line has `shape`. `stations` is the
    /// lookup table holding this line's stations.
    pub fn contains_shape(&self, shape: StationShape, stations: &[Station]) -> bool {
        stations
            .iter()
            .any(|s| s.shape() == shape && self.stations.contains(&s.id))
    }

    // -------------------------------------------------------------------------
    // Train assignment
    // -------------------------------------------------------------------------

    pub fn add_train<T: PathFollower>(&mut self, train: &mut T) {
        if !self.trains.contains(&train.id()) {
            self.trains.push(train.id());
        }
        train.set_line(Some(self.id));
    }

    pub fn remove_train<T: PathFollower>(&mut self, train: &mut T) {
        let id = train.id();
        self.trains.retain(|&t| t != id);
        if train.line() == Some(self.id) {
            train.set_line(None);
        }
    }

    /// Drop every train from the set, returning their ids. Back-references
    /// on the trains themselves are the caller's to clear.
    pub fn take_trains(&mut self) -> Vec<TrainId> {
        std::mem::take(&mut self.trains)
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    /// Append `station` after the tail. No waypoint index moves, so no
    /// pointer needs adjusting, and membership is left to the caller.
    pub fn extend(&mut self, station: &Station, control: Position) -> LineEdit {
        self.push_tail(station.id, station.position(), control);
        LineEdit::untouched()
    }

    /// Insert `station` at station index `index` with `control` shaping the
    /// segment to its successor.
    pub fn insert_at(
        &mut self,
        index: usize,
        station: &Station,
        control: Position,
        policy: InsertShiftPolicy,
    ) -> Result<LineEdit, TopologyError> {
        self.apply_edit(TopologyEdit::InsertAt {
            index,
            station: station.id,
            position: station.position(),
            control,
            policy,
        })
    }

    /// Split the segment between stations `index - 1` and `index` to add
    /// `station` with a control point on either side.
    pub fn insert_from_link(
        &mut self,
        index: usize,
        station: &Station,
        before: Position,
        after: Position,
    ) -> Result<LineEdit, TopologyError> {
        self.apply_edit(TopologyEdit::InsertFromLink {
            index,
            station: station.id,
            position: station.position(),
            before,
            after,
        })
    }

    /// Remove the head or tail station of a non-loop line.
    pub fn remove_station(&mut self, station: StationId) -> Result<LineEdit, TopologyError> {
        self.apply_edit(TopologyEdit::RemoveEndpoint { station })
    }

    /// Trim one end of a loop.
    pub fn remove_loop(
        &mut self,
        station: StationId,
        end: LoopEnd,
        policy: LoopTrimPolicy,
    ) -> Result<LineEdit, TopologyError> {
        self.apply_edit(TopologyEdit::TrimLoop {
            station,
            end,
            policy,
        })
    }

    /// Apply `edit` to the station sequence and path. On error nothing is
    /// modified.
    pub fn apply_edit(&mut self, edit: TopologyEdit) -> Result<LineEdit, TopologyError> {
        match edit {
            TopologyEdit::Extend {
                station,
                position,
                control,
            } => {
                self.check_placement(station, self.stations.len())?;
                self.push_tail(station, position, control);
                Ok(LineEdit::untouched())
            }
            TopologyEdit::InsertAt {
                index,
                station,
                position,
                control,
                policy,
            } => self.apply_insert_at(index, station, position, control, policy),
            TopologyEdit::InsertFromLink {
                index,
                station,
                position,
                before,
                after,
            } => self.apply_insert_from_link(index, station, position, before, after),
            TopologyEdit::RemoveEndpoint { station } => self.apply_remove_endpoint(station),
            TopologyEdit::TrimLoop {
                station,
                end,
                policy,
            } => self.apply_trim_loop(station, end, policy),
        }
    }

    /// Carry out the pointer side of `edit` on every train that is in this
    /// line's set and still refers back to it. Returns how many trains were
    /// touched.
    pub fn reconcile<'a, T, I>(&self, edit: &LineEdit, trains: I) -> usize
    where
        T: PathFollower + 'a,
        I: IntoIterator<Item = &'a mut T>,
    {
        let is_loop = self.is_loop();
        let mut touched = 0;
        for train in trains {
            if train.line() != Some(self.id) || !self.trains.contains(&train.id()) {
                continue;
            }
            let shifted = edit.shift.apply(train.pointer());
            train.set_pointer(shifted);
            if edit.revalidate {
                train.revalidate(&self.path, is_loop);
            }
            touched += 1;
        }
        touched
    }

    /// Adding `station` at station index `index` must keep the line a simple
    /// path. A station already on the line may only come back as the
    /// closing end of a loop: the head appended after the tail, or the tail
    /// put in front of the head.
    fn check_placement(&self, station: StationId, index: usize) -> Result<(), TopologyError> {
        if !self.contains_station(station) {
            return Ok(());
        }
        if !self.add_allowed(station) {
            return Err(TopologyError::InteriorStation);
        }
        let len = self.stations.len();
        let closes_loop = len > 1
            && !self.is_loop()
            && ((index == len && self.stations.first() == Some(&station))
                || (index == 0 && self.stations.last() == Some(&station)));
        if closes_loop {
            Ok(())
        } else {
            Err(TopologyError::RepeatedStation)
        }
    }

    fn push_tail(&mut self, station: StationId, position: Position, control: Position) {
        self.path.push(control);
        self.path.push(position);
        self.stations.push(station);
    }

    fn apply_insert_at(
        &mut self,
        index: usize,
        station: StationId,
        position: Position,
        control: Position,
        policy: InsertShiftPolicy,
    ) -> Result<LineEdit, TopologyError> {
        let len = self.stations.len();
        if index > len {
            return Err(TopologyError::IndexOutOfRange { index, len });
        }
        self.check_placement(station, index)?;

        let path_index = if index == len {
            let at = self.path.len();
            self.push_tail(station, position, control);
            at
        } else {
            let at = 2 * index;
            self.path.insert(at, control);
            self.path.insert(at, position);
            self.stations.insert(index, station);
            at
        };

        let shift = match policy {
            InsertShiftPolicy::Unconditional => PointerShift::All(2),
            InsertShiftPolicy::AheadOfInsertion => PointerShift::AtOrAfter {
                index: path_index,
                delta: 2,
            },
        };
        Ok(LineEdit {
            shift,
            revalidate: true,
            membership: MembershipChange::Register(station),
        })
    }

    fn apply_insert_from_link(
        &mut self,
        index: usize,
        station: StationId,
        position: Position,
        before: Position,
        after: Position,
    ) -> Result<LineEdit, TopologyError> {
        let len = self.stations.len();
        if index == 0 || index >= len {
            return Err(TopologyError::IndexOutOfRange { index, len });
        }
        self.check_placement(station, index)?;

        // The control point of the segment being split.
        let link = 2 * index - 1;
        self.stations.insert(index, station);
        self.path.remove(link);
        self.path.insert(link, after);
        self.path.insert(link, position);
        self.path.insert(link, before);

        Ok(LineEdit {
            shift: PointerShift::After {
                index: link,
                delta: 2,
            },
            revalidate: true,
            membership: MembershipChange::Register(station),
        })
    }

    fn apply_remove_endpoint(&mut self, station: StationId) -> Result<LineEdit, TopologyError> {
        if self.is_loop() {
            return Err(TopologyError::AmbiguousLoopEndpoint);
        }
        if !self.contains_station(station) {
            return Err(TopologyError::StationNotOnLine);
        }
        if self.stations.len() == 1 {
            return Err(TopologyError::LastStation);
        }
        // Decide by the ends themselves; the station may also appear earlier
        // on a line built through the unchecked `extend`.
        let head = self.stations.first() == Some(&station);
        if !head && self.stations.last() != Some(&station) {
            return Err(TopologyError::InteriorStation);
        }

        let shift = if head {
            self.stations.remove(0);
            self.trim_path_front();
            PointerShift::All(-2)
        } else {
            self.stations.pop();
            self.trim_path_back();
            PointerShift::None
        };

        Ok(LineEdit {
            shift,
            revalidate: true,
            membership: MembershipChange::Unregister(station),
        })
    }

    fn apply_trim_loop(
        &mut self,
        station: StationId,
        end: LoopEnd,
        policy: LoopTrimPolicy,
    ) -> Result<LineEdit, TopologyError> {
        if !self.is_loop() {
            return Err(TopologyError::NotALoop);
        }
        if self.stations.first() != Some(&station) {
            return Err(TopologyError::StationNotOnLine);
        }

        match end {
            LoopEnd::First => {
                self.stations.remove(0);
                self.trim_path_front();
            }
            LoopEnd::Last => {
                self.stations.pop();
                self.trim_path_back();
            }
        }

        // The station is still on the line at the other end, so membership
        // is unchanged.
        let edit = match (policy, end) {
            (LoopTrimPolicy::Unreconciled, _) => LineEdit::untouched(),
            (LoopTrimPolicy::Reconciled, LoopEnd::First) => LineEdit {
                shift: PointerShift::All(-2),
                revalidate: true,
                membership: MembershipChange::None,
            },
            (LoopTrimPolicy::Reconciled, LoopEnd::Last) => LineEdit {
                shift: PointerShift::None,
                revalidate: true,
                membership: MembershipChange::None,
            },
        };
        Ok(edit)
    }

    /// Drop the head station's waypoint and the control point after it.
    /// Tolerates a path shorter than two.
    fn trim_path_front(&mut self) {
        let n = self.path.len().min(2);
        self.path.drain(..n);
    }

    fn trim_path_back(&mut self) {
        let keep = self.path.len().saturating_sub(2);
        self.path.truncate(keep);
    }
}

/// One station id per row, head first.
impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for station in &self.stations {
            writeln!(f, "station {station}")?;
        }
        Ok(())
    }
}
