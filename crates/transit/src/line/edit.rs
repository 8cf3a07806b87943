//! Edit descriptions and the pointer reconciliation they require.
//!
//! Every structural change to a [`Line`](super::Line) goes through
//! `Line::apply_edit`, which mutates the station sequence and path and hands
//! back a [`LineEdit`]. The owner of the trains then applies that edit with
//! `Line::reconcile` and the membership change to the station, all before
//! anything else observes the line.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::StationId;

/// How `insert_at` adjusts pointers of trains already on the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertShiftPolicy {
    /// Every assigned train moves its pointer forward by two, wherever it is.
    /// Trains already past the insertion point end up two waypoints too far
    /// ahead and rely on re-validation to clamp them.
    Unconditional,
    /// Only trains heading for a waypoint at or after the insertion point
    /// are shifted.
    #[default]
    AheadOfInsertion,
}

/// How trimming one end of a loop treats trains on the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopTrimPolicy {
    /// Trim the path only. Pointers are neither shifted nor re-validated, so
    /// they may reference waypoints that no longer exist until the next
    /// edit or the invariant guard catches them.
    Unreconciled,
    /// Shift pointers when the first end is trimmed and re-validate every
    /// train afterwards, exactly like `remove_station`.
    #[default]
    Reconciled,
}

/// Which end of a loop to trim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopEnd {
    First,
    Last,
}

/// A requested structural edit of one line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TopologyEdit {
    /// Append `station` after the current tail.
    Extend {
        station: StationId,
        position: Position,
        control: Position,
    },
    /// Insert `station` at station index `index`.
    InsertAt {
        index: usize,
        station: StationId,
        position: Position,
        control: Position,
        policy: InsertShiftPolicy,
    },
    /// Split the segment ending at station index `index`, replacing its
    /// control point with `before`, the station, and `after`.
    InsertFromLink {
        index: usize,
        station: StationId,
        position: Position,
        before: Position,
        after: Position,
    },
    /// Remove the head or tail station of a non-loop line.
    RemoveEndpoint { station: StationId },
    /// Trim one end of a loop.
    TrimLoop {
        station: StationId,
        end: LoopEnd,
        policy: LoopTrimPolicy,
    },
}

/// Pointer adjustment produced by an edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerShift {
    #[default]
    None,
    /// Shift every pointer.
    All(isize),
    /// Shift pointers `>= index`.
    AtOrAfter { index: usize, delta: isize },
    /// Shift pointers `> index`.
    After { index: usize, delta: isize },
}

impl PointerShift {
    /// Shifted pointer, saturating at zero.
    pub fn apply(self, pointer: usize) -> usize {
        match self {
            PointerShift::None => pointer,
            PointerShift::All(delta) => pointer.saturating_add_signed(delta),
            PointerShift::AtOrAfter { index, delta } if pointer >= index => {
                pointer.saturating_add_signed(delta)
            }
            PointerShift::After { index, delta } if pointer > index => {
                pointer.saturating_add_signed(delta)
            }
            PointerShift::AtOrAfter { .. } | PointerShift::After { .. } => pointer,
        }
    }
}

/// Station-side bookkeeping an edit requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipChange {
    #[default]
    None,
    Register(StationId),
    Unregister(StationId),
}

/// Side effects of one applied edit, to be carried out before anything else
/// reads the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEdit {
    pub shift: PointerShift,
    /// Re-validate every assigned train after shifting.
    pub revalidate: bool,
    pub membership: MembershipChange,
}

impl LineEdit {
    /// An edit that leaves every existing waypoint index in place.
    pub fn untouched() -> Self {
        Self::default()
    }

    pub fn is_untouched(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn log(&self, line: crate::LineId) {
        if self.is_untouched() {
            return;
        }
        debug!(
            "Line {}: shift {:?}, revalidate {}, membership {:?}",
            line, self.shift, self.revalidate, self.membership
        );
    }
}
