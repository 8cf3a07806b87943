//! Stations and their line memberships.
//!
//! A station is shared by every line that stops at it. It never owns a line:
//! `lines` is a plain list of [`LineId`] back-references that the network
//! keeps in step with each line's station sequence.

use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::{LineId, StationId};

/// Shape tag shown on the map and used by higher-level rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationShape {
    Circle,
    Square,
    Triangle,
    Star,
    Cross,
    Diamond,
}

/// A place that one or more lines stop at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Unique station identifier.
    pub id: StationId,
    position: Position,
    shape: StationShape,
    /// Lines this station belongs to. May hold the same line twice if the
    /// caller registers it twice.
    lines: Vec<LineId>,
}

impl Station {
    pub fn new(id: StationId, position: Position, shape: StationShape) -> Self {
        Self {
            id,
            position,
            shape,
            lines: Vec::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn shape(&self) -> StationShape {
        self.shape
    }

    pub fn lines(&self) -> &[LineId] {
        &self.lines
    }

    /// Record membership in `line`. Not idempotent.
    pub fn add_line(&mut self, line: LineId) {
        self.lines.push(line);
    }

    /// Drop one membership entry for `line`, if present.
    pub fn remove_line(&mut self, line: LineId) {
        if let Some(idx) = self.lines.iter().position(|&l| l == line) {
            self.lines.remove(idx);
        }
    }

    pub fn is_on_line(&self, line: LineId) -> bool {
        self.lines.contains(&line)
    }

    /// True when no line references this station any more.
    pub fn is_orphaned(&self) -> bool {
        self.lines.is_empty()
    }
}
