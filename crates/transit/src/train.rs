//! The train side of the line/train contract.
//!
//! A line never owns its trains. After every structural edit it adjusts each
//! assigned train's pointer through [`PathFollower`] and then asks the train
//! to re-validate against the new path. [`Train`] is the concrete mover the
//! network runs; it moves a fixed distance per tick and has no motion model
//! beyond that.

use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::{LineId, TrainId};

/// What a line needs from anything travelling along its waypoint path.
pub trait PathFollower {
    fn id(&self) -> TrainId;

    /// Index into the line's path of the waypoint the train is heading for.
    fn pointer(&self) -> usize;

    fn set_pointer(&mut self, pointer: usize);

    /// Line the train currently runs on, if any.
    fn line(&self) -> Option<LineId>;

    fn set_line(&mut self, line: Option<LineId>);

    /// Bring the pointer back to a valid waypoint of `path` after the line
    /// changed shape.
    fn revalidate(&mut self, path: &[Position], is_loop: bool);
}

/// Direction of travel along the path indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelDirection {
    /// Toward increasing path indices.
    #[default]
    Forward,
    /// Toward index 0.
    Backward,
}

/// A train running along a line's waypoint path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Train {
    /// Unique train identifier.
    pub id: TrainId,
    line: Option<LineId>,
    pointer: usize,
    pub direction: TravelDirection,
    /// Current position (between waypoints while moving).
    pub position: Position,
    /// Path units covered per tick.
    pub speed: f32,
}

impl Train {
    pub fn new(id: TrainId, speed: f32) -> Self {
        Self {
            id,
            line: None,
            pointer: 0,
            direction: TravelDirection::Forward,
            position: Position::default(),
            speed,
        }
    }

    /// Put the train on the first waypoint of `path`, heading forward.
    pub fn place_at_start(&mut self, path: &[Position]) {
        self.direction = TravelDirection::Forward;
        match path.first() {
            Some(&start) => {
                self.position = start;
                self.pointer = if path.len() > 1 { 1 } else { 0 };
            }
            None => self.pointer = 0,
        }
    }

    /// Target waypoint, if the pointer is in range of `path`.
    pub fn target<'a>(&self, path: &'a [Position]) -> Option<&'a Position> {
        path.get(self.pointer)
    }

    /// Move toward the target waypoint. On arrival the pointer steps to the
    /// next waypoint: wrapping on a loop, reversing at either terminus
    /// otherwise.
    pub fn advance(&mut self, path: &[Position], is_loop: bool) {
        if path.is_empty() {
            return;
        }
        if self.pointer >= path.len() {
            self.revalidate(path, is_loop);
        }
        let (position, arrived) = self.position.step_toward(path[self.pointer], self.speed);
        self.position = position;
        if arrived {
            self.step_pointer(path.len(), is_loop);
        }
    }

    fn step_pointer(&mut self, len: usize, is_loop: bool) {
        if len < 2 {
            self.pointer = 0;
            return;
        }
        // On a loop the first and last waypoints are the same station, so
        // wrapping skips over it.
        match self.direction {
            TravelDirection::Forward => {
                if self.pointer + 1 < len {
                    self.pointer += 1;
                } else if is_loop {
                    self.pointer = 1;
                } else {
                    self.direction = TravelDirection::Backward;
                    self.pointer = len - 2;
                }
            }
            TravelDirection::Backward => {
                if self.pointer > 0 {
                    self.pointer -= 1;
                } else if is_loop {
                    self.pointer = len - 2;
                } else {
                    self.direction = TravelDirection::Forward;
                    self.pointer = 1;
                }
            }
        }
    }
}

impl PathFollower for Train {
    fn id(&self) -> TrainId {
        self.id
    }

    fn pointer(&self) -> usize {
        self.pointer
    }

    fn set_pointer(&mut self, pointer: usize) {
        self.pointer = pointer;
    }

    fn line(&self) -> Option<LineId> {
        self.line
    }

    fn set_line(&mut self, line: Option<LineId>) {
        self.line = line;
    }

    fn revalidate(&mut self, path: &[Position], is_loop: bool) {
        let len = path.len();
        if len == 0 {
            self.pointer = 0;
            return;
        }
        if self.pointer >= len {
            self.pointer = len - 1;
            // The waypoint it was heading for is gone; the new last waypoint
            // is a terminus unless the line closes on itself.
            if !is_loop && len > 1 {
                self.direction = TravelDirection::Backward;
            }
        }
    }
}
