//! 2D waypoint coordinates shared by stations, line paths and trains.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

/// An immutable point in line-path space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Position) -> f32 {
        self.to_vec2().distance(other.to_vec2())
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Step from `self` toward `target` by at most `max_step`.
    /// Returns the new position and whether `target` was reached.
    pub fn step_toward(self, target: Position, max_step: f32) -> (Position, bool) {
        let from = self.to_vec2();
        let to = target.to_vec2();
        let delta = to - from;
        let dist = delta.length();
        if dist <= max_step || dist <= f32::EPSILON {
            return (target, true);
        }
        (Position::from(from + delta / dist * max_step), false)
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}
