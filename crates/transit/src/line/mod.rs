//! Line topology: the ordered station sequence, the interleaved waypoint
//! path, and the edits that keep train pointers consistent with both.
//!
//! ## Data model
//! - `Line`: stations plus a path of `2N - 1` waypoints, alternating station
//!   positions and control points
//! - `TopologyEdit`: one requested structural change
//! - `LineEdit`: the pointer shift, re-validation and membership change an
//!   applied edit requires
//!
//! ## Pointer policies
//! - `InsertShiftPolicy` picks whether `insert_at` shifts every train or only
//!   those at or beyond the insertion point
//! - `LoopTrimPolicy` picks whether trimming a loop end reconciles trains

mod edit;
mod topology;

#[cfg(test)]
mod tests;

pub use edit::*;
pub use topology::{Line, LineColor};
