//! The transit network: every station, line and train, linked by id.
//!
//! `TransitNetwork` is the single mutator of line topology. Each edit goes
//! through one `&mut self` call that changes the line, reconciles every
//! train pointer on it and updates station membership before returning, so
//! no train ever advances along a half-edited path.
//!
//! ## Data model
//! - `Station`: shared stop, holding back-references to its lines
//! - `Line`: ordered stations plus the interleaved waypoint path
//! - `Train`: mover holding a pointer into its line's path
//!
//! Membership is kept as a set at this level: a station lists a line once
//! for as long as the line stops there, even when a loop visits it at both
//! ends.

mod state;
mod systems;
mod types;


pub use systems::advance_trains;
pub use types::TransitNetwork;
