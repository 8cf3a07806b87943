//! Line topology engine for a transit network.
//!
//! Stations are shared stops, lines are ordered station sequences with an
//! interleaved waypoint path, and trains follow a pointer into that path.
//! Every topology edit (extending, inserting, removing an endpoint, trimming
//! a loop) goes through [`network::TransitNetwork`], which applies it to the
//! line, shifts or re-validates the pointer of each train on the line, and
//! keeps station membership in step, all inside one call.
//!
//! Inside a Bevy app, [`TransitPlugin`] wires this up as three ordered
//! phases per fixed tick (see [`transit_sets`]): queued edits, clock and
//! train movement, then the invariant guard.

use bevy::prelude::*;

pub mod actions;
pub mod clock;
pub mod config;
pub mod error;
pub mod invariants;
pub mod line;
pub mod network;
pub mod params;
pub mod position;
pub mod station;
pub mod train;
pub mod transit_sets;

pub use transit_sets::TransitSet;

pub type StationId = u32;
pub type LineId = u32;
pub type TrainId = u32;

pub struct TransitPlugin;

impl Plugin for TransitPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<params::TopologyParams>()
            .init_resource::<clock::Clock>()
            .init_resource::<network::TransitNetwork>()
            .init_resource::<actions::TopologyActionQueue>()
            .init_resource::<actions::TopologyResultLog>()
            .init_resource::<invariants::TopologyInvariantViolations>();

        app.configure_sets(
            FixedUpdate,
            (TransitSet::Edit, TransitSet::Advance, TransitSet::Validate).chain(),
        );

        app.add_systems(
            FixedUpdate,
            actions::execute_topology_actions.in_set(TransitSet::Edit),
        )
        .add_systems(
            FixedUpdate,
            (clock::tick_clock, network::advance_trains)
                .chain()
                .in_set(TransitSet::Advance),
        )
        .add_systems(
            FixedUpdate,
            invariants::validate_network.in_set(TransitSet::Validate),
        );
    }
}
