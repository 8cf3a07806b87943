//! ECS systems for the transit network.

use bevy::prelude::*;

use crate::clock::Clock;

use super::types::TransitNetwork;

/// Advance every assigned train one tick. Runs after the clock, and after
/// all queued topology edits of the tick have been applied.
pub fn advance_trains(clock: Res<Clock>, mut network: ResMut<TransitNetwork>) {
    if clock.paused {
        return;
    }
    network.advance_trains();
}
