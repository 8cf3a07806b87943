//! Ordering of the transit systems inside `FixedUpdate`.
//!
//! ```text
//! Edit  →  Advance  →  Validate
//! ```
//!
//! * **Edit** – Drain the topology action queue. Every edit finishes its
//!   pointer reconciliation before the next one starts.
//! * **Advance** – Tick the clock, then move trains along their paths.
//! * **Validate** – Periodic invariant guard.

use bevy::prelude::*;

/// Ordered phases for transit systems in the `FixedUpdate` schedule.
///
/// Configured as a chain by `TransitPlugin`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransitSet {
    /// Apply queued topology actions.
    Edit,
    /// Clock tick and train movement.
    Advance,
    /// Invariant checks over the settled network.
    Validate,
}
