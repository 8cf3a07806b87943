use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::TopologyAction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedAction {
    /// Clock time at which the action was queued.
    pub tick: u64,
    pub action: TopologyAction,
}

/// FIFO of topology actions waiting for the next `FixedUpdate` tick.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyActionQueue {
    pending: Vec<QueuedAction>,
}

impl TopologyActionQueue {
    pub fn push(&mut self, tick: u64, action: TopologyAction) {
        self.pending.push(QueuedAction { tick, action });
    }

    pub fn drain(&mut self) -> Vec<QueuedAction> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
