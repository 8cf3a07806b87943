use serde::{Deserialize, Serialize};

use crate::error::TopologyError;
use crate::LineId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    Success,
    /// A station, line or train was created with this id.
    Created(u32),
    /// The edit succeeded but left the line with a single station. The
    /// caller decides whether to remove or extend it.
    Degenerate(LineId),
    Error(TopologyError),
}

impl ActionResult {
    /// Returns `true` for every variant except `Error`.
    pub fn is_success(&self) -> bool {
        !matches!(self, ActionResult::Error(_))
    }

    pub fn error(&self) -> Option<TopologyError> {
        match self {
            ActionResult::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Id carried by `Created`.
    pub fn created_id(&self) -> Option<u32> {
        match self {
            ActionResult::Created(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<TopologyError> for ActionResult {
    fn from(e: TopologyError) -> Self {
        ActionResult::Error(e)
    }
}
