//! Outcomes of recently executed topology actions.
//!
//! The executor drains the queue without reporting back to whoever pushed an
//! action, so an editor that wants to know why a click was refused (an
//! interior station, an ambiguous loop end) looks the outcome up here. Only
//! the newest 64 entries are kept.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::error::TopologyError;

use super::{ActionResult, TopologyAction};

const MAX_ENTRIES: usize = 64;

/// One executed action, stamped with the clock time it was queued at.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedAction {
    pub tick: u64,
    pub action: TopologyAction,
    pub result: ActionResult,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct TopologyResultLog {
    entries: VecDeque<LoggedAction>,
}

impl TopologyResultLog {
    pub fn push(&mut self, tick: u64, action: TopologyAction, result: ActionResult) {
        if self.entries.len() == MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LoggedAction {
            tick,
            action,
            result,
        });
    }

    /// Up to `n` newest entries, oldest first.
    pub fn last_n(&self, n: usize) -> impl Iterator<Item = &LoggedAction> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn last_result(&self) -> Option<ActionResult> {
        self.entries.back().map(|e| e.result)
    }

    /// Refused actions still in the log, oldest first.
    pub fn refusals(&self) -> impl Iterator<Item = (&TopologyAction, TopologyError)> {
        self.entries
            .iter()
            .filter_map(|e| e.result.error().map(|err| (&e.action, err)))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_n_is_oldest_first() {
        let mut log = TopologyResultLog::default();
        log.push(1, TopologyAction::SetPaused { paused: true }, ActionResult::Success);
        log.push(
            2,
            TopologyAction::RemoveLine { line: 3 },
            ActionResult::Error(TopologyError::UnknownLine(3)),
        );

        let last: Vec<_> = log.last_n(1).collect();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].tick, 2);
        assert_eq!(last[0].action, TopologyAction::RemoveLine { line: 3 });
        assert_eq!(log.last_n(10).count(), 2);
        assert_eq!(
            log.last_result(),
            Some(ActionResult::Error(TopologyError::UnknownLine(3)))
        );
    }

    #[test]
    fn refusals_skip_successes() {
        let mut log = TopologyResultLog::default();
        log.push(0, TopologyAction::RemoveLine { line: 1 }, ActionResult::Created(4));
        log.push(
            0,
            TopologyAction::RemoveStation { station: 9 },
            ActionResult::Error(TopologyError::StationInUse(9)),
        );
        let refused: Vec<_> = log.refusals().collect();
        assert_eq!(
            refused,
            vec![(
                &TopologyAction::RemoveStation { station: 9 },
                TopologyError::StationInUse(9)
            )]
        );
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut log = TopologyResultLog::default();
        for i in 0..70 {
            log.push(u64::from(i), TopologyAction::RemoveLine { line: i }, ActionResult::Success);
        }
        assert_eq!(log.len(), MAX_ENTRIES);
        assert_eq!(log.last_n(MAX_ENTRIES).next().map(|e| e.tick), Some(6));

        log.clear();
        assert!(log.is_empty());
    }
}
