use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::line::Line;
use crate::station::Station;
use crate::train::Train;

/// Source of truth for the transit network.
///
/// Stations, lines and trains refer to each other only through ids, so
/// none of them owns another's lifetime.
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitNetwork {
    /// All stations.
    pub(crate) stations: Vec<Station>,
    /// All lines, including degenerate single-station ones.
    pub(crate) lines: Vec<Line>,
    /// All trains, assigned or idle.
    pub(crate) trains: Vec<Train>,
    /// Auto-incrementing station ID counter.
    pub(crate) next_station_id: u32,
    /// Auto-incrementing line ID counter.
    pub(crate) next_line_id: u32,
    /// Auto-incrementing train ID counter.
    pub(crate) next_train_id: u32,
}
