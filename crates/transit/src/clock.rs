use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::DAYS_PER_WEEK;
use crate::params::TopologyParams;

/// Day of the rotating seven-day week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[default]
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; DAYS_PER_WEEK as usize] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mon => "MON",
            Weekday::Tue => "TUE",
            Weekday::Wed => "WED",
            Weekday::Thu => "THU",
            Weekday::Fri => "FRI",
            Weekday::Sat => "SAT",
            Weekday::Sun => "SUN",
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Day at `index`, wrapping modulo seven.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % DAYS_PER_WEEK) as usize]
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// The simulation heartbeat: a tick counter plus the current weekday.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    time: u64,
    day: Weekday,
    pub paused: bool,
}

impl Clock {
    pub fn current_time(&self) -> u64 {
        self.time
    }

    pub fn current_day(&self) -> Weekday {
        self.day
    }

    pub fn advance_time(&mut self) {
        self.time += 1;
    }

    pub fn advance_day(&mut self) {
        self.day = self.day.next();
    }

    /// Advance one tick, rolling the day over every `ticks_per_day` ticks.
    /// Returns whether the tick ran.
    pub fn tick(&mut self, ticks_per_day: u32) -> bool {
        if self.paused {
            return false;
        }
        self.advance_time();
        if ticks_per_day > 0 && self.time % u64::from(ticks_per_day) == 0 {
            self.advance_day();
        }
        true
    }

    pub fn formatted(&self) -> String {
        format!("{} t={}", self.day.label(), self.time)
    }
}

pub fn tick_clock(mut clock: ResMut<Clock>, params: Res<TopologyParams>) {
    clock.tick(params.ticks_per_day);
}
