/// Path units a freshly spawned train covers per tick.
pub const DEFAULT_TRAIN_SPEED: f32 = 2.0;

/// Clock ticks that make up one simulated day.
pub const DEFAULT_TICKS_PER_DAY: u32 = 240;

/// Run the invariant guard every N ticks.
pub const DEFAULT_VALIDATE_INTERVAL: u32 = 100;

/// Days in the rotating week.
pub const DAYS_PER_WEEK: u8 = 7;
