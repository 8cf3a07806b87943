//! Tunable topology parameters.
//!
//! Collects the pointer policies and tick cadences into a single
//! [`TopologyParams`] resource so they can be swapped at runtime or loaded
//! from JSON. Systems and the action executor read `Res<TopologyParams>`
//! instead of module-level constants.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_TICKS_PER_DAY, DEFAULT_TRAIN_SPEED, DEFAULT_VALIDATE_INTERVAL};
use crate::line::{InsertShiftPolicy, LoopTrimPolicy};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyParams {
    /// Pointer policy for indexed insertion.
    pub insert_shift: InsertShiftPolicy,
    /// Pointer policy for trimming one end of a loop.
    pub loop_trim: LoopTrimPolicy,
    /// Clock ticks per simulated day.
    pub ticks_per_day: u32,
    /// Speed given to trains spawned without an explicit speed.
    pub default_train_speed: f32,
    /// Ticks between invariant guard passes.
    pub validate_interval: u32,
}

impl Default for TopologyParams {
    fn default() -> Self {
        Self {
            insert_shift: InsertShiftPolicy::default(),
            loop_trim: LoopTrimPolicy::default(),
            ticks_per_day: DEFAULT_TICKS_PER_DAY,
            default_train_speed: DEFAULT_TRAIN_SPEED,
            validate_interval: DEFAULT_VALIDATE_INTERVAL,
        }
    }
}

impl TopologyParams {
    /// The older pointer behaviour: every train shifted on indexed
    /// insertion, loop trims never reconciled.
    pub fn legacy() -> Self {
        Self {
            insert_shift: InsertShiftPolicy::Unconditional,
            loop_trim: LoopTrimPolicy::Unreconciled,
            ..Default::default()
        }
    }

    /// Deserialize from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| format!("JSON decode error: {e}"))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.ticks_per_day == 0 {
            return Err("ticks_per_day must be at least 1".to_string());
        }
        if self.validate_interval == 0 {
            return Err("validate_interval must be at least 1".to_string());
        }
        if !self.default_train_speed.is_finite() || self.default_train_speed <= 0.0 {
            return Err(format!(
                "default_train_speed must be positive, got {}",
                self.default_train_speed
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fix_insert_shift_and_reconcile_loops() {
        let p = TopologyParams::default();
        assert_eq!(p.insert_shift, InsertShiftPolicy::AheadOfInsertion);
        assert_eq!(p.loop_trim, LoopTrimPolicy::Reconciled);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let p = TopologyParams::from_json(r#"{"insert_shift": "Unconditional"}"#).unwrap();
        assert_eq!(p.insert_shift, InsertShiftPolicy::Unconditional);
        assert_eq!(p.loop_trim, LoopTrimPolicy::Reconciled);
        assert_eq!(p.ticks_per_day, DEFAULT_TICKS_PER_DAY);
    }

    #[test]
    fn test_from_json_roundtrip() {
        let p = TopologyParams::legacy();
        let decoded = TopologyParams::from_json(&p.to_json()).unwrap();
        assert_eq!(p, decoded);
    }

    #[test]
    fn test_from_json_rejects_zero_day_length() {
        let err = TopologyParams::from_json(r#"{"ticks_per_day": 0}"#).unwrap_err();
        assert!(err.contains("ticks_per_day"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(TopologyParams::from_json("not json").is_err());
    }
}
