//! Data-driven game balance
//!
//! Every gameplay number lives here. Defaults reproduce the shipped game;
//! overrides come from JSON (LocalStorage on web, a file on native) and any
//! field left out keeps its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BASE_HEIGHT, BASE_WIDTH};

/// Errors from loading or validating tuning overrides
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Spawn parameters for one falling stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTuning {
    /// Chance of a spawn on each simulation tick
    pub probability: f64,
    pub width: f32,
    pub height: f32,
    /// Slowest fall speed (pixels per tick)
    pub base_speed: f32,
    /// Extra speed drawn uniformly in [0, jitter]
    pub speed_jitter: f32,
}

/// Complete balance sheet for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub game_width: f32,
    pub game_height: f32,

    // === Catcher ===
    pub catcher_width: f32,
    pub catcher_height: f32,
    /// Distance from the bottom edge to the catcher's top
    pub catcher_bottom_offset: f32,
    /// Pixels per tick for keys and on-screen buttons
    pub catcher_step: f32,

    // === Drag steering ===
    pub drag_sensitivity: f32,
    /// Fraction of each applied movement the drag anchor follows
    pub drag_anchor_follow: f32,
    /// Pointer jitter below this many pixels is ignored
    pub drag_deadzone: f32,

    // === Falling entities ===
    pub collectible: SpawnTuning,
    pub hazard: SpawnTuning,
    /// How far outside the playfield an entity may spawn horizontally
    pub spawn_padding: f32,

    // === Rules ===
    pub target_score: u32,
    pub round_secs: u32,
    pub countdown_steps: u8,

    // === Feedback cues ===
    pub mouth_cue_ms: u64,
    pub minus_one_cue_ms: u64,
    /// When the "-1" cue switches from fading in to fading out
    pub minus_one_fade_out_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            game_width: BASE_WIDTH,
            game_height: BASE_HEIGHT,

            catcher_width: 60.0,
            catcher_height: 60.0,
            catcher_bottom_offset: 80.0,
            catcher_step: 5.0,

            drag_sensitivity: 0.8,
            drag_anchor_follow: 0.5,
            drag_deadzone: 2.0,

            collectible: SpawnTuning {
                probability: 0.015,
                width: 70.0,
                height: 70.0,
                base_speed: 2.5,
                speed_jitter: 2.0,
            },
            hazard: SpawnTuning {
                probability: 0.015,
                width: 50.0,
                height: 50.0,
                base_speed: 2.5,
                speed_jitter: 2.0,
            },
            spawn_padding: 60.0,

            target_score: 10,
            round_secs: 15,
            countdown_steps: 3,

            mouth_cue_ms: 100,
            minus_one_cue_ms: 500,
            minus_one_fade_out_ms: 300,
        }
    }
}

impl Tuning {
    /// LocalStorage key for overrides (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "laddoo_catch_tuning";

    /// Longest a feedback cue may stay on screen
    pub const MAX_CUE_MS: u64 = 60_000;

    /// Parse overrides from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.game_width <= 0.0 || self.game_height <= 0.0 {
            return Err(invalid("game_width/game_height", "playfield must have positive size"));
        }
        if self.catcher_width <= 0.0 || self.catcher_width > self.game_width {
            return Err(invalid("catcher_width", "must be positive and fit the playfield"));
        }
        if self.catcher_height <= 0.0 {
            return Err(invalid("catcher_height", "must be positive"));
        }
        for (field, spawn) in [("collectible", &self.collectible), ("hazard", &self.hazard)] {
            if !(0.0..=1.0).contains(&spawn.probability) {
                return Err(invalid(
                    field,
                    format!("spawn probability {} is outside [0, 1]", spawn.probability),
                ));
            }
            if spawn.width <= 0.0 || spawn.height <= 0.0 {
                return Err(invalid(field, "entity size must be positive"));
            }
            if spawn.base_speed <= 0.0 || spawn.speed_jitter < 0.0 {
                return Err(invalid(field, "speeds must be positive"));
            }
            if spawn.width > self.game_width + 2.0 * self.spawn_padding {
                return Err(invalid(field, "entity is wider than the spawn band"));
            }
        }
        if self.spawn_padding < 0.0 {
            return Err(invalid("spawn_padding", "must not be negative"));
        }
        if self.target_score == 0 {
            return Err(invalid("target_score", "must be at least 1"));
        }
        if self.round_secs == 0 {
            return Err(invalid("round_secs", "must be at least 1"));
        }
        for (field, ms) in [
            ("mouth_cue_ms", self.mouth_cue_ms),
            ("minus_one_cue_ms", self.minus_one_cue_ms),
            ("minus_one_fade_out_ms", self.minus_one_fade_out_ms),
        ] {
            if ms > Self::MAX_CUE_MS {
                return Err(invalid(
                    field,
                    format!("{} ms exceeds the {} ms limit", ms, Self::MAX_CUE_MS),
                ));
            }
        }
        if self.minus_one_fade_out_ms > self.minus_one_cue_ms {
            return Err(invalid(
                "minus_one_fade_out_ms",
                "fade-out must start before the cue ends",
            ));
        }
        Ok(())
    }

    /// Catcher x that centers it on the playfield
    pub fn catcher_center_x(&self) -> f32 {
        self.game_width / 2.0 - self.catcher_width / 2.0
    }

    /// Load overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning overrides: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Load overrides from a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning overrides from {}", path.display());
        Ok(tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.target_score, 10);
        assert_eq!(tuning.round_secs, 15);
        assert_eq!(tuning.catcher_center_x(), 157.5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "target_score": 5, "round_secs": 30 }"#).unwrap();
        assert_eq!(tuning.target_score, 5);
        assert_eq!(tuning.round_secs, 30);
        assert_eq!(tuning.catcher_step, 5.0);
        assert_eq!(tuning.hazard, Tuning::default().hazard);
    }

    #[test]
    fn test_bad_probability_rejected() {
        let json = r#"{
            "hazard": { "probability": 1.5, "width": 50, "height": 50,
                        "base_speed": 2.5, "speed_jitter": 2 }
        }"#;
        match Tuning::from_json(json) {
            Err(TuningError::Invalid { field, .. }) => assert_eq!(field, "hazard"),
            other => panic!("expected invalid hazard, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_zero_target_rejected() {
        let tuning = Tuning {
            target_score: 0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_oversized_cue_rejected() {
        let json = r#"{"mouth_cue_ms": 18446744073709551615}"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(TuningError::Invalid {
                field: "mouth_cue_ms",
                ..
            })
        ));

        let tuning = Tuning {
            minus_one_cue_ms: Tuning::MAX_CUE_MS,
            minus_one_fade_out_ms: Tuning::MAX_CUE_MS,
            ..Default::default()
        };
        assert!(tuning.validate().is_ok());
        let tuning = Tuning {
            minus_one_cue_ms: Tuning::MAX_CUE_MS + 1,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
