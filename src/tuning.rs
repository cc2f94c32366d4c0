//! Data-driven game balance
//!
//! Every difficulty knob is a pure function of the current score, parameterized
//! by a [`Tuning`] value. Defaults reproduce the shipped difficulty curve: trash
//! gets scarcer and fish more numerous (and faster) as the player scores.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Balance constants. Unknown/missing JSON fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Entities ===
    /// Entity edge length at score 0 (px)
    pub entity_base_size: f32,
    /// Size lost per point scored
    pub entity_shrink_per_point: f32,
    /// Entities never shrink below this
    pub entity_min_size: f32,

    /// Hook edge length relative to entity size
    pub hook_size_ratio: f32,

    /// Speed factor at score 0
    pub speed_base: f32,
    /// Speed factor gained per point
    pub speed_gain_per_point: f32,
    /// Lower bound on the speed factor
    pub speed_floor: f32,
    /// Per-entity random multiplier range `[min, max)`
    pub speed_jitter_min: f32,
    pub speed_jitter_max: f32,

    // === Pool targets ===
    pub trash_base: u32,
    pub trash_min: u32,
    pub fish_base: u32,

    // === Player ===
    pub ship_width: f32,
    pub ship_height: f32,
    /// Horizontal distance per move action (px)
    pub ship_step: f32,
    /// Hook vertical speed (px per frame)
    pub hook_speed: f32,

    /// Fraction of the canvas height covered by sky; water starts here
    pub water_line: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            entity_base_size: 60.0,
            entity_shrink_per_point: 2.0,
            entity_min_size: 30.0,

            hook_size_ratio: 0.4,

            speed_base: 1.0,
            speed_gain_per_point: 0.2,
            speed_floor: 0.5,
            speed_jitter_min: 0.7,
            speed_jitter_max: 1.0,

            trash_base: 10,
            trash_min: 2,
            fish_base: 5,

            ship_width: 80.0,
            ship_height: 40.0,
            ship_step: 5.0,
            hook_speed: 0.8,

            water_line: 0.4,
        }
    }
}

/// Rejected tuning override
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// NaN or infinite (JSON numbers beyond f32 range parse to infinity)
    NonFinite { field: &'static str, value: f32 },
    /// A size, speed or step that must be strictly positive
    NonPositive { field: &'static str, value: f32 },
    /// `min` is larger than `max`
    InvertedRange { field: &'static str, min: f32, max: f32 },
    /// Water line must lie strictly inside the canvas
    WaterLine(f32),
    /// Pool floors must leave at least one entity of each kind
    EmptyPool { field: &'static str },
    /// Override could not be parsed
    Parse(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field, value } => write!(f, "{field} must be finite, got {value}"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::InvertedRange { field, min, max } => {
                write!(f, "{field} range is inverted: min={min}, max={max}")
            }
            Self::WaterLine(value) => write!(f, "water_line must be in (0, 1), got {value}"),
            Self::EmptyPool { field } => write!(f, "{field} must be at least 1"),
            Self::Parse(msg) => write!(f, "invalid tuning JSON: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Entity edge length for a score: `max(min, base - shrink * score)`
    pub fn entity_size(&self, score: u32) -> f32 {
        (self.entity_base_size - self.entity_shrink_per_point * score as f32)
            .max(self.entity_min_size)
    }

    /// Hook edge length for a score
    pub fn hook_size(&self, score: u32) -> f32 {
        self.entity_size(score) * self.hook_size_ratio
    }

    /// Entity speed multiplier for a score: `max(floor, base + gain * score)`
    pub fn speed_factor(&self, score: u32) -> f32 {
        (self.speed_base + self.speed_gain_per_point * score as f32).max(self.speed_floor)
    }

    /// Live trash count the pool is leveled to
    pub fn trash_target(&self, score: u32) -> usize {
        self.trash_base.saturating_sub(score).max(self.trash_min) as usize
    }

    /// Live fish count the pool is leveled to
    pub fn fish_target(&self, score: u32) -> usize {
        self.fish_base.saturating_add(score) as usize
    }

    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        let all = [
            ("entity_base_size", self.entity_base_size),
            ("entity_shrink_per_point", self.entity_shrink_per_point),
            ("entity_min_size", self.entity_min_size),
            ("hook_size_ratio", self.hook_size_ratio),
            ("speed_base", self.speed_base),
            ("speed_gain_per_point", self.speed_gain_per_point),
            ("speed_floor", self.speed_floor),
            ("speed_jitter_min", self.speed_jitter_min),
            ("speed_jitter_max", self.speed_jitter_max),
            ("ship_width", self.ship_width),
            ("ship_height", self.ship_height),
            ("ship_step", self.ship_step),
            ("hook_speed", self.hook_speed),
            ("water_line", self.water_line),
        ];
        for (field, value) in all {
            if !value.is_finite() {
                return Err(TuningError::NonFinite { field, value });
            }
        }

        let positive = [
            ("entity_min_size", self.entity_min_size),
            ("hook_size_ratio", self.hook_size_ratio),
            ("speed_floor", self.speed_floor),
            ("speed_jitter_min", self.speed_jitter_min),
            ("ship_width", self.ship_width),
            ("ship_height", self.ship_height),
            ("ship_step", self.ship_step),
            ("hook_speed", self.hook_speed),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        if self.entity_min_size > self.entity_base_size {
            return Err(TuningError::InvertedRange {
                field: "entity_size",
                min: self.entity_min_size,
                max: self.entity_base_size,
            });
        }
        if self.speed_jitter_min >= self.speed_jitter_max {
            return Err(TuningError::InvertedRange {
                field: "speed_jitter",
                min: self.speed_jitter_min,
                max: self.speed_jitter_max,
            });
        }
        if !(self.water_line > 0.0 && self.water_line < 1.0) {
            return Err(TuningError::WaterLine(self.water_line));
        }
        if self.trash_min == 0 {
            return Err(TuningError::EmptyPool { field: "trash_min" });
        }
        if self.fish_base == 0 {
            return Err(TuningError::EmptyPool { field: "fish_base" });
        }
        Ok(())
    }

    /// LocalStorage key for balance overrides
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "ocean_clean_tuning";

    /// Load overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());

        match stored.map(|json| Self::from_json(&json)) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides from LocalStorage");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored tuning: {e}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_score_zero_curve() {
        let t = Tuning::default();
        assert_eq!(t.entity_size(0), 60.0);
        assert!((t.hook_size(0) - 24.0).abs() < 1e-4);
        assert_eq!(t.trash_target(0), 10);
        assert_eq!(t.fish_target(0), 5);
        assert!((t.speed_factor(0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_three_curve() {
        let t = Tuning::default();
        assert_eq!(t.entity_size(3), 54.0);
        assert_eq!(t.trash_target(3), 7);
        assert_eq!(t.fish_target(3), 8);
        assert!((t.speed_factor(3) - 1.6).abs() < 1e-5);
    }

    #[test]
    fn test_floors_reached() {
        let t = Tuning::default();
        assert_eq!(t.entity_size(15), 30.0);
        assert_eq!(t.entity_size(100), 30.0);
        assert_eq!(t.trash_target(8), 2);
        assert_eq!(t.trash_target(1000), 2);
    }

    #[test]
    fn test_partial_json_override() {
        let t = Tuning::from_json(r#"{ "hook_speed": 1.5, "fish_base": 3 }"#).unwrap();
        assert_eq!(t.hook_speed, 1.5);
        assert_eq!(t.fish_target(0), 3);
        assert_eq!(t.entity_size(0), 60.0);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        assert!(matches!(
            Tuning::from_json(r#"{ "hook_speed": 0.0 }"#),
            Err(TuningError::NonPositive { field: "hook_speed", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "water_line": 1.2 }"#),
            Err(TuningError::WaterLine(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "speed_jitter_min": 1.0 }"#),
            Err(TuningError::InvertedRange { field: "speed_jitter", .. })
        ));
        assert!(matches!(Tuning::from_json("not json"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_out_of_range_numbers_rejected() {
        assert!(matches!(
            Tuning::from_json(r#"{ "speed_jitter_max": 1e39 }"#),
            Err(TuningError::NonFinite { field: "speed_jitter_max", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "entity_shrink_per_point": -1e40 }"#),
            Err(TuningError::NonFinite { field: "entity_shrink_per_point", .. })
        ));
        let mut t = Tuning::default();
        t.speed_gain_per_point = f32::NAN;
        assert!(matches!(t.validate(), Err(TuningError::NonFinite { .. })));
    }

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    proptest! {
        #[test]
        fn entity_size_matches_formula(score in 0u32..10_000) {
            let t = Tuning::default();
            let expected = (60.0 - 2.0 * score as f32).max(30.0);
            prop_assert_eq!(t.entity_size(score), expected);
        }

        #[test]
        fn curve_is_monotonic(score in 0u32..10_000) {
            let t = Tuning::default();
            prop_assert!(t.entity_size(score + 1) <= t.entity_size(score));
            prop_assert!(t.entity_size(score) >= 30.0);
            prop_assert!(t.trash_target(score + 1) <= t.trash_target(score));
            prop_assert!(t.trash_target(score) >= 2);
            prop_assert!(t.fish_target(score + 1) >= t.fish_target(score));
            prop_assert!(t.speed_factor(score + 1) >= t.speed_factor(score));
        }
    }
}
