//! Per-tick world snapshot.
//!
//! [`WorldState`] is the only input to arbitration. Perception and sensor
//! collaborators publish a fresh value between ticks; the engine copies it
//! once per tick and never mutates it. Every bounded field is clamped by its
//! producer, so the engine reads without validating.

use std::time::Duration;

/// Internal drive variables, each in `[0, 1]`.
///
/// Drives are derived signals (produced by a [`crate::DriveModel`] or any
/// other producer) that the utility layer scores behaviors against.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Drives {
    /// 0.0 (exhausted) to 1.0 (fully rested).
    pub energy: f32,
    /// 0.0 (satisfied) to 1.0 (starving for attention). Doubles as boredom.
    pub attention_hunger: f32,
    pub excitement: f32,
    pub caution: f32,
    pub curiosity: f32,
}

impl Drives {
    pub const DEFAULT_ENERGY: f32 = 0.85;
    pub const DEFAULT_ATTENTION_HUNGER: f32 = 0.35;
    pub const DEFAULT_EXCITEMENT: f32 = 0.45;
    pub const DEFAULT_CAUTION: f32 = 0.3;
    pub const DEFAULT_CURIOSITY: f32 = 0.65;

    /// Returns a copy with every drive clamped to `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            energy: unit(self.energy),
            attention_hunger: unit(self.attention_hunger),
            excitement: unit(self.excitement),
            caution: unit(self.caution),
            curiosity: unit(self.curiosity),
        }
    }
}

impl Default for Drives {
    fn default() -> Self {
        Self {
            energy: Self::DEFAULT_ENERGY,
            attention_hunger: Self::DEFAULT_ATTENTION_HUNGER,
            excitement: Self::DEFAULT_EXCITEMENT,
            caution: Self::DEFAULT_CAUTION,
            curiosity: Self::DEFAULT_CURIOSITY,
        }
    }
}

/// Immutable-per-tick snapshot of all sensed and derived signals.
///
/// # Fallbacks
///
/// [`WorldState::default`] is also the "sensor unavailable" value for every
/// field: full battery, no obstacle, no touch, no hotword, no face, never
/// greeted. A producer that lost a reading leaves the field at its default so
/// arbitration never sees a missing value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldState {
    /// Remaining charge in `[0, 1]`.
    pub battery_level: f32,
    /// Distance to the nearest obstacle, `f32::INFINITY` if none detected.
    pub obstacle_distance_cm: f32,
    pub touch_active: bool,
    pub hotword_active: bool,
    pub face_visible: bool,
    /// Fraction of the camera frame covered by the tracked face, `[0, 1]`.
    pub face_area_fraction: f32,
    /// Horizontal face center in normalized image coordinates, `[0, 1]`.
    pub face_center_x: f32,
    pub time_since_last_greeting: Duration,
    /// The speaker is still playing the last requested sound.
    pub speaker_busy: bool,
    pub drives: Drives,
}

impl WorldState {
    /// Returns `true` if an obstacle was detected at all.
    pub fn obstacle_detected(&self) -> bool {
        self.obstacle_distance_cm.is_finite()
    }

    /// Signed horizontal offset of the face from the image center, `[-0.5, 0.5]`.
    ///
    /// Positive when the face is right of center.
    pub fn face_offset(&self) -> f32 {
        if self.face_visible {
            self.face_center_x - 0.5
        } else {
            0.0
        }
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            battery_level: 1.0,
            obstacle_distance_cm: f32::INFINITY,
            touch_active: false,
            hotword_active: false,
            face_visible: false,
            face_area_fraction: 0.0,
            face_center_x: 0.5,
            time_since_last_greeting: Duration::MAX,
            speaker_busy: false,
            drives: Drives::default(),
        }
    }
}

/// Clamps a value to `[0, 1]`, mapping NaN to 0.
#[inline]
pub fn unit(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_safe_fallbacks() {
        let world = WorldState::default();
        assert!(!world.obstacle_detected());
        assert!(!world.face_visible);
        assert_eq!(world.face_offset(), 0.0);
        assert_eq!(world.battery_level, 1.0);
    }

    #[test]
    fn drives_clamp_out_of_range_values() {
        let drives = Drives {
            energy: 1.4,
            attention_hunger: -0.2,
            excitement: f32::NAN,
            ..Drives::default()
        }
        .clamped();

        assert_eq!(drives.energy, 1.0);
        assert_eq!(drives.attention_hunger, 0.0);
        assert_eq!(drives.excitement, 0.0);
    }
}
