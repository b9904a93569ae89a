//! Engine configuration constants and tunable parameters.
//!
//! Every threshold, weight and margin the arbitration logic uses lives here so
//! the decision rules can be tuned without touching tree code. Defaults hold
//! the calibrated values; [`EngineConfig::validate`] rejects configurations
//! the engine cannot run with.

use std::time::Duration;

use crate::error::ConfigError;

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Arbitration rate in hertz.
    pub tick_hz: f32,
    pub reflex: ReflexConfig,
    pub hysteresis: HysteresisConfig,
    pub weights: UtilityWeights,
    pub motion: MotionConfig,
    /// Minimum time between two greetings.
    pub greeting_cooldown: Duration,
}

impl EngineConfig {
    pub const DEFAULT_TICK_HZ: f32 = 30.0;
    /// Slowest accepted rate, one tick every 100 s.
    pub const MIN_TICK_HZ: f32 = 0.01;
    pub const MAX_TICK_HZ: f32 = 10_000.0;
    pub const DEFAULT_GREETING_COOLDOWN: Duration = Duration::from_secs(30);

    pub fn new() -> Self {
        Self {
            tick_hz: Self::DEFAULT_TICK_HZ,
            reflex: ReflexConfig::default(),
            hysteresis: HysteresisConfig::default(),
            weights: UtilityWeights::default(),
            motion: MotionConfig::default(),
            greeting_cooldown: Self::DEFAULT_GREETING_COOLDOWN,
        }
    }

    /// Nominal duration of one tick.
    ///
    /// Falls back to the default rate for a configuration that does not
    /// validate; the engine never runs with one.
    pub fn tick_period(&self) -> Duration {
        self.checked_tick_period()
            .unwrap_or(Duration::from_nanos(1_000_000_000 / Self::DEFAULT_TICK_HZ as u64))
    }

    /// The tick period, if `tick_hz` yields one the timer can use.
    fn checked_tick_period(&self) -> Option<Duration> {
        if !(Self::MIN_TICK_HZ..=Self::MAX_TICK_HZ).contains(&self.tick_hz) {
            return None;
        }
        Duration::try_from_secs_f32(self.tick_hz.recip())
            .ok()
            .filter(|period| !period.is_zero())
    }

    /// Checks every field against its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.checked_tick_period().is_none() {
            return Err(ConfigError::InvalidTickRate(self.tick_hz));
        }
        self.reflex.validate()?;
        self.hysteresis.validate()?;
        self.weights.validate()?;
        self.motion.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Thresholds of the fixed-priority reflex ladder.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReflexConfig {
    /// Battery level below which the Survival branch latches.
    pub battery_critical: f32,
    /// Obstacle distance below which the Safety branch fires.
    pub obstacle_cm: f32,
}

impl ReflexConfig {
    pub const DEFAULT_BATTERY_CRITICAL: f32 = 0.15;
    pub const DEFAULT_OBSTACLE_CM: f32 = 20.0;

    fn validate(&self) -> Result<(), ConfigError> {
        in_unit("reflex.battery_critical", self.battery_critical)?;
        non_negative("reflex.obstacle_cm", self.obstacle_cm)
    }
}

impl Default for ReflexConfig {
    fn default() -> Self {
        Self {
            battery_critical: Self::DEFAULT_BATTERY_CRITICAL,
            obstacle_cm: Self::DEFAULT_OBSTACLE_CM,
        }
    }
}

/// Utility winner switching rules.
///
/// A challenger replaces the current winner only if it beats the winner's
/// score by more than `switch_margin`, or once the winner has held control for
/// `min_dwell_ticks`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HysteresisConfig {
    pub switch_margin: f32,
    pub min_dwell_ticks: u64,
}

impl HysteresisConfig {
    pub const DEFAULT_SWITCH_MARGIN: f32 = 0.15;
    pub const DEFAULT_MIN_DWELL_TICKS: u64 = 30;

    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("hysteresis.switch_margin", self.switch_margin)?;
        if self.min_dwell_ticks == 0 {
            return Err(ConfigError::ZeroTicks("hysteresis.min_dwell_ticks"));
        }
        Ok(())
    }
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        Self {
            switch_margin: Self::DEFAULT_SWITCH_MARGIN,
            min_dwell_ticks: Self::DEFAULT_MIN_DWELL_TICKS,
        }
    }
}

/// Coefficients and applicability thresholds of the utility scoring functions.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UtilityWeights {
    // COME_CLOSER
    pub come_closer_hunger_min: f32,
    pub come_closer_gain: f32,

    // GREET_HAPPILY
    pub greet_score: f32,

    // FOLLOW_PERSON
    pub follow_base: f32,
    pub follow_hunger_gain: f32,

    // TILT_HEAD_CURIOUSLY
    pub tilt_curiosity_min: f32,
    pub tilt_gain: f32,

    // SEARCH_FOR_HUMAN
    pub search_hunger_min: f32,
    pub search_gain: f32,

    // DO_A_HAPPY_DANCE
    pub dance_excitement_min: f32,
    pub dance_energy_min: f32,
    pub dance_gain: f32,
    pub dance_base: f32,

    // GO_TO_SLEEP
    pub sleep_energy_max: f32,
    pub sleep_energy_weight: f32,
    pub sleep_excitement_weight: f32,
    pub sleep_hunger_weight: f32,

    // STRETCH
    pub stretch_hunger_min: f32,
    pub stretch_hunger_max: f32,
    pub stretch_gain: f32,

    // LOOK_AROUND
    pub look_around_score: f32,
}

impl UtilityWeights {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("weights.come_closer_hunger_min", self.come_closer_hunger_min),
            ("weights.tilt_curiosity_min", self.tilt_curiosity_min),
            ("weights.search_hunger_min", self.search_hunger_min),
            ("weights.dance_excitement_min", self.dance_excitement_min),
            ("weights.dance_energy_min", self.dance_energy_min),
            ("weights.sleep_energy_max", self.sleep_energy_max),
            ("weights.stretch_hunger_min", self.stretch_hunger_min),
            ("weights.stretch_hunger_max", self.stretch_hunger_max),
        ] {
            in_unit(field, value)?;
        }

        for (field, value) in [
            ("weights.come_closer_gain", self.come_closer_gain),
            ("weights.greet_score", self.greet_score),
            ("weights.follow_base", self.follow_base),
            ("weights.follow_hunger_gain", self.follow_hunger_gain),
            ("weights.tilt_gain", self.tilt_gain),
            ("weights.search_gain", self.search_gain),
            ("weights.dance_gain", self.dance_gain),
            ("weights.dance_base", self.dance_base),
            ("weights.sleep_energy_weight", self.sleep_energy_weight),
            ("weights.sleep_excitement_weight", self.sleep_excitement_weight),
            ("weights.sleep_hunger_weight", self.sleep_hunger_weight),
            ("weights.stretch_gain", self.stretch_gain),
            ("weights.look_around_score", self.look_around_score),
        ] {
            non_negative(field, value)?;
        }

        Ok(())
    }
}

impl Default for UtilityWeights {
    fn default() -> Self {
        Self {
            come_closer_hunger_min: 0.85,
            come_closer_gain: 3.0,
            greet_score: 1.2,
            follow_base: 0.5,
            follow_hunger_gain: 2.0,
            tilt_curiosity_min: 0.5,
            tilt_gain: 1.2,
            search_hunger_min: 0.7,
            search_gain: 1.5,
            dance_excitement_min: 0.8,
            dance_energy_min: 0.3,
            dance_gain: 0.7,
            dance_base: 0.5,
            sleep_energy_max: 0.4,
            sleep_energy_weight: 0.6,
            sleep_excitement_weight: 0.2,
            sleep_hunger_weight: 0.2,
            stretch_hunger_min: 0.4,
            stretch_hunger_max: 0.8,
            stretch_gain: 0.8,
            look_around_score: 0.2,
        }
    }
}

/// Tuning of the movement actions.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Face area above which the person is considered too close.
    pub too_close_area: f32,
    /// Face area at which an approach stops.
    pub approach_target_area: f32,
    /// Angular rate per unit of horizontal face offset.
    pub steer_gain: f32,
    pub follow_speed: f32,
    pub back_away_speed: f32,
    pub search_turn_rate: f32,
    pub search_timeout_ticks: u32,
    /// Ticks a lost face may stay lost before following gives up.
    pub lost_face_timeout_ticks: u32,
    pub avoid_reverse_ticks: u32,
    pub avoid_turn_ticks: u32,
    /// Duration of a single expressive gesture (nod, tilt, stretch).
    pub gesture_ticks: u32,
}

impl MotionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        in_unit("motion.too_close_area", self.too_close_area)?;
        in_unit("motion.approach_target_area", self.approach_target_area)?;
        for (field, value) in [
            ("motion.steer_gain", self.steer_gain),
            ("motion.follow_speed", self.follow_speed),
            ("motion.back_away_speed", self.back_away_speed),
            ("motion.search_turn_rate", self.search_turn_rate),
        ] {
            non_negative(field, value)?;
        }
        for (field, ticks) in [
            ("motion.search_timeout_ticks", self.search_timeout_ticks),
            ("motion.lost_face_timeout_ticks", self.lost_face_timeout_ticks),
            ("motion.avoid_reverse_ticks", self.avoid_reverse_ticks),
            ("motion.avoid_turn_ticks", self.avoid_turn_ticks),
            ("motion.gesture_ticks", self.gesture_ticks),
        ] {
            if ticks == 0 {
                return Err(ConfigError::ZeroTicks(field));
            }
        }
        Ok(())
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            too_close_area: 0.30,
            approach_target_area: 0.20,
            steer_gain: 1.5,
            follow_speed: 0.25,
            back_away_speed: 0.15,
            search_turn_rate: 0.6,
            search_timeout_ticks: 300,
            lost_face_timeout_ticks: 45,
            avoid_reverse_ticks: 15,
            avoid_turn_ticks: 18,
            gesture_ticks: 45,
        }
    }
}

fn in_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
