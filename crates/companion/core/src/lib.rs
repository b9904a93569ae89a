//! Data model of the companion robot's decision engine.
//!
//! This crate holds everything the engine reads but never decides:
//!
//! - [`WorldState`] and [`Drives`]: the per-tick snapshot
//! - [`BehaviorId`] and [`Branch`]: the behavior catalogue and arbiter ladder
//! - [`Command`], [`ActuatorClass`], [`Expression`], [`SoundId`]: the
//!   actuator vocabulary
//! - [`EngineConfig`]: thresholds, weights and margins
//! - [`DriveModel`] and [`Mood`]: a reference producer of drive variables
//!
//! Serialization is available behind the `serde` feature.

pub mod behavior;
pub mod config;
pub mod drives;
pub mod error;
pub mod hardware;
pub mod world;

pub use behavior::{BehaviorId, Branch};
pub use config::{EngineConfig, HysteresisConfig, MotionConfig, ReflexConfig, UtilityWeights};
pub use drives::{DriveModel, DriveRates, Mood};
pub use error::{ConfigError, HardwareError};
pub use hardware::{ActuatorClass, Command, Expression, SoundId};
pub use world::{Drives, WorldState, unit};
