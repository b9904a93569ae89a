//! Error types shared by the engine and its collaborators.
//!
//! # Design Principles
//!
//! - **Configuration faults** ([`ConfigError`]) are detected once at startup
//!   and are fatal; they never surface from a tick
//! - **Hardware faults** ([`HardwareError`]) are ordinary runtime outcomes:
//!   actions translate them into a `Failed` status so the tree's fallback
//!   logic handles degradation

use thiserror::Error;

use crate::hardware::ActuatorClass;

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("tick rate must be between 0.01 and 10000 Hz (got {0})")]
    InvalidTickRate(f32),

    #[error("`{field}` must be within [{min}, {max}] (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("`{field}` must be a finite, non-negative number (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("`{0}` must be at least one tick")]
    ZeroTicks(&'static str),
}

/// A failed actuator command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    #[error("{class:?} fault: {reason}")]
    Fault {
        class: ActuatorClass,
        reason: String,
    },

    #[error("{0:?} not connected")]
    Disconnected(ActuatorClass),
}

impl HardwareError {
    /// Actuator class the failure belongs to.
    pub fn class(&self) -> ActuatorClass {
        match self {
            HardwareError::Fault { class, .. } => *class,
            HardwareError::Disconnected(class) => *class,
        }
    }
}
