//! Public engine API surface.
//!
//! This module gathers the types exposed to embedders of the engine: the error
//! type and the collaborator contracts with their stock implementations.

pub mod errors;
pub mod providers;
pub mod recording;

pub use errors::{EngineError, Result};
pub use providers::{
    Actuators, ChargeSignal, ChargingMonitor, WorldFeed, WorldPublisher, WorldStateProvider,
    world_channel,
};
pub use recording::RecordingActuators;
