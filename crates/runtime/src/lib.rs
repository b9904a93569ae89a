//! Reactive decision engine for a companion robot.
//!
//! Each tick the engine takes one [`WorldState`](companion_core::WorldState)
//! snapshot, lets the priority arbiter pick a branch, ticks that branch's
//! behavior tree, and reports what happened. Hardware is reached only through
//! the collaborator traits in [`api`].
//!
//! Modules are organized by responsibility:
//! - [`engine`] hosts the tick driver and its builder
//! - [`api`] exposes the collaborator contracts and the error type
//! - [`brain`] holds the arbiter, the utility layer and the behavior trees
//! - [`events`] provides the decision event bus and tick reports
pub mod api;
pub mod brain;
pub mod engine;
pub mod events;

pub use api::{
    Actuators, ChargeSignal, ChargingMonitor, EngineError, RecordingActuators, Result, WorldFeed,
    WorldPublisher, WorldStateProvider, world_channel,
};
pub use brain::{
    Decision, PriorityArbiter, Score, Subtree, TickContext, UtilityBehavior, UtilityOutcome,
    UtilitySelector,
};
pub use engine::{Engine, EngineBuilder, stock_behaviors};
pub use events::{DecisionEvent, EventBus, TickReport};
