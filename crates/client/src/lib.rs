//! Simulator for the companion robot's decision engine.
//!
//! This crate is the composition root: it loads configuration, installs
//! logging and wires a scripted [`SimulatedWorld`] and [`LoggingActuators`]
//! into a [`companion_runtime::Engine`].
//!
//! - [`config`]: layered engine configuration
//! - [`logging`]: stderr and file logging
//! - [`scenario`]: RON sensor timelines
//! - [`sim`]: the simulated world
//! - [`actuators`]: log-only actuators

pub mod actuators;
pub mod config;
pub mod logging;
pub mod scenario;
pub mod sim;

pub use actuators::LoggingActuators;
pub use scenario::{Scenario, SensorEvent, TimedEvent};
pub use sim::SimulatedWorld;

use anyhow::{Context, Result};
use companion_core::EngineConfig;
use companion_runtime::Engine;

/// Builds an engine over a simulated world replaying `scenario`.
pub fn build_engine(config: EngineConfig, scenario: Scenario) -> Result<Engine> {
    config.validate().context("invalid engine configuration")?;
    let world = SimulatedWorld::new(scenario, config.tick_period());
    let charge = world.charge_signal();

    Engine::builder()
        .config(config)
        .world(world)
        .actuators(LoggingActuators::new())
        .charging(charge)
        .build()
        .context("failed to build engine")
}
