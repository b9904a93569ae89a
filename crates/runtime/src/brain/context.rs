//! Per-tick context shared by every node.
//!
//! [`TickContext`] is the blackboard the behavior trees are ticked against. It
//! carries the immutable world snapshot for the current tick and the
//! [`Hardware`] handle actions issue commands through. It owns no borrowed
//! data, so trees and context can live side by side inside the engine.

use companion_core::{ActuatorClass, Command, HardwareError, WorldState};

use crate::api::Actuators;

/// Context for one arbitration tick.
pub struct TickContext {
    /// Snapshot taken at the start of the tick. Never mutated by nodes.
    pub world: WorldState,
    /// Monotonic tick counter.
    pub tick: u64,
    hardware: Hardware,
}

impl TickContext {
    pub fn new(actuators: impl Actuators + 'static) -> Self {
        Self {
            world: WorldState::default(),
            tick: 0,
            hardware: Hardware::new(Box::new(actuators)),
        }
    }

    /// Starts a new tick with a fresh snapshot.
    pub fn begin(&mut self, tick: u64, world: WorldState) {
        self.tick = tick;
        self.world = world;
        self.hardware.commanded = ActuatorClass::empty();
    }

    pub fn hardware(&mut self) -> &mut Hardware {
        &mut self.hardware
    }

    /// Issues a command, logging failures.
    ///
    /// Returns `true` if the actuator accepted the command. Used from
    /// `on_enter`/`on_tick`, where a failure becomes a `Failed` status.
    pub fn command(&mut self, command: Command) -> bool {
        match self.hardware.send(command) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("command {:?} failed: {}", command, err);
                false
            }
        }
    }

    /// Issues a safe-stop command from `on_abort`.
    ///
    /// An abort cannot change any status, so a failure here is only logged.
    pub fn safe_stop(&mut self, command: Command) {
        if let Err(err) = self.hardware.send(command) {
            tracing::error!("safe-stop {:?} failed: {}", command, err);
        }
    }

    /// Actuator classes commanded since the tick began.
    pub fn commanded(&self) -> ActuatorClass {
        self.hardware.commanded
    }
}

/// Actuator handle that tracks which classes were commanded.
pub struct Hardware {
    actuators: Box<dyn Actuators>,
    commanded: ActuatorClass,
}

impl Hardware {
    fn new(actuators: Box<dyn Actuators>) -> Self {
        Self {
            actuators,
            commanded: ActuatorClass::empty(),
        }
    }

    pub fn send(&mut self, command: Command) -> Result<(), HardwareError> {
        self.commanded |= command.class();
        self.actuators.apply(command)
    }
}
