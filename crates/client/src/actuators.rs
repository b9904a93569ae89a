//! Actuators that only log.
use companion_core::{Command, Expression, HardwareError, SoundId};
use companion_runtime::Actuators;

/// Stand-in hardware for the simulator.
///
/// Every command is logged at `debug`; face and sound changes, which are
/// the visible part of a behavior, are also logged at `info`.
#[derive(Debug, Default)]
pub struct LoggingActuators {
    face: Option<Expression>,
    issued: u64,
}

impl LoggingActuators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands accepted so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    fn record(&mut self, command: Command) -> Result<(), HardwareError> {
        self.issued += 1;
        tracing::debug!("actuator <- {:?}", command);
        Ok(())
    }
}

impl Actuators for LoggingActuators {
    fn stop(&mut self) -> Result<(), HardwareError> {
        self.record(Command::Stop)
    }

    fn drive(&mut self, linear: f32, angular: f32) -> Result<(), HardwareError> {
        self.record(Command::Drive { linear, angular })
    }

    fn set_head(&mut self, pan: f32, tilt: f32) -> Result<(), HardwareError> {
        self.record(Command::Head { pan, tilt })
    }

    fn set_face(&mut self, expression: Expression) -> Result<(), HardwareError> {
        if self.face != Some(expression) {
            tracing::info!("face: {:?}", expression);
            self.face = Some(expression);
        }
        self.record(Command::Face(expression))
    }

    fn play_sound(&mut self, sound: SoundId) -> Result<(), HardwareError> {
        tracing::info!("sound: {:?}", sound);
        self.record(Command::PlaySound(sound))
    }

    fn stop_sound(&mut self) -> Result<(), HardwareError> {
        self.record(Command::StopSound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_accepted() {
        let mut actuators = LoggingActuators::new();
        actuators.apply(Command::Stop).unwrap();
        actuators.apply(Command::Face(Expression::Happy)).unwrap();
        actuators.apply(Command::PlaySound(SoundId::Chirp)).unwrap();
        assert_eq!(actuators.issued(), 3);
    }
}
