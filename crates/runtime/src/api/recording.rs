//! In-memory actuator double.
use std::sync::{Arc, Mutex, MutexGuard};

use companion_core::{ActuatorClass, Command, Expression, HardwareError, SoundId};

use super::providers::Actuators;

#[derive(Debug, Default)]
struct Journal {
    commands: Vec<Command>,
    failing: ActuatorClass,
}

/// Actuators that record every successful command.
///
/// Clones share the same journal, so a test can keep one clone while the
/// engine owns another. Classes marked with [`RecordingActuators::fail`]
/// reject their commands with [`HardwareError::Fault`] and are not recorded.
#[derive(Clone, Debug, Default)]
pub struct RecordingActuators {
    journal: Arc<Mutex<Journal>>,
}

impl RecordingActuators {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands recorded so far, oldest first.
    pub fn commands(&self) -> Vec<Command> {
        self.journal().commands.clone()
    }

    /// Removes and returns the recorded commands.
    pub fn drain(&self) -> Vec<Command> {
        std::mem::take(&mut self.journal().commands)
    }

    pub fn len(&self) -> usize {
        self.journal().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every later command for `classes` fail.
    pub fn fail(&self, classes: ActuatorClass) {
        self.journal().failing.insert(classes);
    }

    /// Clears all injected failures.
    pub fn heal(&self) {
        self.journal().failing = ActuatorClass::empty();
    }

    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&mut self, command: Command) -> Result<(), HardwareError> {
        let mut journal = self.journal();
        let class = command.class();
        if journal.failing.intersects(class) {
            return Err(HardwareError::Fault {
                class,
                reason: "injected fault".to_string(),
            });
        }
        journal.commands.push(command);
        Ok(())
    }
}

impl Actuators for RecordingActuators {
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
        self.record(Command::Face(expression))
    }

    fn play_sound(&mut self, sound: SoundId) -> Result<(), HardwareError> {
        self.record(Command::PlaySound(sound))
    }

    fn stop_sound(&mut self) -> Result<(), HardwareError> {
        self.record(Command::StopSound)
    }
}
