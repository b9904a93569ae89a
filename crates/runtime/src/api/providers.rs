//! Collaborator contracts between the engine and the outside world.
//!
//! Sensors, actuators and the charging subsystem are plugged in through these
//! traits so the engine can run against real hardware, a simulator, or test
//! doubles. None of the methods may block the tick thread.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use companion_core::{Command, Expression, HardwareError, SoundId, WorldState};
use tokio::sync::watch;

use crate::events::TickReport;

/// Producer of the per-tick world snapshot.
pub trait WorldStateProvider: Send {
    /// Returns a fully populated snapshot in bounded time.
    ///
    /// Called exactly once per tick, before any arbitration work.
    fn snapshot(&mut self) -> WorldState;

    /// Feedback about what the engine did with the last snapshot.
    ///
    /// Drive producers use this to apply behavior costs and rewards.
    fn observe(&mut self, _report: &TickReport) {}
}

/// Actuator command surface.
///
/// Actions call these methods; the engine itself never does.
pub trait Actuators: Send {
    fn stop(&mut self) -> Result<(), HardwareError>;

    fn drive(&mut self, linear: f32, angular: f32) -> Result<(), HardwareError>;

    fn set_head(&mut self, pan: f32, tilt: f32) -> Result<(), HardwareError>;

    fn set_face(&mut self, expression: Expression) -> Result<(), HardwareError>;

    fn play_sound(&mut self, sound: SoundId) -> Result<(), HardwareError>;

    fn stop_sound(&mut self) -> Result<(), HardwareError>;

    /// Dispatches a [`Command`] to the matching method.
    fn apply(&mut self, command: Command) -> Result<(), HardwareError> {
        match command {
            Command::Stop => self.stop(),
            Command::Drive { linear, angular } => self.drive(linear, angular),
            Command::Head { pan, tilt } => self.set_head(pan, tilt),
            Command::Face(expression) => self.set_face(expression),
            Command::PlaySound(sound) => self.play_sound(sound),
            Command::StopSound => self.stop_sound(),
        }
    }
}

impl<A: Actuators + ?Sized> Actuators for Box<A> {
    fn stop(&mut self) -> Result<(), HardwareError> {
        (**self).stop()
    }

    fn drive(&mut self, linear: f32, angular: f32) -> Result<(), HardwareError> {
        (**self).drive(linear, angular)
    }

    fn set_head(&mut self, pan: f32, tilt: f32) -> Result<(), HardwareError> {
        (**self).set_head(pan, tilt)
    }

    fn set_face(&mut self, expression: Expression) -> Result<(), HardwareError> {
        (**self).set_face(expression)
    }

    fn play_sound(&mut self, sound: SoundId) -> Result<(), HardwareError> {
        (**self).play_sound(sound)
    }

    fn stop_sound(&mut self) -> Result<(), HardwareError> {
        (**self).stop_sound()
    }

    fn apply(&mut self, command: Command) -> Result<(), HardwareError> {
        (**self).apply(command)
    }
}

/// Charging subsystem signal.
pub trait ChargingMonitor: Send {
    /// Returns `true` once the battery has been recharged.
    ///
    /// This is the only way out of the latched Survival branch.
    fn charge_complete(&mut self) -> bool;
}

// ============================================================================
// Stock collaborators
// ============================================================================

/// Creates a snapshot channel for perception producers.
///
/// Producers publish whole [`WorldState`] values through the returned
/// [`WorldPublisher`]; the engine reads the latest one through [`WorldFeed`].
/// A snapshot is copied out, never shared, so readers cannot observe a torn
/// update.
pub fn world_channel(initial: WorldState) -> (WorldPublisher, WorldFeed) {
    let (tx, rx) = watch::channel(initial);
    (WorldPublisher { tx }, WorldFeed { rx })
}

/// Publishing half of [`world_channel`].
#[derive(Debug)]
pub struct WorldPublisher {
    tx: watch::Sender<WorldState>,
}

impl WorldPublisher {
    /// Replaces the current snapshot.
    pub fn publish(&self, world: WorldState) {
        self.tx.send_replace(world);
    }

    /// Edits the current snapshot in place.
    pub fn update(&self, edit: impl FnOnce(&mut WorldState)) {
        self.tx.send_modify(edit);
    }

    pub fn current(&self) -> WorldState {
        *self.tx.borrow()
    }
}

/// Reading half of [`world_channel`].
#[derive(Clone, Debug)]
pub struct WorldFeed {
    rx: watch::Receiver<WorldState>,
}

impl WorldStateProvider for WorldFeed {
    fn snapshot(&mut self) -> WorldState {
        *self.rx.borrow_and_update()
    }
}

/// Shared charge-complete flag.
///
/// Clones observe the same flag, so a charging driver can hold one clone and
/// hand another to the engine.
#[derive(Clone, Debug, Default)]
pub struct ChargeSignal {
    complete: Arc<AtomicBool>,
}

impl ChargeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, complete: bool) {
        self.complete.store(complete, Ordering::Release);
    }

    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }
}

impl ChargingMonitor for ChargeSignal {
    fn charge_complete(&mut self) -> bool {
        self.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_returns_latest_published_snapshot() {
        let (publisher, mut feed) = world_channel(WorldState::default());
        publisher.update(|world| world.touch_active = true);
        assert!(publisher.current().touch_active);
        assert!(feed.snapshot().touch_active);

        publisher.publish(WorldState::default());
        assert!(!feed.snapshot().touch_active);
    }

    #[test]
    fn charge_signal_is_shared_between_clones() {
        let signal = ChargeSignal::new();
        let mut monitor = signal.clone();
        assert!(!monitor.charge_complete());
        signal.set(true);
        assert!(monitor.charge_complete());
    }
}
