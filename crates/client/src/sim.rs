//! Simulated world: a scripted sensor timeline plus drive dynamics.
use std::time::Duration;

use behavior_tree::Status;
use companion_core::{BehaviorId, DriveModel, WorldState};
use companion_runtime::{ChargeSignal, TickReport, WorldStateProvider};

use crate::scenario::{Scenario, SensorEvent, TimedEvent};

/// Snapshot producer that replays a [`Scenario`] and integrates drives.
///
/// Every snapshot advances simulated time by one tick period. Feedback from
/// the engine's [`TickReport`] is applied to the drive model, and a finished
/// greeting restarts the greeting cooldown.
pub struct SimulatedWorld {
    sensed: WorldState,
    model: DriveModel,
    events: std::vec::IntoIter<TimedEvent>,
    pending: Option<TimedEvent>,
    tick: u64,
    period: Duration,
    charge: ChargeSignal,
}

impl SimulatedWorld {
    pub fn new(scenario: Scenario, period: Duration) -> Self {
        let mut events = scenario.events.into_iter();
        let pending = events.next();
        Self {
            sensed: WorldState::default(),
            model: DriveModel::default(),
            events,
            pending,
            tick: 0,
            period,
            charge: ChargeSignal::new(),
        }
    }

    /// Charging signal driven by `ChargeComplete` events.
    pub fn charge_signal(&self) -> ChargeSignal {
        self.charge.clone()
    }

    pub fn drive_model(&self) -> &DriveModel {
        &self.model
    }

    /// Returns `true` once every scripted event has fired.
    pub fn is_exhausted(&self) -> bool {
        self.pending.is_none()
    }

    fn fire_due_events(&mut self) {
        while let Some(timed) = self.pending.filter(|timed| timed.tick <= self.tick) {
            tracing::info!("t={} sensor event {:?}", self.tick, timed.event);
            match timed.event {
                SensorEvent::Drives(drives) => self.model = DriveModel::new(drives),
                SensorEvent::ChargeComplete(complete) => self.charge.set(complete),
                event => event.apply(&mut self.sensed),
            }
            self.pending = self.events.next();
        }
    }
}

impl WorldStateProvider for SimulatedWorld {
    fn snapshot(&mut self) -> WorldState {
        self.fire_due_events();

        if self.tick > 0 {
            self.model.advance(self.period);
            self.sensed.time_since_last_greeting = self
                .sensed
                .time_since_last_greeting
                .saturating_add(self.period);
        }
        if self.sensed.face_visible {
            self.model.observe_face(self.sensed.face_area_fraction);
        }
        self.tick += 1;

        WorldState {
            drives: self.model.drives(),
            ..self.sensed
        }
    }

    fn observe(&mut self, report: &TickReport) {
        let Some(behavior) = report.behavior else {
            return;
        };
        if matches!(report.status, Status::Running | Status::Succeeded) {
            let mood = self.model.mood();
            self.model.apply_behavior(behavior);
            if self.model.mood() != mood {
                tracing::debug!(
                    "t={} mood {} -> {} (face {})",
                    report.tick,
                    mood,
                    self.model.mood(),
                    self.model.mood().expression()
                );
            }
        }
        if behavior == BehaviorId::GreetHappily && report.status.is_success() {
            self.sensed.time_since_last_greeting = Duration::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use companion_core::{ActuatorClass, Branch, Drives, Mood};

    use super::*;

    const PERIOD: Duration = Duration::from_millis(100);

    fn report(behavior: BehaviorId, status: Status) -> TickReport {
        TickReport {
            tick: 0,
            branch: Branch::Utility,
            behavior: Some(behavior),
            status,
            commanded: ActuatorClass::empty(),
        }
    }

    #[test]
    fn events_fire_on_their_tick() {
        let scenario = Scenario::parse(
            "(events: [(tick: 0, event: Touch(true)), (tick: 2, event: Touch(false))])",
        )
        .unwrap();
        let mut world = SimulatedWorld::new(scenario, PERIOD);

        assert!(world.snapshot().touch_active);
        assert!(world.snapshot().touch_active);
        assert!(!world.snapshot().touch_active);
        assert!(world.is_exhausted());
    }

    #[test]
    fn charge_events_drive_the_signal() {
        let scenario =
            Scenario::parse("(events: [(tick: 1, event: ChargeComplete(true))])").unwrap();
        let mut world = SimulatedWorld::new(scenario, PERIOD);
        let signal = world.charge_signal();

        world.snapshot();
        assert!(!signal.is_complete());
        world.snapshot();
        assert!(signal.is_complete());
    }

    #[test]
    fn drives_drift_between_snapshots() {
        let mut world = SimulatedWorld::new(Scenario::default(), Duration::from_secs(1));
        let first = world.snapshot().drives;
        let second = world.snapshot().drives;
        assert_eq!(first, Drives::default());
        assert!(second.attention_hunger > first.attention_hunger);
        assert!(second.energy < first.energy);
    }

    #[test]
    fn finished_greeting_restarts_the_cooldown() {
        let mut world = SimulatedWorld::new(Scenario::default(), PERIOD);
        world.snapshot();
        world.snapshot();
        assert!(world.snapshot().time_since_last_greeting > Duration::from_secs(3600));

        world.observe(&report(BehaviorId::GreetHappily, Status::Running));
        assert!(world.snapshot().time_since_last_greeting > Duration::from_secs(3600));

        world.observe(&report(BehaviorId::GreetHappily, Status::Succeeded));
        assert_eq!(world.snapshot().time_since_last_greeting, PERIOD);
    }

    #[test]
    fn touch_feedback_satisfies_hunger() {
        let scenario = Scenario::parse(
            "(events: [(tick: 0, event: Drives((attention_hunger: 0.9)))])",
        )
        .unwrap();
        let mut world = SimulatedWorld::new(scenario, PERIOD);
        assert!(world.snapshot().drives.attention_hunger > 0.85);

        world.observe(&report(BehaviorId::EnjoyTouch, Status::Running));
        assert_eq!(world.drive_model().drives().attention_hunger, 0.0);
    }

    #[test]
    fn executed_behaviors_shape_mood_and_history() {
        let mut world = SimulatedWorld::new(Scenario::default(), PERIOD);
        world.snapshot();

        world.observe(&report(BehaviorId::EnjoyTouch, Status::Running));
        world.observe(&report(BehaviorId::EnjoyTouch, Status::Running));
        // A failed tick is not fed back.
        world.observe(&report(BehaviorId::GoToSleep, Status::Failed));

        let model = world.drive_model();
        assert_eq!(model.mood(), Mood::Happy);
        assert_eq!(model.last_behavior(), Some(BehaviorId::EnjoyTouch));
        assert_eq!(model.recent_behaviors().count(), 1);
    }
}
