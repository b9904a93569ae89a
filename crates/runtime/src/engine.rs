//! Tick driver.
//!
//! [`Engine`] owns the arbiter and the collaborators and turns them into a
//! sequence of ticks: snapshot, arbitrate, report. [`Engine::tick`] runs one
//! pass synchronously; [`Engine::run`] drives ticks at the configured rate.

use std::future::Future;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use companion_core::EngineConfig;

use crate::api::{
    Actuators, ChargeSignal, ChargingMonitor, EngineError, Result, WorldStateProvider,
};
use crate::brain::scoring::behaviors::{UTILITY_BEHAVIORS, scorer};
use crate::brain::{PriorityArbiter, TickContext, UtilityBehavior, UtilitySelector, subtrees};
use crate::events::{DecisionEvent, EventBus, TickReport};

/// The decision engine.
///
/// Single-threaded by construction: every tick runs to completion on the
/// caller's task before the next one starts.
pub struct Engine {
    config: EngineConfig,
    world: Box<dyn WorldStateProvider>,
    charging: Box<dyn ChargingMonitor>,
    arbiter: PriorityArbiter,
    ctx: TickContext,
    events: EventBus,
    next_tick: u64,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn arbiter(&self) -> &PriorityArbiter {
        &self.arbiter
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DecisionEvent> {
        self.events.subscribe()
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.next_tick
    }

    /// Runs one tick.
    pub fn tick(&mut self) -> TickReport {
        let tick = self.next_tick;
        self.next_tick += 1;

        let world = self.world.snapshot();
        self.ctx.begin(tick, world);
        let charge_complete = self.charging.charge_complete();

        let decision = self.arbiter.tick(&mut self.ctx, charge_complete);
        let report = TickReport {
            tick,
            branch: decision.branch,
            behavior: decision.behavior,
            status: decision.status,
            commanded: self.ctx.commanded(),
        };
        tracing::trace!(?report, "tick");

        self.world.observe(&report);
        report
    }

    /// Ticks at the configured rate until `shutdown` resolves.
    ///
    /// Returns the number of ticks run. The active subtree is aborted before
    /// returning, so every actuator is left in its safe state.
    pub async fn run<F>(&mut self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        self.drive(None, shutdown).await
    }

    /// Like [`Engine::run`], but also stops after `ticks` ticks.
    pub async fn run_for<F>(&mut self, ticks: u64, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        self.drive(Some(ticks), shutdown).await
    }

    /// Aborts whatever is running.
    pub fn stop(&mut self) {
        self.arbiter.abort_all(&mut self.ctx);
    }

    async fn drive<F>(&mut self, limit: Option<u64>, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let period = self.config.tick_period();
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(
            "engine running at {} Hz ({:?} per tick)",
            self.config.tick_hz,
            period
        );

        let mut ran = 0;
        while limit.is_none_or(|limit| ran < limit) {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                _ = interval.tick() => {
                    self.tick();
                    ran += 1;
                }
            }
        }

        self.stop();
        tracing::info!("engine stopped after {} ticks", ran);
        ran
    }
}

/// Builder for [`Engine`].
pub struct EngineBuilder {
    config: EngineConfig,
    world: Option<Box<dyn WorldStateProvider>>,
    actuators: Option<Box<dyn Actuators>>,
    charging: Option<Box<dyn ChargingMonitor>>,
    behaviors: Option<Vec<UtilityBehavior>>,
    event_capacity: usize,
}

impl EngineBuilder {
    fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            world: None,
            actuators: None,
            charging: None,
            behaviors: None,
            event_capacity: EventBus::DEFAULT_CAPACITY,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the snapshot producer (required)
    pub fn world(mut self, world: impl WorldStateProvider + 'static) -> Self {
        self.world = Some(Box::new(world));
        self
    }

    /// Set the actuator surface (required)
    pub fn actuators(mut self, actuators: impl Actuators + 'static) -> Self {
        self.actuators = Some(Box::new(actuators));
        self
    }

    /// Set the charging monitor.
    ///
    /// Defaults to a [`ChargeSignal`] nobody holds, i.e. Survival never
    /// releases.
    pub fn charging(mut self, charging: impl ChargingMonitor + 'static) -> Self {
        self.charging = Some(Box::new(charging));
        self
    }

    /// Replace the stock utility behaviors.
    ///
    /// Registration order is the tie-break order.
    pub fn behaviors(mut self, behaviors: Vec<UtilityBehavior>) -> Self {
        self.behaviors = Some(behaviors);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Validates the configuration and assembles the engine.
    pub fn build(self) -> Result<Engine> {
        self.config.validate()?;

        let world = self
            .world
            .ok_or(EngineError::MissingCollaborator("world state provider"))?;
        let actuators = self
            .actuators
            .ok_or(EngineError::MissingCollaborator("actuators"))?;
        let charging = self
            .charging
            .unwrap_or_else(|| Box::new(ChargeSignal::new()));

        let events = EventBus::with_capacity(self.event_capacity);
        let mut utility = UtilitySelector::new(self.config.hysteresis, events.clone());
        let behaviors = match self.behaviors {
            Some(behaviors) => behaviors,
            None => stock_behaviors(&self.config)?,
        };
        for behavior in behaviors {
            utility.register(behavior)?;
        }
        if utility.is_empty() {
            return Err(EngineError::NoUtilityBehaviors);
        }

        let arbiter = PriorityArbiter::new(&self.config, utility, events.clone())?;
        tracing::info!(
            "engine built with {} utility behaviors",
            arbiter.utility().len()
        );

        Ok(Engine {
            config: self.config,
            world,
            charging,
            arbiter,
            ctx: TickContext::new(actuators),
            events,
            next_tick: 0,
        })
    }
}

/// The catalogue's utility behaviors with their scorers and subtrees.
pub fn stock_behaviors(config: &EngineConfig) -> Result<Vec<UtilityBehavior>> {
    UTILITY_BEHAVIORS
        .iter()
        .filter_map(|&id| scorer(id, config).map(|scorer| (id, scorer)))
        .map(|(id, scorer)| -> Result<UtilityBehavior> {
            Ok(UtilityBehavior::new(id, scorer, subtrees::build(id, config)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use companion_core::{BehaviorId, Branch, ConfigError, WorldState};

    use super::*;
    use crate::api::{RecordingActuators, world_channel};

    #[test]
    fn build_requires_collaborators() {
        let err = Engine::builder()
            .actuators(RecordingActuators::new())
            .build()
            .err();
        assert!(matches!(err, Some(EngineError::MissingCollaborator(_))));

        let (_publisher, feed) = world_channel(WorldState::default());
        let err = Engine::builder().world(feed).build().err();
        assert!(matches!(err, Some(EngineError::MissingCollaborator(_))));
    }

    #[test]
    fn build_rejects_invalid_config() {
        let (_publisher, feed) = world_channel(WorldState::default());
        let config = EngineConfig {
            tick_hz: -1.0,
            ..EngineConfig::default()
        };
        let err = Engine::builder()
            .config(config)
            .world(feed)
            .actuators(RecordingActuators::new())
            .build()
            .err();
        assert!(matches!(
            err,
            Some(EngineError::Config(ConfigError::InvalidTickRate(_)))
        ));
    }

    #[test]
    fn build_rejects_empty_candidate_set() {
        let (_publisher, feed) = world_channel(WorldState::default());
        let err = Engine::builder()
            .world(feed)
            .actuators(RecordingActuators::new())
            .behaviors(Vec::new())
            .build()
            .err();
        assert!(matches!(err, Some(EngineError::NoUtilityBehaviors)));
    }

    #[test]
    fn stock_behaviors_follow_registration_order() {
        let behaviors = stock_behaviors(&EngineConfig::default()).unwrap();
        let ids: Vec<BehaviorId> = behaviors.iter().map(UtilityBehavior::id).collect();
        assert_eq!(ids, UTILITY_BEHAVIORS);
    }

    #[test]
    fn tick_numbers_increase_and_report_commands() {
        let (_publisher, feed) = world_channel(WorldState::default());
        let actuators = RecordingActuators::new();
        let mut engine = Engine::builder()
            .world(feed)
            .actuators(actuators.clone())
            .build()
            .unwrap();

        let first = engine.tick();
        let second = engine.tick();
        assert_eq!((first.tick, second.tick), (0, 1));
        assert_eq!(first.branch, Branch::Utility);
        assert_eq!(first.behavior, Some(BehaviorId::LookAround));
        assert!(!first.commanded.is_empty());
        assert_eq!(engine.ticks(), 2);
    }

    #[test]
    fn stop_leaves_nothing_running() {
        let (_publisher, feed) = world_channel(WorldState::default());
        let mut engine = Engine::builder()
            .world(feed)
            .actuators(RecordingActuators::new())
            .build()
            .unwrap();

        engine.tick();
        engine.stop();
        assert_eq!(engine.arbiter().current_branch(), None);
        assert!(
            engine
                .arbiter()
                .utility()
                .behaviors()
                .iter()
                .all(|behavior| !behavior.tree().is_running())
        );
    }
}
