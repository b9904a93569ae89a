//! Root of the decision: the fixed-priority arbiter.
//!
//! Every tick the arbiter walks its ladder top-down and hands control to the
//! first branch whose gate condition holds:
//!
//! 1. Survival: battery critical. Latched until charging completes
//! 2. Audio: wake word heard
//! 3. Touch: being petted
//! 4. Safety: obstacle inside the safety radius
//! 5. Utility: delegated to the [`UtilitySelector`]
//!
//! When the branch changes, the previously active subtree (including a nested
//! utility winner) is aborted before the new branch is ticked, so safe-stops
//! always reach the hardware ahead of the new branch's commands.

use behavior_tree::{Condition, Status};
use companion_core::{BehaviorId, Branch, EngineConfig};

use super::nodes::{BatteryCritical, HotwordActive, ObstacleWithin, TouchActive};
use super::scoring::UtilitySelector;
use super::subtrees::{self, Subtree};
use super::TickContext;
use crate::api::Result;
use crate::events::{DecisionEvent, EventBus};

/// A reflex branch: its gate and its fixed subtree.
struct Reflex {
    branch: Branch,
    gate: Box<dyn Condition<TickContext>>,
    tree: Subtree,
}

impl Reflex {
    fn new(
        branch: Branch,
        gate: impl Condition<TickContext> + 'static,
        config: &EngineConfig,
    ) -> Result<Option<Self>> {
        let Some(id) = branch.reflex() else {
            return Ok(None);
        };
        Ok(Some(Self {
            branch,
            gate: Box::new(gate),
            tree: subtrees::build(id, config)?,
        }))
    }
}

/// What the arbiter ran this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub branch: Branch,
    pub behavior: Option<BehaviorId>,
    pub status: Status,
}

/// Fixed-priority gate over the reflex branches and the utility layer.
pub struct PriorityArbiter {
    /// Reflexes in ladder order; Survival first.
    reflexes: Vec<Reflex>,
    utility: UtilitySelector,
    current_branch: Option<Branch>,
    survival_latched: bool,
    last_switch_tick: u64,
    events: EventBus,
}

impl PriorityArbiter {
    pub fn new(config: &EngineConfig, utility: UtilitySelector, events: EventBus) -> Result<Self> {
        let reflex = &config.reflex;
        let reflexes = [
            Reflex::new(
                Branch::Survival,
                BatteryCritical {
                    threshold: reflex.battery_critical,
                },
                config,
            )?,
            Reflex::new(Branch::Audio, HotwordActive, config)?,
            Reflex::new(Branch::Touch, TouchActive, config)?,
            Reflex::new(
                Branch::Safety,
                ObstacleWithin {
                    distance_cm: reflex.obstacle_cm,
                },
                config,
            )?,
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(Self {
            reflexes,
            utility,
            current_branch: None,
            survival_latched: false,
            last_switch_tick: 0,
            events,
        })
    }

    pub fn current_branch(&self) -> Option<Branch> {
        self.current_branch
    }

    /// Current utility winner, if the utility layer holds one.
    pub fn utility_winner(&self) -> Option<BehaviorId> {
        self.utility.winner()
    }

    pub fn last_switch_tick(&self) -> u64 {
        self.last_switch_tick
    }

    pub fn is_survival_latched(&self) -> bool {
        self.survival_latched
    }

    pub fn utility(&self) -> &UtilitySelector {
        &self.utility
    }

    /// Subtree of a reflex branch, `None` for [`Branch::Utility`].
    pub fn reflex_tree(&self, branch: Branch) -> Option<&Subtree> {
        self.reflexes
            .iter()
            .find(|reflex| reflex.branch == branch)
            .map(|reflex| &reflex.tree)
    }

    /// Runs one arbitration pass.
    pub fn tick(&mut self, ctx: &mut TickContext, charge_complete: bool) -> Decision {
        let branch = self.decide(ctx, charge_complete);

        if self.current_branch != Some(branch) {
            if let Some(previous) = self.current_branch {
                self.abort_branch(previous, ctx);
            }
            tracing::info!(
                "branch {} -> {}",
                self.current_branch
                    .map_or_else(|| "none".to_string(), |b| b.to_string()),
                branch
            );
            self.events.publish(DecisionEvent::BranchChanged {
                tick: ctx.tick,
                from: self.current_branch,
                to: branch,
            });
            self.current_branch = Some(branch);
            self.last_switch_tick = ctx.tick;
        }

        let (behavior, status) = match branch {
            Branch::Utility => {
                let outcome = self.utility.tick(ctx);
                (outcome.behavior, outcome.status)
            }
            reflex => match self.reflexes.iter_mut().find(|r| r.branch == reflex) {
                Some(reflex) => (reflex.branch.reflex(), reflex.tree.tick(ctx)),
                None => (None, Status::Failed),
            },
        };

        if status.is_finished()
            && let Some(id) = behavior
        {
            tracing::debug!("{} finished: {:?}", id, status);
            self.events.publish(DecisionEvent::BehaviorFinished {
                tick: ctx.tick,
                id,
                status,
            });
        }

        Decision {
            branch,
            behavior,
            status,
        }
    }

    /// Aborts whatever branch is active, leaving no action running.
    pub fn abort_all(&mut self, ctx: &mut TickContext) {
        if let Some(branch) = self.current_branch.take() {
            tracing::info!("aborting {} branch", branch);
            self.abort_branch(branch, ctx);
        }
    }

    /// Walks the ladder. Survival is always checked first.
    fn decide(&mut self, ctx: &TickContext, charge_complete: bool) -> Branch {
        if self.survival_latched {
            let critical = self.gate_holds(Branch::Survival, ctx);
            if !charge_complete || critical {
                return Branch::Survival;
            }
            self.survival_latched = false;
            tracing::info!("charge complete, survival latch released");
            self.events
                .publish(DecisionEvent::SurvivalReleased { tick: ctx.tick });
        }

        for reflex in &self.reflexes {
            if !reflex.gate.evaluate(ctx) {
                continue;
            }
            if reflex.branch == Branch::Survival {
                self.survival_latched = true;
                tracing::warn!(
                    "battery critical ({:.2}), survival latched",
                    ctx.world.battery_level
                );
                self.events.publish(DecisionEvent::SurvivalLatched {
                    tick: ctx.tick,
                    battery_level: ctx.world.battery_level,
                });
            }
            return reflex.branch;
        }

        Branch::Utility
    }

    fn gate_holds(&self, branch: Branch, ctx: &TickContext) -> bool {
        self.reflexes
            .iter()
            .find(|reflex| reflex.branch == branch)
            .is_some_and(|reflex| reflex.gate.evaluate(ctx))
    }

    fn abort_branch(&mut self, branch: Branch, ctx: &mut TickContext) {
        match branch {
            Branch::Utility => self.utility.release(ctx),
            reflex => {
                if let Some(reflex) = self.reflexes.iter_mut().find(|r| r.branch == reflex) {
                    reflex.tree.abort(ctx);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use companion_core::WorldState;

    use super::*;
    use crate::api::RecordingActuators;
    use crate::brain::scoring::{Score, UtilityBehavior};
    use crate::brain::nodes::Hold;
    use behavior_tree::builder::{action, sequence};

    fn arbiter() -> PriorityArbiter {
        let config = EngineConfig::default();
        let events = EventBus::new();
        let mut utility = UtilitySelector::new(config.hysteresis, events.clone());
        utility
            .register(UtilityBehavior::new(
                BehaviorId::LookAround,
                |_: &WorldState| Score::new(0.2),
                Subtree::build(sequence("look", vec![action(Hold::forever())])).unwrap(),
            ))
            .unwrap();
        PriorityArbiter::new(&config, utility, events).unwrap()
    }

    fn ctx() -> TickContext {
        TickContext::new(RecordingActuators::new())
    }

    #[test]
    fn ladder_order_is_fixed() {
        let mut arbiter = arbiter();
        let mut ctx = ctx();

        let cases = [
            (
                WorldState {
                    hotword_active: true,
                    touch_active: true,
                    obstacle_distance_cm: 5.0,
                    ..WorldState::default()
                },
                Branch::Audio,
            ),
            (
                WorldState {
                    touch_active: true,
                    obstacle_distance_cm: 5.0,
                    ..WorldState::default()
                },
                Branch::Touch,
            ),
            (
                WorldState {
                    obstacle_distance_cm: 5.0,
                    ..WorldState::default()
                },
                Branch::Safety,
            ),
            (WorldState::default(), Branch::Utility),
        ];

        for (tick, (world, expected)) in cases.into_iter().enumerate() {
            ctx.begin(tick as u64, world);
            assert_eq!(arbiter.tick(&mut ctx, false).branch, expected);
        }
    }

    #[test]
    fn survival_latches_until_charge_complete() {
        let mut arbiter = arbiter();
        let mut ctx = ctx();

        ctx.begin(
            0,
            WorldState {
                battery_level: 0.1,
                ..WorldState::default()
            },
        );
        assert_eq!(arbiter.tick(&mut ctx, false).branch, Branch::Survival);
        assert!(arbiter.is_survival_latched());

        // Battery reads fine again but charging has not reported completion.
        ctx.begin(1, WorldState::default());
        assert_eq!(arbiter.tick(&mut ctx, false).branch, Branch::Survival);

        ctx.begin(2, WorldState::default());
        assert_eq!(arbiter.tick(&mut ctx, true).branch, Branch::Utility);
        assert!(!arbiter.is_survival_latched());
    }

    #[test]
    fn charge_signal_alone_does_not_release_a_critical_battery() {
        let mut arbiter = arbiter();
        let mut ctx = ctx();
        let flat = WorldState {
            battery_level: 0.05,
            ..WorldState::default()
        };

        ctx.begin(0, flat);
        arbiter.tick(&mut ctx, false);
        ctx.begin(1, flat);
        assert_eq!(arbiter.tick(&mut ctx, true).branch, Branch::Survival);
        assert!(arbiter.is_survival_latched());
    }

    #[test]
    fn leaving_a_reflex_aborts_its_subtree() {
        let mut arbiter = arbiter();
        let mut ctx = ctx();

        ctx.begin(
            0,
            WorldState {
                touch_active: true,
                ..WorldState::default()
            },
        );
        arbiter.tick(&mut ctx, false);
        assert!(arbiter.reflex_tree(Branch::Touch).unwrap().is_running());

        ctx.begin(1, WorldState::default());
        arbiter.tick(&mut ctx, false);
        let touch = arbiter.reflex_tree(Branch::Touch).unwrap();
        assert_eq!(touch.status(), Status::Idle);
        assert_eq!(arbiter.last_switch_tick(), 1);
    }

    #[test]
    fn reflex_preemption_releases_the_utility_winner() {
        let mut arbiter = arbiter();
        let mut ctx = ctx();

        ctx.begin(0, WorldState::default());
        arbiter.tick(&mut ctx, false);
        assert_eq!(arbiter.utility_winner(), Some(BehaviorId::LookAround));

        ctx.begin(
            1,
            WorldState {
                hotword_active: true,
                ..WorldState::default()
            },
        );
        arbiter.tick(&mut ctx, false);
        assert_eq!(arbiter.utility_winner(), None);
        assert!(!arbiter.utility().behaviors()[0].tree().is_running());
    }
}
