//! Event payloads.

use behavior_tree::Status;
use companion_core::{ActuatorClass, BehaviorId, Branch};

/// Summary of a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Branch that held control this tick.
    pub branch: Branch,
    /// Behavior that ran, `None` if the utility layer had no applicable candidate.
    pub behavior: Option<BehaviorId>,
    /// Status returned by the behavior's subtree.
    pub status: Status,
    /// Actuator classes that received at least one command this tick,
    /// including safe-stops issued by preempted subtrees.
    pub commanded: ActuatorClass,
}

/// Arbitration changes broadcast on the [`super::EventBus`].
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionEvent {
    /// The priority arbiter handed control to another branch.
    BranchChanged {
        tick: u64,
        from: Option<Branch>,
        to: Branch,
    },

    /// The utility layer selected a new winner.
    WinnerChanged {
        tick: u64,
        from: Option<BehaviorId>,
        to: BehaviorId,
        score: f32,
    },

    /// Battery fell below the critical level; Survival is latched.
    SurvivalLatched { tick: u64, battery_level: f32 },

    /// Charging completed and the Survival latch was released.
    SurvivalReleased { tick: u64 },

    /// A behavior's subtree completed on its own.
    BehaviorFinished {
        tick: u64,
        id: BehaviorId,
        status: Status,
    },
}

impl DecisionEvent {
    pub fn tick(&self) -> u64 {
        match self {
            DecisionEvent::BranchChanged { tick, .. }
            | DecisionEvent::WinnerChanged { tick, .. }
            | DecisionEvent::SurvivalLatched { tick, .. }
            | DecisionEvent::SurvivalReleased { tick }
            | DecisionEvent::BehaviorFinished { tick, .. } => *tick,
        }
    }
}
