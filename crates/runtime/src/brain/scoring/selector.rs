//! Utility winner selection with hysteresis.
//!
//! The [`UtilitySelector`] owns every registered utility behavior: its
//! scoring function, its subtree, and its per-tick bookkeeping. Each tick it
//! scores all candidates, decides whether the argmax may replace the current
//! winner, and ticks the winner's subtree.
//!
//! # Tie-breaking
//!
//! Candidates are kept in registration order and compared with a strict `>`,
//! so on equal scores the earliest registered behavior wins. There is no
//! randomness anywhere in selection.
//!
//! # Hysteresis
//!
//! A challenger replaces the current winner only when
//!
//! - its score beats the winner's by more than `switch_margin`, or
//! - the winner has held control for at least `min_dwell_ticks`, or
//! - the winner's subtree failed on its previous tick.
//!
//! An inapplicable winner scores negative infinity, so any applicable
//! challenger clears the margin immediately.

use behavior_tree::Status;
use companion_core::{BehaviorId, HysteresisConfig, WorldState};

use super::Score;
use super::behaviors::Scorer;
use crate::api::{EngineError, Result};
use crate::brain::TickContext;
use crate::brain::subtrees::Subtree;
use crate::events::{DecisionEvent, EventBus};

/// One registered candidate.
pub struct UtilityBehavior {
    id: BehaviorId,
    scorer: Scorer,
    tree: Subtree,
    current_score: Score,
    last_winner_tick: Option<u64>,
}

impl UtilityBehavior {
    pub fn new(
        id: BehaviorId,
        scorer: impl Fn(&WorldState) -> Score + Send + 'static,
        tree: Subtree,
    ) -> Self {
        Self {
            id,
            scorer: Box::new(scorer),
            tree,
            current_score: Score::inapplicable(),
            last_winner_tick: None,
        }
    }

    pub fn id(&self) -> BehaviorId {
        self.id
    }

    /// Score computed on the most recent selection.
    pub fn current_score(&self) -> Score {
        self.current_score
    }

    /// Last tick this behavior held control.
    pub fn last_winner_tick(&self) -> Option<u64> {
        self.last_winner_tick
    }

    pub fn tree(&self) -> &Subtree {
        &self.tree
    }
}

/// Result of ticking the utility layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtilityOutcome {
    /// Winner that ran this tick, `None` if no candidate was applicable.
    pub behavior: Option<BehaviorId>,
    pub status: Status,
}

/// Scores registered behaviors and runs the winner's subtree.
pub struct UtilitySelector {
    behaviors: Vec<UtilityBehavior>,
    hysteresis: HysteresisConfig,
    current: Option<usize>,
    last_switch_tick: u64,
    winner_failed: bool,
    events: EventBus,
}

impl UtilitySelector {
    pub fn new(hysteresis: HysteresisConfig, events: EventBus) -> Self {
        Self {
            behaviors: Vec::new(),
            hysteresis,
            current: None,
            last_switch_tick: 0,
            winner_failed: false,
            events,
        }
    }

    /// Registers a candidate. Registration order is tie-break priority.
    pub fn register(&mut self, behavior: UtilityBehavior) -> Result<()> {
        if self.behaviors.iter().any(|b| b.id == behavior.id) {
            return Err(EngineError::DuplicateBehavior(behavior.id));
        }
        tracing::debug!(
            "registered utility behavior {} (priority {})",
            behavior.id,
            self.behaviors.len()
        );
        self.behaviors.push(behavior);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    pub fn behaviors(&self) -> &[UtilityBehavior] {
        &self.behaviors
    }

    pub fn behavior(&self, id: BehaviorId) -> Option<&UtilityBehavior> {
        self.behaviors.iter().find(|b| b.id == id)
    }

    /// Current winner, if any.
    pub fn winner(&self) -> Option<BehaviorId> {
        self.current.map(|index| self.behaviors[index].id)
    }

    pub fn last_switch_tick(&self) -> u64 {
        self.last_switch_tick
    }

    /// Scores every candidate and applies the switching rules.
    ///
    /// On a winner change the previous winner's subtree is aborted before this
    /// returns, so the new subtree never overlaps the old one.
    pub fn select(&mut self, ctx: &mut TickContext) -> Option<BehaviorId> {
        let tick = ctx.tick;
        let mut best: Option<usize> = None;
        let mut best_value = f32::NEG_INFINITY;

        for (index, behavior) in self.behaviors.iter_mut().enumerate() {
            let score = (behavior.scorer)(&ctx.world);
            behavior.current_score = score;
            tracing::debug!(
                "  {}: applicable={} score={:.3}",
                behavior.id,
                score.applicable,
                score.value
            );

            // Strict comparison: the first registered candidate keeps ties.
            if score.applicable && score.effective() > best_value {
                best = Some(index);
                best_value = score.effective();
            }
        }

        let Some(best) = best else {
            tracing::warn!("no applicable utility behavior");
            self.release(ctx);
            return None;
        };

        match self.current {
            Some(current) if current == best => {}
            Some(current) => {
                let held = self.behaviors[current].current_score.effective();
                let dwell = tick.saturating_sub(self.last_switch_tick);
                let clears_margin = best_value > held + self.hysteresis.switch_margin;
                let dwell_elapsed = dwell >= self.hysteresis.min_dwell_ticks;

                if clears_margin || dwell_elapsed || self.winner_failed {
                    self.switch_to(best, ctx);
                }
            }
            None => self.switch_to(best, ctx),
        }

        let current = self.current?;
        self.behaviors[current].last_winner_tick = Some(tick);
        Some(self.behaviors[current].id)
    }

    /// Selects a winner and ticks its subtree.
    pub fn tick(&mut self, ctx: &mut TickContext) -> UtilityOutcome {
        self.select(ctx);
        let Some(current) = self.current else {
            return UtilityOutcome {
                behavior: None,
                status: Status::Failed,
            };
        };

        let behavior = &mut self.behaviors[current];
        let status = behavior.tree.tick(ctx);
        self.winner_failed = status.is_failure();
        UtilityOutcome {
            behavior: Some(behavior.id),
            status,
        }
    }

    /// Aborts the winner's subtree and forgets the winner.
    ///
    /// Called when a reflex branch takes over. The next utility tick selects
    /// from scratch.
    pub fn release(&mut self, ctx: &mut TickContext) {
        if let Some(current) = self.current.take() {
            let behavior = &mut self.behaviors[current];
            tracing::debug!("releasing utility winner {}", behavior.id);
            behavior.tree.abort(ctx);
        }
        self.winner_failed = false;
    }

    fn switch_to(&mut self, next: usize, ctx: &mut TickContext) {
        let previous = self.current.map(|index| self.behaviors[index].id);
        if let Some(current) = self.current {
            self.behaviors[current].tree.abort(ctx);
        }

        let score = self.behaviors[next].current_score.value;
        let id = self.behaviors[next].id;
        match previous {
            Some(from) => tracing::info!("utility winner {} -> {} (score {:.3})", from, id, score),
            None => tracing::info!("utility winner {} (score {:.3})", id, score),
        }
        tracing::debug!(
            "{}: {} [{}]",
            id,
            id.description(),
            id.tags().join(", ")
        );

        self.current = Some(next);
        self.last_switch_tick = ctx.tick;
        self.winner_failed = false;
        self.events.publish(DecisionEvent::WinnerChanged {
            tick: ctx.tick,
            from: previous,
            to: id,
            score,
        });
    }
}
