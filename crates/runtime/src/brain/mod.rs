//! Decision logic of the companion robot.
//!
//! The brain is layered:
//!
//! 1. **Priority arbiter** ([`PriorityArbiter`]): a fixed ladder
//!    Survival → Audio → Touch → Safety → Utility that decides which branch
//!    may run this tick and preempts whatever ran before
//! 2. **Utility layer** ([`scoring::UtilitySelector`]): scores the social and
//!    idle behaviors and picks a winner with hysteresis
//! 3. **Behavior trees** ([`subtrees`]): one tree per behavior, built from the
//!    leaf library in [`nodes`]
//!
//! # Core Components
//!
//! - [`TickContext`]: per-tick blackboard (world snapshot + hardware)
//! - [`nodes`]: conditions and actions
//! - [`subtrees`]: reflex and utility subtrees
//! - [`scoring`]: scoring functions and the utility selector
//! - [`arbiter`]: the root of the decision

pub mod arbiter;
pub mod context;
pub mod nodes;
pub mod scoring;
pub mod subtrees;

pub use arbiter::{Decision, PriorityArbiter};
pub use context::{Hardware, TickContext};
pub use scoring::{Score, UtilityBehavior, UtilityOutcome, UtilitySelector};
pub use subtrees::Subtree;
