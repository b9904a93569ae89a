//! Arena-backed behavior tree executor for fixed-rate control loops.
//!
//! This library provides a small, deterministic behavior tree implementation
//! designed for reactive robots that are ticked at a fixed rate.
//!
//! - **Multi-tick actions**: Actions may report `Running` and are resumed on the
//!   next tick; nothing ever blocks the tick thread
//! - **Structural cancellation**: Preempted actions always receive `on_abort`
//! - **Inspectable state**: Node status and sequence cursors live in an arena
//!   indexed by [`NodeId`], not on the call stack
//!
//! # Architecture
//!
//! - [`Condition`] and [`Action`]: Leaf contracts, generic over a context `C`
//! - [`Status`]: Idle, Running, Succeeded or Failed
//! - [`Tree`]: The arena plus the tick/abort executor (Sequence, Selector)
//! - [`builder`]: Helpers to describe trees as nested [`NodeSpec`]s
//! - Decorators: [`Not`]

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod error;
pub mod status;
pub mod tree;

// Re-export core types for ergonomic API
pub use behavior::{Action, Condition, Predicate};
pub use builder::NodeSpec;
pub use decorator::Not;
pub use error::TreeError;
pub use status::Status;
pub use tree::{NodeId, NodeKind, Tree};
