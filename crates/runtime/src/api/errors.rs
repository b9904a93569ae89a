//! Unified error types surfaced by the engine API.
//!
//! Every variant is a startup fault: once an [`crate::Engine`] is built, ticks
//! are infallible and all node outcomes are expressed as a four-valued status.
use behavior_tree::TreeError;
use companion_core::{BehaviorId, ConfigError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine configuration")]
    Config(#[from] ConfigError),

    #[error("malformed behavior tree")]
    Tree(#[from] TreeError),

    #[error("behavior {0} registered twice")]
    DuplicateBehavior(BehaviorId),

    #[error("no utility behaviors registered")]
    NoUtilityBehaviors,

    #[error("{0} collaborator not set")]
    MissingCollaborator(&'static str),
}
