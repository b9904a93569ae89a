//! Leaf node library for the companion's behavior trees.
//!
//! - [`conditions`]: predicates over the world snapshot
//! - [`actions`]: hardware-commanding, possibly multi-tick actions

pub mod actions;
pub mod conditions;

pub use actions::{
    ApproachFace, BackAway, Dance, Drive, Hold, Issue, MoveHead, PlaySound, SearchSpin,
    SteerTowardFace,
};
pub use conditions::{
    BatteryCritical, FaceTooClose, FaceVisible, HotwordActive, ObstacleWithin, TouchActive,
};
