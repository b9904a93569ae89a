//! Errors raised while assembling a tree.
//!
//! A malformed tree is a configuration fault: it is reported once when the
//! tree is built and can never surface from a tick.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("{kind} `{name}` must have at least one child")]
    EmptyComposite { kind: &'static str, name: &'static str },

    #[error("tree `{0}` has more nodes than a node id can address")]
    TooManyNodes(&'static str),
}
