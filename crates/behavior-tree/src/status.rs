//! Status carried by behavior nodes.

/// The state of a behavior node.
///
/// # Real-time Semantics
///
/// The tree is ticked at a fixed rate, so work that takes real time spans
/// several ticks:
/// - Conditions evaluate immediately and only ever yield `Succeeded`/`Failed`
/// - Actions may report `Running` and are resumed on the next tick
/// - `Idle` is never returned by a tick; it marks nodes that are not in control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    /// The node is not in control (never entered, or reset after an abort).
    #[default]
    Idle,

    /// The node is in progress and must be ticked again next tick.
    Running,

    /// The node completed successfully.
    ///
    /// For conditions: The predicate held.
    /// For actions: The completion criteria were met.
    Succeeded,

    /// The node failed.
    ///
    /// For conditions: The predicate did not hold.
    /// For actions: The action could not complete (e.g., hardware fault).
    Failed,
}

impl Status {
    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Returns `true` if this status is `Succeeded`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Succeeded)
    }

    /// Returns `true` if this status is `Failed`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failed)
    }

    /// Returns `true` once the node reached `Succeeded` or `Failed`.
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, Status::Succeeded | Status::Failed)
    }

    /// Maps a predicate result to a leaf status.
    #[inline]
    pub fn from_bool(value: bool) -> Self {
        if value {
            Status::Succeeded
        } else {
            Status::Failed
        }
    }
}
