//! Leaf contracts.
//!
//! This module defines the two leaf kinds of a tree. Both are generic over a
//! context type `C`, allowing nodes to read the current snapshot and reach
//! whatever collaborators the embedding application exposes through it.
//!
//! - [`Condition`]: a pure predicate, evaluated every time it is visited
//! - [`Action`]: a stateful command with an enter/tick/abort lifecycle

use crate::Status;

/// A stateless boolean predicate over the context.
pub trait Condition<C>: Send {
    /// Short, static label used in logs and node lookups.
    fn name(&self) -> &'static str;

    /// Evaluates the predicate.
    ///
    /// Must be side-effect free and return in bounded time.
    fn evaluate(&self, ctx: &C) -> bool;
}

/// A stateful leaf that issues commands and may span several ticks.
///
/// # Lifecycle
///
/// The executor guarantees the following call order:
///
/// 1. `on_enter` exactly once when the node goes from not-running to running
/// 2. `on_tick` on the same tick and on every following tick while it reports
///    [`Status::Running`]
/// 3. `on_abort` exactly once if the node is preempted while running. It is
///    never called after the action finished on its own.
///
/// None of the hooks may block: anything that takes real time is expressed by
/// returning `Running` and resuming on the next tick.
pub trait Action<C>: Send {
    /// Short, static label used in logs and node lookups.
    fn name(&self) -> &'static str;

    /// Issues the initial command and resets internal progress.
    fn on_enter(&mut self, ctx: &mut C);

    /// Advances the action. Must return `Running`, `Succeeded` or `Failed`.
    fn on_tick(&mut self, ctx: &mut C) -> Status;

    /// Issues a safe-stop command after a preemption.
    fn on_abort(&mut self, ctx: &mut C);
}

/// Blanket implementation for boxed conditions.
impl<C> Condition<C> for Box<dyn Condition<C>> {
    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn evaluate(&self, ctx: &C) -> bool {
        (**self).evaluate(ctx)
    }
}

/// Blanket implementation for boxed actions.
impl<C> Action<C> for Box<dyn Action<C>> {
    #[inline]
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn on_enter(&mut self, ctx: &mut C) {
        (**self).on_enter(ctx)
    }

    #[inline]
    fn on_tick(&mut self, ctx: &mut C) -> Status {
        (**self).on_tick(ctx)
    }

    #[inline]
    fn on_abort(&mut self, ctx: &mut C) {
        (**self).on_abort(ctx)
    }
}

/// A condition built from a plain function or closure.
///
/// Handy for one-off predicates that do not deserve their own type.
pub struct Predicate<C> {
    name: &'static str,
    check: Box<dyn Fn(&C) -> bool + Send>,
}

impl<C> Predicate<C> {
    /// Creates a named predicate.
    pub fn new(name: &'static str, check: impl Fn(&C) -> bool + Send + 'static) -> Self {
        Self {
            name,
            check: Box::new(check),
        }
    }
}

impl<C> Condition<C> for Predicate<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate(&self, ctx: &C) -> bool {
        (self.check)(ctx)
    }
}
