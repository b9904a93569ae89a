//! Condition decorators.
//!
//! Decorators wrap a single condition and modify its result. This module
//! provides [`Not`] (NOT logic), used to express negative guards such as
//! "no face visible" without writing a second predicate type.

use crate::Condition;

/// Inverts the result of its child condition.
///
/// # Semantics
///
/// - If the child holds, `Not` fails
/// - If the child fails, `Not` holds
///
/// This is analogous to a logical NOT (!) operation.
///
/// The inverter carries its own label so that it can be told apart from its
/// child in [`crate::Tree::find`].
pub struct Not<C> {
    name: &'static str,
    child: Box<dyn Condition<C>>,
}

impl<C> Not<C> {
    /// Creates a new inverter labelled `"not"`.
    pub fn new(child: impl Condition<C> + 'static) -> Self {
        Self::named("not", child)
    }

    /// Creates a new inverter with the given label.
    pub fn named(name: &'static str, child: impl Condition<C> + 'static) -> Self {
        Self {
            name,
            child: Box::new(child),
        }
    }
}

impl<C> Condition<C> for Not<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate(&self, ctx: &C) -> bool {
        !self.child.evaluate(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestContext {
        value: i32,
    }

    struct IsPositive;
    impl Condition<TestContext> for IsPositive {
        fn name(&self) -> &'static str {
            "is_positive"
        }

        fn evaluate(&self, ctx: &TestContext) -> bool {
            ctx.value > 0
        }
    }

    #[test]
    fn not_inverts_success() {
        let inverter = Not::new(IsPositive);
        assert!(!inverter.evaluate(&TestContext { value: 10 }));
    }

    #[test]
    fn not_inverts_failure() {
        let inverter = Not::new(IsPositive);
        assert!(inverter.evaluate(&TestContext { value: -10 }));
    }

    #[test]
    fn not_has_its_own_label() {
        assert_eq!(Not::new(IsPositive).name(), "not");
        assert_eq!(Not::named("is_not_positive", IsPositive).name(), "is_not_positive");
    }
}
