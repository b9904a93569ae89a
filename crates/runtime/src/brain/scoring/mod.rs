//! Utility scoring for the non-reflex behaviors.
//!
//! - [`behaviors`]: one scoring function per utility behavior
//! - [`selector`]: [`UtilitySelector`], which picks a winner with hysteresis
//!
//! # Score Semantics
//!
//! A [`Score`] pairs an applicability flag with a value. Inapplicable
//! candidates are excluded from the argmax, which is the same as scoring them
//! at negative infinity; [`Score::effective`] returns exactly that.

pub mod behaviors;
pub mod selector;

pub use selector::{UtilityBehavior, UtilityOutcome, UtilitySelector};

/// Scoring result of one candidate behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Does the applicability predicate hold?
    pub applicable: bool,
    /// Desirability, meaningful only when applicable.
    pub value: f32,
}

impl Score {
    pub const fn new(value: f32) -> Self {
        Self {
            applicable: true,
            value,
        }
    }

    pub const fn inapplicable() -> Self {
        Self {
            applicable: false,
            value: 0.0,
        }
    }

    /// Scores `value` if `applicable` holds.
    pub fn when(applicable: bool, value: impl FnOnce() -> f32) -> Self {
        if applicable {
            Self::new(value())
        } else {
            Self::inapplicable()
        }
    }

    /// Value used for comparison: negative infinity when inapplicable.
    pub fn effective(&self) -> f32 {
        if self.applicable && !self.value.is_nan() {
            self.value
        } else {
            f32::NEG_INFINITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inapplicable_scores_lose_to_everything() {
        assert_eq!(Score::inapplicable().effective(), f32::NEG_INFINITY);
        assert!(Score::new(-100.0).effective() > Score::inapplicable().effective());
        assert_eq!(Score::new(f32::NAN).effective(), f32::NEG_INFINITY);
    }

    #[test]
    fn when_skips_scoring_inapplicable_candidates() {
        let score = Score::when(false, || panic!("must not be evaluated"));
        assert!(!score.applicable);
    }
}
