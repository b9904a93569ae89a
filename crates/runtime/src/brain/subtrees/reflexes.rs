//! Reflex subtrees.
//!
//! Reflexes freeze whatever the robot was doing and hold a fixed response
//! while their trigger persists. The arbiter aborts them the tick the trigger
//! clears.

use behavior_tree::TreeError;
use behavior_tree::builder::{action, sequence};
use companion_core::{Expression, MotionConfig, SoundId};

use super::Subtree;
use crate::brain::nodes::{Drive, Hold, Issue};

/// Stop everything, dim the screen and stay down until charged.
pub fn emergency_shutdown() -> Result<Subtree, TreeError> {
    Subtree::build(sequence(
        "emergency_shutdown",
        vec![
            action(Issue::stop()),
            action(Issue::silence()),
            action(Issue::center_head()),
            action(Issue::face(Expression::Off)),
            action(Hold::forever()),
        ],
    ))
}

/// Freeze, show the listening face and chime.
pub fn listen_to_user() -> Result<Subtree, TreeError> {
    Subtree::build(sequence(
        "listen_to_user",
        vec![
            action(Issue::stop()),
            action(Issue::face(Expression::Listening)),
            action(Issue::sound(SoundId::ListeningChime)),
            action(Hold::forever()),
        ],
    ))
}

/// Stop, close eyes and purr while being petted.
pub fn enjoy_touch() -> Result<Subtree, TreeError> {
    Subtree::build(sequence(
        "enjoy_touch",
        vec![
            action(Issue::stop()),
            action(Issue::face(Expression::Happy)),
            action(Issue::sound(SoundId::Purr)),
            action(Hold::forever()),
        ],
    ))
}

/// Stop, back off and turn away.
pub fn avoid_obstacle(motion: &MotionConfig) -> Result<Subtree, TreeError> {
    Subtree::build(sequence(
        "avoid_obstacle",
        vec![
            action(Issue::stop()),
            action(Issue::face(Expression::Scared)),
            action(Drive::new(
                "reverse",
                -motion.back_away_speed,
                0.0,
                motion.avoid_reverse_ticks,
            )),
            action(Drive::new(
                "turn_away",
                0.0,
                motion.search_turn_rate,
                motion.avoid_turn_ticks,
            )),
        ],
    ))
}
