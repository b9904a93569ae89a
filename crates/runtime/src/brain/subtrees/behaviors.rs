//! Utility behavior subtrees.
//!
//! Each subtree implements one utility-layer behavior. Gesture lengths and
//! speeds come from [`MotionConfig`].

use behavior_tree::builder::{action, condition, selector, sequence};
use behavior_tree::{Not, TreeError};
use companion_core::{Expression, MotionConfig, SoundId};

use super::Subtree;
use crate::brain::nodes::{
    ApproachFace, BackAway, Dance, FaceTooClose, FaceVisible, Hold, Issue, MoveHead, PlaySound,
    SearchSpin, SteerTowardFace,
};

/// Approach slowly and look up affectionately.
pub fn come_closer(motion: &MotionConfig) -> Result<Subtree, TreeError> {
    Subtree::build(sequence(
        "come_closer",
        vec![
            action(Issue::face(Expression::Happy)),
            action(ApproachFace::new(
                motion.approach_target_area,
                motion.follow_speed * 0.5,
                motion.steer_gain,
            )),
            action(MoveHead::new("look_up", 0.0, 0.4, motion.gesture_ticks)),
            action(Issue::center_head()),
        ],
    ))
}

/// Joyful face, chirp, and a nod.
pub fn greet_happily(motion: &MotionConfig) -> Result<Subtree, TreeError> {
    let beat = (motion.gesture_ticks / 3).max(1);
    Subtree::build(sequence(
        "greet_happily",
        vec![
            action(Issue::stop()),
            action(Issue::face(Expression::Happy)),
            action(PlaySound::until_done(SoundId::Chirp, motion.gesture_ticks)),
            action(MoveHead::new("nod_down", 0.0, -0.3, beat)),
            action(MoveHead::new("nod_up", 0.0, 0.2, beat)),
            action(Issue::center_head()),
        ],
    ))
}

/// Keep the person in view: back off when too close, steer while visible,
/// search briefly once lost.
pub fn follow_person(motion: &MotionConfig) -> Result<Subtree, TreeError> {
    Subtree::build(selector(
        "follow_person",
        vec![
            sequence(
                "too_close",
                vec![
                    condition(FaceTooClose {
                        area: motion.too_close_area,
                    }),
                    action(BackAway::new(motion.back_away_speed, motion.too_close_area)),
                ],
            ),
            sequence(
                "steer",
                vec![
                    condition(FaceVisible),
                    action(SteerTowardFace::new(
                        motion.steer_gain,
                        motion.follow_speed,
                        motion.approach_target_area,
                    )),
                ],
            ),
            sequence(
                "lost",
                vec![
                    condition(Not::named("face_lost", FaceVisible)),
                    action(SearchSpin::new(
                        motion.search_turn_rate,
                        motion.lost_face_timeout_ticks,
                    )),
                ],
            ),
        ],
    ))
}

/// Tilt the head with a curious face.
pub fn tilt_head_curiously(motion: &MotionConfig) -> Result<Subtree, TreeError> {
    Subtree::build(sequence(
        "tilt_head_curiously",
        vec![
            action(Issue::stop()),
            action(Issue::face(Expression::Curious)),
            action(MoveHead::new("tilt", 0.2, 0.35, motion.gesture_ticks)),
            action(Issue::center_head()),
        ],
    ))
}

/// Spin in place looking for a face.
pub fn search_for_human(motion: &MotionConfig) -> Result<Subtree, TreeError> {
    Subtree::build(sequence(
        "search_for_human",
        vec![
            action(Issue::face(Expression::Lonely)),
            action(SearchSpin::new(
                motion.search_turn_rate,
                motion.search_timeout_ticks,
            )),
        ],
    ))
}

/// Dance to music.
pub fn do_a_happy_dance(motion: &MotionConfig) -> Result<Subtree, TreeError> {
    let period = (motion.gesture_ticks / 4).max(1);
    Subtree::build(sequence(
        "do_a_happy_dance",
        vec![
            action(Issue::face(Expression::Playful)),
            action(Issue::sound(SoundId::DanceTune)),
            action(Dance::new(
                motion.search_turn_rate * 2.0,
                period,
                motion.gesture_ticks * 2,
            )),
        ],
    ))
}

/// Dim down, play a lullaby and rest until something better comes along.
pub fn go_to_sleep() -> Result<Subtree, TreeError> {
    Subtree::build(sequence(
        "go_to_sleep",
        vec![
            action(Issue::stop()),
            action(Issue::center_head()),
            action(Issue::face(Expression::Sleepy)),
            action(Issue::sound(SoundId::Lullaby)),
            action(Hold::forever()),
        ],
    ))
}

/// Extend, shake and settle.
pub fn stretch(motion: &MotionConfig) -> Result<Subtree, TreeError> {
    let beat = (motion.gesture_ticks / 3).max(1);
    Subtree::build(sequence(
        "stretch",
        vec![
            action(Issue::stop()),
            action(Issue::face(Expression::Neutral)),
            action(Issue::sound(SoundId::Yawn)),
            action(MoveHead::new("extend", 0.0, 0.5, beat)),
            action(MoveHead::new("shake_left", -0.2, 0.1, beat)),
            action(MoveHead::new("shake_right", 0.2, 0.1, beat)),
            action(Issue::center_head()),
        ],
    ))
}

/// Pan the head slowly across the room.
pub fn look_around(motion: &MotionConfig) -> Result<Subtree, TreeError> {
    Subtree::build(sequence(
        "look_around",
        vec![
            action(Issue::stop()),
            action(Issue::face(Expression::Curious)),
            action(MoveHead::new("look_left", -0.6, 0.1, motion.gesture_ticks)),
            action(MoveHead::new("look_right", 0.6, 0.1, motion.gesture_ticks)),
            action(Issue::center_head()),
        ],
    ))
}
