//! Subtree library: one behavior tree per [`BehaviorId`].
//!
//! - [`reflexes`]: fixed subtrees owned by the arbiter's reflex branches
//! - [`behaviors`]: subtrees that compete in the utility layer
//!
//! Every builder returns a validated [`Subtree`]; tree construction errors are
//! startup faults.

pub mod behaviors;
pub mod reflexes;

use behavior_tree::{Tree, TreeError};
use companion_core::{BehaviorId, EngineConfig};

use crate::brain::TickContext;

/// A behavior tree ticked against the engine's [`TickContext`].
pub type Subtree = Tree<TickContext>;

/// Builds the subtree for any behavior in the catalogue.
pub fn build(id: BehaviorId, config: &EngineConfig) -> Result<Subtree, TreeError> {
    let motion = &config.motion;
    match id {
        BehaviorId::EmergencyShutdown => reflexes::emergency_shutdown(),
        BehaviorId::ListenToUser => reflexes::listen_to_user(),
        BehaviorId::EnjoyTouch => reflexes::enjoy_touch(),
        BehaviorId::AvoidObstacle => reflexes::avoid_obstacle(motion),
        BehaviorId::ComeCloser => behaviors::come_closer(motion),
        BehaviorId::GreetHappily => behaviors::greet_happily(motion),
        BehaviorId::FollowPerson => behaviors::follow_person(motion),
        BehaviorId::TiltHeadCuriously => behaviors::tilt_head_curiously(motion),
        BehaviorId::SearchForHuman => behaviors::search_for_human(motion),
        BehaviorId::DoAHappyDance => behaviors::do_a_happy_dance(motion),
        BehaviorId::GoToSleep => behaviors::go_to_sleep(),
        BehaviorId::Stretch => behaviors::stretch(motion),
        BehaviorId::LookAround => behaviors::look_around(motion),
    }
}
