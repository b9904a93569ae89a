//! Scoring functions for the utility behaviors.
//!
//! Each function encodes one row of the utility table: an applicability
//! predicate over the world snapshot and a weighted combination of drive
//! variables. All coefficients come from [`UtilityWeights`].

use std::time::Duration;

use companion_core::{BehaviorId, EngineConfig, UtilityWeights, WorldState};

use super::Score;

/// Utility behaviors in registration order. Earlier entries win ties.
pub const UTILITY_BEHAVIORS: [BehaviorId; 9] = [
    BehaviorId::ComeCloser,
    BehaviorId::GreetHappily,
    BehaviorId::FollowPerson,
    BehaviorId::TiltHeadCuriously,
    BehaviorId::SearchForHuman,
    BehaviorId::DoAHappyDance,
    BehaviorId::GoToSleep,
    BehaviorId::Stretch,
    BehaviorId::LookAround,
];

/// Boxed scoring function of one registered candidate.
pub type Scorer = Box<dyn Fn(&WorldState) -> Score + Send>;

/// Scores a utility behavior against a snapshot.
///
/// Returns `None` for reflex behaviors, which are never scored.
pub fn score(
    id: BehaviorId,
    w: &UtilityWeights,
    greeting_cooldown: Duration,
    world: &WorldState,
) -> Option<Score> {
    let score = match id {
        BehaviorId::ComeCloser => come_closer(w, world),
        BehaviorId::GreetHappily => greet_happily(w, greeting_cooldown, world),
        BehaviorId::FollowPerson => follow_person(w, world),
        BehaviorId::TiltHeadCuriously => tilt_head_curiously(w, world),
        BehaviorId::SearchForHuman => search_for_human(w, world),
        BehaviorId::DoAHappyDance => do_a_happy_dance(w, world),
        BehaviorId::GoToSleep => go_to_sleep(w, world),
        BehaviorId::Stretch => stretch(w, world),
        BehaviorId::LookAround => look_around(w, world),
        BehaviorId::EmergencyShutdown
        | BehaviorId::ListenToUser
        | BehaviorId::EnjoyTouch
        | BehaviorId::AvoidObstacle => return None,
    };
    Some(score)
}

/// Builds the scoring closure registered for a utility behavior.
pub fn scorer(id: BehaviorId, config: &EngineConfig) -> Option<Scorer> {
    if id.is_reflex() {
        return None;
    }
    let weights = config.weights;
    let cooldown = config.greeting_cooldown;
    Some(Box::new(move |world: &WorldState| {
        score(id, &weights, cooldown, world).unwrap_or(Score::inapplicable())
    }))
}

pub fn come_closer(w: &UtilityWeights, world: &WorldState) -> Score {
    let hunger = world.drives.attention_hunger;
    Score::when(
        world.face_visible && hunger > w.come_closer_hunger_min,
        || w.come_closer_gain * hunger,
    )
}

pub fn greet_happily(w: &UtilityWeights, cooldown: Duration, world: &WorldState) -> Score {
    Score::when(
        world.face_visible && world.time_since_last_greeting >= cooldown,
        || w.greet_score,
    )
}

pub fn follow_person(w: &UtilityWeights, world: &WorldState) -> Score {
    Score::when(world.face_visible, || {
        w.follow_base + w.follow_hunger_gain * world.drives.attention_hunger
    })
}

pub fn tilt_head_curiously(w: &UtilityWeights, world: &WorldState) -> Score {
    let curiosity = world.drives.curiosity;
    Score::when(
        world.face_visible && curiosity > w.tilt_curiosity_min,
        || w.tilt_gain * curiosity,
    )
}

pub fn search_for_human(w: &UtilityWeights, world: &WorldState) -> Score {
    let hunger = world.drives.attention_hunger;
    Score::when(!world.face_visible && hunger > w.search_hunger_min, || {
        w.search_gain * hunger
    })
}

pub fn do_a_happy_dance(w: &UtilityWeights, world: &WorldState) -> Score {
    let d = &world.drives;
    Score::when(
        d.excitement > w.dance_excitement_min && d.energy > w.dance_energy_min,
        || w.dance_gain * d.excitement.min(d.energy) + w.dance_base,
    )
}

pub fn go_to_sleep(w: &UtilityWeights, world: &WorldState) -> Score {
    let d = &world.drives;
    Score::when(d.energy < w.sleep_energy_max, || {
        w.sleep_energy_weight * (1.0 - d.energy)
            + w.sleep_excitement_weight * (1.0 - d.excitement)
            + w.sleep_hunger_weight * (1.0 - d.attention_hunger)
    })
}

pub fn stretch(w: &UtilityWeights, world: &WorldState) -> Score {
    let d = &world.drives;
    Score::when(
        !world.face_visible
            && d.attention_hunger > w.stretch_hunger_min
            && d.attention_hunger < w.stretch_hunger_max,
        || w.stretch_gain * d.attention_hunger * (1.0 - d.caution),
    )
}

pub fn look_around(w: &UtilityWeights, _world: &WorldState) -> Score {
    Score::new(w.look_around_score)
}

#[cfg(test)]
mod tests {
    use companion_core::Drives;

    use super::*;

    fn world(face_visible: bool, drives: Drives) -> WorldState {
        WorldState {
            face_visible,
            drives,
            ..WorldState::default()
        }
    }

    fn approx(score: Score, value: f32) -> bool {
        score.applicable && (score.value - value).abs() < 1e-5
    }

    #[test]
    fn social_behaviors_require_a_face() {
        let w = UtilityWeights::default();
        let hungry = Drives {
            attention_hunger: 0.9,
            ..Drives::default()
        };

        assert!(approx(come_closer(&w, &world(true, hungry)), 2.7));
        assert!(!come_closer(&w, &world(false, hungry)).applicable);
        assert!(approx(follow_person(&w, &world(true, hungry)), 2.3));
        assert!(!follow_person(&w, &world(false, hungry)).applicable);
        assert!(approx(search_for_human(&w, &world(false, hungry)), 1.35));
        assert!(!search_for_human(&w, &world(true, hungry)).applicable);
    }

    #[test]
    fn greeting_respects_cooldown() {
        let w = UtilityWeights::default();
        let cooldown = Duration::from_secs(30);
        let mut snapshot = world(true, Drives::default());

        snapshot.time_since_last_greeting = Duration::from_secs(10);
        assert!(!greet_happily(&w, cooldown, &snapshot).applicable);

        snapshot.time_since_last_greeting = Duration::from_secs(30);
        assert!(approx(greet_happily(&w, cooldown, &snapshot), 1.2));
    }

    #[test]
    fn dance_needs_excitement_and_energy() {
        let w = UtilityWeights::default();
        let excited = Drives {
            excitement: 0.9,
            energy: 0.6,
            ..Drives::default()
        };
        assert!(approx(do_a_happy_dance(&w, &world(false, excited)), 0.7 * 0.6 + 0.5));

        let tired = Drives {
            energy: 0.2,
            ..excited
        };
        assert!(!do_a_happy_dance(&w, &world(false, tired)).applicable);
    }

    #[test]
    fn sleep_grows_with_fatigue() {
        let w = UtilityWeights::default();
        let drowsy = Drives {
            energy: 0.3,
            excitement: 0.2,
            attention_hunger: 0.5,
            ..Drives::default()
        };
        let exhausted = Drives {
            energy: 0.05,
            ..drowsy
        };

        let a = go_to_sleep(&w, &world(false, drowsy));
        let b = go_to_sleep(&w, &world(false, exhausted));
        assert!(approx(a, 0.6 * 0.7 + 0.2 * 0.8 + 0.2 * 0.5));
        assert!(b.value > a.value);
    }

    #[test]
    fn stretch_window_is_exclusive() {
        let w = UtilityWeights::default();
        let at = |hunger: f32| {
            stretch(
                &w,
                &world(
                    false,
                    Drives {
                        attention_hunger: hunger,
                        caution: 0.0,
                        ..Drives::default()
                    },
                ),
            )
        };

        assert!(!at(0.4).applicable);
        assert!(approx(at(0.5), 0.4));
        assert!(!at(0.8).applicable);
    }

    #[test]
    fn look_around_is_always_available() {
        let w = UtilityWeights::default();
        assert!(approx(look_around(&w, &WorldState::default()), 0.2));
    }

    #[test]
    fn only_utility_behaviors_have_scorers() {
        let config = EngineConfig::default();
        for id in UTILITY_BEHAVIORS {
            assert!(scorer(id, &config).is_some(), "{id}");
            assert!(!id.is_reflex());
        }
        assert!(scorer(BehaviorId::ListenToUser, &config).is_none());
    }
}
