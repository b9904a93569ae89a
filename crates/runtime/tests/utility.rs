//! Utility-layer selection through the engine: hysteresis and tie-breaking.

use behavior_tree::builder::{action, sequence};
use companion_core::{BehaviorId, EngineConfig, HysteresisConfig, WorldState};
use companion_runtime::brain::nodes::{Hold, Issue};
use companion_runtime::{
    DecisionEvent, Engine, RecordingActuators, Score, Subtree, UtilityBehavior, WorldPublisher,
    world_channel,
};

fn idle_tree(name: &'static str) -> Subtree {
    Subtree::build(sequence(
        name,
        vec![action(Issue::stop()), action(Hold::forever())],
    ))
    .unwrap()
}

/// Scores read straight from the snapshot so tests can steer them.
fn curiosity_scored(id: BehaviorId) -> UtilityBehavior {
    UtilityBehavior::new(
        id,
        |world: &WorldState| Score::new(world.drives.curiosity),
        idle_tree("curiosity"),
    )
}

fn excitement_scored(id: BehaviorId) -> UtilityBehavior {
    UtilityBehavior::new(
        id,
        |world: &WorldState| Score::new(world.drives.excitement),
        idle_tree("excitement"),
    )
}

fn constant(id: BehaviorId, value: f32) -> UtilityBehavior {
    UtilityBehavior::new(id, move |_: &WorldState| Score::new(value), idle_tree("constant"))
}

fn engine(
    hysteresis: HysteresisConfig,
    behaviors: Vec<UtilityBehavior>,
) -> (Engine, WorldPublisher) {
    let (publisher, feed) = world_channel(WorldState::default());
    let engine = Engine::builder()
        .config(EngineConfig {
            hysteresis,
            ..EngineConfig::default()
        })
        .world(feed)
        .actuators(RecordingActuators::new())
        .behaviors(behaviors)
        .build()
        .unwrap();
    (engine, publisher)
}

#[test]
fn winner_holds_through_noise_until_dwell_elapses() {
    let hysteresis = HysteresisConfig {
        switch_margin: 0.15,
        min_dwell_ticks: 10,
    };
    let (mut engine, publisher) = engine(
        hysteresis,
        vec![
            curiosity_scored(BehaviorId::TiltHeadCuriously),
            excitement_scored(BehaviorId::DoAHappyDance),
        ],
    );

    let mut winners = Vec::new();
    for tick in 0..10 {
        // Raw argmax flips every tick, always within the margin.
        let (curiosity, excitement) = if tick % 2 == 0 { (0.55, 0.5) } else { (0.5, 0.55) };
        publisher.update(|world| {
            world.drives.curiosity = curiosity;
            world.drives.excitement = excitement;
        });
        winners.push(engine.tick().behavior);
    }
    assert!(
        winners
            .iter()
            .all(|winner| *winner == Some(BehaviorId::TiltHeadCuriously)),
        "{winners:?}"
    );

    // Dwell satisfied: the next argmax flip is honored.
    publisher.update(|world| {
        world.drives.curiosity = 0.5;
        world.drives.excitement = 0.55;
    });
    assert_eq!(engine.tick().behavior, Some(BehaviorId::DoAHappyDance));
}

#[test]
fn clear_margin_switches_immediately() {
    let (mut engine, publisher) = engine(
        HysteresisConfig {
            switch_margin: 0.15,
            min_dwell_ticks: 1_000,
        },
        vec![
            curiosity_scored(BehaviorId::TiltHeadCuriously),
            excitement_scored(BehaviorId::DoAHappyDance),
        ],
    );
    let mut events = engine.subscribe();

    publisher.update(|world| {
        world.drives.curiosity = 0.5;
        world.drives.excitement = 0.2;
    });
    assert_eq!(engine.tick().behavior, Some(BehaviorId::TiltHeadCuriously));

    publisher.update(|world| world.drives.excitement = 0.9);
    assert_eq!(engine.tick().behavior, Some(BehaviorId::DoAHappyDance));

    let switches: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .filter_map(|event| match event {
            DecisionEvent::WinnerChanged { tick, from, to, .. } => Some((tick, from, to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        switches,
        vec![
            (0, None, BehaviorId::TiltHeadCuriously),
            (
                1,
                Some(BehaviorId::TiltHeadCuriously),
                BehaviorId::DoAHappyDance
            ),
        ]
    );
}

#[test]
fn equal_scores_go_to_the_first_registered() {
    for _ in 0..5 {
        let (mut engine, _publisher) = engine(
            HysteresisConfig::default(),
            vec![
                constant(BehaviorId::Stretch, 0.5),
                constant(BehaviorId::ComeCloser, 0.5),
            ],
        );
        assert_eq!(engine.tick().behavior, Some(BehaviorId::Stretch));
    }

    // Registration order decides, not catalogue order.
    let (mut engine, _publisher) = engine(
        HysteresisConfig::default(),
        vec![
            constant(BehaviorId::ComeCloser, 0.5),
            constant(BehaviorId::Stretch, 0.5),
        ],
    );
    assert_eq!(engine.tick().behavior, Some(BehaviorId::ComeCloser));
}

#[test]
fn duplicate_registration_is_a_startup_fault() {
    let (_publisher, feed) = world_channel(WorldState::default());
    let result = Engine::builder()
        .world(feed)
        .actuators(RecordingActuators::new())
        .behaviors(vec![
            constant(BehaviorId::LookAround, 0.2),
            constant(BehaviorId::LookAround, 0.3),
        ])
        .build();
    assert!(matches!(
        result,
        Err(companion_runtime::EngineError::DuplicateBehavior(
            BehaviorId::LookAround
        ))
    ));
}

#[test]
fn stock_catalogue_prefers_following_a_visible_person() {
    let (publisher, feed) = world_channel(WorldState::default());
    let mut engine = Engine::builder()
        .world(feed)
        .actuators(RecordingActuators::new())
        .build()
        .unwrap();

    assert_eq!(engine.tick().behavior, Some(BehaviorId::LookAround));

    publisher.update(|world| {
        world.face_visible = true;
        world.face_area_fraction = 0.1;
        world.time_since_last_greeting = std::time::Duration::ZERO;
    });
    assert_eq!(engine.tick().behavior, Some(BehaviorId::FollowPerson));
}
