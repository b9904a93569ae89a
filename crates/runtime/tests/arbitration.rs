//! End-to-end arbitration properties, driven through the public engine API.

use std::time::Duration;

use behavior_tree::{Action, Status};
use companion_core::{BehaviorId, Branch, Command, EngineConfig, Expression, SoundId, WorldState};
use companion_runtime::brain::nodes::Drive;
use companion_runtime::brain::subtrees;
use companion_runtime::{
    ChargeSignal, DecisionEvent, Engine, RecordingActuators, TickContext, WorldPublisher,
    world_channel,
};

fn engine_with(world: WorldState) -> (Engine, WorldPublisher, RecordingActuators, ChargeSignal) {
    let (publisher, feed) = world_channel(world);
    let actuators = RecordingActuators::new();
    let charge = ChargeSignal::new();
    let engine = Engine::builder()
        .world(feed)
        .actuators(actuators.clone())
        .charging(charge.clone())
        .build()
        .unwrap();
    (engine, publisher, actuators, charge)
}

/// A person in front of the robot, greeted a moment ago.
fn person_in_view() -> WorldState {
    WorldState {
        face_visible: true,
        face_area_fraction: 0.1,
        face_center_x: 0.5,
        time_since_last_greeting: Duration::ZERO,
        ..WorldState::default()
    }
}

#[test]
fn critical_battery_always_selects_survival() {
    for mask in 0u8..32 {
        let world = WorldState {
            battery_level: 0.1,
            hotword_active: mask & 1 != 0,
            touch_active: mask & 2 != 0,
            obstacle_distance_cm: if mask & 4 != 0 { 5.0 } else { f32::INFINITY },
            face_visible: mask & 8 != 0,
            face_area_fraction: if mask & 16 != 0 { 0.5 } else { 0.1 },
            ..WorldState::default()
        };
        let (mut engine, _publisher, actuators, _charge) = engine_with(world);

        let report = engine.tick();
        assert_eq!(report.branch, Branch::Survival, "world {world:?}");
        assert_eq!(report.behavior, Some(BehaviorId::EmergencyShutdown));
        assert_eq!(
            actuators.commands(),
            vec![
                Command::Stop,
                Command::StopSound,
                Command::Head {
                    pan: 0.0,
                    tilt: 0.0
                },
                Command::Face(Expression::Off),
            ]
        );
    }
}

#[test]
fn survival_ignores_everything_until_charged() {
    let (mut engine, publisher, _actuators, charge) = engine_with(WorldState {
        battery_level: 0.1,
        ..WorldState::default()
    });
    let mut events = engine.subscribe();

    assert_eq!(engine.tick().branch, Branch::Survival);

    // Plugged in: the battery recovers and a person talks to the robot.
    publisher.update(|world| {
        world.battery_level = 0.6;
        world.hotword_active = true;
    });
    for _ in 0..5 {
        assert_eq!(engine.tick().branch, Branch::Survival);
    }

    charge.set(true);
    assert_eq!(engine.tick().branch, Branch::Audio);
    assert!(!engine.arbiter().is_survival_latched());

    let mut latched = false;
    let mut released = false;
    while let Ok(event) = events.try_recv() {
        latched |= matches!(event, DecisionEvent::SurvivalLatched { tick: 0, .. });
        released |= matches!(event, DecisionEvent::SurvivalReleased { tick: 6 });
    }
    assert!(latched && released);
}

#[test]
fn hotword_preempts_follow_before_listening() {
    let (mut engine, publisher, actuators, _charge) = engine_with(person_in_view());

    let report = engine.tick();
    assert_eq!(report.branch, Branch::Utility);
    assert_eq!(report.behavior, Some(BehaviorId::FollowPerson));
    assert!(matches!(
        actuators.drain().as_slice(),
        [Command::Drive { linear, .. }] if *linear > 0.0
    ));

    publisher.update(|world| world.hotword_active = true);
    let report = engine.tick();
    assert_eq!(report.branch, Branch::Audio);
    assert_eq!(report.behavior, Some(BehaviorId::ListenToUser));

    // The follow abort's safe-stop comes first, then the listening reflex.
    assert_eq!(
        actuators.drain(),
        vec![
            Command::Stop,
            Command::Stop,
            Command::Face(Expression::Listening),
            Command::PlaySound(SoundId::ListeningChime),
        ]
    );
    assert_eq!(engine.arbiter().utility_winner(), None);
    assert_eq!(engine.arbiter().last_switch_tick(), 1);
}

#[test]
fn interrupted_sequence_restarts_from_the_first_step() {
    let (mut engine, publisher, actuators, _charge) = engine_with(WorldState {
        obstacle_distance_cm: 10.0,
        ..WorldState::default()
    });

    // Stop, scared face, then reversing (step 2 of avoid_obstacle).
    assert_eq!(engine.tick().branch, Branch::Safety);
    assert_eq!(engine.tick().status, Status::Running);
    let avoid = engine.arbiter().reflex_tree(Branch::Safety).unwrap();
    assert_eq!(avoid.cursor(avoid.root()), Some(2));
    actuators.drain();

    publisher.update(|world| world.touch_active = true);
    assert_eq!(engine.tick().branch, Branch::Touch);
    let avoid = engine.arbiter().reflex_tree(Branch::Safety).unwrap();
    assert_eq!(avoid.status(), Status::Idle);
    assert_eq!(avoid.cursor(avoid.root()), Some(0));
    assert_eq!(
        actuators.drain(),
        vec![
            Command::Stop,
            Command::Stop,
            Command::Face(Expression::Happy),
            Command::PlaySound(SoundId::Purr),
        ]
    );

    publisher.update(|world| world.touch_active = false);
    assert_eq!(engine.tick().branch, Branch::Safety);
    assert_eq!(
        actuators.drain(),
        vec![
            Command::Stop,
            Command::Face(Expression::Scared),
            Command::Drive {
                linear: -EngineConfig::default().motion.back_away_speed,
                angular: 0.0,
            },
        ]
    );
}

#[test]
fn too_close_face_never_reaches_the_steering_branch() {
    let config = EngineConfig::default();

    for face_visible in [true, false] {
        let actuators = RecordingActuators::new();
        let mut ctx = TickContext::new(actuators.clone());
        let mut follow = subtrees::build(BehaviorId::FollowPerson, &config).unwrap();
        let steer = follow.find("steer").unwrap();

        for tick in 0..10 {
            ctx.begin(
                tick,
                WorldState {
                    face_visible,
                    face_area_fraction: 0.35,
                    ..WorldState::default()
                },
            );
            assert_eq!(follow.tick(&mut ctx), Status::Running);
            assert_eq!(follow.node_status(steer), Some(Status::Idle));
        }

        assert!(actuators.commands().iter().all(|command| matches!(
            command,
            Command::Drive { linear, angular } if *linear < 0.0 && *angular == 0.0
        )));
    }
}

#[test]
fn repeated_abort_issues_no_extra_commands() {
    let actuators = RecordingActuators::new();
    let mut ctx = TickContext::new(actuators.clone());
    ctx.begin(0, WorldState::default());

    let mut drive = Drive::new("reverse", -0.1, 0.0, 2);
    drive.on_enter(&mut ctx);
    assert_eq!(drive.on_tick(&mut ctx), Status::Running);
    assert_eq!(drive.on_tick(&mut ctx), Status::Succeeded);
    let issued = actuators.len();

    drive.on_abort(&mut ctx);
    drive.on_abort(&mut ctx);
    assert_eq!(actuators.len(), issued);
}

#[test]
fn aborting_a_finished_tree_is_silent() {
    let config = EngineConfig::default();
    let actuators = RecordingActuators::new();
    let mut ctx = TickContext::new(actuators.clone());
    let mut greet = subtrees::build(BehaviorId::GreetHappily, &config).unwrap();

    let mut tick = 0;
    let status = loop {
        ctx.begin(tick, person_in_view());
        let status = greet.tick(&mut ctx);
        if status.is_finished() {
            break status;
        }
        tick += 1;
    };
    assert_eq!(status, Status::Succeeded);

    let issued = actuators.len();
    greet.abort(&mut ctx);
    greet.abort(&mut ctx);
    assert_eq!(actuators.len(), issued);
}

#[test]
fn hardware_fault_falls_through_to_the_next_branch() {
    let (mut engine, publisher, actuators, _charge) = engine_with(person_in_view());
    engine.tick();

    // Motors die while steering; losing the face then leaves only the search.
    actuators.fail(companion_core::ActuatorClass::MOTORS);
    let report = engine.tick();
    assert_eq!(report.behavior, Some(BehaviorId::FollowPerson));
    assert_eq!(report.status, Status::Failed);

    actuators.heal();
    publisher.update(|world| world.face_visible = false);
    let report = engine.tick();
    assert_eq!(report.branch, Branch::Utility);
    assert_ne!(report.behavior, Some(BehaviorId::FollowPerson));
}
