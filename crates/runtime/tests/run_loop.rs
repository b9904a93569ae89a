//! Fixed-rate loop behavior under paused tokio time.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use companion_core::{Command, EngineConfig, WorldState};
use companion_runtime::{Engine, RecordingActuators, WorldStateProvider, world_channel};
use tokio::time::Instant;

fn engine(tick_hz: f32) -> (Engine, RecordingActuators) {
    let (_publisher, feed) = world_channel(WorldState::default());
    let actuators = RecordingActuators::new();
    let engine = Engine::builder()
        .config(EngineConfig {
            tick_hz,
            ..EngineConfig::default()
        })
        .world(feed)
        .actuators(actuators.clone())
        .build()
        .unwrap();
    (engine, actuators)
}

#[tokio::test(start_paused = true)]
async fn run_for_stops_after_the_requested_ticks() {
    let (mut engine, _actuators) = engine(30.0);
    let started = tokio::time::Instant::now();

    let ran = engine.run_for(30, std::future::pending()).await;

    assert_eq!(ran, 30);
    assert_eq!(engine.ticks(), 30);
    // The first tick fires immediately, the rest one period apart.
    assert!(started.elapsed() >= engine.config().tick_period() * 29);
}

#[tokio::test(start_paused = true)]
async fn shutdown_ends_the_loop_with_a_safe_stop() {
    let (mut engine, actuators) = engine(10.0);

    let ran = engine
        .run(tokio::time::sleep(Duration::from_millis(450)))
        .await;

    // Ticks at 0, 100, 200, 300 and 400 ms.
    assert_eq!(ran, 5);
    assert_eq!(engine.arbiter().current_branch(), None);
    // look_around was mid-gesture; its abort re-centers the head.
    assert_eq!(
        actuators.commands().last(),
        Some(&Command::Head {
            pan: 0.0,
            tilt: 0.0
        })
    );
}

/// Records the instant of every snapshot.
#[derive(Clone, Default)]
struct Stamps(Arc<Mutex<Vec<Instant>>>);

impl WorldStateProvider for Stamps {
    fn snapshot(&mut self) -> WorldState {
        self.0.lock().unwrap().push(Instant::now());
        WorldState::default()
    }
}

#[tokio::test(start_paused = true)]
async fn missed_ticks_are_skipped_not_bursted() {
    let stamps = Stamps::default();
    let mut engine = Engine::builder()
        .config(EngineConfig {
            tick_hz: 10.0,
            ..EngineConfig::default()
        })
        .world(stamps.clone())
        .actuators(RecordingActuators::new())
        .build()
        .unwrap();
    let started = Instant::now();

    let stall = async {
        // Ticks at 0 and 100 ms, then the clock jumps past five deadlines.
        tokio::time::sleep(Duration::from_millis(150)).await;
        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::time::sleep(Duration::from_millis(80)).await;
    };
    let ran = engine.run(stall).await;

    // One catch-up tick at 650 ms and the next aligned one at 700 ms.
    assert_eq!(ran, 4);
    let stamps = stamps.0.lock().unwrap();
    assert!(stamps[1] - started < Duration::from_millis(150));
    assert!(stamps[2] - started >= Duration::from_millis(650));
    assert!(stamps[3] - stamps[2] < engine.config().tick_period());
}
