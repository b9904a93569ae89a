//! Scripted sensor timelines for the simulator.
//!
//! A scenario is a RON file listing sensor events keyed by the tick at which
//! they take effect:
//!
//! ```ron
//! (
//!     name: "wake word while following",
//!     events: [
//!         (tick: 0, event: FaceSeen(area: 0.1, center_x: 0.5)),
//!         (tick: 90, event: Hotword(true)),
//!         (tick: 120, event: Hotword(false)),
//!     ],
//! )
//! ```
use std::path::Path;

use anyhow::{Context, Result};
use companion_core::{Drives, WorldState};
use serde::Deserialize;

/// One sensor change.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub enum SensorEvent {
    Battery(f32),
    Hotword(bool),
    Touch(bool),
    /// Nearest obstacle in centimetres, `None` once it is gone.
    Obstacle(Option<f32>),
    FaceSeen { area: f32, center_x: f32 },
    FaceLost,
    SpeakerBusy(bool),
    /// Overrides the drive model's state.
    Drives(Drives),
    ChargeComplete(bool),
}

impl SensorEvent {
    /// Applies the event to the sensed half of a snapshot.
    ///
    /// Drive and charging events are handled by the world model and leave
    /// the snapshot untouched.
    pub fn apply(&self, world: &mut WorldState) {
        match *self {
            SensorEvent::Battery(level) => world.battery_level = companion_core::unit(level),
            SensorEvent::Hotword(active) => world.hotword_active = active,
            SensorEvent::Touch(active) => world.touch_active = active,
            SensorEvent::Obstacle(distance) => {
                world.obstacle_distance_cm = distance.unwrap_or(f32::INFINITY).max(0.0);
            }
            SensorEvent::FaceSeen { area, center_x } => {
                world.face_visible = true;
                world.face_area_fraction = companion_core::unit(area);
                world.face_center_x = companion_core::unit(center_x);
            }
            SensorEvent::FaceLost => {
                world.face_visible = false;
                world.face_area_fraction = 0.0;
                world.face_center_x = 0.5;
            }
            SensorEvent::SpeakerBusy(busy) => world.speaker_busy = busy,
            SensorEvent::Drives(_) | SensorEvent::ChargeComplete(_) => {}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TimedEvent {
    pub tick: u64,
    pub event: SensorEvent,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

impl Scenario {
    /// Load scenario from a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse scenario file {}", path.display()))
    }

    /// Parses scenario RON. Events are ordered by tick; equal ticks keep
    /// their file order.
    pub fn parse(content: &str) -> Result<Self> {
        let mut scenario: Scenario = ron::from_str(content)?;
        scenario.events.sort_by_key(|timed| timed.tick);
        Ok(scenario)
    }

    /// Tick of the last scripted event.
    pub fn last_tick(&self) -> Option<u64> {
        self.events.last().map(|timed| timed.tick)
    }
}
