//! Actuator command vocabulary.
//!
//! Actions talk to hardware only through these small command types; the
//! engine never sees PWM values, servo pulses or audio buffers.

use bitflags::bitflags;

bitflags! {
    /// Actuator classes commanded during one tick.
    ///
    /// Each bit represents one class of hardware. Tick reports carry the set
    /// of classes that received a command so downstream tooling can check
    /// that only one coherent action drove the robot.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActuatorClass: u8 {
        const MOTORS  = 1 << 0;
        const HEAD    = 1 << 1;
        const DISPLAY = 1 << 2;
        const SPEAKER = 1 << 3;
    }
}

/// Facial expressions the display can render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Expression {
    Neutral,
    Happy,
    Curious,
    Listening,
    Sleepy,
    Alert,
    Scared,
    Playful,
    Lonely,
    /// Screen dimmed for low power.
    Off,
}

/// Sounds the speaker can play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SoundId {
    Chirp,
    Purr,
    ListeningChime,
    DanceTune,
    Lullaby,
    Yawn,
    PowerDown,
}

/// A single hardware command, as issued by an action.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Stop the drive motors.
    Stop,
    /// Drive with linear speed (m/s, negative = reverse) and angular rate (rad/s).
    Drive { linear: f32, angular: f32 },
    /// Move the head servos (normalized `[-1, 1]`).
    Head { pan: f32, tilt: f32 },
    Face(Expression),
    PlaySound(SoundId),
    StopSound,
}

impl Command {
    /// Actuator class this command addresses.
    pub const fn class(&self) -> ActuatorClass {
        match self {
            Command::Stop | Command::Drive { .. } => ActuatorClass::MOTORS,
            Command::Head { .. } => ActuatorClass::HEAD,
            Command::Face(_) => ActuatorClass::DISPLAY,
            Command::PlaySound(_) | Command::StopSound => ActuatorClass::SPEAKER,
        }
    }
}
