//! Drive dynamics.
//!
//! [`DriveModel`] is a producer of the [`Drives`] half of the world snapshot.
//! It integrates passive drift over elapsed time and applies small per-tick
//! feedback for whatever behavior the engine executed. It lives on the
//! perception side of the boundary: the engine only ever reads its output.
//!
//! Alongside the drives the model keeps the robot's [`Mood`], a confidence
//! level and a short history of the behaviors it has run.

use std::collections::VecDeque;
use std::time::Duration;

use strum::{Display, EnumIter};

use crate::behavior::BehaviorId;
use crate::hardware::Expression;
use crate::world::{Drives, unit};

/// Emotional state set by the behaviors the robot runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Mood {
    #[default]
    Curious,
    Happy,
    Playful,
    Alert,
    Sleepy,
    Scared,
    Excited,
    Lonely,
    Neutral,
}

impl Mood {
    /// Face that shows this mood.
    pub const fn expression(self) -> Expression {
        match self {
            Mood::Curious => Expression::Curious,
            Mood::Happy | Mood::Excited => Expression::Happy,
            Mood::Playful => Expression::Playful,
            Mood::Alert => Expression::Alert,
            Mood::Sleepy => Expression::Sleepy,
            Mood::Scared => Expression::Scared,
            Mood::Lonely => Expression::Lonely,
            Mood::Neutral => Expression::Neutral,
        }
    }

    /// Mood a behavior leaves behind, if it sets one.
    pub const fn after(behavior: BehaviorId) -> Option<Self> {
        match behavior {
            BehaviorId::EmergencyShutdown | BehaviorId::GoToSleep => Some(Mood::Sleepy),
            BehaviorId::EnjoyTouch | BehaviorId::GreetHappily => Some(Mood::Happy),
            BehaviorId::ListenToUser | BehaviorId::AvoidObstacle => Some(Mood::Alert),
            BehaviorId::FollowPerson | BehaviorId::ComeCloser => Some(Mood::Curious),
            BehaviorId::SearchForHuman => Some(Mood::Lonely),
            BehaviorId::DoAHappyDance => Some(Mood::Playful),
            BehaviorId::Stretch => Some(Mood::Neutral),
            BehaviorId::TiltHeadCuriously | BehaviorId::LookAround => None,
        }
    }
}

/// Passive drift rates, per second of elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriveRates {
    pub energy_decay: f32,
    pub curiosity_rise: f32,
    pub hunger_rise: f32,
    /// Multiplier applied to curiosity and hunger growth once bored.
    pub boredom_boost: f32,
    /// Time without interaction after which the robot is bored.
    pub boredom_timeout: Duration,
    pub excitement_rest: f32,
    pub excitement_relax: f32,
    pub caution_decay: f32,
}

impl Default for DriveRates {
    fn default() -> Self {
        Self {
            energy_decay: 0.0015,
            curiosity_rise: 0.004,
            hunger_rise: 0.015,
            boredom_boost: 1.5,
            boredom_timeout: Duration::from_secs(15),
            excitement_rest: 0.2,
            excitement_relax: 0.1,
            caution_decay: 0.025,
        }
    }
}

/// Integrates drive variables over time and executed behaviors.
#[derive(Clone, Debug)]
pub struct DriveModel {
    drives: Drives,
    rates: DriveRates,
    since_interaction: Duration,
    mood: Mood,
    confidence: f32,
    /// Distinct consecutive behaviors, oldest first.
    recent: VecDeque<BehaviorId>,
}

impl DriveModel {
    const CURIOSITY_FLOOR: f32 = 0.1;
    pub const DEFAULT_CONFIDENCE: f32 = 0.55;
    /// Number of behaviors kept in [`DriveModel::recent_behaviors`].
    pub const RECENT_CAPACITY: usize = 8;

    pub fn new(drives: Drives) -> Self {
        Self::with_rates(drives, DriveRates::default())
    }

    pub fn with_rates(drives: Drives, rates: DriveRates) -> Self {
        Self {
            drives: drives.clamped(),
            rates,
            since_interaction: Duration::ZERO,
            mood: Mood::default(),
            confidence: Self::DEFAULT_CONFIDENCE,
            recent: VecDeque::with_capacity(Self::RECENT_CAPACITY),
        }
    }

    pub fn drives(&self) -> Drives {
        self.drives
    }

    pub fn rates(&self) -> &DriveRates {
        &self.rates
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn last_behavior(&self) -> Option<BehaviorId> {
        self.recent.back().copied()
    }

    /// Up to [`Self::RECENT_CAPACITY`] behaviors, oldest first. A behavior
    /// that keeps running for many ticks appears once.
    pub fn recent_behaviors(&self) -> impl Iterator<Item = BehaviorId> + '_ {
        self.recent.iter().copied()
    }

    pub fn time_since_interaction(&self) -> Duration {
        self.since_interaction
    }

    pub fn is_bored(&self) -> bool {
        self.since_interaction > self.rates.boredom_timeout
    }

    /// Applies passive drift for `elapsed` wall time.
    pub fn advance(&mut self, elapsed: Duration) {
        let dt = elapsed.as_secs_f32();
        let boost = if self.is_bored() {
            self.rates.boredom_boost
        } else {
            1.0
        };
        let rates = &self.rates;
        let d = &mut self.drives;

        d.energy = unit(d.energy - rates.energy_decay * dt);
        d.curiosity = (d.curiosity + rates.curiosity_rise * boost * dt)
            .clamp(Self::CURIOSITY_FLOOR, 1.0);
        d.attention_hunger = unit(d.attention_hunger + rates.hunger_rise * boost * dt);
        d.excitement =
            unit(d.excitement + (rates.excitement_rest - d.excitement) * rates.excitement_relax * dt);
        d.caution = unit(d.caution - rates.caution_decay * dt);

        self.since_interaction = self.since_interaction.saturating_add(elapsed);
    }

    /// Applies the per-tick cost or reward of running `behavior`.
    ///
    /// Social behaviors register an interaction when they start and keep the
    /// boredom clock reset while they run.
    pub fn apply_behavior(&mut self, behavior: BehaviorId) {
        let d = &mut self.drives;
        match behavior {
            BehaviorId::EmergencyShutdown => d.energy = 0.0,
            BehaviorId::EnjoyTouch => {
                d.attention_hunger = 0.0;
                d.caution = 0.0;
                d.excitement -= 0.05;
            }
            BehaviorId::GreetHappily => {
                d.excitement += 0.02;
                self.confidence = unit(self.confidence + 0.01);
            }
            BehaviorId::ListenToUser => d.excitement -= 0.01,
            BehaviorId::FollowPerson => {
                d.energy -= 0.0002;
                d.attention_hunger -= 0.005;
            }
            BehaviorId::SearchForHuman => {
                d.energy -= 0.0003;
                d.curiosity += 0.001;
            }
            BehaviorId::ComeCloser => {
                d.energy -= 0.0002;
                d.attention_hunger -= 0.008;
            }
            BehaviorId::DoAHappyDance => {
                d.energy -= 0.0008;
                d.excitement -= 0.005;
            }
            BehaviorId::GoToSleep => {
                d.energy += 0.0005;
                d.excitement = 0.0;
            }
            BehaviorId::Stretch => {
                d.energy -= 0.0001;
                d.curiosity += 0.001;
            }
            BehaviorId::AvoidObstacle => d.caution += 0.005,
            BehaviorId::TiltHeadCuriously | BehaviorId::LookAround => {}
        }
        self.drives = self.drives.clamped();
        if let Some(mood) = Mood::after(behavior) {
            self.mood = mood;
        }

        let started = self.last_behavior() != Some(behavior);
        if behavior.is_interaction() {
            if started {
                self.register_interaction();
            } else {
                self.since_interaction = Duration::ZERO;
            }
        }
        if started {
            if self.recent.len() == Self::RECENT_CAPACITY {
                self.recent.pop_front();
            }
            self.recent.push_back(behavior);
        }
    }

    /// Records a social interaction: resets boredom and satisfies hunger.
    pub fn register_interaction(&mut self) {
        let d = &mut self.drives;
        d.curiosity = (d.curiosity - 0.1).clamp(0.2, 1.0);
        d.attention_hunger = unit(d.attention_hunger - 0.25);
        d.excitement = (d.excitement + 0.04).clamp(0.1, 1.0);
        d.caution = (d.caution - 0.05).clamp(0.1, 1.0);
        self.confidence = unit(self.confidence + 0.05);
        self.since_interaction = Duration::ZERO;
    }

    /// Feedback from a tracked face: seeing someone builds confidence, and a
    /// close face slowly satisfies hunger.
    pub fn observe_face(&mut self, area_fraction: f32) {
        self.confidence = unit(self.confidence + 0.02);
        if area_fraction > 0.2 {
            self.drives.attention_hunger = unit(self.drives.attention_hunger - 0.01);
        }
        self.since_interaction = Duration::ZERO;
    }
}

impl Default for DriveModel {
    fn default() -> Self {
        Self::new(Drives::default())
    }
}
