//! Behavior catalogue and arbitration branches.

/// Fixed-priority branches of the root arbiter, highest priority first.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Branch {
    /// Critical battery. Latched until charging completes.
    Survival,
    /// Wake word heard; freeze and listen.
    Audio,
    /// Being petted.
    Touch,
    /// Obstacle inside the safety radius.
    Safety,
    /// No reflex applies; the utility layer decides.
    Utility,
}

impl Branch {
    /// The fixed reflex behavior run by this branch, `None` for `Utility`.
    pub const fn reflex(self) -> Option<BehaviorId> {
        match self {
            Branch::Survival => Some(BehaviorId::EmergencyShutdown),
            Branch::Audio => Some(BehaviorId::ListenToUser),
            Branch::Touch => Some(BehaviorId::EnjoyTouch),
            Branch::Safety => Some(BehaviorId::AvoidObstacle),
            Branch::Utility => None,
        }
    }
}

/// Every high-level behavior the robot can perform.
///
/// Reflex behaviors are bound to an arbiter [`Branch`]; the rest compete in
/// the utility layer.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BehaviorId {
    // ========================================================================
    // Reflexes
    // ========================================================================
    EmergencyShutdown,
    ListenToUser,
    EnjoyTouch,
    AvoidObstacle,

    // ========================================================================
    // Social
    // ========================================================================
    ComeCloser,
    GreetHappily,
    FollowPerson,
    TiltHeadCuriously,
    SearchForHuman,

    // ========================================================================
    // Play / idle
    // ========================================================================
    DoAHappyDance,
    GoToSleep,
    Stretch,
    LookAround,
}

impl BehaviorId {
    /// Returns `true` for behaviors owned by a reflex branch.
    pub const fn is_reflex(self) -> bool {
        matches!(
            self,
            BehaviorId::EmergencyShutdown
                | BehaviorId::ListenToUser
                | BehaviorId::EnjoyTouch
                | BehaviorId::AvoidObstacle
        )
    }

    /// Returns `true` if running this behavior counts as social interaction.
    ///
    /// Drive producers use this to reset their boredom clock.
    pub const fn is_interaction(self) -> bool {
        matches!(
            self,
            BehaviorId::ListenToUser
                | BehaviorId::EnjoyTouch
                | BehaviorId::ComeCloser
                | BehaviorId::GreetHappily
                | BehaviorId::FollowPerson
                | BehaviorId::TiltHeadCuriously
        )
    }

    /// Human readable description of what the behavior does.
    pub const fn description(self) -> &'static str {
        match self {
            BehaviorId::EmergencyShutdown => "Stop all motors and dim the screen immediately.",
            BehaviorId::ListenToUser => "Freeze motors and display the listening face.",
            BehaviorId::EnjoyTouch => "Stop moving, close eyes, and purr.",
            BehaviorId::AvoidObstacle => "Stop, back off, and turn away from an obstacle.",
            BehaviorId::ComeCloser => "Approach the person slowly and look up affectionately.",
            BehaviorId::GreetHappily => "Show a joyful face, nod, and chirp a greeting.",
            BehaviorId::FollowPerson => "Keep the tracked person comfortably within view.",
            BehaviorId::TiltHeadCuriously => "Tilt the head with blinking eyes.",
            BehaviorId::SearchForHuman => "Spin in place looking for a face.",
            BehaviorId::DoAHappyDance => "Dance with music to celebrate.",
            BehaviorId::GoToSleep => "Dim lights, play a soft tune, and rest.",
            BehaviorId::Stretch => "Extend and shake to look alive.",
            BehaviorId::LookAround => "Pan the head slowly to survey the room.",
        }
    }

    /// Free-form tags, mirroring the action catalogue of the robot.
    pub const fn tags(self) -> &'static [&'static str] {
        match self {
            BehaviorId::EmergencyShutdown => &["survival", "power"],
            BehaviorId::ListenToUser => &["interaction", "audio"],
            BehaviorId::EnjoyTouch => &["social", "touch"],
            BehaviorId::AvoidObstacle => &["safety", "movement"],
            BehaviorId::ComeCloser => &["social", "affection"],
            BehaviorId::GreetHappily => &["social", "positive"],
            BehaviorId::FollowPerson => &["social", "movement"],
            BehaviorId::TiltHeadCuriously => &["idle", "curious"],
            BehaviorId::SearchForHuman => &["social", "search"],
            BehaviorId::DoAHappyDance => &["celebratory", "high-energy"],
            BehaviorId::GoToSleep => &["rest", "low-energy"],
            BehaviorId::Stretch => &["idle", "biological"],
            BehaviorId::LookAround => &["scan", "idle"],
        }
    }
}
