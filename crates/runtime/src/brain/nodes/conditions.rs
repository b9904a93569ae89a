//! Condition nodes.
//!
//! Conditions read the world snapshot and nothing else. They never issue
//! commands and never report `Running`.

use behavior_tree::Condition;

use crate::brain::TickContext;

/// Battery below the critical level.
pub struct BatteryCritical {
    pub threshold: f32,
}

impl Condition<TickContext> for BatteryCritical {
    fn name(&self) -> &'static str {
        "battery_critical"
    }

    fn evaluate(&self, ctx: &TickContext) -> bool {
        ctx.world.battery_level < self.threshold
    }
}

/// The wake word was heard.
pub struct HotwordActive;

impl Condition<TickContext> for HotwordActive {
    fn name(&self) -> &'static str {
        "hotword_active"
    }

    fn evaluate(&self, ctx: &TickContext) -> bool {
        ctx.world.hotword_active
    }
}

/// Someone is touching the robot.
pub struct TouchActive;

impl Condition<TickContext> for TouchActive {
    fn name(&self) -> &'static str {
        "touch_active"
    }

    fn evaluate(&self, ctx: &TickContext) -> bool {
        ctx.world.touch_active
    }
}

/// An obstacle is closer than `distance_cm`.
pub struct ObstacleWithin {
    pub distance_cm: f32,
}

impl Condition<TickContext> for ObstacleWithin {
    fn name(&self) -> &'static str {
        "obstacle_within"
    }

    fn evaluate(&self, ctx: &TickContext) -> bool {
        ctx.world.obstacle_distance_cm < self.distance_cm
    }
}

pub struct FaceVisible;

impl Condition<TickContext> for FaceVisible {
    fn name(&self) -> &'static str {
        "face_visible"
    }

    fn evaluate(&self, ctx: &TickContext) -> bool {
        ctx.world.face_visible
    }
}

/// The tracked face fills more than `area` of the frame.
///
/// Reads the area alone: a face that covers the lens may no longer be
/// detected as visible.
pub struct FaceTooClose {
    pub area: f32,
}

impl Condition<TickContext> for FaceTooClose {
    fn name(&self) -> &'static str {
        "face_too_close"
    }

    fn evaluate(&self, ctx: &TickContext) -> bool {
        ctx.world.face_area_fraction > self.area
    }
}
