//! Action nodes.
//!
//! Actions are the only nodes that touch hardware. Anything that takes real
//! time is expressed as a multi-tick action that counts ticks or watches the
//! snapshot and reports `Running` in between; nothing here ever sleeps.
//!
//! Every action tracks whether it is active. `on_abort` only issues its
//! safe-stop while active, so aborting an action that already completed is a
//! no-op no matter how often it happens.

use behavior_tree::{Action, Status};
use companion_core::{Command, Expression, SoundId};

use crate::brain::TickContext;

// ============================================================================
// Instant commands
// ============================================================================

/// Issues one command and completes in the same tick.
pub struct Issue {
    name: &'static str,
    command: Command,
    accepted: bool,
}

impl Issue {
    pub const fn new(name: &'static str, command: Command) -> Self {
        Self {
            name,
            command,
            accepted: false,
        }
    }

    pub const fn stop() -> Self {
        Self::new("stop_motors", Command::Stop)
    }

    pub const fn face(expression: Expression) -> Self {
        Self::new("set_face", Command::Face(expression))
    }

    pub const fn sound(sound: SoundId) -> Self {
        Self::new("play_sound", Command::PlaySound(sound))
    }

    pub const fn silence() -> Self {
        Self::new("stop_sound", Command::StopSound)
    }

    pub const fn center_head() -> Self {
        Self::new("center_head", Command::Head {
            pan: 0.0,
            tilt: 0.0,
        })
    }
}

impl Action<TickContext> for Issue {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_enter(&mut self, ctx: &mut TickContext) {
        self.accepted = ctx.command(self.command);
    }

    fn on_tick(&mut self, _ctx: &mut TickContext) -> Status {
        Status::from_bool(self.accepted)
    }

    fn on_abort(&mut self, _ctx: &mut TickContext) {}
}

// ============================================================================
// Timed actions
// ============================================================================

/// Does nothing for a number of ticks, or forever.
///
/// Used to keep a reflex in control while its trigger persists.
pub struct Hold {
    ticks: Option<u32>,
    elapsed: u32,
}

impl Hold {
    pub const fn for_ticks(ticks: u32) -> Self {
        Self {
            ticks: Some(ticks),
            elapsed: 0,
        }
    }

    pub const fn forever() -> Self {
        Self {
            ticks: None,
            elapsed: 0,
        }
    }
}

impl Action<TickContext> for Hold {
    fn name(&self) -> &'static str {
        "hold"
    }

    fn on_enter(&mut self, _ctx: &mut TickContext) {
        self.elapsed = 0;
    }

    fn on_tick(&mut self, _ctx: &mut TickContext) -> Status {
        self.elapsed = self.elapsed.saturating_add(1);
        match self.ticks {
            Some(ticks) if self.elapsed >= ticks => Status::Succeeded,
            _ => Status::Running,
        }
    }

    fn on_abort(&mut self, _ctx: &mut TickContext) {}
}

/// Plays a sound and waits for the speaker to go quiet.
///
/// Completes once the speaker was seen busy and then idle, or after
/// `max_ticks` if the speaker never reports playback.
pub struct PlaySound {
    sound: SoundId,
    max_ticks: u32,
    elapsed: u32,
    heard: bool,
    active: bool,
}

impl PlaySound {
    pub const fn until_done(sound: SoundId, max_ticks: u32) -> Self {
        Self {
            sound,
            max_ticks,
            elapsed: 0,
            heard: false,
            active: false,
        }
    }
}

impl Action<TickContext> for PlaySound {
    fn name(&self) -> &'static str {
        "play_sound_until_done"
    }

    fn on_enter(&mut self, ctx: &mut TickContext) {
        self.elapsed = 0;
        self.heard = false;
        self.active = ctx.command(Command::PlaySound(self.sound));
    }

    fn on_tick(&mut self, ctx: &mut TickContext) -> Status {
        if !self.active {
            return Status::Failed;
        }

        self.elapsed += 1;
        self.heard |= ctx.world.speaker_busy;
        let finished = self.heard && !ctx.world.speaker_busy;

        if finished || self.elapsed >= self.max_ticks {
            self.active = false;
            Status::Succeeded
        } else {
            Status::Running
        }
    }

    fn on_abort(&mut self, ctx: &mut TickContext) {
        if std::mem::take(&mut self.active) {
            ctx.safe_stop(Command::StopSound);
        }
    }
}

/// Drives at a fixed velocity for a number of ticks, then stops.
pub struct Drive {
    name: &'static str,
    linear: f32,
    angular: f32,
    ticks: u32,
    elapsed: u32,
    active: bool,
}

impl Drive {
    pub const fn new(name: &'static str, linear: f32, angular: f32, ticks: u32) -> Self {
        Self {
            name,
            linear,
            angular,
            ticks,
            elapsed: 0,
            active: false,
        }
    }
}

impl Action<TickContext> for Drive {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_enter(&mut self, ctx: &mut TickContext) {
        self.elapsed = 0;
        self.active = ctx.command(Command::Drive {
            linear: self.linear,
            angular: self.angular,
        });
    }

    fn on_tick(&mut self, ctx: &mut TickContext) -> Status {
        if !self.active {
            return Status::Failed;
        }

        self.elapsed += 1;
        if self.elapsed < self.ticks {
            return Status::Running;
        }

        self.active = false;
        Status::from_bool(ctx.command(Command::Stop))
    }

    fn on_abort(&mut self, ctx: &mut TickContext) {
        if std::mem::take(&mut self.active) {
            ctx.safe_stop(Command::Stop);
        }
    }
}

/// Moves the head to a pose and holds it for a number of ticks.
pub struct MoveHead {
    name: &'static str,
    pan: f32,
    tilt: f32,
    ticks: u32,
    elapsed: u32,
    active: bool,
}

impl MoveHead {
    pub const fn new(name: &'static str, pan: f32, tilt: f32, ticks: u32) -> Self {
        Self {
            name,
            pan,
            tilt,
            ticks,
            elapsed: 0,
            active: false,
        }
    }
}

impl Action<TickContext> for MoveHead {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_enter(&mut self, ctx: &mut TickContext) {
        self.elapsed = 0;
        self.active = ctx.command(Command::Head {
            pan: self.pan,
            tilt: self.tilt,
        });
    }

    fn on_tick(&mut self, _ctx: &mut TickContext) -> Status {
        if !self.active {
            return Status::Failed;
        }

        self.elapsed += 1;
        if self.elapsed < self.ticks {
            Status::Running
        } else {
            self.active = false;
            Status::Succeeded
        }
    }

    fn on_abort(&mut self, ctx: &mut TickContext) {
        if std::mem::take(&mut self.active) {
            ctx.safe_stop(Command::Head {
                pan: 0.0,
                tilt: 0.0,
            });
        }
    }
}

/// Wiggles left and right in place, flipping direction every `period` ticks.
///
/// Owns both motors and speaker while running, so an abort silences the
/// music as well as stopping the wheels.
pub struct Dance {
    turn_rate: f32,
    period: u32,
    ticks: u32,
    elapsed: u32,
    active: bool,
}

impl Dance {
    pub const fn new(turn_rate: f32, period: u32, ticks: u32) -> Self {
        Self {
            turn_rate,
            period: if period == 0 { 1 } else { period },
            ticks,
            elapsed: 0,
            active: false,
        }
    }

    fn step(&self) -> Command {
        let flip = (self.elapsed / self.period) % 2 == 1;
        Command::Drive {
            linear: 0.0,
            angular: if flip {
                -self.turn_rate
            } else {
                self.turn_rate
            },
        }
    }
}

impl Action<TickContext> for Dance {
    fn name(&self) -> &'static str {
        "dance"
    }

    fn on_enter(&mut self, ctx: &mut TickContext) {
        self.elapsed = 0;
        self.active = ctx.command(self.step());
    }

    fn on_tick(&mut self, ctx: &mut TickContext) -> Status {
        if !self.active {
            return Status::Failed;
        }

        self.elapsed += 1;
        if self.elapsed >= self.ticks {
            self.active = false;
            let stopped = ctx.command(Command::Stop);
            let silenced = ctx.command(Command::StopSound);
            return Status::from_bool(stopped && silenced);
        }

        if self.elapsed % self.period == 0 && !ctx.command(self.step()) {
            self.active = false;
            return Status::Failed;
        }
        Status::Running
    }

    fn on_abort(&mut self, ctx: &mut TickContext) {
        if std::mem::take(&mut self.active) {
            ctx.safe_stop(Command::Stop);
            ctx.safe_stop(Command::StopSound);
        }
    }
}

// ============================================================================
// Face tracking
// ============================================================================

/// Angular rate that turns the robot toward the tracked face.
fn steer_rate(ctx: &TickContext, gain: f32) -> f32 {
    -gain * ctx.world.face_offset()
}

/// Keeps the tracked face centered, creeping forward while it is far away.
///
/// Never completes on its own; fails when the face is lost.
pub struct SteerTowardFace {
    pub gain: f32,
    pub speed: f32,
    /// Face area below which the robot also moves forward.
    pub near_area: f32,
    active: bool,
}

impl SteerTowardFace {
    pub const fn new(gain: f32, speed: f32, near_area: f32) -> Self {
        Self {
            gain,
            speed,
            near_area,
            active: false,
        }
    }
}

impl Action<TickContext> for SteerTowardFace {
    fn name(&self) -> &'static str {
        "steer_toward_face"
    }

    fn on_enter(&mut self, _ctx: &mut TickContext) {
        self.active = true;
    }

    fn on_tick(&mut self, ctx: &mut TickContext) -> Status {
        if !ctx.world.face_visible {
            self.active = false;
            ctx.command(Command::Stop);
            return Status::Failed;
        }

        let linear = if ctx.world.face_area_fraction < self.near_area {
            self.speed
        } else {
            0.0
        };
        let angular = steer_rate(ctx, self.gain);

        if ctx.command(Command::Drive { linear, angular }) {
            Status::Running
        } else {
            self.active = false;
            Status::Failed
        }
    }

    fn on_abort(&mut self, ctx: &mut TickContext) {
        if std::mem::take(&mut self.active) {
            ctx.safe_stop(Command::Stop);
        }
    }
}

/// Drives toward the tracked face until it fills `target_area` of the frame.
pub struct ApproachFace {
    pub target_area: f32,
    pub speed: f32,
    pub gain: f32,
    active: bool,
}

impl ApproachFace {
    pub const fn new(target_area: f32, speed: f32, gain: f32) -> Self {
        Self {
            target_area,
            speed,
            gain,
            active: false,
        }
    }
}

impl Action<TickContext> for ApproachFace {
    fn name(&self) -> &'static str {
        "approach_face"
    }

    fn on_enter(&mut self, _ctx: &mut TickContext) {
        self.active = true;
    }

    fn on_tick(&mut self, ctx: &mut TickContext) -> Status {
        if !ctx.world.face_visible {
            self.active = false;
            ctx.command(Command::Stop);
            return Status::Failed;
        }

        if ctx.world.face_area_fraction >= self.target_area {
            self.active = false;
            return Status::from_bool(ctx.command(Command::Stop));
        }

        let angular = steer_rate(ctx, self.gain);
        if ctx.command(Command::Drive {
            linear: self.speed,
            angular,
        }) {
            Status::Running
        } else {
            self.active = false;
            Status::Failed
        }
    }

    fn on_abort(&mut self, ctx: &mut TickContext) {
        if std::mem::take(&mut self.active) {
            ctx.safe_stop(Command::Stop);
        }
    }
}

/// Reverses until the face area drops to `clear_area`.
pub struct BackAway {
    pub speed: f32,
    pub clear_area: f32,
    active: bool,
}

impl BackAway {
    pub const fn new(speed: f32, clear_area: f32) -> Self {
        Self {
            speed,
            clear_area,
            active: false,
        }
    }
}

impl Action<TickContext> for BackAway {
    fn name(&self) -> &'static str {
        "back_away"
    }

    fn on_enter(&mut self, _ctx: &mut TickContext) {
        self.active = true;
    }

    fn on_tick(&mut self, ctx: &mut TickContext) -> Status {
        if ctx.world.face_area_fraction <= self.clear_area {
            self.active = false;
            return Status::from_bool(ctx.command(Command::Stop));
        }

        if ctx.command(Command::Drive {
            linear: -self.speed,
            angular: 0.0,
        }) {
            Status::Running
        } else {
            self.active = false;
            Status::Failed
        }
    }

    fn on_abort(&mut self, ctx: &mut TickContext) {
        if std::mem::take(&mut self.active) {
            ctx.safe_stop(Command::Stop);
        }
    }
}

/// Spins in place until a face shows up or the timeout expires.
pub struct SearchSpin {
    pub turn_rate: f32,
    pub timeout_ticks: u32,
    elapsed: u32,
    active: bool,
}

impl SearchSpin {
    pub const fn new(turn_rate: f32, timeout_ticks: u32) -> Self {
        Self {
            turn_rate,
            timeout_ticks,
            elapsed: 0,
            active: false,
        }
    }
}

impl Action<TickContext> for SearchSpin {
    fn name(&self) -> &'static str {
        "search_spin"
    }

    fn on_enter(&mut self, ctx: &mut TickContext) {
        self.elapsed = 0;
        self.active = ctx.command(Command::Drive {
            linear: 0.0,
            angular: self.turn_rate,
        });
    }

    fn on_tick(&mut self, ctx: &mut TickContext) -> Status {
        if !self.active {
            return Status::Failed;
        }

        self.elapsed += 1;
        let found = ctx.world.face_visible;
        if !found && self.elapsed < self.timeout_ticks {
            return Status::Running;
        }

        self.active = false;
        let stopped = ctx.command(Command::Stop);
        if found {
            Status::from_bool(stopped)
        } else {
            tracing::debug!("search gave up after {} ticks", self.elapsed);
            Status::Failed
        }
    }

    fn on_abort(&mut self, ctx: &mut TickContext) {
        if std::mem::take(&mut self.active) {
            ctx.safe_stop(Command::Stop);
        }
    }
}
