use tracing::trace;

use super::spring::{AnimationChannel, SpringSpec};

/// Longest frame gap fed to the springs; longer pauses (hidden tab) are clamped.
const MAX_FRAME_SECS: f64 = 0.1;

/// Values handed to the render boundary on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorFrame {
    /// Vertical offset of the indicator, in px.
    pub offset: f64,
    /// Rotation of the indicator, in degrees.
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Both channels at rest at zero.
    Idle,
    /// Following the finger.
    Tracking,
    /// Refresh in progress: the angle spins, the offset is held.
    Spinning,
    /// Returning to zero after a gesture or a refresh.
    Settling,
}

/// What the frame loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Values changed and will keep changing: publish and schedule another frame.
    Animating,
    /// Values reached their drag targets: publish, then wait for more input.
    Holding,
    /// The cycle is over and everything is back at zero.
    AtRest,
}

#[derive(Debug, Clone)]
pub struct AnimationDriver {
    offset: AnimationChannel,
    angle: AnimationChannel,
    spring: SpringSpec,
    spin_increment: f64,
    phase: Phase,
    last_frame_ms: Option<f64>,
}

impl AnimationDriver {
    pub fn new(spring: SpringSpec, spin_increment: f64) -> Self {
        Self {
            offset: AnimationChannel::default(),
            angle: AnimationChannel::default(),
            spring,
            spin_increment,
            phase: Phase::Idle,
            last_frame_ms: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn offset(&self) -> &AnimationChannel {
        &self.offset
    }

    pub fn angle(&self) -> &AnimationChannel {
        &self.angle
    }

    pub fn frame(&self) -> IndicatorFrame {
        IndicatorFrame {
            offset: self.offset.current(),
            angle: self.angle.current(),
        }
    }

    /// Retargets both channels to follow a drag.
    pub fn drag_to(&mut self, offset: f64, angle: f64) {
        if self.phase == Phase::Spinning {
            return;
        }
        self.phase = Phase::Tracking;
        self.offset.set_target(offset);
        self.angle.set_target(angle);
    }

    /// Enters the spin phase; the offset keeps heading for its drag-end target.
    pub fn begin_spin(&mut self) {
        self.phase = Phase::Spinning;
        self.angle.snap_to(self.angle.current());
    }

    /// Commands both channels back to zero.
    pub fn settle(&mut self) {
        if self.phase == Phase::Spinning {
            // Unwinding the accumulated spin would rotate backwards through every turn.
            let normalized = self.angle.current().rem_euclid(360.0);
            self.angle.snap_to(normalized);
        }
        self.phase = Phase::Settling;
        self.offset.set_target(0.0);
        self.angle.set_target(0.0);
    }

    /// Advances both channels to the frame at `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> FrameStatus {
        let dt = match self.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, MAX_FRAME_SECS),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        let status = match self.phase {
            Phase::Idle => FrameStatus::AtRest,
            Phase::Spinning => {
                self.offset.step(&self.spring, dt);
                self.angle.advance_by(self.spin_increment);
                FrameStatus::Animating
            }
            Phase::Tracking => {
                if self.step_channels(dt) {
                    FrameStatus::Animating
                } else {
                    FrameStatus::Holding
                }
            }
            Phase::Settling => {
                if self.step_channels(dt) {
                    FrameStatus::Animating
                } else {
                    self.reset();
                    FrameStatus::AtRest
                }
            }
        };

        if status != FrameStatus::Animating {
            self.last_frame_ms = None;
        }
        trace!(
            phase = ?self.phase,
            offset = self.offset.current(),
            angle = self.angle.current(),
            "animation tick"
        );
        status
    }

    pub fn reset(&mut self) {
        self.offset.snap_to(0.0);
        self.angle.snap_to(0.0);
        self.phase = Phase::Idle;
        self.last_frame_ms = None;
    }

    fn step_channels(&mut self, dt: f64) -> bool {
        // Not short-circuited: both channels must advance every frame.
        let offset_moving = self.offset.step(&self.spring, dt);
        let angle_moving = self.angle.step(&self.spring, dt);
        offset_moving || angle_moving
    }
}
