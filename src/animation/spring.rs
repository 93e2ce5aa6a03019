use serde::{Deserialize, Serialize};

/// Fixed integration step, roughly one frame at 60fps.
const TIMESTEP: f64 = 0.016;

/// Spring configuration for an [`AnimationChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringSpec {
    /// Fraction of critical damping; below 1 the channel overshoots its target.
    pub damping_ratio: f64,
    /// Pull toward the target per unit of displacement; sqrt gives the natural frequency in rad/s.
    pub stiffness: f64,
    /// Distance from target below which the channel may come to rest.
    pub position_threshold: f64,
    /// Speed below which the channel may come to rest.
    pub velocity_threshold: f64,
}

impl SpringSpec {
    /// Critically damped, settles in about half a second from a full pull.
    pub fn default_spring() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 400.0,
            position_threshold: 0.05,
            velocity_threshold: 0.05,
        }
    }

    /// Slightly bouncy variant for indicators that should overshoot.
    pub fn bouncy() -> Self {
        Self {
            damping_ratio: 0.6,
            ..Self::default_spring()
        }
    }

    fn damping(&self) -> f64 {
        2.0 * self.damping_ratio * self.stiffness.sqrt()
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// A scalar that springs toward a target instead of jumping to it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationChannel {
    current: f64,
    target: f64,
    velocity: f64,
}

impl AnimationChannel {
    pub fn new(value: f64) -> Self {
        Self {
            current: value,
            target: value,
            velocity: 0.0,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Jumps straight to `value` and stops all motion.
    pub fn snap_to(&mut self, value: f64) {
        self.current = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Moves the value by a fixed amount, bypassing the spring.
    pub fn advance_by(&mut self, delta: f64) {
        self.current += delta;
        self.target = self.current;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target && self.velocity == 0.0
    }

    /// Integrates the spring over `dt` seconds. Returns `true` while still moving.
    pub fn step(&mut self, spec: &SpringSpec, dt: f64) -> bool {
        if self.is_settled() {
            return false;
        }

        // Semi-implicit Euler in fixed substeps keeps stiff springs stable.
        let damping = spec.damping();
        let mut elapsed = 0.0;
        while elapsed < dt {
            let step = TIMESTEP.min(dt - elapsed);
            let displacement = self.current - self.target;
            let force = -spec.stiffness * displacement - damping * self.velocity;
            self.velocity += force * step;
            self.current += self.velocity * step;
            elapsed += step;
        }

        let near_target = (self.current - self.target).abs() < spec.position_threshold;
        let at_rest = self.velocity.abs() < spec.velocity_threshold;
        if near_target && at_rest {
            self.snap_to(self.target);
            false
        } else {
            true
        }
    }
}
