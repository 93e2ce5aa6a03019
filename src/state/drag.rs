use super::IgnoreReason;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    pub distance: f64,
    pub should_refresh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    Tracked(DragState),
    Ignored(IgnoreReason),
}

/// Channel targets for a drag, already clamped to the threshold and scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTargets {
    pub offset: f64,
    pub angle: f64,
}

/// Turns finger travel into a refresh decision and indicator targets.
#[derive(Debug, Clone)]
pub struct DragEvaluator {
    threshold_distance: f64,
    offset_scale: f64,
    angle_scale: f64,
    state: DragState,
}

impl DragEvaluator {
    pub fn new(threshold_distance: f64, offset_scale: f64, angle_scale: f64) -> Self {
        Self {
            threshold_distance,
            offset_scale,
            angle_scale,
            state: DragState::default(),
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn should_refresh(&self) -> bool {
        self.state.should_refresh
    }

    /// Evaluates one move of the tracked touch.
    ///
    /// Moves while the container is scrolled, or above the start point, leave
    /// the previous decision untouched.
    pub fn evaluate(&mut self, start_y: f64, screen_y: f64, scroll_top: f64) -> DragOutcome {
        if scroll_top != 0.0 {
            return DragOutcome::Ignored(IgnoreReason::NotAtTop);
        }
        let distance = screen_y - start_y;
        if distance < 0.0 {
            return DragOutcome::Ignored(IgnoreReason::UpwardSwipe);
        }
        self.state = DragState {
            distance,
            should_refresh: distance >= self.threshold_distance,
        };
        DragOutcome::Tracked(self.state)
    }

    pub fn targets(&self) -> DragTargets {
        let travel = self.state.distance.min(self.threshold_distance);
        DragTargets {
            offset: travel * self.offset_scale,
            angle: travel * self.angle_scale,
        }
    }

    /// Returns the decision for the finished gesture and clears it.
    pub fn take_decision(&mut self) -> bool {
        std::mem::take(&mut self.state).should_refresh
    }

    pub fn reset(&mut self) {
        self.state = DragState::default();
    }
}
