use std::rc::Rc;

use tracing::{debug, trace};

use crate::animation::{AnimationDriver, FrameStatus, IndicatorFrame};
use crate::error::Result;
use crate::options::PullToRefreshOptions;
use crate::refresh::{RefreshCoordinator, RefreshState};
use crate::state::{DragEvaluator, DragOutcome, DragState, IgnoreReason, TouchPoint, TouchTracker};
use crate::surface::{FrameScheduler, IndicatorSink, ScrollContainer};

/// The collaborators a controller drives.
#[derive(Clone)]
pub struct Surfaces {
    pub container: Rc<dyn ScrollContainer>,
    pub indicator: Rc<dyn IndicatorSink>,
    pub scheduler: Rc<dyn FrameScheduler>,
}

/// How a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The pull was too short; the indicator springs back.
    Settle,
    /// The pull was armed; the refresh callback has been invoked.
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventOutcome {
    Started,
    Dragged(DragState),
    Released(Release),
    Ignored(IgnoreReason),
}

/// Pull-to-refresh state machine for one scroll container.
pub struct GestureController {
    tracker: TouchTracker,
    drag: DragEvaluator,
    driver: AnimationDriver,
    coordinator: RefreshCoordinator,
    surfaces: Surfaces,
}

impl GestureController {
    pub fn new(
        options: &PullToRefreshOptions,
        surfaces: Surfaces,
        coordinator: RefreshCoordinator,
    ) -> Result<Self> {
        options.validate()?;
        let mut controller = Self {
            tracker: TouchTracker::default(),
            drag: DragEvaluator::new(
                options.threshold_distance,
                options.offset_scale,
                options.angle_scale,
            ),
            driver: AnimationDriver::new(options.spring, options.spin_increment),
            coordinator,
            surfaces,
        };
        // A refresh still running on the shared state keeps spinning here.
        if controller
            .coordinator
            .adopt(controller.surfaces.scheduler.clone())
        {
            controller.driver.begin_spin();
            controller.surfaces.scheduler.request_frame();
        }
        Ok(controller)
    }

    /// Undoes everything published to the page: unlocks scrolling and clears
    /// the indicator. The refresh state itself is left to its owner.
    pub fn detach(&mut self) {
        self.tracker.touch_id = None;
        self.drag.reset();
        self.driver.reset();
        self.surfaces.container.set_scroll_locked(false);
        self.surfaces.indicator.clear();
        debug!("gesture detached");
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.coordinator.state().clone()
    }

    pub fn tracker(&self) -> &TouchTracker {
        &self.tracker
    }

    pub fn drag(&self) -> &DragEvaluator {
        &self.drag
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn frame(&self) -> IndicatorFrame {
        self.driver.frame()
    }

    /// `touches` are the contacts that just went down; the first one is tracked.
    pub fn on_touch_start(&mut self, touches: &[TouchPoint]) -> EventOutcome {
        let outcome = self.start(touches);
        log_outcome("touchstart", &outcome);
        outcome
    }

    pub fn on_touch_move(&mut self, touches: &[TouchPoint]) -> EventOutcome {
        let outcome = self.drag_to(touches);
        log_outcome("touchmove", &outcome);
        outcome
    }

    pub fn on_touch_end(&mut self, touches: &[TouchPoint]) -> EventOutcome {
        let outcome = self.release(touches);
        log_outcome("touchend", &outcome);
        outcome
    }

    /// Resolved exactly like a touch end, with the decision made so far.
    pub fn on_touch_cancel(&mut self, touches: &[TouchPoint]) -> EventOutcome {
        let outcome = self.release(touches);
        log_outcome("touchcancel", &outcome);
        outcome
    }

    /// Advances the animation to `now_ms` and publishes the result.
    pub fn tick(&mut self, now_ms: f64) -> FrameStatus {
        if self.coordinator.take_completion() {
            self.driver.settle();
        }
        let status = self.driver.tick(now_ms);
        match status {
            FrameStatus::Animating => {
                self.surfaces.indicator.publish(self.driver.frame());
                self.surfaces.scheduler.request_frame();
            }
            FrameStatus::Holding => self.surfaces.indicator.publish(self.driver.frame()),
            FrameStatus::AtRest => self.surfaces.indicator.clear(),
        }
        status
    }

    fn start(&mut self, touches: &[TouchPoint]) -> EventOutcome {
        if self.coordinator.is_active() {
            return EventOutcome::Ignored(IgnoreReason::RefreshInProgress);
        }
        let Some(touch) = touches.first() else {
            return EventOutcome::Ignored(IgnoreReason::NoTouch);
        };
        let scroll_top = self.surfaces.container.scroll_top();
        if !self.tracker.begin(touch, scroll_top) {
            return EventOutcome::Ignored(IgnoreReason::SessionActive);
        }
        self.drag.reset();
        EventOutcome::Started
    }

    fn drag_to(&mut self, touches: &[TouchPoint]) -> EventOutcome {
        let Some(touch) = self.tracker.find(touches) else {
            return EventOutcome::Ignored(IgnoreReason::UnknownTouch);
        };
        let scroll_top = self.surfaces.container.scroll_top();
        match self.drag.evaluate(self.tracker.start_y, touch.screen_y, scroll_top) {
            DragOutcome::Ignored(reason) => EventOutcome::Ignored(reason),
            DragOutcome::Tracked(state) => {
                self.surfaces.container.set_scroll_locked(true);
                let targets = self.drag.targets();
                self.driver.drag_to(targets.offset, targets.angle);
                self.surfaces.scheduler.request_frame();
                EventOutcome::Dragged(state)
            }
        }
    }

    fn release(&mut self, touches: &[TouchPoint]) -> EventOutcome {
        if !self.tracker.release(touches) {
            return EventOutcome::Ignored(IgnoreReason::UnknownTouch);
        }
        self.surfaces.container.set_scroll_locked(false);
        let release = if self.drag.take_decision() {
            self.driver.begin_spin();
            self.coordinator.begin(self.surfaces.scheduler.clone());
            Release::Refresh
        } else {
            self.driver.settle();
            Release::Settle
        };
        self.surfaces.scheduler.request_frame();
        EventOutcome::Released(release)
    }
}

fn log_outcome(event: &str, outcome: &EventOutcome) {
    match outcome {
        EventOutcome::Ignored(reason) => trace!(event, ?reason, "touch event ignored"),
        EventOutcome::Dragged(state) => {
            trace!(event, distance = state.distance, armed = state.should_refresh, "drag")
        }
        EventOutcome::Started => debug!(event, "gesture started"),
        EventOutcome::Released(release) => debug!(event, ?release, "gesture released"),
    }
}
