//! The seams between the gesture controller and whatever renders it.
//!
//! The browser binding in [`crate::dom`] implements these over `web-sys`;
//! tests implement them in memory.

use crate::animation::IndicatorFrame;

/// The scrollable element the gesture is attached to.
pub trait ScrollContainer {
    /// Current vertical scroll offset; 0 means scrolled to the top.
    fn scroll_top(&self) -> f64;
    /// Suppresses (or restores) vertical scrolling while a pull is in progress.
    fn set_scroll_locked(&self, locked: bool);
}

/// Receives the indicator values every frame.
pub trait IndicatorSink {
    fn publish(&self, frame: IndicatorFrame);
    /// Removes any published values once the indicator is back at rest.
    fn clear(&self);
}

/// Schedules one call to the controller's tick before the next render.
///
/// Repeated requests before that frame runs must collapse into one.
pub trait FrameScheduler {
    fn request_frame(&self);
}
