pub mod drag;
pub mod touch;

pub use drag::{DragEvaluator, DragOutcome, DragState, DragTargets};
pub use touch::{TouchPoint, TouchTracker};

/// Why a touch event was dropped without changing any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The event carried no touch contacts.
    NoTouch,
    /// Another touch is already being tracked.
    SessionActive,
    /// A previous pull is still refreshing.
    RefreshInProgress,
    /// None of the contacts is the tracked touch.
    UnknownTouch,
    /// The container is scrolled away from its top.
    NotAtTop,
    /// The finger moved above its starting point.
    UpwardSwipe,
}
