//! Pull-to-refresh for touch-scrolled containers.
//!
//! A [`GestureController`] tracks one touch on a scroll container. Pulling down
//! past the threshold while the container is at its top arms a refresh; letting
//! go runs the caller's refresh callback while the indicator spins, and the
//! indicator springs back once the shared [`RefreshState`] is cleared.
//!
//! The controller only talks to the page through the traits in [`surface`], so
//! it runs anywhere. [`dom::PullToRefresh`] binds it to two elements by id and
//! [`hooks::use_pull_to_refresh`] does the same from a yew component.

pub mod animation;
pub mod controller;
pub mod dom;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod options;
pub mod refresh;
pub mod state;
pub mod surface;

pub use animation::{FrameStatus, IndicatorFrame, SpringSpec};
pub use controller::{EventOutcome, GestureController, Release, Surfaces};
pub use dom::PullToRefresh;
pub use error::PullToRefreshError;
pub use hooks::use_pull_to_refresh;
pub use options::PullToRefreshOptions;
pub use refresh::{RefreshCallback, RefreshCoordinator, RefreshState, Subscription};
pub use state::{IgnoreReason, TouchPoint};
