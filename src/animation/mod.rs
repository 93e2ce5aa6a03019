//! Spring-driven indicator animation.
//!
//! Two independent channels (offset and angle) spring toward their targets on
//! every frame. While a refresh is running the angle instead spins by a fixed
//! increment per frame.

pub mod driver;
pub mod spring;

pub use driver::{AnimationDriver, FrameStatus, IndicatorFrame, Phase};
pub use spring::{AnimationChannel, SpringSpec};
