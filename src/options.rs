//! Construction-time configuration of a pull-to-refresh surface.

use serde::{Deserialize, Serialize};

use crate::animation::SpringSpec;
use crate::error::{PullToRefreshError, Result};

pub const DEFAULT_SCROLL_AREA_ID: &str = "scroll-area";
pub const DEFAULT_PULL_TO_REFRESH_ID: &str = "pull-to-refresh";
pub const DEFAULT_THRESHOLD_DISTANCE: f64 = 200.0;
/// Degrees added to the indicator angle on every frame while refreshing.
pub const DEFAULT_SPIN_INCREMENT: f64 = 5.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullToRefreshOptions {
    /// Id of the scrollable container that receives touch events.
    pub scroll_area_id: String,
    /// Id of the indicator element that receives `--offset` / `--angle`.
    pub pull_to_refresh_id: String,
    /// Minimum downward drag needed to arm a refresh.
    pub threshold_distance: f64,
    /// Published offset per unit of (clamped) drag distance.
    pub offset_scale: f64,
    /// Published angle in degrees per unit of (clamped) drag distance.
    pub angle_scale: f64,
    pub spin_increment: f64,
    pub spring: SpringSpec,
}

impl Default for PullToRefreshOptions {
    fn default() -> Self {
        Self {
            scroll_area_id: DEFAULT_SCROLL_AREA_ID.to_string(),
            pull_to_refresh_id: DEFAULT_PULL_TO_REFRESH_ID.to_string(),
            threshold_distance: DEFAULT_THRESHOLD_DISTANCE,
            offset_scale: 0.5,
            angle_scale: 1.0,
            spin_increment: DEFAULT_SPIN_INCREMENT,
            spring: SpringSpec::default(),
        }
    }
}

impl PullToRefreshOptions {
    pub fn with_threshold(mut self, threshold_distance: f64) -> Self {
        self.threshold_distance = threshold_distance;
        self
    }

    pub fn with_ids(mut self, scroll_area_id: &str, pull_to_refresh_id: &str) -> Self {
        self.scroll_area_id = scroll_area_id.to_string();
        self.pull_to_refresh_id = pull_to_refresh_id.to_string();
        self
    }

    /// Parses options from JSON; missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(raw)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PullToRefreshError::InvalidOptions(msg));
        if self.scroll_area_id.is_empty() || self.pull_to_refresh_id.is_empty() {
            return invalid("element ids must not be empty".into());
        }
        if !self.threshold_distance.is_finite() || self.threshold_distance <= 0.0 {
            return invalid(format!(
                "threshold_distance must be positive, got {}",
                self.threshold_distance
            ));
        }
        for (name, value) in [
            ("offset_scale", self.offset_scale),
            ("angle_scale", self.angle_scale),
            ("spin_increment", self.spin_increment),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be finite and >= 0, got {value}"));
            }
        }
        if !(self.spring.stiffness > 0.0) || !(self.spring.damping_ratio > 0.0) {
            return invalid("spring stiffness and damping_ratio must be positive".into());
        }
        Ok(())
    }
}
