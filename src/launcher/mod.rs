//! Ball launcher
//!
//! Turns swipes (player) or fraction requests (opponent) into launch commands,
//! with snap-assist toward the calibrated Perfect band.

mod controller;
mod gesture;
mod state;

pub use controller::{
    AimPreview, AimZone, LaunchCommand, LaunchContext, LaunchController, LaunchRequest,
    PendingLaunch,
};
pub use gesture::{
    ScreenMetrics, Swipe, SwipeMetrics, SwipeRejection, launch_direction, yawed_direction,
};
pub use state::LaunchState;

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Gesture limits, cooldown and snap-assist settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub min_swipe_cm: f32,
    pub max_angle_from_up_deg: f32,
    /// Seconds after a launch before the next one is accepted
    pub cooldown: f32,
    pub max_yaw_from_swipe_deg: f32,
    pub snap_to_perfect: bool,
    /// Fraction of the bar either side of Perfect that still snaps
    pub snap_pad: f32,
    /// Lateral fraction allowed on a snapped shot
    pub max_lateral_in_perfect: f32,
    pub screen: ScreenMetrics,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            min_swipe_cm: MIN_SWIPE_CM,
            max_angle_from_up_deg: MAX_ANGLE_FROM_UP_DEG,
            cooldown: LAUNCH_COOLDOWN,
            max_yaw_from_swipe_deg: MAX_YAW_FROM_SWIPE_DEG,
            snap_to_perfect: true,
            snap_pad: SNAP_PAD,
            max_lateral_in_perfect: MAX_LATERAL_IN_PERFECT,
            screen: ScreenMetrics::default(),
        }
    }
}
