//! Swipe measurement and launch direction

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::LauncherConfig;
use crate::constants::*;
use crate::geometry::CameraBasis;
use crate::tuning::ShotProfile;

/// Physical screen used to turn pixels into centimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenMetrics {
    pub width: f32,
    pub height: f32,
    pub dpi: f32,
}

impl Default for ScreenMetrics {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            dpi: DEFAULT_SCREEN_DPI,
        }
    }
}

impl ScreenMetrics {
    /// Reported DPI is unreliable on some devices; keep it in a sane window
    pub fn clamped_dpi(&self) -> f32 {
        self.dpi.clamp(SCREEN_DPI_MIN, SCREEN_DPI_MAX)
    }

    pub fn pixels_to_cm(&self, pixels: f32) -> f32 {
        pixels / self.clamped_dpi() * CM_PER_INCH
    }
}

/// A finished drag in screen pixels (y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swipe {
    pub start: Vec2,
    pub end: Vec2,
    /// Seconds between press and release
    pub duration: f32,
}

/// Why a release did not launch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeRejection {
    /// Release without a matching press
    NotAiming,
    /// Zero-length drag
    Degenerate,
    TooShort { cm: f32 },
    TooSideways { angle_deg: f32 },
}

impl SwipeRejection {
    pub fn reason(&self) -> String {
        match self {
            SwipeRejection::NotAiming => "not aiming".to_string(),
            SwipeRejection::Degenerate => "empty swipe".to_string(),
            SwipeRejection::TooShort { cm } => format!("swipe too short ({:.2} cm)", cm),
            SwipeRejection::TooSideways { angle_deg } => {
                format!("swipe too far from vertical ({:.1}°)", angle_deg)
            }
        }
    }
}

/// Measured swipe ready to become a launch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeMetrics {
    pub cm: f32,
    pub duration: f32,
    /// Horizontal screen delta over half the screen width, in [-1, 1]
    pub lateral: f32,
    /// Vertical screen delta over half the screen height, in [-1, 1]
    pub vertical: f32,
}

impl Swipe {
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    /// Angle between the swipe and straight up, in degrees
    pub fn angle_from_up_deg(&self) -> f32 {
        self.delta().angle_to(Vec2::Y).abs().to_degrees()
    }

    pub fn measure(&self, screen: &ScreenMetrics) -> SwipeMetrics {
        let delta = self.delta();
        SwipeMetrics {
            cm: screen.pixels_to_cm(delta.length()),
            duration: self.duration.max(MIN_SWIPE_DURATION),
            lateral: (delta.x / (screen.width.max(1.0) * 0.5)).clamp(-1.0, 1.0),
            vertical: (delta.y / (screen.height.max(1.0) * 0.5)).clamp(-1.0, 1.0),
        }
    }

    /// Measure and check against the minimum length and maximum angle from vertical
    pub fn validate(&self, config: &LauncherConfig) -> Result<SwipeMetrics, SwipeRejection> {
        if self.delta().length_squared() <= f32::EPSILON {
            return Err(SwipeRejection::Degenerate);
        }
        let metrics = self.measure(&config.screen);
        if metrics.cm < config.min_swipe_cm {
            return Err(SwipeRejection::TooShort { cm: metrics.cm });
        }
        let angle_deg = self.angle_from_up_deg();
        if angle_deg > config.max_angle_from_up_deg {
            return Err(SwipeRejection::TooSideways { angle_deg });
        }
        Ok(metrics)
    }
}

/// World direction for a swipe: camera axes weighted by the profile.
/// The sideways component is limited to `max_yaw_deg` off the forward axis.
pub fn launch_direction(
    basis: &CameraBasis,
    profile: &ShotProfile,
    lateral: f32,
    vertical: f32,
    max_yaw_deg: f32,
) -> Vec3 {
    let forward = profile.forward_bias.max(DIRECTION_WEIGHT_FLOOR);
    let up = vertical * profile.vertical_influence.max(DIRECTION_WEIGHT_FLOOR);
    let max_side = forward * max_yaw_deg.clamp(0.0, 89.0).to_radians().tan();
    let side = (lateral * profile.horizontal_influence).clamp(-max_side, max_side);
    basis.blend(side, up, forward).normalize_or(basis.forward)
}

/// World direction for a programmatic shot: `lateral` of ±1 yaws the full
/// `max_yaw_deg` off the forward axis, linearly in between.
pub fn yawed_direction(
    basis: &CameraBasis,
    profile: &ShotProfile,
    lateral: f32,
    max_yaw_deg: f32,
) -> Vec3 {
    let forward = profile.forward_bias.max(DIRECTION_WEIGHT_FLOOR);
    let up = profile.vertical_influence.max(DIRECTION_WEIGHT_FLOOR);
    let yaw = lateral.clamp(-1.0, 1.0) * max_yaw_deg.clamp(0.0, 89.0).to_radians();
    basis.blend(forward * yaw.tan(), up, forward).normalize_or(basis.forward)
}
