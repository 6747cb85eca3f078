//! Shot physics profile and the tuning file that carries it

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calibration::CalibratorSettings;
use crate::constants::*;
use crate::launcher::LauncherConfig;

/// Physical constants shared by the simulator, calibrator and launcher.
/// Read-only at runtime; a reload replaces the whole value.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotProfile {
    /// Impulse gained per swipe centimetre
    pub impulse_per_unit_distance: f32,
    /// Extra impulse per swipe speed (cm/s)
    pub impulse_per_unit_speed: f32,
    pub max_impulse: f32,
    pub horizontal_influence: f32,
    pub vertical_influence: f32,
    pub forward_bias: f32,
    pub gravity_multiplier: f32,
    pub air_drag: f32,
    pub apply_spin: bool,
    pub backspin_coeff: f32,
    pub sidespin_coeff: f32,
    pub max_angular_speed: f32,
    /// Scene units per metre (hoop at y=30 instead of 3.05 → ~10)
    pub scene_scale: f32,
}

impl Default for ShotProfile {
    fn default() -> Self {
        Self {
            impulse_per_unit_distance: IMPULSE_PER_CM,
            impulse_per_unit_speed: IMPULSE_PER_CM_PER_SEC,
            max_impulse: MAX_IMPULSE,
            horizontal_influence: HORIZONTAL_INFLUENCE,
            vertical_influence: VERTICAL_INFLUENCE,
            forward_bias: FORWARD_BIAS,
            gravity_multiplier: GRAVITY_MULTIPLIER,
            air_drag: AIR_DRAG,
            apply_spin: true,
            backspin_coeff: BACKSPIN_PER_IMPULSE,
            sidespin_coeff: SIDESPIN_PER_IMPULSE,
            max_angular_speed: MAX_ANGULAR_SPEED,
            scene_scale: 1.0,
        }
    }
}

impl ShotProfile {
    /// Effective gravity acceleration during flight
    pub fn gravity(&self) -> Vec3 {
        Vec3::NEG_Y * self.gravity_magnitude()
    }

    pub fn gravity_magnitude(&self) -> f32 {
        STANDARD_GRAVITY * self.scene_scale.max(0.01) * self.gravity_multiplier.max(0.01)
    }

    /// Linear drag coefficient, never negative
    pub fn drag(&self) -> f32 {
        self.air_drag.max(0.0)
    }

    /// Max impulse floored so fractions never divide by zero
    pub fn impulse_cap(&self) -> f32 {
        self.max_impulse.max(0.01)
    }

    /// Impulse for a swipe of `cm` centimetres lasting `duration` seconds, capped at max
    pub fn impulse_for_swipe(&self, cm: f32, duration: f32) -> f32 {
        let duration = duration.max(MIN_SWIPE_DURATION);
        let speed_cm_per_sec = cm / duration;
        (cm * self.impulse_per_unit_distance + speed_cm_per_sec * self.impulse_per_unit_speed)
            .min(self.impulse_cap())
    }
}

/// Spatial tolerances converted into power bands by the calibrator
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceParams {
    pub hoop_radius: f32,
    pub ball_radius: f32,
    pub entry_y_offset: f32,
    pub perfect_slack: f32,
    pub make_slack: f32,
    pub backboard_extra: f32,
    pub backboard_width: f32,
}

impl Default for ToleranceParams {
    fn default() -> Self {
        Self {
            hoop_radius: HOOP_RADIUS,
            ball_radius: BALL_RADIUS,
            entry_y_offset: ENTRY_Y_OFFSET,
            perfect_slack: PERFECT_HORIZ_SLACK,
            make_slack: MAKE_HORIZ_SLACK,
            backboard_extra: BACKBOARD_EXTRA,
            backboard_width: BACKBOARD_BAND_WIDTH,
        }
    }
}

impl ToleranceParams {
    /// Landing error allowed for a clean swish
    pub fn perfect_tolerance(&self) -> f32 {
        ((self.hoop_radius - self.ball_radius) + self.perfect_slack).max(MIN_PERFECT_TOLERANCE)
    }

    /// Landing error allowed for any make; never tighter than perfect
    pub fn make_tolerance(&self) -> f32 {
        self.perfect_tolerance()
            .max(self.hoop_radius + self.make_slack)
    }

    /// Overshoot at which the ball starts finding the backboard
    pub fn backboard_tolerance(&self) -> f32 {
        self.hoop_radius + self.backboard_extra
    }
}

/// Everything loaded from the shot tuning file
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotTuning {
    pub profile: ShotProfile,
    pub tolerances: ToleranceParams,
    pub calibrator: CalibratorSettings,
    pub launcher: LauncherConfig,
}

impl ShotTuning {
    /// Load from the default path, or return defaults if missing/invalid
    pub fn load() -> Self {
        match load_shot_tuning_from_file(SHOT_TUNING_FILE) {
            Ok(tuning) => {
                info!("Loaded shot tuning from {}", SHOT_TUNING_FILE);
                tuning
            }
            Err(err) => {
                warn!("{}, using defaults", err);
                Self::default()
            }
        }
    }
}

pub fn load_shot_tuning_from_file(path: &str) -> Result<ShotTuning, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    parse_shot_tuning(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
}

pub fn parse_shot_tuning(contents: &str) -> Result<ShotTuning, serde_json::Error> {
    serde_json::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tuning = parse_shot_tuning(r#"{ "profile": { "max_impulse": 40.0 } }"#).unwrap();
        assert_eq!(tuning.profile.max_impulse, 40.0);
        assert_eq!(tuning.profile.forward_bias, FORWARD_BIAS);
        assert_eq!(tuning.tolerances, ToleranceParams::default());
    }

    #[test]
    fn test_shipped_tuning_matches_defaults() {
        let tuning = parse_shot_tuning(include_str!("../config/shot_tuning.json")).unwrap();
        assert_eq!(tuning.profile, ShotProfile::default());
        assert_eq!(tuning.tolerances, ToleranceParams::default());
        assert_eq!(tuning.launcher, LauncherConfig::default());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = load_shot_tuning_from_file("does/not/exist.json").unwrap_err();
        assert!(err.starts_with("Failed to read"), "unexpected message: {}", err);
    }

    #[test]
    fn test_tolerances_are_nested() {
        let tol = ToleranceParams::default();
        assert!(tol.perfect_tolerance() <= tol.make_tolerance());
        assert!(tol.make_tolerance() < tol.backboard_tolerance());

        // Ball wider than hoop still yields a usable perfect tolerance
        let tight = ToleranceParams {
            ball_radius: 1.0,
            perfect_slack: 0.0,
            ..default()
        };
        assert_eq!(tight.perfect_tolerance(), MIN_PERFECT_TOLERANCE);
    }

    #[test]
    fn test_swipe_impulse_capped() {
        let profile = ShotProfile {
            max_impulse: 40.0,
            ..default()
        };
        assert_eq!(profile.impulse_for_swipe(100.0, 0.1), 40.0);
        let small = profile.impulse_for_swipe(1.0, 0.5);
        assert!((small - (6.5 + 2.0 * 0.03)).abs() < 1e-4, "got {}", small);
    }
}
