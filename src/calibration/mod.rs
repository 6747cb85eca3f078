//! Power-band calibration
//!
//! Converts spatial tolerances at the hoop into three nested fractions of the
//! power bar (Perfect ⊆ Make, Backboard on the overshoot side) for one shot
//! geometry. Three strategies are tried in order:
//! - runtime: bisection on the simulated landing error, then slope scaling
//! - sampling: classify a sweep of impulses against hoop volumes (opt-in)
//! - analytic: drag-free closed form over a sweep of launch angles

mod analytic;
mod range;
mod runtime;
mod sampling;

pub use analytic::{calibrate_analytic, drag_free_speed};
pub use range::Range01;
pub use runtime::{calibrate_runtime, canonical_direction, estimate_slope, find_center_impulse};
pub use sampling::calibrate_sampling;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::geometry::ShotGeometry;
use crate::trajectory::Approach;
use crate::tuning::{ShotProfile, ToleranceParams};

/// Which strategy produced a set of bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CalibrationStrategy {
    Runtime,
    Sampling,
    Analytic,
    /// Nothing worked; all bands invalid
    #[default]
    None,
}

/// Calibrator knobs, loaded with the shot tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibratorSettings {
    pub use_runtime: bool,
    pub use_sampling: bool,
    pub use_analytic: bool,
    pub dt: f32,
    pub max_time: f32,
    pub bisect_iterations: u32,
    pub sampling_count: u32,
    pub sampling_dt: f32,
    pub sampling_max_time: f32,
    pub analytic_angle_min_deg: f32,
    pub analytic_angle_max_deg: f32,
    pub analytic_angle_samples: u32,
    pub perfect_min_width: f32,
    pub make_min_width: f32,
    pub backboard_min_width: f32,
}

impl Default for CalibratorSettings {
    fn default() -> Self {
        Self {
            use_runtime: true,
            use_sampling: false,
            use_analytic: true,
            dt: CAL_DT,
            max_time: CAL_MAX_TIME,
            bisect_iterations: CAL_BISECT_ITERATIONS,
            sampling_count: SAMPLING_COUNT,
            sampling_dt: SAMPLING_DT,
            sampling_max_time: SAMPLING_MAX_TIME,
            analytic_angle_min_deg: ANALYTIC_ANGLE_MIN_DEG,
            analytic_angle_max_deg: ANALYTIC_ANGLE_MAX_DEG,
            analytic_angle_samples: ANALYTIC_ANGLE_SAMPLES,
            perfect_min_width: PERFECT_MIN_WIDTH,
            make_min_width: MAKE_MIN_WIDTH,
            backboard_min_width: BACKBOARD_MIN_WIDTH,
        }
    }
}

/// The three bands for one geometry, replaced as a unit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationResult {
    pub perfect: Range01,
    pub make: Range01,
    pub backboard: Range01,
    pub strategy: CalibrationStrategy,
}

impl CalibrationResult {
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn any_valid(&self) -> bool {
        self.perfect.valid || self.make.valid || self.backboard.valid
    }

    /// Apply minimum widths, then nest Make around Perfect and keep Backboard
    /// from starting below the Make midpoint.
    pub(crate) fn finalize(
        perfect: Range01,
        make: Range01,
        backboard: Range01,
        strategy: CalibrationStrategy,
        settings: &CalibratorSettings,
    ) -> Self {
        let perfect = perfect.with_min_width(settings.perfect_min_width);
        let make = make.with_min_width(settings.make_min_width).union(perfect);
        let mut backboard = backboard.with_min_width(settings.backboard_min_width);
        if make.valid {
            backboard = backboard.starting_at_least(make.mid());
        }
        Self {
            perfect,
            make,
            backboard,
            strategy,
        }
    }
}

/// Bands currently driving snap-assist, the opponent and the power-bar UI
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CalibratedBands(pub CalibrationResult);

/// Geometry being calibrated; `dirty` is set whenever it or the tuning changes
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveShot {
    pub geometry: Option<ShotGeometry>,
    pub dirty: bool,
}

impl ActiveShot {
    pub fn set_geometry(&mut self, geometry: ShotGeometry) {
        self.geometry = Some(geometry);
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

/// Runs the calibration strategies in order until one yields a band
#[derive(Debug, Clone, Default)]
pub struct PowerCalibrator {
    pub settings: CalibratorSettings,
}

impl PowerCalibrator {
    pub fn new(settings: CalibratorSettings) -> Self {
        Self { settings }
    }

    pub fn calibrate(
        &self,
        geometry: &ShotGeometry,
        profile: &ShotProfile,
        tolerances: &ToleranceParams,
    ) -> CalibrationResult {
        if Approach::from_geometry(geometry).is_none() {
            debug!("Shot origin is directly under the hoop, no bands");
            return CalibrationResult::invalid();
        }

        let settings = &self.settings;
        if settings.use_runtime {
            if let Some(result) = calibrate_runtime(geometry, profile, tolerances, settings) {
                if result.any_valid() {
                    return result;
                }
            }
        }
        if settings.use_sampling {
            if let Some(result) = calibrate_sampling(geometry, profile, tolerances, settings) {
                if result.any_valid() {
                    return result;
                }
            }
        }
        if settings.use_analytic {
            if let Some(result) = calibrate_analytic(geometry, profile, tolerances, settings) {
                if result.any_valid() {
                    return result;
                }
            }
        }

        debug!("No calibration strategy produced a band");
        CalibrationResult::invalid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_profile() -> ShotProfile {
        ShotProfile {
            max_impulse: 40.0,
            gravity_multiplier: 3.0,
            air_drag: 0.1,
            ..default()
        }
    }

    fn scenario_geometry() -> ShotGeometry {
        ShotGeometry::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 5.0))
    }

    #[test]
    fn test_bands_nested_for_reachable_hoop() {
        let result = PowerCalibrator::default().calibrate(
            &scenario_geometry(),
            &scenario_profile(),
            &ToleranceParams::default(),
        );
        assert_eq!(result.strategy, CalibrationStrategy::Runtime);
        let CalibrationResult {
            perfect,
            make,
            backboard,
            ..
        } = result;
        assert!(perfect.valid && make.valid && backboard.valid);
        assert!(perfect.min > 0.0 && perfect.max < 1.0, "perfect {:?}", perfect);
        assert!(make.encloses(&perfect), "make {:?} perfect {:?}", make, perfect);
        assert!(backboard.mid() >= make.mid());
        assert!(perfect.width() >= PERFECT_MIN_WIDTH - 1e-5);
        assert!(make.width() >= MAKE_MIN_WIDTH - 1e-5);
    }

    #[test]
    fn test_calibration_is_repeatable() {
        let calibrator = PowerCalibrator::default();
        let a = calibrator.calibrate(
            &scenario_geometry(),
            &scenario_profile(),
            &ToleranceParams::default(),
        );
        let b = calibrator.calibrate(
            &scenario_geometry(),
            &scenario_profile(),
            &ToleranceParams::default(),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_unreachable_hoop_has_no_bands() {
        let weak = ShotProfile {
            max_impulse: 2.0,
            ..default()
        };
        let settings = CalibratorSettings {
            use_analytic: false,
            ..default()
        };
        let result = PowerCalibrator::new(settings).calibrate(
            &scenario_geometry(),
            &weak,
            &ToleranceParams::default(),
        );
        assert!(!result.any_valid());
        assert_eq!(result.strategy, CalibrationStrategy::None);
    }

    #[test]
    fn test_degenerate_geometry_has_no_bands() {
        let above = ShotGeometry::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.01));
        let result = PowerCalibrator::default().calibrate(
            &above,
            &ShotProfile::default(),
            &ToleranceParams::default(),
        );
        assert!(!result.any_valid());
    }

    #[test]
    fn test_falls_back_to_analytic() {
        let settings = CalibratorSettings {
            use_runtime: false,
            ..default()
        };
        let result = PowerCalibrator::new(settings).calibrate(
            &scenario_geometry(),
            &scenario_profile(),
            &ToleranceParams::default(),
        );
        assert_eq!(result.strategy, CalibrationStrategy::Analytic);
        assert!(result.perfect.valid);
        assert!(result.make.encloses(&result.perfect));
    }

    #[test]
    fn test_perfect_centre_matches_drag_free_solution() {
        // Flat shot without drag: v² = g·d / sin 2θ at the launcher's own elevation
        let profile = ShotProfile {
            air_drag: 0.0,
            ..default()
        };
        let geometry =
            ShotGeometry::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0)).with_entry_offset(0.0);
        let result =
            PowerCalibrator::default().calibrate(&geometry, &profile, &ToleranceParams::default());
        assert_eq!(result.strategy, CalibrationStrategy::Runtime);

        let theta = (profile.vertical_influence / profile.forward_bias).atan();
        let g = profile.gravity_magnitude();
        let expected = (g * 5.0 / (2.0 * theta).sin()).sqrt();
        let centre = result.perfect.mid() * profile.max_impulse;
        assert!(
            (centre - expected).abs() <= 0.01 * profile.max_impulse,
            "centre {} expected {}",
            centre,
            expected
        );
    }

    proptest! {
        #[test]
        fn prop_bands_nested_and_normalised(
            distance in 2.5f32..8.0,
            height in 0.5f32..3.5,
            gravity_multiplier in 1.5f32..4.0,
            air_drag in 0.0f32..0.4,
        ) {
            let profile = ShotProfile { gravity_multiplier, air_drag, ..default() };
            let geometry = ShotGeometry::new(Vec3::ZERO, Vec3::new(0.0, height, distance));
            let result = PowerCalibrator::default()
                .calibrate(&geometry, &profile, &ToleranceParams::default());

            for band in [result.perfect, result.make, result.backboard] {
                if band.valid {
                    prop_assert!(band.min >= 0.0 && band.max <= 1.0 && band.min <= band.max);
                }
            }
            if result.perfect.valid {
                prop_assert!(result.make.encloses(&result.perfect));
            }
            if result.make.valid && result.backboard.valid {
                prop_assert!(result.backboard.mid() >= result.make.mid());
            }
        }
    }
}
