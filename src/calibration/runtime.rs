//! Runtime calibration against the simulated flight

use bevy::prelude::*;

use super::{CalibrationResult, CalibrationStrategy, CalibratorSettings, Range01};
use crate::constants::*;
use crate::geometry::{CameraBasis, ShotGeometry};
use crate::trajectory::{Approach, SimStep, integrate};
use crate::tuning::{ShotProfile, ToleranceParams};

/// Zero-lateral launch direction for a straight-up swipe
pub fn canonical_direction(basis: &CameraBasis, profile: &ShotProfile) -> Vec3 {
    let up = profile.vertical_influence.max(DIRECTION_WEIGHT_FLOOR);
    let forward = profile.forward_bias.max(DIRECTION_WEIGHT_FLOOR);
    basis.blend(0.0, up, forward).normalize_or(basis.forward)
}

/// Impulse whose landing error is zero, by bisection over [0, max impulse].
/// None if even the strongest shot that comes down falls short.
pub fn find_center_impulse(
    approach: &Approach,
    direction: Vec3,
    profile: &ShotProfile,
    settings: &CalibratorSettings,
) -> Option<f32> {
    let step = SimStep::new(settings.dt, settings.max_time);
    let max_impulse = profile.impulse_cap();
    let landing_at = |impulse: f32| integrate(approach, direction, impulse, profile, step);
    let error_at = |impulse: f32| landing_at(impulse).signed_error;

    // A shot still above the hoop when the step budget runs out is long, not short
    let mut hi = max_impulse;
    let mut top = landing_at(hi);
    for _ in 0..CAL_BRACKET_SHRINKS {
        if top.crossed || top.landing_point.y <= approach.entry.y {
            break;
        }
        hi *= 0.5;
        top = landing_at(hi);
    }
    if top.signed_error < 0.0 {
        return None;
    }

    let mut lo = 0.0;
    for _ in 0..settings.bisect_iterations {
        if hi - lo < CAL_BRACKET_FRACTION * max_impulse {
            break;
        }
        let mid = 0.5 * (lo + hi);
        if error_at(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

/// Landing error change per unit impulse around `center` (central difference)
pub fn estimate_slope(
    approach: &Approach,
    direction: Vec3,
    center: f32,
    profile: &ShotProfile,
    settings: &CalibratorSettings,
) -> f32 {
    let step = SimStep::new(settings.dt, settings.max_time);
    let max_impulse = profile.impulse_cap();
    let eps = (CAL_SLOPE_EPS_FRACTION * max_impulse).max(CAL_SLOPE_EPS_MIN);
    let below = (center - eps).max(0.0);
    let above = (center + eps).min(max_impulse);
    if above - below <= f32::EPSILON {
        return CAL_SLOPE_FLOOR;
    }

    let e_below = integrate(approach, direction, below, profile, step).signed_error;
    let e_above = integrate(approach, direction, above, profile, step).signed_error;
    ((e_above - e_below) / (above - below))
        .abs()
        .max(CAL_SLOPE_FLOOR)
}

pub fn calibrate_runtime(
    geometry: &ShotGeometry,
    profile: &ShotProfile,
    tolerances: &ToleranceParams,
    settings: &CalibratorSettings,
) -> Option<CalibrationResult> {
    let approach = Approach::from_geometry(geometry)?;
    let direction = canonical_direction(&geometry.basis, profile);
    let max_impulse = profile.impulse_cap();

    let Some(center) = find_center_impulse(&approach, direction, profile, settings) else {
        debug!(
            "Hoop out of reach at {:.2} from origin (max impulse {:.1})",
            approach.distance, max_impulse
        );
        return None;
    };
    let slope = estimate_slope(&approach, direction, center, profile, settings);

    let band = |lower_error: f32, upper_error: f32| {
        let lo = (center + lower_error / slope).clamp(0.0, max_impulse);
        let hi = (center + upper_error / slope).clamp(0.0, max_impulse);
        Range01::from_impulses(lo, hi, max_impulse)
    };

    let perfect_tol = tolerances.perfect_tolerance();
    let make_tol = tolerances.make_tolerance();
    let backboard_tol = tolerances.backboard_tolerance();

    let perfect = band(-perfect_tol, perfect_tol);
    let make = band(-make_tol, make_tol);
    let backboard = band(backboard_tol, backboard_tol + tolerances.backboard_width);

    debug!(
        "Runtime calibration: centre {:.2} slope {:.4} perfect {:.3}-{:.3}",
        center, slope, perfect.min, perfect.max
    );

    Some(CalibrationResult::finalize(
        perfect,
        make,
        backboard,
        CalibrationStrategy::Runtime,
        settings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approach() -> Approach {
        let geometry = ShotGeometry::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 5.0));
        Approach::from_geometry(&geometry).unwrap()
    }

    #[test]
    fn test_canonical_direction_keeps_floors() {
        let profile = ShotProfile {
            vertical_influence: 0.0,
            forward_bias: -1.0,
            ..default()
        };
        let dir = canonical_direction(&CameraBasis::default(), &profile);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.y > 0.0 && dir.z > 0.0);
        assert_eq!(dir.x, 0.0);
    }

    #[test]
    fn test_center_impulse_zeroes_error() {
        let profile = ShotProfile {
            max_impulse: 40.0,
            ..default()
        };
        let settings = CalibratorSettings::default();
        let approach = approach();
        let direction = canonical_direction(&CameraBasis::default(), &profile);
        let center = find_center_impulse(&approach, direction, &profile, &settings).unwrap();
        let landing = integrate(&approach, direction, center, &profile, SimStep::default());
        assert!(landing.crossed);
        assert!(landing.signed_error.abs() < 0.05, "error {}", landing.signed_error);
    }

    #[test]
    fn test_center_found_when_full_power_outlasts_budget() {
        let profile = ShotProfile {
            air_drag: 0.0,
            ..default()
        };
        let settings = CalibratorSettings {
            max_time: 0.5,
            ..default()
        };
        let approach = approach();
        let direction = canonical_direction(&CameraBasis::default(), &profile);
        let center = find_center_impulse(&approach, direction, &profile, &settings).unwrap();
        let landing = integrate(&approach, direction, center, &profile, SimStep::default());
        assert!(landing.crossed);
        assert!(landing.signed_error.abs() < 0.05, "error {}", landing.signed_error);
    }

    #[test]
    fn test_slope_is_positive() {
        let profile = ShotProfile::default();
        let settings = CalibratorSettings::default();
        let approach = approach();
        let direction = canonical_direction(&CameraBasis::default(), &profile);
        let center = find_center_impulse(&approach, direction, &profile, &settings).unwrap();
        let slope = estimate_slope(&approach, direction, center, &profile, &settings);
        assert!(slope > CAL_SLOPE_FLOOR);
    }
}
