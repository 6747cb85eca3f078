//! Drag-free fallback: closed-form launch speed over a sweep of angles

use super::{CalibrationResult, CalibrationStrategy, CalibratorSettings, Range01};
use crate::geometry::ShotGeometry;
use crate::tuning::{ShotProfile, ToleranceParams};

/// Launch speed that carries a drag-free ball `distance` forward and `rise` up
/// at `angle_deg` elevation: v² = g·d² / (2·cos²θ·(d·tanθ − Δh)).
/// None when the angle cannot reach the point.
pub fn drag_free_speed(gravity: f32, angle_deg: f32, distance: f32, rise: f32) -> Option<f32> {
    let theta = angle_deg.to_radians();
    let cos2 = theta.cos().powi(2);
    let denom = distance * theta.tan() - rise;
    if denom <= 1e-6 || cos2 <= 1e-6 {
        return None;
    }
    let v2 = gravity * distance * distance / (2.0 * cos2 * denom);
    (v2.is_finite() && v2 > 1e-6).then(|| v2.sqrt())
}

/// Angle in the configured sweep that needs the least speed
fn best_angle(gravity: f32, distance: f32, rise: f32, settings: &CalibratorSettings) -> Option<f32> {
    let samples = settings.analytic_angle_samples.max(1);
    let (min_deg, max_deg) = (
        settings.analytic_angle_min_deg,
        settings.analytic_angle_max_deg,
    );

    let mut best: Option<(f32, f32)> = None;
    for i in 0..samples {
        let t = if samples == 1 {
            0.0
        } else {
            i as f32 / (samples - 1) as f32
        };
        let angle = min_deg + (max_deg - min_deg) * t;
        if let Some(speed) = drag_free_speed(gravity, angle, distance, rise) {
            if best.is_none_or(|(_, best_speed)| speed < best_speed) {
                best = Some((angle, speed));
            }
        }
    }
    best.map(|(angle, _)| angle)
}

pub fn calibrate_analytic(
    geometry: &ShotGeometry,
    profile: &ShotProfile,
    tolerances: &ToleranceParams,
    settings: &CalibratorSettings,
) -> Option<CalibrationResult> {
    geometry.horizontal_axis()?;
    let distance = geometry.horizontal_distance();
    let rise = geometry.height_delta();
    let gravity = profile.gravity_magnitude();
    let max_impulse = profile.impulse_cap();

    let angle = best_angle(gravity, distance, rise, settings)?;
    let speed_at = |d: f32| drag_free_speed(gravity, angle, d, rise);

    // speed range landing within ±delta of the hoop; one-sided solves get a thin band
    let symmetric_band = |delta: f32| {
        let short = speed_at((distance - delta).max(0.01));
        let long = speed_at(distance + delta);
        match (short, long) {
            (Some(a), Some(b)) => Range01::from_impulses(a, b, max_impulse),
            (Some(a), None) => Range01::from_impulses(a, a * 1.02, max_impulse),
            (None, Some(b)) => Range01::from_impulses(b * 0.98, b, max_impulse),
            (None, None) => Range01::INVALID,
        }
    };

    let perfect_tol = tolerances.perfect_tolerance();
    let make_tol = tolerances.make_tolerance();
    let back_min = tolerances.backboard_tolerance();
    let back_max = (back_min + tolerances.backboard_width).max(make_tol * 1.8);

    let perfect = symmetric_band(perfect_tol);
    let make = symmetric_band(make_tol);
    let backboard = match (speed_at(distance + back_min), speed_at(distance + back_max)) {
        (Some(a), Some(b)) => Range01::from_impulses(a, b, max_impulse),
        _ => Range01::INVALID,
    };

    Some(CalibrationResult::finalize(
        perfect,
        make,
        backboard,
        CalibrationStrategy::Analytic,
        settings,
    ))
}
