//! Opt-in calibration by classifying a sweep of impulses against hoop volumes

use bevy::prelude::*;

use super::{CalibrationResult, CalibrationStrategy, CalibratorSettings, Range01};
use super::runtime::canonical_direction;
use crate::geometry::ShotGeometry;
use crate::trajectory::{HoopVolumes, Outcome, SimStep, simulate_against_volumes};
use crate::tuning::{ShotProfile, ToleranceParams};

/// Running min/max of the fractions that produced one outcome
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    bounds: Option<(f32, f32)>,
}

impl Accumulator {
    fn add(&mut self, fraction: f32) {
        self.bounds = Some(match self.bounds {
            Some((lo, hi)) => (lo.min(fraction), hi.max(fraction)),
            None => (fraction, fraction),
        });
    }

    /// A single hit becomes a point band so minimum widths can widen it
    fn into_range(self) -> Range01 {
        match self.bounds {
            Some((lo, hi)) => Range01 {
                min: lo,
                max: hi,
                valid: true,
            },
            None => Range01::INVALID,
        }
    }
}

pub fn calibrate_sampling(
    geometry: &ShotGeometry,
    profile: &ShotProfile,
    tolerances: &ToleranceParams,
    settings: &CalibratorSettings,
) -> Option<CalibrationResult> {
    let volumes = HoopVolumes::around(geometry, tolerances)?;
    let direction = canonical_direction(&geometry.basis, profile);
    let step = SimStep::new(settings.sampling_dt, settings.sampling_max_time);
    let max_impulse = profile.impulse_cap();
    let count = settings.sampling_count.max(2);

    let mut perfect = Accumulator::default();
    let mut make = Accumulator::default();
    let mut backboard = Accumulator::default();

    for i in 1..=count {
        let fraction = i as f32 / count as f32;
        let outcome = simulate_against_volumes(
            &volumes,
            geometry.origin,
            direction,
            fraction * max_impulse,
            profile,
            step,
        );
        match outcome {
            Outcome::Perfect => {
                perfect.add(fraction);
                make.add(fraction);
            }
            Outcome::Make => make.add(fraction),
            Outcome::Backboard => backboard.add(fraction),
            Outcome::Miss => {}
        }
    }

    debug!(
        "Sampled {} shots: perfect {:?} make {:?} backboard {:?}",
        count, perfect.bounds, make.bounds, backboard.bounds
    );

    Some(CalibrationResult::finalize(
        perfect.into_range(),
        make.into_range(),
        backboard.into_range(),
        CalibrationStrategy::Sampling,
        settings,
    ))
}
