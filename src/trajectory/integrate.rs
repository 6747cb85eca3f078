//! Forward integration of a launched ball and its landing error at the hoop

use bevy::prelude::*;

use crate::constants::{CAL_DT, CAL_MAX_TIME, CAL_OVERTIME_FACTOR};
use crate::geometry::ShotGeometry;
use crate::tuning::ShotProfile;

/// Integration timestep and time limit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimStep {
    pub dt: f32,
    pub max_time: f32,
}

impl Default for SimStep {
    fn default() -> Self {
        Self {
            dt: CAL_DT,
            max_time: CAL_MAX_TIME,
        }
    }
}

impl SimStep {
    pub fn new(dt: f32, max_time: f32) -> Self {
        Self {
            dt: dt.max(1e-4),
            max_time: max_time.max(dt),
        }
    }

    pub(crate) fn max_steps(&self) -> usize {
        (self.max_time / self.dt).ceil() as usize
    }

    /// Hard step cap for a ball still above the entry plane at `max_time`
    pub(crate) fn overtime_steps(&self) -> usize {
        self.max_steps() * CAL_OVERTIME_FACTOR
    }
}

/// Position and velocity of the ball in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl FlightState {
    pub fn launch(origin: Vec3, direction: Vec3, impulse: f32) -> Self {
        Self {
            position: origin,
            velocity: direction * impulse,
        }
    }

    /// Semi-implicit Euler with first-order drag damping
    pub fn step(&self, gravity: Vec3, drag: f32, dt: f32) -> Self {
        let velocity = (self.velocity + gravity * dt) / (1.0 + drag * dt);
        Self {
            position: self.position + velocity * dt,
            velocity,
        }
    }
}

/// Origin/entry pair with the horizontal axis used to sign landing errors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approach {
    pub origin: Vec3,
    pub entry: Vec3,
    /// Unit horizontal origin→target axis
    pub axis: Vec3,
    pub distance: f32,
}

impl Approach {
    /// None when the target is (nearly) straight above or below the origin
    pub fn from_geometry(geometry: &ShotGeometry) -> Option<Self> {
        let axis = geometry.horizontal_axis()?;
        Some(Self {
            origin: geometry.origin,
            entry: geometry.entry_point(),
            axis,
            distance: geometry.horizontal_distance(),
        })
    }

    /// Horizontal offset of `point` from the entry along the approach axis
    pub fn signed_offset(&self, point: Vec3) -> f32 {
        let flat = Vec3::new(point.x - self.entry.x, 0.0, point.z - self.entry.z);
        flat.dot(self.axis)
    }
}

/// Where a simulated shot crossed the entry plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub crossed: bool,
    /// > 0 long, < 0 short
    pub signed_error: f32,
    pub landing_point: Vec3,
}

/// Fly a ball launched along `direction` with `impulse` (unit mass) and report
/// where it comes down through the entry plane.
///
/// A ball still above the plane (or climbing) at `step.max_time` keeps flying
/// until it comes down, bounded by `SimStep::overtime_steps`. A shot that never
/// descends through the plane is reported as short by the full horizontal
/// distance.
pub fn integrate(
    approach: &Approach,
    direction: Vec3,
    impulse: f32,
    profile: &ShotProfile,
    step: SimStep,
) -> Landing {
    let gravity = profile.gravity();
    let drag = profile.drag();
    let plane_y = approach.entry.y;

    let mut state = FlightState::launch(approach.origin, direction, impulse);
    let max_steps = step.max_steps();
    for i in 0..step.overtime_steps() {
        let airborne = state.position.y > plane_y || state.velocity.y > 0.0;
        if i >= max_steps && !airborne {
            break;
        }
        let next = state.step(gravity, drag, step.dt);

        if state.position.y > plane_y && next.position.y <= plane_y && next.velocity.y < 0.0 {
            let alpha = inverse_lerp(state.position.y, next.position.y, plane_y);
            let hit = state.position.lerp(next.position, alpha);
            return Landing {
                crossed: true,
                signed_error: approach.signed_offset(hit),
                landing_point: hit,
            };
        }

        state = next;
    }

    Landing {
        crossed: false,
        signed_error: -approach.distance,
        landing_point: state.position,
    }
}

/// Points along a flight path, for previews and debug output
pub fn sample_arc(
    origin: Vec3,
    velocity: Vec3,
    profile: &ShotProfile,
    dt: f32,
    steps: usize,
) -> Vec<Vec3> {
    let gravity = profile.gravity();
    let drag = profile.drag();
    let mut state = FlightState {
        position: origin,
        velocity,
    };
    let mut points = Vec::with_capacity(steps + 1);
    points.push(origin);
    for _ in 0..steps {
        state = state.step(gravity, drag, dt);
        points.push(state.position);
    }
    points
}

/// Fraction of the way from `a` to `b` at which `value` lies (0 when a == b)
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        0.0
    } else {
        ((value - a) / (b - a)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_IMPULSE;
    use proptest::prelude::*;

    fn flat_approach(distance: f32, height: f32) -> Approach {
        let geometry = ShotGeometry::new(Vec3::ZERO, Vec3::new(0.0, height, distance))
            .with_entry_offset(0.0);
        Approach::from_geometry(&geometry).unwrap()
    }

    fn dir_45() -> Vec3 {
        Vec3::new(0.0, 1.0, 1.0).normalize()
    }

    #[test]
    fn test_drag_free_matches_closed_form() {
        // Zero drag, flat ground, 45°: range = v²/g
        let profile = ShotProfile {
            air_drag: 0.0,
            gravity_multiplier: 1.0,
            ..default()
        };
        let g = profile.gravity_magnitude();
        let speed = 8.0;
        let expected_range = speed * speed / g;

        let approach = flat_approach(5.0, 0.0);
        let landing = integrate(&approach, dir_45(), speed, &profile, SimStep::new(0.001, 5.0));
        assert!(landing.crossed);
        let range = landing.landing_point.z;
        assert!(
            (range - expected_range).abs() < 0.05,
            "range {} expected {}",
            range,
            expected_range
        );
        assert!((landing.signed_error - (range - 5.0)).abs() < 1e-4);
    }

    #[test]
    fn test_too_weak_is_short_by_full_distance() {
        let profile = ShotProfile::default();
        let approach = flat_approach(6.0, 3.0);
        let landing = integrate(&approach, dir_45(), 1.0, &profile, SimStep::default());
        assert!(!landing.crossed);
        assert_eq!(landing.signed_error, -6.0);
    }

    #[test]
    fn test_drag_shortens_flight() {
        let approach = flat_approach(5.0, 1.0);
        let light = ShotProfile {
            air_drag: 0.0,
            ..default()
        };
        let heavy = ShotProfile {
            air_drag: 0.5,
            ..default()
        };
        let a = integrate(&approach, dir_45(), 14.0, &light, SimStep::default());
        let b = integrate(&approach, dir_45(), 14.0, &heavy, SimStep::default());
        assert!(a.crossed && b.crossed);
        assert!(b.signed_error < a.signed_error);
    }

    #[test]
    fn test_long_flight_still_lands() {
        // Drag-free full-power lob outlasts max_time before coming down
        let profile = ShotProfile {
            air_drag: 0.0,
            ..default()
        };
        let approach = flat_approach(5.0, 0.0);
        let direction = Vec3::new(0.0, 2.0, 1.0).normalize();
        let step = SimStep::default();
        let flight_time = 2.0 * profile.max_impulse * direction.y / profile.gravity_magnitude();
        assert!(flight_time > step.max_time);

        let landing = integrate(&approach, direction, profile.max_impulse, &profile, step);
        assert!(landing.crossed);
        assert!(landing.signed_error > 0.0);
    }

    #[test]
    fn test_arc_starts_at_origin() {
        let profile = ShotProfile::default();
        let points = sample_arc(Vec3::ONE, Vec3::new(0.0, 5.0, 5.0), &profile, 0.01, 10);
        assert_eq!(points.len(), 11);
        assert_eq!(points[0], Vec3::ONE);
        assert!(points[10].z > points[1].z);
    }

    #[test]
    fn test_inverse_lerp_degenerate() {
        assert_eq!(inverse_lerp(1.0, 1.0, 1.0), 0.0);
        assert!((inverse_lerp(2.0, 0.0, 0.5) - 0.75).abs() < 1e-6);
    }

    proptest! {
        /// More impulse along a fixed direction never lands shorter
        #[test]
        fn prop_signed_error_monotone_in_impulse(
            gravity_multiplier in 1.0f32..5.0,
            air_drag in prop_oneof![Just(0.0f32), 0.0f32..1.0],
            max_impulse in prop_oneof![Just(MAX_IMPULSE), 20.0f32..100.0],
            elevation_deg in 35.0f32..65.0,
            distance in 2.0f32..8.0,
            height in 0.0f32..3.0,
        ) {
            let profile = ShotProfile { gravity_multiplier, air_drag, max_impulse, ..default() };
            let approach = flat_approach(distance, height);
            let elevation = elevation_deg.to_radians();
            let direction = Vec3::new(0.0, elevation.sin(), elevation.cos());

            let mut previous: Option<Landing> = None;
            for i in 0..=40 {
                let impulse = max_impulse * i as f32 / 40.0;
                let landing = integrate(&approach, direction, impulse, &profile, SimStep::default());
                if let Some(prev) = previous {
                    prop_assert!(
                        landing.signed_error >= prev.signed_error - 1e-3,
                        "error fell from {} to {} at impulse {}",
                        prev.signed_error, landing.signed_error, impulse
                    );
                    if prev.crossed && landing.crossed {
                        prop_assert!(landing.signed_error > prev.signed_error);
                    }
                }
                previous = Some(landing);
            }
        }
    }
}
