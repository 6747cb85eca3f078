//! Shot geometry: where the ball leaves from, where the hoop is, and which
//! way the camera faces while aiming.

use bevy::prelude::*;
use rand::Rng;

use crate::constants::{ENTRY_Y_OFFSET, MIN_HORIZONTAL_DISTANCE};

/// Camera axes used to turn swipe fractions into a world direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self {
            right: Vec3::X,
            up: Vec3::Y,
            forward: Vec3::Z,
        }
    }
}

impl CameraBasis {
    /// Level camera at `origin` looking horizontally at `target`.
    /// Returns None when the target is straight above/below the origin.
    pub fn facing(origin: Vec3, target: Vec3) -> Option<Self> {
        let flat = Vec3::new(target.x - origin.x, 0.0, target.z - origin.z);
        let forward = flat.try_normalize()?;
        let right = Vec3::Y.cross(forward).normalize();
        Some(Self {
            right,
            up: Vec3::Y,
            forward,
        })
    }

    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            right: transform.right().as_vec3(),
            up: transform.up().as_vec3(),
            forward: transform.forward().as_vec3(),
        }
    }

    /// Blend the axes with the given weights
    pub fn blend(&self, right: f32, up: f32, forward: f32) -> Vec3 {
        self.right * right + self.up * up + self.forward * forward
    }

    pub fn is_finite(&self) -> bool {
        self.right.is_finite() && self.up.is_finite() && self.forward.is_finite()
    }
}

/// Launch origin, hoop position and aim orientation for one firing spot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotGeometry {
    pub origin: Vec3,
    /// Rim centre
    pub target: Vec3,
    /// Vertical offset from the rim centre to the entry plane
    pub entry_offset: f32,
    pub basis: CameraBasis,
}

impl ShotGeometry {
    /// Geometry with a level camera facing the hoop
    pub fn new(origin: Vec3, target: Vec3) -> Self {
        Self {
            origin,
            target,
            entry_offset: ENTRY_Y_OFFSET,
            basis: CameraBasis::facing(origin, target).unwrap_or_default(),
        }
    }

    pub fn with_entry_offset(mut self, entry_offset: f32) -> Self {
        self.entry_offset = entry_offset;
        self
    }

    pub fn with_basis(mut self, basis: CameraBasis) -> Self {
        self.basis = basis;
        self
    }

    /// Point the ball should pass through on its way down
    pub fn entry_point(&self) -> Vec3 {
        self.target + Vec3::Y * self.entry_offset
    }

    /// Entry point projected onto the origin's height
    fn entry_on_origin_plane(&self) -> Vec3 {
        let entry = self.entry_point();
        Vec3::new(entry.x, self.origin.y, entry.z)
    }

    /// Horizontal origin→target distance
    pub fn horizontal_distance(&self) -> f32 {
        (self.entry_on_origin_plane() - self.origin).length()
    }

    /// Entry height above the origin
    pub fn height_delta(&self) -> f32 {
        self.entry_point().y - self.origin.y
    }

    /// Unit horizontal axis from origin to target; None when degenerate
    pub fn horizontal_axis(&self) -> Option<Vec3> {
        let flat = self.entry_on_origin_plane() - self.origin;
        let distance = flat.length();
        if distance < MIN_HORIZONTAL_DISTANCE {
            return None;
        }
        Some(flat / distance)
    }
}

/// Rotates the launch origin among firing spots
#[derive(Resource, Debug, Clone)]
pub struct ShootingSpots {
    spots: Vec<Vec3>,
    pub target: Vec3,
    pub random_order: bool,
    pub pick_on_reset: bool,
    pub start_index: usize,
    current: Option<usize>,
}

impl ShootingSpots {
    pub fn new(spots: Vec<Vec3>, target: Vec3) -> Self {
        Self {
            spots,
            target,
            random_order: true,
            pick_on_reset: true,
            start_index: 0,
            current: None,
        }
    }

    pub fn sequential(mut self, start_index: usize) -> Self {
        self.random_order = false;
        self.start_index = start_index;
        self
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Geometry for the current spot, if one is selected
    pub fn current(&self) -> Option<ShotGeometry> {
        let index = self.current?;
        self.spots
            .get(index)
            .map(|&origin| ShotGeometry::new(origin, self.target))
    }

    /// Advance to the next spot (random without immediate repeat, or sequential)
    pub fn advance(&mut self, rng: &mut impl Rng) -> Option<ShotGeometry> {
        if self.spots.is_empty() {
            warn!("No shooting spots configured");
            return None;
        }
        let count = self.spots.len();

        let next = if count == 1 {
            0
        } else if self.random_order {
            // draw among the other spots so the same spot never comes twice in a row
            match self.current {
                Some(current) if current < count => {
                    let index = rng.gen_range(0..count - 1);
                    if index >= current { index + 1 } else { index }
                }
                _ => rng.gen_range(0..count),
            }
        } else {
            match self.current {
                None => self.start_index.min(count - 1),
                Some(index) => (index + 1) % count,
            }
        };

        self.current = Some(next);
        self.current()
    }

    /// Restart the cycle; optionally select a starting spot straight away
    pub fn reset_cycle(&mut self, rng: &mut impl Rng) {
        self.current = None;
        if self.spots.is_empty() || !self.pick_on_reset {
            return;
        }
        let count = self.spots.len();
        self.current = Some(if self.random_order {
            rng.gen_range(0..count)
        } else {
            self.start_index.min(count - 1)
        });
    }
}
