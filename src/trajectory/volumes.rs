//! Outcome classification against rim, net and backboard volumes

use bevy::prelude::*;

use super::integrate::{FlightState, SimStep, inverse_lerp};
use crate::constants::*;
use crate::geometry::ShotGeometry;
use crate::tuning::{ShotProfile, ToleranceParams};

/// How a shot ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Clean swish through the net
    Perfect,
    /// In off the rim
    Make,
    /// Hits the board first
    Backboard,
    Miss,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [
        Outcome::Perfect,
        Outcome::Make,
        Outcome::Backboard,
        Outcome::Miss,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Perfect => "perfect",
            Outcome::Make => "make",
            Outcome::Backboard => "backboard",
            Outcome::Miss => "miss",
        }
    }
}

/// Board slab behind the rim, facing the shooter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardVolume {
    pub center: Vec3,
    /// Points back toward the shooter
    pub normal: Vec3,
    pub right: Vec3,
    pub half_width: f32,
    pub half_height: f32,
    pub half_thickness: f32,
}

impl BoardVolume {
    fn front_face_offset(&self) -> f32 {
        self.half_thickness
    }
}

/// Collision volumes around one hoop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoopVolumes {
    pub rim_center: Vec3,
    pub rim_radius: f32,
    pub tube_radius: f32,
    pub ball_radius: f32,
    pub board: BoardVolume,
    /// Height of the net detection plane
    pub net_y: f32,
    /// Below this height a descending ball is out of play
    pub floor_y: f32,
}

impl HoopVolumes {
    /// Build volumes for the hoop in `geometry`; None if the shot has no horizontal axis
    pub fn around(geometry: &ShotGeometry, tolerances: &ToleranceParams) -> Option<Self> {
        let axis = geometry.horizontal_axis()?;
        let rim_center = geometry.target;
        let rim_radius = tolerances.hoop_radius.max(0.01);
        let right = Vec3::Y.cross(axis).normalize_or_zero();

        let board_offset = rim_radius + BACKBOARD_GAP + BACKBOARD_THICKNESS * 0.5;
        let board = BoardVolume {
            center: rim_center + axis * board_offset + Vec3::Y * BACKBOARD_RISE,
            normal: -axis,
            right,
            half_width: BACKBOARD_WIDTH * 0.5,
            half_height: BACKBOARD_HEIGHT * 0.5,
            half_thickness: BACKBOARD_THICKNESS * 0.5,
        };

        Some(Self {
            rim_center,
            rim_radius,
            tube_radius: RIM_TUBE_RADIUS,
            ball_radius: tolerances.ball_radius.max(0.0),
            board,
            net_y: rim_center.y - NET_PLANE_DEPTH,
            floor_y: geometry.origin.y.min(rim_center.y) - 1.0,
        })
    }

    /// Ball centre passing through the board's front face (expanded by the ball radius)
    fn board_contact(&self, from: Vec3, to: Vec3) -> bool {
        let board = &self.board;
        let face = board.front_face_offset() + self.ball_radius;
        // distance in front of the board, positive on the shooter's side
        let before = (from - board.center).dot(board.normal);
        let after = (to - board.center).dot(board.normal);
        if !(before > face && after <= face) {
            return false;
        }
        let hit = from.lerp(to, inverse_lerp(before, after, face));
        let local = hit - board.center;
        local.dot(board.right).abs() <= board.half_width + self.ball_radius
            && local.y.abs() <= board.half_height + self.ball_radius
    }

    fn horizontal_distance_from_rim(&self, point: Vec3) -> f32 {
        Vec2::new(point.x - self.rim_center.x, point.z - self.rim_center.z).length()
    }

    /// Ball touching the rim tube
    fn rim_contact(&self, point: Vec3) -> bool {
        let rho = self.horizontal_distance_from_rim(point);
        let dy = point.y - self.rim_center.y;
        let to_tube = Vec2::new(rho - self.rim_radius, dy).length();
        to_tube <= self.tube_radius + self.ball_radius
    }
}

/// Fly the shot through the hoop volumes and classify the first thing it meets.
///
/// Each step checks the board first, then the net plane, then the rim.
pub fn simulate_against_volumes(
    volumes: &HoopVolumes,
    origin: Vec3,
    direction: Vec3,
    impulse: f32,
    profile: &ShotProfile,
    step: SimStep,
) -> Outcome {
    let gravity = profile.gravity();
    let drag = profile.drag();
    let mut state = FlightState::launch(origin, direction, impulse);
    for _ in 0..step.max_steps() {
        let next = state.step(gravity, drag, step.dt);

        if volumes.board_contact(state.position, next.position) {
            return Outcome::Backboard;
        }

        let descending = next.velocity.y < -MIN_DOWNWARD_SPEED;
        if descending && state.position.y > volumes.net_y && next.position.y <= volumes.net_y {
            let alpha = inverse_lerp(state.position.y, next.position.y, volumes.net_y);
            let rho = volumes.horizontal_distance_from_rim(state.position.lerp(next.position, alpha));
            if rho <= volumes.rim_radius - volumes.ball_radius {
                return Outcome::Perfect;
            }
            if rho <= volumes.rim_radius {
                return Outcome::Make;
            }
        }

        if volumes.rim_contact(next.position) {
            return if volumes.horizontal_distance_from_rim(next.position) < volumes.rim_radius {
                Outcome::Make
            } else {
                Outcome::Miss
            };
        }

        if next.velocity.y < 0.0 && next.position.y < volumes.floor_y {
            return Outcome::Miss;
        }

        state = next;
    }

    Outcome::Miss
}
