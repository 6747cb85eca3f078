//! Event type definitions

use crate::calibration::{CalibrationStrategy, Range01};
use crate::flow::FlowState;
use crate::trajectory::Outcome;

/// Who took a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shooter {
    Player,
    Opponent,
}

impl std::fmt::Display for Shooter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shooter::Player => write!(f, "P"),
            Shooter::Opponent => write!(f, "O"),
        }
    }
}

/// Everything published on the event bus
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A launcher issued an impulse
    Launched {
        shooter: Shooter,
        fraction: f32,
        lateral: f32,
        snapped: bool,
    },
    /// A swipe ended without launching
    GestureRejected { reason: String },
    /// New bands for the active geometry
    BandsRecalibrated {
        perfect: Range01,
        make: Range01,
        backboard: Range01,
        strategy: CalibrationStrategy,
    },
    /// The opponent committed to a shot
    OpponentShot {
        outcome: Outcome,
        fraction: f32,
        lateral: f32,
    },
    FlowChanged { state: FlowState },
}

impl GameEvent {
    /// Two-letter code used in the compact log format
    pub fn type_code(&self) -> &'static str {
        match self {
            GameEvent::Launched { .. } => "LA",
            GameEvent::GestureRejected { .. } => "GR",
            GameEvent::BandsRecalibrated { .. } => "BR",
            GameEvent::OpponentShot { .. } => "OS",
            GameEvent::FlowChanged { .. } => "FC",
        }
    }
}
