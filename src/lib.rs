//! Hoopshot - shot prediction, power-band calibration and the opponent for a
//! swipe-to-shoot basketball game built with Bevy
//!
//! This crate provides all game components, resources, and systems organized into modules.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

// Core modules
pub mod config_watcher;
pub mod constants;
pub mod events;
pub mod flow;
pub mod helpers;
pub mod plugin;
pub mod tuning;

// Shot modules
pub mod ai;
pub mod calibration;
pub mod geometry;
pub mod input;
pub mod launcher;
pub mod trajectory;

// Re-export commonly used types for convenience
pub use ai::{
    AiPhase, AiShooter, BackboardBonus, DecisionPolicy, DifficultyDatabase, DifficultyProfile,
    ShotDecision,
};
pub use calibration::{
    ActiveShot, CalibratedBands, CalibrationResult, CalibrationStrategy, CalibratorSettings,
    PowerCalibrator, Range01,
};
pub use config_watcher::ConfigWatcher;
pub use constants::*;
pub use events::{BusEvent, EventBus, GameEvent, Shooter, update_event_bus_time};
pub use flow::{FlowState, MatchFlow};
pub use geometry::{CameraBasis, ShootingSpots, ShotGeometry};
pub use input::{DragEvent, PointerInput};
pub use launcher::{
    AimPreview, AimZone, LaunchCommand, LaunchContext, LaunchController, LaunchState,
    LauncherConfig, PendingLaunch, Swipe, SwipeRejection,
};
pub use plugin::{HoopshotPlugin, ShotCamera, ShotSettled};
pub use trajectory::{HoopVolumes, Outcome, SimStep};
pub use tuning::{ShotProfile, ShotTuning, ToleranceParams};

/// Shared random source for the opponent and spot rotation
#[derive(Resource)]
pub struct ShotRng(pub StdRng);

impl Default for ShotRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl ShotRng {
    /// Fixed seed for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}
