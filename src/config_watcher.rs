//! Config file auto-reload system
//!
//! Polls the shot tuning and difficulty files every 10 seconds and reloads
//! them when modified. A tuning change invalidates the current bands.

use bevy::prelude::*;
use std::fs;
use std::time::SystemTime;

use crate::ai::{AiShooter, DifficultyDatabase};
use crate::calibration::ActiveShot;
use crate::constants::{AI_DIFFICULTY_FILE, SHOT_TUNING_FILE};
use crate::tuning::{ShotProfile, ShotTuning, load_shot_tuning_from_file};

/// How often to check for config changes (seconds)
const CHECK_INTERVAL: f32 = 10.0;

/// Tracks modification times of config files for hot-reload
#[derive(Resource)]
pub struct ConfigWatcher {
    /// Time since last check
    pub timer: f32,
    pub tuning_path: String,
    pub difficulty_path: String,
    /// Last known modification times
    pub tuning_mtime: Option<SystemTime>,
    pub difficulty_mtime: Option<SystemTime>,
}

/// Which files changed since the previous check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigChanges {
    pub tuning: bool,
    pub difficulty: bool,
}

impl ConfigChanges {
    pub fn any(&self) -> bool {
        self.tuning || self.difficulty
    }
}

impl Default for ConfigWatcher {
    fn default() -> Self {
        Self::with_paths(SHOT_TUNING_FILE, AI_DIFFICULTY_FILE)
    }
}

impl ConfigWatcher {
    pub fn with_paths(tuning_path: &str, difficulty_path: &str) -> Self {
        Self {
            timer: 0.0,
            tuning_path: tuning_path.to_string(),
            difficulty_path: difficulty_path.to_string(),
            tuning_mtime: get_mtime(tuning_path),
            difficulty_mtime: get_mtime(difficulty_path),
        }
    }

    /// Accumulate `dt`; once per interval, compare mtimes against the last check
    pub fn poll(&mut self, dt: f32) -> ConfigChanges {
        self.timer += dt;
        if self.timer < CHECK_INTERVAL {
            return ConfigChanges::default();
        }
        self.timer = 0.0;

        let mut changes = ConfigChanges::default();

        let tuning_mtime = get_mtime(&self.tuning_path);
        if tuning_mtime != self.tuning_mtime {
            self.tuning_mtime = tuning_mtime;
            changes.tuning = true;
        }

        let difficulty_mtime = get_mtime(&self.difficulty_path);
        if difficulty_mtime != self.difficulty_mtime {
            self.difficulty_mtime = difficulty_mtime;
            changes.difficulty = true;
        }

        changes
    }
}

/// Get file modification time, or None if file doesn't exist
fn get_mtime(path: &str) -> Option<SystemTime> {
    fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

/// Swap the shooter's profile for the reloaded one with the same name,
/// falling back to the first profile when it was removed.
pub fn refresh_policy(shooter: &mut AiShooter, db: &DifficultyDatabase) {
    let profile = db
        .find(&shooter.policy.profile.name)
        .unwrap_or_else(|| db.get(0))
        .clone();
    shooter.policy.profile = profile;
}

/// Check for config file changes and reload as needed.
/// Runs every 10 seconds.
#[allow(clippy::too_many_arguments)]
pub fn check_config_changes(
    time: Res<Time>,
    mut watcher: ResMut<ConfigWatcher>,
    mut tuning: ResMut<ShotTuning>,
    mut profile: ResMut<ShotProfile>,
    mut difficulty_db: ResMut<DifficultyDatabase>,
    mut active: ResMut<ActiveShot>,
    mut shooters: Query<&mut AiShooter>,
) {
    let changes = watcher.poll(time.delta_secs());
    if !changes.any() {
        return;
    }

    if changes.tuning {
        match load_shot_tuning_from_file(&watcher.tuning_path) {
            Ok(loaded) => {
                *profile = loaded.profile.clone();
                *tuning = loaded;
                active.mark_dirty();
                info!("Auto-reloaded shot tuning from {}", watcher.tuning_path);
            }
            Err(err) => warn!("{}, keeping current tuning", err),
        }
    }

    if changes.difficulty {
        *difficulty_db = DifficultyDatabase::load_from_file(&watcher.difficulty_path);
        for mut shooter in &mut shooters {
            refresh_policy(&mut shooter, &difficulty_db);
        }
        info!(
            "Auto-reloaded difficulty profiles from {}",
            watcher.difficulty_path
        );
    }
}
