//! Opponent difficulty profiles
//!
//! Loaded from assets/ai_difficulty.txt and hot-reloaded every 10 seconds.

use bevy::prelude::*;
use std::fs;

use crate::constants::*;

/// Opponent timing, outcome weights and noise
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyProfile {
    /// Profile name for display
    pub name: String,
    pub min_shot_interval: f32,
    pub max_shot_interval: f32,
    pub initial_delay: f32,
    pub weight_perfect: f32,
    pub weight_make: f32,
    pub weight_backboard: f32,
    pub weight_miss: f32,
    /// ± fraction of the bar added to every pick
    pub power_jitter: f32,
    pub lateral_noise_deg: f32,
    /// Perfect picks go to the band centre instead of anywhere inside
    pub snap_inside_perfect: bool,
    pub adapt_to_backboard_bonus: bool,
    pub backboard_weight_boost: f32,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self {
            name: "Normal".to_string(),
            min_shot_interval: AI_MIN_SHOT_INTERVAL,
            max_shot_interval: AI_MAX_SHOT_INTERVAL,
            initial_delay: AI_INITIAL_DELAY,
            weight_perfect: AI_WEIGHT_PERFECT,
            weight_make: AI_WEIGHT_MAKE,
            weight_backboard: AI_WEIGHT_BACKBOARD,
            weight_miss: AI_WEIGHT_MISS,
            power_jitter: AI_POWER_JITTER,
            lateral_noise_deg: AI_LATERAL_NOISE_DEG,
            snap_inside_perfect: true,
            adapt_to_backboard_bonus: true,
            backboard_weight_boost: AI_BACKBOARD_BOOST,
        }
    }
}

/// Database of difficulty profiles loaded from file
#[derive(Resource)]
pub struct DifficultyDatabase {
    profiles: Vec<DifficultyProfile>,
}

impl Default for DifficultyDatabase {
    fn default() -> Self {
        Self::load_from_file(AI_DIFFICULTY_FILE)
    }
}

impl DifficultyDatabase {
    /// Load profiles from file, or a single default profile if missing/empty
    pub fn load_from_file(path: &str) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not read difficulty file {}: {}, using defaults", path, e);
                return Self::with_defaults();
            }
        };
        let db = Self::from_content(&content);
        info!("Loaded {} difficulty profiles from {}", db.len(), path);
        db
    }

    pub fn from_content(content: &str) -> Self {
        let profiles = parse_profiles(content);
        if profiles.is_empty() {
            return Self::with_defaults();
        }
        Self { profiles }
    }

    pub fn with_defaults() -> Self {
        Self {
            profiles: vec![DifficultyProfile::default()],
        }
    }

    /// Get profile by index, wrapping around if out of bounds
    pub fn get(&self, index: usize) -> &DifficultyProfile {
        &self.profiles[index % self.profiles.len()]
    }

    /// Find a profile by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&DifficultyProfile> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Parse `profile:` blocks of `key: value` lines
fn parse_profiles(content: &str) -> Vec<DifficultyProfile> {
    let mut profiles = Vec::new();
    let mut current: Option<DifficultyProfile> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix("profile:") {
            if let Some(p) = current.take() {
                profiles.push(p);
            }
            current = Some(DifficultyProfile {
                name: name.trim().to_string(),
                ..default()
            });
            continue;
        }

        let Some(profile) = current.as_mut() else {
            continue;
        };

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        let number = value.parse::<f32>().ok().filter(|v| v.is_finite());

        match (key.trim(), number) {
            ("min_shot_interval", Some(v)) => profile.min_shot_interval = v.max(0.1),
            ("max_shot_interval", Some(v)) => profile.max_shot_interval = v.max(0.1),
            ("initial_delay", Some(v)) => profile.initial_delay = v.max(0.0),
            ("weight_perfect", Some(v)) => profile.weight_perfect = v.clamp(0.0, AI_WEIGHT_MAX),
            ("weight_make", Some(v)) => profile.weight_make = v.clamp(0.0, AI_WEIGHT_MAX),
            ("weight_backboard", Some(v)) => profile.weight_backboard = v.clamp(0.0, AI_WEIGHT_MAX),
            ("weight_miss", Some(v)) => profile.weight_miss = v.clamp(0.0, AI_WEIGHT_MAX),
            ("power_jitter", Some(v)) => profile.power_jitter = v.clamp(0.0, 0.25),
            ("lateral_noise_deg", Some(v)) => profile.lateral_noise_deg = v.clamp(0.0, 20.0),
            ("backboard_weight_boost", Some(v)) => {
                profile.backboard_weight_boost = v.clamp(1.0, AI_BACKBOARD_BOOST_MAX)
            }
            ("snap_inside_perfect", _) => {
                if let Some(flag) = parse_flag(value) {
                    profile.snap_inside_perfect = flag;
                }
            }
            ("adapt_to_backboard_bonus", _) => {
                if let Some(flag) = parse_flag(value) {
                    profile.adapt_to_backboard_bonus = flag;
                }
            }
            _ => {}
        }
    }

    if let Some(p) = current {
        profiles.push(p);
    }

    profiles
}
