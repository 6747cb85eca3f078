//! Opponent shooting loop

use bevy::prelude::*;
use rand::Rng;

use super::decision::{DecisionPolicy, ShotDecision};
use crate::calibration::CalibratedBands;
use crate::events::{EventBus, GameEvent, Shooter};
use crate::flow::MatchFlow;
use crate::helpers::uniform_between;
use crate::launcher::{LaunchContext, LaunchController, PendingLaunch};
use crate::tuning::{ShotProfile, ShotTuning};
use crate::ShotRng;

/// Backboard scoring bonus currently running (owned by scoring)
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct BackboardBonus {
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiPhase {
    /// Waiting out the delay before the first shot
    Starting { remaining: f32 },
    /// Waiting out the gap between shots
    Waiting { remaining: f32 },
    /// Gap elapsed, waiting for the launcher to be ready
    Ready,
}

/// Scripted opponent driving its own launcher
#[derive(Component, Debug, Clone)]
pub struct AiShooter {
    pub policy: DecisionPolicy,
    phase: AiPhase,
    pub shots_taken: u32,
}

impl AiShooter {
    pub fn new(policy: DecisionPolicy) -> Self {
        let phase = AiPhase::Starting {
            remaining: policy.profile.initial_delay,
        };
        Self {
            policy,
            phase,
            shots_taken: 0,
        }
    }

    pub fn phase(&self) -> AiPhase {
        self.phase
    }

    /// Back to the initial delay (e.g. when gameplay stops)
    pub fn reset(&mut self) {
        self.phase = AiPhase::Starting {
            remaining: self.policy.profile.initial_delay,
        };
    }

    fn next_interval(&self, rng: &mut impl Rng) -> f32 {
        let p = &self.policy.profile;
        let min = p.min_shot_interval.max(0.1);
        uniform_between(rng, min, p.max_shot_interval.max(min))
    }

    /// Advance timers; true when a shot should be taken this frame
    pub fn tick(&mut self, dt: f32, launcher_ready: bool, rng: &mut impl Rng) -> bool {
        if self.phase == AiPhase::Ready {
            if !launcher_ready {
                return false;
            }
            let remaining = self.next_interval(rng);
            self.phase = AiPhase::Waiting { remaining };
            self.shots_taken += 1;
            return true;
        }

        if let AiPhase::Starting { remaining } | AiPhase::Waiting { remaining } = &mut self.phase {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.phase = AiPhase::Ready;
            }
        }
        false
    }
}

/// Runs the opponent only during gameplay; leaving gameplay resets its loop.
#[allow(clippy::too_many_arguments)]
pub fn ai_shooter_update(
    mut commands: Commands,
    time: Res<Time>,
    flow: Res<MatchFlow>,
    bands: Res<CalibratedBands>,
    profile: Res<ShotProfile>,
    tuning: Res<ShotTuning>,
    bonus: Res<BackboardBonus>,
    mut rng: ResMut<ShotRng>,
    mut bus: ResMut<EventBus>,
    mut query: Query<(Entity, &mut AiShooter, &mut LaunchController)>,
) {
    let ctx = LaunchContext {
        profile: &profile,
        config: &tuning.launcher,
        bands: &bands.0,
    };

    for (entity, mut shooter, mut launcher) in &mut query {
        if !flow.is_gameplay() {
            shooter.reset();
            continue;
        }
        if !shooter.tick(time.delta_secs(), launcher.is_ready_for_shot(), &mut rng.0) {
            continue;
        }

        let ShotDecision {
            outcome,
            fraction,
            lateral,
        } = shooter.policy.decide(
            &mut rng.0,
            &bands.0,
            bonus.active,
            tuning.launcher.max_yaw_from_swipe_deg,
        );
        bus.emit(GameEvent::OpponentShot {
            outcome,
            fraction,
            lateral,
        });

        if let Some(command) = launcher.launch_at(fraction, lateral, &ctx) {
            bus.emit(GameEvent::Launched {
                shooter: Shooter::Opponent,
                fraction: command.fraction,
                lateral: command.request.lateral,
                snapped: false,
            });
            commands.entity(entity).insert(PendingLaunch(command));
        }
    }
}
