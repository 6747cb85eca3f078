//! Plugin wiring: resources plus the per-frame shot pipeline

use bevy::prelude::*;

use crate::ShotRng;
use crate::ai::{BackboardBonus, DifficultyDatabase, ai_shooter_update};
use crate::calibration::{ActiveShot, CalibratedBands, CalibrationResult, PowerCalibrator};
use crate::config_watcher::{ConfigWatcher, check_config_changes};
use crate::events::{EventBus, GameEvent, Shooter, log_bus_events, update_event_bus_time};
use crate::flow::MatchFlow;
use crate::geometry::{CameraBasis, ShootingSpots};
use crate::input::{PointerInput, capture_touch_input};
use crate::launcher::{LaunchContext, LaunchController, PendingLaunch, SwipeRejection};
use crate::tuning::{ShotProfile, ShotTuning};

/// Rest signal from the physics side: the launched ball has come to rest
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ShotSettled;

/// Camera whose axes orient swipes and the canonical launch direction
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ShotCamera;

/// Registers shot resources and systems. `seed` fixes the opponent's RNG.
#[derive(Debug, Clone, Default)]
pub struct HoopshotPlugin {
    pub seed: Option<u64>,
}

impl Plugin for HoopshotPlugin {
    fn build(&self, app: &mut App) {
        let tuning = ShotTuning::load();
        let rng = match self.seed {
            Some(seed) => ShotRng::seeded(seed),
            None => ShotRng::default(),
        };

        app.insert_resource(tuning.profile.clone())
            .insert_resource(tuning)
            .insert_resource(rng)
            .insert_resource(EventBus::new())
            .init_resource::<CalibratedBands>()
            .init_resource::<ActiveShot>()
            .init_resource::<PointerInput>()
            .init_resource::<MatchFlow>()
            .init_resource::<ConfigWatcher>()
            .init_resource::<DifficultyDatabase>()
            .init_resource::<BackboardBonus>()
            .add_systems(Startup, select_initial_spot)
            .add_systems(
                Update,
                (
                    update_event_bus_time,
                    check_config_changes,
                    capture_touch_input,
                    sync_launcher_subscriptions,
                    settle_launchers,
                    follow_shot_camera,
                    recalibrate_bands,
                    drive_launchers,
                    ai_shooter_update,
                    log_bus_events,
                )
                    .chain(),
            );
    }
}

/// Pick the first spot when spots are configured and no geometry is set yet
pub fn select_initial_spot(
    spots: Option<ResMut<ShootingSpots>>,
    mut rng: ResMut<ShotRng>,
    mut active: ResMut<ActiveShot>,
) {
    let Some(mut spots) = spots else {
        return;
    };
    if active.geometry.is_some() {
        return;
    }
    spots.reset_cycle(&mut rng.0);
    if let Some(geometry) = spots.current().or_else(|| spots.advance(&mut rng.0)) {
        active.set_geometry(geometry);
    }
}

/// Player launchers listen to pointer input for as long as they exist
pub fn sync_launcher_subscriptions(
    added: Query<(Entity, &LaunchController), Added<LaunchController>>,
    mut removed: RemovedComponents<LaunchController>,
    mut input: ResMut<PointerInput>,
) {
    for (entity, launcher) in &added {
        if launcher.shooter == Shooter::Player {
            input.subscribe(entity);
        }
    }
    for entity in removed.read() {
        input.unsubscribe(entity);
    }
}

/// Rested shots return their launcher to Holding; the player moves to the next spot
pub fn settle_launchers(
    mut commands: Commands,
    mut spots: Option<ResMut<ShootingSpots>>,
    mut rng: ResMut<ShotRng>,
    mut active: ResMut<ActiveShot>,
    mut query: Query<(Entity, &mut LaunchController), With<ShotSettled>>,
) {
    for (entity, mut launcher) in &mut query {
        launcher.prepare_next_shot();
        commands
            .entity(entity)
            .remove::<(ShotSettled, PendingLaunch)>();

        if launcher.shooter != Shooter::Player {
            continue;
        }
        if let Some(spots) = spots.as_mut() {
            if let Some(geometry) = spots.advance(&mut rng.0) {
                active.set_geometry(geometry);
            }
        }
    }
}

/// Re-orient the active shot when the shot camera's axes differ from it
pub fn follow_shot_camera(
    camera: Query<&Transform, With<ShotCamera>>,
    mut active: ResMut<ActiveShot>,
) {
    let Ok(transform) = camera.single() else {
        return;
    };
    let Some(geometry) = active.geometry else {
        return;
    };
    let basis = CameraBasis::from_transform(transform);
    if !basis.is_finite() || basis == geometry.basis {
        return;
    }
    active.set_geometry(geometry.with_basis(basis));
}

/// Recompute bands when the geometry or tuning changed, then point every
/// launcher at the active shot.
pub fn recalibrate_bands(
    mut active: ResMut<ActiveShot>,
    tuning: Res<ShotTuning>,
    profile: Res<ShotProfile>,
    mut bands: ResMut<CalibratedBands>,
    mut bus: ResMut<EventBus>,
    mut launchers: Query<&mut LaunchController>,
) {
    if !active.dirty {
        return;
    }
    active.dirty = false;

    let Some(geometry) = active.geometry else {
        debug!("No active shot geometry, clearing bands");
        bands.0 = CalibrationResult::invalid();
        return;
    };
    let geometry = geometry.with_entry_offset(tuning.tolerances.entry_y_offset);
    if geometry.horizontal_axis().is_none() {
        warn!(
            "Shot origin {:?} is directly under the hoop, keeping current bands",
            geometry.origin
        );
        return;
    }

    let result = PowerCalibrator::new(tuning.calibrator.clone()).calibrate(
        &geometry,
        &profile,
        &tuning.tolerances,
    );
    if result.any_valid() {
        info!(
            "Bands for {:.1}m shot: perfect {:.3}-{:.3} ({:?})",
            geometry.horizontal_distance(),
            result.perfect.min,
            result.perfect.max,
            result.strategy
        );
    } else {
        warn!(
            "No reachable band from {:?} to {:?}",
            geometry.origin, geometry.target
        );
    }

    bands.0 = result;
    bus.emit(GameEvent::BandsRecalibrated {
        perfect: result.perfect,
        make: result.make,
        backboard: result.backboard,
        strategy: result.strategy,
    });

    for mut launcher in &mut launchers {
        launcher.origin = Some(geometry.origin);
        launcher.basis = Some(geometry.basis);
    }
}

/// Tick every launcher and route this frame's pointer events to subscribers
#[allow(clippy::too_many_arguments)]
pub fn drive_launchers(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<ShotTuning>,
    profile: Res<ShotProfile>,
    bands: Res<CalibratedBands>,
    mut input: ResMut<PointerInput>,
    mut bus: ResMut<EventBus>,
    mut query: Query<(Entity, &mut LaunchController)>,
) {
    let events = input.drain();
    let ctx = LaunchContext {
        profile: &profile,
        config: &tuning.launcher,
        bands: &bands.0,
    };

    for (entity, mut launcher) in &mut query {
        launcher.tick(time.delta_secs());
        if !input.is_subscribed(entity) {
            continue;
        }

        for event in &events {
            match launcher.handle_drag(event, &ctx) {
                Some(Ok(command)) => {
                    bus.emit(GameEvent::Launched {
                        shooter: launcher.shooter,
                        fraction: command.fraction,
                        lateral: command.request.lateral,
                        snapped: command.snapped,
                    });
                    commands.entity(entity).insert(PendingLaunch(command));
                }
                Some(Err(SwipeRejection::NotAiming)) | None => {}
                Some(Err(rejection)) => {
                    debug!("Swipe rejected: {}", rejection.reason());
                    bus.emit(GameEvent::GestureRejected {
                        reason: rejection.reason(),
                    });
                }
            }
        }
    }
}
