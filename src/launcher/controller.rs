//! Launch controller: gestures or programmatic requests in, launch commands out

use bevy::prelude::*;

use super::gesture::{Swipe, SwipeRejection, launch_direction, yawed_direction};
use super::{LaunchState, LauncherConfig};
use crate::calibration::{CalibrationResult, Range01};
use crate::events::Shooter;
use crate::geometry::CameraBasis;
use crate::input::DragEvent;
use crate::tuning::ShotProfile;

/// Direction, impulse and sideways fraction of one shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchRequest {
    /// Unit vector
    pub direction: Vec3,
    pub impulse: f32,
    /// In [-1, 1]
    pub lateral: f32,
}

/// Everything the rigid-body side needs to apply a shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchCommand {
    pub origin: Vec3,
    /// direction × impulse
    pub impulse: Vec3,
    pub backspin_torque: Vec3,
    pub sidespin_torque: Vec3,
    pub max_angular_speed: f32,
    pub request: LaunchRequest,
    /// Impulse as a fraction of max impulse
    pub fraction: f32,
    pub snapped: bool,
}

/// Launch waiting to be applied by the physics side
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingLaunch(pub LaunchCommand);

/// Band the aim currently falls in, checked Perfect, Backboard, Make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimZone {
    Perfect,
    Backboard,
    Make,
}

/// Live preview while the finger is down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimPreview {
    pub raw_fraction: f32,
    pub direction: Vec3,
    pub zone: Option<AimZone>,
    /// Fraction the release would snap to, if inside the snap window
    pub snapped: Option<f32>,
}

/// Read-only inputs the controller needs for a shot
#[derive(Debug, Clone, Copy)]
pub struct LaunchContext<'a> {
    pub profile: &'a ShotProfile,
    pub config: &'a LauncherConfig,
    pub bands: &'a CalibrationResult,
}

/// Per-shooter launch state machine.
///
/// Time only advances through [`LaunchController::tick`], so cooldowns are
/// deterministic under test.
#[derive(Component, Debug, Clone)]
pub struct LaunchController {
    pub shooter: Shooter,
    /// Camera axes; None until a camera is assigned
    pub basis: Option<CameraBasis>,
    /// Launch point; None until a shot origin is assigned
    pub origin: Option<Vec3>,
    state: LaunchState,
    clock: f32,
    next_allowed: f32,
    aim_start: Option<(Vec2, f32)>,
    preview: Option<AimPreview>,
}

impl LaunchController {
    pub fn new(shooter: Shooter) -> Self {
        Self {
            shooter,
            basis: None,
            origin: None,
            state: LaunchState::Holding,
            clock: 0.0,
            next_allowed: 0.0,
            aim_start: None,
            preview: None,
        }
    }

    pub fn with_aim(mut self, origin: Vec3, basis: CameraBasis) -> Self {
        self.origin = Some(origin);
        self.basis = Some(basis);
        self
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    pub fn preview(&self) -> Option<&AimPreview> {
        self.preview.as_ref()
    }

    fn cooldown_expired(&self) -> bool {
        self.clock >= self.next_allowed
    }

    /// Holding with the cooldown expired
    pub fn is_ready_for_shot(&self) -> bool {
        self.state == LaunchState::Holding && self.cooldown_expired()
    }

    /// Advance the internal clock; a launch from last frame settles into Cooldown
    pub fn tick(&mut self, dt: f32) {
        self.clock += dt.max(0.0);
        if self.state == LaunchState::Flying {
            self.state = LaunchState::Cooldown;
        }
    }

    /// Route one pointer event. Returns the command if the event launched a shot.
    pub fn handle_drag(
        &mut self,
        event: &DragEvent,
        ctx: &LaunchContext,
    ) -> Option<Result<LaunchCommand, SwipeRejection>> {
        match *event {
            DragEvent::Start(position) => {
                self.begin_aim(position);
                None
            }
            DragEvent::Move(position) => {
                self.update_aim(position, ctx);
                None
            }
            DragEvent::End {
                start,
                end,
                duration,
            } => Some(self.release(
                &Swipe {
                    start,
                    end,
                    duration,
                },
                ctx,
            )),
            DragEvent::Cancel => {
                self.abort_aim();
                None
            }
        }
    }

    /// Press: only from Holding once the cooldown has run out
    pub fn begin_aim(&mut self, position: Vec2) -> bool {
        if !self.is_ready_for_shot() {
            return false;
        }
        self.state = LaunchState::Aiming;
        self.aim_start = Some((position, self.clock));
        self.preview = None;
        true
    }

    /// Drag: recompute the preview with the same math as a release
    pub fn update_aim(&mut self, position: Vec2, ctx: &LaunchContext) {
        if self.state != LaunchState::Aiming {
            return;
        }
        let Some((start, started_at)) = self.aim_start else {
            return;
        };
        let Some(basis) = self.basis else {
            return;
        };
        let swipe = Swipe {
            start,
            end: position,
            duration: self.clock - started_at,
        };
        let metrics = swipe.measure(&ctx.config.screen);
        let raw_impulse = ctx.profile.impulse_for_swipe(metrics.cm, metrics.duration);
        let raw_fraction = raw_impulse / ctx.profile.impulse_cap();

        let bands = ctx.bands;
        let zone = if bands.perfect.contains(raw_fraction) {
            Some(AimZone::Perfect)
        } else if bands.backboard.contains(raw_fraction) {
            Some(AimZone::Backboard)
        } else if bands.make.contains(raw_fraction) {
            Some(AimZone::Make)
        } else {
            None
        };

        self.preview = Some(AimPreview {
            raw_fraction,
            direction: launch_direction(
                &basis,
                ctx.profile,
                metrics.lateral,
                metrics.vertical,
                ctx.config.max_yaw_from_swipe_deg,
            ),
            zone,
            snapped: snap_window(&bands.perfect, ctx.config, raw_fraction).then(|| bands.perfect.mid()),
        });
    }

    /// Drop the current aim without launching
    pub fn abort_aim(&mut self) {
        if self.state == LaunchState::Aiming {
            self.state = LaunchState::Holding;
        }
        self.aim_start = None;
        self.preview = None;
    }

    /// Release: validate the swipe, apply snap-assist and launch
    pub fn release(
        &mut self,
        swipe: &Swipe,
        ctx: &LaunchContext,
    ) -> Result<LaunchCommand, SwipeRejection> {
        if self.state != LaunchState::Aiming {
            return Err(SwipeRejection::NotAiming);
        }
        self.aim_start = None;
        self.preview = None;

        let metrics = match swipe.validate(ctx.config) {
            Ok(metrics) => metrics,
            Err(rejection) => {
                self.state = LaunchState::Holding;
                return Err(rejection);
            }
        };
        let Some(basis) = self.basis else {
            warn!("{:?} launcher has no camera; ignoring swipe", self.shooter);
            self.state = LaunchState::Holding;
            return Err(SwipeRejection::NotAiming);
        };

        let profile = ctx.profile;
        let max_yaw = ctx.config.max_yaw_from_swipe_deg;
        let raw_impulse = profile.impulse_for_swipe(metrics.cm, metrics.duration);
        let raw_fraction = raw_impulse / profile.impulse_cap();
        let perfect = &ctx.bands.perfect;

        let (request, snapped) = if snap_window(perfect, ctx.config, raw_fraction) {
            let envelope = ctx.config.max_lateral_in_perfect.abs();
            let lateral = metrics.lateral.clamp(-envelope, envelope);
            // snapped shots fly at the calibrated elevation
            let request = LaunchRequest {
                direction: launch_direction(&basis, profile, lateral, 1.0, max_yaw),
                impulse: perfect.mid() * profile.impulse_cap(),
                lateral,
            };
            (request, true)
        } else {
            let request = LaunchRequest {
                direction: launch_direction(
                    &basis,
                    profile,
                    metrics.lateral,
                    metrics.vertical,
                    max_yaw,
                ),
                impulse: raw_impulse,
                lateral: metrics.lateral,
            };
            (request, false)
        };

        self.fire(request, snapped, ctx).ok_or(SwipeRejection::NotAiming)
    }

    /// Programmatic shot at a fraction of max impulse. Skips gesture checks and
    /// snap-assist but respects Holding and the cooldown.
    pub fn launch_at(
        &mut self,
        fraction: f32,
        lateral: f32,
        ctx: &LaunchContext,
    ) -> Option<LaunchCommand> {
        if !self.is_ready_for_shot() {
            return None;
        }
        let Some(basis) = self.basis else {
            warn!("{:?} launcher has no camera; cannot launch", self.shooter);
            return None;
        };
        let profile = ctx.profile;
        let lateral = lateral.clamp(-1.0, 1.0);
        let request = LaunchRequest {
            direction: yawed_direction(&basis, profile, lateral, ctx.config.max_yaw_from_swipe_deg),
            impulse: fraction.clamp(0.0, 1.0) * profile.impulse_cap(),
            lateral,
        };
        self.fire(request, false, ctx)
    }

    fn fire(
        &mut self,
        request: LaunchRequest,
        snapped: bool,
        ctx: &LaunchContext,
    ) -> Option<LaunchCommand> {
        let (Some(origin), Some(basis)) = (self.origin, self.basis) else {
            warn!("{:?} launcher has no shot origin; cannot launch", self.shooter);
            self.state = LaunchState::Holding;
            return None;
        };
        let profile = ctx.profile;
        let impulse = request.impulse.min(profile.impulse_cap());

        let (backspin_torque, sidespin_torque) = if profile.apply_spin {
            (
                -basis.right * (profile.backspin_coeff * impulse),
                -basis.up * (profile.sidespin_coeff * impulse * request.lateral),
            )
        } else {
            (Vec3::ZERO, Vec3::ZERO)
        };

        debug!(
            "{:?} launcher {} -> flying at {:.3} of max",
            self.shooter,
            self.state.name(),
            impulse / profile.impulse_cap()
        );
        self.state = LaunchState::Flying;
        self.next_allowed = self.clock + ctx.config.cooldown.max(0.0);

        Some(LaunchCommand {
            origin,
            impulse: request.direction * impulse,
            backspin_torque,
            sidespin_torque,
            max_angular_speed: profile.max_angular_speed,
            request: LaunchRequest { impulse, ..request },
            fraction: impulse / profile.impulse_cap(),
            snapped,
        })
    }

    /// Ball is back at rest: ready to hold the next shot
    pub fn prepare_next_shot(&mut self) {
        self.state = LaunchState::Holding;
        self.aim_start = None;
        self.preview = None;
    }

    /// Return to Holding immediately and drop the cooldown gate
    pub fn force_stop_and_hold(&mut self) {
        self.prepare_next_shot();
        self.next_allowed = self.clock;
    }
}

fn snap_window(perfect: &Range01, config: &LauncherConfig, fraction: f32) -> bool {
    config.snap_to_perfect
        && perfect.valid
        && fraction >= perfect.min - config.snap_pad
        && fraction <= perfect.max + config.snap_pad
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationStrategy, PowerCalibrator};
    use crate::geometry::ShotGeometry;
    use crate::trajectory::{Approach, SimStep, integrate};
    use crate::tuning::ToleranceParams;

    fn bands() -> CalibrationResult {
        CalibrationResult {
            perfect: Range01::new(0.40, 0.46),
            make: Range01::new(0.35, 0.50),
            backboard: Range01::new(0.52, 0.60),
            strategy: CalibrationStrategy::Runtime,
        }
    }

    fn controller() -> LaunchController {
        LaunchController::new(Shooter::Player).with_aim(Vec3::ZERO, CameraBasis::default())
    }

    fn up_swipe(pixels: f32) -> Swipe {
        Swipe {
            start: Vec2::new(540.0, 300.0),
            end: Vec2::new(540.0, 300.0 + pixels),
            duration: 0.25,
        }
    }

    #[test]
    fn test_full_cycle() {
        let profile = ShotProfile::default();
        let config = LauncherConfig::default();
        let bands = bands();
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };
        let mut launcher = controller();

        assert!(launcher.begin_aim(Vec2::new(540.0, 300.0)));
        assert_eq!(launcher.state(), LaunchState::Aiming);
        let command = launcher.release(&up_swipe(600.0), &ctx).unwrap();
        assert_eq!(launcher.state(), LaunchState::Flying);
        assert!(command.impulse.length() > 0.0);

        launcher.tick(0.016);
        assert_eq!(launcher.state(), LaunchState::Cooldown);
        assert!(!launcher.begin_aim(Vec2::ZERO));

        launcher.prepare_next_shot();
        assert_eq!(launcher.state(), LaunchState::Holding);
        // cooldown (0.25 s) still running
        assert!(!launcher.is_ready_for_shot());
        launcher.tick(0.3);
        assert!(launcher.is_ready_for_shot());
    }

    #[test]
    fn test_rejected_swipe_returns_to_holding() {
        let profile = ShotProfile::default();
        let config = LauncherConfig::default();
        let bands = bands();
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };
        let mut launcher = controller();

        launcher.begin_aim(Vec2::ZERO);
        let err = launcher.release(&up_swipe(20.0), &ctx).unwrap_err();
        assert!(matches!(err, SwipeRejection::TooShort { .. }));
        assert_eq!(launcher.state(), LaunchState::Holding);
        assert!(launcher.is_ready_for_shot());

        // release without a press is ignored
        assert_eq!(
            launcher.release(&up_swipe(600.0), &ctx),
            Err(SwipeRejection::NotAiming)
        );
    }

    #[test]
    fn test_cancelled_drag_drops_aim() {
        let profile = ShotProfile::default();
        let config = LauncherConfig::default();
        let bands = bands();
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };
        let mut launcher = controller();

        assert!(launcher.handle_drag(&DragEvent::Start(Vec2::ZERO), &ctx).is_none());
        launcher.handle_drag(&DragEvent::Move(Vec2::new(0.0, 400.0)), &ctx);
        assert!(launcher.preview().is_some());

        assert!(launcher.handle_drag(&DragEvent::Cancel, &ctx).is_none());
        assert_eq!(launcher.state(), LaunchState::Holding);
        assert!(launcher.preview().is_none());
    }

    #[test]
    fn test_snap_to_perfect_midpoint() {
        let profile = ShotProfile {
            max_impulse: 90.0,
            ..default()
        };
        let config = LauncherConfig::default();
        // a band around whatever this swipe produces
        let swipe = Swipe {
            start: Vec2::new(540.0, 300.0),
            end: Vec2::new(640.0, 900.0),
            duration: 0.25,
        };
        let metrics = swipe.measure(&config.screen);
        let raw = profile.impulse_for_swipe(metrics.cm, metrics.duration) / profile.max_impulse;
        let bands = CalibrationResult {
            perfect: Range01::new(raw + 0.01, raw + 0.07),
            make: Range01::new(raw - 0.05, raw + 0.12),
            ..default()
        };
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };

        let mut launcher = controller();
        launcher.begin_aim(swipe.start);
        let command = launcher.release(&swipe, &ctx).unwrap();
        assert!(command.snapped);
        assert!((command.fraction - bands.perfect.mid()).abs() < 1e-5);
        assert!(command.request.lateral.abs() <= config.max_lateral_in_perfect + 1e-6);
    }

    #[test]
    fn test_no_snap_when_disabled_or_far() {
        let profile = ShotProfile::default();
        let config = LauncherConfig {
            snap_to_perfect: false,
            ..default()
        };
        let bands = bands();
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };
        let mut launcher = controller();
        launcher.begin_aim(Vec2::ZERO);
        let command = launcher.release(&up_swipe(600.0), &ctx).unwrap();
        assert!(!command.snapped);
    }

    #[test]
    fn test_launch_at_gated_by_state_and_cooldown() {
        let profile = ShotProfile::default();
        let config = LauncherConfig::default();
        let bands = bands();
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };
        let mut launcher = controller();

        let command = launcher.launch_at(0.5, 0.0, &ctx).unwrap();
        assert!((command.fraction - 0.5).abs() < 1e-6);
        assert!(launcher.launch_at(0.5, 0.0, &ctx).is_none());

        launcher.prepare_next_shot();
        assert!(launcher.launch_at(0.5, 0.0, &ctx).is_none(), "cooldown ignored");

        launcher.force_stop_and_hold();
        assert!(launcher.launch_at(0.5, 0.0, &ctx).is_some());
    }

    #[test]
    fn test_missing_camera_is_noop() {
        let profile = ShotProfile::default();
        let config = LauncherConfig::default();
        let bands = bands();
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };
        let mut launcher = LaunchController::new(Shooter::Opponent);
        assert!(launcher.launch_at(0.5, 0.0, &ctx).is_none());
        assert_eq!(launcher.state(), LaunchState::Holding);
    }

    #[test]
    fn test_spin_follows_profile() {
        let profile = ShotProfile::default();
        let config = LauncherConfig::default();
        let bands = bands();
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };
        let mut launcher = controller();
        let command = launcher.launch_at(0.5, 0.5, &ctx).unwrap();
        // backspin about -right, sidespin about -up scaled by lateral
        assert!(command.backspin_torque.x < 0.0);
        assert!(command.sidespin_torque.y < 0.0);

        let no_spin = ShotProfile {
            apply_spin: false,
            ..default()
        };
        let ctx = LaunchContext {
            profile: &no_spin,
            ..ctx
        };
        launcher.force_stop_and_hold();
        let command = launcher.launch_at(0.5, 0.5, &ctx).unwrap();
        assert_eq!(command.backspin_torque, Vec3::ZERO);
        assert_eq!(command.sidespin_torque, Vec3::ZERO);
    }

    #[test]
    fn test_launch_at_yaw_follows_lateral() {
        let profile = ShotProfile::default();
        let config = LauncherConfig::default();
        let bands = bands();
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };
        let mut launcher = controller();
        for lateral in [0.2, 0.5, -1.0] {
            launcher.force_stop_and_hold();
            let command = launcher.launch_at(0.5, lateral, &ctx).unwrap();
            let dir = command.request.direction;
            let yaw = dir.x.atan2(dir.z).to_degrees();
            let expected = lateral * config.max_yaw_from_swipe_deg;
            assert!((yaw - expected).abs() < 1e-3, "lateral {} yaw {}", lateral, yaw);
        }
    }

    #[test]
    fn test_preview_zone_order() {
        let profile = ShotProfile::default();
        let config = LauncherConfig::default();
        // Perfect and Backboard overlap: Perfect wins
        let bands = CalibrationResult {
            perfect: Range01::new(0.0, 0.9),
            make: Range01::new(0.0, 1.0),
            backboard: Range01::new(0.0, 1.0),
            ..default()
        };
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };
        let mut launcher = controller();
        launcher.begin_aim(Vec2::new(540.0, 300.0));
        launcher.tick(0.2);
        launcher.update_aim(Vec2::new(540.0, 500.0), &ctx);
        let preview = launcher.preview().unwrap();
        assert_eq!(preview.zone, Some(AimZone::Perfect));
        assert!(preview.snapped.is_some());
    }

    #[test]
    fn test_launch_at_midpoint_lands_in_perfect_tolerance() {
        let profile = ShotProfile {
            max_impulse: 40.0,
            gravity_multiplier: 3.0,
            air_drag: 0.1,
            ..default()
        };
        let tolerances = ToleranceParams::default();
        let geometry = ShotGeometry::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 5.0));
        let bands = PowerCalibrator::default().calibrate(&geometry, &profile, &tolerances);
        assert!(bands.perfect.valid);
        assert!(bands.perfect.min > 0.0 && bands.perfect.max < 1.0);

        let config = LauncherConfig::default();
        let ctx = LaunchContext {
            profile: &profile,
            config: &config,
            bands: &bands,
        };
        let mut launcher =
            LaunchController::new(Shooter::Player).with_aim(geometry.origin, geometry.basis);
        let command = launcher.launch_at(bands.perfect.mid(), 0.0, &ctx).unwrap();

        let approach = Approach::from_geometry(&geometry).unwrap();
        let landing = integrate(
            &approach,
            command.request.direction,
            command.request.impulse,
            &profile,
            SimStep::default(),
        );
        assert!(landing.crossed);
        assert!(
            landing.signed_error.abs() <= tolerances.perfect_tolerance(),
            "landed {} off",
            landing.signed_error
        );
    }
}
