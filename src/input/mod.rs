//! Pointer input - drag events queued for subscribed launchers

use bevy::input::touch::Touches;
use bevy::prelude::*;

use crate::tuning::ShotTuning;

/// One step of a drag, in screen pixels with y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start(Vec2),
    Move(Vec2),
    End {
        start: Vec2,
        end: Vec2,
        /// Seconds between press and release
        duration: f32,
    },
    /// Touch lost without a release
    Cancel,
}

/// Buffered drag events plus the launchers listening to them
#[derive(Resource, Default)]
pub struct PointerInput {
    events: Vec<DragEvent>,
    subscribers: Vec<Entity>,
    /// Press position and time of the active drag
    pressed: Option<(Vec2, f32)>,
}

impl PointerInput {
    pub fn subscribe(&mut self, entity: Entity) {
        if !self.subscribers.contains(&entity) {
            self.subscribers.push(entity);
        }
    }

    pub fn unsubscribe(&mut self, entity: Entity) {
        self.subscribers.retain(|&e| e != entity);
    }

    pub fn is_subscribed(&self, entity: Entity) -> bool {
        self.subscribers.contains(&entity)
    }

    /// Press at `position`, `now` seconds since start
    pub fn press(&mut self, position: Vec2, now: f32) {
        self.pressed = Some((position, now));
        self.events.push(DragEvent::Start(position));
    }

    pub fn drag_to(&mut self, position: Vec2) {
        if self.pressed.is_some() {
            self.events.push(DragEvent::Move(position));
        }
    }

    /// Release; ignored without a matching press
    pub fn release(&mut self, position: Vec2, now: f32) {
        if let Some((start, pressed_at)) = self.pressed.take() {
            self.events.push(DragEvent::End {
                start,
                end: position,
                duration: (now - pressed_at).max(0.0),
            });
        }
    }

    /// Drop the active drag; ignored without a matching press
    pub fn cancel(&mut self) {
        if self.pressed.take().is_some() {
            self.events.push(DragEvent::Cancel);
        }
    }

    pub fn drain(&mut self) -> Vec<DragEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Feed the first touch into `PointerInput`.
/// Touch positions are window pixels with y down; flipped using the configured screen height.
pub fn capture_touch_input(
    touches: Option<Res<Touches>>,
    tuning: Res<ShotTuning>,
    time: Res<Time>,
    mut input: ResMut<PointerInput>,
) {
    let Some(touches) = touches else {
        return;
    };
    let height = tuning.launcher.screen.height;
    let flip = |p: Vec2| Vec2::new(p.x, height - p.y);
    let now = time.elapsed_secs();

    if let Some(touch) = touches.iter_just_pressed().next() {
        input.press(flip(touch.position()), now);
    } else if let Some(touch) = touches.iter_just_released().next() {
        input.release(flip(touch.position()), now);
    } else if touches.iter_just_canceled().next().is_some() {
        input.cancel();
    } else if let Some(touch) = touches.iter().next() {
        if touch.delta() != Vec2::ZERO {
            input.drag_to(flip(touch.position()));
        }
    }
}
