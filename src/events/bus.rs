//! Event Bus - central hub for cross-module communication
//!
//! - The launcher system emits Launched / GestureRejected
//! - Recalibration emits BandsRecalibrated for the power-bar UI
//! - The opponent emits OpponentShot, match flow emits FlowChanged
//!
//! Consumers peek during the frame; `log_bus_events` drains at the end of it.

use bevy::prelude::*;

use super::format::serialize_event;
use super::types::GameEvent;
use crate::constants::EVENT_HISTORY_LIMIT;

/// Timestamped event for the event bus
#[derive(Debug, Clone)]
pub struct BusEvent {
    /// Time in milliseconds since start
    pub time_ms: u32,
    pub event: GameEvent,
}

/// Central event bus for cross-module communication
#[derive(Resource, Default)]
pub struct EventBus {
    /// Events emitted this frame, waiting to be consumed
    pending: Vec<BusEvent>,

    /// Most recent drained events, oldest first
    processed: Vec<BusEvent>,

    /// Current elapsed time in milliseconds (for timestamping)
    elapsed_ms: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the elapsed time (called each frame)
    pub fn update_time(&mut self, elapsed_secs: f32) {
        self.elapsed_ms = (elapsed_secs * 1000.0) as u32;
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.pending.push(BusEvent {
            time_ms: self.elapsed_ms,
            event,
        });
    }

    /// Get pending events for consumption (does not drain)
    pub fn peek(&self) -> &[BusEvent] {
        &self.pending
    }

    /// Drain pending events, moving them to processed
    pub fn drain(&mut self) -> Vec<BusEvent> {
        let events = std::mem::take(&mut self.pending);
        self.processed.extend(events.iter().cloned());
        if self.processed.len() > EVENT_HISTORY_LIMIT {
            let excess = self.processed.len() - EVENT_HISTORY_LIMIT;
            self.processed.drain(..excess);
        }
        events
    }

    pub fn processed(&self) -> &[BusEvent] {
        &self.processed
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// System to update the event bus time each frame
pub fn update_event_bus_time(mut bus: ResMut<EventBus>, time: Res<Time>) {
    bus.update_time(time.elapsed_secs());
}

/// Drain the frame's events into the debug log
pub fn log_bus_events(mut bus: ResMut<EventBus>) {
    if !bus.has_pending() {
        return;
    }
    for entry in bus.drain() {
        debug!("{}", serialize_event(entry.time_ms, &entry.event));
    }
}
