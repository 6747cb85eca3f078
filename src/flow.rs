//! Match flow: which screen the game is on, with explicit listeners

use bevy::prelude::*;

use crate::events::{EventBus, GameEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    MainMenu,
    Gameplay,
    Reward,
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::MainMenu => "main_menu",
            FlowState::Gameplay => "gameplay",
            FlowState::Reward => "reward",
        }
    }
}

/// Handle returned by [`MatchFlow::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowListenerId(u32);

type FlowListener = Box<dyn Fn(FlowState, FlowState) + Send + Sync>;

/// Current flow state plus listeners called on every change with (from, to)
#[derive(Resource, Default)]
pub struct MatchFlow {
    state: FlowState,
    listeners: Vec<(FlowListenerId, FlowListener)>,
    next_id: u32,
}

impl MatchFlow {
    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn is_gameplay(&self) -> bool {
        self.state == FlowState::Gameplay
    }

    pub fn subscribe(
        &mut self,
        listener: impl Fn(FlowState, FlowState) + Send + Sync + 'static,
    ) -> FlowListenerId {
        let id = FlowListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not registered
    pub fn unsubscribe(&mut self, id: FlowListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Change state, notify listeners and publish `FlowChanged`. No-op if unchanged.
    pub fn set_state(&mut self, state: FlowState, bus: &mut EventBus) {
        if state == self.state {
            return;
        }
        let previous = std::mem::replace(&mut self.state, state);
        info!("Match flow {} -> {}", previous.name(), state.name());
        for (_, listener) in &self.listeners {
            listener(previous, state);
        }
        bus.emit(GameEvent::FlowChanged { state });
    }
}
