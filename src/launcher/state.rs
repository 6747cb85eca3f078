//! Launcher lifecycle states

/// Holding → Aiming → Flying → Cooldown → (ball at rest) → Holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchState {
    /// Ball parked at the origin, ready when the cooldown allows
    #[default]
    Holding,
    /// Finger down, preview updating
    Aiming,
    /// Impulse issued this frame
    Flying,
    /// Waiting for the ball to come to rest
    Cooldown,
}

impl LaunchState {
    pub fn name(&self) -> &'static str {
        match self {
            LaunchState::Holding => "holding",
            LaunchState::Aiming => "aiming",
            LaunchState::Flying => "flying",
            LaunchState::Cooldown => "cooldown",
        }
    }
}
