//! Trajectory simulation
//!
//! Stateless flight prediction shared by the calibrator and tools:
//! - `integrate` reports the signed landing error at the hoop entry height
//! - `simulate_against_volumes` classifies a shot against rim, net and board

mod integrate;
mod volumes;

pub use integrate::{
    Approach, FlightState, Landing, SimStep, integrate, inverse_lerp, sample_arc,
};
pub use volumes::{BoardVolume, HoopVolumes, Outcome, simulate_against_volumes};
