//! AI module - scripted opponent
//!
//! The opponent picks an outcome by weight, aims a power fraction at the
//! matching calibrated band and fires through its own launcher.

mod decision;
mod profiles;
mod shooter;

pub use decision::*;
pub use profiles::*;
pub use shooter::*;
