//! Compact text format for event logging
//!
//! Format: `T:NNNNN|CODE|data...`
//!
//! ```text
//! T:00150|BR|runtime|0.412-0.472|0.380-0.505|0.531-0.611
//! T:02300|LA|P|0.442|-0.05|S
//! T:04100|OS|backboard|0.571|0.12
//! ```

use super::types::GameEvent;
use crate::calibration::{CalibrationStrategy, Range01};

fn fmt_range(range: &Range01) -> String {
    if range.valid {
        format!("{:.3}-{:.3}", range.min, range.max)
    } else {
        "-".to_string()
    }
}

fn strategy_name(strategy: CalibrationStrategy) -> &'static str {
    match strategy {
        CalibrationStrategy::Runtime => "runtime",
        CalibrationStrategy::Sampling => "sampling",
        CalibrationStrategy::Analytic => "analytic",
        CalibrationStrategy::None => "none",
    }
}

/// Serialize an event to one log line
pub fn serialize_event(time_ms: u32, event: &GameEvent) -> String {
    let ts = format!("T:{:05}", time_ms % 100000);
    let code = event.type_code();

    let data = match event {
        GameEvent::Launched {
            shooter,
            fraction,
            lateral,
            snapped,
        } => format!(
            "{}|{:.3}|{:.2}|{}",
            shooter,
            fraction,
            lateral,
            if *snapped { "S" } else { "F" }
        ),
        GameEvent::GestureRejected { reason } => reason.clone(),
        GameEvent::BandsRecalibrated {
            perfect,
            make,
            backboard,
            strategy,
        } => format!(
            "{}|{}|{}|{}",
            strategy_name(*strategy),
            fmt_range(perfect),
            fmt_range(make),
            fmt_range(backboard)
        ),
        GameEvent::OpponentShot {
            outcome,
            fraction,
            lateral,
        } => format!("{}|{:.3}|{:.2}", outcome.label(), fraction, lateral),
        GameEvent::FlowChanged { state } => state.name().to_string(),
    };

    format!("{}|{}|{}", ts, code, data)
}
