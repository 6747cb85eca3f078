//! Event bus and compact event log format
//!
//! Systems publish shot, calibration and flow events to the EventBus; the
//! UI and the rigid-body side read them during the frame.

mod bus;
mod format;
mod types;

pub use bus::{BusEvent, EventBus, log_bus_events, update_event_bus_time};
pub use format::serialize_event;
pub use types::{GameEvent, Shooter};
