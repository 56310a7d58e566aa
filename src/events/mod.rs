//! Session event logging
//!
//! The controller queues events as it works; `EventBus` timestamps them and
//! `EventLogger` writes them in the compact text format; `parse_evlog` reads
//! them back.

mod bus;
mod evlog_parser;
mod format;
mod logger;
mod types;

pub use bus::{BusEvent, EventBus, update_event_bus_time};
pub use evlog_parser::{SessionSummary, parse_evlog, parse_evlog_content};
pub use format::{parse_event, serialize_event};
pub use logger::{EventLogConfig, EventLogger, log_session_events};
pub use types::{SessionEvent, SkipReason, TapMiss};
