//! Event logger writing `.evlog` files for finished or running sessions

use bevy::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use super::bus::{BusEvent, EventBus};
use super::format::serialize_event;
use super::types::SessionEvent;
use crate::constants::LOG_DIR;

/// Configuration for event logging
#[derive(Resource, Clone)]
pub struct EventLogConfig {
    /// Directory for log files
    pub log_dir: PathBuf,
    pub enabled: bool,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(LOG_DIR),
            enabled: false,
        }
    }
}

/// Active event logger with file handle.
///
/// The file is opened lazily when the first `SessionStart` arrives, named after
/// the session's timestamp and id.
#[derive(Resource)]
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    session_id: String,
    config: EventLogConfig,
}

impl EventLogger {
    pub fn new(config: EventLogConfig) -> Self {
        Self {
            writer: None,
            session_id: String::new(),
            config,
        }
    }

    fn open(&mut self, session_id: &str, timestamp: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.config.log_dir) {
            warn!("Failed to create log directory: {}", e);
            return;
        }

        let short_id: String = session_id.chars().take(8).collect();
        let stamp: String = timestamp
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let path = self.config.log_dir.join(format!("{}_{}.evlog", stamp, short_id));

        match OpenOptions::new().create(true).write(true).truncate(true).open(&path) {
            Ok(file) => {
                self.writer = Some(BufWriter::new(file));
                self.session_id = session_id.to_string();
                info!("Event logging started: {} (session: {})", path.display(), short_id);
            }
            Err(e) => {
                warn!("Failed to open event log: {}", e);
            }
        }
    }

    pub fn log(&mut self, time_ms: u32, event: &SessionEvent) {
        if !self.config.enabled {
            return;
        }

        if let SessionEvent::SessionStart {
            session_id,
            timestamp,
        } = event
        {
            self.end_session();
            self.open(session_id, timestamp);
        }

        let Some(writer) = &mut self.writer else {
            return;
        };

        if let Err(e) = writeln!(writer, "{}", serialize_event(time_ms, event)) {
            warn!("Failed to write event: {}", e);
        }
    }

    /// Flush and close the current log file
    pub fn end_session(&mut self) {
        if let Some(mut writer) = self.writer.take()
            && let Err(e) = writer.flush()
        {
            warn!("Failed to flush event log: {}", e);
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(EventLogConfig::default())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        self.end_session();
    }
}

/// Drain the bus into the log file and the console log
pub fn log_session_events(mut bus: ResMut<EventBus>, mut logger: ResMut<EventLogger>) {
    for BusEvent { time_ms, event } in bus.drain() {
        debug!("{}", serialize_event(time_ms, &event));
        logger.log(time_ms, &event);
    }
}
