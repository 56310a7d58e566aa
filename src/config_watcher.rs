//! Config file auto-reload system
//!
//! Polls the session config every few seconds and re-applies physics and
//! debug settings when it changes. Session timings only apply to the next
//! session.

use bevy::prelude::*;
use std::fs;
use std::time::SystemTime;

use crate::tuning::{DebugTuning, PhysicsTuning, SessionConfig};

/// How often to check for config changes (seconds)
const CHECK_INTERVAL: f32 = 3.0;

/// Tracks the modification time of the config file for hot-reload
#[derive(Resource)]
pub struct ConfigWatcher {
    pub path: String,
    /// Time since last check
    pub timer: f32,
    /// Last known modification time
    pub mtime: Option<SystemTime>,
}

impl ConfigWatcher {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            timer: 0.0,
            mtime: get_mtime(path),
        }
    }

    /// Count down the poll timer; true when the file changed since last seen
    pub fn poll(&mut self, delta_secs: f32) -> bool {
        self.timer += delta_secs;
        if self.timer < CHECK_INTERVAL {
            return false;
        }
        self.timer = 0.0;

        let mtime = get_mtime(&self.path);
        if mtime == self.mtime {
            return false;
        }
        self.mtime = mtime;
        true
    }
}

/// Get file modification time, or None if file doesn't exist
fn get_mtime(path: &str) -> Option<SystemTime> {
    fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

/// Check for config file changes and reload as needed
pub fn check_config_changes(
    time: Res<Time>,
    mut watcher: ResMut<ConfigWatcher>,
    mut physics: ResMut<PhysicsTuning>,
    mut debug: ResMut<DebugTuning>,
) {
    if !watcher.poll(time.delta_secs()) {
        return;
    }

    match SessionConfig::load_from_file(&watcher.path) {
        Ok(config) => {
            *physics = config.physics;
            *debug = config.debug;
            info!(
                "Auto-reloaded physics and debug settings from {} (session timings apply next session)",
                watcher.path
            );
        }
        Err(e) => warn!("{}, keeping current settings", e),
    }
}
