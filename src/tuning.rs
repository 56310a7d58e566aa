//! Session tuning loaded from `config/session.json`
//!
//! Every field has a serde default so a partial file only overrides what it
//! names. A missing or malformed file falls back to defaults with a warning.

use bevy::log::{info, warn};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::*;

/// How repeated plane detections drive the notice hide timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticePolicy {
    /// A new plane cancels the pending hide and starts a fresh one
    #[default]
    Restart,
    /// Every plane schedules its own hide; the first one to fire hides the label
    Independent,
}

/// Interaction timings and shot parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    pub charge_tick_ms: u64,
    pub hoop_settle_secs: f32,
    pub notice_secs: f32,
    pub power_base: f32,
    pub power_step: f32,
    pub ball_radius: f32,
    pub ball_restitution: f32,
    pub spawn_distance: f32,
    pub impulse_scale: Vec3,
    pub ball_spin: Vec3,
    pub notice_policy: NoticePolicy,
    /// Ignore touch-down while a charge is already running
    pub guard_reentrant_charge: bool,
    pub hoop_asset: String,
    pub hoop_node: String,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            charge_tick_ms: CHARGE_TICK_MS,
            hoop_settle_secs: HOOP_SETTLE_SECS,
            notice_secs: NOTICE_SECS,
            power_base: POWER_BASE,
            power_step: POWER_STEP,
            ball_radius: BALL_RADIUS,
            ball_restitution: BALL_RESTITUTION,
            spawn_distance: BALL_SPAWN_DISTANCE,
            impulse_scale: IMPULSE_SCALE,
            ball_spin: BALL_SPIN,
            notice_policy: NoticePolicy::default(),
            guard_reentrant_charge: true,
            hoop_asset: HOOP_ASSET.to_string(),
            hoop_node: HOOP_NODE.to_string(),
        }
    }
}

impl SessionTuning {
    pub fn charge_interval(&self) -> Duration {
        Duration::from_millis(self.charge_tick_ms)
    }

    pub fn hoop_settle(&self) -> Duration {
        secs_or_default("hoop_settle_secs", self.hoop_settle_secs, HOOP_SETTLE_SECS)
    }

    pub fn notice_duration(&self) -> Duration {
        secs_or_default("notice_secs", self.notice_secs, NOTICE_SECS)
    }
}

/// Seconds as a `Duration`. Negative values clamp to zero; values that cannot
/// be represented (infinite, e.g. `1e39` in the file) fall back to the default.
fn secs_or_default(name: &str, secs: f32, default_secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs.max(0.0)).unwrap_or_else(|e| {
        warn!("{} = {} is unusable ({}), using {}", name, secs, e, default_secs);
        Duration::from_secs_f32(default_secs)
    })
}

/// Host rigid-body engine settings
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub kill_plane_y: f32,
    /// Friction coefficient of every body
    pub friction: f32,
    /// Detected planes become static bodies the ball can land on
    pub planes_solid: bool,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            kill_plane_y: KILL_PLANE_Y,
            friction: BODY_FRICTION,
            planes_solid: true,
        }
    }
}

/// A real-world surface the simulated tracker will eventually detect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDef {
    pub center: Vec3,
    /// Half size along X and Z
    pub half_extents: Vec2,
    pub detect_after_secs: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingTuning {
    pub surfaces: Vec<SurfaceDef>,
    pub feature_points_per_plane: usize,
}

impl Default for TrackingTuning {
    fn default() -> Self {
        Self {
            surfaces: vec![
                SurfaceDef {
                    center: Vec3::ZERO,
                    half_extents: Vec2::new(4.0, 4.0),
                    detect_after_secs: 1.0,
                },
                SurfaceDef {
                    center: Vec3::new(2.5, 0.75, -1.5),
                    half_extents: Vec2::new(0.6, 0.4),
                    detect_after_secs: 1.6,
                },
            ],
            feature_points_per_plane: 40,
        }
    }
}

/// Debug overlay and logging switches
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugTuning {
    pub show_world_origin: bool,
    pub show_feature_points: bool,
    pub show_planes: bool,
    pub event_log: bool,
}

impl Default for DebugTuning {
    fn default() -> Self {
        Self {
            show_world_origin: true,
            show_feature_points: true,
            show_planes: true,
            event_log: false,
        }
    }
}

/// The whole config file
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub session: SessionTuning,
    pub physics: PhysicsTuning,
    pub tracking: TrackingTuning,
    pub debug: DebugTuning,
}

impl SessionConfig {
    pub fn from_json(contents: &str) -> Result<Self, String> {
        serde_json::from_str(contents).map_err(|e| format!("Failed to parse config: {}", e))
    }

    pub fn load_from_file(path: &str) -> Result<Self, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        Self::from_json(&contents).map_err(|e| format!("{} ({})", e, path))
    }

    /// Load the file, or defaults if it is missing or broken
    pub fn load_or_default(path: &str) -> Self {
        if !Path::new(path).exists() {
            info!("No {} found, using defaults", path);
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                info!("Loaded session config from {}", path);
                config
            }
            Err(err) => {
                warn!("{}, using defaults", err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &str) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, json)?;
        info!("Saved session config to {}", path);
        Ok(())
    }
}
