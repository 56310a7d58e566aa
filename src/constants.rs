//! Tunable constants for arhoops
//!
//! Defaults for every value that `config/session.json` can override.
//! Units are meters and seconds unless noted.

use bevy::prelude::*;

// =============================================================================
// TEXT/UI COLORS
// =============================================================================

pub const TEXT_PRIMARY: Color = Color::srgb(0.95, 0.9, 0.8);
pub const TEXT_ACCENT: Color = Color::srgb(0.9, 0.75, 0.4);
pub const NOTICE_BACKGROUND: Color = Color::srgba(0.05, 0.05, 0.05, 0.6);
pub const ROOM_BACKGROUND: Color = Color::srgb(0.18, 0.2, 0.24); // Where the camera feed would be

// =============================================================================
// SESSION TIMING
// =============================================================================

pub const CHARGE_TICK_MS: u64 = 50; // Power accumulation interval
pub const HOOP_SETTLE_SECS: f32 = 2.0; // Delay between placement and shots being allowed
pub const NOTICE_SECS: f32 = 3.0; // How long the "plane detected" notice stays up

// =============================================================================
// SHOT POWER
// =============================================================================

pub const POWER_BASE: f32 = 1.0; // Power at rest and after every release
pub const POWER_STEP: f32 = 1.0; // Added per charge tick
pub const GAUGE_FULL_POWER: f32 = 20.0; // Power at which the gauge reads full (display only)

// =============================================================================
// BALL
// =============================================================================

pub const BALL_NAME: &str = "basketball";
pub const BALL_RADIUS: f32 = 0.25;
pub const BALL_RESTITUTION: f32 = 0.2; // Energy lost bouncing off the backboard
pub const BALL_SPAWN_DISTANCE: f32 = 1.0; // Along camera forward
/// Per-axis impulse scale applied to `forward * power`
pub const IMPULSE_SCALE: Vec3 = Vec3::new(1.0, 2.0, 0.5);
/// Initial angular velocity (rad/s)
pub const BALL_SPIN: Vec3 = Vec3::new(3.0 * std::f32::consts::PI, 0.0, 0.0);
pub const BALL_COLOR: Color = Color::srgb(0.85, 0.42, 0.12);

// =============================================================================
// HOOP ASSET
// =============================================================================

pub const HOOP_ASSET: &str = "hoop";
pub const HOOP_NODE: &str = "Basket";
pub const HOOP_NAME: &str = "hoop";
pub const HOOP_BASE_HALF: Vec3 = Vec3::new(0.4, 0.05, 0.4);
pub const HOOP_POLE_HALF: Vec3 = Vec3::new(0.05, 1.1, 0.05);
pub const HOOP_BOARD_HALF: Vec3 = Vec3::new(0.6, 0.4, 0.03);
pub const HOOP_RIM_HEIGHT: f32 = 2.0;
pub const HOOP_RIM_MAJOR_RADIUS: f32 = 0.35;
pub const HOOP_RIM_MINOR_RADIUS: f32 = 0.025;
pub const HOOP_POLE_COLOR: Color = Color::srgb(0.3, 0.3, 0.32);
pub const HOOP_BOARD_COLOR: Color = Color::srgb(0.92, 0.92, 0.95);
pub const HOOP_RIM_COLOR: Color = Color::srgb(0.9, 0.3, 0.1);

// =============================================================================
// PHYSICS
// =============================================================================

pub const GRAVITY: f32 = 9.8;
pub const KILL_PLANE_Y: f32 = -20.0; // Dynamic bodies below this are despawned
pub const STATIC_RESTITUTION: f32 = 1.0; // Static bodies defer bounciness to the ball
pub const BODY_FRICTION: f32 = 0.5;
pub const BODY_MASS: f32 = 1.0; // Every dynamic body (kg)
pub const PLANE_THICKNESS: f32 = 0.02;

// =============================================================================
// INPUT
// =============================================================================

pub const TAP_MAX_SECS: f64 = 0.3; // Press longer than this is not a tap
pub const TAP_MAX_TRAVEL: f32 = 12.0; // Pixels of movement allowed during a tap

// =============================================================================
// DEVICE CAMERA (desktop stand-in for the phone)
// =============================================================================

pub const CAMERA_START: Vec3 = Vec3::new(0.0, 1.6, 4.0);
pub const CAMERA_LOOK_AT: Vec3 = Vec3::new(0.0, 0.8, 0.0);
pub const CAMERA_MOVE_SPEED: f32 = 2.5;
pub const CAMERA_LOOK_SENSITIVITY: f32 = 0.003;

// =============================================================================
// FILES
// =============================================================================

pub const SESSION_CONFIG_FILE: &str = "config/session.json";
pub const LOG_DIR: &str = "logs";
