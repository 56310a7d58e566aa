//! AR Hoops - place a basketball hoop on a detected surface and shoot at it
//!
//! This crate provides the session controller, its host capabilities, and the
//! Bevy systems that run them on a desktop stand-in for an AR device.

// Core modules
pub mod config_watcher;
pub mod constants;
pub mod events;
pub mod platform;
pub mod scheduler;
pub mod session;
pub mod tuning;

// Host modules
pub mod camera;
pub mod input;
pub mod physics;
pub mod scene;
pub mod tracking;
pub mod ui;

// Re-export commonly used types for convenience
pub use camera::DeviceCamera;
pub use config_watcher::ConfigWatcher;
pub use constants::*;
pub use events::{
    BusEvent, EventBus, EventLogConfig, EventLogger, SessionEvent, SessionSummary,
    log_session_events, parse_evlog, update_event_bus_time,
};
pub use input::{Gesture, GestureInput};
pub use physics::{ImpulseQueue, body_collider};
pub use platform::{
    Anchor, BodyDesc, BodyKind, CameraPose, HitTestFilter, NoticeLabel, PhysicsScene, PlaneAnchor,
    TapRecognizer, Tracking, TrackingConfig,
};
pub use scene::{AssetStore, SceneBodies};
pub use scheduler::{Scheduler, SessionTask, TaskId};
pub use session::{ChargePhase, HoopPhase, SessionController, SessionState};
pub use tracking::{DetectedPlane, SimulatedTracking, TrackingHost};
pub use tuning::{DebugTuning, NoticePolicy, PhysicsTuning, SessionConfig, SessionTuning};
