//! Event type definitions for the session log

/// Why a shot attempt produced no ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Tracking has no camera pose yet
    NoCameraPose,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoCameraPose => write!(f, "no_pose"),
        }
    }
}

/// Why a tap placed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapMiss {
    NoHit,
    AssetMissing,
}

impl std::fmt::Display for TapMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TapMiss::NoHit => write!(f, "no_hit"),
            TapMiss::AssetMissing => write!(f, "no_asset"),
        }
    }
}

/// All session events that can be logged
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Session started (once per controller initialization)
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,
    },
    PlaneDetected {
        anchor_id: u32,
        center: (f32, f32, f32),
    },
    NoticeShown,
    NoticeHidden,
    HoopPlaced {
        pos: (f32, f32, f32),
    },
    HoopReady,
    ChargeStarted,
    ShotFired {
        power: f32,
        pos: (f32, f32, f32),
        impulse: (f32, f32, f32),
        removed: u32, // Balls swept before the spawn
    },
    ShotSkipped {
        power: f32,
        reason: SkipReason,
    },
    TapMissed {
        reason: TapMiss,
    },
    Teardown {
        cancelled: u32, // Pending tasks dropped
    },
}

impl SessionEvent {
    /// Two-letter code used in the compact log format
    pub fn type_code(&self) -> &'static str {
        match self {
            SessionEvent::SessionStart { .. } => "SE",
            SessionEvent::PlaneDetected { .. } => "PD",
            SessionEvent::NoticeShown => "N+",
            SessionEvent::NoticeHidden => "N-",
            SessionEvent::HoopPlaced { .. } => "HP",
            SessionEvent::HoopReady => "HR",
            SessionEvent::ChargeStarted => "CS",
            SessionEvent::ShotFired { .. } => "SF",
            SessionEvent::ShotSkipped { .. } => "SK",
            SessionEvent::TapMissed { .. } => "TM",
            SessionEvent::Teardown { .. } => "TD",
        }
    }
}
