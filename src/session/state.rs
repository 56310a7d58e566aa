//! Session state - everything the input handlers mutate

use bevy::prelude::*;

use crate::platform::TrackingConfig;
use crate::scheduler::TaskId;

/// Hoop lifecycle, one-way: NoHoop -> Placing -> Ready
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoopPhase {
    NoHoop,
    /// Hoop is in the scene, waiting for the settle delay
    Placing { position: Vec3, ready_task: TaskId },
    Ready { position: Vec3 },
}

impl HoopPhase {
    pub fn is_placed(&self) -> bool {
        !matches!(self, HoopPhase::NoHoop)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, HoopPhase::Ready { .. })
    }

    pub fn position(&self) -> Option<Vec3> {
        match self {
            HoopPhase::NoHoop => None,
            HoopPhase::Placing { position, .. } | HoopPhase::Ready { position } => Some(*position),
        }
    }
}

/// Whether a touch is currently charging power
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChargePhase {
    #[default]
    Idle,
    /// More than one tick only when re-entrant touch-down is allowed
    Charging { ticks: Vec<TaskId> },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoticeState {
    pub visible: bool,
    /// Hide tasks that have not fired yet
    pub pending_hides: Vec<TaskId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub power: f32,
    pub hoop: HoopPhase,
    pub charge: ChargePhase,
    pub notice: NoticeState,
    pub tracking_config: TrackingConfig,
    /// Bumped on teardown; tasks from older generations never run
    pub generation: u64,
}

impl SessionState {
    pub fn new(power_base: f32, tracking_config: TrackingConfig) -> Self {
        Self {
            power: power_base,
            hoop: HoopPhase::NoHoop,
            charge: ChargePhase::Idle,
            notice: NoticeState::default(),
            tracking_config,
            generation: 0,
        }
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.charge, ChargePhase::Charging { .. })
    }
}
