//! Event log reader
//!
//! Reads `.evlog` files back and condenses a session into a `SessionSummary`,
//! used by `--summarize`.

use std::fs;
use std::path::Path;

use super::format::parse_event;
use super::types::SessionEvent;

/// What one logged session amounted to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: String,
    pub planes: u32,
    /// Log time of hoop placement (ms)
    pub hoop_placed_ms: Option<u32>,
    pub hoop_ready_ms: Option<u32>,
    /// Power of every shot fired, in order
    pub shot_powers: Vec<f32>,
    pub skipped_shots: u32,
    pub missed_taps: u32,
    /// Lines that were not blank, comments or known events
    pub unparsed_lines: u32,
    /// Latest timestamp seen (ms)
    pub last_ms: u32,
}

impl SessionSummary {
    pub fn is_valid(&self) -> bool {
        !self.session_id.is_empty()
    }

    /// Time between placement and the hoop accepting shots
    pub fn settle_ms(&self) -> Option<u32> {
        Some(self.hoop_ready_ms?.saturating_sub(self.hoop_placed_ms?))
    }

    pub fn max_power(&self) -> Option<f32> {
        self.shot_powers.iter().copied().reduce(f32::max)
    }

    pub fn mean_power(&self) -> Option<f32> {
        if self.shot_powers.is_empty() {
            return None;
        }
        Some(self.shot_powers.iter().sum::<f32>() / self.shot_powers.len() as f32)
    }

    /// Human-readable report, one fact per line
    pub fn report(&self) -> String {
        let mut lines = vec![
            format!("session:  {} ({})", self.session_id, self.started_at),
            format!("planes:   {}", self.planes),
        ];
        match (self.hoop_placed_ms, self.settle_ms()) {
            (Some(at), Some(settle)) => {
                lines.push(format!("hoop:     placed at {} ms, ready after {} ms", at, settle))
            }
            (Some(at), None) => lines.push(format!("hoop:     placed at {} ms, never ready", at)),
            _ => lines.push("hoop:     not placed".to_string()),
        }
        lines.push(format!(
            "shots:    {} fired, {} skipped",
            self.shot_powers.len(),
            self.skipped_shots
        ));
        if let (Some(mean), Some(max)) = (self.mean_power(), self.max_power()) {
            lines.push(format!("power:    mean {:.1}, max {:.1}", mean, max));
        }
        lines.push(format!("taps:     {} missed", self.missed_taps));
        if self.unparsed_lines > 0 {
            lines.push(format!("skipped {} unreadable lines", self.unparsed_lines));
        }
        lines.join("\n")
    }
}

pub fn parse_evlog_content(content: &str) -> SessionSummary {
    let mut summary = SessionSummary::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((time_ms, event)) = parse_event(line) else {
            summary.unparsed_lines += 1;
            continue;
        };
        summary.last_ms = summary.last_ms.max(time_ms);

        match event {
            SessionEvent::SessionStart {
                session_id,
                timestamp,
            } => {
                summary.session_id = session_id;
                summary.started_at = timestamp;
            }
            SessionEvent::PlaneDetected { .. } => summary.planes += 1,
            SessionEvent::HoopPlaced { .. } => summary.hoop_placed_ms = Some(time_ms),
            SessionEvent::HoopReady => summary.hoop_ready_ms = Some(time_ms),
            SessionEvent::ShotFired { power, .. } => summary.shot_powers.push(power),
            SessionEvent::ShotSkipped { .. } => summary.skipped_shots += 1,
            SessionEvent::TapMissed { .. } => summary.missed_taps += 1,
            SessionEvent::NoticeShown
            | SessionEvent::NoticeHidden
            | SessionEvent::ChargeStarted
            | SessionEvent::Teardown { .. } => {}
        }
    }

    summary
}

pub fn parse_evlog<P: AsRef<Path>>(path: P) -> Result<SessionSummary, String> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(parse_evlog_content(&content))
}
