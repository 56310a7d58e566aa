//! Compact text format for session event serialization
//!
//! Format: `T:NNNNN|CODE|data...`
//! - T:NNNNN = timestamp in milliseconds (5 digits, wraps at 99999)
//! - CODE = 2-char event type code
//! - data = pipe-separated values specific to event type
//!
//! Examples:
//! ```text
//! T:00000|SE|6f1c...|2026-10-16T09:12:44
//! T:01000|PD|1|0.00,0.00,0.00
//! T:01000|N+
//! T:02350|HP|0.41,0.00,-1.20
//! T:04350|HR
//! T:05110|SF|11.0|0.00,1.60,3.00|0.0,-4.2,-5.4|1
//! ```

use super::types::{SessionEvent, SkipReason, TapMiss};

/// Format a 3D position with fixed precision (2 decimals)
fn fmt_pos(pos: (f32, f32, f32)) -> String {
    format!("{:.2},{:.2},{:.2}", pos.0, pos.1, pos.2)
}

/// Format a 3D vector with 1 decimal
fn fmt_vec(v: (f32, f32, f32)) -> String {
    format!("{:.1},{:.1},{:.1}", v.0, v.1, v.2)
}

/// Serialize a SessionEvent to compact text format
pub fn serialize_event(time_ms: u32, event: &SessionEvent) -> String {
    let ts = format!("T:{:05}", time_ms % 100000);
    let code = event.type_code();

    let data = match event {
        SessionEvent::SessionStart {
            session_id,
            timestamp,
        } => format!("{}|{}", session_id, timestamp),
        SessionEvent::PlaneDetected { anchor_id, center } => {
            format!("{}|{}", anchor_id, fmt_pos(*center))
        }
        SessionEvent::HoopPlaced { pos } => fmt_pos(*pos),
        SessionEvent::ShotFired {
            power,
            pos,
            impulse,
            removed,
        } => format!(
            "{:.1}|{}|{}|{}",
            power,
            fmt_pos(*pos),
            fmt_vec(*impulse),
            removed
        ),
        SessionEvent::ShotSkipped { power, reason } => format!("{:.1}|{}", power, reason),
        SessionEvent::TapMissed { reason } => reason.to_string(),
        SessionEvent::Teardown { cancelled } => cancelled.to_string(),
        SessionEvent::NoticeShown
        | SessionEvent::NoticeHidden
        | SessionEvent::HoopReady
        | SessionEvent::ChargeStarted => String::new(),
    };

    if data.is_empty() {
        format!("{}|{}", ts, code)
    } else {
        format!("{}|{}|{}", ts, code, data)
    }
}

fn parse_triple(s: &str) -> Option<(f32, f32, f32)> {
    let mut it = s.split(',');
    let x = it.next()?.parse().ok()?;
    let y = it.next()?.parse().ok()?;
    let z = it.next()?.parse().ok()?;
    Some((x, y, z))
}

/// Parse a line back into timestamp and event
pub fn parse_event(line: &str) -> Option<(u32, SessionEvent)> {
    let parts: Vec<&str> = line.trim().split('|').collect();
    if parts.len() < 2 {
        return None;
    }

    let time_ms: u32 = parts[0].strip_prefix("T:")?.parse().ok()?;
    let code = parts[1];
    let data = &parts[2..];

    let event = match code {
        "SE" if data.len() >= 2 => SessionEvent::SessionStart {
            session_id: data[0].to_string(),
            timestamp: data[1].to_string(),
        },
        "PD" if data.len() >= 2 => SessionEvent::PlaneDetected {
            anchor_id: data[0].parse().ok()?,
            center: parse_triple(data[1])?,
        },
        "N+" => SessionEvent::NoticeShown,
        "N-" => SessionEvent::NoticeHidden,
        "HP" if !data.is_empty() => SessionEvent::HoopPlaced {
            pos: parse_triple(data[0])?,
        },
        "HR" => SessionEvent::HoopReady,
        "CS" => SessionEvent::ChargeStarted,
        "SF" if data.len() >= 4 => SessionEvent::ShotFired {
            power: data[0].parse().ok()?,
            pos: parse_triple(data[1])?,
            impulse: parse_triple(data[2])?,
            removed: data[3].parse().ok()?,
        },
        "SK" if data.len() >= 2 => SessionEvent::ShotSkipped {
            power: data[0].parse().ok()?,
            reason: match data[1] {
                "no_pose" => SkipReason::NoCameraPose,
                _ => return None,
            },
        },
        "TM" if !data.is_empty() => SessionEvent::TapMissed {
            reason: match data[0] {
                "no_hit" => TapMiss::NoHit,
                "no_asset" => TapMiss::AssetMissing,
                _ => return None,
            },
        },
        "TD" if !data.is_empty() => SessionEvent::Teardown {
            cancelled: data[0].parse().ok()?,
        },
        _ => return None,
    };

    Some((time_ms, event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shot_line_layout() {
        let line = serialize_event(
            5110,
            &SessionEvent::ShotFired {
                power: 11.0,
                pos: (0.0, 1.6, 3.0),
                impulse: (0.0, -4.24, -5.4),
                removed: 1,
            },
        );
        assert_eq!(line, "T:05110|SF|11.0|0.00,1.60,3.00|0.0,-4.2,-5.4|1");
    }

    #[test]
    fn test_events_without_payload_have_no_trailing_pipe() {
        assert_eq!(serialize_event(1000, &SessionEvent::NoticeShown), "T:01000|N+");
        assert_eq!(serialize_event(4350, &SessionEvent::HoopReady), "T:04350|HR");
    }

    #[test]
    fn test_timestamp_wraps() {
        let line = serialize_event(123_456, &SessionEvent::ChargeStarted);
        assert!(line.starts_with("T:23456|"));
    }

    #[test]
    fn test_parse_known_lines() {
        let (t, ev) = parse_event("T:02350|HP|0.41,0.00,-1.20").unwrap();
        assert_eq!(t, 2350);
        assert_eq!(ev, SessionEvent::HoopPlaced { pos: (0.41, 0.0, -1.2) });

        let (_, ev) = parse_event("T:00010|TM|no_hit").unwrap();
        assert_eq!(ev, SessionEvent::TapMissed { reason: TapMiss::NoHit });

        let (_, ev) = parse_event("T:00020|SK|1.0|no_pose").unwrap();
        assert_eq!(
            ev,
            SessionEvent::ShotSkipped {
                power: 1.0,
                reason: SkipReason::NoCameraPose
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_event("").is_none());
        assert!(parse_event("X:00000|HR").is_none());
        assert!(parse_event("T:00000|ZZ").is_none());
        assert!(parse_event("T:00000|HP|1,2").is_none());
    }
}
