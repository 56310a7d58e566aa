//! Status line telling the player what to do next

use bevy::prelude::*;

use crate::session::{HoopPhase, SessionController};

/// Status text component
#[derive(Component)]
pub struct StatusText;

pub fn spawn_status_text(commands: &mut Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(crate::constants::TEXT_ACCENT),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            bottom: Val::Px(12.0),
            ..default()
        },
        StatusText,
    ));
}

/// Hint for the current hoop phase
pub fn status_line(hoop: &HoopPhase, power: f32, charging: bool) -> String {
    match hoop {
        HoopPhase::NoHoop => "Tap a detected plane to place the hoop".to_string(),
        HoopPhase::Placing { .. } => "Hoop settling...".to_string(),
        HoopPhase::Ready { .. } if charging => format!("Power {:.0}", power),
        HoopPhase::Ready { .. } => "Hold to charge, release to shoot".to_string(),
    }
}

pub fn update_status_text(
    controller: Res<SessionController>,
    mut text_query: Query<&mut Text, With<StatusText>>,
) {
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };

    let line = status_line(
        &controller.state().hoop,
        controller.power(),
        controller.is_charging(),
    );
    if text.0 != line {
        text.0 = line;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_hoop_phase() {
        let ready = HoopPhase::Ready {
            position: Vec3::ZERO,
        };
        assert!(status_line(&HoopPhase::NoHoop, 1.0, false).starts_with("Tap"));
        assert_eq!(status_line(&ready, 7.0, true), "Power 7");
        assert!(status_line(&ready, 1.0, false).starts_with("Hold"));
    }
}
