//! Power gauge shown while a shot is charging

use bevy::prelude::*;

use crate::constants::*;
use crate::session::SessionController;

/// Power gauge container
#[derive(Component)]
pub struct PowerGauge;

/// Power gauge fill
#[derive(Component)]
pub struct PowerGaugeFill;

const GAUGE_WIDTH: f32 = 240.0;
const GAUGE_HEIGHT: f32 = 14.0;

pub fn spawn_power_gauge(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(40.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-GAUGE_WIDTH / 2.0)),
                width: Val::Px(GAUGE_WIDTH),
                height: Val::Px(GAUGE_HEIGHT),
                padding: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(Color::BLACK),
            Visibility::Hidden,
            PowerGauge,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Percent(0.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.0, 0.8, 0.0)),
                PowerGaugeFill,
            ));
        });
}

/// How full the gauge reads for `power`, 0..=1
pub fn gauge_fraction(power: f32, power_base: f32) -> f32 {
    let span = GAUGE_FULL_POWER - power_base;
    if span <= 0.0 {
        return 1.0;
    }
    ((power - power_base) / span).clamp(0.0, 1.0)
}

/// Green when empty, red when full
pub fn gauge_color(fraction: f32) -> Color {
    Color::srgb(fraction * 0.9, (1.0 - fraction) * 0.8, 0.0)
}

pub fn update_power_gauge(
    controller: Res<SessionController>,
    mut gauge_query: Query<&mut Visibility, With<PowerGauge>>,
    mut fill_query: Query<(&mut Node, &mut BackgroundColor), With<PowerGaugeFill>>,
) {
    let charging = controller.is_charging();
    for mut visibility in &mut gauge_query {
        *visibility = if charging {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    if !charging {
        return;
    }

    let fraction = gauge_fraction(controller.power(), controller.tuning().power_base);
    for (mut node, mut color) in &mut fill_query {
        node.width = Val::Percent(fraction * 100.0);
        color.0 = gauge_color(fraction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_fraction() {
        assert_eq!(gauge_fraction(1.0, 1.0), 0.0);
        assert_eq!(gauge_fraction(GAUGE_FULL_POWER, 1.0), 1.0);
        assert_eq!(gauge_fraction(500.0, 1.0), 1.0);
        assert!((gauge_fraction(10.5, 1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gauge_fraction_degenerate_base() {
        assert_eq!(gauge_fraction(3.0, GAUGE_FULL_POWER), 1.0);
    }
}
