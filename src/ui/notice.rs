//! Plane-detected notice label

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::constants::*;
use crate::platform::NoticeLabel;

/// Marker for the notice container
#[derive(Component)]
pub struct PlaneNotice;

pub fn spawn_plane_notice(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(40.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            Visibility::Hidden,
            PlaneNotice,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                        ..default()
                    },
                    BackgroundColor(NOTICE_BACKGROUND),
                ))
                .with_children(|label| {
                    label.spawn((
                        Text::new("Plane detected"),
                        TextFont {
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(TEXT_PRIMARY),
                    ));
                });
        });
}

/// Host side of `NoticeLabel`
#[derive(SystemParam)]
pub struct NoticeHost<'w, 's> {
    labels: Query<'w, 's, &'static mut Visibility, With<PlaneNotice>>,
}

impl NoticeLabel for NoticeHost<'_, '_> {
    fn set_visible(&mut self, visible: bool) {
        for mut visibility in &mut self.labels {
            *visibility = if visible {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
    }
}
