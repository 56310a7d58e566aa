//! Debug overlay - world origin, feature points and detected planes as gizmos

use bevy::prelude::*;

use crate::tracking::SimulatedTracking;
use crate::tuning::DebugTuning;

const ORIGIN_AXES_LENGTH: f32 = 0.5;
const FEATURE_POINT_RADIUS: f32 = 0.01;
const FEATURE_POINT_COLOR: Color = Color::srgb(1.0, 0.9, 0.2);
const PLANE_OUTLINE_COLOR: Color = Color::srgb(0.2, 0.7, 1.0);

/// F3 toggles the whole overlay
pub fn toggle_debug_overlay(keyboard: Res<ButtonInput<KeyCode>>, mut debug: ResMut<DebugTuning>) {
    if keyboard.just_pressed(KeyCode::F3) {
        let show = !(debug.show_world_origin || debug.show_feature_points || debug.show_planes);
        debug.show_world_origin = show;
        debug.show_feature_points = show;
        debug.show_planes = show;
        info!("Debug overlay {}", if show { "on" } else { "off" });
    }
}

pub fn draw_debug_overlay(
    mut gizmos: Gizmos,
    debug: Res<DebugTuning>,
    tracking: Res<SimulatedTracking>,
) {
    if debug.show_world_origin {
        gizmos.axes(Transform::IDENTITY, ORIGIN_AXES_LENGTH);
    }

    if debug.show_feature_points {
        for point in tracking.feature_points() {
            gizmos.sphere(Isometry3d::from_translation(*point), FEATURE_POINT_RADIUS, FEATURE_POINT_COLOR);
        }
    }

    if debug.show_planes {
        for plane in tracking.planes() {
            let (c, h) = (plane.center, plane.half_extents);
            gizmos.linestrip(
                [
                    c + Vec3::new(-h.x, 0.0, -h.y),
                    c + Vec3::new(h.x, 0.0, -h.y),
                    c + Vec3::new(h.x, 0.0, h.y),
                    c + Vec3::new(-h.x, 0.0, h.y),
                    c + Vec3::new(-h.x, 0.0, -h.y),
                ],
                PLANE_OUTLINE_COLOR,
            );
        }
    }
}
