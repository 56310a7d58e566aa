//! Device camera - the desktop stand-in for moving the phone around

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

use crate::constants::*;

/// Marker for the camera whose pose tracking reports
#[derive(Component)]
pub struct DeviceCamera;

/// Pitch limit so the view never flips over the top
const MAX_PITCH: f32 = 1.54;

pub fn spawn_device_camera(commands: &mut Commands) {
    commands.spawn((
        Name::new("device_camera"),
        Camera3d::default(),
        Transform::from_translation(CAMERA_START).looking_at(CAMERA_LOOK_AT, Vec3::Y),
        DeviceCamera,
    ));
}

/// Apply a mouse delta to a yaw/pitch camera rotation
pub fn look_rotation(rotation: Quat, delta: Vec2, sensitivity: f32) -> Quat {
    let (mut yaw, mut pitch, _) = rotation.to_euler(EulerRot::YXZ);
    yaw -= delta.x * sensitivity;
    pitch = (pitch - delta.y * sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

/// Right-drag to look around
pub fn camera_look(
    mouse: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut query: Query<&mut Transform, With<DeviceCamera>>,
) {
    if !mouse.pressed(MouseButton::Right) || mouse_motion.delta == Vec2::ZERO {
        return;
    }

    for mut transform in &mut query {
        transform.rotation =
            look_rotation(transform.rotation, mouse_motion.delta, CAMERA_LOOK_SENSITIVITY);
    }
}

/// WASD walks along the view direction, Q/E lowers and raises the device
pub fn camera_movement(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<&mut Transform, With<DeviceCamera>>,
) {
    let dt = time.delta_secs();

    for mut transform in &mut query {
        let forward = transform.forward().as_vec3();
        let right = transform.right().as_vec3();

        let mut velocity = Vec3::ZERO;
        if keys.pressed(KeyCode::KeyW) {
            velocity += forward;
        }
        if keys.pressed(KeyCode::KeyS) {
            velocity -= forward;
        }
        if keys.pressed(KeyCode::KeyD) {
            velocity += right;
        }
        if keys.pressed(KeyCode::KeyA) {
            velocity -= right;
        }
        if keys.pressed(KeyCode::KeyE) {
            velocity += Vec3::Y;
        }
        if keys.pressed(KeyCode::KeyQ) {
            velocity -= Vec3::Y;
        }

        if velocity != Vec3::ZERO {
            transform.translation += velocity.normalize() * CAMERA_MOVE_SPEED * dt;
        }
    }
}
