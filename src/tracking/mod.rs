//! Simulated world tracking for the desktop build
//!
//! Stands in for a phone's AR session: a fixed set of real-world horizontal
//! surfaces that get "detected" some time after tracking starts. Detected
//! surfaces become plane anchors, queued for the session's anchor callback, and
//! can be hit-tested with camera rays.

use avian3d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use rand::Rng;

use crate::camera::DeviceCamera;
use crate::constants::{PLANE_THICKNESS, STATIC_RESTITUTION};
use crate::platform::{
    Anchor, CameraPose, HitTestFilter, PlaneAnchor, PlaneDetection, Tracking, TrackingConfig,
};
use crate::tuning::{PhysicsTuning, SurfaceDef, TrackingTuning};

/// Static body spawned for a detected plane
#[derive(Component, Debug, Clone, Copy)]
pub struct DetectedPlane(pub u32);

#[derive(Resource, Debug, Default)]
pub struct SimulatedTracking {
    surfaces: Vec<SurfaceDef>,
    detected: Vec<bool>,
    points_per_plane: usize,
    config: Option<TrackingConfig>,
    /// Seconds since `start`
    clock: f32,
    planes: Vec<PlaneAnchor>,
    new_anchors: Vec<Anchor>,
    feature_points: Vec<Vec3>,
    next_anchor_id: u32,
}

impl SimulatedTracking {
    pub fn new(tuning: &TrackingTuning) -> Self {
        Self {
            surfaces: tuning.surfaces.clone(),
            detected: vec![false; tuning.surfaces.len()],
            points_per_plane: tuning.feature_points_per_plane,
            next_anchor_id: 1,
            ..default()
        }
    }

    pub fn start(&mut self, config: &TrackingConfig) {
        info!("Tracking started: {:?}", config.plane_detection);
        self.config = Some(config.clone());
        self.clock = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.config.is_some()
    }

    /// Advance the tracking clock, detecting surfaces whose time has come.
    /// Returns the planes detected by this call.
    pub fn update(&mut self, delta_secs: f32, rng: &mut impl Rng) -> Vec<PlaneAnchor> {
        let Some(config) = &self.config else {
            return Vec::new();
        };
        // Every simulated surface is horizontal
        if config.plane_detection != PlaneDetection::Horizontal {
            return Vec::new();
        }

        self.clock += delta_secs;

        let mut found = Vec::new();
        for (surface, detected) in self.surfaces.iter().zip(self.detected.iter_mut()) {
            if *detected || self.clock < surface.detect_after_secs {
                continue;
            }
            *detected = true;

            let anchor = PlaneAnchor {
                id: self.next_anchor_id,
                center: surface.center,
                half_extents: surface.half_extents,
            };
            self.next_anchor_id += 1;

            for _ in 0..self.points_per_plane {
                let x = rng.gen_range(-surface.half_extents.x..=surface.half_extents.x);
                let z = rng.gen_range(-surface.half_extents.y..=surface.half_extents.y);
                self.feature_points.push(surface.center + Vec3::new(x, 0.0, z));
            }

            debug!("Surface detected as plane {}", anchor.id);
            self.new_anchors.push(Anchor::Plane(anchor.clone()));
            self.planes.push(anchor.clone());
            found.push(anchor);
        }
        found
    }

    /// Anchors detected since the last call
    pub fn take_new_anchors(&mut self) -> Vec<Anchor> {
        std::mem::take(&mut self.new_anchors)
    }

    pub fn planes(&self) -> &[PlaneAnchor] {
        &self.planes
    }

    pub fn feature_points(&self) -> &[Vec3] {
        &self.feature_points
    }

    /// Intersect a world ray with the detected planes, nearest first.
    /// Hits behind the ray origin are excluded.
    pub fn hit_test_ray(&self, ray: Ray3d, filter: HitTestFilter) -> Vec<Vec3> {
        let mut hits: Vec<(f32, Vec3)> = self
            .planes
            .iter()
            .filter_map(|plane| {
                let distance = ray.intersect_plane(plane.center, InfinitePlane3d::new(Vec3::Y))?;
                let point = ray.get_point(distance);
                match filter {
                    HitTestFilter::ExistingPlaneUsingExtent if !plane.contains_xz(point) => None,
                    _ => Some((distance, point)),
                }
            })
            .collect();

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, point)| point).collect()
    }
}

/// Host side of `Tracking`: the simulated session plus the device camera
#[derive(SystemParam)]
pub struct TrackingHost<'w, 's> {
    tracking: ResMut<'w, SimulatedTracking>,
    cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<DeviceCamera>>,
}

impl Tracking for TrackingHost<'_, '_> {
    fn start(&mut self, config: &TrackingConfig) {
        self.tracking.start(config);
    }

    fn current_camera_pose(&self) -> Option<CameraPose> {
        if !self.tracking.is_running() {
            return None;
        }
        let (_, transform) = self.cameras.single().ok()?;
        Some(CameraPose::from_transform(transform))
    }

    fn hit_test(&self, point: Vec2, filter: HitTestFilter) -> Vec<Vec3> {
        let Ok((camera, transform)) = self.cameras.single() else {
            return Vec::new();
        };
        match camera.viewport_to_world(transform, point) {
            Ok(ray) => self.tracking.hit_test_ray(ray, filter),
            Err(e) => {
                debug!("No ray for {:?}: {:?}", point, e);
                Vec::new()
            }
        }
    }
}

/// Run the tracking clock and give newly detected planes a static body
pub fn advance_tracking(
    mut commands: Commands,
    time: Res<Time>,
    physics: Res<PhysicsTuning>,
    mut tracking: ResMut<SimulatedTracking>,
) {
    let mut rng = rand::thread_rng();
    let found = tracking.update(time.delta_secs(), &mut rng);
    if !physics.planes_solid {
        return;
    }

    for plane in found {
        commands.spawn((
            Name::new(format!("plane_{}", plane.id)),
            DetectedPlane(plane.id),
            RigidBody::Static,
            Restitution::new(STATIC_RESTITUTION).with_combine_rule(CoefficientCombine::Multiply),
            Friction::new(physics.friction),
            Collider::cuboid(
                plane.half_extents.x * 2.0,
                PLANE_THICKNESS,
                plane.half_extents.y * 2.0,
            ),
            Transform::from_translation(plane.center - Vec3::Y * (PLANE_THICKNESS / 2.0)),
        ));
    }
}
