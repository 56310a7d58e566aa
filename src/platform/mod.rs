//! Capability interfaces between the session controller and its host
//!
//! The controller only talks to tracking, physics/scene and the notice label
//! through these traits. The Bevy host implements them in `tracking` and
//! `scene`; tests use the fakes in `platform::fake`.

#[cfg(test)]
pub mod fake;

use bevy::prelude::*;

/// Which surfaces the tracking session looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaneDetection {
    #[default]
    Horizontal,
    Vertical,
}

/// Immutable tracking session configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    pub plane_detection: PlaneDetection,
}

impl TrackingConfig {
    pub fn horizontal() -> Self {
        Self {
            plane_detection: PlaneDetection::Horizontal,
        }
    }
}

/// Camera position and unit forward vector in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub forward: Vec3,
}

impl CameraPose {
    /// Pose from a world transform (forward is local -Z)
    pub fn from_transform(transform: &GlobalTransform) -> Self {
        Self {
            position: transform.translation(),
            forward: transform.forward().as_vec3(),
        }
    }
}

/// Hit-test surface filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTestFilter {
    /// Detected planes, limited to their estimated extent
    ExistingPlaneUsingExtent,
    /// Detected planes, treated as infinite
    ExistingPlane,
}

/// A detected horizontal plane
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneAnchor {
    pub id: u32,
    pub center: Vec3,
    /// Half size along world X and Z
    pub half_extents: Vec2,
}

impl PlaneAnchor {
    /// Whether a point on the plane's height lies inside its extent
    pub fn contains_xz(&self, point: Vec3) -> bool {
        (point.x - self.center.x).abs() <= self.half_extents.x
            && (point.z - self.center.z).abs() <= self.half_extents.y
    }
}

/// Anything the tracking subsystem reports
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    Plane(PlaneAnchor),
    /// A tracked point with no surface attached
    Point { id: u32, position: Vec3 },
}

pub trait Tracking {
    fn start(&mut self, config: &TrackingConfig);

    fn current_camera_pose(&self) -> Option<CameraPose>;

    /// World positions hit by the screen point, nearest first
    fn hit_test(&self, point: Vec2, filter: HitTestFilter) -> Vec<Vec3>;
}

// =============================================================================
// PHYSICS / SCENE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Collision shape of one part of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// Ring lying in the local XZ plane
    Torus { major_radius: f32, minor_radius: f32 },
}

/// A shape placed relative to the body origin
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePart {
    pub offset: Vec3,
    pub shape: Shape,
    pub color: Color,
}

/// A loadable scene node: the parts that make up e.g. the hoop model
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTemplate {
    pub name: String,
    pub parts: Vec<ShapePart>,
}

/// Everything needed to create a body in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    /// Shared name tag, used by `remove_nodes`
    pub tag: String,
    pub kind: BodyKind,
    pub parts: Vec<ShapePart>,
    pub position: Vec3,
    pub restitution: f32,
    pub angular_velocity: Vec3,
}

pub trait PhysicsScene {
    type Body: Copy;

    /// Look up a node in a bundled asset
    fn load_node(&mut self, asset: &str, node: &str) -> Option<NodeTemplate>;

    fn add_body(&mut self, desc: BodyDesc) -> Self::Body;

    /// Instantaneous change in momentum
    fn apply_impulse(&mut self, body: Self::Body, impulse: Vec3);

    /// Remove every node carrying `tag`, returning how many went away
    fn remove_nodes(&mut self, tag: &str) -> usize;
}

/// The single transient text label
pub trait NoticeLabel {
    fn set_visible(&mut self, visible: bool);
}

/// Tap gesture registration handed to the host input layer
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapRecognizer {
    /// When false, touch-down/up still reach the controller alongside the tap
    pub cancels_touches: bool,
}
