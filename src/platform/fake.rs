//! In-memory stand-ins for the host capabilities

use bevy::prelude::*;

use super::*;

#[derive(Default)]
pub struct FakeTracking {
    pub started_with: Option<TrackingConfig>,
    pub pose: Option<CameraPose>,
    /// Returned for every hit-test, regardless of the point
    pub hits: Vec<Vec3>,
    pub hit_tests: Vec<(Vec2, HitTestFilter)>,
}

impl FakeTracking {
    pub fn with_pose(position: Vec3, forward: Vec3) -> Self {
        Self {
            pose: Some(CameraPose { position, forward }),
            ..default()
        }
    }
}

impl Tracking for FakeTracking {
    fn start(&mut self, config: &TrackingConfig) {
        self.started_with = Some(config.clone());
    }

    fn current_camera_pose(&self) -> Option<CameraPose> {
        self.pose
    }

    fn hit_test(&self, _point: Vec2, _filter: HitTestFilter) -> Vec<Vec3> {
        self.hits.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakeBody {
    pub desc: BodyDesc,
    pub impulses: Vec<Vec3>,
}

/// Scene graph as a flat list; removed bodies become `None`
#[derive(Default)]
pub struct FakeScene {
    pub bodies: Vec<Option<FakeBody>>,
    pub missing_assets: bool,
    pub loads: Vec<(String, String)>,
}

impl FakeScene {
    pub fn live(&self) -> impl Iterator<Item = &FakeBody> {
        self.bodies.iter().flatten()
    }

    pub fn count_tagged(&self, tag: &str) -> usize {
        self.live().filter(|b| b.desc.tag == tag).count()
    }

    pub fn last_tagged(&self, tag: &str) -> Option<&FakeBody> {
        self.live().filter(|b| b.desc.tag == tag).last()
    }
}

impl PhysicsScene for FakeScene {
    type Body = usize;

    fn load_node(&mut self, asset: &str, node: &str) -> Option<NodeTemplate> {
        self.loads.push((asset.to_string(), node.to_string()));
        if self.missing_assets {
            return None;
        }
        Some(NodeTemplate {
            name: node.to_string(),
            parts: vec![ShapePart {
                offset: Vec3::ZERO,
                shape: Shape::Cuboid {
                    half_extents: Vec3::ONE,
                },
                color: Color::WHITE,
            }],
        })
    }

    fn add_body(&mut self, desc: BodyDesc) -> usize {
        self.bodies.push(Some(FakeBody {
            desc,
            impulses: Vec::new(),
        }));
        self.bodies.len() - 1
    }

    fn apply_impulse(&mut self, body: usize, impulse: Vec3) {
        if let Some(Some(b)) = self.bodies.get_mut(body) {
            b.impulses.push(impulse);
        }
    }

    fn remove_nodes(&mut self, tag: &str) -> usize {
        let mut removed = 0;
        for slot in &mut self.bodies {
            if slot.as_ref().is_some_and(|b| b.desc.tag == tag) {
                *slot = None;
                removed += 1;
            }
        }
        removed
    }
}

#[derive(Default)]
pub struct FakeNotice {
    pub visible: bool,
    /// Every visibility write, in order
    pub history: Vec<bool>,
}

impl NoticeLabel for FakeNotice {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.history.push(visible);
    }
}
