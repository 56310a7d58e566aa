//! Scene module - bundled node templates and body spawning
//!
//! `SceneBodies` is the host side of `PhysicsScene`: it turns body descriptions
//! into entities with a collider, physics components and one mesh per part.

use avian3d::prelude::*;
use bevy::ecs::entity::Entities;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::constants::*;
use crate::physics::{ImpulseQueue, body_collider};
use crate::platform::{BodyDesc, BodyKind, NodeTemplate, PhysicsScene, Shape, ShapePart};
use crate::tuning::PhysicsTuning;

/// Named node templates grouped by asset
#[derive(Resource, Debug, Clone)]
pub struct AssetStore {
    assets: HashMap<String, Vec<NodeTemplate>>,
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl AssetStore {
    pub fn empty() -> Self {
        Self {
            assets: HashMap::new(),
        }
    }

    /// Store holding the bundled hoop
    pub fn with_builtin() -> Self {
        let mut store = Self::empty();
        store.insert(HOOP_ASSET, hoop_template());
        store
    }

    pub fn insert(&mut self, asset: &str, template: NodeTemplate) {
        let nodes = self.assets.entry(asset.to_string()).or_default();
        nodes.retain(|n| n.name != template.name);
        nodes.push(template);
    }

    pub fn node(&self, asset: &str, node: &str) -> Option<&NodeTemplate> {
        self.assets.get(asset)?.iter().find(|n| n.name == node)
    }
}

/// Backboard hoop standing on its base. The rim opens toward +Z.
pub fn hoop_template() -> NodeTemplate {
    let board_z = -(HOOP_RIM_MAJOR_RADIUS + 0.1);
    let pole_z = board_z - HOOP_BOARD_HALF.z - HOOP_POLE_HALF.z;
    let base_top = HOOP_BASE_HALF.y * 2.0;

    NodeTemplate {
        name: HOOP_NODE.to_string(),
        parts: vec![
            ShapePart {
                offset: Vec3::new(0.0, HOOP_BASE_HALF.y, pole_z),
                shape: Shape::Cuboid {
                    half_extents: HOOP_BASE_HALF,
                },
                color: HOOP_POLE_COLOR,
            },
            ShapePart {
                offset: Vec3::new(0.0, base_top + HOOP_POLE_HALF.y, pole_z),
                shape: Shape::Cuboid {
                    half_extents: HOOP_POLE_HALF,
                },
                color: HOOP_POLE_COLOR,
            },
            ShapePart {
                offset: Vec3::new(0.0, HOOP_RIM_HEIGHT + 0.3, board_z),
                shape: Shape::Cuboid {
                    half_extents: HOOP_BOARD_HALF,
                },
                color: HOOP_BOARD_COLOR,
            },
            ShapePart {
                offset: Vec3::new(0.0, HOOP_RIM_HEIGHT, 0.0),
                shape: Shape::Torus {
                    major_radius: HOOP_RIM_MAJOR_RADIUS,
                    minor_radius: HOOP_RIM_MINOR_RADIUS,
                },
                color: HOOP_RIM_COLOR,
            },
        ],
    }
}

pub fn shape_mesh(shape: Shape) -> Mesh {
    match shape {
        Shape::Sphere { radius } => Sphere::new(radius).mesh().uv(32, 18),
        Shape::Cuboid { half_extents } => Cuboid::from_size(half_extents * 2.0).into(),
        Shape::Torus {
            major_radius,
            minor_radius,
        } => Torus {
            minor_radius,
            major_radius,
        }
        .into(),
    }
}

#[derive(SystemParam)]
pub struct SceneBodies<'w, 's> {
    commands: Commands<'w, 's>,
    entities: &'w Entities,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    store: Res<'w, AssetStore>,
    physics: Res<'w, PhysicsTuning>,
    impulses: ResMut<'w, ImpulseQueue>,
    bodies: Query<'w, 's, (Entity, &'static Name), With<RigidBody>>,
    /// Bodies spawned by this system that the query may not see yet
    spawned: Local<'s, Vec<(Entity, String)>>,
}

impl PhysicsScene for SceneBodies<'_, '_> {
    type Body = Entity;

    fn load_node(&mut self, asset: &str, node: &str) -> Option<NodeTemplate> {
        self.store.node(asset, node).cloned()
    }

    fn add_body(&mut self, desc: BodyDesc) -> Entity {
        let bodies = &self.bodies;
        let entities = self.entities;
        self.spawned
            .retain(|(e, _)| entities.contains(*e) && !bodies.contains(*e));

        let restitution =
            Restitution::new(desc.restitution).with_combine_rule(CoefficientCombine::Multiply);
        let mut entity = self.commands.spawn((
            Name::new(desc.tag.clone()),
            rigid_body(desc.kind),
            body_collider(&desc.parts),
            restitution,
            Friction::new(self.physics.friction),
            Transform::from_translation(desc.position),
            Visibility::default(),
        ));
        if desc.kind == BodyKind::Dynamic {
            entity.insert((
                Mass(BODY_MASS),
                SweptCcd::default(),
                LinearVelocity::default(),
                AngularVelocity(desc.angular_velocity),
            ));
        }

        let meshes = &mut self.meshes;
        let materials = &mut self.materials;
        entity.with_children(|parent| {
            for part in &desc.parts {
                parent.spawn((
                    Mesh3d(meshes.add(shape_mesh(part.shape))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: part.color,
                        perceptual_roughness: 0.6,
                        ..default()
                    })),
                    Transform::from_translation(part.offset),
                ));
            }
        });

        let id = entity.id();
        debug!("Spawned {} at {:?}", desc.tag, desc.position);
        self.spawned.push((id, desc.tag));
        id
    }

    fn apply_impulse(&mut self, body: Entity, impulse: Vec3) {
        self.impulses.push(body, impulse);
    }

    fn remove_nodes(&mut self, tag: &str) -> usize {
        let entities = self.entities;
        let mut doomed: Vec<Entity> = self
            .bodies
            .iter()
            .filter(|(_, name)| name.as_str() == tag)
            .map(|(entity, _)| entity)
            .collect();
        self.spawned.retain(|(entity, spawned_tag)| {
            if spawned_tag != tag {
                return entities.contains(*entity);
            }
            if entities.contains(*entity) && !doomed.contains(entity) {
                doomed.push(*entity);
            }
            false
        });

        for entity in &doomed {
            self.commands.entity(*entity).try_despawn();
        }
        doomed.len()
    }
}

fn rigid_body(kind: BodyKind) -> RigidBody {
    match kind {
        BodyKind::Static => RigidBody::Static,
        BodyKind::Dynamic => RigidBody::Dynamic,
    }
}
