//! Physics step systems
//!
//! `apply_impulses` and `despawn_fallen` run in `FixedUpdate`, ahead of the
//! avian step in `FixedPostUpdate`. `sync_gravity` runs in `Update`.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::constants::BODY_MASS;
use crate::tuning::PhysicsTuning;

/// Impulses waiting for the next physics step.
///
/// Impulses against the same body within one step add up.
#[derive(Resource, Default, Debug)]
pub struct ImpulseQueue {
    pending: Vec<(Entity, Vec3)>,
}

impl ImpulseQueue {
    pub fn push(&mut self, entity: Entity, impulse: Vec3) {
        match self.pending.iter_mut().find(|(e, _)| *e == entity) {
            Some((_, total)) => *total += impulse,
            None => self.pending.push((entity, impulse)),
        }
    }

    pub fn drain(&mut self) -> Vec<(Entity, Vec3)> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Apply queued impulses as velocity changes
pub fn apply_impulses(
    mut queue: ResMut<ImpulseQueue>,
    mut bodies: Query<(&RigidBody, &mut LinearVelocity, Option<&Mass>)>,
) {
    for (entity, impulse) in queue.drain() {
        let Ok((body, mut velocity, mass)) = bodies.get_mut(entity) else {
            debug!("Impulse for missing body {:?} dropped", entity);
            continue;
        };
        if body.is_dynamic() {
            let mass = mass.map_or(BODY_MASS, |m| m.0);
            velocity.0 += impulse / mass;
        }
    }
}

/// Push configured gravity into avian whenever the tuning changes
pub fn sync_gravity(tuning: Res<PhysicsTuning>, mut gravity: ResMut<Gravity>) {
    if tuning.is_changed() {
        gravity.0 = Vec3::NEG_Y * tuning.gravity;
    }
}

/// Despawn dynamic bodies that fell below the kill plane
pub fn despawn_fallen(
    mut commands: Commands,
    tuning: Res<PhysicsTuning>,
    bodies: Query<(Entity, &RigidBody, &Transform, Option<&Name>)>,
) {
    for (entity, body, transform, name) in &bodies {
        if body.is_dynamic() && transform.translation.y < tuning.kill_plane_y {
            debug!(
                "{} fell below kill plane, despawning",
                name.map(|n| n.as_str()).unwrap_or("body")
            );
            commands.entity(entity).despawn();
        }
    }
}
