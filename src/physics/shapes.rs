//! Collider construction for body parts

use avian3d::prelude::*;
use bevy::prelude::*;
use std::f32::consts::TAU;

use crate::platform::{Shape, ShapePart};

/// Capsules per torus ring
pub const RING_SEGMENTS: usize = 16;

/// Chord endpoints around a ring of `major_radius` in the local XZ plane
pub fn ring_segments(major_radius: f32, segments: usize) -> Vec<(Vec3, Vec3)> {
    let point = |i: usize| {
        let angle = TAU * i as f32 / segments as f32;
        Vec3::new(angle.cos(), 0.0, angle.sin()) * major_radius
    };
    (0..segments).map(|i| (point(i), point(i + 1))).collect()
}

/// Primitive colliders for one part, positioned in body space.
/// A torus becomes a chain of capsules since avian has no torus shape.
fn part_colliders(part: &ShapePart) -> Vec<(Position, Rotation, Collider)> {
    match part.shape {
        Shape::Sphere { radius } => vec![(
            Position(part.offset),
            Rotation::default(),
            Collider::sphere(radius),
        )],
        Shape::Cuboid { half_extents } => {
            let size = half_extents * 2.0;
            vec![(
                Position(part.offset),
                Rotation::default(),
                Collider::cuboid(size.x, size.y, size.z),
            )]
        }
        Shape::Torus {
            major_radius,
            minor_radius,
        } => ring_segments(major_radius, RING_SEGMENTS)
            .into_iter()
            .map(|(a, b)| {
                (
                    Position::default(),
                    Rotation::default(),
                    Collider::capsule_endpoints(minor_radius, part.offset + a, part.offset + b),
                )
            })
            .collect(),
    }
}

/// Collider for a whole body. Compound shapes stay flat; parry rejects
/// nested compounds.
pub fn body_collider(parts: &[ShapePart]) -> Collider {
    let mut leaves: Vec<_> = parts.iter().flat_map(part_colliders).collect();
    if leaves.len() == 1
        && leaves[0].0.0 == Vec3::ZERO
        && let Some((_, _, collider)) = leaves.pop()
    {
        return collider;
    }
    Collider::compound(leaves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_segments_close_the_loop() {
        let segments = ring_segments(0.35, RING_SEGMENTS);
        assert_eq!(segments.len(), RING_SEGMENTS);
        for (a, b) in &segments {
            assert!((a.length() - 0.35).abs() < 1e-5);
            assert!((b.length() - 0.35).abs() < 1e-5);
            assert_eq!(a.y, 0.0);
        }
        for pair in segments.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert!(segments[RING_SEGMENTS - 1].1.abs_diff_eq(segments[0].0, 1e-5));
    }

    #[test]
    fn test_torus_part_becomes_capsules_at_its_offset() {
        let part = ShapePart {
            offset: Vec3::new(0.0, 2.0, 0.0),
            shape: Shape::Torus {
                major_radius: 0.35,
                minor_radius: 0.025,
            },
            color: Color::WHITE,
        };
        let leaves = part_colliders(&part);
        assert_eq!(leaves.len(), RING_SEGMENTS);
        assert!(leaves.iter().all(|(position, _, _)| position.0 == Vec3::ZERO));
    }

    #[test]
    fn test_offset_cuboid_keeps_its_position() {
        let part = ShapePart {
            offset: Vec3::new(0.0, 1.0, -0.5),
            shape: Shape::Cuboid {
                half_extents: Vec3::splat(0.1),
            },
            color: Color::WHITE,
        };
        let leaves = part_colliders(&part);
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].0.0, Vec3::new(0.0, 1.0, -0.5));
    }
}
