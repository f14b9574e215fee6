use crate::collision::CollisionResult;
use crate::error::Result;
use crate::geometry::Shape;
use crate::math::{Real, Transform, Vec3};

use super::expect_box;

/// Edge pairs closer to parallel than this produce no separating axis
const PARALLEL_TOLERANCE: Real = 1e-6;

/// Face normals of both boxes plus their nine edge cross products
const AXIS_COUNT: usize = 15;

/// Oriented box vs oriented box using the separating axis theorem.
///
/// Tests the three face normals of each box and the nine edge-edge cross
/// products. Any axis on which the projections do not strictly overlap proves
/// separation; otherwise the axis of least overlap gives the contact normal.
pub fn box_box(
    shape_a: &Shape,
    transform_a: &Transform,
    shape_b: &Shape,
    transform_b: &Transform,
) -> Result<CollisionResult> {
    let box_a = expect_box(shape_a)?;
    let box_b = expect_box(shape_b)?;

    let axes_a = box_a.axes(transform_a);
    let axes_b = box_b.axes(transform_b);
    let half_a = box_a.half_extents();
    let half_b = box_b.half_extents();
    let offset = transform_b.position - transform_a.position;

    let mut candidates = [Vec3::zeros(); AXIS_COUNT];
    candidates[..3].copy_from_slice(&axes_a);
    candidates[3..6].copy_from_slice(&axes_b);
    for (slot, (a, b)) in candidates[6..]
        .iter_mut()
        .zip(axes_a.iter().flat_map(|a| axes_b.iter().map(move |b| (a, b))))
    {
        *slot = a.cross(b);
    }

    // (overlap, normal pointing from A toward B)
    let mut best: Option<(Real, Vec3)> = None;
    for axis in candidates {
        let length = axis.norm();
        if length < PARALLEL_TOLERANCE {
            continue;
        }
        let axis = axis / length;

        let distance = offset.dot(&axis);
        let overlap = project(&axes_a, &half_a, &axis) + project(&axes_b, &half_b, &axis)
            - distance.abs();
        if overlap <= 0.0 {
            return Ok(CollisionResult::separated());
        }

        if best.map_or(true, |(least, _)| overlap < least) {
            let normal = if distance >= 0.0 { axis } else { -axis };
            best = Some((overlap, normal));
        }
    }

    let Some((depth, normal)) = best else {
        return Ok(CollisionResult::separated());
    };

    // Midpoint of the two deepest vertices approximates the contact
    let point = (box_a.support(transform_a, &normal) + box_b.support(transform_b, &-normal)) * 0.5;

    Ok(CollisionResult::hit(normal, depth, point))
}

fn project(axes: &[Vec3; 3], half_extents: &Vec3, axis: &Vec3) -> Real {
    axes.iter()
        .zip(half_extents.iter())
        .map(|(a, h)| h * a.dot(axis).abs())
        .sum()
}
