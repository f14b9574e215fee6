use crate::collision::CollisionResult;
use crate::error::Result;
use crate::geometry::Shape;
use crate::math::{consts::EPSILON, Transform};

use super::{expect_box, expect_plane};

/// Infinite plane vs oriented box.
///
/// The box straddles the plane while the distance from its centre to the plane
/// is below its radius projected onto the plane normal. The reported contact
/// point is the box vertex deepest behind the plane.
pub fn plane_box(
    shape_a: &Shape,
    transform_a: &Transform,
    shape_b: &Shape,
    transform_b: &Transform,
) -> Result<CollisionResult> {
    let plane_normal = expect_plane(shape_a)?.normal(transform_a);
    let cuboid = expect_box(shape_b)?;

    let distance = (transform_b.position - transform_a.position).dot(&plane_normal);
    let radius = cuboid.projected_radius(transform_b, &plane_normal);
    if distance.abs() >= radius {
        return Ok(CollisionResult::separated());
    }

    let normal = if distance >= 0.0 {
        plane_normal
    } else {
        -plane_normal
    };
    let point = cuboid.support(transform_b, &-normal);

    Ok(CollisionResult::hit(normal, radius - distance.abs(), point))
}

/// Infinite plane vs infinite plane.
///
/// Planes whose normals are not parallel always cross; the contact point is
/// the point of the intersection line nearest the first plane's origin.
/// Crossing planes report the second plane's normal, turned to point from
/// the first plane toward it. Parallel planes only touch when coplanar and
/// report the first plane's normal. Infinite planes have no finite overlap, so the depth is always zero.
pub fn plane_plane(
    shape_a: &Shape,
    transform_a: &Transform,
    shape_b: &Shape,
    transform_b: &Transform,
) -> Result<CollisionResult> {
    let normal_a = expect_plane(shape_a)?.normal(transform_a);
    let normal_b = expect_plane(shape_b)?.normal(transform_b);
    let offset = transform_b.position - transform_a.position;

    let line = normal_a.cross(&normal_b);
    let line_sq = line.norm_squared();
    if line_sq.sqrt() <= EPSILON {
        let distance = offset.dot(&normal_a);
        if distance.abs() >= EPSILON {
            return Ok(CollisionResult::separated());
        }
        let point = transform_b.position - normal_a * distance;
        return Ok(CollisionResult::hit(normal_a, 0.0, point));
    }

    // Plane a through the origin, plane b at distance `height` along its normal
    let height = offset.dot(&normal_b);
    let point = transform_a.position + line.cross(&normal_a) * (height / line_sq);
    let normal = if height >= 0.0 { normal_b } else { -normal_b };

    Ok(CollisionResult::hit(normal, 0.0, point))
}
