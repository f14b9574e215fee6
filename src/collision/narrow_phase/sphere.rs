use crate::collision::CollisionResult;
use crate::error::Result;
use crate::geometry::Shape;
use crate::math::{consts::EPSILON, Real, Transform, Vec3};

use super::{expect_box, expect_plane, expect_sphere};

/// Sphere vs sphere: overlapping when the centre distance is below the radius sum.
pub fn sphere_sphere(
    shape_a: &Shape,
    transform_a: &Transform,
    shape_b: &Shape,
    transform_b: &Transform,
) -> Result<CollisionResult> {
    let ra = expect_sphere(shape_a)?.radius();
    let rb = expect_sphere(shape_b)?.radius();

    let diff = transform_b.position - transform_a.position;
    let dist_sq = diff.norm_squared();
    let sum_r = ra + rb;

    if dist_sq >= sum_r * sum_r {
        return Ok(CollisionResult::separated());
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > EPSILON {
        diff / dist
    } else {
        // Coincident centres: any axis separates them
        Vec3::y()
    };
    let depth = sum_r - dist;
    let point = transform_a.position + normal * (ra - 0.5 * depth);

    Ok(CollisionResult::hit(normal, depth, point))
}

/// Sphere vs infinite plane.
///
/// The sphere collides while `|dot(centre - plane_point, plane_normal)| < radius`.
/// Touching exactly at the radius is not a collision.
pub fn sphere_plane(
    shape_a: &Shape,
    transform_a: &Transform,
    shape_b: &Shape,
    transform_b: &Transform,
) -> Result<CollisionResult> {
    let radius = expect_sphere(shape_a)?.radius();
    let plane_normal = expect_plane(shape_b)?.normal(transform_b);

    let distance = (transform_a.position - transform_b.position).dot(&plane_normal);
    if distance.abs() >= radius {
        return Ok(CollisionResult::separated());
    }

    let normal = if distance >= 0.0 {
        -plane_normal
    } else {
        plane_normal
    };
    let point = transform_a.position + normal * distance.abs();

    Ok(CollisionResult::hit(normal, radius - distance.abs(), point))
}

/// Sphere vs oriented box.
///
/// Works in the box frame: the closest box point to the sphere centre decides
/// overlap. A centre inside the box resolves along the nearest face.
pub fn sphere_box(
    shape_a: &Shape,
    transform_a: &Transform,
    shape_b: &Shape,
    transform_b: &Transform,
) -> Result<CollisionResult> {
    let radius = expect_sphere(shape_a)?.radius();
    let h = expect_box(shape_b)?.half_extents();

    let centre = transform_b.inverse_transform_point(&transform_a.position);
    let closest = Vec3::new(
        centre.x.clamp(-h.x, h.x),
        centre.y.clamp(-h.y, h.y),
        centre.z.clamp(-h.z, h.z),
    );

    let diff = centre - closest;
    let dist_sq = diff.norm_squared();
    if dist_sq >= radius * radius {
        return Ok(CollisionResult::separated());
    }

    let (local_normal, depth, local_point) = if dist_sq > EPSILON * EPSILON {
        let dist = dist_sq.sqrt();
        (-diff / dist, radius - dist, closest)
    } else {
        let (axis, gap) = nearest_face(&centre, &h);
        let sign = centre[axis].signum();
        let mut outward = Vec3::zeros();
        outward[axis] = sign;
        let mut on_face = centre;
        on_face[axis] = sign * h[axis];
        (-outward, radius + gap, on_face)
    };

    Ok(CollisionResult::hit(
        transform_b.transform_vector(&local_normal),
        depth,
        transform_b.transform_point(&local_point),
    ))
}

// Axis whose face is closest to an interior point, and the distance to it.
fn nearest_face(point: &Vec3, half_extents: &Vec3) -> (usize, Real) {
    (0..3)
        .map(|i| (i, half_extents[i] - point[i].abs()))
        .fold((0, Real::INFINITY), |best, candidate| {
            if candidate.1 < best.1 {
                candidate
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quat;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn at(x: Real, y: Real, z: Real) -> Transform {
        Transform::from_position(Vec3::new(x, y, z))
    }

    #[test]
    fn test_spheres_overlapping() {
        let s = Shape::sphere(1.0).unwrap();
        let result = sphere_sphere(&s, &at(0.0, 0.0, 0.0), &s, &at(1.5, 0.0, 0.0)).unwrap();

        assert!(result.colliding);
        assert_relative_eq!(result.normal, Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(result.depth, 0.5, epsilon = 1e-12);
        assert_relative_eq!(result.point, Vec3::new(0.75, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_spheres_touching_are_separate() {
        let s = Shape::sphere(1.0).unwrap();
        let result = sphere_sphere(&s, &at(0.0, 0.0, 0.0), &s, &at(2.0, 0.0, 0.0)).unwrap();
        assert!(!result.colliding);
    }

    #[test]
    fn test_sphere_plane_boundary() {
        let sphere = Shape::sphere(1.0).unwrap();
        let plane = Shape::plane(Vec3::new(10.0, 0.0, 10.0)).unwrap();
        let ground = Transform::identity();

        let inside = sphere_plane(&sphere, &at(0.0, 0.999, 0.0), &plane, &ground).unwrap();
        assert!(inside.colliding);
        assert_relative_eq!(inside.normal, -Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(inside.depth, 0.001, epsilon = 1e-12);

        let touching = sphere_plane(&sphere, &at(0.0, 1.0, 0.0), &plane, &ground).unwrap();
        assert!(!touching.colliding);

        let outside = sphere_plane(&sphere, &at(0.0, 1.001, 0.0), &plane, &ground).unwrap();
        assert!(!outside.colliding);
    }

    #[test]
    fn test_sphere_below_plane() {
        let sphere = Shape::sphere(1.0).unwrap();
        let plane = Shape::plane(Vec3::new(10.0, 0.0, 10.0)).unwrap();

        let result =
            sphere_plane(&sphere, &at(3.0, -0.5, 0.0), &plane, &Transform::identity()).unwrap();
        assert!(result.colliding);
        assert_relative_eq!(result.normal, Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(result.point, Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_sphere_plane_uses_plane_orientation() {
        let sphere = Shape::sphere(1.0).unwrap();
        let plane = Shape::plane(Vec3::new(10.0, 0.0, 10.0)).unwrap();
        // Quarter turn about Z: the plane normal becomes -X
        let wall = Transform::from_orientation(Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2));

        let beside = sphere_plane(&sphere, &at(0.5, 5.0, 0.0), &plane, &wall).unwrap();
        assert!(beside.colliding);

        let above = sphere_plane(&sphere, &at(2.0, 0.5, 0.0), &plane, &wall).unwrap();
        assert!(!above.colliding);
    }

    #[test]
    fn test_sphere_box_outside_face() {
        let sphere = Shape::sphere(0.5).unwrap();
        let cube = Shape::cuboid(Vec3::repeat(1.0)).unwrap();

        let result = sphere_box(&sphere, &at(1.3, 0.0, 0.0), &cube, &Transform::identity()).unwrap();
        assert!(result.colliding);
        assert_relative_eq!(result.normal, -Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(result.depth, 0.2, epsilon = 1e-12);
        assert_relative_eq!(result.point, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);

        let miss = sphere_box(&sphere, &at(1.6, 0.0, 0.0), &cube, &Transform::identity()).unwrap();
        assert!(!miss.colliding);
    }

    #[test]
    fn test_sphere_box_centre_inside() {
        let sphere = Shape::sphere(0.5).unwrap();
        let cube = Shape::cuboid(Vec3::repeat(1.0)).unwrap();

        let result = sphere_box(&sphere, &at(0.0, 0.8, 0.0), &cube, &Transform::identity()).unwrap();
        assert!(result.colliding);
        assert_relative_eq!(result.normal, -Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(result.depth, 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_sphere_box_corner_rotated() {
        let sphere = Shape::sphere(0.5).unwrap();
        let cube = Shape::cuboid(Vec3::repeat(1.0)).unwrap();
        // Rotated 45 degrees about Z the corner reaches sqrt(2) along X
        let diamond = Transform::from_orientation(Quat::from_axis_angle(
            &Vec3::z_axis(),
            std::f64::consts::FRAC_PI_4,
        ));

        let hit = sphere_box(&sphere, &at(1.8, 0.0, 0.0), &cube, &diamond).unwrap();
        assert!(hit.colliding);

        let miss = sphere_box(&sphere, &at(2.0, 0.0, 0.0), &cube, &diamond).unwrap();
        assert!(!miss.colliding);
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        let cube = Shape::cuboid(Vec3::repeat(1.0)).unwrap();
        let t = Transform::identity();
        assert!(sphere_sphere(&cube, &t, &cube, &t).is_err());
    }
}
