use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::math::{abs_matrix, is_finite_vec, Mat3, Real, Transform, Vec3};

use super::aabb::Aabb;

/// Tag identifying a shape variant.
///
/// The derived ordering `Sphere < Plane < Box` is the canonical order used by
/// collision dispatch: a pair is always tested with the lower-ranked shape first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Sphere,
    Plane,
    Box,
}

impl ShapeKind {
    /// Number of shape kinds (dispatch table dimension)
    pub const COUNT: usize = 3;

    /// Row/column of this kind in the dispatch table
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Immutable geometric description of a rigid body.
///
/// Shapes never change after construction and are shared between bodies
/// through `Arc<Shape>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// A sphere defined by its radius
    Sphere(Sphere),
    /// A plane whose normal is the local Y axis; `extent` sizes it for inertia and bounds
    Plane(Plane),
    /// An oriented box defined by half-extents
    Box(BoxShape),
}

impl Shape {
    /// Creates a sphere shape
    pub fn sphere(radius: Real) -> Result<Self> {
        Sphere::new(radius).map(Self::Sphere)
    }

    /// Creates a plane shape from its half-extent slab
    pub fn plane(extent: Vec3) -> Result<Self> {
        Plane::new(extent).map(Self::Plane)
    }

    /// Creates a box shape from half-extents
    pub fn cuboid(half_extents: Vec3) -> Result<Self> {
        BoxShape::new(half_extents).map(Self::Box)
    }

    /// Returns the shape kind
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Sphere(_) => ShapeKind::Sphere,
            Shape::Plane(_) => ShapeKind::Plane,
            Shape::Box(_) => ShapeKind::Box,
        }
    }

    /// Body-space inertia tensor of this shape with the given mass.
    pub fn body_inertia_tensor(&self, mass: Real) -> Mat3 {
        let diagonal = match self {
            Shape::Sphere(s) => s.inertia_diagonal(mass),
            Shape::Plane(p) => cuboid_inertia_diagonal(&p.extent, mass),
            Shape::Box(b) => cuboid_inertia_diagonal(&b.half_extents, mass),
        };
        Mat3::from_diagonal(&diagonal)
    }

    /// Bounding box in local space (not transformed)
    pub fn local_aabb(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => Aabb::from_center_half_extents(Vec3::zeros(), Vec3::repeat(s.radius)),
            Shape::Plane(p) => Aabb::from_center_half_extents(Vec3::zeros(), p.extent),
            Shape::Box(b) => Aabb::from_center_half_extents(Vec3::zeros(), b.half_extents),
        }
    }

    /// Bounding box enclosing the shape placed by `transform`
    pub fn world_aabb(&self, transform: &Transform) -> Aabb {
        let half_extents = match self {
            Shape::Sphere(s) => Vec3::repeat(s.radius),
            Shape::Plane(p) => oriented_half_extents(transform, &p.extent),
            Shape::Box(b) => oriented_half_extents(transform, &b.half_extents),
        };
        Aabb::from_center_half_extents(transform.position, half_extents)
    }

    /// Returns the sphere payload, if this is a sphere
    #[inline]
    pub fn as_sphere(&self) -> Option<&Sphere> {
        match self {
            Shape::Sphere(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the plane payload, if this is a plane
    #[inline]
    pub fn as_plane(&self) -> Option<&Plane> {
        match self {
            Shape::Plane(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the box payload, if this is a box
    #[inline]
    pub fn as_box(&self) -> Option<&BoxShape> {
        match self {
            Shape::Box(b) => Some(b),
            _ => None,
        }
    }
}

// Summing the absolute rotated axes gives the world extent of an oriented box.
fn oriented_half_extents(transform: &Transform, half_extents: &Vec3) -> Vec3 {
    abs_matrix(&transform.rotation_matrix()) * half_extents
}

// Solid cuboid of full dimensions `2h`: m/12 * (b² + c²) about each axis.
fn cuboid_inertia_diagonal(h: &Vec3, mass: Real) -> Vec3 {
    let d = h * 2.0;
    let (x2, y2, z2) = (d.x * d.x, d.y * d.y, d.z * d.z);
    Vec3::new(y2 + z2, x2 + z2, x2 + y2) * (mass / 12.0)
}

/// A sphere collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius: Real,
}

impl Sphere {
    /// Creates a sphere; the radius must be finite and positive
    pub fn new(radius: Real) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PhysicsError::InvalidShape {
                kind: ShapeKind::Sphere,
                reason: "radius must be finite and positive",
            });
        }
        Ok(Self { radius })
    }

    /// Sphere radius
    #[inline]
    pub fn radius(&self) -> Real {
        self.radius
    }

    fn inertia_diagonal(&self, mass: Real) -> Vec3 {
        Vec3::repeat(0.4 * mass * self.radius * self.radius)
    }
}

/// A plane collision shape.
///
/// Collision treats the plane as infinite, passing through the body position
/// with normal equal to the body's local Y axis. The extent only sizes the
/// inertia approximation and the bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    extent: Vec3,
}

impl Plane {
    /// Creates a plane; at most one extent component may be zero
    pub fn new(extent: Vec3) -> Result<Self> {
        if !is_finite_vec(&extent) || extent.iter().any(|c| *c < 0.0) {
            return Err(PhysicsError::InvalidShape {
                kind: ShapeKind::Plane,
                reason: "extent must be finite and non-negative",
            });
        }
        if extent.iter().filter(|c| **c == 0.0).count() > 1 {
            return Err(PhysicsError::InvalidShape {
                kind: ShapeKind::Plane,
                reason: "extent may be flat along one axis only",
            });
        }
        Ok(Self { extent })
    }

    /// Half-extent slab of the plane
    #[inline]
    pub fn extent(&self) -> Vec3 {
        self.extent
    }

    /// Normal of a plane placed by `transform`
    #[inline]
    pub fn normal(&self, transform: &Transform) -> Vec3 {
        transform.local_y()
    }
}

/// A box (cuboid) collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    half_extents: Vec3,
}

impl BoxShape {
    /// Creates a box; every half-extent must be finite and positive
    pub fn new(half_extents: Vec3) -> Result<Self> {
        if !is_finite_vec(&half_extents) || half_extents.iter().any(|c| *c <= 0.0) {
            return Err(PhysicsError::InvalidShape {
                kind: ShapeKind::Box,
                reason: "half-extents must be finite and positive",
            });
        }
        Ok(Self { half_extents })
    }

    /// Half-extents (half the size in each dimension)
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// World-space face axes of a box placed by `transform`
    #[inline]
    pub fn axes(&self, transform: &Transform) -> [Vec3; 3] {
        let r = transform.rotation_matrix();
        [r.column(0).into_owned(), r.column(1).into_owned(), r.column(2).into_owned()]
    }

    /// Box radius projected onto a world-space axis
    pub fn projected_radius(&self, transform: &Transform, axis: &Vec3) -> Real {
        self.axes(transform)
            .iter()
            .zip(self.half_extents.iter())
            .map(|(a, h)| h * a.dot(axis).abs())
            .sum()
    }

    /// World-space vertex furthest along `direction`
    pub fn support(&self, transform: &Transform, direction: &Vec3) -> Vec3 {
        let local = transform.inverse_transform_vector(direction);
        let h = self.half_extents;
        let corner = Vec3::new(
            if local.x >= 0.0 { h.x } else { -h.x },
            if local.y >= 0.0 { h.y } else { -h.y },
            if local.z >= 0.0 { h.z } else { -h.z },
        );
        transform.transform_point(&corner)
    }
}
