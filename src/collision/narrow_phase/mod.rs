//! Narrow-phase tests, one per canonical shape pair.
//!
//! Every test takes the lower-ranked shape first and reports a normal that
//! points from the first shape toward the second.

mod obb;
mod plane;
mod sphere;

pub use obb::box_box;
pub use plane::{plane_box, plane_plane};
pub use sphere::{sphere_box, sphere_plane, sphere_sphere};

use crate::error::{PhysicsError, Result};
use crate::geometry::{BoxShape, Plane, Shape, ShapeKind, Sphere};

pub(crate) fn expect_sphere(shape: &Shape) -> Result<&Sphere> {
    shape.as_sphere().ok_or(PhysicsError::ShapeMismatch {
        expected: ShapeKind::Sphere,
        found: shape.kind(),
    })
}

pub(crate) fn expect_plane(shape: &Shape) -> Result<&Plane> {
    shape.as_plane().ok_or(PhysicsError::ShapeMismatch {
        expected: ShapeKind::Plane,
        found: shape.kind(),
    })
}

pub(crate) fn expect_box(shape: &Shape) -> Result<&BoxShape> {
    shape.as_box().ok_or(PhysicsError::ShapeMismatch {
        expected: ShapeKind::Box,
        found: shape.kind(),
    })
}
