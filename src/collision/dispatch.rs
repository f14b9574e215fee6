//! Shape-pair collision dispatch.
//!
//! A fixed table indexed by `[ShapeKind][ShapeKind]` maps each pair to its
//! narrow-phase test. Pairs are canonicalized so the lower-ranked shape comes
//! first, so only the upper triangle holds real tests. Cells below the
//! diagonal are still defined and fail with [`PhysicsError::NonCanonicalPair`].

use crate::error::{PhysicsError, Result};
use crate::geometry::{Shape, ShapeKind};
use crate::math::Transform;

use super::contact::CollisionResult;
use super::narrow_phase::{box_box, plane_box, plane_plane, sphere_box, sphere_plane, sphere_sphere};

/// Signature shared by every narrow-phase test.
pub type NarrowPhaseFn = fn(&Shape, &Transform, &Shape, &Transform) -> Result<CollisionResult>;

const DISPATCH_TABLE: [[NarrowPhaseFn; ShapeKind::COUNT]; ShapeKind::COUNT] = [
    // Sphere row
    [sphere_sphere, sphere_plane, sphere_box],
    // Plane row
    [non_canonical, plane_plane, plane_box],
    // Box row
    [non_canonical, non_canonical, box_box],
];

/// Looks up the table entry for an ordered pair of kinds.
#[inline]
pub fn lookup(first: ShapeKind, second: ShapeKind) -> NarrowPhaseFn {
    DISPATCH_TABLE[first.index()][second.index()]
}

/// Tests two placed shapes for overlap.
///
/// The pair is reordered into canonical order before lookup; the returned
/// normal always points from `shape_a` toward `shape_b` as passed.
pub fn collide(
    shape_a: &Shape,
    transform_a: &Transform,
    shape_b: &Shape,
    transform_b: &Transform,
) -> Result<CollisionResult> {
    let (kind_a, kind_b) = (shape_a.kind(), shape_b.kind());
    if kind_a <= kind_b {
        lookup(kind_a, kind_b)(shape_a, transform_a, shape_b, transform_b)
    } else {
        lookup(kind_b, kind_a)(shape_b, transform_b, shape_a, transform_a)
            .map(CollisionResult::flipped)
    }
}

fn non_canonical(
    shape_a: &Shape,
    _: &Transform,
    shape_b: &Shape,
    _: &Transform,
) -> Result<CollisionResult> {
    Err(PhysicsError::NonCanonicalPair {
        first: shape_a.kind(),
        second: shape_b.kind(),
    })
}
