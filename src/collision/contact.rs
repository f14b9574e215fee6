use serde::{Deserialize, Serialize};

use crate::math::{Real, Vec3};

/// A handle to a body in the physics world.
///
/// The handle is the body's index at insertion time. It stays valid for the
/// lifetime of the world unless a removal shifts later bodies down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

impl BodyHandle {
    /// Creates a new body handle
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the index of this handle
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Outcome of a narrow-phase test.
///
/// `normal` points from the first shape passed to the test toward the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub colliding: bool,
    /// Unit contact normal (zero when not colliding)
    pub normal: Vec3,
    /// Penetration depth along the normal (positive when overlapping)
    pub depth: Real,
    /// Approximate world-space contact point
    pub point: Vec3,
}

impl Default for CollisionResult {
    fn default() -> Self {
        Self::separated()
    }
}

impl CollisionResult {
    /// A negative result
    #[inline]
    pub fn separated() -> Self {
        Self {
            colliding: false,
            normal: Vec3::zeros(),
            depth: 0.0,
            point: Vec3::zeros(),
        }
    }

    /// A positive result
    #[inline]
    pub fn hit(normal: Vec3, depth: Real, point: Vec3) -> Self {
        Self {
            colliding: true,
            normal,
            depth,
            point,
        }
    }

    /// The same contact seen from the other shape
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// A positive collision between two bodies found during a world update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Lower-indexed body of the pair
    pub body_a: BodyHandle,
    /// Higher-indexed body of the pair
    pub body_b: BodyHandle,
    /// Narrow-phase result, normal pointing from A toward B
    pub result: CollisionResult,
}
