use thiserror::Error;

use crate::collision::BodyHandle;
use crate::geometry::ShapeKind;
use crate::math::Real;

/// Errors raised by the simulation core.
///
/// Construction-time precondition violations, corrupt snapshots and
/// internal dispatch invariants all surface here. Fail-soft accessors on
/// [`World`](crate::World) never produce these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Zero, negative or non-finite mass where a positive one is required.
    #[error("invalid mass {mass}: dynamic bodies need a finite positive mass")]
    InvalidMass {
        /// The rejected mass.
        mass: Real,
    },

    /// Shape dimensions that cannot describe a solid.
    #[error("invalid {kind:?} shape: {reason}")]
    InvalidShape {
        /// Kind of shape being built.
        kind: ShapeKind,
        /// What was wrong with the dimensions.
        reason: &'static str,
    },

    /// The body-space inertia tensor has no inverse.
    #[error("inertia tensor of {kind:?} shape is not invertible")]
    SingularInertia {
        /// Kind of shape the tensor came from.
        kind: ShapeKind,
    },

    /// A dispatch table cell below the diagonal was reached.
    #[error("shape pair ({first:?}, {second:?}) reached dispatch without canonical ordering")]
    NonCanonicalPair {
        /// First shape as dispatched.
        first: ShapeKind,
        /// Second shape as dispatched.
        second: ShapeKind,
    },

    /// A narrow-phase test was handed the wrong kind of shape.
    #[error("narrow phase expected a {expected:?} shape, found {found:?}")]
    ShapeMismatch {
        /// Kind the test handles.
        expected: ShapeKind,
        /// Kind it received.
        found: ShapeKind,
    },

    /// Negative or non-finite simulation delta.
    #[error("invalid time step {0}")]
    InvalidTimeStep(Real),

    /// A body handle that does not refer to a live body.
    #[error("no body with handle {0:?}")]
    InvalidHandle(BodyHandle),

    /// A timed impulse must last for a positive, finite duration.
    #[error("invalid timed impulse duration {0}")]
    InvalidImpulseDuration(Real),

    /// Body snapshot bytes of the wrong length.
    #[error("body snapshot must be {expected} bytes, got {found}")]
    SnapshotLength {
        /// Required length.
        expected: usize,
        /// Length received.
        found: usize,
    },

    /// A snapshot field decoded to NaN or infinity.
    #[error("body snapshot field `{field}` is not finite")]
    NonFiniteSnapshot {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Result alias used across the crate.
pub type Result<T, E = PhysicsError> = std::result::Result<T, E>;
