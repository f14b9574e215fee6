//! # rigidsim
//!
//! A small momentum-based 3D rigid body simulator.
//!
//! ## Features
//!
//! - **Momentum dynamics**: linear and angular momentum are the integrated state,
//!   velocities are derived from them
//! - **Quaternion orientation**: renormalized after every step
//! - **Shapes**: Sphere, Plane and Box, with body-space inertia tensors and AABBs
//! - **Collision dispatch**: a table over canonically ordered shape pairs,
//!   including a separating-axis test for oriented boxes
//! - **Sub-stepping**: large frame deltas are split into fixed slices
//! - **Timed impulses**: forces spread over a duration and consumed per step
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use rigidsim::prelude::*;
//!
//! let mut world = World::new(WorldConfig::default().with_global_force(Vec3::new(0.0, -9.8, 0.0)));
//!
//! // A static floor
//! let floor = Arc::new(Shape::plane(Vec3::new(20.0, 0.0, 20.0))?);
//! world.create_body(floor, 0.0, BodyLayer::Static)?;
//!
//! // A falling ball
//! let ball = world.create_body_at(
//!     Arc::new(Shape::sphere(0.5)?),
//!     1.0,
//!     BodyLayer::Dynamic,
//!     Vec3::new(0.0, 5.0, 0.0),
//!     Quat::identity(),
//! )?;
//!
//! let dt = 1.0 / 60.0;
//! for _ in 0..120 {
//!     world.update(dt)?;
//! }
//! assert!(world.info(ball).position.y < 5.0);
//! # Ok::<(), rigidsim::PhysicsError>(())
//! ```

pub mod collision;
pub mod dynamics;
pub mod error;
pub mod geometry;
pub mod math;
pub mod solver;
mod world;

pub use error::{PhysicsError, Result};
pub use world::{World, WorldConfig, DEFAULT_SUB_STEP};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collision::{BodyHandle, CollisionResult, Contact};
    pub use crate::dynamics::{BodyInfo, BodyLayer, ImpulsePhase, RigidBody, TimedImpulse};
    pub use crate::error::{PhysicsError, Result};
    pub use crate::geometry::{Aabb, BoxShape, Plane, Shape, ShapeKind, Sphere};
    pub use crate::math::{Mat3, Mat4, Quat, Real, Transform, Vec3};
    pub use crate::solver::CollisionResponse;
    pub use crate::world::{World, WorldConfig};
}
