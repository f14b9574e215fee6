//! Collision response.
//!
//! Responses run between collision detection and integration. They change
//! momentum directly, so their effect is visible in the same step.

mod response;

pub use response::{resolve, CollisionResponse, DEFAULT_RESTITUTION};
