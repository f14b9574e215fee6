mod contact;
pub mod dispatch;
pub mod narrow_phase;

pub use contact::{BodyHandle, CollisionResult, Contact};
pub use dispatch::{collide, lookup, NarrowPhaseFn};
