mod integrator;
mod rigid_body;
mod snapshot;
mod timed_impulse;

pub use integrator::integrate;
pub use rigid_body::{BodyInfo, BodyLayer, RigidBody};
pub use snapshot::SNAPSHOT_LEN;
pub use timed_impulse::{ImpulsePhase, TimedImpulse};
