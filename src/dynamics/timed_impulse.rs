use crate::error::{PhysicsError, Result};
use crate::math::{Real, Vec3};

/// Lifecycle of a [`TimedImpulse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulsePhase {
    /// Nothing consumed yet
    Active,
    /// Some of the duration has been applied
    PartiallyConsumed,
    /// Fully applied; dropped from the queue
    Expired,
}

/// A force applied at a body-space point over a finite duration.
///
/// Each step consumes `min(remaining, dt)` seconds of the impulse, so a long
/// push spread over several frames delivers exactly `force * duration` of
/// momentum in total regardless of how the frames are sliced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedImpulse {
    duration: Real,
    remaining: Real,
    local_point: Vec3,
    force: Vec3,
}

impl TimedImpulse {
    /// Creates a timed impulse. `duration` must be finite and positive.
    pub fn new(duration: Real, local_point: Vec3, force: Vec3) -> Result<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(PhysicsError::InvalidImpulseDuration(duration));
        }
        Ok(Self {
            duration,
            remaining: duration,
            local_point,
            force,
        })
    }

    /// Creates a timed impulse acting through the centre of mass
    pub fn at_center(duration: Real, force: Vec3) -> Result<Self> {
        Self::new(duration, Vec3::zeros(), force)
    }

    pub fn duration(&self) -> Real {
        self.duration
    }

    pub fn remaining(&self) -> Real {
        self.remaining
    }

    pub fn local_point(&self) -> Vec3 {
        self.local_point
    }

    pub fn force(&self) -> Vec3 {
        self.force
    }

    pub fn phase(&self) -> ImpulsePhase {
        if self.remaining <= 0.0 {
            ImpulsePhase::Expired
        } else if self.remaining < self.duration {
            ImpulsePhase::PartiallyConsumed
        } else {
            ImpulsePhase::Active
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.phase() == ImpulsePhase::Expired
    }

    /// Consumes up to `dt` seconds and returns the time actually used.
    pub(crate) fn consume(&mut self, dt: Real) -> Real {
        let used = self.remaining.min(dt);
        self.remaining -= used;
        used
    }
}
