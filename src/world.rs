use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::collision::{collide, BodyHandle, Contact};
use crate::dynamics::{BodyInfo, BodyLayer, RigidBody, TimedImpulse};
use crate::error::{PhysicsError, Result};
use crate::geometry::{Aabb, Shape};
use crate::math::{Mat4, Quat, Real, Transform, Vec3};
use crate::solver::{resolve, CollisionResponse};

/// Default sub-step length: 60 Hz
pub const DEFAULT_SUB_STEP: Real = 1.0 / 60.0;

/// Configuration for the physics world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Force added to every dynamic body on every step, e.g. gravity
    pub global_force: Option<Vec3>,
    /// Longest integration slice. `None`, zero or a non-finite value
    /// integrates each update in a single step.
    pub fixed_sub_step: Option<Real>,
    /// Upper bound on slices per update
    pub max_sub_steps: usize,
    /// What happens to colliding bodies
    pub response: CollisionResponse,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            global_force: None,
            fixed_sub_step: Some(DEFAULT_SUB_STEP),
            max_sub_steps: 8,
            response: CollisionResponse::default(),
        }
    }
}

impl WorldConfig {
    /// Sets the global force
    pub fn with_global_force(mut self, force: Vec3) -> Self {
        self.global_force = Some(force);
        self
    }

    /// Sets the sub-step length; `None` integrates each update in one slice
    pub fn with_fixed_sub_step(mut self, sub_step: Option<Real>) -> Self {
        self.fixed_sub_step = sub_step;
        self
    }

    /// Sets the maximum number of slices per update
    pub fn with_max_sub_steps(mut self, max_sub_steps: usize) -> Self {
        self.max_sub_steps = max_sub_steps;
        self
    }

    /// Sets the collision response
    pub fn with_response(mut self, response: CollisionResponse) -> Self {
        self.response = response;
        self
    }

    /// Number of slices and slice length used for a frame of `delta` seconds.
    ///
    /// Slices are always equal. When more than `max_sub_steps` would be
    /// needed the slices are stretched instead.
    pub fn sub_steps(&self, delta: Real) -> (usize, Real) {
        let Some(step) = self.fixed_sub_step.filter(|s| s.is_finite() && *s > 0.0) else {
            return (1, delta);
        };

        let needed = ((delta / step).ceil() as usize).max(1);
        let max = self.max_sub_steps.max(1);
        if needed > max {
            warn!(delta, needed, max, "frame delta exceeds sub-step budget, stretching slices");
            return (max, delta / max as Real);
        }
        (needed, delta / needed as Real)
    }
}

/// Owns the bodies and drives the simulation.
///
/// Bodies are addressed by [`BodyHandle`], the body's index at creation.
/// Read accessors given a stale handle return a neutral value and writers do
/// nothing, so a dangling reference in a frame loop cannot bring it down.
pub struct World {
    config: WorldConfig,
    bodies: Vec<RigidBody>,
    /// Collisions found during the most recent slice
    contacts: Vec<Contact>,
    time: Real,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    /// Creates an empty world
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            contacts: Vec::new(),
            time: 0.0,
        }
    }

    /// Returns the world configuration
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Replaces the collision response
    pub fn set_response(&mut self, response: CollisionResponse) {
        self.config.response = response;
    }

    /// Creates a body at the origin with no rotation
    pub fn create_body(&mut self, shape: Arc<Shape>, mass: Real, layer: BodyLayer) -> Result<BodyHandle> {
        self.create_body_at(shape, mass, layer, Vec3::zeros(), Quat::identity())
    }

    /// Creates a body with an explicit initial transform
    pub fn create_body_at(
        &mut self,
        shape: Arc<Shape>,
        mass: Real,
        layer: BodyLayer,
        position: Vec3,
        orientation: Quat,
    ) -> Result<BodyHandle> {
        let body = RigidBody::new(shape, mass, layer, Transform::new(position, orientation))?;
        let handle = BodyHandle::new(self.bodies.len() as u32);
        debug!(?handle, ?layer, kind = ?body.shape().kind(), mass, "created body");
        self.bodies.push(body);
        Ok(handle)
    }

    /// Removes a body and returns it.
    ///
    /// Bodies created after it move down one index, so every handle above
    /// `handle` now names the next body.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        if handle.index() >= self.bodies.len() {
            return None;
        }
        debug!(?handle, shifted = self.bodies.len() - handle.index() - 1, "removed body");
        Some(self.bodies.remove(handle.index()))
    }

    /// Returns the body behind `handle`, if any
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.index())
    }

    /// Returns the body behind `handle` mutably, if any
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.index())
    }

    /// Number of bodies in the world
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Handles of every body in insertion order
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> {
        (0..self.bodies.len() as u32).map(BodyHandle::new)
    }

    /// Iterates over bodies with their handles
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.handles().zip(self.bodies.iter())
    }

    /// Total simulated time in seconds
    pub fn time(&self) -> Real {
        self.time
    }

    /// Collisions found during the most recent slice of the last update
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// World matrix of a body, identity for an unknown handle
    pub fn world_matrix(&self, handle: BodyHandle) -> Mat4 {
        self.body(handle)
            .map(RigidBody::world_matrix)
            .unwrap_or_else(Mat4::identity)
    }

    /// State snapshot of a body, default for an unknown handle
    pub fn info(&self, handle: BodyHandle) -> BodyInfo {
        self.body(handle).map(RigidBody::info).unwrap_or_default()
    }

    /// World bounds of a body, empty for an unknown handle
    pub fn aabb(&self, handle: BodyHandle) -> Aabb {
        self.body(handle).map(RigidBody::aabb).unwrap_or(Aabb::EMPTY)
    }

    /// Sets a body's linear velocity
    pub fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        self.write(handle, "set_linear_velocity", |b| b.set_linear_velocity(velocity));
    }

    /// Sets a body's angular velocity
    pub fn set_angular_velocity(&mut self, handle: BodyHandle, omega: Vec3) {
        self.write(handle, "set_angular_velocity", |b| b.set_angular_velocity(omega));
    }

    /// Adds a force for the next step
    pub fn add_force(&mut self, handle: BodyHandle, force: Vec3) {
        self.write(handle, "add_force", |b| b.add_force(force));
    }

    /// Adds a torque for the next step
    pub fn add_torque(&mut self, handle: BodyHandle, torque: Vec3) {
        self.write(handle, "add_torque", |b| b.add_torque(torque));
    }

    /// Adds a linear impulse for the next step
    pub fn add_impulse(&mut self, handle: BodyHandle, impulse: Vec3) {
        self.write(handle, "add_impulse", |b| b.add_impulse(impulse));
    }

    /// Adds an angular impulse for the next step
    pub fn add_angular_impulse(&mut self, handle: BodyHandle, impulse: Vec3) {
        self.write(handle, "add_angular_impulse", |b| b.add_angular_impulse(impulse));
    }

    /// Queues a timed impulse on a body
    pub fn add_timed_impulse(&mut self, handle: BodyHandle, impulse: TimedImpulse) {
        self.write(handle, "add_timed_impulse", |b| b.add_timed_impulse(impulse));
    }

    fn write(&mut self, handle: BodyHandle, op: &'static str, f: impl FnOnce(&mut RigidBody)) {
        match self.bodies.get_mut(handle.index()) {
            Some(body) => f(body),
            None => debug!(?handle, op, "ignoring write to missing body"),
        }
    }

    /// Replaces the force applied to every dynamic body each step
    pub fn set_global_force(&mut self, force: Vec3) {
        debug!(?force, "global force set");
        self.config.global_force = Some(force);
    }

    /// Removes the global force
    pub fn clear_global_force(&mut self) {
        debug!("global force cleared");
        self.config.global_force = None;
    }

    /// Returns the global force, if set
    pub fn global_force(&self) -> Option<Vec3> {
        self.config.global_force
    }

    /// Tests two bodies for overlap without changing them.
    pub fn is_colliding(&self, a: BodyHandle, b: BodyHandle) -> Result<bool> {
        let body_a = self.body(a).ok_or(PhysicsError::InvalidHandle(a))?;
        let body_b = self.body(b).ok_or(PhysicsError::InvalidHandle(b))?;
        if a == b {
            return Ok(false);
        }
        let result = collide(body_a.shape(), body_a.transform(), body_b.shape(), body_b.transform())?;
        Ok(result.colliding)
    }

    /// Advances the simulation by `delta` seconds.
    ///
    /// The frame is cut into equal slices (see [`WorldConfig::sub_steps`]).
    /// Each slice resolves collisions first, then integrates every dynamic
    /// body with the global force added. Kinematic and static bodies are
    /// never touched.
    ///
    /// Every shape pair has a narrow-phase test, so collision errors only
    /// signal a broken dispatch invariant. A slice that fails is left
    /// unchanged, but slices before it stay applied and `time` is not advanced.
    pub fn update(&mut self, delta: Real) -> Result<()> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(PhysicsError::InvalidTimeStep(delta));
        }
        if delta == 0.0 {
            return Ok(());
        }

        let (count, dt) = self.config.sub_steps(delta);
        for slice in 0..count {
            trace!(slice, dt, "sub-step");
            self.step_slice(dt)?;
        }

        self.time += delta;
        Ok(())
    }

    fn step_slice(&mut self, dt: Real) -> Result<()> {
        self.detect_and_respond()?;
        self.integrate(dt);
        Ok(())
    }

    /// Tests every unordered pair with at least one dynamic body, then applies
    /// the configured response to each colliding pair in `(i, j)` order.
    ///
    /// Detection finishes before any body or stored contact is touched, so a
    /// dispatch error leaves the slice unchanged.
    fn detect_and_respond(&mut self) -> Result<()> {
        let mut contacts = Vec::new();
        for j in 1..self.bodies.len() {
            let body_b = &self.bodies[j];
            for (i, body_a) in self.bodies[..j].iter().enumerate() {
                if !body_a.is_dynamic() && !body_b.is_dynamic() {
                    continue;
                }

                let result = collide(body_a.shape(), body_a.transform(), body_b.shape(), body_b.transform())?;
                if result.colliding {
                    contacts.push(Contact {
                        body_a: BodyHandle::new(i as u32),
                        body_b: BodyHandle::new(j as u32),
                        result,
                    });
                }
            }
        }

        let response = self.config.response;
        for contact in &contacts {
            let (head, tail) = self.bodies.split_at_mut(contact.body_b.index());
            let body_a = &mut head[contact.body_a.index()];
            let body_b = &mut tail[0];
            let applied = resolve(response, contact, body_a, body_b);
            trace!(a = ?contact.body_a, b = ?contact.body_b, depth = contact.result.depth, applied, "collision");
        }
        self.contacts = contacts;
        Ok(())
    }

    fn integrate(&mut self, dt: Real) {
        let global_force = self.config.global_force;
        for body in self.bodies.iter_mut().filter(|b| b.is_dynamic()) {
            if let Some(force) = global_force {
                body.add_force(force);
            }
            body.step(dt);
        }
    }
}
