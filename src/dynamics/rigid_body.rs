use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::geometry::{Aabb, Shape};
use crate::math::{similarity, Mat3, Mat4, Quat, Real, Transform, Vec3};

use super::integrator;
use super::timed_impulse::TimedImpulse;

/// The mobility class of a rigid body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyLayer {
    /// Moved by forces, impulses and collisions
    #[default]
    Dynamic,
    /// Moved externally, never by the simulation
    Kinematic,
    /// Never moves
    Static,
}

/// A point-in-time copy of a body's state for diagnostics and overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyInfo {
    pub layer: BodyLayer,
    pub mass: Real,
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_momentum: Vec3,
    pub angular_momentum: Vec3,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub force: Vec3,
    pub torque: Vec3,
    pub impulse: Vec3,
    pub angular_impulse: Vec3,
}

impl Default for BodyInfo {
    fn default() -> Self {
        Self {
            layer: BodyLayer::default(),
            mass: 0.0,
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            linear_momentum: Vec3::zeros(),
            angular_momentum: Vec3::zeros(),
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            force: Vec3::zeros(),
            torque: Vec3::zeros(),
            impulse: Vec3::zeros(),
            angular_impulse: Vec3::zeros(),
        }
    }
}

/// A rigid body driven by momentum.
///
/// Linear and angular momentum are the integrated state; velocities are
/// always derived from them. Forces, torques and impulses accumulate between
/// steps and are cleared by [`RigidBody::step`].
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub(crate) shape: Arc<Shape>,
    pub(crate) layer: BodyLayer,

    // Mass properties
    pub(crate) mass: Real,
    pub(crate) inverse_mass: Real,
    pub(crate) body_inertia: Mat3,
    pub(crate) body_inertia_inverse: Mat3,

    // State
    pub(crate) transform: Transform,
    pub(crate) linear_momentum: Vec3,
    pub(crate) angular_momentum: Vec3,

    // Accumulators, zeroed by every step
    pub(crate) force: Vec3,
    pub(crate) torque: Vec3,
    pub(crate) impulse: Vec3,
    pub(crate) angular_impulse: Vec3,

    pub(crate) timed_impulses: VecDeque<TimedImpulse>,
}

impl RigidBody {
    /// Creates a body at rest.
    ///
    /// Dynamic bodies need a finite positive mass and an invertible inertia
    /// tensor. Kinematic and static bodies accept a zero mass and behave as
    /// if their mass and inertia were infinite.
    pub fn new(shape: Arc<Shape>, mass: Real, layer: BodyLayer, transform: Transform) -> Result<Self> {
        let dynamic = layer == BodyLayer::Dynamic;
        if !mass.is_finite() || mass < 0.0 || (dynamic && mass == 0.0) {
            return Err(PhysicsError::InvalidMass { mass });
        }

        let body_inertia = shape.body_inertia_tensor(mass);
        let (inverse_mass, body_inertia_inverse) = if dynamic {
            let inverse = body_inertia
                .try_inverse()
                .filter(|m| m.iter().all(|c| c.is_finite()))
                .ok_or(PhysicsError::SingularInertia { kind: shape.kind() })?;
            (1.0 / mass, inverse)
        } else {
            (0.0, Mat3::zeros())
        };

        Ok(Self {
            shape,
            layer,
            mass,
            inverse_mass,
            body_inertia,
            body_inertia_inverse,
            transform,
            linear_momentum: Vec3::zeros(),
            angular_momentum: Vec3::zeros(),
            force: Vec3::zeros(),
            torque: Vec3::zeros(),
            impulse: Vec3::zeros(),
            angular_impulse: Vec3::zeros(),
            timed_impulses: VecDeque::new(),
        })
    }

    /// Returns the collision shape
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    /// Returns the body layer
    pub fn layer(&self) -> BodyLayer {
        self.layer
    }

    /// Whether the body is simulated
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.layer == BodyLayer::Dynamic
    }

    /// Returns the mass
    pub fn mass(&self) -> Real {
        self.mass
    }

    /// Zero for kinematic and static bodies
    pub fn inverse_mass(&self) -> Real {
        self.inverse_mass
    }

    /// Inertia tensor in body space
    pub fn body_inertia(&self) -> Mat3 {
        self.body_inertia
    }

    /// Inverse inertia tensor in body space (zero for non-dynamic bodies)
    pub fn body_inertia_inverse(&self) -> Mat3 {
        self.body_inertia_inverse
    }

    /// Inertia tensor rotated into world space: `R * I * R^T`
    pub fn inertia_world(&self) -> Mat3 {
        similarity(&self.transform.rotation_matrix(), &self.body_inertia)
    }

    /// Inverse inertia tensor rotated into world space: `R * I^-1 * R^T`
    pub fn inverse_inertia_world(&self) -> Mat3 {
        similarity(&self.transform.rotation_matrix(), &self.body_inertia_inverse)
    }

    /// Returns the transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Returns the position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Returns the orientation
    pub fn orientation(&self) -> Quat {
        self.transform.orientation
    }

    /// Sets the position
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Sets the orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.transform.orientation = orientation;
    }

    /// Returns the linear momentum
    pub fn linear_momentum(&self) -> Vec3 {
        self.linear_momentum
    }

    /// Returns the angular momentum
    pub fn angular_momentum(&self) -> Vec3 {
        self.angular_momentum
    }

    /// `P / m`, zero for a massless body
    pub fn linear_velocity(&self) -> Vec3 {
        if self.mass > 0.0 {
            self.linear_momentum / self.mass
        } else {
            Vec3::zeros()
        }
    }

    /// `I_world^-1 * L`
    pub fn angular_velocity(&self) -> Vec3 {
        self.inverse_inertia_world() * self.angular_momentum
    }

    /// Overwrites the linear momentum so the body moves at `velocity`.
    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.linear_momentum = velocity * self.mass;
    }

    /// Overwrites the angular momentum so the body spins at the world-space
    /// angular velocity `omega`, using the current world inertia.
    pub fn set_angular_velocity(&mut self, omega: Vec3) {
        self.angular_momentum = self.inertia_world() * omega;
    }

    /// Force accumulated for the next step
    pub fn force(&self) -> Vec3 {
        self.force
    }

    /// Torque accumulated for the next step
    pub fn torque(&self) -> Vec3 {
        self.torque
    }

    /// Linear impulse accumulated for the next step
    pub fn impulse(&self) -> Vec3 {
        self.impulse
    }

    /// Angular impulse accumulated for the next step
    pub fn angular_impulse(&self) -> Vec3 {
        self.angular_impulse
    }

    /// Accumulates a continuous force (N) through the centre of mass
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Accumulates a continuous force at a world point, adding its torque
    pub fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.force += force;
        self.torque += (point - self.transform.position).cross(&force);
    }

    /// Accumulates a continuous torque (N·m)
    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Accumulates an instantaneous impulse (N·s)
    pub fn add_impulse(&mut self, impulse: Vec3) {
        self.impulse += impulse;
    }

    /// Accumulates an instantaneous angular impulse (N·m·s)
    pub fn add_angular_impulse(&mut self, impulse: Vec3) {
        self.angular_impulse += impulse;
    }

    /// Queues a force that is spread over the following steps
    pub fn add_timed_impulse(&mut self, impulse: TimedImpulse) {
        self.timed_impulses.push_back(impulse);
    }

    /// Timed impulses not yet fully applied, in queue order
    pub fn timed_impulses(&self) -> impl Iterator<Item = &TimedImpulse> {
        self.timed_impulses.iter()
    }

    /// Changes momentum immediately, bypassing the accumulators.
    ///
    /// Used by collision response, which runs before integration within the
    /// same step.
    pub fn apply_contact_impulse(&mut self, impulse: Vec3, point: Vec3) {
        if !self.is_dynamic() {
            return;
        }
        self.linear_momentum += impulse;
        self.angular_momentum += (point - self.transform.position).cross(&impulse);
    }

    /// Velocity of a world point rigidly attached to the body
    pub fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        self.linear_velocity() + self.angular_velocity().cross(&(point - self.transform.position))
    }

    /// Advances the body by `dt` seconds and clears the accumulators.
    pub fn step(&mut self, dt: Real) {
        integrator::integrate(self, dt);
    }

    /// Homogeneous world matrix: translation * rotation
    pub fn world_matrix(&self) -> Mat4 {
        self.transform.world_matrix()
    }

    /// World-space bounding box
    pub fn aabb(&self) -> Aabb {
        self.shape.world_aabb(&self.transform)
    }

    /// Snapshot of the body state
    pub fn info(&self) -> BodyInfo {
        BodyInfo {
            layer: self.layer,
            mass: self.mass,
            position: self.transform.position,
            orientation: self.transform.orientation,
            linear_momentum: self.linear_momentum,
            angular_momentum: self.angular_momentum,
            linear_velocity: self.linear_velocity(),
            angular_velocity: self.angular_velocity(),
            force: self.force,
            torque: self.torque,
            impulse: self.impulse,
            angular_impulse: self.angular_impulse,
        }
    }

    pub(crate) fn clear_accumulators(&mut self) {
        self.force = Vec3::zeros();
        self.torque = Vec3::zeros();
        self.impulse = Vec3::zeros();
        self.angular_impulse = Vec3::zeros();
    }
}
