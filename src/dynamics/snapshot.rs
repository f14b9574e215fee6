//! Fixed-size binary snapshot of a body's integrated state.
//!
//! Layout, 14 little-endian `f64` values:
//!
//! | offset | field |
//! |---|---|
//! | 0 | mass |
//! | 8 | position x, y, z |
//! | 32 | orientation w, x, y, z |
//! | 64 | linear momentum x, y, z |
//! | 88 | angular momentum x, y, z |
//!
//! Inertia tensors are not stored; they are recomputed from the shape and mass.

use std::sync::Arc;

use nalgebra::Quaternion;

use crate::error::{PhysicsError, Result};
use crate::geometry::Shape;
use crate::math::{consts::EPSILON, Quat, Real, Transform, Vec3};

use super::rigid_body::{BodyLayer, RigidBody};

const FIELD_COUNT: usize = 14;
const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "mass",
    "position.x",
    "position.y",
    "position.z",
    "orientation.w",
    "orientation.x",
    "orientation.y",
    "orientation.z",
    "linear_momentum.x",
    "linear_momentum.y",
    "linear_momentum.z",
    "angular_momentum.x",
    "angular_momentum.y",
    "angular_momentum.z",
];
const FIELD_SIZE: usize = std::mem::size_of::<Real>();

/// Size in bytes of an encoded body
pub const SNAPSHOT_LEN: usize = FIELD_COUNT * FIELD_SIZE;

impl RigidBody {
    /// Encodes mass, transform and momenta.
    pub fn to_bytes(&self) -> [u8; SNAPSHOT_LEN] {
        let q = self.transform.orientation.into_inner();
        let p = self.transform.position;
        let lin = self.linear_momentum;
        let ang = self.angular_momentum;
        let fields: [Real; FIELD_COUNT] = [
            self.mass, p.x, p.y, p.z, q.w, q.i, q.j, q.k, lin.x, lin.y, lin.z, ang.x, ang.y, ang.z,
        ];

        let mut out = [0u8; SNAPSHOT_LEN];
        for (chunk, value) in out.chunks_exact_mut(FIELD_SIZE).zip(fields) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }

    /// Rebuilds a body from [`RigidBody::to_bytes`] output.
    ///
    /// Shape and layer are not part of the snapshot and must be supplied.
    /// Accumulators and pending timed impulses start empty. Any NaN or
    /// infinite field is rejected with [`PhysicsError::NonFiniteSnapshot`].
    pub fn from_bytes(bytes: &[u8], shape: Arc<Shape>, layer: BodyLayer) -> Result<Self> {
        if bytes.len() != SNAPSHOT_LEN {
            return Err(PhysicsError::SnapshotLength {
                expected: SNAPSHOT_LEN,
                found: bytes.len(),
            });
        }

        let mut fields = [0.0; FIELD_COUNT];
        for (value, chunk) in fields.iter_mut().zip(bytes.chunks_exact(FIELD_SIZE)) {
            let mut raw = [0u8; FIELD_SIZE];
            raw.copy_from_slice(chunk);
            *value = Real::from_le_bytes(raw);
        }
        if let Some((field, _)) = FIELD_NAMES.iter().zip(fields).find(|(_, v)| !v.is_finite()) {
            return Err(PhysicsError::NonFiniteSnapshot { field: *field });
        }

        let [mass, px, py, pz, qw, qx, qy, qz, lx, ly, lz, ax, ay, az] = fields;
        // A zeroed quaternion has no direction; treat it as no rotation
        let orientation = Quat::try_new(Quaternion::new(qw, qx, qy, qz), EPSILON)
            .unwrap_or_else(Quat::identity);
        let transform = Transform::new(Vec3::new(px, py, pz), orientation);

        let mut body = RigidBody::new(shape, mass, layer, transform)?;
        body.linear_momentum = Vec3::new(lx, ly, lz);
        body.angular_momentum = Vec3::new(ax, ay, az);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RigidBody {
        let shape = Arc::new(Shape::cuboid(Vec3::new(0.5, 1.0, 1.5)).unwrap());
        let transform = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_euler_angles(0.3, -0.2, 1.1),
        );
        let mut body = RigidBody::new(shape, 4.0, BodyLayer::Dynamic, transform).unwrap();
        body.set_linear_velocity(Vec3::new(0.5, -1.0, 2.0));
        body.set_angular_velocity(Vec3::new(0.1, 0.2, -0.3));
        body
    }

    #[test]
    fn test_layout() {
        let body = sample();
        let bytes = body.to_bytes();

        assert_eq!(bytes.len(), 112);
        assert_eq!(&bytes[0..8], &4.0f64.to_le_bytes());
        assert_eq!(&bytes[8..16], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[32..40], &body.orientation().w.to_le_bytes());
        assert_eq!(&bytes[64..72], &body.linear_momentum().x.to_le_bytes());
    }

    #[test]
    fn test_restores_state_and_inertia() {
        let body = sample();
        let restored =
            RigidBody::from_bytes(&body.to_bytes(), body.shape().clone(), BodyLayer::Dynamic).unwrap();

        assert_eq!(restored.mass(), body.mass());
        assert_eq!(restored.position(), body.position());
        assert_eq!(restored.linear_momentum(), body.linear_momentum());
        assert_eq!(restored.angular_momentum(), body.angular_momentum());
        assert_eq!(restored.body_inertia(), body.body_inertia());
        assert_eq!(restored.body_inertia_inverse(), body.body_inertia_inverse());
        assert!((restored.orientation().angle_to(&body.orientation())).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_length() {
        let shape = Arc::new(Shape::sphere(1.0).unwrap());
        let result = RigidBody::from_bytes(&[0u8; 100], shape, BodyLayer::Dynamic);
        assert_eq!(
            result.err(),
            Some(PhysicsError::SnapshotLength {
                expected: 112,
                found: 100,
            })
        );
    }

    #[test]
    fn test_zero_quaternion_falls_back_to_identity() {
        let mut bytes = sample().to_bytes();
        bytes[32..64].fill(0);
        let shape = Arc::new(Shape::sphere(1.0).unwrap());
        let body = RigidBody::from_bytes(&bytes, shape, BodyLayer::Dynamic).unwrap();
        assert_eq!(body.orientation(), Quat::identity());
    }

    #[test]
    fn test_non_finite_fields_rejected() {
        let shape = Arc::new(Shape::sphere(1.0).unwrap());
        let cases = [
            (8, Real::NAN, "position.x"),
            (32, Real::NAN, "orientation.w"),
            (64, Real::INFINITY, "linear_momentum.x"),
            (104, Real::NEG_INFINITY, "angular_momentum.z"),
        ];

        for (offset, value, field) in cases {
            let mut bytes = sample().to_bytes();
            bytes[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
            let result = RigidBody::from_bytes(&bytes, shape.clone(), BodyLayer::Dynamic);
            assert_eq!(result.err(), Some(PhysicsError::NonFiniteSnapshot { field }));
        }
    }

    #[test]
    fn test_zero_mass_dynamic_rejected() {
        let shape = Arc::new(Shape::sphere(1.0).unwrap());
        let result = RigidBody::from_bytes(&[0u8; SNAPSHOT_LEN], shape, BodyLayer::Dynamic);
        assert!(matches!(result, Err(PhysicsError::InvalidMass { .. })));
    }
}
