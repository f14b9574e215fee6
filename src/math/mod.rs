//! Math types and helpers shared by the simulation core.
//!
//! Vectors, matrices and quaternions are `nalgebra` types fixed to `f64`.

mod transform;

use nalgebra::{Matrix3, Matrix4, Quaternion, UnitQuaternion, Vector3};

pub use transform::Transform;

/// Scalar type used throughout the simulation.
pub type Real = f64;
/// 3D column vector.
pub type Vec3 = Vector3<Real>;
/// 3x3 matrix (inertia tensors, rotations).
pub type Mat3 = Matrix3<Real>;
/// 4x4 homogeneous matrix handed to renderers.
pub type Mat4 = Matrix4<Real>;
/// Unit quaternion used for orientations.
pub type Quat = UnitQuaternion<Real>;

/// Common math constants
pub mod consts {
    use super::Real;

    /// A small epsilon value for floating point comparisons
    pub const EPSILON: Real = 1e-9;

    /// Tolerance on `|q| - 1` for orientations read back from the integrator
    pub const UNIT_NORM_TOLERANCE: Real = 1e-6;
}

/// Builds the pure quaternion `(0, v)` used to turn an angular velocity into
/// a quaternion derivative.
#[inline]
pub fn pure_quaternion(v: Vec3) -> Quaternion<Real> {
    Quaternion::from_imag(v)
}

/// Whether `q` has unit norm within [`consts::UNIT_NORM_TOLERANCE`].
#[inline]
pub fn is_unit(q: &Quaternion<Real>) -> bool {
    (q.norm() - 1.0).abs() <= consts::UNIT_NORM_TOLERANCE
}

/// Rotates a body-space tensor into world space: `R · M · Rᵗ`.
#[inline]
pub fn similarity(rotation: &Mat3, tensor: &Mat3) -> Mat3 {
    rotation * tensor * rotation.transpose()
}

/// Component-wise absolute value of a matrix.
#[inline]
pub fn abs_matrix(m: &Mat3) -> Mat3 {
    m.map(Real::abs)
}

/// Returns true if every component is finite.
#[inline]
pub fn is_finite_vec(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_pure_quaternion() {
        let q = pure_quaternion(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(q.w, 0.0);
        assert_eq!(q.imag(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_is_unit() {
        assert!(is_unit(Quat::identity().quaternion()));
        assert!(is_unit(&Quaternion::new(1.0 + 1e-7, 0.0, 0.0, 0.0)));
        assert!(!is_unit(&Quaternion::new(0.5, 0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_similarity_identity_rotation() {
        let tensor = Mat3::from_diagonal(&Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(similarity(&Mat3::identity(), &tensor), tensor);
    }

    #[test]
    fn test_similarity_swaps_axes() {
        // Quarter turn about Z swaps the X and Y moments.
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2)
            .to_rotation_matrix()
            .into_inner();
        let tensor = Mat3::from_diagonal(&Vec3::new(1.0, 2.0, 3.0));
        let world = similarity(&rotation, &tensor);

        assert_relative_eq!(world[(0, 0)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(world[(1, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(world[(2, 2)], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_abs_matrix() {
        let m = Mat3::new(-1.0, 2.0, -3.0, 4.0, -5.0, 6.0, -7.0, 8.0, -9.0);
        assert_eq!(
            abs_matrix(&m),
            Mat3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0)
        );
    }

    #[test]
    fn test_is_finite_vec() {
        assert!(is_finite_vec(&Vec3::new(1.0, 2.0, 3.0)));
        assert!(!is_finite_vec(&Vec3::new(1.0, Real::NAN, 3.0)));
        assert!(!is_finite_vec(&Vec3::new(Real::INFINITY, 0.0, 0.0)));
    }
}
