use nalgebra::{Isometry3, Translation3};

use super::{Mat3, Mat4, Quat, Vec3};

/// Placement of a rigid body: position plus unit-quaternion orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position of the centre of mass in world space
    pub position: Vec3,
    /// Orientation relative to the world frame
    pub orientation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Identity transform (origin, no rotation)
    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: Quat::identity(),
        }
    }

    /// Creates a new transform from position and orientation
    #[inline]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates a transform with only translation
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::identity(),
        }
    }

    /// Creates a transform with only rotation
    #[inline]
    pub fn from_orientation(orientation: Quat) -> Self {
        Self {
            position: Vec3::zeros(),
            orientation,
        }
    }

    /// Returns the orientation as a 3x3 rotation matrix
    #[inline]
    pub fn rotation_matrix(&self) -> Mat3 {
        self.orientation.to_rotation_matrix().into_inner()
    }

    /// Homogeneous matrix `translation(position) · rotation(orientation)`
    #[inline]
    pub fn world_matrix(&self) -> Mat4 {
        Isometry3::from_parts(Translation3::from(self.position), self.orientation)
            .to_homogeneous()
    }

    /// Transforms a point from local space to world space
    #[inline]
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.orientation * point + self.position
    }

    /// Transforms a direction from local space to world space
    #[inline]
    pub fn transform_vector(&self, vector: &Vec3) -> Vec3 {
        self.orientation * vector
    }

    /// Inverse transforms a point from world space to local space
    #[inline]
    pub fn inverse_transform_point(&self, point: &Vec3) -> Vec3 {
        self.orientation.inverse_transform_vector(&(point - self.position))
    }

    /// Inverse transforms a direction from world space to local space
    #[inline]
    pub fn inverse_transform_vector(&self, vector: &Vec3) -> Vec3 {
        self.orientation.inverse_transform_vector(vector)
    }

    /// Local Y axis in world space; the normal of a plane shape
    #[inline]
    pub fn local_y(&self) -> Vec3 {
        self.orientation * Vec3::y()
    }
}
