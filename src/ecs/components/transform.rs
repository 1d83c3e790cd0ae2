//! Transform component for ECS entities.

use glam::{Mat4, Quat, Vec3};

/// World-space transform. Stores position, rotation, and scale separately.
///
/// Local axes follow the actor convention used throughout the crate:
/// forward is local +Z, right is local +X, up is local +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Set the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotate about the world Y axis by `degrees`.
    pub fn with_yaw_degrees(self, degrees: f32) -> Self {
        self.with_rotation(Quat::from_rotation_y(degrees.to_radians()))
    }

    /// Convert to a 4x4 matrix (translation * rotation * scale).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Translation and rotation only; scale is left out.
    pub fn to_rigid_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Unit vector along local +Z.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Unit vector along local +X.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Unit vector along local +Y.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = Transform::identity();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_from_position() {
        let pos = Vec3::new(1.0, 2.0, 3.0);
        let t = Transform::from_position(pos);
        assert_eq!(t.position, pos);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_yaw_basis() {
        let eps = 1e-5;
        let t = Transform::identity().with_yaw_degrees(90.0);
        assert!((t.forward() - Vec3::X).length() < eps);
        assert!((t.right() - Vec3::NEG_Z).length() < eps);
        assert!((t.up() - Vec3::Y).length() < eps);
    }

    #[test]
    fn test_rigid_matrix_ignores_scale() {
        let t = Transform::from_position(Vec3::new(1.0, 0.0, 0.0))
            .with_scale(Vec3::new(2.0, 3.0, 4.0));
        let p = t.to_rigid_matrix().transform_point3(Vec3::ONE);
        assert!((p - Vec3::new(2.0, 1.0, 1.0)).length() < 1e-5);
        let scaled = t.to_matrix().transform_point3(Vec3::ONE);
        assert!((scaled - Vec3::new(3.0, 3.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }
}
