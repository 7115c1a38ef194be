//! Math utilities and types
//!
//! Placements of parts inside an assembly are plain homogeneous 4x4 matrices.
//! [`Transform`] is the decomposed form used when building placements by hand.

pub use nalgebra::{Vector3, Matrix4, Quaternion, Unit};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type, used for placements
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,
    
    /// Rotation quaternion
    pub rotation: Quat,
    
    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }
    
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
    
    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }
    
    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Translation part of a placement matrix
pub fn translation_of(placement: &Mat4) -> Vec3 {
    Vec3::new(placement.m14, placement.m24, placement.m34)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identity_transform_is_identity_matrix() {
        assert_relative_eq!(Transform::identity().to_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_translation_round_trip() {
        let placement = Transform::from_position(Vec3::new(1.0, -2.0, 3.5)).to_matrix();
        assert_relative_eq!(translation_of(&placement), Vec3::new(1.0, -2.0, 3.5), epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_then_translation_order() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2);
        let placement = Transform::from_position_rotation(Vec3::new(10.0, 0.0, 0.0), rotation).to_matrix();
        let moved = placement.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Point3::new(10.0, 1.0, 0.0), epsilon = 1e-5);
    }
}
