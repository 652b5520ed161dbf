//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph, the physics
//! bridge and the property accessor. Conventions follow a Y-up right-handed
//! frame where local -Z is "ahead".

use serde::{Deserialize, Serialize};

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
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
    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
    
    /// Create a transform from a transformation matrix
    ///
    /// Shear introduced by non-uniform scale under rotation is dropped. A
    /// mirrored basis (negative determinant) is reported as a negative X
    /// scale so the rotation stays proper.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);
        
        let axis_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31);
        let axis_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32);
        let axis_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33);
        
        let mut scale_x = axis_x.magnitude();
        if axis_x.dot(&axis_y.cross(&axis_z)) < 0.0 {
            scale_x = -scale_x;
        }
        let scale_y = axis_y.magnitude();
        let scale_z = axis_z.magnitude();
        let scale = Vec3::new(scale_x, scale_y, scale_z);
        
        if scale_x.abs() <= f32::EPSILON || scale_y <= f32::EPSILON || scale_z <= f32::EPSILON {
            return Self { position, rotation: Quat::identity(), scale };
        }
        
        // Extract rotation by removing scale from the rotation matrix
        let rotation_matrix = Matrix3::new(
            matrix.m11 / scale_x, matrix.m12 / scale_y, matrix.m13 / scale_z,
            matrix.m21 / scale_x, matrix.m22 / scale_y, matrix.m23 / scale_z,
            matrix.m31 / scale_x, matrix.m32 / scale_y, matrix.m33 / scale_z,
        );
        let rotation = Quat::from_matrix(&rotation_matrix);
        
        Self {
            position,
            rotation,
            scale,
        }
    }
}

/// Euler angles in radians, applied in XYZ order (`R = Rx * Ry * Rz`)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Euler {
    /// Rotation about X
    pub x: f32,
    /// Rotation about Y
    pub y: f32,
    /// Rotation about Z
    pub z: f32,
}

impl Euler {
    /// Create from three angles in radians
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
    
    /// Convert to a unit quaternion
    pub fn to_quat(self) -> Quat {
        Quat::from_axis_angle(&Vec3::x_axis(), self.x)
            * Quat::from_axis_angle(&Vec3::y_axis(), self.y)
            * Quat::from_axis_angle(&Vec3::z_axis(), self.z)
    }
    
    /// Decompose a quaternion into XYZ angles
    pub fn from_quat(rotation: &Quat) -> Self {
        let m = rotation.to_rotation_matrix().into_inner();
        let m13 = m[(0, 2)].clamp(-1.0, 1.0);
        let y = m13.asin();
        
        if m13.abs() < 0.999_999_9 {
            Self {
                x: (-m[(1, 2)]).atan2(m[(2, 2)]),
                y,
                z: (-m[(0, 1)]).atan2(m[(0, 0)]),
            }
        } else {
            Self {
                x: m[(2, 1)].atan2(m[(1, 1)]),
                y,
                z: 0.0,
            }
        }
    }
}

/// Rotation that points the local `+Z` axis along `direction`.
///
/// Returns `None` for a zero-length direction. When `direction` is parallel
/// to `up`, a fallback up vector is used.
pub fn face_towards(direction: &Vec3, up: &Vec3) -> Option<Quat> {
    if direction.magnitude_squared() <= f32::EPSILON {
        return None;
    }
    let dir = direction.normalize();
    let up = if dir.cross(up).magnitude_squared() <= 1e-8 {
        Vec3::z()
    } else {
        *up
    };
    Some(Quat::face_towards(&dir, &up))
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;
}
