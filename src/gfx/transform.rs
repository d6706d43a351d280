use cgmath::{Deg, Matrix4, Rad, Vector3, Zero};

/// Position, Euler rotation (radians, XYZ order) and per-axis scale of an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = Vector3::new(s, s, s);
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotation += Vector3::new(dx, dy, dz);
    }

    /// Rotation in degrees, for display
    pub fn rotation_degrees(&self) -> Vector3<f32> {
        self.rotation.map(|r| Deg::from(Rad(r)).0)
    }

    /// Model matrix `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
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
    use cgmath::{SquareMatrix, Vector4};

    #[test]
    fn test_identity_matrix() {
        assert_eq!(Transform::identity().matrix(), Matrix4::identity());
    }

    #[test]
    fn test_scale_then_translate() {
        let mut t = Transform::identity();
        t.set_uniform_scale(2.0);
        t.position = Vector3::new(1.0, 0.0, 0.0);
        let p = t.matrix() * Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(p, Vector4::new(3.0, 2.0, 2.0, 1.0));
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut t = Transform::identity();
        t.rotate(0.01, 0.01, 0.0);
        t.rotate(0.01, 0.01, 0.0);
        assert!((t.rotation.x - 0.02).abs() < 1e-7);
        assert!(!t.is_identity());
    }
}
