use cgmath::{Matrix4, SquareMatrix, Vector3};

/// Anything that can place the eye and project the scene
pub trait Camera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;

    fn eye_position(&self) -> Vector3<f32>;
}

/// Camera block of the per-frame uniform
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// Eye position, padded to a vec4 for WGSL alignment
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_camera<C: Camera>(camera: &C) -> Self {
        let eye = camera.eye_position();
        Self {
            view_position: [eye.x, eye.y, eye.z, 1.0],
            view_proj: camera.build_view_projection_matrix().into(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}
