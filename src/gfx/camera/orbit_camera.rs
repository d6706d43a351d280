use super::camera_utils::Camera;
use cgmath::*;
use std::fmt;
use std::str::FromStr;

use crate::error::ViewerError;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Fixed viewpoints around the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPreset {
    Top,
    Front,
    Left,
    Right,
}

impl CameraPreset {
    pub const ALL: [CameraPreset; 4] = [
        CameraPreset::Top,
        CameraPreset::Front,
        CameraPreset::Left,
        CameraPreset::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraPreset::Top => "top",
            CameraPreset::Front => "front",
            CameraPreset::Left => "left",
            CameraPreset::Right => "right",
        }
    }

    /// `(pitch, yaw)` placing the eye on the preset's axis
    fn angles(&self) -> (f32, f32) {
        use std::f32::consts::FRAC_PI_2;
        match self {
            CameraPreset::Top => (FRAC_PI_2, 0.0),
            CameraPreset::Front => (0.0, 0.0),
            CameraPreset::Left => (0.0, -FRAC_PI_2),
            CameraPreset::Right => (0.0, FRAC_PI_2),
        }
    }
}

impl fmt::Display for CameraPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraPreset {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CameraPreset::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ViewerError::UnknownName {
                kind: "camera preset",
                name: s.to_string(),
            })
    }
}

/// Y-up camera orbiting a target point
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    fn eye_position(&self) -> Vector3<f32> {
        self.eye
    }
}

impl OrbitCamera {
    /// Distance of the preset viewpoints from the origin
    pub const PRESET_DISTANCE: f32 = 5.0;

    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // recomputed by `update()`
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Deg(75.0).into(),
            znear: 0.1,
            zfar: 1000.0,
        };
        camera.set_pitch(pitch);
        camera
    }

    /// Looking at the origin from `(0, -1, 5)`, slightly below the object
    pub fn initial(aspect: f32) -> Self {
        let eye = Vector3::new(0.0f32, -1.0, 5.0);
        let distance = eye.magnitude();
        Self::new(distance, (eye.y / distance).asin(), 0.0, Vector3::zero(), aspect)
    }

    pub fn reset_to_default(&mut self) {
        let aspect = self.aspect;
        *self = Self::initial(aspect);
    }

    /// Clears any orbit/pan state and moves to a preset viewpoint
    pub fn apply_preset(&mut self, preset: CameraPreset) {
        let (pitch, yaw) = preset.angles();
        self.target = Vector3::zero();
        self.distance = Self::PRESET_DISTANCE;
        self.yaw = yaw;
        self.set_pitch(pitch);
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.1)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // scale by distance for a consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += movement;
        self.target += movement;
    }

    /// Updates the camera after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        // keep away from the poles so look_at never sees a parallel up vector
        Self {
            min_distance: Some(0.5),
            max_distance: Some(50.0),
            min_pitch: -std::f32::consts::FRAC_PI_2 + 0.01,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.01,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_eye_matches_start_position() {
        let camera = OrbitCamera::initial(1.0);
        assert!((camera.eye - Vector3::new(0.0, -1.0, 5.0)).magnitude() < 1e-4);
        assert_eq!(camera.up, Vector3::unit_y());
    }

    #[test]
    fn test_presets_place_eye_on_axis() {
        let mut camera = OrbitCamera::initial(1.0);
        camera.pan((0.3, 0.2));

        camera.apply_preset(CameraPreset::Top);
        assert!(camera.eye.y > 4.99);
        assert!(camera.eye.x.abs() < 0.1 && camera.eye.z.abs() < 0.1);
        assert_eq!(camera.target, Vector3::zero());

        camera.apply_preset(CameraPreset::Front);
        assert!((camera.eye - Vector3::new(0.0, 0.0, 5.0)).magnitude() < 1e-4);

        camera.apply_preset(CameraPreset::Left);
        assert!((camera.eye - Vector3::new(-5.0, 0.0, 0.0)).magnitude() < 1e-4);

        camera.apply_preset(CameraPreset::Right);
        assert!((camera.eye - Vector3::new(5.0, 0.0, 0.0)).magnitude() < 1e-4);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::initial(1.0);
        camera.set_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!("LEFT".parse::<CameraPreset>().unwrap(), CameraPreset::Left);
        assert!("back".parse::<CameraPreset>().is_err());
    }
}
