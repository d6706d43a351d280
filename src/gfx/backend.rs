//! The seam between the viewer state machine and whatever draws it
//!
//! [`RenderBackend`] is implemented by the wgpu render engine for the real window
//! and by [`RecordingBackend`], which draws nothing and records every call so the
//! viewer can be exercised without a GPU.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use super::material::Material;
use super::scene::{Helpers, ObjectId, SceneObject, SceneView};
use super::transform::Transform;
use crate::error::RenderError;

/// Token for a requested per-frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

pub trait RenderBackend {
    /// Uploads the geometry of a newly current object
    fn attach_object(&mut self, object: &SceneObject);

    /// Releases the GPU resources of an object that left the scene
    fn detach_object(&mut self, id: ObjectId);

    /// Draws one frame (or schedules it, for windowed backends)
    fn render(&mut self, view: &SceneView<'_>) -> Result<(), RenderError>;

    /// Asks for the next display tick; the host calls `ViewerState::tick` on it
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Draws one frame off-screen and returns its pixels
    fn capture_frame(&mut self, view: &SceneView<'_>) -> Result<RgbaImage, RenderError>;
}

/// What a [`RecordingBackend`] saw in its last `render` call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub object: Option<(ObjectId, String)>,
    pub transform: Option<Transform>,
    pub material: Material,
    pub helpers: Helpers,
    pub light_count: usize,
}

/// Headless backend that records calls instead of drawing
#[derive(Debug, Default)]
pub struct RecordingBackend {
    attached: HashMap<ObjectId, String>,
    next_frame: u64,
    pub pending_frame: Option<FrameHandle>,
    pub attach_calls: usize,
    pub detach_calls: usize,
    pub render_calls: usize,
    pub frames_requested: usize,
    pub frames_cancelled: usize,
    pub captures: usize,
    pub last_frame: Option<RecordedFrame>,
    /// When set, `capture_frame` fails with a readback error
    pub fail_capture: bool,
    pub capture_size: (u32, u32),
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            capture_size: (4, 4),
            ..Self::default()
        }
    }

    /// Objects currently attached
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn is_attached(&self, id: ObjectId) -> bool {
        self.attached.contains_key(&id)
    }

    pub fn attached_names(&self) -> Vec<&str> {
        self.attached.values().map(String::as_str).collect()
    }

    fn record(view: &SceneView<'_>) -> RecordedFrame {
        RecordedFrame {
            object: view.object.map(|o| (o.id, o.name.clone())),
            transform: view.object.map(|o| o.transform),
            material: view.material.clone(),
            helpers: *view.helpers,
            light_count: view.lights.light_count(),
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn attach_object(&mut self, object: &SceneObject) {
        self.attach_calls += 1;
        self.attached.insert(object.id, object.name.clone());
    }

    fn detach_object(&mut self, id: ObjectId) {
        self.detach_calls += 1;
        self.attached.remove(&id);
    }

    fn render(&mut self, view: &SceneView<'_>) -> Result<(), RenderError> {
        self.render_calls += 1;
        self.last_frame = Some(Self::record(view));
        Ok(())
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.frames_requested += 1;
        self.next_frame += 1;
        let handle = FrameHandle(self.next_frame);
        self.pending_frame = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
            self.frames_cancelled += 1;
        }
    }

    fn capture_frame(&mut self, view: &SceneView<'_>) -> Result<RgbaImage, RenderError> {
        if self.fail_capture {
            return Err(RenderError::Readback("capture disabled".to_string()));
        }
        self.captures += 1;
        let [r, g, b] = view.material.rgb();
        let pixel = Rgba([
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            255,
        ]);
        let (width, height) = self.capture_size;
        Ok(RgbaImage::from_pixel(width, height, pixel))
    }
}
