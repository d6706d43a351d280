//! # Viewer Session State
//!
//! [`ViewerState`] owns everything a session mutates: the catalog cursor, the
//! object on screen, the shared material, the animation loop, camera, lights and
//! helper flags. Every UI action funnels through one of its methods (directly or
//! via [`ViewerCommand`]), and the only way out to the GPU is the injected
//! [`RenderBackend`].
//!
//! Mutations redraw explicitly only while the animation is stopped; a running
//! loop redraws on its next tick anyway. Scene-level changes (camera, lights,
//! helpers, reset) always redraw.

pub mod animation;
pub mod command;

pub use animation::{AnimationLoop, AnimationState};
pub use command::{CommandOutcome, ViewerCommand};

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{OpacityPolicy, ViewerConfig};
use crate::error::{ImportError, ViewerError};
use crate::export;
use crate::gfx::backend::RenderBackend;
use crate::gfx::camera::{CameraPreset, OrbitCamera};
use crate::gfx::catalog::PrimitiveCatalog;
use crate::gfx::lighting::{LightRig, LightType};
use crate::gfx::material::{Material, MaterialKind};
use crate::gfx::scene::{Helper, Helpers, ObjectId, SceneObject, SceneView};
use crate::gfx::transform::Transform;
use crate::import::{ImportedModel, PendingImport};

/// Colors stepped through by [`ViewerState::cycle_color`]
pub const COLOR_PALETTE: [u32; 6] = [0x00ff00, 0xff0000, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff];

const BACKGROUND: [f32; 3] = [0.1, 0.1, 0.1];

pub struct ViewerState<B: RenderBackend> {
    config: ViewerConfig,
    catalog: PrimitiveCatalog,
    backend: B,
    current_index: usize,
    current_object: Option<SceneObject>,
    material: Material,
    animation: AnimationLoop,
    camera: OrbitCamera,
    lights: LightRig,
    helpers: Helpers,
    light_intensity: f32,
    palette_cursor: usize,
    rng: StdRng,
    next_object_id: u64,
    pending_import: Option<PendingImport>,
    label: String,
}

impl<B: RenderBackend> ViewerState<B> {
    /// Builds the configured catalog and shows its first entry
    pub fn new(config: ViewerConfig, backend: B) -> Self {
        let catalog = config.catalog.build();
        Self::with_catalog(config, catalog, backend)
    }

    pub fn with_catalog(config: ViewerConfig, catalog: PrimitiveCatalog, backend: B) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let (width, height) = config.window_size;
        let mut camera = OrbitCamera::initial(1.0);
        camera.resize_projection(width, height);

        let mut viewer = Self {
            material: config.initial_material.clone(),
            catalog,
            backend,
            current_index: 0,
            current_object: None,
            animation: AnimationLoop::new(),
            camera,
            lights: LightRig::default(),
            helpers: Helpers::default(),
            light_intensity: 1.0,
            palette_cursor: 0,
            rng,
            next_object_id: 0,
            pending_import: None,
            label: String::new(),
            config,
        };

        log::info!(
            "Viewer session started with {} primitives ({:?} animation)",
            viewer.catalog.len(),
            viewer.config.initial_animation
        );

        viewer.attach_primitive();
        if viewer.config.initial_animation == AnimationState::Running {
            viewer.animation.start(&mut viewer.backend);
        }
        viewer.redraw();
        viewer
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PrimitiveCatalog {
        &self.catalog
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_object(&self) -> Option<&SceneObject> {
        self.current_object.as_ref()
    }

    /// Transform of the object on screen; identity while an import is in flight
    pub fn transform(&self) -> Transform {
        self.current_object
            .as_ref()
            .map_or_else(Transform::identity, |object| object.transform)
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animation.state()
    }

    pub fn is_running(&self) -> bool {
        self.animation.is_running()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Mutable camera for the mouse controller; call [`Self::redraw`] afterwards
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn light_intensity(&self) -> f32 {
        self.light_intensity
    }

    pub fn helpers(&self) -> &Helpers {
        &self.helpers
    }

    /// Display label: the current shape or model name
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_importing(&self) -> bool {
        self.pending_import.is_some()
    }

    /// Borrowed snapshot of everything needed to draw a frame
    pub fn scene_view(&self) -> SceneView<'_> {
        SceneView {
            object: self.current_object.as_ref(),
            material: &self.material,
            camera: &self.camera,
            lights: &self.lights,
            helpers: &self.helpers,
            background: BACKGROUND,
        }
    }

    // ---------------------------------------------------------------------
    // Object selection
    // ---------------------------------------------------------------------

    pub fn select_next(&mut self) {
        self.select_by_index(self.current_index as i64 + 1);
    }

    pub fn select_previous(&mut self) {
        self.select_by_index(self.current_index as i64 - 1);
    }

    /// Any integer is accepted and wrapped into the catalog range
    pub fn select_by_index(&mut self, index: i64) {
        let len = self.catalog.len() as i64;
        self.current_index = index.rem_euclid(len) as usize;

        if let Some(pending) = self.pending_import.take() {
            log::debug!("Discarding import of '{}' after selection change", pending.name());
        }
        self.detach_current();
        self.attach_primitive();
        self.redraw_if_stopped();
    }

    fn detach_current(&mut self) {
        if let Some(old) = self.current_object.take() {
            self.backend.detach_object(old.id);
        }
    }

    fn allocate_id(&mut self) -> ObjectId {
        self.next_object_id += 1;
        ObjectId(self.next_object_id)
    }

    /// Attaches a fresh instance of the catalog entry at the cursor
    fn attach_primitive(&mut self) {
        let entry = self.catalog.get(self.current_index);
        let (name, geometry) = (entry.shape.name(), entry.geometry.clone());
        let id = self.allocate_id();
        let object = SceneObject::new(id, name, geometry);
        log::debug!("Showing {} (#{})", name, self.current_index);
        self.attach(object);
    }

    fn attach(&mut self, object: SceneObject) {
        self.backend.attach_object(&object);
        self.label = object.name.clone();
        self.current_object = Some(object);
    }

    // ---------------------------------------------------------------------
    // Transform
    // ---------------------------------------------------------------------

    /// Uniform scale on all three axes; zero and negative values are accepted
    pub fn set_scale(&mut self, scale: f32) {
        if let Some(object) = self.current_object.as_mut() {
            object.transform.set_uniform_scale(scale);
        }
        self.redraw_if_stopped();
    }

    pub fn rotate_y(&mut self, delta: f32) {
        if let Some(object) = self.current_object.as_mut() {
            object.transform.rotate(0.0, delta, 0.0);
        }
        self.redraw();
    }

    pub fn reset_transform(&mut self) {
        if let Some(object) = self.current_object.as_mut() {
            object.transform = Transform::identity();
        }
        self.redraw();
    }

    // ---------------------------------------------------------------------
    // Material
    // ---------------------------------------------------------------------

    /// Swaps the shading model, keeping color, opacity and wireframe
    pub fn set_material_kind(&mut self, kind: MaterialKind) {
        self.material = self.material.with_kind(kind);
        self.redraw_if_stopped();
    }

    /// Bits above the low 24 are ignored
    pub fn set_color(&mut self, hex: u32) {
        self.material.color = hex & 0xFF_FFFF;
        self.redraw_if_stopped();
    }

    /// Applies a uniformly drawn 24-bit color and returns it for the color picker
    pub fn randomize_color(&mut self) -> u32 {
        let color = self.rng.random_range(0..=0xFF_FFFFu32);
        self.set_color(color);
        color
    }

    /// Steps to the next palette color and returns it
    pub fn cycle_color(&mut self) -> u32 {
        self.palette_cursor = (self.palette_cursor + 1) % COLOR_PALETTE.len();
        let color = COLOR_PALETTE[self.palette_cursor];
        self.set_color(color);
        color
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.material.wireframe = wireframe;
        self.redraw_if_stopped();
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.material.opacity = match self.config.opacity_policy {
            OpacityPolicy::PassThrough => opacity,
            OpacityPolicy::Clamp => opacity.clamp(0.0, 1.0),
        };
        self.redraw_if_stopped();
    }

    pub fn adjust_opacity(&mut self, delta: f32) {
        self.set_opacity(self.material.opacity + delta);
    }

    // ---------------------------------------------------------------------
    // Animation
    // ---------------------------------------------------------------------

    pub fn start(&mut self) {
        if self.animation.start(&mut self.backend) {
            log::debug!("Animation started");
        }
    }

    pub fn stop(&mut self) {
        if self.animation.stop(&mut self.backend) {
            log::debug!("Animation stopped");
        }
    }

    pub fn toggle_animation(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// One display tick: rotate, redraw and schedule the next frame
    ///
    /// Does nothing while stopped. Returns whether the frame was animated.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let step = self.config.rotation_step;
        if let Some(object) = self.current_object.as_mut() {
            object.transform.rotate(step, step, 0.0);
        }
        self.redraw();
        self.animation.advance(&mut self.backend);
        true
    }

    // ---------------------------------------------------------------------
    // Scene
    // ---------------------------------------------------------------------

    /// Flips a helper flag and returns its new value
    pub fn toggle_helper(&mut self, helper: Helper) -> bool {
        let enabled = self.helpers.toggle(helper);
        log::debug!("{} {}", helper.label(), if enabled { "on" } else { "off" });
        self.redraw();
        enabled
    }

    pub fn set_helper(&mut self, helper: Helper, enabled: bool) {
        self.helpers.set(helper, enabled);
        self.redraw();
    }

    pub fn set_camera_preset(&mut self, preset: CameraPreset) {
        self.camera.apply_preset(preset);
        self.redraw();
    }

    /// Replaces the key light, using the current intensity control value
    pub fn set_light_type(&mut self, kind: LightType) {
        self.lights.set_type(kind, self.light_intensity);
        self.redraw();
    }

    pub fn set_light_intensity(&mut self, intensity: f32) {
        self.light_intensity = intensity;
        self.lights.set_intensity(intensity);
        self.redraw();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize_projection(width, height);
        self.redraw();
    }

    // ---------------------------------------------------------------------
    // Import / export
    // ---------------------------------------------------------------------

    /// Removes the current object and starts parsing `bytes` on a worker thread
    ///
    /// The result is picked up by [`Self::poll_import`]. Starting another import
    /// first drops the older one.
    pub fn import_model(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        let name = name.into();
        if let Some(previous) = self.pending_import.take() {
            log::debug!("Import of '{}' superseded by '{}'", previous.name(), name);
        }
        log::info!("Importing '{}' ({} bytes)", name, bytes.len());
        self.detach_current();
        self.label = format!("Loading {name}");
        self.pending_import = Some(PendingImport::spawn(name, bytes));
        self.redraw_if_stopped();
    }

    /// Checks the in-flight import without blocking
    ///
    /// Returns `None` when there is nothing to report yet. On failure the catalog
    /// primitive at the cursor is put back.
    pub fn poll_import(&mut self) -> Option<Result<ObjectId, ImportError>> {
        let result = self.pending_import.as_mut()?.try_take()?;
        self.pending_import = None;
        Some(self.finish_import(result))
    }

    /// Blocks until the in-flight import completes
    pub fn wait_for_import(&mut self) -> Option<Result<ObjectId, ImportError>> {
        let pending = self.pending_import.take()?;
        Some(self.finish_import(pending.wait()))
    }

    fn finish_import(
        &mut self,
        result: Result<ImportedModel, ImportError>,
    ) -> Result<ObjectId, ImportError> {
        match result {
            Ok(model) => {
                let id = self.allocate_id();
                let mut object = SceneObject::new(id, model.name, model.geometry.into());
                object.transform.set_uniform_scale(self.config.import_scale);
                self.attach(object);
                self.redraw_if_stopped();
                Ok(id)
            }
            Err(err) => {
                log::warn!("Model import failed: {err}");
                self.attach_primitive();
                self.redraw_if_stopped();
                Err(err)
            }
        }
    }

    /// Captures one frame and writes it to the configured screenshot path
    pub fn capture_screenshot(&mut self) -> Result<PathBuf, ViewerError> {
        let path = self.config.screenshot_path.clone();
        self.capture_screenshot_to(&path)?;
        Ok(path)
    }

    pub fn capture_screenshot_to(&mut self, path: &Path) -> Result<(), ViewerError> {
        let view = SceneView {
            object: self.current_object.as_ref(),
            material: &self.material,
            camera: &self.camera,
            lights: &self.lights,
            helpers: &self.helpers,
            background: BACKGROUND,
        };
        let frame = self.backend.capture_frame(&view)?;
        export::save_png(&frame, path)
    }

    // ---------------------------------------------------------------------
    // Redraw
    // ---------------------------------------------------------------------

    /// Renders the current scene; backend failures are logged, not propagated
    pub fn redraw(&mut self) {
        let view = SceneView {
            object: self.current_object.as_ref(),
            material: &self.material,
            camera: &self.camera,
            lights: &self.lights,
            helpers: &self.helpers,
            background: BACKGROUND,
        };
        if let Err(err) = self.backend.render(&view) {
            log::warn!("Render failed: {err}");
        }
    }

    fn redraw_if_stopped(&mut self) {
        if !self.is_running() {
            self.redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::backend::RecordingBackend;

    fn stopped_viewer() -> ViewerState<RecordingBackend> {
        let config = ViewerConfig {
            initial_animation: AnimationState::Stopped,
            seed: Some(7),
            ..ViewerConfig::default()
        };
        ViewerState::new(config, RecordingBackend::new())
    }

    #[test]
    fn test_new_viewer_shows_first_primitive() {
        let viewer = stopped_viewer();
        assert_eq!(viewer.current_index(), 0);
        assert_eq!(viewer.label(), "Cube");
        assert_eq!(viewer.backend().attached_count(), 1);
        assert_eq!(viewer.backend().render_calls, 1);
        assert!(viewer.transform().is_identity());
    }

    #[test]
    fn test_running_by_default_requests_a_frame() {
        let viewer = ViewerState::new(ViewerConfig::default(), RecordingBackend::new());
        assert!(viewer.is_running());
        assert_eq!(viewer.backend().frames_requested, 1);
    }

    #[test]
    fn test_selection_swaps_object_and_keeps_material() {
        let mut viewer = stopped_viewer();
        viewer.set_color(0x123456);
        let first = viewer.current_object().unwrap().id;

        viewer.select_next();
        let second = viewer.current_object().unwrap();
        assert_ne!(second.id, first);
        assert_eq!(second.name, "Sphere");
        assert!(!viewer.backend().is_attached(first));
        assert_eq!(viewer.backend().attached_count(), 1);
        assert_eq!(viewer.material().color, 0x123456);
    }

    #[test]
    fn test_new_object_starts_with_identity_transform() {
        let mut viewer = stopped_viewer();
        viewer.set_scale(3.0);
        viewer.rotate_y(0.5);
        viewer.select_next();
        assert!(viewer.transform().is_identity());
    }

    #[test]
    fn test_select_by_index_wraps_negative_values() {
        let mut viewer = stopped_viewer();
        viewer.select_by_index(-1);
        assert_eq!(viewer.current_index(), 9);
        viewer.select_by_index(23);
        assert_eq!(viewer.current_index(), 3);
        viewer.select_by_index(i64::MIN);
        assert!(viewer.current_index() < 10);
    }

    #[test]
    fn test_mutations_redraw_only_while_stopped() {
        let mut viewer = stopped_viewer();
        let renders = viewer.backend().render_calls;
        viewer.set_opacity(0.2);
        assert_eq!(viewer.backend().render_calls, renders + 1);

        viewer.start();
        let renders = viewer.backend().render_calls;
        viewer.set_opacity(0.3);
        viewer.set_wireframe(true);
        viewer.set_scale(2.0);
        assert_eq!(viewer.backend().render_calls, renders);

        // scene-level changes always redraw
        viewer.toggle_helper(Helper::Grid);
        viewer.reset_transform();
        assert_eq!(viewer.backend().render_calls, renders + 2);
    }

    #[test]
    fn test_tick_rotates_by_step() {
        let mut viewer = stopped_viewer();
        assert!(!viewer.tick());
        viewer.start();
        assert!(viewer.tick());
        assert!(viewer.tick());
        let rotation = viewer.transform().rotation;
        assert!((rotation.x - 0.02).abs() < 1e-6);
        assert!((rotation.y - 0.02).abs() < 1e-6);
        assert_eq!(rotation.z, 0.0);
        assert_eq!(viewer.backend().frames_requested, 3);
    }

    #[test]
    fn test_cycle_color_walks_palette() {
        let mut viewer = stopped_viewer();
        assert_eq!(viewer.cycle_color(), 0xff0000);
        assert_eq!(viewer.cycle_color(), 0x0000ff);
        for _ in 0..4 {
            viewer.cycle_color();
        }
        assert_eq!(viewer.material().color, 0x00ff00);
    }

    #[test]
    fn test_randomize_color_is_seeded() {
        let mut a = stopped_viewer();
        let mut b = stopped_viewer();
        let color = a.randomize_color();
        assert_eq!(color, b.randomize_color());
        assert!(color <= 0xFF_FFFF);
        assert_eq!(a.material().color, color);
    }

    #[test]
    fn test_adjust_opacity_respects_policy() {
        let mut viewer = stopped_viewer();
        viewer.set_opacity(0.95);
        viewer.adjust_opacity(0.1);
        assert!((viewer.material().opacity - 1.05).abs() < 1e-6);

        let mut legacy = ViewerState::new(
            ViewerConfig {
                initial_animation: AnimationState::Stopped,
                ..ViewerConfig::legacy()
            },
            RecordingBackend::new(),
        );
        legacy.adjust_opacity(0.6);
        assert_eq!(legacy.material().opacity, 1.0);
        legacy.adjust_opacity(-3.0);
        assert_eq!(legacy.material().opacity, 0.0);
    }

    #[test]
    fn test_light_type_uses_intensity_control() {
        let mut viewer = stopped_viewer();
        viewer.set_light_intensity(0.25);
        viewer.set_light_type(LightType::Point);
        let key = viewer.lights().key.unwrap();
        assert_eq!(key.kind, LightType::Point);
        assert_eq!(key.intensity, 0.25);
        assert_eq!(viewer.backend().last_frame.as_ref().unwrap().light_count, 2);

        viewer.set_light_type(LightType::Ambient);
        assert_eq!(viewer.lights().light_count(), 1);
        assert_eq!(viewer.lights().ambient_intensity, 0.25);
    }

    #[test]
    fn test_light_intensity_redraws_while_running() {
        let mut viewer = ViewerState::new(ViewerConfig::default(), RecordingBackend::new());
        assert!(viewer.is_running());
        let before = viewer.backend().render_calls;

        viewer.set_light_intensity(2.0);

        assert_eq!(viewer.backend().render_calls, before + 1);
        assert_eq!(viewer.light_intensity(), 2.0);
    }

    #[test]
    fn test_render_sees_helpers_and_material() {
        let mut viewer = stopped_viewer();
        viewer.set_helper(Helper::Axes, true);
        viewer.set_material_kind(MaterialKind::Toon);
        let frame = viewer.backend().last_frame.clone().unwrap();
        assert!(frame.helpers.axes);
        assert_eq!(frame.material.kind, MaterialKind::Toon);
        assert_eq!(frame.object.unwrap().1, "Cube");
    }

    #[test]
    fn test_screenshot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut viewer = stopped_viewer();
        viewer.set_color(0xff0000);
        let path = dir.path().join("shot.png");
        viewer.capture_screenshot_to(&path).unwrap();
        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_screenshot_failure_is_reported() {
        let mut viewer = stopped_viewer();
        viewer.backend_mut().fail_capture = true;
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            viewer.capture_screenshot_to(&dir.path().join("x.png")),
            Err(ViewerError::Render(_))
        ));
    }
}
