// src/ui/panel.rs
//! The viewer control panel
//!
//! The panel never touches the viewer directly. It renders from a
//! [`PanelModel`] snapshot and returns the [`ViewerCommand`]s the user
//! triggered this frame; the app applies them afterwards.

use imgui::{Condition, TreeNodeFlags};

use crate::gfx::backend::RenderBackend;
use crate::gfx::camera::CameraPreset;
use crate::gfx::lighting::LightType;
use crate::gfx::material::{hex_to_rgb, rgb_to_hex, Material, MaterialKind};
use crate::gfx::scene::{Helper, Helpers};
use crate::viewer::{ViewerCommand, ViewerState};

/// Read-only copy of the viewer state shown by the panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelModel {
    pub names: Vec<&'static str>,
    pub current_index: usize,
    pub label: String,
    pub scale: f32,
    pub rotation_degrees: [f32; 3],
    pub material: Material,
    pub running: bool,
    pub helpers: Helpers,
    pub light_type: LightType,
    pub light_intensity: f32,
    pub importing: bool,
    /// Last message from a screenshot or import, if any
    pub status: Option<String>,
}

impl PanelModel {
    pub fn from_viewer<B: RenderBackend>(viewer: &ViewerState<B>, status: Option<&str>) -> Self {
        let transform = viewer.transform();
        let rotation = transform.rotation_degrees();

        Self {
            names: viewer.catalog().names().collect(),
            current_index: viewer.current_index(),
            label: viewer.label().to_string(),
            scale: transform.scale.x,
            rotation_degrees: [rotation.x, rotation.y, rotation.z],
            material: viewer.material().clone(),
            running: viewer.is_running(),
            helpers: *viewer.helpers(),
            light_type: viewer.lights().active_type(),
            light_intensity: viewer.light_intensity(),
            importing: viewer.is_importing(),
            status: status.map(str::to_string),
        }
    }
}

/// Step applied by the rotate and opacity buttons
const STEP: f32 = 0.1;

/// Draws the control panel and returns the commands triggered this frame
pub fn control_panel(ui: &imgui::Ui, model: &PanelModel) -> Vec<ViewerCommand> {
    let mut commands = Vec::new();

    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return commands;
    }
    let panel_height = (display_size[1] - 40.0).clamp(300.0, 760.0);

    ui.window("Primitive Viewer")
        .size([380.0, panel_height], Condition::FirstUseEver)
        .position([20.0, 20.0], Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            object_section(ui, model, &mut commands);
            material_section(ui, model, &mut commands);
            animation_section(ui, model, &mut commands);
            scene_section(ui, model, &mut commands);
            lighting_section(ui, model, &mut commands);
            ui.separator();
            file_section(ui, model, &mut commands);
        });

    commands
}

fn object_section(ui: &imgui::Ui, model: &PanelModel, commands: &mut Vec<ViewerCommand>) {
    if !ui.collapsing_header("Object", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    if ui.button("< Prev") {
        commands.push(ViewerCommand::SelectPrevious);
    }
    ui.same_line();
    if ui.button("Next >") {
        commands.push(ViewerCommand::SelectNext);
    }
    ui.same_line();
    ui.text(&model.label);

    let mut index = model.current_index;
    if ui.combo_simple_string("Primitive", &mut index, &model.names) && index != model.current_index {
        commands.push(ViewerCommand::SelectIndex(index as i64));
    }

    let mut scale = model.scale;
    if ui.slider("Scale", 0.1, 3.0, &mut scale) {
        commands.push(ViewerCommand::SetScale(scale));
    }

    if ui.button("Rotate -") {
        commands.push(ViewerCommand::RotateY(-STEP));
    }
    ui.same_line();
    if ui.button("Rotate +") {
        commands.push(ViewerCommand::RotateY(STEP));
    }
    ui.same_line();
    if ui.button("Reset") {
        commands.push(ViewerCommand::ResetTransform);
    }
    let [rx, ry, rz] = model.rotation_degrees;
    ui.text_disabled(format!("Rotation: {rx:.1}, {ry:.1}, {rz:.1} deg"));
}

fn material_section(ui: &imgui::Ui, model: &PanelModel, commands: &mut Vec<ViewerCommand>) {
    if !ui.collapsing_header("Material", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    let kinds: Vec<&str> = MaterialKind::ALL.iter().map(MaterialKind::as_str).collect();
    let current = MaterialKind::ALL
        .iter()
        .position(|kind| *kind == model.material.kind)
        .unwrap_or(0);
    let mut selected = current;
    if ui.combo_simple_string("Type", &mut selected, &kinds) && selected != current {
        commands.push(ViewerCommand::SetMaterialKind(MaterialKind::ALL[selected]));
    }

    let mut rgb = hex_to_rgb(model.material.color);
    if ui.color_edit3("Color", &mut rgb) {
        commands.push(ViewerCommand::SetColor(rgb_to_hex(rgb)));
    }
    if ui.button("Random color") {
        commands.push(ViewerCommand::RandomizeColor);
    }
    ui.same_line();
    if ui.button("Next color") {
        commands.push(ViewerCommand::CycleColor);
    }

    let mut wireframe = model.material.wireframe;
    if ui.checkbox("Wireframe", &mut wireframe) {
        commands.push(ViewerCommand::SetWireframe(wireframe));
    }

    let mut opacity = model.material.opacity;
    if ui.slider("Opacity", 0.0, 1.0, &mut opacity) {
        commands.push(ViewerCommand::SetOpacity(opacity));
    }
    if ui.button("Opacity -") {
        commands.push(ViewerCommand::AdjustOpacity(-STEP));
    }
    ui.same_line();
    if ui.button("Opacity +") {
        commands.push(ViewerCommand::AdjustOpacity(STEP));
    }
}

fn animation_section(ui: &imgui::Ui, model: &PanelModel, commands: &mut Vec<ViewerCommand>) {
    if !ui.collapsing_header("Animation", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    ui.text(if model.running { "Running" } else { "Stopped" });
    ui.same_line();
    if model.running {
        if ui.button("Stop") {
            commands.push(ViewerCommand::Stop);
        }
    } else if ui.button("Start") {
        commands.push(ViewerCommand::Start);
    }
}

fn scene_section(ui: &imgui::Ui, model: &PanelModel, commands: &mut Vec<ViewerCommand>) {
    if !ui.collapsing_header("Scene", TreeNodeFlags::empty()) {
        return;
    }

    for helper in Helper::ALL {
        let mut enabled = model.helpers.get(helper);
        if ui.checkbox(helper.label(), &mut enabled) {
            commands.push(ViewerCommand::SetHelper(helper, enabled));
        }
    }

    ui.text("Camera");
    for (i, preset) in CameraPreset::ALL.into_iter().enumerate() {
        if i > 0 {
            ui.same_line();
        }
        if ui.button(preset.as_str()) {
            commands.push(ViewerCommand::SetCameraPreset(preset));
        }
    }
}

fn lighting_section(ui: &imgui::Ui, model: &PanelModel, commands: &mut Vec<ViewerCommand>) {
    if !ui.collapsing_header("Lighting", TreeNodeFlags::empty()) {
        return;
    }

    let types: Vec<&str> = LightType::ALL.iter().map(LightType::as_str).collect();
    let current = LightType::ALL
        .iter()
        .position(|kind| *kind == model.light_type)
        .unwrap_or(0);
    let mut selected = current;
    if ui.combo_simple_string("Light", &mut selected, &types) && selected != current {
        commands.push(ViewerCommand::SetLightType(LightType::ALL[selected]));
    }

    let mut intensity = model.light_intensity;
    if ui.slider("Intensity", 0.0, 5.0, &mut intensity) {
        commands.push(ViewerCommand::SetLightIntensity(intensity));
    }
}

fn file_section(ui: &imgui::Ui, model: &PanelModel, commands: &mut Vec<ViewerCommand>) {
    if ui.button("Screenshot") {
        commands.push(ViewerCommand::CaptureScreenshot);
    }
    ui.same_line();
    if ui.button("Import model...") {
        commands.extend(pick_model_file());
    }

    if model.importing {
        ui.text_colored([1.0, 0.8, 0.2, 1.0], &model.label);
    }
    if let Some(status) = &model.status {
        ui.text_wrapped(status);
    }
}

/// Asks the user for an OBJ file and reads it into an import command
pub fn pick_model_file() -> Option<ViewerCommand> {
    let path = rfd::FileDialog::new()
        .set_title("Import model")
        .add_filter("Wavefront OBJ", &["obj"])
        .pick_file()?;

    match std::fs::read(&path) {
        Ok(bytes) => Some(ViewerCommand::ImportModel {
            name: model_name(&path),
            bytes,
        }),
        Err(err) => {
            log::warn!("Could not read {}: {err}", path.display());
            None
        }
    }
}

/// File name shown for an imported model
pub fn model_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::gfx::backend::RecordingBackend;

    fn model() -> PanelModel {
        let viewer = ViewerState::new(ViewerConfig::default(), RecordingBackend::new());
        PanelModel::from_viewer(&viewer, Some("Saved screenshot.png"))
    }

    #[test]
    fn test_model_snapshots_viewer() {
        let model = model();
        assert_eq!(model.names.len(), 10);
        assert_eq!(model.current_index, 0);
        assert_eq!(model.label, "Cube");
        assert_eq!(model.scale, 1.0);
        assert_eq!(model.material.kind, MaterialKind::Standard);
        assert!(model.running);
        assert!(model.helpers.orbit);
        assert!(!model.importing);
        assert_eq!(model.status.as_deref(), Some("Saved screenshot.png"));
    }

    #[test]
    fn test_idle_panel_emits_nothing() {
        let mut context = imgui::Context::create();
        context.set_ini_filename(None);
        context.io_mut().display_size = [1280.0, 720.0];
        context.fonts().build_rgba32_texture();

        let ui = context.new_frame();
        let commands = control_panel(ui, &model());
        assert!(commands.is_empty());
        context.render();
    }

    #[test]
    fn test_model_name_from_path() {
        assert_eq!(model_name(std::path::Path::new("/tmp/teapot.obj")), "teapot.obj");
        assert_eq!(model_name(std::path::Path::new("/")), "model");
    }
}
