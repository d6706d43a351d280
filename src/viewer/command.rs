use std::path::PathBuf;

use super::ViewerState;
use crate::error::ViewerError;
use crate::gfx::backend::RenderBackend;
use crate::gfx::camera::CameraPreset;
use crate::gfx::lighting::LightType;
use crate::gfx::material::MaterialKind;
use crate::gfx::scene::Helper;

/// One user action, as emitted by the control panel or a key binding
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerCommand {
    SelectNext,
    SelectPrevious,
    SelectIndex(i64),
    SetScale(f32),
    RotateY(f32),
    ResetTransform,
    SetMaterialKind(MaterialKind),
    SetColor(u32),
    RandomizeColor,
    CycleColor,
    SetWireframe(bool),
    SetOpacity(f32),
    AdjustOpacity(f32),
    Start,
    Stop,
    ToggleAnimation,
    ToggleHelper(Helper),
    SetHelper(Helper, bool),
    SetCameraPreset(CameraPreset),
    SetLightType(LightType),
    SetLightIntensity(f32),
    ImportModel { name: String, bytes: Vec<u8> },
    CaptureScreenshot,
    Resize(u32, u32),
}

/// What a command produced beyond its state change
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Done,
    /// New material color, for commands that pick one
    Color(u32),
    Helper(Helper, bool),
    Screenshot(PathBuf),
}

impl<B: RenderBackend> ViewerState<B> {
    /// Dispatches a command to the matching operation
    pub fn apply(&mut self, command: ViewerCommand) -> Result<CommandOutcome, ViewerError> {
        log::trace!("Applying {:?}", ShortCommand(&command));
        let outcome = match command {
            ViewerCommand::SelectNext => {
                self.select_next();
                CommandOutcome::Done
            }
            ViewerCommand::SelectPrevious => {
                self.select_previous();
                CommandOutcome::Done
            }
            ViewerCommand::SelectIndex(index) => {
                self.select_by_index(index);
                CommandOutcome::Done
            }
            ViewerCommand::SetScale(scale) => {
                self.set_scale(scale);
                CommandOutcome::Done
            }
            ViewerCommand::RotateY(delta) => {
                self.rotate_y(delta);
                CommandOutcome::Done
            }
            ViewerCommand::ResetTransform => {
                self.reset_transform();
                CommandOutcome::Done
            }
            ViewerCommand::SetMaterialKind(kind) => {
                self.set_material_kind(kind);
                CommandOutcome::Done
            }
            ViewerCommand::SetColor(hex) => {
                self.set_color(hex);
                CommandOutcome::Color(self.material().color)
            }
            ViewerCommand::RandomizeColor => CommandOutcome::Color(self.randomize_color()),
            ViewerCommand::CycleColor => CommandOutcome::Color(self.cycle_color()),
            ViewerCommand::SetWireframe(wireframe) => {
                self.set_wireframe(wireframe);
                CommandOutcome::Done
            }
            ViewerCommand::SetOpacity(opacity) => {
                self.set_opacity(opacity);
                CommandOutcome::Done
            }
            ViewerCommand::AdjustOpacity(delta) => {
                self.adjust_opacity(delta);
                CommandOutcome::Done
            }
            ViewerCommand::Start => {
                self.start();
                CommandOutcome::Done
            }
            ViewerCommand::Stop => {
                self.stop();
                CommandOutcome::Done
            }
            ViewerCommand::ToggleAnimation => {
                self.toggle_animation();
                CommandOutcome::Done
            }
            ViewerCommand::ToggleHelper(helper) => {
                CommandOutcome::Helper(helper, self.toggle_helper(helper))
            }
            ViewerCommand::SetHelper(helper, enabled) => {
                self.set_helper(helper, enabled);
                CommandOutcome::Helper(helper, enabled)
            }
            ViewerCommand::SetCameraPreset(preset) => {
                self.set_camera_preset(preset);
                CommandOutcome::Done
            }
            ViewerCommand::SetLightType(kind) => {
                self.set_light_type(kind);
                CommandOutcome::Done
            }
            ViewerCommand::SetLightIntensity(intensity) => {
                self.set_light_intensity(intensity);
                CommandOutcome::Done
            }
            ViewerCommand::ImportModel { name, bytes } => {
                self.import_model(name, bytes);
                CommandOutcome::Done
            }
            ViewerCommand::CaptureScreenshot => CommandOutcome::Screenshot(self.capture_screenshot()?),
            ViewerCommand::Resize(width, height) => {
                self.resize(width, height);
                CommandOutcome::Done
            }
        };
        Ok(outcome)
    }
}

/// Debug view that leaves out import payloads
struct ShortCommand<'a>(&'a ViewerCommand);

impl std::fmt::Debug for ShortCommand<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            ViewerCommand::ImportModel { name, bytes } => {
                write!(f, "ImportModel({name}, {} bytes)", bytes.len())
            }
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::gfx::backend::RecordingBackend;
    use crate::viewer::AnimationState;

    fn viewer() -> ViewerState<RecordingBackend> {
        ViewerState::new(
            ViewerConfig {
                initial_animation: AnimationState::Stopped,
                seed: Some(1),
                ..ViewerConfig::default()
            },
            RecordingBackend::new(),
        )
    }

    #[test]
    fn test_commands_dispatch_to_operations() {
        let mut viewer = viewer();
        viewer.apply(ViewerCommand::SelectIndex(4)).unwrap();
        assert_eq!(viewer.label(), "Torus");

        viewer.apply(ViewerCommand::SetScale(1.5)).unwrap();
        assert_eq!(viewer.transform().scale.x, 1.5);

        viewer.apply(ViewerCommand::SetMaterialKind(MaterialKind::Lambert)).unwrap();
        assert_eq!(viewer.material().kind, MaterialKind::Lambert);

        viewer.apply(ViewerCommand::ToggleAnimation).unwrap();
        assert!(viewer.is_running());
    }

    #[test]
    fn test_color_commands_report_color() {
        let mut viewer = viewer();
        assert_eq!(
            viewer.apply(ViewerCommand::SetColor(0x1_00ff00)).unwrap(),
            CommandOutcome::Color(0x00ff00)
        );
        let outcome = viewer.apply(ViewerCommand::RandomizeColor).unwrap();
        assert_eq!(outcome, CommandOutcome::Color(viewer.material().color));
    }

    #[test]
    fn test_toggle_helper_reports_state() {
        let mut viewer = viewer();
        assert_eq!(
            viewer.apply(ViewerCommand::ToggleHelper(Helper::Orbit)).unwrap(),
            CommandOutcome::Helper(Helper::Orbit, false)
        );
    }

    #[test]
    fn test_short_command_hides_payload() {
        let command = ViewerCommand::ImportModel {
            name: "cube.obj".into(),
            bytes: vec![0; 2048],
        };
        assert_eq!(format!("{:?}", ShortCommand(&command)), "ImportModel(cube.obj, 2048 bytes)");
    }
}
