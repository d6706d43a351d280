use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    error::EventLoopError,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::ViewerConfig;
use crate::gfx::camera::CameraController;
use crate::gfx::rendering::RenderEngine;
use crate::gfx::scene::Helper;
use crate::ui::{control_panel, PanelModel, UiManager};
use crate::viewer::{CommandOutcome, ViewerCommand, ViewerState};

/// Desktop viewer: one window, one [`ViewerState`] driving a [`RenderEngine`]
pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    initial_model: Option<(String, Vec<u8>)>,
    window: Option<Arc<Window>>,
    viewer: Option<ViewerState<RenderEngine>>,
    ui_manager: Option<UiManager>,
    controller: CameraController,
    status: Option<String>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Result<Self, EventLoopError> {
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                initial_model: None,
                window: None,
                viewer: None,
                ui_manager: None,
                controller: CameraController::new(0.005, 0.1),
                status: None,
            },
        })
    }

    /// Imports `bytes` as soon as the window is up
    pub fn with_initial_model(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.app_state.initial_model = Some((name.into(), bytes));
        self
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> Result<(), EventLoopError> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut self.app_state)
    }
}

/// Key bindings active while the UI does not want the keyboard
pub fn key_command(key: KeyCode) -> Option<ViewerCommand> {
    match key {
        KeyCode::Space => Some(ViewerCommand::ToggleAnimation),
        KeyCode::ArrowRight => Some(ViewerCommand::SelectNext),
        KeyCode::ArrowLeft => Some(ViewerCommand::SelectPrevious),
        KeyCode::KeyR => Some(ViewerCommand::ResetTransform),
        KeyCode::KeyP => Some(ViewerCommand::CaptureScreenshot),
        _ => None,
    }
}

impl AppState {
    fn apply(&mut self, command: ViewerCommand) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        match viewer.apply(command) {
            Ok(CommandOutcome::Screenshot(path)) => {
                log::info!("Saved screenshot to {}", path.display());
                self.status = Some(format!("Saved {}", path.display()));
            }
            Ok(CommandOutcome::Helper(Helper::Orbit, false)) => self.controller.release(),
            Ok(_) => {}
            Err(err) => {
                log::error!("{err}");
                self.status = Some(err.to_string());
            }
        }
    }

    fn poll_import(&mut self) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        match viewer.poll_import() {
            Some(Ok(_)) => self.status = Some(format!("Loaded {}", viewer.label())),
            Some(Err(err)) => self.status = Some(format!("Import failed: {err}")),
            None => {}
        }
    }

    fn draw_frame(&mut self) {
        self.poll_import();

        let (Some(window), Some(viewer), Some(ui_manager)) = (
            self.window.as_ref(),
            self.viewer.as_ref(),
            self.ui_manager.as_mut(),
        ) else {
            return;
        };

        let model = PanelModel::from_viewer(viewer, self.status.as_deref());
        let commands = ui_manager.update_logic(window, |ui| control_panel(ui, &model));
        for command in commands {
            self.apply(command);
        }

        let (Some(viewer), Some(ui_manager)) = (self.viewer.as_mut(), self.ui_manager.as_mut()) else {
            return;
        };
        if viewer.backend_mut().take_frame_request().is_some() {
            viewer.tick();
        }
        let result = viewer.backend_mut().present(Some(
            |device: &wgpu::Device,
             queue: &wgpu::Queue,
             encoder: &mut wgpu::CommandEncoder,
             view: &wgpu::TextureView| {
                ui_manager.render_display_only(device, queue, encoder, view);
            },
        ));
        if let Err(err) = result {
            log::error!("Failed to present frame: {err}");
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        self.controller.process_keyed_events(event);

        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return;
        };
        if key_code == KeyCode::Escape {
            event_loop.exit();
            return;
        }
        if let Some(command) = key_command(key_code) {
            self.apply(command);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let attributes = WindowAttributes::default()
            .with_title("Primitive Viewer")
            .with_inner_size(PhysicalSize::new(width, height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let (width, height) = window.inner_size().into();
        let engine = match pollster::block_on(RenderEngine::new(window.clone(), width, height)) {
            Ok(engine) => engine,
            Err(err) => {
                log::error!("{err}");
                event_loop.exit();
                return;
            }
        };

        let ui_manager = UiManager::new(engine.device(), engine.queue(), engine.surface_format(), &window);
        let mut viewer = ViewerState::new(self.config.clone(), engine);
        viewer.resize(width, height);
        if let Some((name, bytes)) = self.initial_model.take() {
            viewer.import_model(name, bytes);
        }

        self.ui_manager = Some(ui_manager);
        self.viewer = Some(viewer);
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI gets the event first
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_input(&window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(viewer) = self.viewer.as_mut() {
                    viewer.backend_mut().resize(width, height);
                    viewer.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.draw_frame(),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        if !viewer.helpers().orbit {
            return;
        }
        if self.ui_manager.as_ref().is_some_and(UiManager::wants_input) {
            return;
        }

        if self.controller.process_events(&event, viewer.camera_mut()) {
            viewer.redraw();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // keep the import worker polled while idle
        if let (Some(window), Some(viewer)) = (self.window.as_ref(), self.viewer.as_ref()) {
            if viewer.is_importing() {
                window.request_redraw();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_command(KeyCode::Space), Some(ViewerCommand::ToggleAnimation));
        assert_eq!(key_command(KeyCode::ArrowRight), Some(ViewerCommand::SelectNext));
        assert_eq!(key_command(KeyCode::ArrowLeft), Some(ViewerCommand::SelectPrevious));
        assert_eq!(key_command(KeyCode::KeyR), Some(ViewerCommand::ResetTransform));
        assert_eq!(key_command(KeyCode::KeyP), Some(ViewerCommand::CaptureScreenshot));
        assert_eq!(key_command(KeyCode::KeyQ), None);
    }
}
