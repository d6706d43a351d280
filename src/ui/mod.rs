//! # User Interface Module
//!
//! Dear ImGui overlay for the viewer window.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`panel`] - the control panel, which turns clicks into
//!   [`ViewerCommand`](crate::viewer::ViewerCommand)s
//!
//! While the UI wants the mouse or keyboard, camera controls and key bindings
//! are suspended.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{control_panel, PanelModel};
