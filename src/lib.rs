// src/lib.rs
//! Primitive viewer
//!
//! An interactive viewer for procedural 3D primitives and imported OBJ models,
//! built on wgpu and winit. All viewer behavior lives in
//! [`viewer::ViewerState`], which drives any [`gfx::backend::RenderBackend`];
//! the window app plugs in the wgpu [`gfx::rendering::RenderEngine`].

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod gfx;
pub mod import;
pub mod prelude;
pub mod ui;
pub mod viewer;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::ViewerConfig;
pub use viewer::ViewerState;
