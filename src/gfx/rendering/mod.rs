// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Pipelines, GPU resources, frame presentation and screenshot readback.

pub mod pipeline;
pub mod readback;
pub mod render_engine;
pub mod texture_resource;
pub mod vertex;

pub use pipeline::{PipelineConfig, PipelineSet};
pub use render_engine::{FrameUniform, RenderEngine};
pub use vertex::{ColorVertex, Vertex3D};
