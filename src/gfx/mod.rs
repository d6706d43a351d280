//! # Graphics Module
//!
//! Everything between the viewer state machine and the GPU.
//!
//! - **Geometry** ([`geometry`], [`catalog`]) - procedural primitive generators
//!   and the ordered list of shapes the viewer cycles through
//! - **Scene state** ([`material`], [`transform`], [`lighting`], [`scene`],
//!   [`camera`]) - plain data describing one frame
//! - **Backends** ([`backend`], [`rendering`]) - the [`RenderBackend`] seam, the
//!   recording backend used in tests, and the wgpu [`RenderEngine`]

pub mod backend;
pub mod camera;
pub mod catalog;
pub mod geometry;
pub mod lighting;
pub mod material;
pub mod rendering;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use backend::{RecordingBackend, RenderBackend};
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
