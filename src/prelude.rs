//! # Prelude
//!
//! Commonly used types for driving a viewer, headless or windowed.
//!
//! ```
//! use primview::prelude::*;
//!
//! let mut viewer = ViewerState::new(ViewerConfig::default(), RecordingBackend::new());
//! viewer.select_next();
//! assert_eq!(viewer.label(), "Sphere");
//! ```

pub use crate::app::ViewerApp;
pub use crate::config::{CatalogVariant, OpacityPolicy, ViewerConfig};
pub use crate::error::{ImportError, RenderError, ViewerError};
pub use crate::gfx::backend::{FrameHandle, RecordingBackend, RenderBackend};
pub use crate::gfx::camera::{CameraPreset, OrbitCamera};
pub use crate::gfx::catalog::{PrimitiveCatalog, PrimitiveShape};
pub use crate::gfx::geometry::GeometryData;
pub use crate::gfx::lighting::{LightRig, LightType};
pub use crate::gfx::material::{Material, MaterialKind};
pub use crate::gfx::scene::{Helper, Helpers, ObjectId, SceneObject, SceneView};
pub use crate::gfx::transform::Transform;
pub use crate::viewer::{AnimationState, CommandOutcome, ViewerCommand, ViewerState};
