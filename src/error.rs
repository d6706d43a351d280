//! Error types shared across the viewer

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the model import worker
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to parse model: {0}")]
    Parse(#[from] tobj::LoadError),
    #[error("model `{0}` contains no triangles")]
    EmptyModel(String),
    #[error("import worker stopped before producing a result")]
    WorkerLost,
}

/// Failures reported by a render backend
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to initialise GPU: {0}")]
    Init(String),
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("failed to read back frame: {0}")]
    Readback(String),
    #[error("unsupported texture format {0:?}")]
    UnsupportedFormat(wgpu::TextureFormat),
    #[error("render backend is not ready")]
    NotReady,
}

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("primitive catalog must contain at least one entry")]
    EmptyCatalog,
    #[error("unknown {kind} `{name}`")]
    UnknownName { kind: &'static str, name: String },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("failed to encode screenshot {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
