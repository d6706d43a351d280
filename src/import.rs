//! Wavefront OBJ import
//!
//! Parsing runs on a worker thread; the result comes back over a oneshot channel
//! that the viewer polls once per frame without blocking.

use std::io::Cursor;
use std::thread;

use futures::channel::oneshot;

use crate::error::ImportError;
use crate::gfx::geometry::GeometryData;

/// A parsed model, all of its meshes merged into one geometry
#[derive(Debug, Clone)]
pub struct ImportedModel {
    pub name: String,
    pub geometry: GeometryData,
}

/// Parses OBJ bytes into a single triangle geometry
///
/// `fallback_name` labels the model when the file names none of its objects.
/// Material libraries are ignored; the viewer's shared material is used instead.
pub fn parse_obj(fallback_name: &str, bytes: &[u8]) -> Result<ImportedModel, ImportError> {
    let mut reader = Cursor::new(bytes);
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Err(tobj::LoadError::OpenFileFailed),
    )?;

    let name = models
        .iter()
        .map(|m| m.name.trim())
        .find(|n| !n.is_empty() && *n != "unnamed_object")
        .unwrap_or(fallback_name)
        .to_string();

    let mut geometry = GeometryData::new();
    for model in &models {
        let mesh = &model.mesh;
        let vertex_count = mesh.positions.len() / 3;

        let mut part = GeometryData::new();
        part.vertices = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        part.tex_coords = if mesh.texcoords.len() == vertex_count * 2 {
            mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect()
        } else {
            vec![[0.0, 0.0]; vertex_count]
        };
        part.indices = mesh.indices.clone();

        if mesh.normals.len() == vertex_count * 3 {
            part.normals = mesh
                .normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect();
        } else {
            part.compute_vertex_normals();
        }

        log::debug!(
            "OBJ part '{}': {} vertices, {} triangles",
            model.name,
            part.vertex_count(),
            part.triangle_count()
        );
        geometry.merge(&part);
    }

    if geometry.triangle_count() == 0 {
        return Err(ImportError::EmptyModel(name));
    }

    log::info!(
        "Imported '{}': {} vertices, {} triangles",
        name,
        geometry.vertex_count(),
        geometry.triangle_count()
    );
    Ok(ImportedModel { name, geometry })
}

/// An import in flight on a worker thread
#[derive(Debug)]
pub struct PendingImport {
    name: String,
    receiver: oneshot::Receiver<Result<ImportedModel, ImportError>>,
}

impl PendingImport {
    pub fn spawn(name: String, bytes: Vec<u8>) -> Self {
        let (sender, receiver) = oneshot::channel();
        let worker_name = name.clone();
        thread::spawn(move || {
            let result = parse_obj(&worker_name, &bytes);
            // the viewer may have dropped us in favour of a newer import
            let _ = sender.send(result);
        });
        Self { name, receiver }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-blocking; `None` while the worker is still parsing
    pub fn try_take(&mut self) -> Option<Result<ImportedModel, ImportError>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(ImportError::WorkerLost)),
        }
    }

    /// Blocks until the worker finishes
    pub fn wait(self) -> Result<ImportedModel, ImportError> {
        pollster::block_on(self.receiver).unwrap_or(Err(ImportError::WorkerLost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn test_parse_triangle_computes_normals() {
        let model = parse_obj("fallback", TRIANGLE.as_bytes()).unwrap();
        assert_eq!(model.name, "tri");
        assert_eq!(model.geometry.triangle_count(), 1);
        assert_eq!(model.geometry.normals.len(), 3);
        assert!((model.geometry.normals[0][2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_merges_objects() {
        let source = format!("{TRIANGLE}o other\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n");
        let model = parse_obj("fallback", source.as_bytes()).unwrap();
        assert_eq!(model.geometry.triangle_count(), 2);
        assert!(model.geometry.indices.iter().all(|&i| i < 6));
    }

    #[test]
    fn test_parse_rejects_empty_payload() {
        let err = parse_obj("junk.obj", b"this is not a model\n").unwrap_err();
        assert!(matches!(err, ImportError::EmptyModel(_) | ImportError::Parse(_)));
    }

    #[test]
    fn test_worker_round_trip() {
        let pending = PendingImport::spawn("tri.obj".into(), TRIANGLE.as_bytes().to_vec());
        assert_eq!(pending.name(), "tri.obj");
        let model = pending.wait().unwrap();
        assert_eq!(model.geometry.vertex_count(), 3);
    }
}
