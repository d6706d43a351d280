//! # Procedural Geometry Generation
//!
//! This module provides functions to generate the 3D primitive shapes shown by the
//! viewer procedurally, eliminating the need for external model files.
//!
//! ## Supported Primitives
//!
//! - **Solids**: box, sphere, cylinder, cone, capsule, torus, torus knot
//! - **Polyhedra**: tetrahedron, octahedron, dodecahedron, icosahedron and arbitrary
//!   subdivided polyhedra (see [`polyhedron`])
//! - **Flat shapes**: circle, plane, ring, filled bezier shape
//! - **Sweeps**: lathe, extrusion with bevel, tube along a Catmull-Rom curve
//! - **Line sets**: hard edges and full wireframe of another geometry
//!
//! All shapes are Y-up, centered on the origin and use counter-clockwise winding.
//!
//! ## Usage
//!
//! ```rust
//! use primview::gfx::geometry::{generate_box, generate_sphere, generate_torus};
//!
//! let cube = generate_box(1.0, 1.0, 1.0);
//! let sphere = generate_sphere(0.7, 32, 16);
//! let torus = generate_torus(0.5, 0.2, 16, 100);
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod curves;
pub mod polyhedron;
pub mod primitives;

pub use polyhedron::*;
pub use primitives::*;

use std::collections::HashMap;

/// How the index buffer of a [`GeometryData`] is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Every three indices form a triangle
    Triangles,
    /// Every two indices form a line segment
    Lines,
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle or line indices, depending on `topology`
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl GeometryData {
    /// Create a new empty triangle geometry
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            topology: Topology::Triangles,
        }
    }

    /// Create a new empty line geometry
    pub fn lines() -> Self {
        Self {
            topology: Topology::Lines,
            ..Self::new()
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry (zero for line sets)
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::Lines => 0,
        }
    }

    /// Get the number of line segments in this geometry (zero for triangle meshes)
    pub fn line_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => 0,
            Topology::Lines => self.indices.len() / 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Appends one vertex and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
        index
    }

    /// Appends a triangle with its own three vertices and a shared face normal
    /// taken from the winding order
    pub fn push_flat_triangle(&mut self, a: [f32; 3], b: [f32; 3], c: [f32; 3]) {
        let normal = face_normal(a, b, c);
        let base = self.vertices.len() as u32;
        for (position, uv) in [(a, [0.0, 0.0]), (b, [1.0, 0.0]), (c, [0.5, 1.0])] {
            self.push_vertex(position, normal, uv);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Uniformly scales every vertex position in place
    pub fn scale(&mut self, factor: f32) {
        for vertex in &mut self.vertices {
            for component in vertex.iter_mut() {
                *component *= factor;
            }
        }
    }

    /// Appends another geometry of the same topology, rebasing its indices
    pub fn merge(&mut self, other: &GeometryData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.tex_coords.extend_from_slice(&other.tex_coords);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for empty geometry
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Some((min, max))
    }

    /// Unique undirected edges of a triangle mesh as a flat line index list
    ///
    /// Used to draw any triangle geometry in wireframe mode. Line geometries
    /// return their own indices unchanged.
    pub fn edge_indices(&self) -> Vec<u32> {
        if self.topology == Topology::Lines {
            return self.indices.clone();
        }

        let mut seen = std::collections::HashSet::new();
        let mut edges = Vec::with_capacity(self.indices.len() * 2);
        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.push(a);
                    edges.push(b);
                }
            }
        }
        edges
    }

    /// Recomputes smooth vertex normals by averaging adjacent face normals
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![[0.0f32; 3]; self.vertices.len()];
        for triangle in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );
            let n = raw_face_normal(self.vertices[i0], self.vertices[i1], self.vertices[i2]);
            for &index in &[i0, i1, i2] {
                for axis in 0..3 {
                    normals[index][axis] += n[axis];
                }
            }
        }
        self.normals = normals
            .into_iter()
            .map(|n| normalize_or(n, [0.0, 1.0, 0.0]))
            .collect();
    }

    /// Convert to the vertex format used by the renderer
    pub fn to_vertex_buffer(&self) -> Vec<crate::gfx::rendering::vertex::Vertex3D> {
        use crate::gfx::rendering::vertex::Vertex3D;

        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a line set containing only the "hard" edges of a triangle mesh
///
/// An edge is kept when it borders a single triangle, or when the normals of its
/// two triangles differ by more than `threshold_degrees`. Vertices are matched by
/// position so meshes with split vertices (like per-face cube corners) work.
pub fn generate_edges(source: &GeometryData, threshold_degrees: f32) -> GeometryData {
    let mut out = GeometryData::lines();
    if source.topology == Topology::Lines {
        out.merge(source);
        return out;
    }

    let quantize = |p: [f32; 3]| {
        [
            (p[0] * 1e4).round() as i64,
            (p[1] * 1e4).round() as i64,
            (p[2] * 1e4).round() as i64,
        ]
    };

    let threshold_dot = threshold_degrees.to_radians().cos();
    // edge key -> (first endpoint, second endpoint, face normals seen)
    let mut edges: HashMap<([i64; 3], [i64; 3]), ([f32; 3], [f32; 3], Vec<[f32; 3]>)> =
        HashMap::new();
    let mut order = Vec::new();

    for triangle in source.indices.chunks_exact(3) {
        let p = [
            source.vertices[triangle[0] as usize],
            source.vertices[triangle[1] as usize],
            source.vertices[triangle[2] as usize],
        ];
        let normal = face_normal(p[0], p[1], p[2]);
        for (a, b) in [(p[0], p[1]), (p[1], p[2]), (p[2], p[0])] {
            let (qa, qb) = (quantize(a), quantize(b));
            let key = if qa <= qb { (qa, qb) } else { (qb, qa) };
            let entry = edges.entry(key).or_insert_with(|| {
                order.push(key);
                (a, b, Vec::new())
            });
            entry.2.push(normal);
        }
    }

    for key in order {
        let (a, b, normals) = &edges[&key];
        let hard = match normals.as_slice() {
            [_] => true,
            [n0, n1, ..] => dot(*n0, *n1) <= threshold_dot,
            [] => false,
        };
        if hard {
            let ia = out.push_vertex(*a, [0.0, 1.0, 0.0], [0.0, 0.0]);
            let ib = out.push_vertex(*b, [0.0, 1.0, 0.0], [1.0, 0.0]);
            out.indices.extend_from_slice(&[ia, ib]);
        }
    }

    out
}

/// Builds a line set containing every triangle edge of a mesh
pub fn generate_wireframe(source: &GeometryData) -> GeometryData {
    GeometryData {
        vertices: source.vertices.clone(),
        tex_coords: source.tex_coords.clone(),
        normals: source.normals.clone(),
        indices: source.edge_indices(),
        topology: Topology::Lines,
    }
}

pub(crate) fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn raw_face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ]
}

pub(crate) fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    normalize_or(raw_face_normal(a, b, c), [0.0, 1.0, 0.0])
}

pub(crate) fn normalize_or(v: [f32; 3], fallback: [f32; 3]) -> [f32; 3] {
    let length = dot(v, v).sqrt();
    if length > f32::EPSILON {
        [v[0] / length, v[1] / length, v[2] / length]
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_indices_dedupe_shared_edges() {
        let mut quad = GeometryData::new();
        quad.vertices = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        quad.normals = vec![[0.0, 0.0, 1.0]; 4];
        quad.tex_coords = vec![[0.0, 0.0]; 4];
        quad.indices = vec![0, 1, 2, 2, 3, 0];

        // 6 triangle edges, one shared diagonal
        assert_eq!(quad.edge_indices().len(), 5 * 2);
    }

    #[test]
    fn test_box_edges_skip_coplanar_diagonals() {
        let cube = generate_box(1.2, 1.2, 1.2);
        let edges = generate_edges(&cube, 1.0);
        assert_eq!(edges.topology, Topology::Lines);
        assert_eq!(edges.line_count(), 12);
    }

    #[test]
    fn test_wireframe_keeps_vertices() {
        let sphere = generate_sphere(1.0, 8, 4);
        let wire = generate_wireframe(&sphere);
        assert_eq!(wire.vertex_count(), sphere.vertex_count());
        assert!(wire.line_count() > 0);
        assert_eq!(wire.triangle_count(), 0);
    }

    #[test]
    fn test_merge_rebases_indices() {
        let mut a = generate_box(1.0, 1.0, 1.0);
        let b = generate_box(1.0, 1.0, 1.0);
        let before = a.vertex_count() as u32;
        a.merge(&b);
        assert_eq!(a.triangle_count(), 24);
        assert!(a.indices[36..].iter().all(|&i| i >= before));
    }

    #[test]
    fn test_scale_shrinks_bounds() {
        let mut cube = generate_box(2.0, 2.0, 2.0);
        cube.scale(0.5);
        let (min, max) = cube.bounds().unwrap();
        assert_eq!(min, [-0.5, -0.5, -0.5]);
        assert_eq!(max, [0.5, 0.5, 0.5]);
    }
}
