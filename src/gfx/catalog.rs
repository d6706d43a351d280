//! Catalog of the primitives the viewer cycles through
//!
//! A [`PrimitiveCatalog`] is an ordered, non-empty list of [`PrimitiveShape`]s whose
//! geometry is generated once up front and shared through `Arc`s, so switching
//! objects never regenerates meshes.

use std::sync::Arc;

use cgmath::{Vector2, Vector3};

use super::geometry::curves::{sample_cubic_bezier, CatmullRomCurve};
use super::geometry::*;
use crate::error::ViewerError;

/// A named shape descriptor with the parameters needed to build its geometry
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveShape {
    Cube { size: f32 },
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32, width_segments: u32, height_segments: u32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32 },
    Cone { radius: f32, height: f32, radial_segments: u32 },
    Torus { radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32 },
    TorusKnot { radius: f32, tube: f32, tubular_segments: u32, radial_segments: u32 },
    Dodecahedron { radius: f32, detail: u32 },
    Octahedron { radius: f32, detail: u32 },
    Tetrahedron { radius: f32, detail: u32 },
    Icosahedron { radius: f32, detail: u32 },
    Capsule { radius: f32, length: f32, cap_segments: u32, radial_segments: u32 },
    Circle { radius: f32, segments: u32 },
    Plane { width: f32, height: f32 },
    Ring { inner_radius: f32, outer_radius: f32, theta_segments: u32 },
    /// Hard edges of a box
    Edges { size: f32, threshold_degrees: f32 },
    /// Unit square extruded with a bevel
    Extrude { depth: f32, bevel_thickness: f32, bevel_size: f32, bevel_segments: u32 },
    Lathe { segments: u32 },
    /// Subdivided cube-like solid projected onto a sphere
    Polyhedron { radius: f32, detail: u32 },
    /// Filled heart outline
    Shape { curve_divisions: u32 },
    Tube { tubular_segments: u32, radius: f32, radial_segments: u32 },
    /// Every triangle edge of a coarse sphere
    Wireframe { radius: f32, width_segments: u32, height_segments: u32 },
}

impl PrimitiveShape {
    /// Display name shown in the UI label
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cube { .. } => "Cube",
            Self::Box { .. } => "Box",
            Self::Sphere { .. } => "Sphere",
            Self::Cylinder { .. } => "Cylinder",
            Self::Cone { .. } => "Cone",
            Self::Torus { .. } => "Torus",
            Self::TorusKnot { .. } => "Torus Knot",
            Self::Dodecahedron { .. } => "Dodecahedron",
            Self::Octahedron { .. } => "Octahedron",
            Self::Tetrahedron { .. } => "Tetrahedron",
            Self::Icosahedron { .. } => "Icosahedron",
            Self::Capsule { .. } => "Capsule",
            Self::Circle { .. } => "Circle",
            Self::Plane { .. } => "Plane",
            Self::Ring { .. } => "Ring",
            Self::Edges { .. } => "Edges",
            Self::Extrude { .. } => "Extrude",
            Self::Lathe { .. } => "Lathe",
            Self::Polyhedron { .. } => "Polyhedron",
            Self::Shape { .. } => "Shape",
            Self::Tube { .. } => "Tube",
            Self::Wireframe { .. } => "Wireframe",
        }
    }

    /// Generates the geometry for this shape
    pub fn build(&self) -> GeometryData {
        match *self {
            Self::Cube { size } => generate_box(size, size, size),
            Self::Box { width, height, depth } => generate_box(width, height, depth),
            Self::Sphere { radius, width_segments, height_segments } => {
                generate_sphere(radius, width_segments, height_segments)
            }
            Self::Cylinder { radius_top, radius_bottom, height, radial_segments } => {
                generate_cylinder(radius_top, radius_bottom, height, radial_segments)
            }
            Self::Cone { radius, height, radial_segments } => {
                generate_cone(radius, height, radial_segments)
            }
            Self::Torus { radius, tube, radial_segments, tubular_segments } => {
                generate_torus(radius, tube, radial_segments, tubular_segments)
            }
            Self::TorusKnot { radius, tube, tubular_segments, radial_segments } => {
                generate_torus_knot(radius, tube, tubular_segments, radial_segments, 2, 3)
            }
            Self::Dodecahedron { radius, detail } => generate_dodecahedron(radius, detail),
            Self::Octahedron { radius, detail } => generate_octahedron(radius, detail),
            Self::Tetrahedron { radius, detail } => generate_tetrahedron(radius, detail),
            Self::Icosahedron { radius, detail } => generate_icosahedron(radius, detail),
            Self::Capsule { radius, length, cap_segments, radial_segments } => {
                generate_capsule(radius, length, cap_segments, radial_segments)
            }
            Self::Circle { radius, segments } => generate_circle(radius, segments),
            Self::Plane { width, height } => generate_plane(width, height, 1, 1),
            Self::Ring { inner_radius, outer_radius, theta_segments } => {
                generate_ring(inner_radius, outer_radius, theta_segments)
            }
            Self::Edges { size, threshold_degrees } => {
                generate_edges(&generate_box(size, size, size), threshold_degrees)
            }
            Self::Extrude { depth, bevel_thickness, bevel_size, bevel_segments } => {
                let square = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
                generate_extrude(
                    &square,
                    ExtrudeOptions {
                        depth,
                        bevel_enabled: true,
                        bevel_thickness,
                        bevel_size,
                        bevel_segments,
                    },
                )
            }
            Self::Lathe { segments } => {
                let points: Vec<[f32; 2]> = (0..10)
                    .map(|i| [(i as f32 * 0.2).sin() * 0.5 + 0.5, (i as f32 - 5.0) * 0.2])
                    .collect();
                generate_lathe(&points, segments)
            }
            Self::Polyhedron { radius, detail } => {
                #[rustfmt::skip]
                let vertices = [
                    1.0, 1.0, 1.0,   -1.0, 1.0, 1.0,   -1.0, -1.0, 1.0,   1.0, -1.0, 1.0,
                    1.0, 1.0, -1.0,  -1.0, 1.0, -1.0,  -1.0, -1.0, -1.0,  1.0, -1.0, -1.0,
                ];
                #[rustfmt::skip]
                let indices = [
                    0, 1, 2,   0, 2, 3,   0, 4, 7,   0, 7, 3,
                    1, 5, 6,   1, 6, 2,   4, 5, 6,   4, 6, 7,
                ];
                generate_polyhedron(&vertices, &indices, radius, detail)
            }
            Self::Shape { curve_divisions } => generate_shape(&heart_contour(curve_divisions)),
            Self::Tube { tubular_segments, radius, radial_segments } => {
                let path = CatmullRomCurve::new(vec![
                    Vector3::new(-1.0, 0.0, 0.0),
                    Vector3::new(-0.5, 0.5, 0.0),
                    Vector3::new(0.0, 0.0, 0.0),
                    Vector3::new(0.5, -0.5, 0.0),
                    Vector3::new(1.0, 0.0, 0.0),
                ]);
                generate_tube(&path, tubular_segments, radius, radial_segments)
            }
            Self::Wireframe { radius, width_segments, height_segments } => {
                generate_wireframe(&generate_sphere(radius, width_segments, height_segments))
            }
        }
    }
}

/// Heart outline made of two cubic beziers, starting and ending at `(0, 0.5)`
pub fn heart_contour(divisions: u32) -> Vec<[f32; 2]> {
    let top = Vector2::new(0.0, 0.5);
    let bottom = Vector2::new(0.0, -0.5);
    let mut points = vec![top];
    points.extend(sample_cubic_bezier(top, top, Vector2::new(-0.5, 0.0), bottom, divisions));
    points.extend(sample_cubic_bezier(bottom, Vector2::new(0.5, 0.0), top, top, divisions));
    points.into_iter().map(|p| [p.x, p.y]).collect()
}

/// One catalog slot: the descriptor and its pre-built geometry
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub shape: PrimitiveShape,
    pub geometry: Arc<GeometryData>,
}

/// Ordered, non-empty, immutable list of primitives
#[derive(Debug, Clone)]
pub struct PrimitiveCatalog {
    entries: Vec<CatalogEntry>,
}

impl PrimitiveCatalog {
    /// Builds every shape's geometry once; an empty list is rejected
    pub fn new(shapes: Vec<PrimitiveShape>) -> Result<Self, ViewerError> {
        if shapes.is_empty() {
            return Err(ViewerError::EmptyCatalog);
        }
        let entries = shapes
            .into_iter()
            .map(|shape| {
                let geometry = Arc::new(shape.build());
                log::debug!(
                    "Built {} ({} vertices, {} indices)",
                    shape.name(),
                    geometry.vertex_count(),
                    geometry.indices.len()
                );
                CatalogEntry { shape, geometry }
            })
            .collect();
        Ok(Self { entries })
    }

    /// The ten shapes of the current viewer
    pub fn standard() -> Self {
        use PrimitiveShape::*;
        Self::from_builtin(vec![
            Cube { size: 1.0 },
            Sphere { radius: 0.7, width_segments: 32, height_segments: 16 },
            Cylinder { radius_top: 0.5, radius_bottom: 0.5, height: 1.0, radial_segments: 32 },
            Cone { radius: 0.7, height: 1.0, radial_segments: 32 },
            Torus { radius: 0.5, tube: 0.2, radial_segments: 16, tubular_segments: 100 },
            TorusKnot { radius: 0.5, tube: 0.2, tubular_segments: 100, radial_segments: 16 },
            Dodecahedron { radius: 0.7, detail: 0 },
            Octahedron { radius: 0.7, detail: 0 },
            Tetrahedron { radius: 0.7, detail: 0 },
            Icosahedron { radius: 0.7, detail: 0 },
        ])
    }

    /// The 21 shapes of the legacy viewer, in alphabetical order
    pub fn extended() -> Self {
        use PrimitiveShape::*;
        Self::from_builtin(vec![
            Box { width: 1.0, height: 1.0, depth: 1.0 },
            Capsule { radius: 0.5, length: 1.0, cap_segments: 4, radial_segments: 8 },
            Circle { radius: 1.0, segments: 32 },
            Cone { radius: 1.0, height: 2.0, radial_segments: 32 },
            Cylinder { radius_top: 0.5, radius_bottom: 0.5, height: 2.0, radial_segments: 32 },
            Dodecahedron { radius: 1.0, detail: 0 },
            Edges { size: 1.2, threshold_degrees: 1.0 },
            Extrude { depth: 0.5, bevel_thickness: 0.1, bevel_size: 0.1, bevel_segments: 3 },
            Icosahedron { radius: 1.0, detail: 0 },
            Lathe { segments: 12 },
            Octahedron { radius: 1.0, detail: 0 },
            Plane { width: 1.5, height: 1.5 },
            Polyhedron { radius: 1.0, detail: 2 },
            Ring { inner_radius: 0.3, outer_radius: 1.0, theta_segments: 16 },
            Shape { curve_divisions: 12 },
            Sphere { radius: 1.0, width_segments: 32, height_segments: 16 },
            Tetrahedron { radius: 1.0, detail: 0 },
            Torus { radius: 0.7, tube: 0.3, radial_segments: 16, tubular_segments: 100 },
            TorusKnot { radius: 0.7, tube: 0.2, tubular_segments: 100, radial_segments: 16 },
            Tube { tubular_segments: 20, radius: 0.2, radial_segments: 8 },
            Wireframe { radius: 1.0, width_segments: 8, height_segments: 4 },
        ])
    }

    fn from_builtin(shapes: Vec<PrimitiveShape>) -> Self {
        let entries = shapes
            .into_iter()
            .map(|shape| CatalogEntry {
                geometry: Arc::new(shape.build()),
                shape,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index` wrapped into range
    pub fn get(&self, index: usize) -> &CatalogEntry {
        &self.entries[index % self.entries.len()]
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.shape.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::Topology;

    fn check_entry(entry: &CatalogEntry) {
        let g = &entry.geometry;
        let name = entry.shape.name();
        assert!(!g.is_empty(), "{name} is empty");
        assert_eq!(g.vertices.len(), g.normals.len(), "{name} normals");
        assert_eq!(g.vertices.len(), g.tex_coords.len(), "{name} uvs");
        assert!(
            g.indices.iter().all(|&i| (i as usize) < g.vertices.len()),
            "{name} index out of range"
        );
        assert!(
            g.vertices.iter().flatten().all(|c| c.is_finite()),
            "{name} has non-finite positions"
        );
    }

    #[test]
    fn test_standard_catalog() {
        let catalog = PrimitiveCatalog::standard();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.get(0).shape.name(), "Cube");
        assert_eq!(catalog.get(9).shape.name(), "Icosahedron");
        catalog.entries().iter().for_each(check_entry);
    }

    #[test]
    fn test_extended_catalog() {
        let catalog = PrimitiveCatalog::extended();
        assert_eq!(catalog.len(), 21);
        catalog.entries().iter().for_each(check_entry);

        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names[6], "Edges");
        assert_eq!(names[20], "Wireframe");
        assert_eq!(catalog.get(6).geometry.topology, Topology::Lines);
        assert_eq!(catalog.get(20).geometry.topology, Topology::Lines);
        assert_eq!(catalog.get(0).geometry.topology, Topology::Triangles);
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        assert!(matches!(
            PrimitiveCatalog::new(Vec::new()),
            Err(ViewerError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_get_wraps() {
        let catalog = PrimitiveCatalog::standard();
        assert_eq!(catalog.get(10).shape.name(), "Cube");
        assert_eq!(PrimitiveCatalog::extended().get(21).shape.name(), "Box");
    }

    #[test]
    fn test_heart_contour_is_closed_loop() {
        let contour = heart_contour(12);
        assert_eq!(contour.len(), 25);
        let (first, last) = (contour[0], contour[24]);
        assert!((first[0] - last[0]).abs() < 1e-6 && (first[1] - last[1]).abs() < 1e-6);
    }

    #[test]
    fn test_shape_generates_filled_heart() {
        let heart = PrimitiveShape::Shape { curve_divisions: 12 }.build();
        // 24 distinct outline points triangulate into 22 triangles
        assert_eq!(heart.vertex_count(), 24);
        assert_eq!(heart.triangle_count(), 22);
    }
}
