//! # Subdivided Polyhedra
//!
//! Builds a polyhedron from a vertex/face table, subdivides each triangular face
//! `detail` times and projects every vertex onto a sphere of the given radius.
//! The platonic solids are thin wrappers over [`generate_polyhedron`].

use super::{dot, GeometryData};

/// Generate a polyhedron from flat vertex and triangle index tables
///
/// # Arguments
/// * `vertices` - Flat list of xyz triples
/// * `indices` - Flat list of triangle corner indices into `vertices`
/// * `radius` - Radius of the circumscribed sphere
/// * `detail` - Number of subdivisions; 0 keeps the original faces
///
/// Every output triangle has its own vertices and a flat normal, so faceted solids
/// shade with sharp edges. Normals always point away from the center.
pub fn generate_polyhedron(vertices: &[f32], indices: &[u32], radius: f32, detail: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let corner = |i: u32| {
        let i = i as usize * 3;
        [vertices[i], vertices[i + 1], vertices[i + 2]]
    };

    for face in indices.chunks_exact(3) {
        let (a, b, c) = (corner(face[0]), corner(face[1]), corner(face[2]));
        for [p0, p1, p2] in subdivide_face(a, b, c, detail) {
            let (p0, p1, p2) = (
                project(p0, radius),
                project(p1, radius),
                project(p2, radius),
            );
            let centroid = [
                (p0[0] + p1[0] + p2[0]) / 3.0,
                (p0[1] + p1[1] + p2[1]) / 3.0,
                (p0[2] + p1[2] + p2[2]) / 3.0,
            ];
            let normal = super::face_normal(p0, p1, p2);
            if dot(normal, centroid) < 0.0 {
                data.push_flat_triangle(p0, p2, p1);
            } else {
                data.push_flat_triangle(p0, p1, p2);
            }
        }
    }

    data
}

/// Splits a triangle into `(detail + 1)^2` smaller triangles
fn subdivide_face(a: [f32; 3], b: [f32; 3], c: [f32; 3], detail: u32) -> Vec<[[f32; 3]; 3]> {
    let cols = detail as usize + 1;

    // rows of points from the a-b edge up to c
    let mut grid: Vec<Vec<[f32; 3]>> = Vec::with_capacity(cols + 1);
    for i in 0..=cols {
        let t = i as f32 / cols as f32;
        let a_row = lerp(a, c, t);
        let b_row = lerp(b, c, t);
        let rows = cols - i;
        let row = (0..=rows)
            .map(|j| {
                if rows == 0 {
                    a_row
                } else {
                    lerp(a_row, b_row, j as f32 / rows as f32)
                }
            })
            .collect();
        grid.push(row);
    }

    let mut triangles = Vec::with_capacity(cols * cols);
    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;
            if j % 2 == 0 {
                triangles.push([grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
            } else {
                triangles.push([grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
            }
        }
    }
    triangles
}

fn lerp(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn project(p: [f32; 3], radius: f32) -> [f32; 3] {
    let n = super::normalize_or(p, [0.0, 1.0, 0.0]);
    [n[0] * radius, n[1] * radius, n[2] * radius]
}

const PHI: f32 = 1.618_034;

/// Generate a tetrahedron inscribed in a sphere of `radius`
pub fn generate_tetrahedron(radius: f32, detail: u32) -> GeometryData {
    #[rustfmt::skip]
    let vertices = [
        1.0, 1.0, 1.0,   -1.0, -1.0, 1.0,   -1.0, 1.0, -1.0,   1.0, -1.0, -1.0,
    ];
    #[rustfmt::skip]
    let indices = [
        2, 1, 0,   0, 3, 2,   1, 3, 0,   2, 3, 1,
    ];
    generate_polyhedron(&vertices, &indices, radius, detail)
}

/// Generate an octahedron inscribed in a sphere of `radius`
pub fn generate_octahedron(radius: f32, detail: u32) -> GeometryData {
    #[rustfmt::skip]
    let vertices = [
        1.0, 0.0, 0.0,   -1.0, 0.0, 0.0,   0.0, 1.0, 0.0,
        0.0, -1.0, 0.0,   0.0, 0.0, 1.0,   0.0, 0.0, -1.0,
    ];
    #[rustfmt::skip]
    let indices = [
        0, 2, 4,   0, 4, 3,   0, 3, 5,   0, 5, 2,
        1, 2, 5,   1, 5, 3,   1, 3, 4,   1, 4, 2,
    ];
    generate_polyhedron(&vertices, &indices, radius, detail)
}

/// Generate an icosahedron inscribed in a sphere of `radius`
pub fn generate_icosahedron(radius: f32, detail: u32) -> GeometryData {
    let t = PHI;
    #[rustfmt::skip]
    let vertices = [
        -1.0, t, 0.0,   1.0, t, 0.0,   -1.0, -t, 0.0,   1.0, -t, 0.0,
        0.0, -1.0, t,   0.0, 1.0, t,   0.0, -1.0, -t,   0.0, 1.0, -t,
        t, 0.0, -1.0,   t, 0.0, 1.0,   -t, 0.0, -1.0,   -t, 0.0, 1.0,
    ];
    #[rustfmt::skip]
    let indices = [
        0, 11, 5,   0, 5, 1,    0, 1, 7,    0, 7, 10,   0, 10, 11,
        1, 5, 9,    5, 11, 4,   11, 10, 2,  10, 7, 6,   7, 1, 8,
        3, 9, 4,    3, 4, 2,    3, 2, 6,    3, 6, 8,    3, 8, 9,
        4, 9, 5,    2, 4, 11,   6, 2, 10,   8, 6, 7,    9, 8, 1,
    ];
    generate_polyhedron(&vertices, &indices, radius, detail)
}

/// Generate a dodecahedron inscribed in a sphere of `radius`
///
/// Each pentagonal face is stored as a fan of three triangles.
pub fn generate_dodecahedron(radius: f32, detail: u32) -> GeometryData {
    let t = PHI;
    let r = 1.0 / PHI;
    #[rustfmt::skip]
    let vertices = [
        // (±1, ±1, ±1)
        -1.0, -1.0, -1.0,   -1.0, -1.0, 1.0,   -1.0, 1.0, -1.0,   -1.0, 1.0, 1.0,
        1.0, -1.0, -1.0,    1.0, -1.0, 1.0,    1.0, 1.0, -1.0,    1.0, 1.0, 1.0,
        // (0, ±1/φ, ±φ)
        0.0, -r, -t,   0.0, -r, t,   0.0, r, -t,   0.0, r, t,
        // (±1/φ, ±φ, 0)
        -r, -t, 0.0,   -r, t, 0.0,   r, -t, 0.0,   r, t, 0.0,
        // (±φ, 0, ±1/φ)
        -t, 0.0, -r,   t, 0.0, -r,   -t, 0.0, r,   t, 0.0, r,
    ];
    #[rustfmt::skip]
    let indices = [
        3, 11, 7,    3, 7, 15,    3, 15, 13,
        7, 19, 17,   7, 17, 6,    7, 6, 15,
        17, 4, 8,    17, 8, 10,   17, 10, 6,
        8, 0, 16,    8, 16, 2,    8, 2, 10,
        0, 12, 1,    0, 1, 18,    0, 18, 16,
        6, 10, 2,    6, 2, 13,    6, 13, 15,
        2, 16, 18,   2, 18, 3,    2, 3, 13,
        18, 1, 9,    18, 9, 11,   18, 11, 3,
        4, 14, 12,   4, 12, 0,    4, 0, 8,
        11, 9, 5,    11, 5, 19,   11, 19, 7,
        19, 5, 14,   19, 14, 4,   19, 4, 17,
        1, 12, 14,   1, 14, 5,    1, 5, 9,
    ];
    generate_polyhedron(&vertices, &indices, radius, detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platonic_triangle_counts() {
        assert_eq!(generate_tetrahedron(1.0, 0).triangle_count(), 4);
        assert_eq!(generate_octahedron(1.0, 0).triangle_count(), 8);
        assert_eq!(generate_icosahedron(1.0, 0).triangle_count(), 20);
        assert_eq!(generate_dodecahedron(1.0, 0).triangle_count(), 36);
    }

    #[test]
    fn test_detail_subdivides_each_face() {
        // (detail + 1)^2 triangles per original face
        assert_eq!(generate_octahedron(1.0, 1).triangle_count(), 8 * 4);
        assert_eq!(generate_icosahedron(1.0, 2).triangle_count(), 20 * 9);
    }

    #[test]
    fn test_vertices_lie_on_sphere() {
        let solid = generate_icosahedron(0.7, 1);
        for v in &solid.vertices {
            let length = dot(*v, *v).sqrt();
            assert!((length - 0.7).abs() < 1e-4);
        }
    }

    #[test]
    fn test_normals_point_outward() {
        let solid = generate_dodecahedron(0.7, 0);
        for (v, n) in solid.vertices.iter().zip(&solid.normals) {
            assert!(dot(*v, *n) > 0.0);
        }
    }
}
