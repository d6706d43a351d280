//! # Primitive Shape Generation
//!
//! This module contains functions to generate the 3D primitive shapes of the viewer
//! catalog. All shapes are generated with proper normals and texture coordinates.
//! Parameters follow the usual "radius / segments" conventions so a catalog entry
//! reads like the constructor call that describes it.

use super::curves::{compute_frames, CatmullRomCurve};
use super::{face_normal, normalize_or, GeometryData};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Generate a box centered at the origin
///
/// Each face has its own four vertices so normals stay sharp at the corners, and
/// UV coordinates from 0 to 1.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    #[rustfmt::skip]
    let positions = [
        // Front face
        [-hx, -hy,  hz], [ hx, -hy,  hz], [ hx,  hy,  hz], [-hx,  hy,  hz],
        // Back face
        [-hx, -hy, -hz], [-hx,  hy, -hz], [ hx,  hy, -hz], [ hx, -hy, -hz],
        // Left face
        [-hx, -hy, -hz], [-hx, -hy,  hz], [-hx,  hy,  hz], [-hx,  hy, -hz],
        // Right face
        [ hx, -hy,  hz], [ hx, -hy, -hz], [ hx,  hy, -hz], [ hx,  hy,  hz],
        // Top face
        [-hx,  hy,  hz], [ hx,  hy,  hz], [ hx,  hy, -hz], [-hx,  hy, -hz],
        // Bottom face
        [-hx, -hy, -hz], [ hx, -hy, -hz], [ hx, -hy,  hz], [-hx, -hy,  hz],
    ];

    #[rustfmt::skip]
    let tex_coords = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [1.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|n| std::iter::repeat(*n).take(4))
        .collect();

    // 2 triangles per face, counter-clockwise
    data.indices = (0..6u32)
        .flat_map(|face| {
            let b = face * 4;
            [b, b + 1, b + 2, b + 2, b + 3, b]
        })
        .collect();

    data
}

/// Generate a UV sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of vertical segments (longitude lines)
/// * `height_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = width_segments.max(3);
    let lat_segs = height_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * TAU / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let x = sin_theta * cos_phi;
            let y = cos_theta;
            let z = sin_theta * sin_phi;

            data.push_vertex(
                [x * radius, y * radius, z * radius],
                [x, y, z],
                [long as f32 / long_segs as f32, lat as f32 / lat_segs as f32],
            );
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a plane in the XY plane facing +Z
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
pub fn generate_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;
            data.push_vertex([pos_x, pos_y, 0.0], [0.0, 0.0, 1.0], [u, v]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[next_row, i + 1, next_row + 1]);
        }
    }

    data
}

/// Generate a (possibly tapered) cylinder along the Y axis
///
/// # Arguments
/// * `radius_top` - Radius at `+height/2`; 0 makes a cone
/// * `radius_bottom` - Radius at `-height/2`
/// * `height` - Height of the cylinder
/// * `radial_segments` - Number of circular segments
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = radial_segments.max(3);
    let half_height = height * 0.5;
    let slope = if height != 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    // Side: a top ring and a bottom ring
    for row in 0..=1u32 {
        let v = row as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for i in 0..=segs {
            let u = i as f32 / segs as f32;
            let (sin_a, cos_a) = (u * TAU).sin_cos();
            data.push_vertex(
                [radius * sin_a, half_height - v * height, radius * cos_a],
                normalize_or([sin_a, slope, cos_a], [0.0, 1.0, 0.0]),
                [u, 1.0 - v],
            );
        }
    }

    for i in 0..segs {
        let a = i;
        let b = segs + 1 + i;
        let c = b + 1;
        let d = a + 1;
        // skip the degenerate triangle at a cone's apex
        if radius_top > 0.0 {
            data.indices.extend_from_slice(&[a, b, d]);
        }
        if radius_bottom > 0.0 {
            data.indices.extend_from_slice(&[b, c, d]);
        }
    }

    if radius_top > 0.0 {
        push_cap(&mut data, radius_top, half_height, segs, true);
    }
    if radius_bottom > 0.0 {
        push_cap(&mut data, radius_bottom, -half_height, segs, false);
    }

    data
}

fn push_cap(data: &mut GeometryData, radius: f32, y: f32, segs: u32, top: bool) {
    let normal = if top { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let center = data.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);
    let first = data.vertices.len() as u32;
    for i in 0..=segs {
        let (sin_a, cos_a) = (i as f32 / segs as f32 * TAU).sin_cos();
        data.push_vertex(
            [radius * sin_a, y, radius * cos_a],
            normal,
            [sin_a * 0.5 + 0.5, cos_a * 0.5 + 0.5],
        );
    }
    for i in 0..segs {
        let (current, next) = (first + i, first + i + 1);
        if top {
            data.indices.extend_from_slice(&[center, current, next]);
        } else {
            data.indices.extend_from_slice(&[center, next, current]);
        }
    }
}

/// Generate a cone along the Y axis with its apex at `+height/2`
pub fn generate_cone(radius: f32, height: f32, radial_segments: u32) -> GeometryData {
    generate_cylinder(0.0, radius, height, radial_segments)
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the center to the middle of the tube
/// * `tube` - Tube radius
/// * `radial_segments` - Segments around the tube
/// * `tubular_segments` - Segments around the ring
pub fn generate_torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let v = j as f32 / radial as f32 * TAU;

            let ring = radius + tube * v.cos();
            let position = [ring * u.cos(), ring * u.sin(), tube * v.sin()];
            let center = [radius * u.cos(), radius * u.sin(), 0.0];
            let normal = normalize_or(
                [
                    position[0] - center[0],
                    position[1] - center[1],
                    position[2] - center[2],
                ],
                [0.0, 0.0, 1.0],
            );

            data.push_vertex(
                position,
                normal,
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    push_grid_indices(&mut data, radial, tubular);
    data
}

/// Generate a (p, q) torus knot
///
/// # Arguments
/// * `radius` - Overall radius of the knot
/// * `tube` - Tube radius
/// * `tubular_segments` - Segments along the knot curve
/// * `radial_segments` - Segments around the tube
/// * `p` - Windings around the axis of rotational symmetry
/// * `q` - Windings around the interior circle of the torus
pub fn generate_torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> GeometryData {
    let mut data = GeometryData::new();
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (p, q) = (p.max(1) as f32, q as f32);

    let knot_point = |u: f32| {
        let qu_over_p = q / p * u;
        let cs = qu_over_p.cos();
        cgmath::Vector3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * u.sin() * 0.5,
            radius * qu_over_p.sin() * 0.5,
        )
    };

    use cgmath::InnerSpace;
    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;
        let p1 = knot_point(u);
        let p2 = knot_point(u + 0.01);

        let tangent = p2 - p1;
        let mut normal = p2 + p1;
        let binormal = tangent.cross(normal).normalize();
        normal = binormal.cross(tangent).normalize();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let position = p1 + normal * cx + binormal * cy;
            let n = (position - p1).normalize();
            data.push_vertex(
                position.into(),
                n.into(),
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    push_grid_indices(&mut data, tubular, radial);
    data
}

/// Indices for a `(rows + 1) x (cols + 1)` vertex grid laid out row by row
fn push_grid_indices(data: &mut GeometryData, rows: u32, cols: u32) {
    for j in 1..=rows {
        for i in 1..=cols {
            let a = (cols + 1) * j + i - 1;
            let b = (cols + 1) * (j - 1) + i - 1;
            let c = (cols + 1) * (j - 1) + i;
            let d = (cols + 1) * j + i;
            data.indices.extend_from_slice(&[a, b, d]);
            data.indices.extend_from_slice(&[b, c, d]);
        }
    }
}

/// Generate a flat disc in the XY plane facing +Z
pub fn generate_circle(radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);

    data.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.5, 0.5]);
    for s in 0..=segs {
        let (sin_t, cos_t) = (s as f32 / segs as f32 * TAU).sin_cos();
        data.push_vertex(
            [radius * cos_t, radius * sin_t, 0.0],
            [0.0, 0.0, 1.0],
            [(cos_t + 1.0) * 0.5, (sin_t + 1.0) * 0.5],
        );
    }
    for i in 1..=segs {
        data.indices.extend_from_slice(&[i, i + 1, 0]);
    }

    data
}

/// Generate a flat annulus in the XY plane facing +Z
pub fn generate_ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = theta_segments.max(3);

    for j in 0..=1u32 {
        let radius = inner_radius + j as f32 * (outer_radius - inner_radius);
        for i in 0..=segs {
            let (sin_t, cos_t) = (i as f32 / segs as f32 * TAU).sin_cos();
            let (x, y) = (radius * cos_t, radius * sin_t);
            let span = outer_radius.abs().max(f32::EPSILON);
            data.push_vertex(
                [x, y, 0.0],
                [0.0, 0.0, 1.0],
                [(x / span + 1.0) * 0.5, (y / span + 1.0) * 0.5],
            );
        }
    }

    for i in 0..segs {
        let a = i;
        let b = i + segs + 1;
        let c = i + segs + 2;
        let d = i + 1;
        data.indices.extend_from_slice(&[a, b, d]);
        data.indices.extend_from_slice(&[b, c, d]);
    }

    data
}

/// Generate a surface of revolution around the Y axis
///
/// # Arguments
/// * `points` - Profile as `[x, y]` pairs, `x` being the distance from the axis,
///   ordered bottom to top
/// * `segments` - Number of segments around the axis
pub fn generate_lathe(points: &[[f32; 2]], segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);
    let n = points.len();
    if n < 2 {
        return data;
    }

    // 2D profile normals from neighbouring points
    let profile_normals: Vec<[f32; 2]> = (0..n)
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(n - 1)];
            let (tx, ty) = (next[0] - prev[0], next[1] - prev[1]);
            let length = (tx * tx + ty * ty).sqrt();
            if length > f32::EPSILON {
                [ty / length, -tx / length]
            } else {
                [1.0, 0.0]
            }
        })
        .collect();

    for j in 0..=segs {
        let u = j as f32 / segs as f32;
        let (sin_p, cos_p) = (u * TAU).sin_cos();
        for (i, point) in points.iter().enumerate() {
            let normal = profile_normals[i];
            data.push_vertex(
                [point[0] * sin_p, point[1], point[0] * cos_p],
                normalize_or([normal[0] * sin_p, normal[1], normal[0] * cos_p], [0.0, 1.0, 0.0]),
                [u, i as f32 / (n - 1) as f32],
            );
        }
    }

    let n = n as u32;
    for j in 0..segs {
        for i in 0..n - 1 {
            let a = j * n + i;
            let b = a + n;
            let c = b + 1;
            let d = a + 1;
            data.indices.extend_from_slice(&[a, b, d]);
            data.indices.extend_from_slice(&[c, d, b]);
        }
    }

    data
}

/// Generate a capsule (cylinder with hemispherical ends) along the Y axis
///
/// # Arguments
/// * `radius` - Radius of the body and caps
/// * `length` - Length of the straight middle section
/// * `cap_segments` - Segments along each hemisphere's profile
/// * `radial_segments` - Segments around the axis
pub fn generate_capsule(radius: f32, length: f32, cap_segments: u32, radial_segments: u32) -> GeometryData {
    let caps = cap_segments.max(1);
    let half = length * 0.5;
    let mut profile = Vec::with_capacity(2 * (caps as usize + 1));

    for i in 0..=caps {
        let angle = -FRAC_PI_2 + FRAC_PI_2 * i as f32 / caps as f32;
        profile.push([radius * angle.cos(), -half + radius * angle.sin()]);
    }
    for i in 0..=caps {
        let angle = FRAC_PI_2 * i as f32 / caps as f32;
        profile.push([radius * angle.cos(), half + radius * angle.sin()]);
    }

    generate_lathe(&profile, radial_segments)
}

/// Generate a filled flat shape in the XY plane facing +Z
///
/// `contour` is a simple (non self-intersecting) polygon in either winding.
pub fn generate_shape(contour: &[[f32; 2]]) -> GeometryData {
    let mut data = GeometryData::new();
    let contour = clean_contour(contour);

    for p in &contour {
        data.push_vertex([p[0], p[1], 0.0], [0.0, 0.0, 1.0], [p[0], p[1]]);
    }
    for [a, b, c] in triangulate_contour(&contour) {
        data.indices.extend_from_slice(&[a as u32, b as u32, c as u32]);
    }

    data
}

/// Parameters for [`generate_extrude`]
#[derive(Debug, Clone, Copy)]
pub struct ExtrudeOptions {
    pub depth: f32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            depth: 1.0,
            bevel_enabled: true,
            bevel_thickness: 0.2,
            bevel_size: 0.1,
            bevel_segments: 3,
        }
    }
}

/// Extrude a 2D contour along +Z with an optional rounded bevel
///
/// The straight section spans `z = 0..depth`; bevels extend it by
/// `bevel_thickness` on both sides while the contour grows by `bevel_size`.
/// Bevel offsets are mitred, which is exact for convex contours.
pub fn generate_extrude(contour: &[[f32; 2]], options: ExtrudeOptions) -> GeometryData {
    let mut data = GeometryData::new();
    let mut contour = clean_contour(contour);
    if contour.len() < 3 {
        return data;
    }
    if signed_area(&contour) < 0.0 {
        contour.reverse();
    }

    // (contour offset, z) from front to back
    let mut layers = Vec::new();
    if options.bevel_enabled && options.bevel_segments > 0 {
        let segs = options.bevel_segments;
        for b in 0..=segs {
            let t = b as f32 / segs as f32 * FRAC_PI_2;
            layers.push((options.bevel_size * t.sin(), -options.bevel_thickness * t.cos()));
        }
        for b in (0..=segs).rev() {
            let t = b as f32 / segs as f32 * FRAC_PI_2;
            layers.push((
                options.bevel_size * t.sin(),
                options.depth + options.bevel_thickness * t.cos(),
            ));
        }
    } else {
        layers.push((0.0, 0.0));
        layers.push((0.0, options.depth));
    }

    let rings: Vec<Vec<[f32; 3]>> = layers
        .iter()
        .map(|&(offset, z)| {
            offset_contour(&contour, offset)
                .into_iter()
                .map(|p| [p[0], p[1], z])
                .collect()
        })
        .collect();

    // side walls, one flat quad per contour edge per layer step
    let n = contour.len();
    for pair in rings.windows(2) {
        let (front, back) = (&pair[0], &pair[1]);
        for k in 0..n {
            let next = (k + 1) % n;
            let (a, b, c, d) = (front[k], front[next], back[next], back[k]);
            if a == d && b == c {
                continue;
            }
            let edge = [contour[next][0] - contour[k][0], contour[next][1] - contour[k][1]];
            let outward = [edge[1], -edge[0], 0.0];
            let normal = face_normal(a, b, c);
            if super::dot(normal, outward) < 0.0 {
                data.push_flat_triangle(a, c, b);
                data.push_flat_triangle(a, d, c);
            } else {
                data.push_flat_triangle(a, b, c);
                data.push_flat_triangle(a, c, d);
            }
        }
    }

    // caps
    let triangles = triangulate_contour(&contour);
    let (first, last) = (&rings[0], &rings[rings.len() - 1]);
    for [i, j, k] in &triangles {
        data.push_flat_triangle(first[*i], first[*k], first[*j]);
        data.push_flat_triangle(last[*i], last[*j], last[*k]);
    }

    data
}

/// Generate a tube of constant radius swept along a curve
///
/// # Arguments
/// * `path` - Curve the tube follows
/// * `tubular_segments` - Segments along the curve
/// * `radius` - Tube radius
/// * `radial_segments` - Segments around the tube
///
/// The ends are left open.
pub fn generate_tube(
    path: &CatmullRomCurve,
    tubular_segments: u32,
    radius: f32,
    radial_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();
    let tubular = tubular_segments.max(1);
    let radial = radial_segments.max(3);
    let frames = compute_frames(path, tubular);

    for i in 0..=tubular {
        let point = path.point_at(i as f32 / tubular as f32);
        let (n, b) = (frames.normals[i as usize], frames.binormals[i as usize]);
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let (sin_v, cos_v) = (v.sin(), -v.cos());
            let normal = n * cos_v + b * sin_v;
            let position = point + normal * radius;
            data.push_vertex(
                position.into(),
                normal.into(),
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    push_grid_indices(&mut data, tubular, radial);
    data
}

/// Drops consecutive duplicates and a closing point equal to the first one
fn clean_contour(contour: &[[f32; 2]]) -> Vec<[f32; 2]> {
    let close = |a: [f32; 2], b: [f32; 2]| (a[0] - b[0]).abs() < 1e-6 && (a[1] - b[1]).abs() < 1e-6;
    let mut out: Vec<[f32; 2]> = Vec::with_capacity(contour.len());
    for &p in contour {
        if out.last().map_or(true, |&last| !close(last, p)) {
            out.push(p);
        }
    }
    while out.len() > 1 && close(out[0], out[out.len() - 1]) {
        out.pop();
    }
    out
}

fn signed_area(contour: &[[f32; 2]]) -> f32 {
    let n = contour.len();
    (0..n)
        .map(|i| {
            let (a, b) = (contour[i], contour[(i + 1) % n]);
            a[0] * b[1] - b[0] * a[1]
        })
        .sum::<f32>()
        * 0.5
}

/// Mitred offset of a counter-clockwise contour; positive grows it
fn offset_contour(contour: &[[f32; 2]], distance: f32) -> Vec<[f32; 2]> {
    if distance == 0.0 {
        return contour.to_vec();
    }
    let n = contour.len();
    let edge_normal = |a: [f32; 2], b: [f32; 2]| {
        let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
        let length = (dx * dx + dy * dy).sqrt().max(f32::EPSILON);
        [dy / length, -dx / length]
    };

    (0..n)
        .map(|i| {
            let prev = contour[(i + n - 1) % n];
            let current = contour[i];
            let next = contour[(i + 1) % n];
            let n0 = edge_normal(prev, current);
            let n1 = edge_normal(current, next);
            let bisector = [n0[0] + n1[0], n0[1] + n1[1]];
            let length = (bisector[0] * bisector[0] + bisector[1] * bisector[1]).sqrt();
            if length < 1e-6 {
                return [current[0] + n1[0] * distance, current[1] + n1[1] * distance];
            }
            let miter = [bisector[0] / length, bisector[1] / length];
            let cos_half = (miter[0] * n1[0] + miter[1] * n1[1]).max(0.1);
            let scale = distance / cos_half;
            [current[0] + miter[0] * scale, current[1] + miter[1] * scale]
        })
        .collect()
}

/// Ear-clipping triangulation of a simple polygon
///
/// Returns counter-clockwise triangles as indices into `contour`.
pub fn triangulate_contour(contour: &[[f32; 2]]) -> Vec<[usize; 3]> {
    let n = contour.len();
    if n < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    if signed_area(contour) < 0.0 {
        remaining.reverse();
    }

    let cross = |a: [f32; 2], b: [f32; 2], c: [f32; 2]| {
        (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
    };
    let inside = |p: [f32; 2], a: [f32; 2], b: [f32; 2], c: [f32; 2]| {
        cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
    };

    let mut triangles = Vec::with_capacity(n - 2);
    while remaining.len() > 3 {
        let count = remaining.len();
        let ear = (0..count).find(|&i| {
            let (ia, ib, ic) = (
                remaining[(i + count - 1) % count],
                remaining[i],
                remaining[(i + 1) % count],
            );
            let (a, b, c) = (contour[ia], contour[ib], contour[ic]);
            if cross(a, b, c) <= 0.0 {
                return false;
            }
            !remaining
                .iter()
                .filter(|&&other| other != ia && other != ib && other != ic)
                .any(|&other| inside(contour[other], a, b, c))
        });

        match ear {
            Some(i) => {
                triangles.push([
                    remaining[(i + count - 1) % count],
                    remaining[i],
                    remaining[(i + 1) % count],
                ]);
                remaining.remove(i);
            }
            None => {
                // degenerate input; finish with a fan rather than looping forever
                for i in 1..remaining.len() - 1 {
                    triangles.push([remaining[0], remaining[i], remaining[i + 1]]);
                }
                return triangles;
            }
        }
    }
    triangles.push([remaining[0], remaining[1], remaining[2]]);
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn assert_well_formed(data: &GeometryData) {
        assert!(!data.is_empty());
        assert_eq!(data.vertices.len(), data.normals.len());
        assert_eq!(data.vertices.len(), data.tex_coords.len());
        assert!(data
            .indices
            .iter()
            .all(|&i| (i as usize) < data.vertices.len()));
        assert_eq!(data.indices.len() % 3, 0);
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box(1.0, 1.0, 1.0);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_well_formed(&cube);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.7, 8, 6);
        assert_well_formed(&sphere);
        assert_eq!(sphere.vertices.len(), 9 * 7);
        let (min, max) = sphere.bounds().unwrap();
        assert!((max[1] - 0.7).abs() < 1e-5);
        assert!((min[1] + 0.7).abs() < 1e-5);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
    }

    #[test]
    fn test_cone_has_no_top_cap() {
        let cone = generate_cone(0.7, 1.0, 32);
        let cylinder = generate_cylinder(0.7, 0.7, 1.0, 32);
        assert_well_formed(&cone);
        assert_well_formed(&cylinder);
        assert!(cone.triangle_count() < cylinder.triangle_count());
        assert_eq!(cylinder.triangle_count(), 32 * 2 + 32 * 2);
    }

    #[test]
    fn test_torus_and_knot() {
        let torus = generate_torus(0.5, 0.2, 16, 100);
        assert_well_formed(&torus);
        assert_eq!(torus.triangle_count(), 16 * 100 * 2);

        let knot = generate_torus_knot(0.5, 0.2, 100, 16, 2, 3);
        assert_well_formed(&knot);
        assert_eq!(knot.triangle_count(), 100 * 16 * 2);
    }

    #[test]
    fn test_flat_shapes() {
        let circle = generate_circle(1.0, 32);
        assert_eq!(circle.triangle_count(), 32);
        let ring = generate_ring(0.3, 1.0, 16);
        assert_eq!(ring.triangle_count(), 32);
        assert_well_formed(&circle);
        assert_well_formed(&ring);
    }

    #[test]
    fn test_lathe_and_capsule() {
        let points: Vec<[f32; 2]> = (0..10)
            .map(|i| [(i as f32 * 0.2).sin() * 0.5 + 0.5, (i as f32 - 5.0) * 0.2])
            .collect();
        let lathe = generate_lathe(&points, 12);
        assert_well_formed(&lathe);
        assert_eq!(lathe.triangle_count(), 12 * 9 * 2);

        let capsule = generate_capsule(0.5, 1.0, 4, 8);
        assert_well_formed(&capsule);
        let (min, max) = capsule.bounds().unwrap();
        assert!((max[1] - 1.0).abs() < 1e-5);
        assert!((min[1] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_triangulate_square_and_concave() {
        let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert_eq!(triangulate_contour(&square).len(), 2);

        // L shape, clockwise
        let l_shape = [
            [0.0, 0.0],
            [0.0, 2.0],
            [1.0, 2.0],
            [1.0, 1.0],
            [2.0, 1.0],
            [2.0, 0.0],
        ];
        assert_eq!(triangulate_contour(&l_shape).len(), 4);
    }

    #[test]
    fn test_extrude_square_with_bevel() {
        let square = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        let options = ExtrudeOptions {
            depth: 0.5,
            bevel_enabled: true,
            bevel_thickness: 0.1,
            bevel_size: 0.1,
            bevel_segments: 3,
        };
        let solid = generate_extrude(&square, options);
        assert_well_formed(&solid);
        let (min, max) = solid.bounds().unwrap();
        assert!((min[2] + 0.1).abs() < 1e-5);
        assert!((max[2] - 0.6).abs() < 1e-5);
        assert!((max[0] - 1.1).abs() < 1e-4);
    }

    #[test]
    fn test_tube_is_open_grid() {
        let path = CatmullRomCurve::new(vec![
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(-0.5, 0.5, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.5, -0.5, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ]);
        let tube = generate_tube(&path, 20, 0.2, 8);
        assert_well_formed(&tube);
        assert_eq!(tube.vertex_count(), 21 * 9);
        assert_eq!(tube.triangle_count(), 20 * 8 * 2);
    }
}
