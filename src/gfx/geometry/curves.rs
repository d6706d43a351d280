//! 2D and 3D curve helpers used by the sweep primitives
//!
//! Cubic bezier sampling for filled shapes, a uniform Catmull-Rom spline for tube
//! paths, and parallel-transport frames so a tube's cross-section does not twist.

use cgmath::{InnerSpace, Matrix3, Rad, Vector2, Vector3};

/// Samples a cubic bezier from `p0` to `p3`, excluding `p0`
pub fn sample_cubic_bezier(
    p0: Vector2<f32>,
    p1: Vector2<f32>,
    p2: Vector2<f32>,
    p3: Vector2<f32>,
    divisions: u32,
) -> Vec<Vector2<f32>> {
    let divisions = divisions.max(1);
    (1..=divisions)
        .map(|i| {
            let t = i as f32 / divisions as f32;
            let mt = 1.0 - t;
            p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
        })
        .collect()
}

/// Open uniform Catmull-Rom spline through a list of control points
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    points: Vec<Vector3<f32>>,
}

impl CatmullRomCurve {
    /// Needs at least two points; fewer are padded by repeating the last one
    pub fn new(mut points: Vec<Vector3<f32>>) -> Self {
        while points.len() < 2 {
            let last = points.last().copied().unwrap_or(Vector3::new(0.0, 0.0, 0.0));
            points.push(last);
        }
        Self { points }
    }

    /// Point at parameter `t` in `[0, 1]` over the whole curve
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        let segments = (self.points.len() - 1) as f32;
        let scaled = t.clamp(0.0, 1.0) * segments;
        let segment = (scaled.floor() as usize).min(self.points.len() - 2);
        let local = scaled - segment as f32;

        let p1 = self.points[segment];
        let p2 = self.points[segment + 1];
        // end points are mirrored so the curve passes through them
        let p0 = if segment == 0 {
            p1 * 2.0 - p2
        } else {
            self.points[segment - 1]
        };
        let p3 = if segment + 2 < self.points.len() {
            self.points[segment + 2]
        } else {
            p2 * 2.0 - p1
        };

        let t2 = local * local;
        let t3 = t2 * local;
        (p1 * 2.0
            + (p2 - p0) * local
            + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
            + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
            * 0.5
    }

    /// Unit tangent at `t`, by central difference
    pub fn tangent_at(&self, t: f32) -> Vector3<f32> {
        let delta = 1e-4;
        let t1 = (t - delta).max(0.0);
        let t2 = (t + delta).min(1.0);
        let d = self.point_at(t2) - self.point_at(t1);
        if d.magnitude2() > f32::EPSILON {
            d.normalize()
        } else {
            Vector3::unit_x()
        }
    }
}

/// Moving frame along a curve: tangents, normals and binormals per sample
pub struct CurveFrames {
    pub tangents: Vec<Vector3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub binormals: Vec<Vector3<f32>>,
}

/// Parallel-transport frames for `segments + 1` samples along the curve
pub fn compute_frames(curve: &CatmullRomCurve, segments: u32) -> CurveFrames {
    let count = segments as usize + 1;
    let tangents: Vec<_> = (0..count)
        .map(|i| curve.tangent_at(i as f32 / segments.max(1) as f32))
        .collect();

    // initial normal: perpendicular to the tangent's smallest component axis
    let t0 = tangents[0];
    let axis = if t0.x.abs() <= t0.y.abs() && t0.x.abs() <= t0.z.abs() {
        Vector3::unit_x()
    } else if t0.y.abs() <= t0.z.abs() {
        Vector3::unit_y()
    } else {
        Vector3::unit_z()
    };
    let first_binormal = t0.cross(axis).normalize();
    let mut normals = vec![t0.cross(first_binormal).normalize()];

    for i in 1..count {
        let mut normal = normals[i - 1];
        let axis = tangents[i - 1].cross(tangents[i]);
        if axis.magnitude() > f32::EPSILON {
            let angle = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
            normal = Matrix3::from_axis_angle(axis.normalize(), Rad(angle)) * normal;
        }
        normals.push(normal);
    }

    let binormals = tangents
        .iter()
        .zip(&normals)
        .map(|(t, n)| t.cross(*n))
        .collect();

    CurveFrames {
        tangents,
        normals,
        binormals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catmull_rom_passes_through_control_points() {
        let curve = CatmullRomCurve::new(vec![
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ]);
        assert!((curve.point_at(0.0) - Vector3::new(-1.0, 0.0, 0.0)).magnitude() < 1e-5);
        assert!((curve.point_at(0.5) - Vector3::new(0.0, 1.0, 0.0)).magnitude() < 1e-5);
        assert!((curve.point_at(1.0) - Vector3::new(1.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_frames_are_orthonormal() {
        let curve = CatmullRomCurve::new(vec![
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(-0.5, 0.5, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.5, -0.5, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ]);
        let frames = compute_frames(&curve, 20);
        for i in 0..=20 {
            let (t, n) = (frames.tangents[i], frames.normals[i]);
            assert!(t.dot(n).abs() < 1e-3, "frame {i} not orthogonal");
            assert!((n.magnitude() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_bezier_ends_on_last_point() {
        let samples = sample_cubic_bezier(
            Vector2::new(0.0, 0.5),
            Vector2::new(0.0, 0.5),
            Vector2::new(-0.5, 0.0),
            Vector2::new(0.0, -0.5),
            12,
        );
        assert_eq!(samples.len(), 12);
        assert!((samples[11] - Vector2::new(0.0, -0.5)).magnitude() < 1e-6);
    }
}
