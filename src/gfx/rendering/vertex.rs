//! Vertex layouts used by the render pipelines

/// Mesh vertex: position and normal
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex3D {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Helper line vertex: position and flat color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColorVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Line list for a square grid on the XZ plane
///
/// Same layout as a classic grid helper: `divisions` cells across `size`, with
/// the two center lines drawn brighter.
pub fn grid_lines(size: f32, divisions: u32) -> Vec<ColorVertex> {
    let divisions = divisions.max(1);
    let half = size * 0.5;
    let step = size / divisions as f32;
    let center = [0.27, 0.27, 0.27];
    let other = [0.53, 0.53, 0.53];

    let mut lines = Vec::with_capacity((divisions as usize + 1) * 4);
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if i * 2 == divisions { center } else { other };
        lines.push(ColorVertex { position: [-half, 0.0, k], color });
        lines.push(ColorVertex { position: [half, 0.0, k], color });
        lines.push(ColorVertex { position: [k, 0.0, -half], color });
        lines.push(ColorVertex { position: [k, 0.0, half], color });
    }
    lines
}

/// Line list for the three coordinate axes: X red, Y green, Z blue
pub fn axes_lines(length: f32) -> Vec<ColorVertex> {
    let axis = |end: [f32; 3], color: [f32; 3]| {
        [
            ColorVertex { position: [0.0; 3], color },
            ColorVertex { position: end, color },
        ]
    };
    [
        axis([length, 0.0, 0.0], [1.0, 0.0, 0.0]),
        axis([0.0, length, 0.0], [0.0, 1.0, 0.0]),
        axis([0.0, 0.0, length], [0.0, 0.0, 1.0]),
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_line_count() {
        // 11 lines each way, 2 vertices per line
        assert_eq!(grid_lines(10.0, 10).len(), 11 * 2 * 2);
    }

    #[test]
    fn test_axes_are_three_segments() {
        let axes = axes_lines(5.0);
        assert_eq!(axes.len(), 6);
        assert_eq!(axes[3].position, [0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_vertex_stride() {
        assert_eq!(Vertex3D::desc().array_stride, 24);
    }
}
