//! Render pipeline construction
//!
//! The engine draws into two kinds of targets (the window surface and the
//! RGBA8 capture texture), so every pipeline is built once per target format
//! and grouped into a [`PipelineSet`].

use wgpu::*;

use super::texture_resource::TextureResource;
use super::vertex::{ColorVertex, Vertex3D};

/// Parameters for one render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    pub topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub blend: Option<BlendState>,
    pub depth_write: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            topology: PrimitiveTopology::TriangleList,
            cull_mode: None,
            blend: Some(BlendState::ALPHA_BLENDING),
            depth_write: true,
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_entry_points(mut self, vertex: &'static str, fragment: &'static str) -> Self {
        self.vertex_entry = vertex;
        self.fragment_entry = fragment;
        self
    }

    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_blend(mut self, blend: Option<BlendState>) -> Self {
        self.blend = blend;
        self
    }

    /// Builds the pipeline against `format` with the standard depth buffer
    pub fn build(
        &self,
        device: &Device,
        layout: &PipelineLayout,
        shader: &ShaderModule,
        vertex_layout: VertexBufferLayout<'static>,
        format: TextureFormat,
    ) -> RenderPipeline {
        device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(&self.label),
            layout: Some(layout),
            vertex: VertexState {
                module: shader,
                entry_point: Some(self.vertex_entry),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(FragmentState {
                module: shader,
                entry_point: Some(self.fragment_entry),
                targets: &[Some(ColorTargetState {
                    format,
                    blend: self.blend,
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: PrimitiveState {
                topology: self.topology,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: self.cull_mode,
                unclipped_depth: false,
                polygon_mode: PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: self.depth_write,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// Pipelines for one color target format
pub struct PipelineSet {
    pub format: TextureFormat,
    /// Shaded triangles, alpha blended
    pub fill: RenderPipeline,
    /// Shaded edge lines for wireframe display
    pub edges: RenderPipeline,
    /// Flat colored grid and axes lines
    pub helpers: RenderPipeline,
}

impl PipelineSet {
    pub fn new(device: &Device, layout: &PipelineLayout, shader: &ShaderModule, format: TextureFormat) -> Self {
        let fill = PipelineConfig::default()
            .with_label("Fill Pipeline")
            .build(device, layout, shader, Vertex3D::desc(), format);
        let edges = PipelineConfig::default()
            .with_label("Edge Pipeline")
            .with_primitive_topology(PrimitiveTopology::LineList)
            .build(device, layout, shader, Vertex3D::desc(), format);
        let helpers = PipelineConfig::default()
            .with_label("Helper Pipeline")
            .with_entry_points("vs_helper", "fs_helper")
            .with_primitive_topology(PrimitiveTopology::LineList)
            .with_blend(Some(BlendState::REPLACE))
            .build(device, layout, shader, ColorVertex::desc(), format);

        Self {
            format,
            fill,
            edges,
            helpers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::default()
            .with_label("Lines")
            .with_entry_points("vs_helper", "fs_helper")
            .with_primitive_topology(PrimitiveTopology::LineList)
            .with_blend(None);
        assert_eq!(config.label, "Lines");
        assert_eq!(config.vertex_entry, "vs_helper");
        assert_eq!(config.topology, PrimitiveTopology::LineList);
        assert!(config.blend.is_none());
        assert!(config.depth_write);
    }
}
