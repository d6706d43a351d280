//! wgpu render engine for the viewer window
//!
//! [`RenderEngine`] implements [`RenderBackend`]: `render` records the frame
//! state and asks the window for a redraw, `present` draws the recorded state
//! to the surface together with the UI overlay, and `capture_frame` draws the
//! same scene into an off-screen RGBA8 texture and reads it back.

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::pipeline::PipelineSet;
use super::readback;
use super::texture_resource::TextureResource;
use super::vertex::{axes_lines, grid_lines, ColorVertex};
use crate::error::RenderError;
use crate::gfx::backend::{FrameHandle, RenderBackend};
use crate::gfx::camera::CameraUniform;
use crate::gfx::geometry::{GeometryData, Topology};
use crate::gfx::lighting::LightUniform;
use crate::gfx::material::MaterialUniform;
use crate::gfx::scene::{ObjectId, SceneObject, SceneView};
use crate::wgpu_utils::UniformBuffer;

/// Everything the shader reads for one frame
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub camera: CameraUniform,
    pub model: [[f32; 4]; 4],
    pub material: MaterialUniform,
    pub light: LightUniform,
}

/// Uploaded buffers of one scene object
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    edge_buffer: wgpu::Buffer,
    edge_count: u32,
    topology: Topology,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, name: &str, geometry: &GeometryData) -> Self {
        let vertices = geometry.to_vertex_buffer();
        let edges = geometry.edge_indices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Edge Buffer")),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            edge_buffer,
            edge_count: edges.len() as u32,
            topology: geometry.topology,
        }
    }
}

/// Snapshot of a [`SceneView`] in GPU terms
#[derive(Debug, Clone, Copy)]
struct FrameState {
    object: Option<ObjectId>,
    uniform: FrameUniform,
    wireframe: bool,
    grid: bool,
    axes: bool,
    background: [f32; 3],
}

impl FrameState {
    fn from_view(view: &SceneView<'_>) -> Self {
        let camera = CameraUniform::from_camera(view.camera);
        let model: [[f32; 4]; 4] = view
            .object
            .map(|object| object.transform.matrix())
            .unwrap_or_else(|| cgmath::Matrix4::from_scale(1.0))
            .into();

        Self {
            object: view.object.map(|object| object.id),
            uniform: FrameUniform {
                camera,
                model,
                material: view.material.uniform(),
                light: view.lights.uniform(),
            },
            wireframe: view.material.wireframe,
            grid: view.helpers.grid,
            axes: view.helpers.axes,
            background: view.background,
        }
    }
}

struct HelperBuffers {
    grid: wgpu::Buffer,
    grid_count: u32,
    axes: wgpu::Buffer,
    axes_count: u32,
}

impl HelperBuffers {
    fn new(device: &wgpu::Device) -> Self {
        let upload = |label: &str, lines: &[ColorVertex]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(lines),
                usage: wgpu::BufferUsages::VERTEX,
            })
        };
        let grid = grid_lines(10.0, 10);
        let axes = axes_lines(5.0);

        Self {
            grid: upload("Grid Helper Buffer", &grid),
            grid_count: grid.len() as u32,
            axes: upload("Axes Helper Buffer", &axes),
            axes_count: axes.len() as u32,
        }
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline_layout: wgpu::PipelineLayout,
    shader: wgpu::ShaderModule,
    surface_pipelines: PipelineSet,
    capture_pipelines: Option<PipelineSet>,
    frame_uniform: UniformBuffer<FrameUniform>,
    frame_bind_group: wgpu::BindGroup,
    helpers: HelperBuffers,
    meshes: HashMap<ObjectId, GpuMesh>,
    frame: Option<FrameState>,
    next_frame: u64,
    pending_frame: Option<FrameHandle>,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    ///
    /// Picks the first non-sRGB surface format so material colors reach the
    /// screen unconverted.
    pub async fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::Init(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::Init(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::Init(e.to_string()))?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| RenderError::Init("surface reports no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, config.width, config.height, "depth_texture");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Viewer Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let frame_uniform = UniformBuffer::<FrameUniform>::new(&device);
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniform.binding_resource(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Viewer Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let surface_pipelines = PipelineSet::new(&device, &pipeline_layout, &shader, format);
        let helpers = HelperBuffers::new(&device);

        Ok(Self {
            window,
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            depth_texture,
            pipeline_layout,
            shader,
            surface_pipelines,
            capture_pipelines: None,
            frame_uniform,
            frame_bind_group,
            helpers,
            meshes: HashMap::new(),
            frame: None,
            next_frame: 0,
            pending_frame: None,
        })
    }

    /// Draws the last recorded frame to the window, then the UI overlay
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn present<F>(&mut self, ui_callback: Option<F>) -> Result<(), RenderError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.encode_scene(
            &mut encoder,
            &self.surface_pipelines,
            &surface_view,
            &self.depth_texture.view,
            self.frame.as_ref(),
        );

        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &surface_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn encode_scene(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        pipelines: &PipelineSet,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        frame: Option<&FrameState>,
    ) {
        let [r, g, b] = frame.map(|f| f.background).unwrap_or([0.0; 3]);
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let Some(frame) = frame else {
            return;
        };
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        if frame.grid || frame.axes {
            render_pass.set_pipeline(&pipelines.helpers);
            if frame.grid {
                render_pass.set_vertex_buffer(0, self.helpers.grid.slice(..));
                render_pass.draw(0..self.helpers.grid_count, 0..1);
            }
            if frame.axes {
                render_pass.set_vertex_buffer(0, self.helpers.axes.slice(..));
                render_pass.draw(0..self.helpers.axes_count, 0..1);
            }
        }

        let Some(mesh) = frame.object.and_then(|id| self.meshes.get(&id)) else {
            return;
        };
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        if mesh.topology == Topology::Lines || frame.wireframe {
            render_pass.set_pipeline(&pipelines.edges);
            render_pass.set_index_buffer(mesh.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.edge_count, 0, 0..1);
        } else {
            render_pass.set_pipeline(&pipelines.fill);
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    /// Resizes the surface and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, width, height, "depth_texture");
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Hands out the requested display tick, if any, exactly once
    pub fn take_frame_request(&mut self) -> Option<FrameHandle> {
        self.pending_frame.take()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

impl RenderBackend for RenderEngine {
    fn attach_object(&mut self, object: &SceneObject) {
        log::debug!(
            "Uploading {} ({} vertices)",
            object.name,
            object.geometry.vertex_count()
        );
        let mesh = GpuMesh::upload(&self.device, &object.name, &object.geometry);
        self.meshes.insert(object.id, mesh);
    }

    fn detach_object(&mut self, id: ObjectId) {
        self.meshes.remove(&id);
    }

    fn render(&mut self, view: &SceneView<'_>) -> Result<(), RenderError> {
        let frame = FrameState::from_view(view);
        self.frame_uniform.update_content(&self.queue, frame.uniform);
        self.frame = Some(frame);
        self.window.request_redraw();
        Ok(())
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_frame += 1;
        let handle = FrameHandle(self.next_frame);
        self.pending_frame = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
        }
    }

    fn capture_frame(&mut self, view: &SceneView<'_>) -> Result<RgbaImage, RenderError> {
        let frame = FrameState::from_view(view);
        self.frame_uniform.update_content(&self.queue, frame.uniform);

        if self.capture_pipelines.is_none() {
            self.capture_pipelines = Some(PipelineSet::new(
                &self.device,
                &self.pipeline_layout,
                &self.shader,
                TextureResource::CAPTURE_FORMAT,
            ));
        }
        let pipelines = self.capture_pipelines.as_ref().ok_or(RenderError::NotReady)?;

        let (width, height) = self.surface_size();
        let target = TextureResource::create_capture_target(&self.device, width, height);
        let depth = TextureResource::create_depth_texture(&self.device, width, height, "capture_depth");

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Capture Encoder"),
            });
        self.encode_scene(&mut encoder, pipelines, &target.view, &depth.view, Some(&frame));
        self.queue.submit(std::iter::once(encoder.finish()));

        readback::read_texture(&self.device, &self.queue, &target.texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_uniform_layout_matches_shader() {
        // camera 80, model 64, material 48, light 64
        assert_eq!(std::mem::size_of::<FrameUniform>(), 256);
        assert_eq!(std::mem::offset_of!(FrameUniform, model), 80);
        assert_eq!(std::mem::offset_of!(FrameUniform, material), 144);
        assert_eq!(std::mem::offset_of!(FrameUniform, light), 192);
    }
}
