//! WebGPU render pipeline setup
//!
//! Two pipelines share one shader and one vertex buffer: a triangle list for
//! filled shapes and a line strip for outlines. Model matrices for a frame's
//! draws are packed into one uniform buffer and selected by dynamic offset.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::backend::{DrawMode, RenderBackend, RenderError};
use super::shapes::{IndexTable, ShapeBuffer, ShapeHandle};
use super::vertex::Vertex;
use crate::colors::Color;

/// WGSL source with `vs_main` and `fs_main`
pub const SHADER_SOURCE: &str = include_str!("shader.wgsl");

/// Initial number of per-draw model matrices
const INITIAL_DRAW_CAPACITY: usize = 64;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MatrixUniform {
    matrix: [[f32; 4]; 4],
}

impl From<Mat4> for MatrixUniform {
    fn from(m: Mat4) -> Self {
        Self {
            matrix: m.to_cols_array_2d(),
        }
    }
}

const MATRIX_SIZE: u64 = std::mem::size_of::<MatrixUniform>() as u64;

#[derive(Debug, Clone, Copy)]
struct DrawCommand {
    handle: ShapeHandle,
    transform: Mat4,
    mode: DrawMode,
}

/// Shape geometry on the GPU
struct ShapeBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    indices: IndexTable,
}

/// Main render state
pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    fill_pipeline: wgpu::RenderPipeline,
    outline_pipeline: wgpu::RenderPipeline,

    projection_buffer: wgpu::Buffer,
    model_buffer: wgpu::Buffer,
    model_stride: u64,
    model_capacity: usize,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,

    shapes: Option<ShapeBuffers>,
    clear_color: wgpu::Color,
    draws: Vec<DrawCommand>,
}

impl WgpuBackend {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("flick-pong-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        // Colours are authored as display values, so skip the sRGB encode
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::UnsupportedSurface)?;
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Invalid WGSL surfaces through the device's uncaptured error
        // handler, which aborts with the compiler diagnostics.
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let projection_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection"),
            contents: bytemuck::bytes_of(&MatrixUniform::from(Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let model_stride = wgpu::util::align_to(
            MATRIX_SIZE,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let model_buffer = create_model_buffer(&device, model_stride, INITIAL_DRAW_CAPACITY);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("matrices_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(MATRIX_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(MATRIX_SIZE),
                    },
                    count: None,
                },
            ],
        });
        let bind_group = create_bind_group(
            &device,
            &bind_group_layout,
            &projection_buffer,
            &model_buffer,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let fill_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::TriangleList,
        );
        let outline_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            wgpu::PrimitiveTopology::LineStrip,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            fill_pipeline,
            outline_pipeline,
            projection_buffer,
            model_buffer,
            model_stride,
            model_capacity: INITIAL_DRAW_CAPACITY,
            bind_group_layout,
            bind_group,
            shapes: None,
            clear_color: wgpu::Color::BLACK,
            draws: Vec::new(),
        })
    }

    /// Grow the model-matrix buffer to hold `draws` matrices
    fn reserve_draws(&mut self, draws: usize) {
        if draws <= self.model_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        log::debug!("Growing draw capacity {} -> {}", self.model_capacity, capacity);
        self.model_buffer = create_model_buffer(&self.device, self.model_stride, capacity);
        self.bind_group = create_bind_group(
            &self.device,
            &self.bind_group_layout,
            &self.projection_buffer,
            &self.model_buffer,
        );
        self.model_capacity = capacity;
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl RenderBackend for WgpuBackend {
    fn upload_shapes(&mut self, shapes: &ShapeBuffer) -> Result<(), RenderError> {
        if shapes.vertices.is_empty() {
            return Err(RenderError::NoShapes);
        }
        let indices = IndexTable::build(&shapes.layout);

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("shape_vertices"),
                contents: shapes.as_bytes(),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("shape_indices"),
                contents: bytemuck::cast_slice(&indices.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::info!(
            "Uploaded {} vertices, {} indices",
            shapes.vertices.len(),
            indices.indices.len()
        );
        self.shapes = Some(ShapeBuffers {
            vertex_buffer,
            index_buffer,
            indices,
        });
        Ok(())
    }

    fn replace_sub_region(&mut self, byte_offset: u64, data: &[u8]) {
        if let Some(shapes) = &self.shapes {
            self.queue
                .write_buffer(&shapes.vertex_buffer, byte_offset, data);
        }
    }

    fn set_clear_color(&mut self, color: Color) {
        let [r, g, b] = color;
        self.clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.queue.write_buffer(
            &self.projection_buffer,
            0,
            bytemuck::bytes_of(&MatrixUniform::from(projection)),
        );
    }

    fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.config.width = new_width;
            self.config.height = new_height;
            self.reconfigure();
        }
    }

    fn clear_frame(&mut self) {
        self.draws.clear();
    }

    fn draw_shape(&mut self, handle: ShapeHandle, transform: Mat4, mode: DrawMode) {
        self.draws.push(DrawCommand {
            handle,
            transform,
            mode,
        });
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let draws = std::mem::take(&mut self.draws);
        self.reserve_draws(draws.len());

        let shapes = self.shapes.as_ref().ok_or(RenderError::NoShapes)?;
        let mut ranges = Vec::with_capacity(draws.len());
        for draw in &draws {
            let range = shapes
                .indices
                .range(draw.handle.count, draw.mode)
                .ok_or(RenderError::UnknownShape(draw.handle))?;
            ranges.push(range);
        }

        if !draws.is_empty() {
            let stride = self.model_stride as usize;
            let mut models = vec![0u8; draws.len() * stride];
            for (i, draw) in draws.iter().enumerate() {
                let bytes = MatrixUniform::from(draw.transform);
                models[i * stride..i * stride + MATRIX_SIZE as usize]
                    .copy_from_slice(bytemuck::bytes_of(&bytes));
            }
            self.queue.write_buffer(&self.model_buffer, 0, &models);
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring a frame, skipping");
                return Ok(());
            }
            Err(e) => return Err(RenderError::Surface(e)),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_vertex_buffer(0, shapes.vertex_buffer.slice(..));
            render_pass.set_index_buffer(shapes.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for (i, (draw, range)) in draws.iter().zip(ranges).enumerate() {
                let pipeline = match draw.mode {
                    DrawMode::Filled => &self.fill_pipeline,
                    DrawMode::Outline => &self.outline_pipeline,
                };
                let offset = (i as u64 * self.model_stride) as wgpu::DynamicOffset;
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[offset]);
                render_pass.draw_indexed(range, draw.handle.first as i32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_model_buffer(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("models"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    projection: &wgpu::Buffer,
    models: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("matrices"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: projection.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: models,
                    offset: 0,
                    size: wgpu::BufferSize::new(MATRIX_SIZE),
                }),
            },
        ],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(match topology {
            wgpu::PrimitiveTopology::LineStrip => "outline_pipeline",
            _ => "fill_pipeline",
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
