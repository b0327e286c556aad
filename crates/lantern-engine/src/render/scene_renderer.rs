use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{GpuScene, VertexLayoutGroup};

/// Gamma applied by the fragment shader for a surface format.
///
/// sRGB surfaces re-encode on write, so shader colors are linearized first.
pub fn gamma_for_format(format: wgpu::TextureFormat) -> f32 {
    if format.is_srgb() { 2.2 } else { 1.0 }
}

/// Background grey, corrected for `gamma`.
pub fn clear_color(gamma: f32) -> wgpu::Color {
    let v = 0.256f64.powf(f64::from(gamma));
    wgpu::Color {
        r: v,
        g: v,
        b: v,
        a: 1.0,
    }
}

/// Per-frame uniform block, bound at `@group(0) @binding(0)`.
///
/// Layout matches the WGSL `SceneUniforms` struct (240 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub camera_world_position: [f32; 3],
    pub time: f32,
    pub gamma: f32,
    pub _pad: [f32; 3],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0; 4],
            camera_world_position: [0.0; 3],
            time: 0.0,
            gamma: 1.0,
            _pad: [0.0; 3],
        }
    }
}

impl SceneUniforms {
    pub fn set_camera(&mut self, projection: Mat4, view: Mat4, position: Vec3) {
        self.projection = projection.to_cols_array_2d();
        self.view = view.to_cols_array_2d();
        self.camera_world_position = position.to_array();
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PipelineKey {
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    layouts: Vec<VertexLayoutGroup>,
}

/// Draws a [`GpuScene`] with depth testing.
///
/// The pipeline's vertex buffers are the layouts of the scene's first draw
/// call; it is rebuilt when those layouts or the attachment formats change.
pub struct SceneRenderer {
    shader: wgpu::ShaderModule,
    scene_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl SceneRenderer {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lantern scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let scene_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("lantern scene bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<SceneUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let uniform_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lantern scene ubo"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lantern scene bind group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            shader,
            scene_layout,
            uniform_buffer,
            bind_group,
            pipeline_key: None,
            pipeline: None,
        }
    }

    /// Uploads `uniforms` and draws `scene` into `target`, loading the
    /// already-cleared color and depth attachments.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &GpuScene,
        uniforms: &SceneUniforms,
    ) {
        self.ensure_pipeline(ctx, scene);
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        ctx.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lantern scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        scene.draw(&mut rpass, 1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, scene: &GpuScene) {
        let Some(first) = scene.draw_calls().first() else {
            self.pipeline = None;
            self.pipeline_key = None;
            return;
        };

        let key = PipelineKey {
            color_format: ctx.surface_format,
            depth_format: ctx.depth_format,
            layouts: first.layouts.clone(),
        };
        if self.pipeline.is_some() && self.pipeline_key.as_ref() == Some(&key) {
            return;
        }

        log::debug!(
            "building scene pipeline for {:?} with {} vertex buffers",
            key.color_format,
            key.layouts.len()
        );

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("lantern scene pipeline layout"),
                bind_group_layouts: &[&self.scene_layout, scene.material_layout()],
                immediate_size: 0,
            });

        let buffers = first.vertex_buffer_layouts();

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lantern scene pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // glTF double-sidedness is not tracked.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
    }
}
