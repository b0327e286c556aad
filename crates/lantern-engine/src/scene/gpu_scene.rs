use wgpu::util::DeviceExt;

use super::draw_call::{assemble_draw_call, DrawCallDescriptor};
use super::material::{material_bind_group_layout, plan_materials, GpuMaterial, MaterialPlan};
use super::source::{SourceAsset, SourceSampler};
use super::{SceneError, PIPELINE_SEMANTICS};

/// Contents of the placeholder vertex buffer: four `1.0` floats.
const NULL_VERTEX: [f32; 4] = [1.0; 4];

/// Everything decided about an asset before touching the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePlan {
    /// Source materials followed by the default material.
    pub materials: Vec<MaterialPlan>,
    pub draw_call: DrawCallDescriptor,
}

impl ScenePlan {
    pub fn default_material(&self) -> usize {
        self.materials.len() - 1
    }
}

/// Plans materials and the draw call of `asset`. Fails on the first
/// malformed reference.
pub fn plan_scene(asset: &SourceAsset) -> Result<ScenePlan, SceneError> {
    let materials = plan_materials(asset)?;
    let draw_call = assemble_draw_call(asset, &PIPELINE_SEMANTICS, materials.len() - 1)?;
    Ok(ScenePlan {
        materials,
        draw_call,
    })
}

/// GPU resources of a loaded asset and the draw calls that use them.
///
/// The default texture lives at index `images.len()` of `textures`/`views`,
/// the default sampler at index `samplers.len()` of `samplers`.
pub struct GpuScene {
    material_layout: wgpu::BindGroupLayout,

    draw_calls: Vec<DrawCallDescriptor>,
    materials: Vec<GpuMaterial>,
    samplers: Vec<wgpu::Sampler>,
    views: Vec<wgpu::TextureView>,
    textures: Vec<wgpu::Texture>,
    buffers: Vec<wgpu::Buffer>,
    null_buffer: Option<wgpu::Buffer>,
}

impl GpuScene {
    /// Creates an empty scene; call [`GpuScene::create_from_model`] to fill it.
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            material_layout: material_bind_group_layout(device),
            draw_calls: Vec::new(),
            materials: Vec::new(),
            samplers: Vec::new(),
            views: Vec::new(),
            textures: Vec::new(),
            buffers: Vec::new(),
            null_buffer: None,
        }
    }

    /// Builds a scene from `asset` in one call.
    pub fn from_asset(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        asset: &SourceAsset,
    ) -> Result<Self, SceneError> {
        let mut scene = Self::new(device);
        scene.create_from_model(device, queue, asset)?;
        Ok(scene)
    }

    /// Layout of `@group(1)`, shared by every material of the scene.
    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.material_layout
    }

    pub fn draw_calls(&self) -> &[DrawCallDescriptor] {
        &self.draw_calls
    }

    /// Vertex-buffer layouts of draw call `index`, for pipeline creation.
    pub fn vertex_buffer_layouts(&self, index: usize) -> Option<Vec<wgpu::VertexBufferLayout<'_>>> {
        self.draw_calls
            .get(index)
            .map(DrawCallDescriptor::vertex_buffer_layouts)
    }

    /// Uploads `asset` and plans its draw calls, replacing previous contents.
    ///
    /// All planning happens before any GPU object is created, so a failure
    /// leaves the scene empty.
    pub fn create_from_model(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        asset: &SourceAsset,
    ) -> Result<(), SceneError> {
        self.destroy();

        let ScenePlan {
            materials: plans,
            draw_call,
        } = plan_scene(asset)?;

        self.null_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lantern null vertex buffer"),
            contents: bytemuck::cast_slice(&NULL_VERTEX),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.buffers = asset
            .buffers
            .iter()
            .enumerate()
            .map(|(i, data)| {
                log::debug!("uploading buffer {i} ({} bytes)", data.len());
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("lantern scene buffer"),
                    contents: data,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::INDEX,
                })
            })
            .collect();

        for image in &asset.images {
            self.textures
                .push(upload_rgba8(device, queue, image.width, image.height, &image.rgba));
        }
        self.textures.push(upload_rgba8(device, queue, 1, 1, &[255; 4]));
        self.views = self
            .textures
            .iter()
            .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()))
            .collect();

        self.samplers = asset
            .samplers
            .iter()
            .chain(std::iter::once(&SourceSampler::default()))
            .map(|s| device.create_sampler(&s.descriptor(Some("lantern scene sampler"))))
            .collect();

        let default_view = asset.images.len();
        let default_sampler = asset.samplers.len();
        self.materials = plans
            .iter()
            .map(|plan| {
                GpuMaterial::create(
                    device,
                    &self.material_layout,
                    plan,
                    &self.views[plan.image.unwrap_or(default_view)],
                    &self.samplers[plan.sampler.unwrap_or(default_sampler)],
                )
            })
            .collect();

        log::info!(
            "scene: {} vertex buffers, {} textures, {} materials (+ default), {} indices",
            draw_call.layouts.len(),
            asset.images.len(),
            asset.materials.len(),
            draw_call.index.count
        );
        self.draw_calls = vec![draw_call];
        Ok(())
    }

    /// Records every draw call into `pass`.
    ///
    /// The pipeline and `@group(0)` must already be set; materials are bound
    /// at `material_group`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, material_group: u32) {
        let Some(null_buffer) = &self.null_buffer else {
            return;
        };

        for call in &self.draw_calls {
            for (slot, group) in call.layouts.iter().enumerate() {
                let slice = match group.region {
                    Some(r) => self.buffers[r.buffer].slice(r.offset..r.end()),
                    None => null_buffer.slice(..),
                };
                pass.set_vertex_buffer(slot as u32, slice);
            }

            let index = call.index.region;
            pass.set_index_buffer(
                self.buffers[index.buffer].slice(index.offset..index.end()),
                call.index.format,
            );
            pass.set_bind_group(material_group, &self.materials[call.material].bind_group, &[]);
            pass.draw_indexed(0..call.index.count, 0, 0..1);
        }
    }

    /// Releases every GPU object, in reverse dependency order.
    pub fn destroy(&mut self) {
        self.draw_calls.clear();

        let mut uniform_buffers = Vec::with_capacity(self.materials.len());
        for material in self.materials.drain(..) {
            let GpuMaterial {
                uniform_buffer,
                bind_group,
            } = material;
            drop(bind_group);
            uniform_buffers.push(uniform_buffer);
        }
        for buffer in uniform_buffers {
            buffer.destroy();
        }

        self.samplers.clear();
        self.views.clear();
        for texture in self.textures.drain(..) {
            texture.destroy();
        }
        for buffer in self.buffers.drain(..) {
            buffer.destroy();
        }
        if let Some(buffer) = self.null_buffer.take() {
            buffer.destroy();
        }
    }
}

impl Drop for GpuScene {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn upload_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("lantern scene texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::fixtures;

    #[test]
    fn plan_binds_the_primitive_material() {
        let asset = fixtures::textured();
        let plan = plan_scene(&asset).unwrap();
        assert_eq!(plan.materials.len(), 4);
        assert_eq!(plan.default_material(), 3);
        assert_eq!(plan.draw_call.material, 1);
    }

    #[test]
    fn plan_with_two_materials_binds_index_one() {
        let mut asset = fixtures::textured();
        asset.materials.truncate(2);
        let plan = plan_scene(&asset).unwrap();
        assert_eq!(plan.materials.len(), 3);
        assert_eq!(plan.default_material(), 2);
        assert_eq!(plan.draw_call.material, 1);
    }

    #[test]
    fn malformed_buffers_fail_planning() {
        let mut asset = fixtures::position_color();
        asset.views[1].length = 4096;
        assert!(matches!(plan_scene(&asset), Err(SceneError::ViewOutOfBounds(1))));

        let mut asset = fixtures::position_color();
        asset.accessors[2].count = 0;
        assert!(matches!(plan_scene(&asset), Err(SceneError::EmptyIndices(2))));
    }

    #[test]
    fn plan_falls_back_to_default_material() {
        let asset = fixtures::interleaved();
        let plan = plan_scene(&asset).unwrap();
        assert_eq!(plan.materials.len(), 1);
        assert_eq!(plan.draw_call.material, plan.default_material());
    }

    #[test]
    fn null_vertex_covers_every_default_format() {
        let size = std::mem::size_of_val(&NULL_VERTEX) as u64;
        assert_eq!(size, 16);
        for s in PIPELINE_SEMANTICS {
            assert!(s.default_format().size() <= size);
        }
        assert!(NULL_VERTEX.iter().all(|&v| v == 1.0));
    }
}
