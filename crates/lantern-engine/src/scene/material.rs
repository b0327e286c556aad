//! Material planning and GPU binding.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::source::SourceAsset;
use super::SceneError;

/// Texcoord selector meaning "no base color texture".
pub const TEXCOORDS_UNUSED: u32 = u32::MAX;

/// Per-material uniform block, bound at `@group(1) @binding(0)`.
///
/// Layout matches the WGSL `MaterialUniforms` struct (32 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub base_color_tex_coords: u32,
    pub _pad: u32,
}

impl MaterialUniforms {
    /// Uniforms of the material used by primitives without one.
    pub const DEFAULT: Self = Self {
        base_color_factor: [1.0, 0.5, 0.5, 1.0],
        metallic_factor: 0.0,
        roughness_factor: 0.2,
        base_color_tex_coords: TEXCOORDS_UNUSED,
        _pad: 0,
    };
}

/// CPU-side description of one material's bindings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialPlan {
    pub uniforms: MaterialUniforms,
    /// Image bound as base color, `None` for the default white texture.
    pub image: Option<usize>,
    /// `None` for the default sampler.
    pub sampler: Option<usize>,
}

/// Plans one binding set per source material, followed by the default
/// material at index `asset.materials.len()`.
pub fn plan_materials(asset: &SourceAsset) -> Result<Vec<MaterialPlan>, SceneError> {
    let mut plans = Vec::with_capacity(asset.materials.len() + 1);

    for material in &asset.materials {
        let mut plan = MaterialPlan {
            uniforms: MaterialUniforms {
                base_color_factor: material.base_color_factor,
                metallic_factor: material.metallic_factor,
                roughness_factor: material.roughness_factor,
                base_color_tex_coords: TEXCOORDS_UNUSED,
                _pad: 0,
            },
            image: None,
            sampler: None,
        };

        if let Some(tex_ref) = material.base_color_texture {
            let texture = asset
                .textures
                .get(tex_ref.texture)
                .ok_or(SceneError::TextureOutOfRange(tex_ref.texture))?;

            if texture.image >= asset.images.len() {
                return Err(SceneError::ImageOutOfRange {
                    texture: tex_ref.texture,
                    image: texture.image,
                });
            }
            if let Some(sampler) = texture.sampler
                && sampler >= asset.samplers.len()
            {
                return Err(SceneError::SamplerOutOfRange {
                    texture: tex_ref.texture,
                    sampler,
                });
            }

            plan.image = Some(texture.image);
            plan.sampler = texture.sampler;
            plan.uniforms.base_color_tex_coords = tex_ref.tex_coord;
        }

        plans.push(plan);
    }

    plans.push(MaterialPlan {
        uniforms: MaterialUniforms::DEFAULT,
        image: None,
        sampler: None,
    });

    Ok(plans)
}

/// Layout of `@group(1)`: material uniforms, base color texture, sampler.
pub fn material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("lantern material bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<MaterialUniforms>() as u64,
                    ),
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Uniform buffer + bind group of one material.
pub struct GpuMaterial {
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl GpuMaterial {
    /// Uploads `plan.uniforms` once and binds them with `view` and `sampler`.
    pub fn create(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        plan: &MaterialPlan,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lantern material uniforms"),
            contents: bytemuck::bytes_of(&plan.uniforms),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lantern material bg"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            uniform_buffer,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::fixtures;

    #[test]
    fn uniform_block_is_32_bytes() {
        assert_eq!(std::mem::size_of::<MaterialUniforms>(), 32);
    }

    #[test]
    fn uniform_block_round_trips_through_bytes() {
        let asset = fixtures::position_color();
        let u = plan_materials(&asset).unwrap()[0].uniforms;
        assert_eq!(u.base_color_factor, asset.materials[0].base_color_factor);
        assert_eq!(u.roughness_factor, asset.materials[0].roughness_factor);

        let bytes = bytemuck::bytes_of(&u).to_vec();
        let back: MaterialUniforms = bytemuck::pod_read_unaligned(&bytes);
        assert_eq!(bytemuck::bytes_of(&back), bytes.as_slice());
        assert_eq!(back, u);
        assert_eq!(&bytes[16..20], &0.0f32.to_ne_bytes());
        assert_eq!(&bytes[20..24], &0.5f32.to_ne_bytes());
        assert_eq!(&bytes[24..28], &TEXCOORDS_UNUSED.to_ne_bytes());
    }

    #[test]
    fn default_material_is_appended_last() {
        let asset = fixtures::position_color();
        let plans = plan_materials(&asset).unwrap();
        assert_eq!(plans.len(), asset.materials.len() + 1);
        assert_eq!(plans[asset.materials.len()].uniforms, MaterialUniforms::DEFAULT);
    }

    #[test]
    fn untextured_material_binds_defaults() {
        let asset = fixtures::position_color();
        let plans = plan_materials(&asset).unwrap();
        let plan = plans[0];
        assert_eq!(plan.image, None);
        assert_eq!(plan.sampler, None);
        assert_eq!(plan.uniforms.base_color_tex_coords, TEXCOORDS_UNUSED);
        assert_eq!(plan.uniforms.base_color_factor, [0.8, 0.2, 0.2, 1.0]);
    }

    #[test]
    fn textured_materials_resolve_image_and_sampler() {
        let asset = fixtures::textured();
        let plans = plan_materials(&asset).unwrap();
        assert_eq!(plans.len(), 4);

        // No sampler on the texture: default sampler.
        assert_eq!(plans[0].image, Some(0));
        assert_eq!(plans[0].sampler, None);
        assert_eq!(plans[0].uniforms.base_color_tex_coords, 0);

        assert_eq!(plans[1].image, Some(0));
        assert_eq!(plans[1].sampler, Some(0));
        assert_eq!(plans[1].uniforms.base_color_tex_coords, 1);

        assert_eq!(plans[2].image, None);
        assert_eq!(plans[2].uniforms.base_color_tex_coords, TEXCOORDS_UNUSED);
    }

    #[test]
    fn dangling_texture_is_rejected() {
        let mut asset = fixtures::textured();
        asset.textures[1].sampler = Some(9);
        assert!(matches!(
            plan_materials(&asset),
            Err(SceneError::SamplerOutOfRange {
                texture: 1,
                sampler: 9
            })
        ));

        let mut asset = fixtures::textured();
        asset.textures.clear();
        assert!(matches!(
            plan_materials(&asset),
            Err(SceneError::TextureOutOfRange(0))
        ));
    }
}
