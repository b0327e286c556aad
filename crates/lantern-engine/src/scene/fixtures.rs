//! Hand-built assets for planning tests.

use gltf::accessor::{DataType, Dimensions};

use super::source::{
    SourceAccessor, SourceAsset, SourceImage, SourceMaterial, SourceMesh, SourcePrimitive,
    SourceSampler, SourceTexture, SourceView, TextureRef,
};

fn accessor(view: usize, offset: u64, data_type: DataType, dimensions: Dimensions) -> SourceAccessor {
    SourceAccessor {
        view: Some(view),
        offset,
        count: 3,
        data_type,
        dimensions,
        normalized: false,
    }
}

fn primitive(attributes: &[(&str, usize)], indices: usize, material: Option<usize>) -> SourcePrimitive {
    SourcePrimitive {
        attributes: attributes.iter().map(|&(n, a)| (n.to_string(), a)).collect(),
        indices: Some(indices),
        material,
    }
}

/// One triangle with POSITION and COLOR_0 in separate tightly packed views,
/// `u16` indices and one untextured material.
pub fn position_color() -> SourceAsset {
    SourceAsset {
        buffers: vec![vec![0; 78]],
        views: vec![
            SourceView { buffer: 0, offset: 0, length: 36, stride: None },
            SourceView { buffer: 0, offset: 36, length: 36, stride: None },
            SourceView { buffer: 0, offset: 72, length: 6, stride: None },
        ],
        accessors: vec![
            accessor(0, 0, DataType::F32, Dimensions::Vec3),
            accessor(1, 0, DataType::F32, Dimensions::Vec3),
            accessor(2, 0, DataType::U16, Dimensions::Scalar),
        ],
        materials: vec![SourceMaterial {
            base_color_factor: [0.8, 0.2, 0.2, 1.0],
            metallic_factor: 0.0,
            roughness_factor: 0.5,
            base_color_texture: None,
        }],
        meshes: vec![SourceMesh {
            primitives: vec![primitive(&[("POSITION", 0), ("COLOR_0", 1)], 2, Some(0))],
        }],
        ..Default::default()
    }
}

/// POSITION, NORMAL and TEXCOORD_0 interleaved in one 32-byte-stride view,
/// `u32` indices at a non-zero accessor offset, no material.
pub fn interleaved() -> SourceAsset {
    SourceAsset {
        buffers: vec![vec![0; 112]],
        views: vec![
            SourceView { buffer: 0, offset: 0, length: 96, stride: Some(32) },
            SourceView { buffer: 0, offset: 96, length: 16, stride: None },
        ],
        accessors: vec![
            accessor(0, 0, DataType::F32, Dimensions::Vec3),
            accessor(0, 12, DataType::F32, Dimensions::Vec3),
            accessor(0, 24, DataType::F32, Dimensions::Vec2),
            accessor(1, 4, DataType::U32, Dimensions::Scalar),
        ],
        meshes: vec![SourceMesh {
            primitives: vec![primitive(
                &[("NORMAL", 1), ("POSITION", 0), ("TEXCOORD_0", 2)],
                3,
                None,
            )],
        }],
        ..Default::default()
    }
}

/// `position_color` with three materials: textured without a sampler,
/// textured with a sampler on TEXCOORD_1, and untextured.
pub fn textured() -> SourceAsset {
    let mut asset = position_color();
    asset.images = vec![SourceImage {
        width: 2,
        height: 2,
        rgba: vec![255; 16],
    }];
    asset.samplers = vec![SourceSampler {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
    }];
    asset.textures = vec![
        SourceTexture { image: 0, sampler: None },
        SourceTexture { image: 0, sampler: Some(0) },
    ];
    asset.materials = vec![
        SourceMaterial {
            base_color_texture: Some(TextureRef { texture: 0, tex_coord: 0 }),
            ..Default::default()
        },
        SourceMaterial {
            base_color_texture: Some(TextureRef { texture: 1, tex_coord: 1 }),
            ..Default::default()
        },
        SourceMaterial::default(),
    ];
    asset.meshes[0].primitives[0].material = Some(1);
    asset
}
