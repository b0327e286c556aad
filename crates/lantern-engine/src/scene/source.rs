//! Plain-data view of a glTF asset.
//!
//! Everything the scene builder reads is copied out of the `gltf` document
//! into index-addressed vectors, so planning code can be exercised on
//! hand-built assets without a GPU or a file on disk.

use std::path::Path;

use gltf::accessor::{DataType, Dimensions};

use super::{format, SceneError};

/// Decoded glTF asset.
#[derive(Debug, Clone, Default)]
pub struct SourceAsset {
    /// Raw binary buffers.
    pub buffers: Vec<Vec<u8>>,
    pub views: Vec<SourceView>,
    pub accessors: Vec<SourceAccessor>,
    /// Images already expanded to RGBA8.
    pub images: Vec<SourceImage>,
    pub samplers: Vec<SourceSampler>,
    pub textures: Vec<SourceTexture>,
    pub materials: Vec<SourceMaterial>,
    pub meshes: Vec<SourceMesh>,
}

/// Byte range of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRegion {
    pub buffer: usize,
    pub offset: u64,
    pub size: u64,
}

impl BufferRegion {
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// glTF buffer view ("block").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceView {
    pub buffer: usize,
    pub offset: u64,
    pub length: u64,
    /// `None` when the view is tightly packed.
    pub stride: Option<u64>,
}

impl SourceView {
    pub fn region(&self) -> BufferRegion {
        BufferRegion {
            buffer: self.buffer,
            offset: self.offset,
            size: self.length,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceAccessor {
    pub view: Option<usize>,
    /// Byte offset within the view.
    pub offset: u64,
    pub count: u32,
    pub data_type: DataType,
    pub dimensions: Dimensions,
    pub normalized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceSampler {
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::MipmapFilterMode,
}

impl Default for SourceSampler {
    fn default() -> Self {
        Self {
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        }
    }
}

impl SourceSampler {
    pub fn descriptor<'a>(&self, label: Option<&'a str>) -> wgpu::SamplerDescriptor<'a> {
        wgpu::SamplerDescriptor {
            label,
            address_mode_u: self.address_mode_u,
            address_mode_v: self.address_mode_v,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            mipmap_filter: self.mipmap_filter,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceTexture {
    pub image: usize,
    pub sampler: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRef {
    pub texture: usize,
    /// Index of the `TEXCOORD_n` set the texture is sampled with.
    pub tex_coord: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceMaterial {
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub base_color_texture: Option<TextureRef>,
}

impl Default for SourceMaterial {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0; 4],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            base_color_texture: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMesh {
    pub primitives: Vec<SourcePrimitive>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePrimitive {
    /// `(attribute name, accessor index)`, e.g. `("POSITION", 0)`.
    pub attributes: Vec<(String, usize)>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
}

impl SourcePrimitive {
    /// Accessor index bound to the named attribute.
    pub fn attribute(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, accessor)| accessor)
    }
}

impl SourceAsset {
    /// Loads a `.gltf` or `.glb` file along with its buffers and images.
    pub fn import(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        log::info!("loading glTF asset {}", path.display());
        let (document, buffers, images) = gltf::import(path)?;
        Self::from_gltf(&document, buffers, images)
    }

    /// Loads an asset from memory. External URIs are not resolved.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SceneError> {
        let (document, buffers, images) = gltf::import_slice(bytes)?;
        Self::from_gltf(&document, buffers, images)
    }

    pub fn from_gltf(
        document: &gltf::Document,
        buffers: Vec<gltf::buffer::Data>,
        images: Vec<gltf::image::Data>,
    ) -> Result<Self, SceneError> {
        let buffers = buffers.into_iter().map(|b| b.0).collect();

        let views = document
            .views()
            .map(|v| SourceView {
                buffer: v.buffer().index(),
                offset: v.offset() as u64,
                length: v.length() as u64,
                stride: v.stride().map(|s| s as u64),
            })
            .collect();

        let accessors = document
            .accessors()
            .map(|a| SourceAccessor {
                view: a.view().map(|v| v.index()),
                offset: a.offset() as u64,
                count: a.count() as u32,
                data_type: a.data_type(),
                dimensions: a.dimensions(),
                normalized: a.normalized(),
            })
            .collect();

        let images = images
            .into_iter()
            .enumerate()
            .map(|(i, img)| {
                let rgba = format::to_rgba8(i, img.format, img.width, img.height, &img.pixels)?;
                Ok(SourceImage {
                    width: img.width,
                    height: img.height,
                    rgba,
                })
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        let samplers = document
            .samplers()
            .map(|s| {
                let (min_filter, mipmap_filter) = format::min_filter(s.min_filter());
                SourceSampler {
                    address_mode_u: format::address_mode(s.wrap_s()),
                    address_mode_v: format::address_mode(s.wrap_t()),
                    mag_filter: format::mag_filter(s.mag_filter()),
                    min_filter,
                    mipmap_filter,
                }
            })
            .collect();

        let textures = document
            .textures()
            .map(|t| SourceTexture {
                image: t.source().index(),
                sampler: t.sampler().index(),
            })
            .collect();

        let materials = document
            .materials()
            .map(|m| {
                let pbr = m.pbr_metallic_roughness();
                SourceMaterial {
                    base_color_factor: pbr.base_color_factor(),
                    metallic_factor: pbr.metallic_factor(),
                    roughness_factor: pbr.roughness_factor(),
                    base_color_texture: pbr.base_color_texture().map(|info| TextureRef {
                        texture: info.texture().index(),
                        tex_coord: info.tex_coord(),
                    }),
                }
            })
            .collect();

        let meshes = document
            .meshes()
            .map(|mesh| SourceMesh {
                primitives: mesh
                    .primitives()
                    .map(|p| SourcePrimitive {
                        attributes: p
                            .attributes()
                            .filter_map(|(sem, acc)| attribute_name(&sem).map(|n| (n, acc.index())))
                            .collect(),
                        indices: p.indices().map(|a| a.index()),
                        material: p.material().index(),
                    })
                    .collect(),
            })
            .collect();

        let asset = Self {
            buffers,
            views,
            accessors,
            images,
            samplers,
            textures,
            materials,
            meshes,
        };

        log::info!(
            "asset: {} buffers, {} accessors, {} images, {} materials, {} meshes",
            asset.buffers.len(),
            asset.accessors.len(),
            asset.images.len(),
            asset.materials.len(),
            asset.meshes.len()
        );
        Ok(asset)
    }

    pub fn accessor(&self, index: usize) -> Result<&SourceAccessor, SceneError> {
        self.accessors
            .get(index)
            .ok_or(SceneError::AccessorOutOfRange(index))
    }

    /// View `index`, checked to lie inside its buffer.
    pub fn view(&self, index: usize) -> Result<&SourceView, SceneError> {
        let view = self.views.get(index).ok_or(SceneError::ViewOutOfRange(index))?;
        let buffer_len = self
            .buffers
            .get(view.buffer)
            .map(|b| b.len() as u64)
            .ok_or(SceneError::BufferOutOfRange {
                view: index,
                buffer: view.buffer,
            })?;
        match view.offset.checked_add(view.length) {
            Some(end) if end <= buffer_len => Ok(view),
            _ => Err(SceneError::ViewOutOfBounds(index)),
        }
    }
}

fn attribute_name(semantic: &gltf::Semantic) -> Option<String> {
    use gltf::Semantic as S;

    #[allow(unreachable_patterns)]
    let name = match semantic {
        S::Positions => "POSITION".to_string(),
        S::Normals => "NORMAL".to_string(),
        S::Tangents => "TANGENT".to_string(),
        S::Colors(n) => format!("COLOR_{n}"),
        S::TexCoords(n) => format!("TEXCOORD_{n}"),
        S::Joints(n) => format!("JOINTS_{n}"),
        S::Weights(n) => format!("WEIGHTS_{n}"),
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    // One triangle: POSITION and COLOR_0 in separate views, u16 indices, one
    // untextured material.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "buffers": [{
            "byteLength": 78,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAAAAAAAAAAAAIA/AAABAAIA"
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 72, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "materials": [{
            "pbrMetallicRoughness": {
                "baseColorFactor": [0.8, 0.2, 0.2, 1.0],
                "metallicFactor": 0.0,
                "roughnessFactor": 0.5
            }
        }],
        "meshes": [{
            "primitives": [{
                "attributes": { "POSITION": 0, "COLOR_0": 1 },
                "indices": 2,
                "material": 0
            }]
        }]
    }"#;

    #[test]
    fn imports_embedded_triangle() {
        let asset = SourceAsset::from_slice(TRIANGLE_GLTF.as_bytes()).unwrap();

        assert_eq!(asset.buffers.len(), 1);
        assert!(asset.buffers[0].len() >= 78);
        assert_eq!(asset.views.len(), 3);
        assert_eq!(asset.views[1].offset, 36);
        assert_eq!(asset.views[1].stride, None);

        let idx = asset.accessors[2];
        assert_eq!(idx.view, Some(2));
        assert_eq!(idx.count, 3);
        assert_eq!(idx.data_type, DataType::U16);
        assert_eq!(idx.dimensions, Dimensions::Scalar);

        let prim = &asset.meshes[0].primitives[0];
        assert_eq!(prim.attribute("POSITION"), Some(0));
        assert_eq!(prim.attribute("COLOR_0"), Some(1));
        assert_eq!(prim.attribute("NORMAL"), None);
        assert_eq!(prim.indices, Some(2));
        assert_eq!(prim.material, Some(0));

        let mat = asset.materials[0];
        assert_eq!(mat.base_color_factor, [0.8, 0.2, 0.2, 1.0]);
        assert_eq!(mat.roughness_factor, 0.5);
        assert!(mat.base_color_texture.is_none());
        assert!(asset.images.is_empty());
    }

    #[test]
    fn index_data_survives_import() {
        let asset = SourceAsset::from_slice(TRIANGLE_GLTF.as_bytes()).unwrap();
        let view = asset.views[2];
        let start = view.offset as usize;
        let bytes = &asset.buffers[view.buffer][start..start + view.length as usize];
        let indices: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn malformed_json_is_an_import_error() {
        let err = SourceAsset::from_slice(b"{ not gltf").unwrap_err();
        assert!(matches!(err, SceneError::Import(_)));
    }

    #[test]
    fn missing_accessor_is_reported() {
        let asset = SourceAsset::default();
        assert!(matches!(
            asset.accessor(4),
            Err(SceneError::AccessorOutOfRange(4))
        ));
    }
}
