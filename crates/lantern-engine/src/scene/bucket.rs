//! Grouping of primitive attributes into vertex-buffer layouts.
//!
//! Attributes that live in the same buffer view share one vertex buffer slot;
//! semantics the primitive lacks are read from the placeholder buffer.

use super::source::{BufferRegion, SourceAsset, SourcePrimitive};
use super::{format, Semantic, SceneError};

/// Where one semantic's data lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceAttribute {
    pub semantic: Semantic,
    /// Buffer view index, `None` for the placeholder buffer.
    pub block: Option<usize>,
    /// Byte offset within the block.
    pub offset: u64,
    pub format: wgpu::VertexFormat,
    /// Byte distance between consecutive elements; 0 for the placeholder.
    pub stride: u64,
}

/// One vertex-buffer layout of a draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayoutGroup {
    pub block: Option<usize>,
    /// Buffer range bound to this slot, `None` for the placeholder.
    pub region: Option<BufferRegion>,
    pub array_stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayoutGroup {
    pub fn layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.block.is_none()
    }
}

/// Resolves where `semantic` is stored for `primitive`.
pub fn resolve_attribute(
    asset: &SourceAsset,
    primitive: &SourcePrimitive,
    semantic: Semantic,
) -> Result<SourceAttribute, SceneError> {
    let Some(accessor_index) = primitive.attribute(semantic.gltf_name()) else {
        return Ok(SourceAttribute {
            semantic,
            block: None,
            offset: 0,
            format: semantic.default_format(),
            stride: 0,
        });
    };

    let accessor = asset.accessor(accessor_index)?;
    let view_index = accessor
        .view
        .ok_or(SceneError::AccessorWithoutView(accessor_index))?;
    let view = asset.view(view_index)?;

    let format = format::vertex_format(accessor.data_type, accessor.dimensions, accessor.normalized)
        .ok_or(SceneError::UnsupportedVertexFormat {
            data_type: accessor.data_type,
            dimensions: accessor.dimensions,
            normalized: accessor.normalized,
        })?;

    let stride = match view.stride {
        Some(s) if s > 0 => s,
        _ => format.size(),
    };

    let elements = u64::from(accessor.count.max(1));
    let end = accessor.offset + (elements - 1) * stride + format.size();
    if end > view.length {
        return Err(SceneError::AccessorOutOfBounds {
            accessor: accessor_index,
        });
    }

    Ok(SourceAttribute {
        semantic,
        block: Some(view_index),
        offset: accessor.offset,
        format,
        stride,
    })
}

/// Buckets `semantics` of `primitive` into vertex-buffer layouts.
///
/// Every semantic yields exactly one attribute. Groups appear in the order
/// their block is first seen; a group's stride comes from the attribute that
/// created it. A group over a tightly packed view binds the view from its
/// first attribute's offset on, so attribute offsets stay inside the stride.
pub fn bucket_attributes(
    asset: &SourceAsset,
    primitive: &SourcePrimitive,
    semantics: &[Semantic],
) -> Result<Vec<VertexLayoutGroup>, SceneError> {
    let mut groups: Vec<VertexLayoutGroup> = Vec::new();
    // Bytes of the view skipped by each group's region.
    let mut bases: Vec<u64> = Vec::new();

    for &semantic in semantics {
        let attr = resolve_attribute(asset, primitive, semantic)?;

        let slot = match groups.iter().position(|g| g.block == attr.block) {
            Some(i) => i,
            None => {
                let (region, base) = match attr.block {
                    Some(b) => {
                        let view = asset.view(b)?;
                        let base = if view.stride.is_some() { 0 } else { attr.offset };
                        let mut region = view.region();
                        region.offset += base;
                        region.size -= base;
                        (Some(region), base)
                    }
                    None => (None, 0),
                };
                groups.push(VertexLayoutGroup {
                    block: attr.block,
                    region,
                    array_stride: attr.stride,
                    attributes: Vec::new(),
                });
                bases.push(base);
                groups.len() - 1
            }
        };

        let group = &mut groups[slot];
        let offset = match attr.offset.checked_sub(bases[slot]) {
            Some(o) if group.is_placeholder() || o + attr.format.size() <= group.array_stride => o,
            _ => {
                return Err(SceneError::AttributeOutsideStride {
                    semantic,
                    offset: attr.offset,
                    stride: group.array_stride,
                });
            }
        };

        group.attributes.push(wgpu::VertexAttribute {
            format: attr.format,
            offset,
            shader_location: semantic.shader_location(),
        });
    }

    log::debug!(
        "bucketed {} semantics into {} vertex buffers",
        semantics.len(),
        groups.len()
    );
    Ok(groups)
}
