use super::bucket::{bucket_attributes, VertexLayoutGroup};
use super::source::{BufferRegion, SourceAsset};
use super::{format, SceneError, Semantic};

/// Index buffer binding of a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBinding {
    /// View offset shifted by the accessor offset; sized to `count` indices.
    pub region: BufferRegion,
    pub format: wgpu::IndexFormat,
    pub count: u32,
}

/// Everything needed to record one indexed draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCallDescriptor {
    pub layouts: Vec<VertexLayoutGroup>,
    pub index: IndexBinding,
    /// Index into the material list; `default_material` when the primitive has none.
    pub material: usize,
}

impl DrawCallDescriptor {
    pub fn vertex_buffer_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        self.layouts.iter().map(VertexLayoutGroup::layout).collect()
    }
}

/// Assembles the draw call of the first primitive of the first mesh.
pub fn assemble_draw_call(
    asset: &SourceAsset,
    semantics: &[Semantic],
    default_material: usize,
) -> Result<DrawCallDescriptor, SceneError> {
    let mesh = asset.meshes.first().ok_or(SceneError::NoMesh)?;
    let primitive = mesh.primitives.first().ok_or(SceneError::NoPrimitive)?;

    if asset.meshes.len() > 1 || mesh.primitives.len() > 1 {
        log::warn!(
            "asset has {} meshes ({} primitives in the first); only the first primitive is drawn",
            asset.meshes.len(),
            mesh.primitives.len()
        );
    }

    let layouts = bucket_attributes(asset, primitive, semantics)?;

    let index_accessor = primitive.indices.ok_or(SceneError::MissingIndices)?;
    let accessor = asset.accessor(index_accessor)?;
    if accessor.count == 0 {
        return Err(SceneError::EmptyIndices(index_accessor));
    }
    let index_format = format::index_format(accessor.data_type, accessor.dimensions).ok_or(
        SceneError::UnsupportedIndexFormat {
            data_type: accessor.data_type,
            dimensions: accessor.dimensions,
        },
    )?;
    let view_index = accessor
        .view
        .ok_or(SceneError::AccessorWithoutView(index_accessor))?;
    let view = asset.view(view_index)?;

    let size = u64::from(accessor.count) * format::index_size(index_format);
    if accessor.offset + size > view.length {
        return Err(SceneError::AccessorOutOfBounds {
            accessor: index_accessor,
        });
    }

    let index = IndexBinding {
        region: BufferRegion {
            buffer: view.buffer,
            offset: view.offset + accessor.offset,
            size,
        },
        format: index_format,
        count: accessor.count,
    };

    let material = match primitive.material {
        Some(i) if i < default_material => i,
        Some(i) => return Err(SceneError::MaterialOutOfRange(i)),
        None => default_material,
    };

    Ok(DrawCallDescriptor {
        layouts,
        index,
        material,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{fixtures, PIPELINE_SEMANTICS};

    #[test]
    fn own_material_is_used() {
        let asset = fixtures::position_color();
        let call = assemble_draw_call(&asset, &PIPELINE_SEMANTICS, asset.materials.len()).unwrap();
        assert_eq!(call.material, 0);
        assert_eq!(call.layouts.len(), 3);
        assert_eq!(call.vertex_buffer_layouts().len(), 3);
    }

    #[test]
    fn primitive_without_material_uses_default() {
        let asset = fixtures::interleaved();
        assert!(asset.materials.is_empty());
        let call = assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 0).unwrap();
        assert_eq!(call.material, 0);
    }

    #[test]
    fn index_region_includes_accessor_offset() {
        let asset = fixtures::interleaved();
        let call = assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 0).unwrap();
        assert_eq!(call.index.format, wgpu::IndexFormat::Uint32);
        assert_eq!(call.index.count, 3);
        assert_eq!(
            call.index.region,
            BufferRegion {
                buffer: 0,
                offset: 100,
                size: 12
            }
        );
    }

    #[test]
    fn u16_indices() {
        let asset = fixtures::position_color();
        let call = assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 1).unwrap();
        assert_eq!(call.index.format, wgpu::IndexFormat::Uint16);
        assert_eq!(call.index.region.offset, 72);
        assert_eq!(call.index.region.size, 6);
    }

    #[test]
    fn material_out_of_range_is_rejected() {
        let mut asset = fixtures::position_color();
        asset.meshes[0].primitives[0].material = Some(5);
        let err = assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 1).unwrap_err();
        assert!(matches!(err, SceneError::MaterialOutOfRange(5)));
    }

    #[test]
    fn byte_indices_are_unsupported() {
        let mut asset = fixtures::position_color();
        asset.accessors[2].data_type = gltf::accessor::DataType::U8;
        let err = assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 1).unwrap_err();
        assert!(matches!(err, SceneError::UnsupportedIndexFormat { .. }));
    }

    #[test]
    fn missing_indices_and_meshes_are_errors() {
        let mut asset = fixtures::position_color();
        asset.meshes[0].primitives[0].indices = None;
        assert!(matches!(
            assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 1),
            Err(SceneError::MissingIndices)
        ));

        asset.meshes[0].primitives.clear();
        assert!(matches!(
            assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 1),
            Err(SceneError::NoPrimitive)
        ));

        asset.meshes.clear();
        assert!(matches!(
            assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 1),
            Err(SceneError::NoMesh)
        ));
    }

    #[test]
    fn index_overrun_is_rejected() {
        let mut asset = fixtures::position_color();
        asset.accessors[2].count = 4;
        assert!(matches!(
            assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 1),
            Err(SceneError::AccessorOutOfBounds { accessor: 2 })
        ));
    }

    #[test]
    fn empty_index_accessor_is_rejected() {
        let mut asset = fixtures::position_color();
        asset.accessors[2].count = 0;
        assert!(matches!(
            assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 1),
            Err(SceneError::EmptyIndices(2))
        ));
    }

    #[test]
    fn index_view_past_buffer_end_is_rejected() {
        let mut asset = fixtures::position_color();
        asset.views[2].length = 64;
        assert!(matches!(
            assemble_draw_call(&asset, &PIPELINE_SEMANTICS, 1),
            Err(SceneError::ViewOutOfBounds(2))
        ));
    }

    #[test]
    fn second_of_two_materials_is_bound() {
        let mut asset = fixtures::textured();
        asset.materials.truncate(2);
        assert_eq!(asset.meshes[0].primitives[0].material, Some(1));
        let call = assemble_draw_call(&asset, &PIPELINE_SEMANTICS, asset.materials.len()).unwrap();
        assert_eq!(call.material, 1);
    }
}
