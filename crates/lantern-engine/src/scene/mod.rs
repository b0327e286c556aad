//! glTF scene loading.
//!
//! Responsibilities:
//! - copy a glTF document into a plain-data [`SourceAsset`]
//! - bucket primitive attributes into vertex-buffer layouts, with a
//!   placeholder buffer standing in for absent semantics
//! - plan one binding set per material plus a default one
//! - upload everything into a [`GpuScene`] and record its draw calls
//!
//! Planning is pure and GPU-free; only [`GpuScene`] and [`GpuMaterial`]
//! touch the device.

mod bucket;
mod draw_call;
mod error;
mod format;
mod gpu_scene;
mod material;
mod semantic;
mod source;

#[cfg(test)]
mod fixtures;

pub use bucket::{bucket_attributes, resolve_attribute, SourceAttribute, VertexLayoutGroup};
pub use draw_call::{assemble_draw_call, DrawCallDescriptor, IndexBinding};
pub use error::SceneError;
pub use format::{index_format, to_rgba8, vertex_format};
pub use gpu_scene::{plan_scene, GpuScene, ScenePlan};
pub use material::{
    material_bind_group_layout, plan_materials, GpuMaterial, MaterialPlan, MaterialUniforms,
    TEXCOORDS_UNUSED,
};
pub use semantic::{Semantic, PIPELINE_SEMANTICS};
pub use source::{
    BufferRegion, SourceAccessor, SourceAsset, SourceImage, SourceMaterial, SourceMesh,
    SourcePrimitive, SourceSampler, SourceTexture, SourceView, TextureRef,
};
