use gltf::accessor::{DataType, Dimensions};
use thiserror::Error;

use super::Semantic;

/// Asset-loading failure.
///
/// Absent optional data (a semantic, texture, sampler or material) is never an
/// error; it resolves to a placeholder or default instead.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to import glTF: {0}")]
    Import(#[from] gltf::Error),
    #[error("asset has no mesh")]
    NoMesh,
    #[error("mesh has no primitive")]
    NoPrimitive,
    #[error("primitive has no index accessor")]
    MissingIndices,
    #[error("accessor {0} is out of range")]
    AccessorOutOfRange(usize),
    #[error("accessor {0} has no buffer view")]
    AccessorWithoutView(usize),
    #[error("buffer view {0} is out of range")]
    ViewOutOfRange(usize),
    #[error("buffer view {view} references missing buffer {buffer}")]
    BufferOutOfRange { view: usize, buffer: usize },
    #[error("buffer view {0} extends past the end of its buffer")]
    ViewOutOfBounds(usize),
    #[error("accessor {accessor} reads past the end of its buffer view")]
    AccessorOutOfBounds { accessor: usize },
    #[error("{semantic:?} at byte {offset} does not fit in a vertex stride of {stride}")]
    AttributeOutsideStride {
        semantic: Semantic,
        offset: u64,
        stride: u64,
    },
    #[error("index accessor {0} is empty")]
    EmptyIndices(usize),
    #[error("unsupported vertex format: {data_type:?} {dimensions:?} (normalized: {normalized})")]
    UnsupportedVertexFormat {
        data_type: DataType,
        dimensions: Dimensions,
        normalized: bool,
    },
    #[error("unsupported index format: {data_type:?} {dimensions:?}")]
    UnsupportedIndexFormat {
        data_type: DataType,
        dimensions: Dimensions,
    },
    #[error("image {index} has {actual} bytes, expected {expected}")]
    InvalidImage {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("texture {0} is out of range")]
    TextureOutOfRange(usize),
    #[error("texture {texture} references missing image {image}")]
    ImageOutOfRange { texture: usize, image: usize },
    #[error("texture {texture} references missing sampler {sampler}")]
    SamplerOutOfRange { texture: usize, sampler: usize },
    #[error("primitive references missing material {0}")]
    MaterialOutOfRange(usize),
}
