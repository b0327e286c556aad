//! Mapping from glTF storage descriptions to wgpu formats.

use gltf::accessor::{DataType, Dimensions};
use gltf::image::Format;
use gltf::texture::{MagFilter, MinFilter, WrappingMode};

use super::SceneError;

/// Vertex format for an accessor layout.
///
/// Only layouts the float-typed vertex shader can read are mapped: `f32`
/// vectors and normalized 8/16-bit pairs and quads.
pub fn vertex_format(
    data_type: DataType,
    dimensions: Dimensions,
    normalized: bool,
) -> Option<wgpu::VertexFormat> {
    use wgpu::VertexFormat as F;

    let format = match (data_type, dimensions, normalized) {
        (DataType::F32, Dimensions::Scalar, _) => F::Float32,
        (DataType::F32, Dimensions::Vec2, _) => F::Float32x2,
        (DataType::F32, Dimensions::Vec3, _) => F::Float32x3,
        (DataType::F32, Dimensions::Vec4, _) => F::Float32x4,

        (DataType::U8, Dimensions::Vec2, true) => F::Unorm8x2,
        (DataType::U8, Dimensions::Vec4, true) => F::Unorm8x4,
        (DataType::I8, Dimensions::Vec2, true) => F::Snorm8x2,
        (DataType::I8, Dimensions::Vec4, true) => F::Snorm8x4,

        (DataType::U16, Dimensions::Vec2, true) => F::Unorm16x2,
        (DataType::U16, Dimensions::Vec4, true) => F::Unorm16x4,
        (DataType::I16, Dimensions::Vec2, true) => F::Snorm16x2,
        (DataType::I16, Dimensions::Vec4, true) => F::Snorm16x4,

        _ => return None,
    };
    Some(format)
}

/// Index format for an index accessor. Indices must be scalar `u16` or `u32`.
pub fn index_format(data_type: DataType, dimensions: Dimensions) -> Option<wgpu::IndexFormat> {
    match (data_type, dimensions) {
        (DataType::U16, Dimensions::Scalar) => Some(wgpu::IndexFormat::Uint16),
        (DataType::U32, Dimensions::Scalar) => Some(wgpu::IndexFormat::Uint32),
        _ => None,
    }
}

pub fn index_size(format: wgpu::IndexFormat) -> u64 {
    match format {
        wgpu::IndexFormat::Uint16 => 2,
        wgpu::IndexFormat::Uint32 => 4,
    }
}

pub fn address_mode(mode: WrappingMode) -> wgpu::AddressMode {
    match mode {
        WrappingMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        WrappingMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        WrappingMode::Repeat => wgpu::AddressMode::Repeat,
    }
}

/// Magnification filter; unspecified means linear.
pub fn mag_filter(filter: Option<MagFilter>) -> wgpu::FilterMode {
    match filter {
        Some(MagFilter::Nearest) => wgpu::FilterMode::Nearest,
        Some(MagFilter::Linear) | None => wgpu::FilterMode::Linear,
    }
}

/// Minification and mipmap filters; unspecified means linear / nearest.
pub fn min_filter(filter: Option<MinFilter>) -> (wgpu::FilterMode, wgpu::MipmapFilterMode) {
    use wgpu::{FilterMode as F, MipmapFilterMode as M};

    match filter {
        None | Some(MinFilter::Linear) => (F::Linear, M::Nearest),
        Some(MinFilter::Nearest) => (F::Nearest, M::Nearest),
        Some(MinFilter::NearestMipmapNearest) => (F::Nearest, M::Nearest),
        Some(MinFilter::LinearMipmapNearest) => (F::Linear, M::Nearest),
        Some(MinFilter::NearestMipmapLinear) => (F::Nearest, M::Linear),
        Some(MinFilter::LinearMipmapLinear) => (F::Linear, M::Linear),
    }
}

/// Expands decoded image pixels to tightly packed RGBA8.
///
/// One- and two-channel images are treated as luminance (+ alpha). 16-bit
/// channels keep their high byte, float channels are clamped to `[0, 1]`.
pub fn to_rgba8(
    index: usize,
    format: Format,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<Vec<u8>, SceneError> {
    let (channels, bytes_per_channel) = match format {
        Format::R8 => (1, 1),
        Format::R8G8 => (2, 1),
        Format::R8G8B8 => (3, 1),
        Format::R8G8B8A8 => (4, 1),
        Format::R16 => (1, 2),
        Format::R16G16 => (2, 2),
        Format::R16G16B16 => (3, 2),
        Format::R16G16B16A16 => (4, 2),
        Format::R32G32B32FLOAT => (3, 4),
        Format::R32G32B32A32FLOAT => (4, 4),
    };

    let texel_count = width as usize * height as usize;
    let expected = texel_count * channels * bytes_per_channel;
    if pixels.len() != expected {
        return Err(SceneError::InvalidImage {
            index,
            expected,
            actual: pixels.len(),
        });
    }

    let channel = |bytes: &[u8]| -> u8 {
        match bytes_per_channel {
            1 => bytes[0],
            2 => (u16::from_ne_bytes([bytes[0], bytes[1]]) >> 8) as u8,
            _ => {
                let v = f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                (v.clamp(0.0, 1.0) * 255.0).round() as u8
            }
        }
    };

    let mut out = Vec::with_capacity(texel_count * 4);
    for texel in pixels.chunks_exact(channels * bytes_per_channel) {
        let mut c = texel.chunks_exact(bytes_per_channel).map(channel);
        let rgba = match channels {
            1 => {
                let l = c.next().unwrap_or(0);
                [l, l, l, 255]
            }
            2 => {
                let l = c.next().unwrap_or(0);
                let a = c.next().unwrap_or(255);
                [l, l, l, a]
            }
            _ => [
                c.next().unwrap_or(0),
                c.next().unwrap_or(0),
                c.next().unwrap_or(0),
                c.next().unwrap_or(255),
            ],
        };
        out.extend_from_slice(&rgba);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_vectors_map_directly() {
        assert_eq!(
            vertex_format(DataType::F32, Dimensions::Vec3, false),
            Some(wgpu::VertexFormat::Float32x3)
        );
        assert_eq!(
            vertex_format(DataType::F32, Dimensions::Vec2, false),
            Some(wgpu::VertexFormat::Float32x2)
        );
    }

    #[test]
    fn normalized_bytes_map_to_unorm() {
        assert_eq!(
            vertex_format(DataType::U8, Dimensions::Vec4, true),
            Some(wgpu::VertexFormat::Unorm8x4)
        );
        assert_eq!(vertex_format(DataType::U8, Dimensions::Vec4, false), None);
        assert_eq!(vertex_format(DataType::U8, Dimensions::Vec3, true), None);
        assert_eq!(vertex_format(DataType::F32, Dimensions::Mat4, false), None);
    }

    #[test]
    fn index_formats() {
        assert_eq!(
            index_format(DataType::U16, Dimensions::Scalar),
            Some(wgpu::IndexFormat::Uint16)
        );
        assert_eq!(
            index_format(DataType::U32, Dimensions::Scalar),
            Some(wgpu::IndexFormat::Uint32)
        );
        assert_eq!(index_format(DataType::U8, Dimensions::Scalar), None);
        assert_eq!(index_format(DataType::F32, Dimensions::Scalar), None);
        assert_eq!(index_format(DataType::U16, Dimensions::Vec2), None);
    }

    #[test]
    fn unspecified_filters_are_linear() {
        assert_eq!(mag_filter(None), wgpu::FilterMode::Linear);
        assert_eq!(min_filter(None).0, wgpu::FilterMode::Linear);
        assert_eq!(
            min_filter(Some(MinFilter::NearestMipmapLinear)),
            (wgpu::FilterMode::Nearest, wgpu::MipmapFilterMode::Linear)
        );
    }

    #[test]
    fn rgb8_gains_opaque_alpha() {
        let px = [10, 20, 30, 40, 50, 60];
        let out = to_rgba8(0, Format::R8G8B8, 2, 1, &px).unwrap();
        assert_eq!(out, vec![10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn luminance_alpha_expands_to_grey() {
        let out = to_rgba8(0, Format::R8G8, 1, 1, &[7, 9]).unwrap();
        assert_eq!(out, vec![7, 7, 7, 9]);
    }

    #[test]
    fn sixteen_bit_keeps_high_byte() {
        let mut px = Vec::new();
        for v in [0xAB12u16, 0x0100, 0xFFFF, 0x8000] {
            px.extend_from_slice(&v.to_ne_bytes());
        }
        let out = to_rgba8(0, Format::R16G16B16A16, 1, 1, &px).unwrap();
        assert_eq!(out, vec![0xAB, 0x01, 0xFF, 0x80]);
    }

    #[test]
    fn float_channels_are_clamped() {
        let mut px = Vec::new();
        for v in [2.0f32, -1.0, 0.5] {
            px.extend_from_slice(&v.to_ne_bytes());
        }
        let out = to_rgba8(0, Format::R32G32B32FLOAT, 1, 1, &px).unwrap();
        assert_eq!(out, vec![255, 0, 128, 255]);
    }

    #[test]
    fn short_pixel_data_is_rejected() {
        let err = to_rgba8(3, Format::R8G8B8A8, 2, 2, &[0; 15]).unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidImage {
                index: 3,
                expected: 16,
                actual: 15
            }
        ));
    }
}
