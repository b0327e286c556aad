/// Vertex attribute the scene pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    Position,
    Normal,
    Color,
    TexCoord,
}

/// Semantics in the order the vertex shader declares them.
pub const PIPELINE_SEMANTICS: [Semantic; 4] = [
    Semantic::Position,
    Semantic::Normal,
    Semantic::Color,
    Semantic::TexCoord,
];

impl Semantic {
    /// `@location` of the attribute in the vertex shader.
    pub const fn shader_location(self) -> u32 {
        match self {
            Semantic::Position => 0,
            Semantic::Normal => 1,
            Semantic::Color => 2,
            Semantic::TexCoord => 3,
        }
    }

    /// Attribute key in a glTF primitive.
    pub const fn gltf_name(self) -> &'static str {
        match self {
            Semantic::Position => "POSITION",
            Semantic::Normal => "NORMAL",
            Semantic::Color => "COLOR_0",
            Semantic::TexCoord => "TEXCOORD_0",
        }
    }

    /// Format used when the source primitive lacks this attribute.
    pub const fn default_format(self) -> wgpu::VertexFormat {
        match self {
            Semantic::Position | Semantic::Normal | Semantic::Color => wgpu::VertexFormat::Float32x3,
            Semantic::TexCoord => wgpu::VertexFormat::Float32x2,
        }
    }
}
