use std::convert::TryFrom;

use derive_more::Display;

/// Semantic kind of a scalar, vector or matrix, independent of shader
/// stage and source language.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ShaderDataType {
    #[display(fmt = "unknown")]
    Unknown,
    #[display(fmt = "float")]
    Float,
    #[display(fmt = "vec2")]
    Vec2,
    #[display(fmt = "vec3")]
    Vec3,
    #[display(fmt = "vec4")]
    Vec4,
    #[display(fmt = "int")]
    Int,
    #[display(fmt = "ivec2")]
    IVec2,
    #[display(fmt = "ivec3")]
    IVec3,
    #[display(fmt = "ivec4")]
    IVec4,
    #[display(fmt = "uint")]
    UInt,
    #[display(fmt = "uvec2")]
    UVec2,
    #[display(fmt = "uvec3")]
    UVec3,
    #[display(fmt = "uvec4")]
    UVec4,
    #[display(fmt = "bool")]
    Bool,
    #[display(fmt = "mat2")]
    Mat2,
    #[display(fmt = "mat3")]
    Mat3,
    #[display(fmt = "mat4")]
    Mat4,
}

impl Default for ShaderDataType {
    fn default() -> Self {
        Self::Unknown
    }
}

/// The fundamental kind of an IR type, with arrays, vectors and
/// matrices stripped away.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BaseType {
    Unknown,
    Void,
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float16,
    Float32,
    Float64,
    Struct,
    Image,
    SampledImage,
    Sampler,
}

impl BaseType {
    pub fn int(width: u32, signed: bool) -> Self {
        match (width, signed) {
            (8, true) => Self::Int8,
            (8, false) => Self::UInt8,
            (16, true) => Self::Int16,
            (16, false) => Self::UInt16,
            (32, true) => Self::Int32,
            (32, false) => Self::UInt32,
            (64, true) => Self::Int64,
            (64, false) => Self::UInt64,
            _ => Self::Unknown,
        }
    }

    pub fn float(width: u32) -> Self {
        match width {
            16 => Self::Float16,
            32 => Self::Float32,
            64 => Self::Float64,
            _ => Self::Unknown,
        }
    }
}

/// Maps a numeric IR type onto its semantic kind.
///
/// `width` is the vector width (1 for scalars) and `columns` the matrix
/// column count (1 for non-matrices). Only square 32-bit float matrices
/// are recognized; any other matrix is classified as if it were a
/// single column. Combinations without a semantic kind, such as 64-bit
/// types or boolean vectors, yield `Unknown`.
pub fn classify(base: BaseType, width: u32, columns: u32) -> ShaderDataType {
    use ShaderDataType as Ty;

    if columns > 1 && base == BaseType::Float32 && width == columns {
        match columns {
            2 => return Ty::Mat2,
            3 => return Ty::Mat3,
            4 => return Ty::Mat4,
            _ => {},
        }
    }

    match (base, width) {
        (BaseType::Float32, 1) => Ty::Float,
        (BaseType::Float32, 2) => Ty::Vec2,
        (BaseType::Float32, 3) => Ty::Vec3,
        (BaseType::Float32, 4) => Ty::Vec4,
        (BaseType::Int32, 1) => Ty::Int,
        (BaseType::Int32, 2) => Ty::IVec2,
        (BaseType::Int32, 3) => Ty::IVec3,
        (BaseType::Int32, 4) => Ty::IVec4,
        (BaseType::UInt32, 1) => Ty::UInt,
        (BaseType::UInt32, 2) => Ty::UVec2,
        (BaseType::UInt32, 3) => Ty::UVec3,
        (BaseType::UInt32, 4) => Ty::UVec4,
        (BaseType::Bool, 1) => Ty::Bool,
        _ => Ty::Unknown,
    }
}

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ShaderStage {
    #[display(fmt = "vertex")]
    Vertex,
    #[display(fmt = "tessellation control")]
    TessControl,
    #[display(fmt = "tessellation evaluation")]
    TessEval,
    #[display(fmt = "geometry")]
    Geometry,
    #[display(fmt = "fragment")]
    Fragment,
    #[display(fmt = "compute")]
    Compute,
}

impl TryFrom<spv::ExecutionModel> for ShaderStage {
    type Error = ();
    fn try_from(val: spv::ExecutionModel) -> Result<Self, Self::Error> {
        Ok(match val {
            spv::ExecutionModel::Vertex => Self::Vertex,
            spv::ExecutionModel::TessellationControl => Self::TessControl,
            spv::ExecutionModel::TessellationEvaluation => Self::TessEval,
            spv::ExecutionModel::Geometry => Self::Geometry,
            spv::ExecutionModel::Fragment => Self::Fragment,
            spv::ExecutionModel::GLCompute => Self::Compute,
            _ => return Err(()),
        })
    }
}
