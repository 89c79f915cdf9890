use std::fmt;

use derive_more::Display;

use crate::*;

/// One member of a buffer block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BufferMember {
    pub name: String,
    pub data_type: ShaderDataType,
    pub offset: u32,
    /// Declared size, including array and matrix strides.
    pub size: u32,
    /// Outermost array dimension; 1 if the member is not an array.
    pub array_len: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UniformBuffer {
    pub name: String,
    pub set: u32,
    pub binding: u32,
    pub members: Vec<BufferMember>,
    /// Declared size of the block, padding included.
    pub size: u32,
}

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum StorageAccess {
    #[display(fmt = "readonly")]
    ReadOnly,
    #[display(fmt = "writeonly")]
    WriteOnly,
    #[display(fmt = "read-write")]
    ReadWrite,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageBufferMember {
    pub name: String,
    pub data_type: ShaderDataType,
    pub offset: u32,
    pub size: u32,
    pub array_len: u32,
    /// First array dimension, 1 if none. Runtime arrays report 1.
    pub array_size: u32,
}

impl From<BufferMember> for StorageBufferMember {
    fn from(member: BufferMember) -> Self {
        Self {
            name: member.name,
            data_type: member.data_type,
            offset: member.offset,
            size: member.size,
            array_len: member.array_len,
            array_size: member.array_len,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageBuffer {
    pub variable_name: String,
    pub type_name: String,
    pub set: u32,
    pub binding: u32,
    pub size: u32,
    pub access: StorageAccess,
    pub members: Vec<StorageBufferMember>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PushConstantBlock {
    pub name: String,
    pub members: Vec<BufferMember>,
    pub size: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SampledImage {
    pub name: String,
    pub set: u32,
    pub binding: u32,
    /// Classification of the sampled component type.
    pub data_type: ShaderDataType,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageImage {
    pub name: String,
    pub set: u32,
    pub binding: u32,
    pub data_type: ShaderDataType,
}

/// A user-defined input variable of the shader stage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StageInput {
    pub name: String,
    pub location: u32,
    pub data_type: ShaderDataType,
    pub array_size: u32,
}

/// Everything reflected from one shader module.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShaderReflection {
    pub entry_point: String,
    /// `None` if the module has no entry point or its execution model
    /// is not a graphics or compute stage.
    pub stage: Option<ShaderStage>,
    pub version: (u8, u8),
    /// A copy of the reflected module.
    pub code: Vec<u8>,
    pub uniform_buffers: Vec<UniformBuffer>,
    pub storage_buffers: Vec<StorageBuffer>,
    pub push_constants: Vec<PushConstantBlock>,
    pub sampled_images: Vec<SampledImage>,
    pub storage_images: Vec<StorageImage>,
    pub stage_inputs: Vec<StageInput>,
}

fn fmt_array(f: &mut fmt::Formatter<'_>, len: u32) -> fmt::Result {
    if len > 1 { write!(f, "[{}]", len)?; }
    Ok(())
}

impl fmt::Display for BufferMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.data_type, self.name)?;
        fmt_array(f, self.array_len)?;
        write!(f, " (offset {}, size {})", self.offset, self.size)
    }
}

impl fmt::Display for StorageBufferMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.data_type, self.name)?;
        fmt_array(f, self.array_size)?;
        write!(f, " (offset {}, size {})", self.offset, self.size)
    }
}

impl fmt::Display for ShaderReflection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry point: {}", self.entry_point)?;
        if let Some(stage) = self.stage {
            write!(f, " ({})", stage)?;
        }
        writeln!(f)?;
        writeln!(f, "version: {}.{}, {} bytes", self.version.0,
            self.version.1, self.code.len())?;

        writeln!(f, "uniform buffers: {}", self.uniform_buffers.len())?;
        for ubo in self.uniform_buffers.iter() {
            writeln!(f, "  {} (set {}, binding {}, size {})", ubo.name,
                ubo.set, ubo.binding, ubo.size)?;
            for member in ubo.members.iter() {
                writeln!(f, "    {}", member)?;
            }
        }

        writeln!(f, "storage buffers: {}", self.storage_buffers.len())?;
        for ssbo in self.storage_buffers.iter() {
            writeln!(f, "  {} {} (set {}, binding {}, size {}, {})",
                ssbo.type_name, ssbo.variable_name, ssbo.set, ssbo.binding,
                ssbo.size, ssbo.access)?;
            for member in ssbo.members.iter() {
                writeln!(f, "    {}", member)?;
            }
        }

        writeln!(f, "push constants: {}", self.push_constants.len())?;
        for block in self.push_constants.iter() {
            writeln!(f, "  {} (size {})", block.name, block.size)?;
            for member in block.members.iter() {
                writeln!(f, "    {}", member)?;
            }
        }

        writeln!(f, "sampled images: {}", self.sampled_images.len())?;
        for image in self.sampled_images.iter() {
            writeln!(f, "  {} {} (set {}, binding {})", image.data_type,
                image.name, image.set, image.binding)?;
        }

        writeln!(f, "storage images: {}", self.storage_images.len())?;
        for image in self.storage_images.iter() {
            writeln!(f, "  {} {} (set {}, binding {})", image.data_type,
                image.name, image.set, image.binding)?;
        }

        writeln!(f, "stage inputs: {}", self.stage_inputs.len())?;
        for input in self.stage_inputs.iter() {
            write!(f, "  {} {}", input.data_type, input.name)?;
            fmt_array(f, input.array_size)?;
            writeln!(f, " (location {})", input.location)?;
        }
        Ok(())
    }
}
