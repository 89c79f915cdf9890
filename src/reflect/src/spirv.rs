//! `Introspect` backed by the tables `prism-spirv` builds from a
//! module's instruction stream.
use spv::{Decoration, Dim, Module, StorageClass, Type};

use crate::*;

/// The default provider: parses words with `prism_spirv::parse_words`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpirvProvider;

impl Provider for SpirvProvider {
    type Module = Module;

    fn parse(&self, words: &[u32]) -> ProviderResult<Module> {
        Ok(spv::parse_words(words)?)
    }
}

impl From<spv::Error> for ProviderError {
    fn from(e: spv::Error) -> Self {
        Self(e.to_string())
    }
}

fn undefined(id: Id) -> ProviderError {
    ProviderError(format!("undefined id: %{}", id))
}

fn scalar_base(module: &Module, ty: Id) -> ProviderResult<BaseType> {
    Ok(match *module.get_type(ty).ok_or_else(|| undefined(ty))? {
        Type::Bool => BaseType::Bool,
        Type::Int { width, signed } => BaseType::int(width, signed),
        Type::Float { width } => BaseType::float(width),
        _ => BaseType::Unknown,
    })
}

fn vector_shape(module: &Module, ty: Id) -> ProviderResult<(BaseType, u32)> {
    match *module.get_type(ty).ok_or_else(|| undefined(ty))? {
        Type::Vector { component, count } =>
            Ok((scalar_base(module, component)?, count)),
        _ => Ok((scalar_base(module, ty)?, 1)),
    }
}

fn is_buffer_block(module: &Module, ty: Id) -> bool {
    matches!(module.get_type(ty), Some(Type::Struct { .. }))
        && (module.has_decoration(ty, Decoration::Block)
            || module.has_decoration(ty, Decoration::BufferBlock))
}

// glslang emits `readonly`/`writeonly` on a buffer block as a member
// decoration on every member rather than on the variable.
fn all_members_decorated(
    module: &Module,
    var: Id,
    decoration: Decoration,
) -> ProviderResult<bool> {
    let var = match module.get_variable(var) {
        Some(var) => var,
        None => return Ok(false),
    };
    let ty = module.element_type(module.variable_type(var)?);
    let members = match module.get_type(ty) {
        Some(Type::Struct { members }) => members.len() as u32,
        _ => return Ok(false),
    };
    Ok(members > 0 && (0..members)
        .all(|i| module.has_member_decoration(ty, i, decoration)))
}

fn is_builtin(module: &Module, var: Id, ty: Id) -> bool {
    if module.has_decoration(var, Decoration::BuiltIn) { return true; }
    // Built-in blocks such as gl_PerVertex decorate their members.
    match module.get_type(ty) {
        Some(Type::Struct { members }) => (0..members.len() as u32)
            .any(|i| module.has_member_decoration(ty, i, Decoration::BuiltIn)),
        _ => false,
    }
}

impl Introspect for Module {
    fn version(&self) -> (u8, u8) {
        Module::version(self)
    }

    fn entry_points(&self) -> ProviderResult<Vec<EntryPointInfo>> {
        Ok(Module::entry_points(self).iter()
            .map(|entry| EntryPointInfo {
                name: entry.name().to_owned(),
                execution_model: entry.execution_model(),
            })
            .collect())
    }

    fn resources(&self, kind: ResourceKind) -> ProviderResult<Vec<Resource>> {
        let mut resources = Vec::new();
        for var in self.variables() {
            let type_id = self.variable_type(var)?;
            let base_type_id = self.element_type(type_id);
            let base = self.get_type(base_type_id);
            let class = var.storage_class();
            let block = is_buffer_block(self, base_type_id);

            let matched = match kind {
                ResourceKind::UniformBuffer => class == StorageClass::Uniform
                    && Module::has_decoration(self, base_type_id, Decoration::Block),
                ResourceKind::StorageBuffer => class == StorageClass::StorageBuffer
                    || class == StorageClass::Uniform && Module::has_decoration(
                        self, base_type_id, Decoration::BufferBlock),
                ResourceKind::PushConstant =>
                    class == StorageClass::PushConstant,
                ResourceKind::SampledImage =>
                    class == StorageClass::UniformConstant
                    && matches!(base, Some(Type::SampledImage { .. })),
                ResourceKind::StorageImage =>
                    class == StorageClass::UniformConstant && match base {
                        Some(&Type::Image { sampled, dim, .. }) =>
                            sampled == 2 && dim != Dim::DimSubpassData,
                        _ => false,
                    },
                ResourceKind::StageInput => class == StorageClass::Input
                    && Module::has_decoration(self, var.id(), Decoration::Location)
                    && !is_builtin(self, var.id(), base_type_id),
            };
            if !matched { continue; }

            let var_name = Module::name(self, var.id());
            let type_name = Module::name(self, base_type_id);
            let name = match kind {
                ResourceKind::UniformBuffer | ResourceKind::StorageBuffer
                    if block => type_name.or(var_name),
                ResourceKind::PushConstant => var_name.or(type_name),
                _ => var_name,
            };
            resources.push(Resource {
                id: var.id(),
                type_id,
                base_type_id,
                name: name.unwrap_or_default().to_owned(),
            });
        }
        Ok(resources)
    }

    fn type_info(&self, ty: Id) -> ProviderResult<TypeInfo> {
        let array = self.array_dims(ty)?;
        let base_type_id = self.element_type(ty);
        let inner = self.get_type(base_type_id)
            .ok_or_else(|| undefined(base_type_id))?;
        let (base, width, columns, image_type) = match *inner {
            Type::Bool | Type::Int { .. } | Type::Float { .. } =>
                (scalar_base(self, base_type_id)?, 1, 1, None),
            Type::Vector { component, count } =>
                (scalar_base(self, component)?, count, 1, None),
            Type::Matrix { column, count } => {
                let (base, width) = vector_shape(self, column)?;
                (base, width, count, None)
            },
            Type::Image { sampled_type, .. } =>
                (BaseType::Image, 1, 1, Some(sampled_type)),
            Type::SampledImage { image } => {
                let sampled_type = match self.get_type(image) {
                    Some(&Type::Image { sampled_type, .. }) => Some(sampled_type),
                    _ => None,
                };
                (BaseType::SampledImage, 1, 1, sampled_type)
            },
            Type::Sampler => (BaseType::Sampler, 1, 1, None),
            Type::Struct { .. } => (BaseType::Struct, 1, 1, None),
            Type::Void => (BaseType::Void, 1, 1, None),
            _ => (BaseType::Unknown, 1, 1, None),
        };
        Ok(TypeInfo {
            base,
            width,
            columns,
            array,
            base_type_id,
            image_type,
        })
    }

    fn member_types(&self, ty: Id) -> ProviderResult<Vec<Id>> {
        Ok(self.struct_members(ty)?.to_vec())
    }

    fn has_decoration(&self, id: Id, decoration: Decoration) ->
        ProviderResult<bool>
    {
        if Module::has_decoration(self, id, decoration) { return Ok(true); }
        match decoration {
            Decoration::NonReadable | Decoration::NonWritable =>
                all_members_decorated(self, id, decoration),
            _ => Ok(false),
        }
    }

    fn decoration(&self, id: Id, decoration: Decoration) ->
        ProviderResult<Option<u32>>
    {
        Ok(Module::decoration(self, id, decoration)
            .and_then(|params| params.first().copied()))
    }

    fn member_decoration(
        &self,
        ty: Id,
        member: u32,
        decoration: Decoration,
    ) -> ProviderResult<Option<u32>> {
        Ok(Module::member_decoration(self, ty, member, decoration)
            .and_then(|params| params.first().copied()))
    }

    fn name(&self, id: Id) -> Option<&str> {
        Module::name(self, id)
    }

    fn member_name(&self, ty: Id, member: u32) -> Option<&str> {
        Module::member_name(self, ty, member)
    }

    fn declared_struct_size(&self, ty: Id) -> ProviderResult<u32> {
        Ok(Module::declared_struct_size(self, ty)?)
    }

    fn declared_struct_member_size(&self, ty: Id, member: u32) ->
        ProviderResult<u32>
    {
        Ok(Module::declared_struct_member_size(self, ty, member)?)
    }
}
