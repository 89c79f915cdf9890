//! Buffer block layout: one level of struct members with their offsets
//! and declared sizes.
use log::trace;

use crate::*;

/// Reflects resources out of one parsed module.
#[derive(Debug)]
pub struct Reflector<'a, M> {
    pub(crate) module: &'a M,
    pub(crate) options: &'a ReflectOptions,
}

pub(crate) fn label(name: Option<&str>, id: Id) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("`{}`", name),
        _ => format!("%{}", id),
    }
}

impl<'a, M: Introspect> Reflector<'a, M> {
    pub fn new(module: &'a M, options: &'a ReflectOptions) -> Self {
        Self { module, options }
    }

    pub fn module(&self) -> &'a M {
        self.module
    }

    /// Lays out the members of a struct. Array wrappers around `ty` are
    /// stripped first, so all queries are made against the struct
    /// itself. Nested structs are recorded as single members and not
    /// expanded.
    pub fn walk_struct(&self, ty: Id) -> Result<(Vec<BufferMember>, u32)> {
        let module = self.module;
        let base = module.type_info(ty)
            .context(|| format!("type %{}", ty))?
            .base_type_id;
        let name = label(module.name(base), base);

        let member_types = module.member_types(base)
            .context(|| format!("struct {}", name))?;
        let mut members = Vec::with_capacity(member_types.len());
        for (idx, &member_ty) in member_types.iter().enumerate() {
            let idx = idx as u32;
            let context = || format!("struct {} member {}", name, idx);

            let info = module.type_info(member_ty).context(context)?;
            let offset = module
                .member_decoration(base, idx, spv::Decoration::Offset)
                .context(context)?
                .unwrap_or(0);
            let size = module.declared_struct_member_size(base, idx)
                .context(context)?;
            let member_name = match module.member_name(base, idx) {
                Some(name) if !name.is_empty() => name,
                _ => self.options.unnamed.as_str(),
            };

            members.push(BufferMember {
                name: member_name.to_owned(),
                data_type: classify(info.base, info.width, info.columns),
                offset,
                size,
                array_len: info.array_len(),
            });
        }

        let size = module.declared_struct_size(base)
            .context(|| format!("struct {}", name))?;
        trace!("struct {}: {} members, {} bytes", name, members.len(), size);
        Ok((members, size))
    }
}
