//! Per-category resource classification. Each routine can be called on
//! its own and fails only when the provider does.
use log::debug;

use crate::*;
use crate::layout::label;

fn describe(kind: ResourceKind, res: &Resource) -> String {
    format!("{} {}", kind, label(Some(res.name.as_str()), res.id))
}

impl<'a, M: Introspect> Reflector<'a, M> {
    /// Descriptor set and binding of a resource. Absent decorations
    /// resolve to 0.
    pub fn binding_of(&self, kind: ResourceKind, res: &Resource) ->
        Result<(u32, u32)>
    {
        let context = || describe(kind, res);
        let set = self.module
            .decoration(res.id, spv::Decoration::DescriptorSet)
            .context(context)?
            .unwrap_or(0);
        let binding = self.module
            .decoration(res.id, spv::Decoration::Binding)
            .context(context)?
            .unwrap_or(0);
        Ok((set, binding))
    }

    fn list(&self, kind: ResourceKind) -> Result<Vec<Resource>> {
        self.module.resources(kind)
            .context(|| format!("{} list", kind))
    }

    /// Walks every struct-backed resource of `kind`, skipping the rest.
    fn blocks(&self, kind: ResourceKind) ->
        Result<Vec<(Resource, Vec<BufferMember>, u32)>>
    {
        let mut blocks = Vec::new();
        for res in self.list(kind)? {
            let info = self.module.type_info(res.type_id)
                .context(|| describe(kind, &res))?;
            if info.base != BaseType::Struct {
                debug!("skipping {}: not backed by a struct",
                    describe(kind, &res));
                continue;
            }
            let (members, size) = self.walk_struct(res.base_type_id)?;
            blocks.push((res, members, size));
        }
        Ok(blocks)
    }

    pub fn uniform_buffers(&self) -> Result<Vec<UniformBuffer>> {
        let kind = ResourceKind::UniformBuffer;
        let mut buffers = Vec::new();
        for (res, members, size) in self.blocks(kind)? {
            let (set, binding) = self.binding_of(kind, &res)?;
            buffers.push(UniformBuffer {
                name: res.name,
                set,
                binding,
                members,
                size,
            });
        }
        Ok(buffers)
    }

    /// Access of a storage buffer. `NonWritable` is checked after
    /// `NonReadable`, so a buffer carrying both is read-only.
    pub fn storage_access(&self, res: &Resource) -> Result<StorageAccess> {
        let context = || describe(ResourceKind::StorageBuffer, res);
        let mut access = StorageAccess::ReadWrite;
        if self.module.has_decoration(res.id, spv::Decoration::NonReadable)
            .context(context)?
        {
            access = StorageAccess::WriteOnly;
        }
        if self.module.has_decoration(res.id, spv::Decoration::NonWritable)
            .context(context)?
        {
            access = StorageAccess::ReadOnly;
        }
        Ok(access)
    }

    pub fn storage_buffers(&self) -> Result<Vec<StorageBuffer>> {
        let kind = ResourceKind::StorageBuffer;
        let mut buffers = Vec::new();
        for (res, members, size) in self.blocks(kind)? {
            let (set, binding) = self.binding_of(kind, &res)?;
            let access = self.storage_access(&res)?;
            let name = |id: Id| self.module.name(id).unwrap_or("").to_owned();
            buffers.push(StorageBuffer {
                variable_name: name(res.id),
                type_name: name(res.base_type_id),
                set,
                binding,
                size,
                access,
                members: members.into_iter().map(Into::into).collect(),
            });
        }
        Ok(buffers)
    }

    pub fn push_constants(&self) -> Result<Vec<PushConstantBlock>> {
        Ok(self.blocks(ResourceKind::PushConstant)?.into_iter()
            .map(|(res, members, size)| PushConstantBlock {
                name: res.name,
                members,
                size,
            })
            .collect())
    }

    /// Name, set, binding and sampled component type of each image.
    fn images(&self, kind: ResourceKind) ->
        Result<Vec<(String, u32, u32, ShaderDataType)>>
    {
        let mut images = Vec::new();
        for res in self.list(kind)? {
            let context = || describe(kind, &res);
            let (set, binding) = self.binding_of(kind, &res)?;
            let info = self.module.type_info(res.type_id).context(context)?;
            let data_type = match info.image_type {
                Some(sampled) => {
                    let sampled = self.module.type_info(sampled)
                        .context(context)?;
                    classify(sampled.base, sampled.width, 1)
                },
                None => ShaderDataType::Unknown,
            };
            images.push((res.name, set, binding, data_type));
        }
        Ok(images)
    }

    pub fn sampled_images(&self) -> Result<Vec<SampledImage>> {
        Ok(self.images(ResourceKind::SampledImage)?.into_iter()
            .map(|(name, set, binding, data_type)| SampledImage {
                name,
                set,
                binding,
                data_type,
            })
            .collect())
    }

    pub fn storage_images(&self) -> Result<Vec<StorageImage>> {
        Ok(self.images(ResourceKind::StorageImage)?.into_iter()
            .map(|(name, set, binding, data_type)| StorageImage {
                name,
                set,
                binding,
                data_type,
            })
            .collect())
    }

    /// User-defined stage inputs, ordered by location.
    pub fn stage_inputs(&self) -> Result<Vec<StageInput>> {
        let kind = ResourceKind::StageInput;
        let mut inputs = Vec::new();
        for res in self.list(kind)? {
            let context = || describe(kind, &res);
            let location = self.module
                .decoration(res.id, spv::Decoration::Location)
                .context(context)?
                .unwrap_or(0);
            let info = self.module.type_info(res.type_id).context(context)?;
            inputs.push(StageInput {
                name: res.name.clone(),
                location,
                data_type: classify(info.base, info.width, info.columns),
                array_size: info.array_len(),
            });
        }
        inputs.sort_by_key(|input| input.location);
        Ok(inputs)
    }
}
