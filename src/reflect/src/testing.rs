//! An in-memory module for exercising the engine without a parser.
use std::cell::Cell;

use fnv::FnvHashMap;

use crate::*;

pub(crate) const FLOAT: Id = 1;
pub(crate) const VEC4: Id = 2;
pub(crate) const INT: Id = 3;
pub(crate) const MAT4: Id = 4;
pub(crate) const GLOBALS: Id = 10;
pub(crate) const GLOBALS_ARRAY: Id = 11;

#[derive(Clone, Debug, Default)]
pub(crate) struct FakeModule {
    pub(crate) entry_points: Vec<EntryPointInfo>,
    pub(crate) resources: FnvHashMap<ResourceKind, Vec<Resource>>,
    pub(crate) types: FnvHashMap<Id, TypeInfo>,
    pub(crate) members: FnvHashMap<Id, Vec<Id>>,
    pub(crate) decorations: FnvHashMap<(Id, u32), Option<u32>>,
    pub(crate) member_decorations: FnvHashMap<(Id, u32, u32), Option<u32>>,
    pub(crate) names: FnvHashMap<Id, String>,
    pub(crate) member_names: FnvHashMap<(Id, u32), String>,
    pub(crate) struct_sizes: FnvHashMap<Id, u32>,
    pub(crate) member_sizes: FnvHashMap<(Id, u32), u32>,
    pub(crate) fail_member_size: bool,
    pub(crate) fail_kind: Option<ResourceKind>,
}

fn missing(what: &str, id: Id) -> ProviderError {
    ProviderError(format!("no {} for %{}", what, id))
}

impl FakeModule {
    /// `struct Globals { float a; vec4 b; }` laid out as std140.
    pub(crate) fn with_globals() -> Self {
        let mut module = Self::default();
        module.numeric(FLOAT, BaseType::Float32, 1, 1);
        module.numeric(VEC4, BaseType::Float32, 4, 1);
        module.numeric(INT, BaseType::Int32, 1, 1);
        module.numeric(MAT4, BaseType::Float32, 4, 4);
        module.structure(GLOBALS, "Globals", &[
            ("a", FLOAT, 0, 4),
            ("b", VEC4, 16, 16),
        ], 32);
        module
    }

    pub(crate) fn numeric(
        &mut self,
        id: Id,
        base: BaseType,
        width: u32,
        columns: u32,
    ) {
        self.types.insert(id, TypeInfo {
            base,
            width,
            columns,
            array: Vec::new(),
            base_type_id: id,
            image_type: None,
        });
    }

    pub(crate) fn image(&mut self, id: Id, base: BaseType, sampled_type: Id) {
        self.numeric(id, base, 1, 1);
        self.types.get_mut(&id).unwrap().image_type = Some(sampled_type);
    }

    /// Wraps `elem` in an array; `None` makes a runtime array.
    pub(crate) fn array(&mut self, id: Id, elem: Id, len: Option<u32>) {
        let mut info = self.types[&elem].clone();
        info.array.insert(0, len);
        self.types.insert(id, info);
    }

    pub(crate) fn structure(
        &mut self,
        id: Id,
        name: &str,
        members: &[(&str, Id, u32, u32)],
        size: u32,
    ) {
        self.numeric(id, BaseType::Struct, 1, 1);
        self.names.insert(id, name.to_owned());
        self.struct_sizes.insert(id, size);
        let offset = spv::Decoration::Offset as u32;
        for (idx, &(member, ty, off, size)) in members.iter().enumerate() {
            let idx = idx as u32;
            self.member_names.insert((id, idx), member.to_owned());
            self.member_decorations.insert((id, idx, offset), Some(off));
            self.member_sizes.insert((id, idx), size);
        }
        self.members.insert(id, members.iter().map(|m| m.1).collect());
    }

    pub(crate) fn resource(
        &mut self,
        kind: ResourceKind,
        id: Id,
        type_id: Id,
        name: &str,
    ) {
        let base_type_id = self.types[&type_id].base_type_id;
        self.resources.entry(kind).or_default().push(Resource {
            id,
            type_id,
            base_type_id,
            name: name.to_owned(),
        });
        self.names.insert(id, name.to_owned());
    }

    pub(crate) fn decorate(
        &mut self,
        id: Id,
        decoration: spv::Decoration,
        value: Option<u32>,
    ) {
        self.decorations.insert((id, decoration as u32), value);
    }

    pub(crate) fn bind(&mut self, id: Id, set: u32, binding: u32) {
        self.decorate(id, spv::Decoration::DescriptorSet, Some(set));
        self.decorate(id, spv::Decoration::Binding, Some(binding));
    }

    pub(crate) fn entry_point(
        &mut self,
        name: &str,
        execution_model: spv::ExecutionModel,
    ) {
        self.entry_points.push(EntryPointInfo {
            name: name.to_owned(),
            execution_model,
        });
    }
}

impl Introspect for FakeModule {
    fn version(&self) -> (u8, u8) {
        (1, 0)
    }

    fn entry_points(&self) -> ProviderResult<Vec<EntryPointInfo>> {
        Ok(self.entry_points.clone())
    }

    fn resources(&self, kind: ResourceKind) -> ProviderResult<Vec<Resource>> {
        if self.fail_kind == Some(kind) {
            return Err(ProviderError(format!("{} list unavailable", kind)));
        }
        Ok(self.resources.get(&kind).cloned().unwrap_or_default())
    }

    fn type_info(&self, ty: Id) -> ProviderResult<TypeInfo> {
        self.types.get(&ty).cloned().ok_or_else(|| missing("type", ty))
    }

    fn member_types(&self, ty: Id) -> ProviderResult<Vec<Id>> {
        self.members.get(&ty).cloned().ok_or_else(|| missing("struct", ty))
    }

    fn has_decoration(&self, id: Id, decoration: spv::Decoration) ->
        ProviderResult<bool>
    {
        Ok(self.decorations.contains_key(&(id, decoration as u32)))
    }

    fn decoration(&self, id: Id, decoration: spv::Decoration) ->
        ProviderResult<Option<u32>>
    {
        Ok(self.decorations.get(&(id, decoration as u32)).copied().flatten())
    }

    fn member_decoration(
        &self,
        ty: Id,
        member: u32,
        decoration: spv::Decoration,
    ) -> ProviderResult<Option<u32>> {
        Ok(self.member_decorations.get(&(ty, member, decoration as u32))
            .copied().flatten())
    }

    fn name(&self, id: Id) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    fn member_name(&self, ty: Id, member: u32) -> Option<&str> {
        self.member_names.get(&(ty, member)).map(String::as_str)
    }

    fn declared_struct_size(&self, ty: Id) -> ProviderResult<u32> {
        self.struct_sizes.get(&ty).copied()
            .ok_or_else(|| missing("struct size", ty))
    }

    fn declared_struct_member_size(&self, ty: Id, member: u32) ->
        ProviderResult<u32>
    {
        if self.fail_member_size {
            return Err(ProviderError("member size unavailable".to_owned()));
        }
        self.member_sizes.get(&(ty, member)).copied()
            .ok_or_else(|| missing("member size", ty))
    }
}

/// Hands out copies of a fixed module, counting parse requests.
#[derive(Debug, Default)]
pub(crate) struct FakeProvider {
    pub(crate) module: FakeModule,
    pub(crate) reject: Option<String>,
    pub(crate) parses: Cell<u32>,
}

impl FakeProvider {
    pub(crate) fn new(module: FakeModule) -> Self {
        Self { module, ..Default::default() }
    }
}

impl Provider for FakeProvider {
    type Module = FakeModule;

    fn parse(&self, _words: &[u32]) -> ProviderResult<FakeModule> {
        self.parses.set(self.parses.get() + 1);
        match self.reject {
            Some(ref msg) => Err(ProviderError(msg.clone())),
            None => Ok(self.module.clone()),
        }
    }
}
