use std::convert::TryFrom;

use spirv_headers as spv;

use crate::*;

impl Module {
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Entry points in declaration order.
    #[inline]
    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    pub fn get_entry_point(&self, name: &str) -> Option<&EntryPoint> {
        self.entry_points.iter().find(|entry| entry.name == name)
    }

    #[inline]
    pub fn get_type(&self, id: Id) -> Option<&Type> {
        self.types.get(&id)
    }

    pub(crate) fn type_of(&self, id: Id) -> Result<&Type> {
        self.get_type(id).ok_or_else(|| Error::new(
            ErrorKind::UndefinedId, format!("type %{}", id)))
    }

    /// The value of an integer constant.
    #[inline]
    pub fn constant(&self, id: Id) -> Option<u64> {
        self.constants.get(&id).copied()
    }

    /// Module-scope variables in declaration order.
    pub fn variables(&self) -> impl ExactSizeIterator<Item = &Variable> + '_ {
        self.variables.iter()
    }

    pub fn get_variable(&self, id: Id) -> Option<&Variable> {
        self.variables.iter().find(|var| var.id == id)
    }

    pub fn name(&self, id: Id) -> Option<&str> {
        Some(self.names.get(&id)?)
    }

    pub fn member_name(&self, id: Id, member: u32) -> Option<&str> {
        Some(self.member_names.get(&(id, member))?)
    }

    /// The literal parameters of a decoration applied to `id`, or `None`
    /// if the decoration is absent.
    pub fn decoration(&self, id: Id, decoration: spv::Decoration) ->
        Option<&[u32]>
    {
        Some(self.decorations.get(&(id, None, decoration as u32))?)
    }

    pub fn has_decoration(&self, id: Id, decoration: spv::Decoration) -> bool {
        self.decoration(id, decoration).is_some()
    }

    pub fn member_decoration(
        &self,
        id: Id,
        member: u32,
        decoration: spv::Decoration,
    ) -> Option<&[u32]> {
        Some(self.decorations.get(&(id, Some(member), decoration as u32))?)
    }

    pub fn has_member_decoration(
        &self,
        id: Id,
        member: u32,
        decoration: spv::Decoration,
    ) -> bool {
        self.member_decoration(id, member, decoration).is_some()
    }

    /// The length of a sized array type, or `None` for any other type.
    /// Lengths set by specialization constants use the default value.
    pub fn array_length(&self, ty: Id) -> Result<Option<u32>> {
        let length = match self.get_type(ty) {
            Some(&Type::Array { length, .. }) => length,
            _ => return Ok(None),
        };
        let value = self.constant(length).ok_or_else(|| Error::new(
            ErrorKind::UndefinedId, format!("array length constant %{}", length)))?;
        let value = u32::try_from(value).map_err(|_| Error::new(
            ErrorKind::LimitExceeded,
            format!("length {} of array %{}", value, ty)))?;
        Ok(Some(value))
    }

    /// Strips any number of array wrappers from a type.
    pub fn element_type(&self, mut ty: Id) -> Id {
        while let Some(&Type::Array { elem, .. })
            | Some(&Type::RuntimeArray { elem }) = self.get_type(ty)
        {
            ty = elem;
        }
        ty
    }

    /// Array dimensions of a type, outermost first. Runtime arrays are
    /// reported as `None`.
    pub fn array_dims(&self, mut ty: Id) -> Result<Vec<Option<u32>>> {
        let mut dims = Vec::new();
        loop {
            match self.get_type(ty) {
                Some(&Type::Array { elem, .. }) => {
                    dims.push(self.array_length(ty)?);
                    ty = elem;
                },
                Some(&Type::RuntimeArray { elem }) => {
                    dims.push(None);
                    ty = elem;
                },
                _ => break,
            }
        }
        Ok(dims)
    }

    pub fn struct_members(&self, ty: Id) -> Result<&[Id]> {
        match self.type_of(ty)? {
            Type::Struct { members } => Ok(members),
            _ => Err(Error::new(ErrorKind::NotAStruct, format!("%{}", ty))),
        }
    }

    /// The pointee type of a variable.
    pub fn variable_type(&self, var: &Variable) -> Result<Id> {
        match *self.type_of(var.ty)? {
            Type::Pointer { pointee, .. } => Ok(pointee),
            _ => Err(Error::new(ErrorKind::InvalidModule,
                format!("variable %{} is not a pointer", var.id))),
        }
    }
}

impl EntryPoint {
    #[inline]
    pub fn execution_model(&self) -> spv::ExecutionModel {
        self.execution_model
    }

    #[inline]
    pub fn function(&self) -> Id {
        self.function
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ids of the interface variables the entry point declares.
    #[inline]
    pub fn interface(&self) -> &[Id] {
        &self.interface
    }
}

impl Variable {
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// The pointer type of the variable.
    #[inline]
    pub fn ty(&self) -> Id {
        self.ty
    }

    #[inline]
    pub fn storage_class(&self) -> spv::StorageClass {
        self.storage_class
    }

    pub fn is_interface(&self) -> bool {
        is_interface_storage(self.storage_class)
    }
}
