//! The capability surface the reflection engine consumes. Anything
//! that can answer these queries about a parsed module can be
//! reflected, which keeps the engine independent of any particular IR
//! decoder.
use derive_more::{Display, From};

use crate::*;

pub type Id = u32;

/// The resource categories a module's variables are sorted into.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ResourceKind {
    #[display(fmt = "uniform buffer")]
    UniformBuffer,
    #[display(fmt = "storage buffer")]
    StorageBuffer,
    #[display(fmt = "push constant block")]
    PushConstant,
    #[display(fmt = "sampled image")]
    SampledImage,
    #[display(fmt = "storage image")]
    StorageImage,
    /// User-defined `Input` variables of the stage.
    #[display(fmt = "stage input")]
    StageInput,
}

/// A variable belonging to some resource category.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resource {
    /// The variable itself; resource-level decorations live here.
    pub id: Id,
    /// The variable's pointee type, possibly wrapped in arrays.
    pub type_id: Id,
    /// `type_id` with all array wrappers removed.
    pub base_type_id: Id,
    /// For buffer blocks this is the block (struct) name, falling back
    /// to the variable name; otherwise the variable name. May be empty.
    pub name: String,
}

/// Shape of a type as seen by the classifier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeInfo {
    /// Kind of the innermost scalar, or the aggregate/opaque kind.
    pub base: BaseType,
    /// Vector width; 1 for scalars and non-numeric types.
    pub width: u32,
    /// Matrix column count; 1 for non-matrices.
    pub columns: u32,
    /// Array dimensions, outermost first. `None` is a runtime array.
    pub array: Vec<Option<u32>>,
    /// The type with all array wrappers removed.
    pub base_type_id: Id,
    /// For images and sampled images, the sampled component type.
    pub image_type: Option<Id>,
}

impl TypeInfo {
    /// The outermost array dimension, or 1 if this is not an array.
    /// Runtime arrays also report 1.
    pub fn array_len(&self) -> u32 {
        match self.array.first() {
            Some(&Some(len)) if len > 0 => len,
            _ => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntryPointInfo {
    pub name: String,
    pub execution_model: spv::ExecutionModel,
}

/// A failed provider query, carrying the provider's diagnostic text.
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[display(fmt = "{}", _0)]
pub struct ProviderError(pub String);

impl std::error::Error for ProviderError {}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Queries over one parsed module.
pub trait Introspect {
    /// The IR version as `(major, minor)`.
    fn version(&self) -> (u8, u8);

    /// Entry points in the order the module declares them.
    fn entry_points(&self) -> ProviderResult<Vec<EntryPointInfo>>;

    fn resources(&self, kind: ResourceKind) -> ProviderResult<Vec<Resource>>;

    fn type_info(&self, ty: Id) -> ProviderResult<TypeInfo>;

    /// Member types of a struct in declaration order.
    fn member_types(&self, ty: Id) -> ProviderResult<Vec<Id>>;

    fn has_decoration(&self, id: Id, decoration: spv::Decoration) ->
        ProviderResult<bool>;

    /// The first literal of a decoration on `id`, if present.
    fn decoration(&self, id: Id, decoration: spv::Decoration) ->
        ProviderResult<Option<u32>>;

    /// Like `decoration`, but for a struct member. Member decorations
    /// are a separate namespace from decorations on the struct itself.
    fn member_decoration(
        &self,
        ty: Id,
        member: u32,
        decoration: spv::Decoration,
    ) -> ProviderResult<Option<u32>>;

    fn name(&self, id: Id) -> Option<&str>;

    fn member_name(&self, ty: Id, member: u32) -> Option<&str>;

    /// Struct size including trailing padding implied by the layout.
    fn declared_struct_size(&self, ty: Id) -> ProviderResult<u32>;

    fn declared_struct_member_size(&self, ty: Id, member: u32) ->
        ProviderResult<u32>;
}

/// Turns IR words into a queryable module.
pub trait Provider {
    type Module: Introspect;

    fn parse(&self, words: &[u32]) -> ProviderResult<Self::Module>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(array: Vec<Option<u32>>) -> TypeInfo {
        TypeInfo {
            base: BaseType::Float32,
            width: 1,
            columns: 1,
            array,
            base_type_id: 1,
            image_type: None,
        }
    }

    #[test]
    fn array_len() {
        assert_eq!(info(vec![]).array_len(), 1);
        assert_eq!(info(vec![Some(3), Some(4)]).array_len(), 3);
        assert_eq!(info(vec![None]).array_len(), 1);
        assert_eq!(info(vec![Some(0)]).array_len(), 1);
    }
}
