use derivative::Derivative;
use fnv::FnvHashMap as HashMap;
use spirv_headers as spv;

pub type Id = u32;

/// The SPIR-V version as a pair `(major, minor)`.
pub type Version = (u8, u8);

/// A parsed module. Only the instructions needed for interface
/// reflection are retained; function bodies are discarded.
#[derive(Debug, Default)]
pub struct Module {
    pub(crate) version: Version,
    pub(crate) entry_points: Vec<EntryPoint>,
    pub(crate) types: HashMap<Id, Type>,
    pub(crate) constants: HashMap<Id, u64>,
    // Declaration order
    pub(crate) variables: Vec<Variable>,
    pub(crate) names: HashMap<Id, String>,
    pub(crate) member_names: HashMap<(Id, u32), String>,
    pub(crate) decorations: HashMap<DecorationKey, Vec<u32>>,
}

/// `(target, member, decoration)`. The member is `None` for decorations
/// applied with `OpDecorate` and `Some` for `OpMemberDecorate`, so the
/// two namespaces never collide.
pub(crate) type DecorationKey = (Id, Option<u32>, u32);

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Void,
    Bool,
    Int { width: u32, signed: bool },
    Float { width: u32 },
    Vector { component: Id, count: u32 },
    Matrix { column: Id, count: u32 },
    Image { sampled_type: Id, dim: spv::Dim, sampled: u32 },
    SampledImage { image: Id },
    Sampler,
    /// `length` is the id of a constant.
    Array { elem: Id, length: Id },
    RuntimeArray { elem: Id },
    Struct { members: Vec<Id> },
    Pointer { storage_class: spv::StorageClass, pointee: Id },
    Function,
    /// Any type this crate has no use for, e.g. events or queues.
    Opaque,
}

/// A module-scope `OpVariable`.
#[derive(Clone, Debug, Derivative, PartialEq)]
#[derivative(Default)]
pub struct Variable {
    pub(crate) id: Id,
    /// Pointer type of the variable.
    pub(crate) ty: Id,
    #[derivative(Default(value = "spv::StorageClass::UniformConstant"))]
    pub(crate) storage_class: spv::StorageClass,
}

#[derive(Clone, Debug, Derivative, PartialEq)]
#[derivative(Default)]
pub struct EntryPoint {
    #[derivative(Default(value = "spv::ExecutionModel::Vertex"))]
    pub(crate) execution_model: spv::ExecutionModel,
    pub(crate) function: Id,
    pub(crate) name: String,
    pub(crate) interface: Vec<Id>,
}
