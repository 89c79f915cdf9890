//! Parsed SPIR-V modules exposed as id-keyed tables: the type graph,
//! names, decorations, global variables and entry points, plus the
//! declared buffer-layout sizes derived from them.
use spirv_headers as spv;

mod build;
mod data;
mod error;
mod layout;
pub mod testing;
mod view;

pub use build::{parse_bytes, parse_words};
pub use data::*;
pub use error::*;
pub use view::*;

pub use spv::{BuiltIn, Decoration, Dim, ExecutionModel, ImageFormat};
pub use spv::StorageClass;

pub(crate) fn is_interface_storage(class: spv::StorageClass) -> bool {
    [spv::StorageClass::Input, spv::StorageClass::Output].contains(&class)
}
