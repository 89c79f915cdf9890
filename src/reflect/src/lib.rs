//! Shader interface reflection: which descriptor resources a SPIR-V
//! module declares, where they are bound, how buffer blocks are laid
//! out and how storage buffers may be accessed.
//!
//! The engine only talks to a module through the `Introspect` trait.
//! `SpirvProvider` backs it with `prism-spirv`; tests swap in an
//! in-memory fake.
mod data;
mod error;
mod layout;
mod options;
mod provider;
mod reflect;
mod resource;
mod spirv;
#[cfg(test)]
mod testing;
mod types;

pub use data::*;
pub use error::{Error, Result};
pub(crate) use error::ResultExt;
pub use layout::Reflector;
pub use options::*;
pub use provider::*;
pub use reflect::{reflect, reflect_with};
pub use spirv::SpirvProvider;
pub use types::*;
