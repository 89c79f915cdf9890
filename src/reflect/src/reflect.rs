use std::convert::TryFrom;

use byteorder::{ByteOrder, NativeEndian};
use fnv::FnvHashMap;
use log::{debug, trace, warn};

use crate::*;

/// Reflects a SPIR-V module with the default provider and options.
pub fn reflect(bytes: &[u8]) -> Result<ShaderReflection> {
    reflect_with(&SpirvProvider, bytes, &ReflectOptions::default())
}

/// Reflects a module using an arbitrary provider. The parsed module
/// lives only for the duration of the call.
pub fn reflect_with<P: Provider>(
    provider: &P,
    bytes: &[u8],
    options: &ReflectOptions,
) -> Result<ShaderReflection> {
    trace!("reflect_with(bytes.len(): {})", bytes.len());

    if bytes.len() % 4 != 0 {
        return Err(Error::MalformedInput { len: bytes.len() });
    }
    let mut words = vec![0u32; bytes.len() / 4];
    NativeEndian::read_u32_into(bytes, &mut words);

    let module = provider.parse(&words).map_err(|e| Error::Parse(e.0))?;
    Reflector::new(&module, options).reflect(bytes)
}

impl<'a, M: Introspect> Reflector<'a, M> {
    /// Runs every resource category and assembles the result. Fails as
    /// a whole if any category fails.
    pub fn reflect(&self, code: &[u8]) -> Result<ShaderReflection> {
        let entry_points = self.module.entry_points()
            .context(|| "entry points")?;
        if entry_points.len() > 1 {
            debug!("{} entry points; reflecting as `{}`", entry_points.len(),
                entry_points[0].name);
        }
        let (entry_point, stage) = match entry_points.into_iter().next() {
            Some(entry) => {
                let stage = ShaderStage::try_from(entry.execution_model).ok();
                (entry.name, stage)
            },
            None => (self.options.missing_entry_point.clone(), None),
        };

        let stage_inputs = if self.options.stage_inputs {
            self.stage_inputs()?
        } else {
            Vec::new()
        };
        let reflection = ShaderReflection {
            entry_point,
            stage,
            version: self.module.version(),
            code: code.to_vec(),
            uniform_buffers: self.uniform_buffers()?,
            storage_buffers: self.storage_buffers()?,
            push_constants: self.push_constants()?,
            sampled_images: self.sampled_images()?,
            storage_images: self.storage_images()?,
            stage_inputs,
        };
        check_bindings(&reflection);

        debug!(
            "reflected `{}`: {} uniform buffers, {} storage buffers, \
             {} push constant blocks, {} sampled images, {} storage images",
            reflection.entry_point,
            reflection.uniform_buffers.len(),
            reflection.storage_buffers.len(),
            reflection.push_constants.len(),
            reflection.sampled_images.len(),
            reflection.storage_images.len(),
        );
        Ok(reflection)
    }
}

/// Warns about descriptor bindings shared by more than one resource.
/// Aliasing is legal, so this never fails.
fn check_bindings(reflection: &ShaderReflection) {
    let bindings = reflection.uniform_buffers.iter()
        .map(|r| (r.set, r.binding, &r.name))
        .chain(reflection.storage_buffers.iter()
            .map(|r| (r.set, r.binding, &r.variable_name)))
        .chain(reflection.sampled_images.iter()
            .map(|r| (r.set, r.binding, &r.name)))
        .chain(reflection.storage_images.iter()
            .map(|r| (r.set, r.binding, &r.name)));

    let mut seen: FnvHashMap<(u32, u32), &String> = Default::default();
    for (set, binding, name) in bindings {
        if let Some(prev) = seen.insert((set, binding), name) {
            warn!("`{}` and `{}` share set {}, binding {}", prev, name, set,
                binding);
        }
    }
}
