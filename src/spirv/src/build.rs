use byteorder::{ByteOrder, NativeEndian};
use log::{debug, trace};
use rspirv::{self, dr};
use rspirv::binary::{Consumer, ParseAction};
use spirv_headers as spv;

use crate::*;

#[derive(Debug)]
struct RawModule {
    header: dr::ModuleHeader,
    instructions: Vec<dr::Instruction>,
}

impl RawModule {
    fn new() -> Self {
        Self {
            header: dr::ModuleHeader::new(0),
            instructions: Default::default(),
        }
    }
}

fn invalid_operand(inst: &dr::Instruction, expected: &str) -> Error {
    Error::new(ErrorKind::InvalidModule, format!(
        "Op{:?}: expected {} operand", inst.class.opcode, expected))
}

macro_rules! get_operand_variant {
    ($inst:expr, $operand:expr, $variant:ident) => {
        match $operand {
            Some(dr::Operand::$variant(ref val)) => val.clone(),
            _ => return Err(invalid_operand($inst, stringify!($variant))),
        }
    }
}

macro_rules! parse_operand {
    ($inst:expr, $operands:expr, $variant:ident) => {
        get_operand_variant!($inst, $operands.next(), $variant)
    };
    ($inst:expr, $operands:expr, $variant:ident*) => {
        $operands
            .map(|operand| match operand {
                dr::Operand::$variant(ref val) => Ok(val.clone()),
                _ => Err(invalid_operand($inst, stringify!($variant))),
            })
            .collect::<Result<Vec<_>>>()?
    };
}

fn result_id(inst: &dr::Instruction) -> Result<Id> {
    inst.result_id.ok_or_else(|| Error::new(ErrorKind::InvalidModule,
        format!("Op{:?}: missing result id", inst.class.opcode)))
}

fn version_of(header: &dr::ModuleHeader) -> Version {
    let byte = |word: u32, n| ((word >> (8 * n)) & 0xffu32) as u8;
    (byte(header.version, 2), byte(header.version, 1))
}

fn raise_module(raw: &RawModule) -> Result<Module> {
    let mut module = Module {
        version: version_of(&raw.header),
        ..Default::default()
    };
    for inst in raw.instructions.iter() {
        raise_instruction(&mut module, inst)?;
    }
    debug!(
        "raised SPIR-V {}.{} module: {} entry points, {} types, {} variables",
        module.version.0, module.version.1, module.entry_points.len(),
        module.types.len(), module.variables.len(),
    );
    Ok(module)
}

fn raise_instruction(module: &mut Module, inst: &dr::Instruction) ->
    Result<()>
{
    use spv::Op;
    match inst.class.opcode {
        Op::EntryPoint => raise_entry_point(module, inst)?,
        Op::Name => apply_name(module, inst)?,
        Op::MemberName => apply_member_name(module, inst)?,
        Op::Decorate => apply_decoration(module, inst)?,
        Op::MemberDecorate => apply_member_decoration(module, inst)?,
        Op::Constant | Op::SpecConstant => raise_constant(module, inst)?,
        Op::SpecConstantTrue => { module.constants.insert(result_id(inst)?, 1); },
        Op::SpecConstantFalse => { module.constants.insert(result_id(inst)?, 0); },
        Op::Variable => raise_variable(module, inst)?,
        Op::TypeVoid | Op::TypeBool | Op::TypeInt | Op::TypeFloat
            | Op::TypeVector | Op::TypeMatrix | Op::TypeImage
            | Op::TypeSampler | Op::TypeSampledImage | Op::TypeArray
            | Op::TypeRuntimeArray | Op::TypeStruct | Op::TypePointer
            | Op::TypeFunction | Op::TypeOpaque | Op::TypeEvent
            | Op::TypeDeviceEvent | Op::TypeReserveId | Op::TypeQueue
            | Op::TypePipe | Op::TypeForwardPointer
            => raise_type(module, inst)?,
        _ => {},
    }
    Ok(())
}

fn raise_entry_point(module: &mut Module, inst: &dr::Instruction) ->
    Result<()>
{
    let mut ops = inst.operands.iter();
    let execution_model = parse_operand!(inst, ops, ExecutionModel);
    let function = parse_operand!(inst, ops, IdRef);
    let name = parse_operand!(inst, ops, LiteralString);
    let interface = parse_operand!(inst, ops, IdRef*);
    module.entry_points.push(EntryPoint {
        execution_model,
        function,
        name,
        interface,
    });
    Ok(())
}

fn apply_name(module: &mut Module, inst: &dr::Instruction) -> Result<()> {
    let mut ops = inst.operands.iter();
    let target = parse_operand!(inst, ops, IdRef);
    let name = parse_operand!(inst, ops, LiteralString);
    module.names.insert(target, name);
    Ok(())
}

fn apply_member_name(module: &mut Module, inst: &dr::Instruction) ->
    Result<()>
{
    let mut ops = inst.operands.iter();
    let target = parse_operand!(inst, ops, IdRef);
    let member = parse_operand!(inst, ops, LiteralInt32);
    let name = parse_operand!(inst, ops, LiteralString);
    module.member_names.insert((target, member), name);
    Ok(())
}

// Only integer literal parameters are kept. Enumerant parameters (e.g.
// the `BuiltIn` of a built-in variable) are reduced to the presence of
// the decoration itself.
fn literal_params(ops: std::slice::Iter<'_, dr::Operand>) -> Vec<u32> {
    ops.filter_map(|op| match *op {
        dr::Operand::LiteralInt32(val) => Some(val),
        _ => None,
    }).collect()
}

fn apply_decoration(module: &mut Module, inst: &dr::Instruction) ->
    Result<()>
{
    let mut ops = inst.operands.iter();
    let target = parse_operand!(inst, ops, IdRef);
    let decoration = parse_operand!(inst, ops, Decoration);
    module.decorations
        .insert((target, None, decoration as u32), literal_params(ops));
    Ok(())
}

fn apply_member_decoration(module: &mut Module, inst: &dr::Instruction) ->
    Result<()>
{
    let mut ops = inst.operands.iter();
    let target = parse_operand!(inst, ops, IdRef);
    let member = parse_operand!(inst, ops, LiteralInt32);
    let decoration = parse_operand!(inst, ops, Decoration);
    module.decorations.insert(
        (target, Some(member), decoration as u32),
        literal_params(ops),
    );
    Ok(())
}

fn raise_constant(module: &mut Module, inst: &dr::Instruction) ->
    Result<()>
{
    let id = result_id(inst)?;
    // Specialization constants are recorded with their default value.
    // Float constants are never array lengths, so they are ignored.
    let value = match inst.operands.first() {
        Some(&dr::Operand::LiteralInt32(val)) => val as u64,
        Some(&dr::Operand::LiteralInt64(val)) => val,
        _ => return Ok(()),
    };
    module.constants.insert(id, value);
    Ok(())
}

fn raise_variable(module: &mut Module, inst: &dr::Instruction) ->
    Result<()>
{
    let mut ops = inst.operands.iter();
    let id = result_id(inst)?;
    let storage_class = parse_operand!(inst, ops, StorageClass);
    if storage_class == spv::StorageClass::Function { return Ok(()); }

    let ty = inst.result_type.ok_or_else(|| invalid_operand(inst, "type"))?;
    module.variables.push(Variable { id, ty, storage_class });
    Ok(())
}

fn raise_type(module: &mut Module, inst: &dr::Instruction) -> Result<()> {
    use spv::Op;

    let id = result_id(inst)?;
    let mut ops = inst.operands.iter();
    let ty = match inst.class.opcode {
        Op::TypeVoid => Type::Void,
        Op::TypeBool => Type::Bool,
        Op::TypeInt => {
            let width = parse_operand!(inst, ops, LiteralInt32);
            let signed = parse_operand!(inst, ops, LiteralInt32) != 0;
            Type::Int { width, signed }
        },
        Op::TypeFloat => {
            let width = parse_operand!(inst, ops, LiteralInt32);
            Type::Float { width }
        },
        Op::TypeVector => {
            let component = parse_operand!(inst, ops, IdRef);
            let count = parse_operand!(inst, ops, LiteralInt32);
            Type::Vector { component, count }
        },
        Op::TypeMatrix => {
            let column = parse_operand!(inst, ops, IdRef);
            let count = parse_operand!(inst, ops, LiteralInt32);
            Type::Matrix { column, count }
        },
        Op::TypeImage => {
            let sampled_type = parse_operand!(inst, ops, IdRef);
            let dim = parse_operand!(inst, ops, Dim);
            let _depth = parse_operand!(inst, ops, LiteralInt32);
            let _arrayed = parse_operand!(inst, ops, LiteralInt32);
            let _multisampled = parse_operand!(inst, ops, LiteralInt32);
            let sampled = parse_operand!(inst, ops, LiteralInt32);
            Type::Image { sampled_type, dim, sampled }
        },
        Op::TypeSampler => Type::Sampler,
        Op::TypeSampledImage => {
            let image = parse_operand!(inst, ops, IdRef);
            Type::SampledImage { image }
        },
        Op::TypeArray => {
            let elem = parse_operand!(inst, ops, IdRef);
            let length = parse_operand!(inst, ops, IdRef);
            Type::Array { elem, length }
        },
        Op::TypeRuntimeArray => {
            let elem = parse_operand!(inst, ops, IdRef);
            Type::RuntimeArray { elem }
        },
        Op::TypeStruct => {
            let members = parse_operand!(inst, ops, IdRef*);
            Type::Struct { members }
        },
        Op::TypePointer => {
            let storage_class = parse_operand!(inst, ops, StorageClass);
            let pointee = parse_operand!(inst, ops, IdRef);
            Type::Pointer { storage_class, pointee }
        },
        Op::TypeFunction => Type::Function,
        // Forward pointers declare an id that a later OpTypePointer
        // defines; nothing to record yet.
        Op::TypeForwardPointer => return Ok(()),
        _ => Type::Opaque,
    };
    if module.types.insert(id, ty).is_some() {
        return Err(Error::new(ErrorKind::InvalidModule,
            format!("type %{} defined twice", id)));
    }
    Ok(())
}

impl Consumer for RawModule {
    fn initialize(&mut self) -> ParseAction {
        ParseAction::Continue
    }

    fn finalize(&mut self) -> ParseAction {
        ParseAction::Continue
    }

    fn consume_header(&mut self, header: dr::ModuleHeader) -> ParseAction {
        self.instructions.reserve(header.bound as usize);
        self.header = header;
        ParseAction::Continue
    }

    fn consume_instruction(&mut self, inst: dr::Instruction) -> ParseAction {
        self.instructions.push(inst);
        ParseAction::Continue
    }
}

pub fn parse_words(words: &[u32]) -> Result<Module> {
    trace!("parse_words(len: {})", words.len());
    let mut raw = RawModule::new();
    rspirv::binary::parse_words(words, &mut raw).map_err(|e|
        Error::new(ErrorKind::InvalidModule, format!("{:?}", e)))?;
    raise_module(&raw)
}

pub fn parse_bytes(bytes: &[u8]) -> Result<Module> {
    let word_size = std::mem::size_of::<u32>();
    if bytes.len() % word_size != 0 {
        return Err(Error::new(ErrorKind::InvalidModule, format!(
            "byte length {} is not a multiple of {}", bytes.len(), word_size)));
    }
    let mut words = vec![0u32; bytes.len() / word_size];
    NativeEndian::read_u32_into(bytes, &mut words);
    parse_words(&words)
}
