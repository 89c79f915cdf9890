//! A minimal word-level SPIR-V writer for building test modules without
//! an external shader compiler. It performs no validation; instructions
//! are emitted in call order, so callers are responsible for declaring
//! types before they are used.
use byteorder::{ByteOrder, LittleEndian};
use spirv_headers as spv;

use crate::Id;

const MAGIC: u32 = 0x07230203;
const VERSION_1_0: u32 = 0x0001_0000;

#[derive(Debug)]
pub struct Assembler {
    next_id: Id,
    preamble: Vec<u32>,
    annotations: Vec<u32>,
    globals: Vec<u32>,
    functions: Vec<u32>,
}

fn encode(buf: &mut Vec<u32>, op: spv::Op, operands: &[u32]) {
    let word_count = (operands.len() + 1) as u32;
    buf.push((word_count << 16) | (op as u32));
    buf.extend_from_slice(operands);
}

/// Encodes a nul-terminated, word-padded literal string.
pub fn string_words(s: &str) -> Vec<u32> {
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    while bytes.len() % 4 != 0 {
        bytes.push(0);
    }
    let mut words = vec![0u32; bytes.len() / 4];
    LittleEndian::read_u32_into(&bytes, &mut words);
    words
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        let mut asm = Assembler {
            next_id: 1,
            preamble: Vec::new(),
            annotations: Vec::new(),
            globals: Vec::new(),
            functions: Vec::new(),
        };
        encode(&mut asm.preamble, spv::Op::Capability,
            &[spv::Capability::Shader as u32]);
        encode(&mut asm.preamble, spv::Op::MemoryModel, &[
            spv::AddressingModel::Logical as u32,
            spv::MemoryModel::GLSL450 as u32,
        ]);
        asm
    }

    pub fn alloc_id(&mut self) -> Id {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Produces the final word stream, header included.
    pub fn assemble(&self) -> Vec<u32> {
        let mut words = vec![MAGIC, VERSION_1_0, 0, self.next_id, 0];
        words.extend_from_slice(&self.preamble);
        words.extend_from_slice(&self.annotations);
        words.extend_from_slice(&self.globals);
        words.extend_from_slice(&self.functions);
        words
    }

    pub fn to_bytes(words: &[u32]) -> Vec<u8> {
        let mut bytes = vec![0u8; words.len() * 4];
        LittleEndian::write_u32_into(words, &mut bytes);
        bytes
    }

    pub fn entry_point(
        &mut self,
        model: spv::ExecutionModel,
        function: Id,
        name: &str,
        interface: &[Id],
    ) {
        let mut operands = vec![model as u32, function];
        operands.extend(string_words(name));
        operands.extend_from_slice(interface);
        encode(&mut self.preamble, spv::Op::EntryPoint, &operands);
    }

    pub fn name(&mut self, target: Id, name: &str) {
        let mut operands = vec![target];
        operands.extend(string_words(name));
        encode(&mut self.annotations, spv::Op::Name, &operands);
    }

    pub fn member_name(&mut self, target: Id, member: u32, name: &str) {
        let mut operands = vec![target, member];
        operands.extend(string_words(name));
        encode(&mut self.annotations, spv::Op::MemberName, &operands);
    }

    pub fn decorate(
        &mut self,
        target: Id,
        decoration: spv::Decoration,
        params: &[u32],
    ) {
        let mut operands = vec![target, decoration as u32];
        operands.extend_from_slice(params);
        encode(&mut self.annotations, spv::Op::Decorate, &operands);
    }

    pub fn member_decorate(
        &mut self,
        target: Id,
        member: u32,
        decoration: spv::Decoration,
        params: &[u32],
    ) {
        let mut operands = vec![target, member, decoration as u32];
        operands.extend_from_slice(params);
        encode(&mut self.annotations, spv::Op::MemberDecorate, &operands);
    }

    fn global(&mut self, op: spv::Op, operands: &[u32]) -> Id {
        let id = self.alloc_id();
        let mut all = vec![id];
        all.extend_from_slice(operands);
        encode(&mut self.globals, op, &all);
        id
    }

    pub fn type_void(&mut self) -> Id {
        self.global(spv::Op::TypeVoid, &[])
    }

    pub fn type_bool(&mut self) -> Id {
        self.global(spv::Op::TypeBool, &[])
    }

    pub fn type_int(&mut self, width: u32, signed: bool) -> Id {
        self.global(spv::Op::TypeInt, &[width, signed as u32])
    }

    pub fn type_float(&mut self, width: u32) -> Id {
        self.global(spv::Op::TypeFloat, &[width])
    }

    pub fn type_vector(&mut self, component: Id, count: u32) -> Id {
        self.global(spv::Op::TypeVector, &[component, count])
    }

    pub fn type_matrix(&mut self, column: Id, count: u32) -> Id {
        self.global(spv::Op::TypeMatrix, &[column, count])
    }

    /// `sampled` is 1 for sampled images and 2 for storage images.
    pub fn type_image(
        &mut self,
        sampled_type: Id,
        dim: spv::Dim,
        sampled: u32,
        format: spv::ImageFormat,
    ) -> Id {
        self.global(spv::Op::TypeImage, &[
            sampled_type, dim as u32, 0, 0, 0, sampled, format as u32,
        ])
    }

    pub fn type_sampler(&mut self) -> Id {
        self.global(spv::Op::TypeSampler, &[])
    }

    pub fn type_sampled_image(&mut self, image: Id) -> Id {
        self.global(spv::Op::TypeSampledImage, &[image])
    }

    pub fn type_array(&mut self, elem: Id, length: Id) -> Id {
        self.global(spv::Op::TypeArray, &[elem, length])
    }

    pub fn type_runtime_array(&mut self, elem: Id) -> Id {
        self.global(spv::Op::TypeRuntimeArray, &[elem])
    }

    pub fn type_struct(&mut self, members: &[Id]) -> Id {
        self.global(spv::Op::TypeStruct, members)
    }

    pub fn type_pointer(&mut self, class: spv::StorageClass, pointee: Id) ->
        Id
    {
        self.global(spv::Op::TypePointer, &[class as u32, pointee])
    }

    pub fn constant_u32(&mut self, ty: Id, value: u32) -> Id {
        let id = self.alloc_id();
        encode(&mut self.globals, spv::Op::Constant, &[ty, id, value]);
        id
    }

    /// A 64-bit integer constant, low word first.
    pub fn constant_u64(&mut self, ty: Id, value: u64) -> Id {
        let id = self.alloc_id();
        encode(&mut self.globals, spv::Op::Constant,
            &[ty, id, value as u32, (value >> 32) as u32]);
        id
    }

    /// A specialization constant with its default value. Give it a
    /// `SpecId` decoration to make it overridable.
    pub fn spec_constant_u32(&mut self, ty: Id, value: u32) -> Id {
        let id = self.alloc_id();
        encode(&mut self.globals, spv::Op::SpecConstant, &[ty, id, value]);
        id
    }

    pub fn spec_constant_bool(&mut self, ty: Id, value: bool) -> Id {
        let id = self.alloc_id();
        let op = if value {
            spv::Op::SpecConstantTrue
        } else {
            spv::Op::SpecConstantFalse
        };
        encode(&mut self.globals, op, &[ty, id]);
        id
    }

    pub fn variable(&mut self, pointer: Id, class: spv::StorageClass) -> Id {
        let id = self.alloc_id();
        encode(&mut self.globals, spv::Op::Variable,
            &[pointer, id, class as u32]);
        id
    }

    /// Emits an empty `void main()` and returns its id.
    pub fn function(&mut self) -> Id {
        let void = self.type_void();
        let fn_ty = self.global(spv::Op::TypeFunction, &[void]);
        let id = self.alloc_id();
        let label = self.alloc_id();
        encode(&mut self.functions, spv::Op::Function, &[
            void, id, 0, fn_ty,
        ]);
        encode(&mut self.functions, spv::Op::Label, &[label]);
        encode(&mut self.functions, spv::Op::Return, &[]);
        encode(&mut self.functions, spv::Op::FunctionEnd, &[]);
        id
    }
}
