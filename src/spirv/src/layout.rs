//! Declared sizes of types inside buffer blocks. Sizes follow the
//! explicit layout decorations (`Offset`, `ArrayStride`,
//! `MatrixStride`) emitted by the front-end, so padding is included
//! exactly as the shader sees it.
use spirv_headers as spv;

use crate::*;

fn first(params: Option<&[u32]>) -> Option<u32> {
    params?.first().copied()
}

fn fits(size: Option<u32>, ty: Id) -> Result<u32> {
    size.ok_or_else(|| Error::new(ErrorKind::LimitExceeded,
        format!("size of %{} overflows 32 bits", ty)))
}

impl Module {
    /// The size of a struct as declared in a buffer: the offset of the
    /// last member plus that member's declared size. A trailing runtime
    /// array contributes nothing.
    pub fn declared_struct_size(&self, ty: Id) -> Result<u32> {
        let members = self.struct_members(ty)?;
        let last = match members.len() {
            0 => return Ok(0),
            n => (n - 1) as u32,
        };
        let offset = first(self.member_decoration(
            ty, last, spv::Decoration::Offset)).unwrap_or(0);
        fits(offset.checked_add(self.declared_struct_member_size(ty, last)?), ty)
    }

    /// The size of one member of a struct, including any array or
    /// matrix padding implied by its strides.
    pub fn declared_struct_member_size(&self, ty: Id, member: u32) ->
        Result<u32>
    {
        let members = self.struct_members(ty)?;
        let member_ty = *members.get(member as usize).ok_or_else(||
            Error::new(ErrorKind::MemberOutOfRange,
                format!("%{} has no member {}", ty, member)))?;

        match *self.type_of(member_ty)? {
            Type::Array { .. } | Type::RuntimeArray { .. } =>
                self.declared_size(member_ty),
            Type::Matrix { column, count } => {
                let stride = first(self.member_decoration(
                    ty, member, spv::Decoration::MatrixStride));
                let stride = match stride {
                    Some(stride) => stride,
                    None => return self.declared_size(member_ty),
                };
                let row_major = self.has_member_decoration(
                    ty, member, spv::Decoration::RowMajor);
                let vectors = if row_major {
                    self.vector_len(column)?
                } else {
                    count
                };
                fits(stride.checked_mul(vectors), member_ty)
            },
            _ => self.declared_size(member_ty),
        }
    }

    fn vector_len(&self, ty: Id) -> Result<u32> {
        Ok(match *self.type_of(ty)? {
            Type::Vector { count, .. } => count,
            _ => 1,
        })
    }

    fn array_stride(&self, array: Id, elem: Id) -> Result<u32> {
        match first(self.decoration(array, spv::Decoration::ArrayStride)) {
            Some(stride) => Ok(stride),
            None => self.declared_size(elem),
        }
    }

    /// Size of a type outside of any struct context.
    fn declared_size(&self, ty: Id) -> Result<u32> {
        Ok(match *self.type_of(ty)? {
            Type::Bool => 4,
            Type::Int { width, .. } | Type::Float { width } => width / 8,
            Type::Vector { component, count } =>
                fits(self.declared_size(component)?.checked_mul(count), ty)?,
            Type::Matrix { column, count } =>
                fits(self.declared_size(column)?.checked_mul(count), ty)?,
            Type::Array { elem, .. } => {
                let length = self.array_length(ty)?.unwrap_or(0);
                fits(self.array_stride(ty, elem)?.checked_mul(length), ty)?
            },
            Type::RuntimeArray { .. } => 0,
            Type::Struct { .. } => self.declared_struct_size(ty)?,
            // Physical storage buffer addresses
            Type::Pointer { .. } => 8,
            _ => return Err(Error::new(ErrorKind::UnsupportedModule,
                format!("type %{} has no size in a buffer", ty))),
        })
    }
}

#[cfg(test)]
mod tests {
    use more_asserts::assert_ge;
    use spv::Decoration;

    use crate::testing::Assembler;
    use super::*;

    // layout(std140) uniform Globals {
    //     float time;       // offset 0
    //     vec4 color;       // offset 16
    //     mat4 transform;   // offset 32
    //     vec2 coords[3];   // offset 96, stride 16
    // };
    fn globals() -> (Module, Id) {
        let mut asm = Assembler::new();
        let float = asm.type_float(32);
        let uint = asm.type_int(32, false);
        let three = asm.constant_u32(uint, 3);
        let vec2 = asm.type_vector(float, 2);
        let vec4 = asm.type_vector(float, 4);
        let mat4 = asm.type_matrix(vec4, 4);
        let coords = asm.type_array(vec2, three);
        asm.decorate(coords, Decoration::ArrayStride, &[16]);
        let block = asm.type_struct(&[float, vec4, mat4, coords]);
        asm.member_decorate(block, 0, Decoration::Offset, &[0]);
        asm.member_decorate(block, 1, Decoration::Offset, &[16]);
        asm.member_decorate(block, 2, Decoration::Offset, &[32]);
        asm.member_decorate(block, 2, Decoration::ColMajor, &[]);
        asm.member_decorate(block, 2, Decoration::MatrixStride, &[16]);
        asm.member_decorate(block, 3, Decoration::Offset, &[96]);
        (parse_words(&asm.assemble()).unwrap(), block)
    }

    #[test]
    fn member_sizes() {
        let (module, block) = globals();
        let sizes: Vec<_> = (0..4)
            .map(|i| module.declared_struct_member_size(block, i).unwrap())
            .collect();
        assert_eq!(sizes, [4, 16, 64, 48]);
        assert_eq!(module.declared_struct_size(block).unwrap(), 144);
    }

    #[test]
    fn member_out_of_range() {
        let (module, block) = globals();
        let err = module.declared_struct_member_size(block, 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MemberOutOfRange);
    }

    #[test]
    fn row_major_matrix() {
        let mut asm = Assembler::new();
        let float = asm.type_float(32);
        let vec3 = asm.type_vector(float, 3);
        // mat2x3: two columns of vec3
        let mat = asm.type_matrix(vec3, 2);
        let block = asm.type_struct(&[mat]);
        asm.member_decorate(block, 0, Decoration::Offset, &[0]);
        asm.member_decorate(block, 0, Decoration::RowMajor, &[]);
        asm.member_decorate(block, 0, Decoration::MatrixStride, &[16]);
        let module = parse_words(&asm.assemble()).unwrap();
        assert_eq!(module.declared_struct_member_size(block, 0).unwrap(), 48);
    }

    #[test]
    fn trailing_runtime_array() {
        // buffer Particles { uint count; vec4 data[]; }
        let mut asm = Assembler::new();
        let float = asm.type_float(32);
        let uint = asm.type_int(32, false);
        let vec4 = asm.type_vector(float, 4);
        let data = asm.type_runtime_array(vec4);
        asm.decorate(data, Decoration::ArrayStride, &[16]);
        let block = asm.type_struct(&[uint, data]);
        asm.member_decorate(block, 0, Decoration::Offset, &[0]);
        asm.member_decorate(block, 1, Decoration::Offset, &[16]);
        let module = parse_words(&asm.assemble()).unwrap();
        assert_eq!(module.declared_struct_member_size(block, 1).unwrap(), 0);
        assert_eq!(module.declared_struct_size(block).unwrap(), 16);
    }

    #[test]
    fn nested_struct() {
        let mut asm = Assembler::new();
        let float = asm.type_float(32);
        let vec3 = asm.type_vector(float, 3);
        let light = asm.type_struct(&[vec3, float]);
        asm.member_decorate(light, 0, Decoration::Offset, &[0]);
        asm.member_decorate(light, 1, Decoration::Offset, &[12]);
        let block = asm.type_struct(&[float, light]);
        asm.member_decorate(block, 0, Decoration::Offset, &[0]);
        asm.member_decorate(block, 1, Decoration::Offset, &[16]);
        let module = parse_words(&asm.assemble()).unwrap();
        assert_eq!(module.declared_struct_member_size(block, 1).unwrap(), 16);
        assert_eq!(module.declared_struct_size(block).unwrap(), 32);
    }

    #[test]
    fn array_size_overflow() {
        // buffer Data { vec4 data[1 << 28]; }
        let mut asm = Assembler::new();
        let float = asm.type_float(32);
        let uint = asm.type_int(32, false);
        let vec4 = asm.type_vector(float, 4);
        let len = asm.constant_u32(uint, 1 << 28);
        let data = asm.type_array(vec4, len);
        asm.decorate(data, Decoration::ArrayStride, &[16]);
        let block = asm.type_struct(&[data]);
        asm.member_decorate(block, 0, Decoration::Offset, &[0]);
        let module = parse_words(&asm.assemble()).unwrap();
        let err = module.declared_struct_member_size(block, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
        let err = module.declared_struct_size(block).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    }

    #[test]
    fn offset_overflow() {
        let mut asm = Assembler::new();
        let float = asm.type_float(32);
        let block = asm.type_struct(&[float]);
        asm.member_decorate(block, 0, Decoration::Offset, &[u32::MAX - 1]);
        let module = parse_words(&asm.assemble()).unwrap();
        let err = module.declared_struct_size(block).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    }

    #[test]
    fn matrix_stride_overflow() {
        let mut asm = Assembler::new();
        let float = asm.type_float(32);
        let vec4 = asm.type_vector(float, 4);
        let mat4 = asm.type_matrix(vec4, 4);
        let block = asm.type_struct(&[mat4]);
        asm.member_decorate(block, 0, Decoration::Offset, &[0]);
        asm.member_decorate(block, 0, Decoration::MatrixStride, &[1 << 31]);
        let module = parse_words(&asm.assemble()).unwrap();
        let err = module.declared_struct_member_size(block, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    }

    #[test]
    fn size_covers_members() {
        let (module, block) = globals();
        let size = module.declared_struct_size(block).unwrap();
        for i in 0..4 {
            let offset = module
                .member_decoration(block, i, Decoration::Offset)
                .unwrap()[0];
            let member = module.declared_struct_member_size(block, i).unwrap();
            assert_ge!(size, offset + member);
        }
    }
}
