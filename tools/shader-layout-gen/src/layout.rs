//! Vertex layout sizing
//!
//! A shader's vertex stride is the furthest byte touched by any attribute,
//! aliases included, rounded up to a 4 byte boundary.

use crate::model::{Catalog, InputAttribute, ShaderRecord, TypeCode};

/// Vertex structs are padded to this many bytes
pub const STRUCT_ALIGNMENT: u64 = 4;

/// Size in bytes of one element of the given encoding
pub fn byte_size(ty: TypeCode) -> u32 {
    match ty {
        TypeCode::F32 => 4,
        TypeCode::F16 => 2,
        TypeCode::S16 => 2,
        TypeCode::U16 => 2,
        TypeCode::Fs16 => 2,
        TypeCode::Fu16 => 2,
        TypeCode::S8 => 1,
        TypeCode::U8 => 1,
        TypeCode::Fs8 => 1,
        TypeCode::Fu8 => 1,
        TypeCode::X11y11z11w10 => 4,
        TypeCode::Opaque32 => 4,
        TypeCode::Rgb8 => 1,
        TypeCode::Rgba8 => 4,
    }
}

/// Bytes occupied by all components of an attribute
pub fn attribute_size(attr: &InputAttribute) -> u64 {
    u64::from(byte_size(attr.type_code)) * u64::from(attr.component_count)
}

/// One past the last byte an attribute occupies
pub fn attribute_end(attr: &InputAttribute) -> u64 {
    u64::from(attr.offset) + attribute_size(attr)
}

/// Aligned struct size, or `None` for a shader without inputs
pub fn struct_end(shader: &ShaderRecord) -> Option<u64> {
    shader
        .inputs()
        .iter()
        .map(attribute_end)
        .max()
        .map(|end| end.next_multiple_of(STRUCT_ALIGNMENT))
}

/// A shader that takes part in struct and accessor emission
#[derive(Debug, Clone, Copy)]
pub struct SizedShader<'a> {
    pub shader: &'a ShaderRecord,
    pub size: u64,
}

/// Size every shader that has inputs, in catalog order
pub fn plan(catalog: &Catalog) -> Vec<SizedShader<'_>> {
    catalog
        .shaders()
        .iter()
        .filter_map(|shader| struct_end(shader).map(|size| SizedShader { shader, size }))
        .collect()
}
