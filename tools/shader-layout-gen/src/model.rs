//! Normalized shader catalog
//!
//! One [`ShaderRecord`] per captured vertex shader, each owning its ordered
//! [`InputAttribute`]s. Records and attributes are only created by
//! [`crate::catalog`]; everything downstream reads them.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::naming::NameRegistry;

/// Vertex element storage encoding, as reported by the engine's input layout tables.
///
/// Closed set: the size table in [`crate::layout::byte_size`] matches on every variant,
/// so a new code cannot be added without giving it a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum TypeCode {
    /// 32 bit float
    F32 = 1,
    /// 16 bit half float
    F16 = 2,
    /// 16 bit signed integer (joint index)
    S16 = 3,
    /// 16 bit unsigned integer (joint index)
    U16 = 4,
    /// 16 bit signed normalized, divisor 32767
    Fs16 = 5,
    /// 16 bit unsigned normalized
    Fu16 = 6,
    S8 = 7,
    /// 8 bit unsigned joint index
    U8 = 8,
    /// 8 bit signed normalized, divisor 127
    Fs8 = 9,
    /// 8 bit unsigned normalized, divisor 255
    Fu8 = 10,
    /// Packed normal, one 32 bit word
    X11y11z11w10 = 11,
    /// Never observed decoded; treated as an opaque 32 bit word
    Opaque32 = 12,
    /// One byte per color channel, no alpha
    Rgb8 = 13,
    /// Packed RGBA color, one 32 bit word
    Rgba8 = 14,
}

impl TypeCode {
    /// Every code, in numeric order
    pub const ALL: [TypeCode; 14] = [
        TypeCode::F32,
        TypeCode::F16,
        TypeCode::S16,
        TypeCode::U16,
        TypeCode::Fs16,
        TypeCode::Fu16,
        TypeCode::S8,
        TypeCode::U8,
        TypeCode::Fs8,
        TypeCode::Fu8,
        TypeCode::X11y11z11w10,
        TypeCode::Opaque32,
        TypeCode::Rgb8,
        TypeCode::Rgba8,
    ];

    /// Look up a raw table code
    pub fn from_code(code: u32) -> Option<Self> {
        let ty = match code {
            1 => TypeCode::F32,
            2 => TypeCode::F16,
            3 => TypeCode::S16,
            4 => TypeCode::U16,
            5 => TypeCode::Fs16,
            6 => TypeCode::Fu16,
            7 => TypeCode::S8,
            8 => TypeCode::U8,
            9 => TypeCode::Fs8,
            10 => TypeCode::Fu8,
            11 => TypeCode::X11y11z11w10,
            12 => TypeCode::Opaque32,
            13 => TypeCode::Rgb8,
            14 => TypeCode::Rgba8,
            _ => return None,
        };
        Some(ty)
    }

    /// Raw numeric code as it appears in the input table
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Type name used by the binary template (declared in the shared template include)
    pub fn display_name(self) -> &'static str {
        match self {
            TypeCode::F32 => "f32",
            TypeCode::F16 => "f16",
            TypeCode::S16 => "s16",
            TypeCode::U16 => "u16",
            TypeCode::Fs16 => "fs16",
            TypeCode::Fu16 => "fu16",
            TypeCode::S8 => "s8",
            TypeCode::U8 => "u8",
            TypeCode::Fs8 => "fs8",
            TypeCode::Fu8 => "fu8",
            TypeCode::X11y11z11w10 => "vec432",
            TypeCode::Opaque32 => "u32",
            TypeCode::Rgb8 => "color8",
            TypeCode::Rgba8 => "color32",
        }
    }

    /// Bit-stream method suffix for one raw element (`read{..}` / `write{..}`)
    pub fn stream_method(self) -> &'static str {
        match self {
            TypeCode::F32 => "Float",
            TypeCode::F16 => "HalfFloat",
            TypeCode::S16 | TypeCode::Fs16 => "Short",
            TypeCode::U16 | TypeCode::Fu16 => "UShort",
            TypeCode::S8 | TypeCode::Fs8 => "Byte",
            TypeCode::U8 | TypeCode::Fu8 | TypeCode::Rgb8 => "UByte",
            TypeCode::X11y11z11w10 | TypeCode::Opaque32 | TypeCode::Rgba8 => "UInt",
        }
    }
}

impl From<TypeCode> for u32 {
    fn from(ty: TypeCode) -> Self {
        ty.code()
    }
}

/// Raw code outside the known table
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown type code {0}")]
pub struct UnknownCode(pub u32);

impl TryFrom<u32> for TypeCode {
    type Error = UnknownCode;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        TypeCode::from_code(code).ok_or(UnknownCode(code))
    }
}

/// One named field of a shader's per-vertex input block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputAttribute {
    /// Byte offset within the vertex
    pub offset: u32,
    pub type_code: TypeCode,
    /// Semantic name exactly as given by the input table
    pub raw_name: String,
    /// Identifier unique within the owning shader
    pub code_name: String,
    pub component_count: u32,
    /// Index of the earliest attribute in the same shader at the same offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<usize>,
}

impl InputAttribute {
    pub fn is_alias(&self) -> bool {
        self.alias_of.is_some()
    }
}

/// A captured vertex shader and its input layout
#[derive(Debug, Clone, Serialize)]
pub struct ShaderRecord {
    /// Position in the engine's shader object table at capture time
    pub index: u32,
    pub name: String,
    pub hash: u32,
    pub(crate) inputs: Vec<InputAttribute>,
    #[serde(skip)]
    pub(crate) names: NameRegistry,
}

impl ShaderRecord {
    pub(crate) fn new(index: u32, name: String, hash: u32) -> Self {
        Self {
            index,
            name,
            hash,
            inputs: Vec::new(),
            names: NameRegistry::default(),
        }
    }

    /// Attributes in table order
    pub fn inputs(&self) -> &[InputAttribute] {
        &self.inputs
    }

    pub fn has_inputs(&self) -> bool {
        !self.inputs.is_empty()
    }

    /// The attribute owning the storage that `inputs()[index]` views.
    ///
    /// Returns the attribute itself when it is canonical.
    pub fn canonical(&self, index: usize) -> &InputAttribute {
        let attr = &self.inputs[index];
        match attr.alias_of {
            Some(source) => &self.inputs[source],
            None => attr,
        }
    }

    /// Attributes that own backing storage, in table order
    pub fn canonical_inputs(&self) -> impl Iterator<Item = &InputAttribute> {
        self.inputs.iter().filter(|attr| !attr.is_alias())
    }
}

/// Every captured shader, in hash table order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    shaders: Vec<ShaderRecord>,
    /// Name -> index of the first record carrying it
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Append a record. Returns `false` when its name was already taken; the
    /// record is still kept, but name lookups keep resolving to the first one.
    pub(crate) fn insert(&mut self, shader: ShaderRecord) -> bool {
        let index = self.shaders.len();
        let fresh = !self.by_name.contains_key(&shader.name);
        if fresh {
            self.by_name.insert(shader.name.clone(), index);
        }
        self.shaders.push(shader);
        fresh
    }

    pub(crate) fn find_by_name_mut(&mut self, name: &str) -> Option<&mut ShaderRecord> {
        let index = *self.by_name.get(name)?;
        self.shaders.get_mut(index)
    }

    pub fn shaders(&self) -> &[ShaderRecord] {
        &self.shaders
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    /// First record with exactly this name
    pub fn find_by_name(&self, name: &str) -> Option<&ShaderRecord> {
        self.by_name.get(name).map(|&index| &self.shaders[index])
    }

    /// First record with this full 32 bit hash
    pub fn find_by_hash(&self, hash: u32) -> Option<&ShaderRecord> {
        self.shaders.iter().find(|shader| shader.hash == hash)
    }

    /// Names carried by more than one record, in first-seen order
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for shader in &self.shaders {
            *counts.entry(shader.name.as_str()).or_default() += 1;
        }

        let mut duplicates = Vec::new();
        for shader in &self.shaders {
            let name = shader.name.as_str();
            if counts[name] > 1 && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    /// Total attribute count across all shaders
    pub fn attribute_count(&self) -> usize {
        self.shaders.iter().map(|shader| shader.inputs.len()).sum()
    }
}
