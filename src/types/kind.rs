//! Wire type registry: value kinds and their one-byte tags.

use std::fmt;

/// Tag bit marking "array of base kind".
pub const ARRAY_FLAG: u8 = 0x80;

/// Mask selecting the base-kind number from a tag byte.
pub const KIND_MASK: u8 = 0x7F;

/// The fourteen concrete base kinds. Kind number 0 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueKind {
    UInt8 = 1,
    Int8 = 2,
    UInt16 = 3,
    Int16 = 4,
    UInt32 = 5,
    Int32 = 6,
    UInt64 = 7,
    Int64 = 8,
    Float = 9,
    Double = 10,
    Boolean = 11,
    String = 12,
    Compound = 13,
    EncodedInt = 14,
}

impl ValueKind {
    pub const ALL: [ValueKind; 14] = [
        Self::UInt8,
        Self::Int8,
        Self::UInt16,
        Self::Int16,
        Self::UInt32,
        Self::Int32,
        Self::UInt64,
        Self::Int64,
        Self::Float,
        Self::Double,
        Self::Boolean,
        Self::String,
        Self::Compound,
        Self::EncodedInt,
    ];

    /// Resolves a base-kind number. Returns `None` for 0 and anything above 14.
    pub fn from_wire(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::UInt8),
            2 => Some(Self::Int8),
            3 => Some(Self::UInt16),
            4 => Some(Self::Int16),
            5 => Some(Self::UInt32),
            6 => Some(Self::Int32),
            7 => Some(Self::UInt64),
            8 => Some(Self::Int64),
            9 => Some(Self::Float),
            10 => Some(Self::Double),
            11 => Some(Self::Boolean),
            12 => Some(Self::String),
            13 => Some(Self::Compound),
            14 => Some(Self::EncodedInt),
            _ => None,
        }
    }

    pub fn as_wire(self) -> u8 {
        self as u8
    }

    /// Byte width of a scalar of this kind, if it is fixed.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Self::UInt8 | Self::Int8 | Self::Boolean => Some(1),
            Self::UInt16 | Self::Int16 => Some(2),
            Self::UInt32 | Self::Int32 | Self::Float => Some(4),
            Self::UInt64 | Self::Int64 | Self::Double => Some(8),
            Self::String | Self::Compound | Self::EncodedInt => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::UInt8 => "UInt8",
            Self::Int8 => "Int8",
            Self::UInt16 => "UInt16",
            Self::Int16 => "Int16",
            Self::UInt32 => "UInt32",
            Self::Int32 => "Int32",
            Self::UInt64 => "UInt64",
            Self::Int64 => "Int64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::Compound => "Compound",
            Self::EncodedInt => "EncodedInt",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A base kind plus the array modifier: everything one tag byte carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireType {
    pub kind: ValueKind,
    pub is_array: bool,
}

impl WireType {
    pub const fn scalar(kind: ValueKind) -> Self {
        Self {
            kind,
            is_array: false,
        }
    }

    pub const fn array(kind: ValueKind) -> Self {
        Self {
            kind,
            is_array: true,
        }
    }

    /// Encodes this type as a tag byte.
    pub fn to_tag(self) -> u8 {
        let flag = if self.is_array { ARRAY_FLAG } else { 0 };
        self.kind.as_wire() | flag
    }

    /// Decodes a tag byte. The base kind is validated before the array bit
    /// is considered, so `0x80` (array of "None") is rejected like `0x00`.
    pub fn from_tag(tag: u8) -> Option<Self> {
        let kind = ValueKind::from_wire(tag & KIND_MASK)?;
        Some(Self {
            kind,
            is_array: tag & ARRAY_FLAG != 0,
        })
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array {
            write!(f, "{}[]", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}
