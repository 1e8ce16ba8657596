//! GHDF value types.

use std::fmt;

use super::compound::Compound;
use super::encoded_int::EncodedInt;
use super::kind::{ValueKind, WireType};
use crate::error::GhdfError;

/// An entry value: one of the fourteen base kinds, or a homogeneous array.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    UInt8(u8),
    Int8(i8),
    UInt16(u16),
    Int16(i16),
    UInt32(u32),
    Int32(i32),
    UInt64(u64),
    Int64(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Compound(Compound),
    EncodedInt(EncodedInt),
    Array(Array),
}

/// A homogeneous array of one base kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    UInt8(Vec<u8>),
    Int8(Vec<i8>),
    UInt16(Vec<u16>),
    Int16(Vec<i16>),
    UInt32(Vec<u32>),
    Int32(Vec<i32>),
    UInt64(Vec<u64>),
    Int64(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Boolean(Vec<bool>),
    String(Vec<String>),
    Compound(Vec<Compound>),
    EncodedInt(Vec<EncodedInt>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::UInt8(_) => ValueKind::UInt8,
            Self::Int8(_) => ValueKind::Int8,
            Self::UInt16(_) => ValueKind::UInt16,
            Self::Int16(_) => ValueKind::Int16,
            Self::UInt32(_) => ValueKind::UInt32,
            Self::Int32(_) => ValueKind::Int32,
            Self::UInt64(_) => ValueKind::UInt64,
            Self::Int64(_) => ValueKind::Int64,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::String(_) => ValueKind::String,
            Self::Compound(_) => ValueKind::Compound,
            Self::EncodedInt(_) => ValueKind::EncodedInt,
            Self::Array(array) => array.kind(),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// The wire type this value is tagged with when encoded.
    pub fn wire_type(&self) -> WireType {
        WireType {
            kind: self.kind(),
            is_array: self.is_array(),
        }
    }

    /// Returns the value as a string reference, if it is a `String` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Self::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl Array {
    /// The base kind of the elements.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::UInt8(_) => ValueKind::UInt8,
            Self::Int8(_) => ValueKind::Int8,
            Self::UInt16(_) => ValueKind::UInt16,
            Self::Int16(_) => ValueKind::Int16,
            Self::UInt32(_) => ValueKind::UInt32,
            Self::Int32(_) => ValueKind::Int32,
            Self::UInt64(_) => ValueKind::UInt64,
            Self::Int64(_) => ValueKind::Int64,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::String(_) => ValueKind::String,
            Self::Compound(_) => ValueKind::Compound,
            Self::EncodedInt(_) => ValueKind::EncodedInt,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::UInt8(v) => v.len(),
            Self::Int8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Compound(v) => v.len(),
            Self::EncodedInt(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An empty array of the given kind.
    pub fn empty(kind: ValueKind) -> Self {
        match kind {
            ValueKind::UInt8 => Self::UInt8(Vec::new()),
            ValueKind::Int8 => Self::Int8(Vec::new()),
            ValueKind::UInt16 => Self::UInt16(Vec::new()),
            ValueKind::Int16 => Self::Int16(Vec::new()),
            ValueKind::UInt32 => Self::UInt32(Vec::new()),
            ValueKind::Int32 => Self::Int32(Vec::new()),
            ValueKind::UInt64 => Self::UInt64(Vec::new()),
            ValueKind::Int64 => Self::Int64(Vec::new()),
            ValueKind::Float => Self::Float(Vec::new()),
            ValueKind::Double => Self::Double(Vec::new()),
            ValueKind::Boolean => Self::Boolean(Vec::new()),
            ValueKind::String => Self::String(Vec::new()),
            ValueKind::Compound => Self::Compound(Vec::new()),
            ValueKind::EncodedInt => Self::EncodedInt(Vec::new()),
        }
    }

    /// Appends a scalar of the array's kind, handing it back if the kind differs.
    fn push(&mut self, value: Value) -> Result<(), Value> {
        match (self, value) {
            (Self::UInt8(v), Value::UInt8(x)) => v.push(x),
            (Self::Int8(v), Value::Int8(x)) => v.push(x),
            (Self::UInt16(v), Value::UInt16(x)) => v.push(x),
            (Self::Int16(v), Value::Int16(x)) => v.push(x),
            (Self::UInt32(v), Value::UInt32(x)) => v.push(x),
            (Self::Int32(v), Value::Int32(x)) => v.push(x),
            (Self::UInt64(v), Value::UInt64(x)) => v.push(x),
            (Self::Int64(v), Value::Int64(x)) => v.push(x),
            (Self::Float(v), Value::Float(x)) => v.push(x),
            (Self::Double(v), Value::Double(x)) => v.push(x),
            (Self::Boolean(v), Value::Boolean(x)) => v.push(x),
            (Self::String(v), Value::String(x)) => v.push(x),
            (Self::Compound(v), Value::Compound(x)) => v.push(x),
            (Self::EncodedInt(v), Value::EncodedInt(x)) => v.push(x),
            (_, other) => return Err(other),
        }
        Ok(())
    }
}

/// Builds a homogeneous array from dynamically typed scalars.
///
/// Fails with `InvalidEntryType` for an empty list (no kind to infer),
/// nested arrays, or mixed element kinds.
impl TryFrom<Vec<Value>> for Array {
    type Error = GhdfError;

    fn try_from(items: Vec<Value>) -> Result<Self, GhdfError> {
        let Some(first) = items.first() else {
            return Err(GhdfError::InvalidEntryType(
                "cannot infer the kind of an empty list".into(),
            ));
        };
        let kind = first.kind();
        let mut array = Array::empty(kind);
        for (index, item) in items.into_iter().enumerate() {
            if item.is_array() {
                return Err(GhdfError::InvalidEntryType(format!(
                    "element {index} is an array; arrays cannot nest"
                )));
            }
            if let Err(other) = array.push(item) {
                return Err(GhdfError::InvalidEntryType(format!(
                    "element {index} is {}, expected {kind}",
                    other.kind()
                )));
            }
        }
        Ok(array)
    }
}

// -- Convenience conversions --

macro_rules! value_from {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::$variant(v)
            }
        }

        impl From<Vec<$t>> for Array {
            fn from(v: Vec<$t>) -> Self {
                Self::$variant(v)
            }
        }

        impl From<Vec<$t>> for Value {
            fn from(v: Vec<$t>) -> Self {
                Self::Array(Array::$variant(v))
            }
        }
    )*};
}

value_from! {
    u8 => UInt8,
    i8 => Int8,
    u16 => UInt16,
    i16 => Int16,
    u32 => UInt32,
    i32 => Int32,
    u64 => UInt64,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
    bool => Boolean,
    String => String,
    Compound => Compound,
    EncodedInt => EncodedInt,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Self::Array(a)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UInt8(v) => write!(f, "{v}u8"),
            Self::Int8(v) => write!(f, "{v}i8"),
            Self::UInt16(v) => write!(f, "{v}u16"),
            Self::Int16(v) => write!(f, "{v}i16"),
            Self::UInt32(v) => write!(f, "{v}u32"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}u64"),
            Self::Int64(v) => write!(f, "{v}i64"),
            Self::Float(v) => write!(f, "{v}f"),
            Self::Double(v) => write!(f, "{v}d"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Compound(c) => write!(f, "{c}"),
            Self::EncodedInt(v) => write!(f, "{v}v"),
            Self::Array(a) => write!(f, "{a}"),
        }
    }
}

fn write_items<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UInt8(v) => write_items(f, v),
            Self::Int8(v) => write_items(f, v),
            Self::UInt16(v) => write_items(f, v),
            Self::Int16(v) => write_items(f, v),
            Self::UInt32(v) => write_items(f, v),
            Self::Int32(v) => write_items(f, v),
            Self::UInt64(v) => write_items(f, v),
            Self::Int64(v) => write_items(f, v),
            Self::Float(v) => write_items(f, v),
            Self::Double(v) => write_items(f, v),
            Self::Boolean(v) => write_items(f, v),
            Self::String(v) => {
                let quoted: Vec<String> = v.iter().map(|s| format!("\"{s}\"")).collect();
                write_items(f, &quoted)
            }
            Self::Compound(v) => write_items(f, v),
            Self::EncodedInt(v) => write_items(f, v),
        }
    }
}
