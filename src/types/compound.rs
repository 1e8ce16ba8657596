//! The compound container: an insertion-ordered map from identifiers to values.

use std::fmt;

use indexmap::IndexMap;

use super::encoded_int::EncodedInt;
use super::kind::{ValueKind, WireType};
use super::value::{Array, Value};
use crate::error::GhdfError;

/// An insertion-ordered, key-unique mapping from `u64` identifiers to values.
///
/// Identifier `0` can be stored but is rejected when the container is encoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: IndexMap<u64, Value>,
}

/// Extracts a typed view of a [`Value`] for the retrieval methods on
/// [`Compound`]. Matching is exact: an `Int32` value is not an `i64`.
pub trait FromValue<'a>: Sized {
    /// The wire type a value must have to convert.
    fn wire_type() -> WireType;

    fn from_value(value: &'a Value) -> Option<Self>;
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts or overwrites the entry at `id`, returning the replaced value.
    /// An overwritten entry keeps its original position.
    pub fn add(&mut self, id: u64, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(id, value.into())
    }

    /// Inserts a list of dynamically typed scalars as a homogeneous array.
    ///
    /// Fails with `InvalidEntryType` if the list is empty, mixes kinds, or
    /// contains arrays; the container is left unchanged on failure.
    pub fn add_list(&mut self, id: u64, items: Vec<Value>) -> Result<Option<Value>, GhdfError> {
        let array = Array::try_from(items)?;
        Ok(self.add(id, array))
    }

    /// Removes the entry at `id`. Absent identifiers are not an error.
    pub fn remove(&mut self, id: u64) -> Option<Value> {
        self.entries.shift_remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Iterates `(id, value)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Returns the raw value at `id`, whatever its kind.
    pub fn get_value(&self, id: u64) -> Option<&Value> {
        self.entries.get(&id)
    }

    // -- Typed retrieval --

    /// Plain retrieval: `None` when the entry is absent or of another kind.
    pub fn get<'a, T: FromValue<'a>>(&'a self, id: u64) -> Option<T> {
        self.entries.get(&id).and_then(T::from_value)
    }

    /// Plain retrieval with a caller-supplied fallback for both absence and
    /// kind mismatch.
    pub fn get_or<'a, T: FromValue<'a>>(&'a self, id: u64, default: T) -> T {
        self.get(id).unwrap_or(default)
    }

    /// Verified retrieval: fails on absence and on kind mismatch.
    pub fn get_verified<'a, T: FromValue<'a>>(&'a self, id: u64) -> Result<T, GhdfError> {
        match self.entries.get(&id) {
            None => Err(GhdfError::EntryNotFound { id }),
            Some(value) => convert(id, value),
        }
    }

    /// Verified retrieval that tolerates absence. A present entry of the
    /// wrong kind still fails.
    pub fn get_optional_verified<'a, T: FromValue<'a>>(
        &'a self,
        id: u64,
    ) -> Result<Option<T>, GhdfError> {
        match self.entries.get(&id) {
            None => Ok(None),
            Some(value) => convert(id, value).map(Some),
        }
    }

    /// Verified retrieval substituting `default` only when the entry is absent.
    pub fn get_verified_or_default<'a, T: FromValue<'a>>(
        &'a self,
        id: u64,
        default: T,
    ) -> Result<T, GhdfError> {
        match self.entries.get(&id) {
            None => Ok(default),
            Some(value) => convert(id, value),
        }
    }
}

fn convert<'a, T: FromValue<'a>>(id: u64, value: &'a Value) -> Result<T, GhdfError> {
    T::from_value(value).ok_or_else(|| GhdfError::EntryTypeMismatch {
        id,
        expected: T::wire_type(),
        actual: value.wire_type(),
    })
}

// -- FromValue implementations --

macro_rules! from_value_copy {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl<'a> FromValue<'a> for $t {
            fn wire_type() -> WireType {
                WireType::scalar(ValueKind::$variant)
            }

            fn from_value(value: &'a Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    )*};
}

macro_rules! from_value_array {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl<'a> FromValue<'a> for &'a [$t] {
            fn wire_type() -> WireType {
                WireType::array(ValueKind::$variant)
            }

            fn from_value(value: &'a Value) -> Option<Self> {
                match value {
                    Value::Array(Array::$variant(v)) => Some(v.as_slice()),
                    _ => None,
                }
            }
        }

        impl<'a> FromValue<'a> for Vec<$t> {
            fn wire_type() -> WireType {
                WireType::array(ValueKind::$variant)
            }

            fn from_value(value: &'a Value) -> Option<Self> {
                match value {
                    Value::Array(Array::$variant(v)) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    )*};
}

from_value_copy! {
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
    EncodedInt => EncodedInt,
}

from_value_array! {
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

impl<'a> FromValue<'a> for &'a str {
    fn wire_type() -> WireType {
        WireType::scalar(ValueKind::String)
    }

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_str()
    }
}

impl<'a> FromValue<'a> for String {
    fn wire_type() -> WireType {
        WireType::scalar(ValueKind::String)
    }

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl<'a> FromValue<'a> for &'a Compound {
    fn wire_type() -> WireType {
        WireType::scalar(ValueKind::Compound)
    }

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_compound()
    }
}

impl<'a> FromValue<'a> for Compound {
    fn wire_type() -> WireType {
        WireType::scalar(ValueKind::Compound)
    }

    fn from_value(value: &'a Value) -> Option<Self> {
        value.as_compound().cloned()
    }
}

// -- Iteration --

impl IntoIterator for Compound {
    type Item = (u64, Value);
    type IntoIter = indexmap::map::IntoIter<u64, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (u64, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over the entries of a [`Compound`], in insertion order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: indexmap::map::Iter<'a, u64, Value>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (u64, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(id, value)| (*id, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(id, value)| (*id, value))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FromIterator<(u64, Value)> for Compound {
    fn from_iter<I: IntoIterator<Item = (u64, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(u64, Value)> for Compound {
    fn extend<I: IntoIterator<Item = (u64, Value)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (id, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}: {value}")?;
        }
        write!(f, "}}")
    }
}
