//! GHDF v1 encoding: `Compound` → bytes.

use bytes::{BufMut, Bytes, BytesMut};

use super::varint::{encoded_len, put_varint};
use super::wire::{self, FORMAT_VERSION, MAGIC};
use crate::error::GhdfError;
use crate::types::{Array, Compound, EncodedInt, Value};

/// Encodes a complete version-1 container into a fresh buffer.
///
/// The whole tree is serialized before anything is returned, so a failure
/// never leaves a partial container behind.
pub fn encode_container(compound: &Compound) -> Result<Bytes, GhdfError> {
    let mut buf = BytesMut::with_capacity(MAGIC.len() + encoded_len(FORMAT_VERSION));
    buf.put_slice(&MAGIC);
    put_varint(&mut buf, FORMAT_VERSION);
    encode_compound(&mut buf, compound)?;

    tracing::debug!(bytes = buf.len(), entries = compound.len(), "encoded GHDF container");
    Ok(buf.freeze())
}

/// Encodes a compound body: entry count, then id, tag, and value per entry.
pub fn encode_compound(buf: &mut BytesMut, compound: &Compound) -> Result<(), GhdfError> {
    put_varint(buf, compound.len() as u64);
    for (id, value) in compound.iter() {
        if id == 0 {
            return Err(GhdfError::ReservedIdentifier);
        }
        put_varint(buf, id);
        buf.put_u8(value.wire_type().to_tag());
        encode_value(buf, value).map_err(|e| e.in_entry(id))?;
    }
    Ok(())
}

/// Encodes a value's payload. The tag byte is written by the caller.
pub fn encode_value(buf: &mut BytesMut, value: &Value) -> Result<(), GhdfError> {
    match value {
        Value::UInt8(v) => buf.put_u8(*v),
        Value::Int8(v) => buf.put_i8(*v),
        Value::UInt16(v) => buf.put_u16_le(*v),
        Value::Int16(v) => buf.put_i16_le(*v),
        Value::UInt32(v) => buf.put_u32_le(*v),
        Value::Int32(v) => buf.put_i32_le(*v),
        Value::UInt64(v) => buf.put_u64_le(*v),
        Value::Int64(v) => buf.put_i64_le(*v),
        Value::Float(v) => buf.put_f32_le(*v),
        Value::Double(v) => buf.put_f64_le(*v),
        Value::Boolean(b) => encode_bool(buf, *b),
        Value::String(s) => encode_string(buf, s),
        Value::Compound(c) => encode_compound(buf, c)?,
        Value::EncodedInt(v) => encode_encoded_int(buf, *v),
        Value::Array(a) => encode_array(buf, a)?,
    }
    Ok(())
}

pub fn encode_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(if value { wire::TRUE } else { wire::FALSE });
}

/// Encodes a string (length prefix = UTF-8 byte length, not char count).
pub fn encode_string(buf: &mut BytesMut, value: &str) {
    let len = value.len() as u64;
    buf.reserve(encoded_len(len) + value.len());
    put_varint(buf, len);
    buf.put_slice(value.as_bytes());
}

pub fn encode_encoded_int(buf: &mut BytesMut, value: EncodedInt) {
    put_varint(buf, value.to_bits());
}

/// Encodes an element count followed by each element's payload.
pub fn encode_array(buf: &mut BytesMut, array: &Array) -> Result<(), GhdfError> {
    put_varint(buf, array.len() as u64);
    match array {
        Array::UInt8(v) => buf.put_slice(v),
        Array::Int8(v) => v.iter().for_each(|x| buf.put_i8(*x)),
        Array::UInt16(v) => v.iter().for_each(|x| buf.put_u16_le(*x)),
        Array::Int16(v) => v.iter().for_each(|x| buf.put_i16_le(*x)),
        Array::UInt32(v) => v.iter().for_each(|x| buf.put_u32_le(*x)),
        Array::Int32(v) => v.iter().for_each(|x| buf.put_i32_le(*x)),
        Array::UInt64(v) => v.iter().for_each(|x| buf.put_u64_le(*x)),
        Array::Int64(v) => v.iter().for_each(|x| buf.put_i64_le(*x)),
        Array::Float(v) => v.iter().for_each(|x| buf.put_f32_le(*x)),
        Array::Double(v) => v.iter().for_each(|x| buf.put_f64_le(*x)),
        Array::Boolean(v) => v.iter().for_each(|b| encode_bool(buf, *b)),
        Array::String(v) => v.iter().for_each(|s| encode_string(buf, s)),
        Array::Compound(v) => {
            for (index, compound) in v.iter().enumerate() {
                encode_compound(buf, compound).map_err(|e| e.in_element(index))?;
            }
        }
        Array::EncodedInt(v) => v.iter().for_each(|x| encode_encoded_int(buf, *x)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathSegment;

    /// Encodes a single-entry compound and returns the body after the header.
    fn body_of(id: u64, value: impl Into<Value>) -> Vec<u8> {
        let mut compound = Compound::new();
        compound.add(id, value);
        let bytes = encode_container(&compound).unwrap();
        bytes[MAGIC.len() + 1..].to_vec()
    }

    #[test]
    fn header_is_signature_then_version() {
        let bytes = encode_container(&Compound::new()).unwrap();
        assert_eq!(&bytes[..16], &MAGIC);
        assert_eq!(&bytes[16..], &[0x01, 0x00]);
    }

    #[test]
    fn encode_int32_little_endian() {
        assert_eq!(body_of(5, 42i32), vec![0x01, 0x05, 0x06, 0x2A, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn encode_scalar_widths() {
        assert_eq!(body_of(1, 0xABu8)[3..], [0xAB]);
        assert_eq!(body_of(1, -2i8)[3..], [0xFE]);
        assert_eq!(body_of(1, 0x0102u16)[3..], [0x02, 0x01]);
        assert_eq!(body_of(1, 1i64)[3..], [1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(body_of(1, 1.0f32)[3..], 1.0f32.to_le_bytes());
        assert_eq!(body_of(1, -0.5f64)[3..], (-0.5f64).to_le_bytes());
    }

    #[test]
    fn encode_booleans() {
        assert_eq!(body_of(1, true)[2..], [0x0B, 0x01]);
        assert_eq!(body_of(1, false)[2..], [0x0B, 0x00]);
    }

    #[test]
    fn string_length_counts_bytes() {
        // "é" is one char but two UTF-8 bytes.
        assert_eq!(body_of(1, "é")[2..], [0x0C, 0x02, 0xC3, 0xA9]);
    }

    #[test]
    fn encode_encoded_int_varint() {
        assert_eq!(body_of(1, EncodedInt(300))[2..], [0x0E, 0xAC, 0x02]);
        assert_eq!(body_of(1, EncodedInt(-1)).len(), 3 + 10);
    }

    #[test]
    fn encode_arrays() {
        assert_eq!(body_of(2, vec![1u16, 2])[2..], [0x83, 0x02, 0x01, 0x00, 0x02, 0x00]);
        assert_eq!(body_of(2, Vec::<String>::new())[2..], [0x8C, 0x00]);
        assert_eq!(
            body_of(2, vec!["a".to_string(), String::new()])[2..],
            [0x8C, 0x02, 0x01, b'a', 0x00]
        );
    }

    #[test]
    fn long_string_uses_multibyte_length() {
        let text = "x".repeat(200);
        let body = body_of(1, text.as_str());
        assert_eq!(body[2..5], [0x0C, 0xC8, 0x01]);
        assert_eq!(body.len(), 5 + 200);
    }

    #[test]
    fn encode_nested_compound() {
        let mut inner = Compound::new();
        inner.add(3, 7u8);
        assert_eq!(body_of(1, inner)[2..], [0x0D, 0x01, 0x03, 0x01, 0x07]);
    }

    #[test]
    fn large_identifier_uses_varint() {
        assert_eq!(body_of(128, 0u8)[..4], [0x01, 0x80, 0x01, 0x01]);
    }

    #[test]
    fn zero_identifier_rejected() {
        let mut compound = Compound::new();
        compound.add(0, 1u8);
        assert!(matches!(
            encode_container(&compound),
            Err(GhdfError::ReservedIdentifier)
        ));
    }

    #[test]
    fn nested_zero_identifier_reports_path() {
        let mut inner = Compound::new();
        inner.add(0, 1u8);
        let mut element = Compound::new();
        element.add(4, inner);
        let mut root = Compound::new();
        root.add(9, vec![Compound::new(), element]);

        let err = encode_container(&root).unwrap_err();
        assert_eq!(err.entry_path(), vec![9, 4]);
        assert_eq!(
            err.path(),
            vec![
                PathSegment::Entry(9),
                PathSegment::Element(1),
                PathSegment::Entry(4)
            ]
        );
        assert!(matches!(err.root(), GhdfError::ReservedIdentifier));
    }
}
