//! GHDF v1 decoding: bytes → `Compound`.

use bytes::Buf;

use super::options::DecodeOptions;
use super::varint;
use super::wire::{self, FORMAT_VERSION, MAGIC};
use crate::error::GhdfError;
use crate::types::{Array, Compound, EncodedInt, Value, ValueKind, WireType};

/// Smallest possible encoded entry: one-byte id, tag, and a one-byte value.
const MIN_ENTRY_LEN: usize = 3;

/// Decodes a complete version-1 container: signature, version, exactly one
/// root compound, and nothing after it.
pub fn decode_container(data: &[u8], options: &DecodeOptions) -> Result<Compound, GhdfError> {
    let mut decoder = Decoder::new(data, options);
    let version = decoder.read_header()?;
    if version != FORMAT_VERSION {
        return Err(GhdfError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }
    let root = decoder.read_compound()?;
    decoder.finish()?;

    tracing::debug!(bytes = data.len(), entries = root.len(), "decoded GHDF container");
    Ok(root)
}

/// Verifies the signature and returns the format version without decoding
/// the body.
pub fn read_header(data: &[u8]) -> Result<u64, GhdfError> {
    Decoder::new(data, &DecodeOptions::default()).read_header()
}

struct Decoder<'a> {
    buf: &'a [u8],
    len: usize,
    depth: usize,
    max_depth: usize,
    /// Input bytes not yet backing a reservation. Shared by the whole decode
    /// so nested forged counts cannot each claim the full input size.
    prealloc_budget: usize,
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8], options: &DecodeOptions) -> Self {
        Self {
            buf: data,
            len: data.len(),
            depth: 0,
            max_depth: options.depth_limit(),
            prealloc_budget: data.len(),
        }
    }

    /// Capacity to reserve for `count` items of at least `min_width` bytes
    /// each. Items never share their minimal bytes, so honest input always
    /// gets its full count; forged counts together get at most the input size.
    fn reserve(&mut self, count: u64, min_width: usize) -> usize {
        let capacity = usize::try_from(count)
            .unwrap_or(usize::MAX)
            .min(self.buf.len() / min_width)
            .min(self.prealloc_budget / min_width);
        self.prealloc_budget -= capacity * min_width;
        capacity
    }

    /// Position of the next unread byte in the whole stream.
    fn offset(&self) -> usize {
        self.len - self.buf.len()
    }

    fn ensure_remaining(&self, field: &'static str, needed: usize) -> Result<(), GhdfError> {
        if self.buf.remaining() < needed {
            Err(GhdfError::UnexpectedEndOfStream {
                field,
                offset: self.offset(),
                needed,
                remaining: self.buf.remaining(),
            })
        } else {
            Ok(())
        }
    }

    // -- Framing --

    fn read_header(&mut self) -> Result<u64, GhdfError> {
        // A short stream whose bytes still match the signature is truncated,
        // not foreign.
        let available = self.buf.len().min(MAGIC.len());
        if self.buf[..available] != MAGIC[..available] {
            return Err(GhdfError::BadSignature);
        }
        self.ensure_remaining("signature", MAGIC.len())?;
        self.buf.advance(MAGIC.len());
        self.read_varint("format version")
    }

    fn finish(&self) -> Result<(), GhdfError> {
        if self.buf.has_remaining() {
            return Err(GhdfError::TrailingData {
                offset: self.offset(),
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    // -- Compounds --

    fn read_compound(&mut self) -> Result<Compound, GhdfError> {
        if self.depth >= self.max_depth {
            return Err(GhdfError::DepthLimitExceeded {
                limit: self.max_depth,
                offset: self.offset(),
            });
        }
        self.depth += 1;
        let result = self.read_entries();
        self.depth -= 1;
        result
    }

    fn read_entries(&mut self) -> Result<Compound, GhdfError> {
        let count = self.read_varint("entry count")?;
        let capacity = self.reserve(count, MIN_ENTRY_LEN);
        let mut compound = Compound::with_capacity(capacity);
        for _ in 0..count {
            self.read_entry(&mut compound)?;
        }
        Ok(compound)
    }

    fn read_entry(&mut self, compound: &mut Compound) -> Result<(), GhdfError> {
        let offset = self.offset();
        let id = self.read_varint("entry id")?;
        if id == 0 {
            tracing::warn!(offset, "decoded entry uses reserved identifier 0");
        }
        let wire_type = self.read_tag().map_err(|e| e.in_entry(id))?;
        tracing::trace!(id, %wire_type, offset, "reading entry");

        let value = self.read_value(wire_type).map_err(|e| e.in_entry(id))?;

        compound.add(id, value);
        Ok(())
    }

    fn read_tag(&mut self) -> Result<WireType, GhdfError> {
        let offset = self.offset();
        self.ensure_remaining("type tag", 1)?;
        let tag = self.buf.get_u8();
        WireType::from_tag(tag).ok_or(GhdfError::UnknownTypeTag { tag, offset })
    }

    // -- Values --

    fn read_value(&mut self, wire_type: WireType) -> Result<Value, GhdfError> {
        if wire_type.is_array {
            self.read_array(wire_type.kind).map(Value::Array)
        } else {
            self.read_scalar(wire_type.kind)
        }
    }

    fn read_scalar(&mut self, kind: ValueKind) -> Result<Value, GhdfError> {
        Ok(match kind {
            ValueKind::UInt8 => Value::UInt8(self.read_u8()?),
            ValueKind::Int8 => Value::Int8(self.read_i8()?),
            ValueKind::UInt16 => Value::UInt16(self.read_u16()?),
            ValueKind::Int16 => Value::Int16(self.read_i16()?),
            ValueKind::UInt32 => Value::UInt32(self.read_u32()?),
            ValueKind::Int32 => Value::Int32(self.read_i32()?),
            ValueKind::UInt64 => Value::UInt64(self.read_u64()?),
            ValueKind::Int64 => Value::Int64(self.read_i64()?),
            ValueKind::Float => Value::Float(self.read_f32()?),
            ValueKind::Double => Value::Double(self.read_f64()?),
            ValueKind::Boolean => Value::Boolean(self.read_bool()?),
            ValueKind::String => Value::String(self.read_string()?),
            ValueKind::Compound => Value::Compound(self.read_compound()?),
            ValueKind::EncodedInt => Value::EncodedInt(self.read_encoded_int()?),
        })
    }

    fn read_array(&mut self, kind: ValueKind) -> Result<Array, GhdfError> {
        let count = self.read_len("array length")?;
        Ok(match kind {
            ValueKind::UInt8 => {
                self.ensure_remaining("UInt8 array", count)?;
                let bytes = self.buf[..count].to_vec();
                self.buf.advance(count);
                Array::UInt8(bytes)
            }
            ValueKind::Int8 => Array::Int8(self.read_seq(kind, count, Self::read_i8)?),
            ValueKind::UInt16 => Array::UInt16(self.read_seq(kind, count, Self::read_u16)?),
            ValueKind::Int16 => Array::Int16(self.read_seq(kind, count, Self::read_i16)?),
            ValueKind::UInt32 => Array::UInt32(self.read_seq(kind, count, Self::read_u32)?),
            ValueKind::Int32 => Array::Int32(self.read_seq(kind, count, Self::read_i32)?),
            ValueKind::UInt64 => Array::UInt64(self.read_seq(kind, count, Self::read_u64)?),
            ValueKind::Int64 => Array::Int64(self.read_seq(kind, count, Self::read_i64)?),
            ValueKind::Float => Array::Float(self.read_seq(kind, count, Self::read_f32)?),
            ValueKind::Double => Array::Double(self.read_seq(kind, count, Self::read_f64)?),
            ValueKind::Boolean => Array::Boolean(self.read_seq(kind, count, Self::read_bool)?),
            ValueKind::String => Array::String(self.read_seq(kind, count, Self::read_string)?),
            ValueKind::Compound => {
                Array::Compound(self.read_seq(kind, count, Self::read_compound)?)
            }
            ValueKind::EncodedInt => {
                Array::EncodedInt(self.read_seq(kind, count, Self::read_encoded_int)?)
            }
        })
    }

    /// Reads `count` elements. A failing element is reported by index.
    fn read_seq<T>(
        &mut self,
        kind: ValueKind,
        count: usize,
        read: fn(&mut Self) -> Result<T, GhdfError>,
    ) -> Result<Vec<T>, GhdfError> {
        let min_width = kind.fixed_width().unwrap_or(1);
        let mut items = Vec::with_capacity(self.reserve(count as u64, min_width));
        for index in 0..count {
            items.push(read(self).map_err(|e| e.in_element(index))?);
        }
        Ok(items)
    }

    // -- Primitives (little-endian) --

    fn read_u8(&mut self) -> Result<u8, GhdfError> {
        self.ensure_remaining("UInt8", 1)?;
        Ok(self.buf.get_u8())
    }

    fn read_i8(&mut self) -> Result<i8, GhdfError> {
        self.ensure_remaining("Int8", 1)?;
        Ok(self.buf.get_i8())
    }

    fn read_u16(&mut self) -> Result<u16, GhdfError> {
        self.ensure_remaining("UInt16", 2)?;
        Ok(self.buf.get_u16_le())
    }

    fn read_i16(&mut self) -> Result<i16, GhdfError> {
        self.ensure_remaining("Int16", 2)?;
        Ok(self.buf.get_i16_le())
    }

    fn read_u32(&mut self) -> Result<u32, GhdfError> {
        self.ensure_remaining("UInt32", 4)?;
        Ok(self.buf.get_u32_le())
    }

    fn read_i32(&mut self) -> Result<i32, GhdfError> {
        self.ensure_remaining("Int32", 4)?;
        Ok(self.buf.get_i32_le())
    }

    fn read_u64(&mut self) -> Result<u64, GhdfError> {
        self.ensure_remaining("UInt64", 8)?;
        Ok(self.buf.get_u64_le())
    }

    fn read_i64(&mut self) -> Result<i64, GhdfError> {
        self.ensure_remaining("Int64", 8)?;
        Ok(self.buf.get_i64_le())
    }

    fn read_f32(&mut self) -> Result<f32, GhdfError> {
        self.ensure_remaining("Float", 4)?;
        Ok(self.buf.get_f32_le())
    }

    fn read_f64(&mut self) -> Result<f64, GhdfError> {
        self.ensure_remaining("Double", 8)?;
        Ok(self.buf.get_f64_le())
    }

    fn read_bool(&mut self) -> Result<bool, GhdfError> {
        let offset = self.offset();
        self.ensure_remaining("Boolean", 1)?;
        match self.buf.get_u8() {
            wire::FALSE => Ok(false),
            wire::TRUE => Ok(true),
            value => Err(GhdfError::InvalidBooleanEncoding { value, offset }),
        }
    }

    fn read_string(&mut self) -> Result<String, GhdfError> {
        let len = self.read_len("string length")?;
        self.ensure_remaining("string bytes", len)?;
        let offset = self.offset();
        let data = self.buf[..len].to_vec();
        self.buf.advance(len);
        String::from_utf8(data).map_err(|source| GhdfError::InvalidUtf8 { offset, source })
    }

    fn read_encoded_int(&mut self) -> Result<EncodedInt, GhdfError> {
        self.read_varint("EncodedInt").map(EncodedInt::from_bits)
    }

    fn read_varint(&mut self, field: &'static str) -> Result<u64, GhdfError> {
        let offset = self.offset();
        varint::get_varint(&mut self.buf, field, offset)
    }

    /// Reads a varint length prefix. A length that cannot be addressed can
    /// never be satisfied by the remaining input.
    fn read_len(&mut self, field: &'static str) -> Result<usize, GhdfError> {
        let value = self.read_varint(field)?;
        usize::try_from(value).map_err(|_| GhdfError::UnexpectedEndOfStream {
            field,
            offset: self.offset(),
            needed: usize::MAX,
            remaining: self.buf.remaining(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::codec::options::DEFAULT_MAX_DEPTH;
    use crate::codec::varint::put_varint;
    use crate::error::PathSegment;
    use bytes::{BufMut, BytesMut};

    /// Signature and version header followed by `body`.
    fn stream(body: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        buf.put_slice(&MAGIC);
        put_varint(&mut buf, FORMAT_VERSION);
        buf.put_slice(body);
        buf.to_vec()
    }

    fn decode(data: &[u8]) -> Result<Compound, GhdfError> {
        decode_container(data, &DecodeOptions::default())
    }

    #[test]
    fn empty_root_compound() {
        let root = decode(&stream(&[0x00])).unwrap();
        assert!(root.is_empty());
    }

    #[test]
    fn scalar_entries_little_endian() {
        let body = [
            0x03, // 3 entries
            0x05, 0x06, 0x2A, 0x00, 0x00, 0x00, // id 5: Int32 42
            0x06, 0x0B, 0x01, // id 6: Boolean true
            0x07, 0x0C, 0x02, b'h', b'i', // id 7: String "hi"
        ];
        let root = decode(&stream(&body)).unwrap();
        assert_eq!(root.get::<i32>(5), Some(42));
        assert_eq!(root.get::<bool>(6), Some(true));
        assert_eq!(root.get::<&str>(7), Some("hi"));
    }

    #[test]
    fn encoded_int_negative_uses_ten_bytes() {
        let mut body = BytesMut::new();
        body.put_slice(&[0x01, 0x01, 0x0E]);
        put_varint(&mut body, -2i64 as u64);
        let root = decode(&stream(&body)).unwrap();
        assert_eq!(root.get::<EncodedInt>(1), Some(EncodedInt(-2)));
    }

    #[test]
    fn array_of_uint16() {
        let body = [0x01, 0x09, 0x83, 0x02, 0x01, 0x00, 0xFF, 0xFF];
        let root = decode(&stream(&body)).unwrap();
        assert_eq!(root.get::<&[u16]>(9), Some(&[1u16, 0xFFFF][..]));
    }

    #[test]
    fn bad_signature() {
        let mut data = stream(&[0x00]);
        data[3] ^= 0x01;
        assert!(matches!(decode(&data), Err(GhdfError::BadSignature)));
    }

    #[test]
    fn short_foreign_input_is_bad_signature() {
        assert!(matches!(decode(b"PK"), Err(GhdfError::BadSignature)));
    }

    #[test]
    fn short_matching_prefix_is_truncation() {
        assert!(matches!(
            decode(&MAGIC[..10]),
            Err(GhdfError::UnexpectedEndOfStream {
                field: "signature",
                ..
            })
        ));
    }

    #[test]
    fn unsupported_version() {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&[0x02, 0x00]);
        assert!(matches!(
            decode(&data),
            Err(GhdfError::UnsupportedVersion {
                found: 2,
                expected: 1
            })
        ));
    }

    #[test]
    fn unknown_tags_rejected_before_value() {
        for tag in [0x00u8, 0x80, 0x0F, 0x7F, 0xFF] {
            let data = stream(&[0x01, 0x01, tag, 0x00]);
            let err = decode(&data).unwrap_err();
            assert_eq!(err.entry_path(), vec![1]);
            assert!(
                matches!(err.root(), GhdfError::UnknownTypeTag { tag: t, offset: 19 } if *t == tag),
                "tag {tag:#04x}: {err}"
            );
        }
    }

    #[test]
    fn invalid_boolean() {
        let data = stream(&[0x01, 0x04, 0x0B, 0x02]);
        let err = decode(&data).unwrap_err();
        assert!(matches!(
            err.root(),
            GhdfError::InvalidBooleanEncoding { value: 2, offset: 20 }
        ));
    }

    #[test]
    fn invalid_utf8() {
        let data = stream(&[0x01, 0x01, 0x0C, 0x02, 0xC3, 0x28]);
        let err = decode(&data).unwrap_err();
        assert!(matches!(err.root(), GhdfError::InvalidUtf8 { .. }));
    }

    #[test]
    fn trailing_data() {
        let mut data = stream(&[0x00]);
        data.push(0xAB);
        assert!(matches!(
            decode(&data),
            Err(GhdfError::TrailingData {
                offset: 18,
                remaining: 1
            })
        ));
    }

    #[test]
    fn nested_failure_reports_entry_path() {
        // id 4: Compound { id 9: Int64 <truncated> }
        let data = stream(&[0x01, 0x04, 0x0D, 0x01, 0x09, 0x08, 0x01, 0x02]);
        let err = decode(&data).unwrap_err();
        assert_eq!(err.entry_path(), vec![4, 9]);
        assert!(matches!(
            err.root(),
            GhdfError::UnexpectedEndOfStream { field: "Int64", needed: 8, remaining: 2, .. }
        ));
    }

    #[test]
    fn zero_identifier_decodes() {
        let root = decode(&stream(&[0x01, 0x00, 0x01, 0x07])).unwrap();
        assert_eq!(root.get::<u8>(0), Some(7));
    }

    #[test]
    fn duplicate_identifier_last_wins() {
        let data = stream(&[0x02, 0x01, 0x01, 0x07, 0x01, 0x02, 0xFF]);
        let root = decode(&data).unwrap();
        assert_eq!(root.len(), 1);
        assert_eq!(root.get::<i8>(1), Some(-1));
    }

    #[test]
    fn huge_counts_fail_without_allocating() {
        let mut body = BytesMut::new();
        body.put_slice(&[0x01, 0x01, 0x86]); // id 1: Int32 array
        put_varint(&mut body, u64::from(u32::MAX));
        let err = decode(&stream(&body)).unwrap_err();
        assert!(matches!(err.root(), GhdfError::UnexpectedEndOfStream { .. }));

        let mut body = BytesMut::new();
        put_varint(&mut body, u64::MAX);
        let err = decode(&stream(&body)).unwrap_err();
        assert!(matches!(err.root(), GhdfError::UnexpectedEndOfStream { .. }));
    }

    #[test]
    fn depth_limit_enforced() {
        // Three nested compounds: root → 1 → 1.
        let data = stream(&[0x01, 0x01, 0x0D, 0x01, 0x01, 0x0D, 0x00]);
        assert!(decode_container(&data, &DecodeOptions::new().max_depth(3)).is_ok());
        let err = decode_container(&data, &DecodeOptions::new().max_depth(2)).unwrap_err();
        assert_eq!(err.entry_path(), vec![1, 1]);
        assert!(matches!(
            err.root(),
            GhdfError::DepthLimitExceeded { limit: 2, .. }
        ));
    }

    /// `levels` compounds nested below the root, each linked to its parent
    /// by `link` (an entry header, plus an array length for array links).
    fn nested(levels: usize, link: &[u8]) -> Vec<u8> {
        let mut body = vec![0x01];
        for level in 0..levels {
            body.extend_from_slice(link);
            body.push(if level + 1 == levels { 0x00 } else { 0x01 });
        }
        stream(&body)
    }

    /// Decodes on a thread with the 2 MiB stack that spawned threads and
    /// tokio workers get by default.
    fn decode_on_small_stack(data: Vec<u8>) -> Result<usize, GhdfError> {
        std::thread::Builder::new()
            .stack_size(2 << 20)
            .spawn(move || decode(&data).map(|root| root.len()))
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn default_depth_fits_small_stack() {
        for link in [&[0x01, 0x0D][..], &[0x01, 0x8D, 0x01][..]] {
            let deepest = nested(DEFAULT_MAX_DEPTH - 1, link);
            assert_eq!(decode_on_small_stack(deepest).unwrap(), 1);

            let too_deep = nested(DEFAULT_MAX_DEPTH, link);
            let err = decode_on_small_stack(too_deep).unwrap_err();
            assert!(matches!(
                err.root(),
                GhdfError::DepthLimitExceeded {
                    limit: DEFAULT_MAX_DEPTH,
                    ..
                }
            ));
        }
    }

    #[test]
    fn forged_counts_share_one_allocation_budget() {
        let mut body = BytesMut::new();
        for _ in 0..200 {
            put_varint(&mut body, 1 << 40);
            body.put_slice(&[0x01, 0x0D]);
        }
        body.put_bytes(0x00, 64 * 1024);
        let data = stream(&body);

        let mut decoder = Decoder::new(&data, &DecodeOptions::default());
        let mut reserved = 0;
        for _ in 0..100 {
            reserved += decoder.reserve(1 << 40, MIN_ENTRY_LEN) * MIN_ENTRY_LEN;
            reserved += decoder.reserve(u64::MAX, 8) * 8;
        }
        assert!(reserved <= data.len(), "reserved {reserved} for {} bytes", data.len());

        let err = decode(&data).unwrap_err();
        assert!(matches!(err.root(), GhdfError::DepthLimitExceeded { .. }));
    }

    #[test]
    fn honest_counts_reserve_exactly() {
        let data = stream(&[0x00; 64]);
        let mut decoder = Decoder::new(&data, &DecodeOptions::default());
        assert_eq!(decoder.reserve(5, MIN_ENTRY_LEN), 5);
        assert_eq!(decoder.reserve(8, 4), 8);
    }

    #[test]
    fn failing_array_element_reports_index() {
        // id 7: [ {}, { id 1: Boolean true }, { id 1: Boolean 9 } ]
        let data = stream(&[
            0x01, 0x07, 0x8D, 0x03, //
            0x00, //
            0x01, 0x01, 0x0B, 0x01, //
            0x01, 0x01, 0x0B, 0x09,
        ]);
        let err = decode(&data).unwrap_err();
        assert_eq!(
            err.path(),
            vec![
                PathSegment::Entry(7),
                PathSegment::Element(2),
                PathSegment::Entry(1)
            ]
        );
        assert!(matches!(
            err.root(),
            GhdfError::InvalidBooleanEncoding { value: 9, .. }
        ));
    }

    #[test]
    fn truncated_scalar_array_reports_index() {
        let data = stream(&[0x01, 0x02, 0x83, 0x02, 0x01, 0x00, 0x05]);
        let err = decode(&data).unwrap_err();
        assert_eq!(err.path(), vec![PathSegment::Entry(2), PathSegment::Element(1)]);
    }

    #[test]
    fn read_header_reports_version() {
        assert_eq!(read_header(&stream(&[0x00])).unwrap(), 1);
    }

    #[test]
    fn decodes_encoder_output() {
        let mut inner = Compound::new();
        inner.add(1, 2.5f64);
        let mut root = Compound::new();
        root.add(1, inner);
        root.add(2, vec![true, false]);
        let bytes = encode::encode_container(&root).unwrap();
        assert_eq!(decode(&bytes).unwrap(), root);
    }
}
