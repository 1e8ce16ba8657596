//! Variable-length integer coding: 7 value bits per byte, least significant
//! group first, high bit set on every byte except the last.

use bytes::{Buf, BufMut};

use crate::error::GhdfError;

const VALUE_BITS: u32 = 7;
const VALUE_MASK: u8 = 0x7F;
const CONTINUATION: u8 = 0x80;

/// Longest encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

/// Appends `value` as a varint. No zig-zag transform is applied.
pub fn put_varint(buf: &mut impl BufMut, mut value: u64) {
    while value > u64::from(VALUE_MASK) {
        buf.put_u8((value as u8 & VALUE_MASK) | CONTINUATION);
        value >>= VALUE_BITS;
    }
    buf.put_u8(value as u8);
}

/// Number of bytes `put_varint` writes for `value`.
pub fn encoded_len(value: u64) -> usize {
    let significant = 64 - value.leading_zeros() as usize;
    significant.div_ceil(VALUE_BITS as usize).max(1)
}

/// Reads one varint. `field` and `offset` (the position of the first byte in
/// the whole stream) only feed error diagnostics.
pub fn get_varint(
    buf: &mut impl Buf,
    field: &'static str,
    offset: usize,
) -> Result<u64, GhdfError> {
    let mut value = 0u64;
    for index in 0..MAX_VARINT_LEN {
        if !buf.has_remaining() {
            return Err(GhdfError::UnexpectedEndOfStream {
                field,
                offset: offset + index,
                needed: 1,
                remaining: 0,
            });
        }
        let byte = buf.get_u8();
        let shift = VALUE_BITS * index as u32;
        let bits = u64::from(byte & VALUE_MASK);
        // The tenth byte may only contribute bit 63.
        if index == MAX_VARINT_LEN - 1 && bits > 1 {
            return Err(GhdfError::VarintOverflow { offset });
        }
        value |= bits << shift;
        if byte & CONTINUATION == 0 {
            return Ok(value);
        }
    }
    Err(GhdfError::VarintOverflow { offset })
}
