//! GHDF wire constants.

/// Fixed 16-byte signature opening every container.
pub const MAGIC: [u8; 16] = [
    0x66, 0x25, 0x8F, 0xB5, 0x03, 0xCD, 0x7B, 0xB9, 0x94, 0x9D, 0x62, 0xB1, 0xB2, 0x97, 0x2B, 0xAA,
];

/// The format version written by this crate.
pub const FORMAT_VERSION: u64 = 1;

// Boolean bytes. Anything else is invalid.
pub const FALSE: u8 = 0;
pub const TRUE: u8 = 1;

pub use crate::types::kind::{ARRAY_FLAG, KIND_MASK};
