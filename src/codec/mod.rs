//! GHDF binary encoding format, version 1.
//!
//! A container is a 16-byte signature, a varint format version, and exactly
//! one root compound. All fixed-width numbers are little-endian; lengths,
//! identifiers, and `EncodedInt` values are varints.

pub mod decode;
pub mod encode;
pub mod options;
pub mod varint;
pub mod wire;

use bytes::Bytes;

pub use decode::decode_container;
pub use encode::encode_container;
pub use options::DecodeOptions;

use crate::error::GhdfError;
use crate::types::Compound;
use crate::version::ContainerCodec;

/// The version-1 reader and writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct V1;

impl ContainerCodec for V1 {
    fn version(&self) -> u64 {
        wire::FORMAT_VERSION
    }

    fn decode(&self, data: &[u8], options: &DecodeOptions) -> Result<Compound, GhdfError> {
        decode_container(data, options)
    }

    fn encode(&self, compound: &Compound) -> Result<Bytes, GhdfError> {
        encode_container(compound)
    }
}
