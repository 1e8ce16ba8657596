//! GHDF: a self-describing, strongly-typed, nested binary container format.
//!
//! A container is a tree of [`Compound`]s mapping non-zero `u64` identifiers
//! to typed values: fixed-width integers and floats, booleans, strings,
//! varint-backed [`EncodedInt`]s, nested compounds, and homogeneous arrays of
//! any of these. Decoding treats its input as untrusted and rejects any
//! truncation, unknown tag, or structural violation.
//!
//! # Architecture
//!
//! - **`types`**: Values, the [`Compound`] container, and the wire type registry
//! - **`codec`**: Version-1 wire encoding/decoding and the varint codec
//! - **`version`**: Selection of a codec by format version
//! - **`io`**: Byte-source/byte-sink and file adapters (sync and async)

pub mod codec;
pub mod error;
pub mod io;
pub mod types;
pub mod version;

use bytes::Bytes;

pub use codec::DecodeOptions;
pub use error::{GhdfError, PathSegment};
pub use types::{Array, Compound, EncodedInt, FromValue, Value, ValueKind, WireType};

/// Decodes a complete container with default options.
pub fn decode(data: &[u8]) -> Result<Compound, GhdfError> {
    decode_with(data, &DecodeOptions::default())
}

/// Decodes a complete container, dispatching on the version in its header.
pub fn decode_with(data: &[u8], options: &DecodeOptions) -> Result<Compound, GhdfError> {
    version::decode_any(data, options)
}

/// Encodes `compound` as a complete container in the current format version.
pub fn encode(compound: &Compound) -> Result<Bytes, GhdfError> {
    version::encode_current(compound)
}
