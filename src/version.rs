//! Format version selection.

use bytes::Bytes;

use crate::codec::{self, DecodeOptions};
use crate::error::GhdfError;
use crate::types::Compound;

/// The version written by [`encode`](crate::encode).
pub const CURRENT_VERSION: u64 = codec::wire::FORMAT_VERSION;

/// Versions this crate can read and write.
pub const SUPPORTED_VERSIONS: [u64; 1] = [CURRENT_VERSION];

/// A reader/writer pair for one format version.
///
/// Each implementation owns the full stream layout for its version, header
/// included, so new versions can be added without touching existing ones.
pub trait ContainerCodec: Send + Sync {
    fn version(&self) -> u64;

    /// Decodes a complete stream: signature, version, and root compound.
    fn decode(&self, data: &[u8], options: &DecodeOptions) -> Result<Compound, GhdfError>;

    /// Encodes `compound` as a complete stream.
    fn encode(&self, compound: &Compound) -> Result<Bytes, GhdfError>;
}

static V1: codec::V1 = codec::V1;

/// The codec for [`CURRENT_VERSION`].
pub fn current_codec() -> &'static dyn ContainerCodec {
    &V1
}

/// Returns the codec for `version`, or `None` if it is not supported.
pub fn codec_for_version(version: u64) -> Option<&'static dyn ContainerCodec> {
    match version {
        1 => Some(&V1),
        _ => None,
    }
}

/// Decodes a stream with whichever codec its header names.
pub fn decode_any(data: &[u8], options: &DecodeOptions) -> Result<Compound, GhdfError> {
    let version = codec::decode::read_header(data)?;
    let codec = codec_for_version(version).ok_or(GhdfError::UnsupportedVersion {
        found: version,
        expected: CURRENT_VERSION,
    })?;
    codec.decode(data, options)
}

/// Encodes with the current version's codec.
pub fn encode_current(compound: &Compound) -> Result<Bytes, GhdfError> {
    current_codec().encode(compound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_version_has_a_codec() {
        for version in SUPPORTED_VERSIONS {
            let codec = codec_for_version(version).expect("missing codec");
            assert_eq!(codec.version(), version);
        }
    }

    #[test]
    fn current_codec_matches_current_version() {
        assert_eq!(current_codec().version(), CURRENT_VERSION);
    }

    #[test]
    fn unknown_versions_have_no_codec() {
        assert!(codec_for_version(0).is_none());
        assert!(codec_for_version(2).is_none());
        assert!(codec_for_version(u64::MAX).is_none());
    }

    #[test]
    fn decode_any_dispatches_on_header() {
        let mut root = Compound::new();
        root.add(1, "x");
        let bytes = encode_current(&root).unwrap();
        assert_eq!(decode_any(&bytes, &DecodeOptions::default()).unwrap(), root);
    }

    #[test]
    fn decode_any_rejects_unknown_version() {
        let mut data = codec::wire::MAGIC.to_vec();
        data.extend_from_slice(&[0x02, 0x00]);
        assert!(matches!(
            decode_any(&data, &DecodeOptions::default()),
            Err(GhdfError::UnsupportedVersion { found: 2, .. })
        ));
    }
}
