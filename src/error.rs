//! Error types for GHDF containers.

use std::path::PathBuf;

use crate::types::WireType;

/// Errors that can occur while building, encoding, or decoding a container.
#[derive(Debug, thiserror::Error)]
pub enum GhdfError {
    // -- Decoding --
    #[error("invalid signature, not a GHDF container")]
    BadSignature,

    #[error("unsupported GHDF version {found}, expected {expected}")]
    UnsupportedVersion { found: u64, expected: u64 },

    #[error(
        "unexpected end of stream reading {field} at offset {offset}: \
         need {needed} bytes but only {remaining} remaining"
    )]
    UnexpectedEndOfStream {
        field: &'static str,
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("unknown type tag 0x{tag:02X} at offset {offset}")]
    UnknownTypeTag { tag: u8, offset: usize },

    #[error("invalid boolean encoding {value} at offset {offset}")]
    InvalidBooleanEncoding { value: u8, offset: usize },

    #[error("invalid UTF-8 string at offset {offset}: {source}")]
    InvalidUtf8 {
        offset: usize,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("varint at offset {offset} does not fit in 64 bits")]
    VarintOverflow { offset: usize },

    #[error("compound nesting exceeds depth limit {limit} at offset {offset}")]
    DepthLimitExceeded { limit: usize, offset: usize },

    #[error("{remaining} bytes of trailing data after root compound at offset {offset}")]
    TrailingData { offset: usize, remaining: usize },

    // -- Encoding --
    #[error("entry identifier 0 is reserved")]
    ReservedIdentifier,

    #[error("destination {} is unavailable: {reason}", .path.display())]
    DestinationUnavailable { path: PathBuf, reason: &'static str },

    // -- Container access --
    #[error("invalid entry type: {0}")]
    InvalidEntryType(String),

    #[error("entry {id} not found")]
    EntryNotFound { id: u64 },

    #[error("entry {id} is of type {actual}, expected {expected}")]
    EntryTypeMismatch {
        id: u64,
        expected: WireType,
        actual: WireType,
    },

    /// A failure inside the value of entry `id`.
    #[error("entry {id}: {source}")]
    InEntry {
        id: u64,
        #[source]
        source: Box<GhdfError>,
    },

    /// A failure inside element `index` of an array.
    #[error("element {index}: {source}")]
    InElement {
        index: usize,
        #[source]
        source: Box<GhdfError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GhdfError {
    /// Wraps this error with the identifier of the entry being processed.
    pub fn in_entry(self, id: u64) -> Self {
        Self::InEntry {
            id,
            source: Box::new(self),
        }
    }

    /// Wraps this error with the index of the array element being processed.
    pub fn in_element(self, index: usize) -> Self {
        Self::InElement {
            index,
            source: Box::new(self),
        }
    }

    /// Returns the innermost cause, skipping any `InEntry` and `InElement`
    /// wrappers.
    pub fn root(&self) -> &GhdfError {
        let mut err = self;
        while let Self::InEntry { source, .. } | Self::InElement { source, .. } = err {
            err = source;
        }
        err
    }

    /// Returns the entries and array elements leading to the failure,
    /// outermost first.
    pub fn path(&self) -> Vec<PathSegment> {
        let mut path = Vec::new();
        let mut err = self;
        loop {
            match err {
                Self::InEntry { id, source } => {
                    path.push(PathSegment::Entry(*id));
                    err = source;
                }
                Self::InElement { index, source } => {
                    path.push(PathSegment::Element(*index));
                    err = source;
                }
                _ => return path,
            }
        }
    }

    /// Returns only the entry identifiers of [`path`](Self::path).
    pub fn entry_path(&self) -> Vec<u64> {
        self.path()
            .into_iter()
            .filter_map(|segment| match segment {
                PathSegment::Entry(id) => Some(id),
                PathSegment::Element(_) => None,
            })
            .collect()
    }
}

/// One step from a container down to the value that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    /// The entry with this identifier in a compound.
    Entry(u64),
    /// The element at this index in an array.
    Element(usize),
}
