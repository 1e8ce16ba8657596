//! Byte-source and byte-sink adapters for containers.
//!
//! Decoding reads the whole source into memory first; encoding serializes the
//! whole tree into memory before the first byte reaches the sink.

pub mod file;
pub mod reader;
pub mod writer;

pub use reader::{read_from, read_from_async};
pub use writer::{write_to, write_to_async};
