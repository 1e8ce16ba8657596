//! Reads containers from byte sources.

use std::io::Read;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::DecodeOptions;
use crate::error::GhdfError;
use crate::types::Compound;
use crate::version;

/// Reads `reader` to the end and decodes the container it holds.
pub fn read_from<R: Read>(mut reader: R, options: &DecodeOptions) -> Result<Compound, GhdfError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    version::decode_any(&data, options)
}

/// Async variant of [`read_from`].
pub async fn read_from_async<R: AsyncRead + Unpin>(
    mut reader: R,
    options: &DecodeOptions,
) -> Result<Compound, GhdfError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).await?;
    version::decode_any(&data, options)
}
