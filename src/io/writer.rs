//! Writes containers to byte sinks.

use std::io::Write;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::GhdfError;
use crate::types::Compound;
use crate::version;

/// Encodes `compound` and writes it to `writer`.
///
/// Nothing is written unless the whole tree encodes successfully.
pub fn write_to<W: Write>(mut writer: W, compound: &Compound) -> Result<(), GhdfError> {
    let bytes = version::encode_current(compound)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Async variant of [`write_to`].
pub async fn write_to_async<W: AsyncWrite + Unpin>(
    mut writer: W,
    compound: &Compound,
) -> Result<(), GhdfError> {
    let bytes = version::encode_current(compound)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_container;

    #[test]
    fn write_matches_encoder_output() {
        let mut root = Compound::new();
        root.add(3, true);
        let mut output = Vec::new();
        write_to(&mut output, &root).unwrap();
        assert_eq!(output, encode_container(&root).unwrap().to_vec());
    }

    #[test]
    fn failed_encode_writes_nothing() {
        let mut inner = Compound::new();
        inner.add(0, 1u8);
        let mut root = Compound::new();
        root.add(1, "first");
        root.add(2, inner);

        let mut output = Vec::new();
        let err = write_to(&mut output, &root).unwrap_err();
        assert!(matches!(err.root(), GhdfError::ReservedIdentifier));
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn write_async_then_read_back() {
        let mut root = Compound::new();
        root.add(1, vec![Compound::new()]);
        let mut output = Vec::new();
        write_to_async(&mut output, &root).await.unwrap();
        assert_eq!(output, encode_container(&root).unwrap().to_vec());
    }

    #[tokio::test]
    async fn failed_encode_writes_nothing_async() {
        let mut root = Compound::new();
        root.add(0, 1u8);
        let mut output = Vec::new();
        assert!(write_to_async(&mut output, &root).await.is_err());
        assert!(output.is_empty());
    }
}
