//! File adapter: extension normalization and whole-file reads and writes.

use std::path::{Path, PathBuf};

use crate::codec::DecodeOptions;
use crate::error::GhdfError;
use crate::types::Compound;
use crate::version;

/// Extension given to every file written by this module.
pub const FILE_EXTENSION: &str = "ghdf";

/// Replaces (or adds) the extension of `path` with `.ghdf`.
pub fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref().with_extension(FILE_EXTENSION)
}

fn directory_error(path: PathBuf) -> GhdfError {
    GhdfError::DestinationUnavailable {
        path,
        reason: "path is a directory",
    }
}

/// Encodes `compound` and writes it to `path` with its extension normalized,
/// replacing any existing file. Returns the path written.
pub fn write_file(path: impl AsRef<Path>, compound: &Compound) -> Result<PathBuf, GhdfError> {
    let path = normalize_path(path);
    if path.is_dir() {
        return Err(directory_error(path));
    }
    let bytes = version::encode_current(compound)?;
    std::fs::write(&path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote GHDF file");
    Ok(path)
}

/// Reads and decodes the container at `path`, used as given.
pub fn read_file(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Compound, GhdfError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "read GHDF file");
    version::decode_any(&data, options)
}

/// Async variant of [`write_file`].
pub async fn write_file_async(
    path: impl AsRef<Path>,
    compound: &Compound,
) -> Result<PathBuf, GhdfError> {
    let path = normalize_path(path);
    if tokio::fs::metadata(&path)
        .await
        .is_ok_and(|meta| meta.is_dir())
    {
        return Err(directory_error(path));
    }
    let bytes = version::encode_current(compound)?;
    tokio::fs::write(&path, &bytes).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote GHDF file");
    Ok(path)
}

/// Async variant of [`read_file`].
pub async fn read_file_async(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<Compound, GhdfError> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "read GHDF file");
    version::decode_any(&data, options)
}
