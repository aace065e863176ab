//! Disk I/O helpers: whole-file load, whole-file save, and lazy creation.
//!
//! Every save replaces the file content in full. With
//! [`WritePolicy::Atomic`] the rename-over approach is close to atomic on most
//! platforms; on FAT32 or network shares there are no hard guarantees.

use crate::error::{Error, Result};
use crate::policy::WritePolicy;
use crate::serializer::Serializer;
use crate::Collection;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Reads and deserializes the whole file at `path`. A missing file is an empty
/// collection (not an error); anything unreadable as a JSON object is
/// [`Error::DataCorruption`].
pub fn load<S>(path: &Path, serializer: &S) -> Result<Collection>
where
    S: Serializer,
{
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Collection::new()),
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    let data = serializer.deserialize(&bytes)?;
    debug!(path = %path.display(), records = data.len(), "loaded collection");
    Ok(data)
}

/// Serializes `data` and replaces the content of `path` with it.
pub fn save<S>(path: &Path, data: &Collection, serializer: &S, policy: WritePolicy) -> Result<()>
where
    S: Serializer,
{
    let bytes = serializer.serialize(data)?;
    match policy {
        WritePolicy::InPlace => std::fs::write(path, &bytes).map_err(|e| Error::Io(e.to_string()))?,
        WritePolicy::Atomic => atomic_write(path, &bytes)?,
    }
    debug!(path = %path.display(), records = data.len(), ?policy, "saved collection");
    Ok(())
}

/// Write `bytes` to a fresh temp file beside `path` and rename it over `path`.
/// Each call gets its own temp file, so concurrent saves never share one.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::Io(e.to_string()))?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error.to_string()))?;
    Ok(())
}

/// Create `path` holding an empty collection if nothing exists there yet.
/// Returns `true` when the file was created. An existing file is never
/// touched, whatever it contains.
pub fn ensure_file<S>(path: &Path, serializer: &S) -> Result<bool>
where
    S: Serializer,
{
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    let bytes = serializer.serialize(&Collection::new())?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    Ok(true)
}
