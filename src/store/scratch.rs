//! Scratch file
//!
//! Private append-only backing file for one collection.

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::error::{CollectionError, Result};

/// Append-only scratch file, deleted on `close()` or drop
///
/// ## Concurrency:
/// - Every seek + transfer pair runs under `file`'s lock, so an append
///   computes its offset and writes it in one critical section
/// - Reads go through `&self`
pub struct ScratchFile {
    /// Path of the file on disk (for diagnostics)
    path: PathBuf,

    /// File handle; the temp file is removed when this is dropped
    file: Mutex<NamedTempFile>,
}

impl ScratchFile {
    /// Provision a new, empty scratch file
    ///
    /// Any failure is reported as `Initialization`.
    pub fn create(config: &Config) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder
            .prefix(config.file_prefix.as_str())
            .suffix(config.file_suffix.as_str());

        let file = match &config.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(CollectionError::Initialization)?;

        let path = file.path().to_path_buf();
        tracing::debug!("Provisioned scratch file {}", path.display());

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Append bytes at end of file
    ///
    /// Returns the offset the bytes were written at, which is the file length
    /// immediately before the append.
    pub fn append(&self, bytes: &[u8]) -> Result<u64> {
        let mut file = self.file.lock();
        let position = file.seek(SeekFrom::End(0))?;
        file.write_all(bytes)?;

        tracing::trace!("Appended {} bytes at offset {}", bytes.len(), position);
        Ok(position)
    }

    /// Read `len` bytes starting at `position`
    pub fn read_at(&self, position: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(position))?;
        file.read_exact(&mut buf)?;

        tracing::trace!("Read {} bytes at offset {}", len, position);
        Ok(buf)
    }

    /// Current file length in bytes
    pub fn len(&self) -> Result<u64> {
        let file = self.file.lock();
        Ok(file.as_file().metadata()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file, reporting any error
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.file.into_inner().close()?;
        tracing::debug!("Released scratch file {}", path.display());
        Ok(())
    }
}

impl std::fmt::Debug for ScratchFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchFile").field("path", &self.path).finish()
    }
}
