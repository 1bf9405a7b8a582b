// ── On-disk document cache ──
//
// One plain file holds the last good fleet-status document; its mtime is
// the freshness clock. Replacement goes through a temp sibling plus
// rename, so a reader never observes a partial write and a failed fetch
// never clobbers the previous document.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, trace};

/// A cached document together with its age at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedDocument {
    pub bytes: Vec<u8>,
    pub age: Duration,
}

/// File-backed store for the last successfully fetched document.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached document, if any.
    ///
    /// A missing or zero-length file reads as `None`, so a truncated
    /// cache forces a re-fetch instead of poisoning the check. Future
    /// mtimes (clock skew) read as age zero.
    pub fn get(&self) -> io::Result<Option<CachedDocument>> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if metadata.len() == 0 {
            trace!(path = %self.path.display(), "ignoring empty cache file");
            return Ok(None);
        }
        let age = metadata.modified()?.elapsed().unwrap_or_default();
        let bytes = fs::read(&self.path)?;
        Ok(Some(CachedDocument { bytes, age }))
    }

    /// Atomically replace the cached document with `bytes`.
    ///
    /// Writes a temp sibling first and renames it over the cache path;
    /// the previous document stays intact on any failure before the
    /// rename.
    pub fn put(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp_path = self.temp_path();
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), size = bytes.len(), "cache replaced");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map_or_else(OsString::new, OsString::from);
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
