use super::error::EngineError;
use fs4::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// An open file holding an advisory lock for as long as the value lives.
///
/// Every acquisition opens a fresh handle, so two guards on the same path
/// exclude each other whether they come from different processes or from
/// different threads of one process.
#[derive(Debug)]
pub struct LockedFile {
    file: File,
    path: PathBuf,
}

impl LockedFile {
    /// Opens `path` for reading and writing, creating it if needed, and blocks
    /// until an exclusive lock is held. There is no timeout.
    pub fn exclusive(path: &Path) -> Result<Self, EngineError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(EngineError::io(path))?;
        trace!(path = %path.display(), "Waiting for exclusive lock.");
        FileExt::lock_exclusive(&file).map_err(|source| EngineError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Exclusive lock acquired.");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Opens an existing `path` read-only under a shared lock. Returns `None`
    /// when the file does not exist.
    pub fn shared(path: &Path) -> Result<Option<Self>, EngineError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(EngineError::io(path)(e)),
        };
        FileExt::lock_shared(&file).map_err(|source| EngineError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Shared lock acquired.");
        Ok(Some(Self {
            file,
            path: path.to_path_buf(),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole file from the start, byte for byte.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, EngineError> {
        let mut content = Vec::new();
        self.file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.read_to_end(&mut content))
            .map_err(EngineError::io(&self.path))?;
        Ok(content)
    }

    /// Reads the whole file from the start as text. See [`decode_lines`].
    pub fn read_all(&mut self) -> Result<String, EngineError> {
        let bytes = self.read_bytes()?;
        Ok(decode_lines(&self.path, &bytes))
    }
}

impl Deref for LockedFile {
    type Target = File;

    fn deref(&self) -> &File {
        &self.file
    }
}

impl DerefMut for LockedFile {
    fn deref_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        // Closing the handle releases the lock as well; unlocking first just
        // makes the release point explicit.
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!(path = %self.path.display(), error = %e, "Explicit unlock failed; relying on close.");
        }
    }
}

/// Decodes a line-oriented cache file. Lines that are not valid UTF-8 are
/// logged and dropped, so one corrupt line cannot wedge every later update of
/// the file.
pub fn decode_lines(path: &Path, bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let mut text = String::with_capacity(bytes.len());
    for (index, line) in bytes.split(|b| *b == b'\n').enumerate() {
        match std::str::from_utf8(line) {
            Ok(line) => {
                text.push_str(line);
                text.push('\n');
            }
            Err(_) => {
                warn!(path = %path.display(), line = index + 1, "Skipping line that is not valid UTF-8.");
            }
        }
    }
    text
}

/// Runs `f` while holding an exclusive lock on `path`. The lock is released
/// when `f` returns, whether it succeeded or not.
pub fn with_exclusive_lock<T, F>(path: &Path, f: F) -> Result<T, EngineError>
where
    F: FnOnce(&mut LockedFile) -> Result<T, EngineError>,
{
    let mut guard = LockedFile::exclusive(path)?;
    f(&mut guard)
}

/// Runs `f` while holding a shared lock on `path`, or returns `None` if the
/// file does not exist yet.
pub fn with_shared_lock<T, F>(path: &Path, f: F) -> Result<Option<T>, EngineError>
where
    F: FnOnce(&mut LockedFile) -> Result<T, EngineError>,
{
    match LockedFile::shared(path)? {
        Some(mut guard) => f(&mut guard).map(Some),
        None => Ok(None),
    }
}
