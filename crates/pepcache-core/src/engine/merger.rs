use super::error::EngineError;
use super::lock::{decode_lines, with_exclusive_lock};
use crate::core::io::variant_list::{self, VariantSet};
use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{error, info, trace, warn};

/// Merges `new_keys` into the variant list at `path` and reports whether any
/// of them were not already present.
///
/// The whole read-merge-rewrite cycle runs under one exclusive lock, which is
/// the only serialization point between writers of this peptide. When nothing
/// new is found the file is not written at all. When something is, the full
/// sorted set replaces the old content and is synced before the lock is
/// dropped; if that write fails, the previous bytes are put back before the
/// error is returned.
pub fn merge_variants(path: &Path, new_keys: &VariantSet) -> Result<bool, EngineError> {
    with_exclusive_lock(path, |file| {
        let previous = file.read_bytes()?;
        let mut known = variant_list::parse(&decode_lines(path, &previous));

        let before = known.len();
        known.extend(new_keys.iter().cloned());
        let added = known.len() - before;
        if added == 0 {
            trace!(path = %path.display(), "No new variants to merge.");
            return Ok(false);
        }

        let rendered = variant_list::render(&known);
        rewrite(&mut **file, path, &previous, rendered.as_bytes())?;
        info!(
            path = %path.display(),
            added,
            total = known.len(),
            "Merged new variants."
        );
        Ok(true)
    })
}

/// Content that can be replaced wholesale in place.
trait Replace: Write {
    /// Empties the content and moves the cursor to the start.
    fn clear(&mut self) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

impl Replace for File {
    fn clear(&mut self) -> io::Result<()> {
        self.seek(SeekFrom::Start(0))?;
        self.set_len(0)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

fn rewrite<R: Replace>(
    target: &mut R,
    path: &Path,
    previous: &[u8],
    next: &[u8],
) -> Result<(), EngineError> {
    let Err(write_err) = overwrite(target, next) else {
        return Ok(());
    };

    warn!(
        path = %path.display(),
        error = %write_err,
        "Variant list rewrite failed; restoring previous content."
    );
    if let Err(restore_err) = overwrite(target, previous) {
        error!(
            path = %path.display(),
            error = %restore_err,
            "Failed to restore variant list after a failed rewrite."
        );
    }
    Err(EngineError::io(path)(write_err))
}

fn overwrite<R: Replace>(target: &mut R, bytes: &[u8]) -> io::Result<()> {
    target.clear()?;
    target.write_all(bytes)?;
    target.sync()
}
