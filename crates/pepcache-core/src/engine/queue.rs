use super::error::EngineError;
use super::lock::{decode_lines, with_exclusive_lock, with_shared_lock};
use crate::core::models::ids::PeptideKey;
use std::collections::HashSet;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info};

/// Appends `key` to the shared job queue unless it is already listed.
///
/// Returns `true` if this call added the line. The queue is a log of distinct
/// peptide keys, so the new entry is appended rather than the file rewritten.
pub fn enqueue_if_new(queue_path: &Path, key: &PeptideKey) -> Result<bool, EngineError> {
    with_exclusive_lock(queue_path, |file| {
        let raw = file.read_bytes()?;
        let content = decode_lines(queue_path, &raw);
        if content.lines().any(|line| line.trim() == key.as_str()) {
            debug!(peptide = %key, "Peptide already queued.");
            return Ok(false);
        }

        let mut entry = String::with_capacity(key.as_str().len() + 2);
        if raw.last().is_some_and(|b| *b != b'\n') {
            entry.push('\n');
        }
        entry.push_str(key.as_str());
        entry.push('\n');

        file.seek(SeekFrom::End(0))
            .and_then(|_| file.write_all(entry.as_bytes()))
            .and_then(|_| file.sync_all())
            .map_err(EngineError::io(queue_path))?;

        info!(peptide = %key, queue = %queue_path.display(), "Queued peptide for scoring.");
        Ok(true)
    })
}

/// Lists the queued peptide keys in the order they were first appended.
pub fn read_queue(queue_path: &Path) -> Result<Vec<PeptideKey>, EngineError> {
    let entries: Option<Vec<PeptideKey>> = with_shared_lock(queue_path, |file| {
        let content = file.read_all()?;
        let mut seen = HashSet::new();
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && seen.insert(line.to_string()))
            .map(PeptideKey::from_persisted)
            .collect())
    })?;
    Ok(entries.unwrap_or_default())
}
