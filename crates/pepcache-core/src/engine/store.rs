use super::error::EngineError;
use super::lock::with_shared_lock;
use crate::core::io::fasta;
use crate::core::io::score_table::{self, ScoreMap};
use crate::core::io::variant_list::{self, VariantSet};
use crate::core::models::ids::{PeptideKey, VariantNotation};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

pub const SEQUENCE_EXTENSION: &str = "fasta";
pub const VARIANTS_EXTENSION: &str = "var";
pub const SCORES_EXTENSION: &str = "out";
const STAGING_SUFFIX: &str = ".tmp";

static STAGING_SERIAL: AtomicU64 = AtomicU64::new(0);

/// File locations of one peptide's cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeptidePaths {
    pub dir: PathBuf,
    pub sequence: PathBuf,
    pub variants: PathBuf,
    pub scores: PathBuf,
}

/// Point-in-time view of a peptide's cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeptideStatus {
    pub key: PeptideKey,
    pub has_sequence: bool,
    pub variants: VariantSet,
    pub scores: ScoreMap,
}

impl PeptideStatus {
    /// Variants recorded for the peptide that the score table does not cover yet.
    pub fn unscored(&self) -> Vec<&VariantNotation> {
        self.variants
            .iter()
            .filter(|v| !self.scores.contains(v))
            .collect()
    }
}

/// The on-disk layout rooted at the cache directory:
/// `<root>/<key>/<key>.{fasta,var,out}`.
///
/// Holds no state besides the root; every path is derived on demand.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn paths(&self, key: &PeptideKey) -> PeptidePaths {
        let dir = self.root.join(key.as_str());
        let file = |ext: &str| dir.join(format!("{}.{}", key, ext));
        PeptidePaths {
            sequence: file(SEQUENCE_EXTENSION),
            variants: file(VARIANTS_EXTENSION),
            scores: file(SCORES_EXTENSION),
            dir,
        }
    }

    /// Creates the peptide's directory if it is missing. Another process
    /// creating it first is the expected steady state, not an error.
    pub fn ensure_peptide_dir(&self, key: &PeptideKey) -> Result<PeptidePaths, EngineError> {
        let paths = self.paths(key);
        match fs::create_dir(&paths.dir) {
            Ok(()) => debug!(peptide = %key, "Created peptide directory."),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(EngineError::io(&paths.dir)(e)),
        }
        Ok(paths)
    }

    /// Writes the reference sequence exactly once.
    ///
    /// The record is written and synced to a private staging file, then
    /// published with a hard link, which fails if the target already exists.
    /// The sequence file is therefore either absent or complete, and a caller
    /// that finds it present may rely on it. When the file already exists the
    /// call returns `Ok(false)` without looking at `sequence`.
    pub fn write_sequence_if_absent(
        &self,
        paths: &PeptidePaths,
        key: &PeptideKey,
        sequence: &str,
    ) -> Result<bool, EngineError> {
        if paths.sequence.is_file() {
            debug!(peptide = %key, "Sequence file already present; leaving it untouched.");
            return Ok(false);
        }

        let sequence: String = sequence.chars().filter(|c| !c.is_whitespace()).collect();
        if sequence.is_empty() {
            return Err(EngineError::EmptySequence(key.clone()));
        }

        let staging = staging_path(paths);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staging)
            .map_err(EngineError::io(&staging))?;
        let published = write_fasta(file, key, &sequence)
            .and_then(|()| fs::hard_link(&staging, &paths.sequence));
        match fs::remove_file(&staging) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %staging.display(), error = %e, "Failed to remove staging file.");
            }
        }

        match published {
            Ok(()) => {
                info!(peptide = %key, residues = sequence.len(), "Cached reference sequence.");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(peptide = %key, "Another worker published the sequence first.");
                Ok(false)
            }
            Err(e) => Err(EngineError::io(&paths.sequence)(e)),
        }
    }

    /// Summarizes a peptide's entry, or `None` if the peptide was never seen.
    pub fn inspect(&self, key: &PeptideKey) -> Result<Option<PeptideStatus>, EngineError> {
        let paths = self.paths(key);
        if !paths.dir.is_dir() {
            return Ok(None);
        }

        let variants = with_shared_lock(&paths.variants, |file| {
            file.read_all().map(|content| variant_list::parse(&content))
        })?
        .unwrap_or_default();

        Ok(Some(PeptideStatus {
            key: key.clone(),
            has_sequence: paths.sequence.is_file(),
            variants,
            scores: read_scores(&paths.scores)?,
        }))
    }
}

/// A name no other writer uses: distinct per process, per call and, on a
/// shared filesystem, almost surely per host.
fn staging_path(paths: &PeptidePaths) -> PathBuf {
    let serial = STAGING_SERIAL.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    let name = paths
        .sequence
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    paths
        .dir
        .join(format!(
            ".{}.{}.{}.{}{}",
            name,
            std::process::id(),
            serial,
            nanos,
            STAGING_SUFFIX
        ))
}

fn write_fasta(file: File, key: &PeptideKey, sequence: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(file);
    fasta::write_record(&mut writer, key.as_str(), sequence)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

/// Reads a peptide's score table. The file is produced out of band and is
/// never locked; a missing file simply means nothing has been scored yet.
pub fn read_scores(path: &Path) -> Result<ScoreMap, EngineError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ScoreMap::new()),
        Err(e) => return Err(EngineError::io(path)(e)),
    };
    score_table::parse_scores(file).map_err(|source| EngineError::ScoreTable {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(s: &str) -> PeptideKey {
        PeptideKey::new(s).unwrap()
    }

    #[test]
    fn paths_follow_the_cache_layout() {
        let store = CacheStore::new("/cache");
        let paths = store.paths(&key("ENSP001"));
        assert_eq!(paths.dir, PathBuf::from("/cache/ENSP001"));
        assert_eq!(paths.sequence, PathBuf::from("/cache/ENSP001/ENSP001.fasta"));
        assert_eq!(paths.variants, PathBuf::from("/cache/ENSP001/ENSP001.var"));
        assert_eq!(paths.scores, PathBuf::from("/cache/ENSP001/ENSP001.out"));
    }

    #[test]
    fn ensure_peptide_dir_is_idempotent() {
        let root = TempDir::new().unwrap();
        let store = CacheStore::new(root.path());
        let first = store.ensure_peptide_dir(&key("ENSP001")).unwrap();
        let second = store.ensure_peptide_dir(&key("ENSP001")).unwrap();
        assert_eq!(first, second);
        assert!(first.dir.is_dir());
    }

    #[test]
    fn sequence_is_written_once_and_stays_byte_identical() {
        let root = TempDir::new().unwrap();
        let store = CacheStore::new(root.path());
        let peptide = key("ENSP001");
        let paths = store.ensure_peptide_dir(&peptide).unwrap();

        assert!(
            store
                .write_sequence_if_absent(&paths, &peptide, "MAVLK")
                .unwrap()
        );
        let first = fs::read(&paths.sequence).unwrap();
        assert_eq!(first, b">ENSP001\nMAVLK\n");

        assert!(
            !store
                .write_sequence_if_absent(&paths, &peptide, "MAVLK")
                .unwrap()
        );
        assert!(
            !store
                .write_sequence_if_absent(&paths, &peptide, "DIFFERENT")
                .unwrap()
        );
        assert_eq!(fs::read(&paths.sequence).unwrap(), first);
    }

    #[test]
    fn sequence_whitespace_is_removed() {
        let root = TempDir::new().unwrap();
        let store = CacheStore::new(root.path());
        let peptide = key("ENSP002");
        let paths = store.ensure_peptide_dir(&peptide).unwrap();
        store
            .write_sequence_if_absent(&paths, &peptide, "MAV\nLK \n")
            .unwrap();
        assert_eq!(
            fs::read_to_string(&paths.sequence).unwrap(),
            ">ENSP002\nMAVLK\n"
        );
    }

    #[test]
    fn empty_sequence_is_rejected_without_creating_the_file() {
        let root = TempDir::new().unwrap();
        let store = CacheStore::new(root.path());
        let peptide = key("ENSP003");
        let paths = store.ensure_peptide_dir(&peptide).unwrap();
        let err = store
            .write_sequence_if_absent(&paths, &peptide, " \n")
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptySequence(_)));
        assert!(!paths.sequence.exists());
    }

    #[test]
    fn concurrent_sequence_writers_produce_one_intact_record() {
        let root = TempDir::new().unwrap();
        let store = CacheStore::new(root.path());
        let peptide = key("ENSP004");
        let paths = store.ensure_peptide_dir(&peptide).unwrap();
        let sequence = "M".repeat(50_000);

        let winners: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        store
                            .write_sequence_if_absent(&paths, &peptide, &sequence)
                            .unwrap()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| usize::from(h.join().unwrap()))
                .sum()
        });

        assert_eq!(winners, 1);
        let written = fs::read_to_string(&paths.sequence).unwrap();
        assert_eq!(written, format!(">ENSP004\n{}\n", sequence));

        let entries: Vec<_> = fs::read_dir(&paths.dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("ENSP004.fasta")]);
    }

    #[test]
    fn existing_sequence_file_accepts_callers_without_a_sequence() {
        let root = TempDir::new().unwrap();
        let store = CacheStore::new(root.path());
        let peptide = key("ENSP005");
        let paths = store.ensure_peptide_dir(&peptide).unwrap();
        store
            .write_sequence_if_absent(&paths, &peptide, "MAVLK")
            .unwrap();

        assert!(!store.write_sequence_if_absent(&paths, &peptide, "").unwrap());
        assert!(
            !store
                .write_sequence_if_absent(&paths, &peptide, " \n")
                .unwrap()
        );
        assert_eq!(fs::read(&paths.sequence).unwrap(), b">ENSP005\nMAVLK\n");
    }

    #[test]
    fn failed_write_leaves_neither_sequence_nor_staging_file() {
        let root = TempDir::new().unwrap();
        let store = CacheStore::new(root.path());
        let peptide = key("ENSP006");
        // The directory is never created, so staging cannot be opened.
        let paths = store.paths(&peptide);

        let err = store
            .write_sequence_if_absent(&paths, &peptide, "MAVLK")
            .unwrap_err();

        assert!(matches!(err, EngineError::Io { .. }));
        assert!(!paths.sequence.exists());
        assert!(!paths.dir.exists());
    }

    #[test]
    fn read_scores_of_missing_file_is_empty() {
        let root = TempDir::new().unwrap();
        let scores = read_scores(&root.path().join("absent.out")).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn inspect_reports_unscored_variants() {
        let root = TempDir::new().unwrap();
        let store = CacheStore::new(root.path());
        let peptide = key("ENSP001");
        assert_eq!(store.inspect(&peptide).unwrap(), None);

        let paths = store.ensure_peptide_dir(&peptide).unwrap();
        fs::write(&paths.variants, "A5V\nG9del\n").unwrap();
        fs::write(&paths.scores, "A5V\t-3.2\n").unwrap();

        let status = store.inspect(&peptide).unwrap().unwrap();
        assert!(!status.has_sequence);
        assert_eq!(status.variants.len(), 2);
        assert_eq!(status.scores.len(), 1);
        let unscored: Vec<&str> = status.unscored().iter().map(|v| v.as_str()).collect();
        assert_eq!(unscored, vec!["G9del"]);
    }
}
