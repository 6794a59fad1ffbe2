use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub cache_root: Option<PathBuf>,
    pub job_queue: Option<PathBuf>,
    pub threads: Option<usize>,
}

impl FileConfig {
    /// Loads a configuration file. Relative paths inside it are resolved
    /// against the directory containing the file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let config: FileConfig = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self {
            cache_root: config.cache_root.map(|p| base.join(p)),
            job_queue: config.job_queue.map(|p| base.join(p)),
            threads: config.threads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn from_file_reads_kebab_case_keys_and_resolves_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pepcache.toml");
        fs::write(
            &path,
            "cache-root = \"cache\"\njob-queue = \"/shared/jobs.txt\"\nthreads = 4\n",
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();

        assert_eq!(config.cache_root, Some(dir.path().join("cache")));
        assert_eq!(config.job_queue, Some(PathBuf::from("/shared/jobs.txt")));
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn from_file_rejects_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pepcache.toml");
        fs::write(&path, "cache-dir = \"cache\"\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn from_file_propagates_missing_file_as_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
