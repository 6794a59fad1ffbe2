use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

const WRITE_PROBE_PREFIX: &str = ".pepcache-write-probe";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Cache root '{}' does not exist", .0.display())]
    CacheRootMissing(PathBuf),

    #[error("Cache root '{}' is not a directory", .0.display())]
    CacheRootNotDirectory(PathBuf),

    #[error("Cache root '{path}' is not writable: {source}", path = path.display())]
    CacheRootNotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Job queue '{path}' is unusable: {reason}", path = path.display())]
    QueueUnusable { path: PathBuf, reason: String },
}

/// Where the shared cache tree and the job queue live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub cache_root: PathBuf,
    pub job_queue: PathBuf,
}

impl CacheConfig {
    /// Checks everything that would otherwise fail on the first request: the
    /// cache root must be an existing, writable directory and the job queue must
    /// be openable for appending (it is created if absent).
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_cache_root(&self.cache_root)?;
        validate_job_queue(&self.job_queue)
    }
}

fn validate_cache_root(root: &Path) -> Result<(), ConfigError> {
    let metadata =
        fs::metadata(root).map_err(|_| ConfigError::CacheRootMissing(root.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(ConfigError::CacheRootNotDirectory(root.to_path_buf()));
    }

    let probe = root.join(format!("{}-{}", WRITE_PROBE_PREFIX, std::process::id()));
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&probe)
        .map_err(|source| ConfigError::CacheRootNotWritable {
            path: root.to_path_buf(),
            source,
        })?;
    // Losing the race to remove a probe left by a recycled pid is harmless.
    let _ = fs::remove_file(&probe);
    Ok(())
}

fn validate_job_queue(queue: &Path) -> Result<(), ConfigError> {
    if queue.is_dir() {
        return Err(ConfigError::QueueUnusable {
            path: queue.to_path_buf(),
            reason: "path is a directory".to_string(),
        });
    }
    if let Some(parent) = queue.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(ConfigError::QueueUnusable {
                path: queue.to_path_buf(),
                reason: format!("parent directory '{}' does not exist", parent.display()),
            });
        }
    }
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(queue)
        .map_err(|e| ConfigError::QueueUnusable {
            path: queue.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(())
}

#[derive(Default)]
pub struct CacheConfigBuilder {
    cache_root: Option<PathBuf>,
    job_queue: Option<PathBuf>,
}

impl CacheConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_root(mut self, path: PathBuf) -> Self {
        self.cache_root = Some(path);
        self
    }
    pub fn job_queue(mut self, path: PathBuf) -> Self {
        self.job_queue = Some(path);
        self
    }

    pub fn build(self) -> Result<CacheConfig, ConfigError> {
        Ok(CacheConfig {
            cache_root: self
                .cache_root
                .ok_or(ConfigError::MissingParameter("cache_root"))?,
            job_queue: self
                .job_queue
                .ok_or(ConfigError::MissingParameter("job_queue"))?,
        })
    }
}
