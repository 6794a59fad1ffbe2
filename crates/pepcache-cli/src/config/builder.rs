use super::defaults;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::CacheArgs;
use crate::error::{CliError, Result};
use pepcache::engine::config::{CacheConfigBuilder, ConfigError};
use tracing::debug;

pub fn build_config(args: &CacheArgs, threads: Option<usize>) -> Result<AppConfig> {
    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => match defaults::default_config_path().filter(|p| p.is_file()) {
            Some(path) => FileConfig::from_file(&path)?,
            None => {
                debug!("No configuration file found; relying on CLI arguments.");
                FileConfig::default()
            }
        },
    };

    let mut builder = CacheConfigBuilder::new();
    if let Some(root) = args.cache_root.clone().or(file_config.cache_root) {
        builder = builder.cache_root(root);
    }
    if let Some(queue) = args.job_queue.clone().or(file_config.job_queue) {
        builder = builder.job_queue(queue);
    }

    let cache = builder.build().map_err(|e| match e {
        ConfigError::MissingParameter(name) => CliError::Config(format!(
            "'{}' is required either via --{} or in the config file.",
            name,
            name.replace('_', "-")
        )),
        other => CliError::Config(other.to_string()),
    })?;

    Ok(AppConfig {
        cache,
        threads: threads.or(file_config.threads),
    })
}
