use directories::ProjectDirs;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Platform-specific location of the default configuration file, e.g.
/// `~/.config/pepcache/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("edu", "caltech", "pepcache")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
