use pepcache::engine::config::CacheConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub cache: CacheConfig,
    pub threads: Option<usize>,
}
