use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;

pub const DEFAULT_PATH_CACHE: usize = 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON layout file; the built-in store layout when unset.
    pub layout_path: Option<PathBuf>,
    /// SQLite beacon store; beacons live in memory when unset.
    pub beacon_db: Option<PathBuf>,
    pub path_cache: NonZeroUsize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("WAYFIND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("WAYFIND_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        let layout_path = env::var("WAYFIND_LAYOUT").ok().filter(|s| !s.is_empty()).map(PathBuf::from);
        let beacon_db = env::var("WAYFIND_BEACON_DB").ok().filter(|s| !s.is_empty()).map(PathBuf::from);
        let path_cache = env::var("WAYFIND_PATH_CACHE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .and_then(NonZeroUsize::new)
            .or(NonZeroUsize::new(DEFAULT_PATH_CACHE))
            .ok_or_else(|| anyhow::anyhow!("path cache capacity must be positive"))?;

        Ok(Self {
            host,
            port,
            layout_path,
            beacon_db,
            path_cache,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
