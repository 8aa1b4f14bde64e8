use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use lru::LruCache;
use tracing::{debug, info};
use wayfind_core::{BeaconRepository, EngineOptions, Layout, PathResult, Point2D, Wayfinder};

/// Exact start/end coordinates, by bit pattern.
pub type PathKey = [u64; 4];

fn path_key(start: Point2D, end: Point2D) -> PathKey {
    [start.x.to_bits(), start.y.to_bits(), end.x.to_bits(), end.y.to_bits()]
}

/// Everything derived from one layout load. Replaced wholesale on reload.
pub struct EngineState {
    pub wayfinder: Wayfinder,
    pub layout_path: Option<PathBuf>,
    pub loaded_at_unix: u64,
    path_cache: Mutex<LruCache<PathKey, Arc<PathResult>>>,
}

impl EngineState {
    pub fn new(wayfinder: Wayfinder, layout_path: Option<PathBuf>, cache_capacity: NonZeroUsize) -> Self {
        Self {
            wayfinder,
            layout_path,
            loaded_at_unix: crate::now_unix(),
            path_cache: Mutex::new(LruCache::new(cache_capacity)),
        }
    }

    /// Build from a layout file, or the built-in store layout when `layout_path` is `None`.
    pub fn load(layout_path: Option<&Path>, options: EngineOptions, cache_capacity: NonZeroUsize) -> anyhow::Result<Self> {
        let layout = match layout_path {
            Some(p) => Layout::from_path(p)?,
            None => Layout::store(),
        };
        let wayfinder = Wayfinder::new(&layout, options)?;
        info!(
            layout = %layout_path.map(|p| p.display().to_string()).unwrap_or_else(|| "<store>".into()),
            waypoints = wayfinder.graph().len(),
            "engine state loaded"
        );
        Ok(Self::new(wayfinder, layout_path.map(Path::to_path_buf), cache_capacity))
    }

    /// Search through the LRU cache. Poisoned cache locks fall back to an uncached search.
    pub fn search_cached(&self, start: Point2D, end: Point2D) -> wayfind_core::Result<Arc<PathResult>> {
        let key = path_key(start, end);
        if let Ok(mut cache) = self.path_cache.lock() {
            if let Some(hit) = cache.get(&key) {
                debug!("path cache hit");
                return Ok(hit.clone());
            }
        }
        let result = Arc::new(self.wayfinder.search(start, end)?);
        if let Ok(mut cache) = self.path_cache.lock() {
            cache.put(key, result.clone());
        }
        Ok(result)
    }

    pub fn cached_paths(&self) -> usize {
        self.path_cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn cache_capacity(&self) -> NonZeroUsize {
        self.path_cache.lock().map(|c| c.cap()).unwrap_or(NonZeroUsize::MIN)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub current: Arc<ArcSwap<EngineState>>, // atomic swap
    pub beacons: Arc<dyn BeaconRepository>,
    pub options: Arc<EngineOptions>,
}

impl AppState {
    pub fn new(engine: EngineState, beacons: Arc<dyn BeaconRepository>, options: EngineOptions) -> Self {
        Self { current: Arc::new(ArcSwap::from_pointee(engine)), beacons, options: Arc::new(options) }
    }

    pub fn engine(&self) -> Arc<EngineState> {
        self.current.load_full()
    }
}
