use crate::config::EngineConfig;
use crate::error::CellResult;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Composite key of a resolution cache entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub class_name: String,
    pub view: String,
    pub format: String,
}

impl CacheKey {
    pub fn new(
        class_name: impl Into<String>,
        view: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            view: view.into(),
            format: format.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}.{}", self.class_name, self.view, self.format)
    }
}

/// Statistics about the resolution cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub keys: Vec<String>,
}

#[derive(Debug)]
pub struct ResolutionCache {
    enabled: bool,
    entries: DashMap<CacheKey, String>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.cache_templates)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Return the stored identifier for `key`, computing and storing it on a
    /// miss. With caching disabled `compute` runs on every call.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> CellResult<String>
    where
        F: FnOnce() -> CellResult<String>,
    {
        if !self.enabled {
            return compute();
        }

        if let Some(identifier) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, identifier = %identifier, "Resolution cache hit");
            return Ok(identifier);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = compute()?;

        // Another thread may have stored the same key meanwhile; keep its value.
        let stored = self.entries.entry(key.clone()).or_insert(computed).value().clone();
        debug!(key = %key, identifier = %stored, "Cached template resolution");
        Ok(stored)
    }

    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().to_string()).collect();
        keys.sort();
        CacheStats {
            enabled: self.enabled,
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            keys,
        }
    }
}
